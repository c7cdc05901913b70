//! Per-attempt payment memos.
//!
//! A memo is `timestamp_ms * 10^9 + random * 10^3 + counter`, where `random`
//! is uniform in `[0, 1_000_000)` and `counter` cycles through `1..=999, 0`.
//!
//! Uniqueness is probabilistic. Two memos drawn in the same millisecond by
//! the same generator differ by counter until it wraps after 1000 draws;
//! past that point they collide only if the random component repeats too.
//! Memos from different processes are separated by the random component
//! alone.

use std::sync::atomic::{AtomicU64, Ordering};

use anima_types::Memo;
use rand::Rng;

/// Exclusive upper bound of the random component.
pub const RANDOM_SPAN: u64 = 1_000_000;
/// Counter modulus.
pub const COUNTER_SPAN: u64 = 1_000;

/// Source of the random memo component.
pub trait MemoRandom: Send + Sync {
    /// A value in `[0, RANDOM_SPAN)`. Larger values are reduced modulo the span.
    fn draw(&self) -> u64;
}

/// Thread-local RNG from `rand`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl MemoRandom for ThreadRandom {
    fn draw(&self) -> u64 {
        rand::thread_rng().gen_range(0..RANDOM_SPAN)
    }
}

/// Memo generator holding its own counter.
///
/// Construct one per session and hand it to whoever builds payments.
#[derive(Debug)]
pub struct MemoGenerator<R = ThreadRandom> {
    counter: AtomicU64,
    random: R,
}

impl MemoGenerator<ThreadRandom> {
    pub fn new() -> Self {
        Self::with_random(ThreadRandom)
    }
}

impl Default for MemoGenerator<ThreadRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MemoRandom> MemoGenerator<R> {
    pub fn with_random(random: R) -> Self {
        Self {
            counter: AtomicU64::new(0),
            random,
        }
    }

    /// Next memo for a payment created at `now_millis`.
    pub fn next(&self, now_millis: u64) -> Memo {
        let counter = self.bump_counter();
        let random = self.random.draw() % RANDOM_SPAN;
        let raw = u128::from(now_millis) * 1_000_000_000
            + u128::from(random) * 1_000
            + u128::from(counter);
        Memo::new(raw)
    }

    fn bump_counter(&self) -> u64 {
        let previous = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                Some((c + 1) % COUNTER_SPAN)
            })
            .unwrap_or(0);
        (previous + 1) % COUNTER_SPAN
    }
}
