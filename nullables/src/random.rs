//! Nullable random: deterministic memo randomness.

use std::sync::Mutex;

use anima_wallet_core::MemoRandom;

/// Returns pre-configured values in order, cycling when exhausted.
pub struct NullRandom {
    outputs: Vec<u64>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic values.
    ///
    /// # Panics
    /// Panics if `outputs` is empty.
    pub fn new(outputs: Vec<u64>) -> Self {
        assert!(!outputs.is_empty(), "NullRandom needs at least one output");
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: u64) -> Self {
        Self::new(vec![value])
    }
}

impl MemoRandom for NullRandom {
    fn draw(&self) -> u64 {
        let mut idx = self.index.lock().unwrap();
        let value = self.outputs[*idx % self.outputs.len()];
        *idx += 1;
        value
    }
}
