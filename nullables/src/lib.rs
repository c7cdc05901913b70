//! Deterministic stand-ins for everything the client talks to.
//!
//! The clock, memo randomness, wallet and backend canister each sit behind a
//! trait. The types here answer from a script, remember every call for later
//! assertions, and never reach the network or the wall clock.

pub mod backend;
pub mod clock;
pub mod random;
pub mod wallet;

pub use backend::NullBackend;
pub use clock::NullClock;
pub use random::NullRandom;
pub use wallet::NullWallet;
