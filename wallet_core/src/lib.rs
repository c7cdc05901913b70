//! Wallet core library for the ANIMA client.
//!
//! Provides everything the mint flow needs from the wallet side:
//! - The [`WalletProvider`] interface (connect, identity, transfers)
//! - An HTTP client for a local wallet bridge
//! - Per-attempt memo generation
//! - Payment request building for the fixed mint fee

pub mod bridge;
pub mod error;
pub mod memo;
pub mod payment;
pub mod provider;

pub use bridge::WalletBridge;
pub use error::WalletError;
pub use memo::{MemoGenerator, MemoRandom, ThreadRandom};
pub use payment::{PaymentBuilder, MINT_FEE_ICP};
pub use provider::{ConnectRequest, WalletProvider};
