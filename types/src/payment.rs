//! Payment request handed to the wallet, and the wallet's receipt.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AccountId, E8s};

/// Correlation id attached to a mint payment.
///
/// Composed as `timestamp_ms * 10^9 + random * 10^3 + counter`, which
/// overflows `u64` for any present-day timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memo(u128);

impl Memo {
    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Millisecond timestamp component.
    pub fn timestamp_millis(&self) -> u128 {
        self.0 / 1_000_000_000
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A funds transfer to submit through the wallet. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub to: AccountId,
    pub amount: E8s,
    pub memo: Memo,
    pub created_at_millis: u64,
}

/// What the wallet reports after a transfer.
///
/// A receipt without a block height means the transfer did not land.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    #[serde(default)]
    pub height: Option<u64>,
}

impl TransferReceipt {
    pub fn at_height(height: u64) -> Self {
        Self {
            height: Some(height),
        }
    }
}
