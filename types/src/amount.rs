//! Currency amounts in e8s.
//!
//! One display unit (ICP) is 10^8 minor units. Amounts are kept as integers so
//! the fee never passes through floating point on its way to the wallet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minor units per display unit.
pub const E8S_PER_ICP: u64 = 100_000_000;

/// An amount in e8s (10^-8 ICP).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct E8s(u64);

impl E8s {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Whole display units to e8s. Saturates at `u64::MAX`.
    pub fn from_icp(whole: u64) -> Self {
        Self(whole.saturating_mul(E8S_PER_ICP))
    }

    /// Fractional display units to e8s, rounding down.
    ///
    /// Negative and non-finite inputs give zero.
    pub fn from_icp_f64(icp: f64) -> Self {
        if !icp.is_finite() || icp <= 0.0 {
            return Self::ZERO;
        }
        // `as` saturates for out-of-range floats.
        Self((icp * E8S_PER_ICP as f64).floor() as u64)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Display units with all eight decimals, e.g. `1.00000000`.
    pub fn to_icp_string(&self) -> String {
        format!("{}.{:08}", self.0 / E8S_PER_ICP, self.0 % E8S_PER_ICP)
    }
}

impl fmt::Display for E8s {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ICP", self.to_icp_string())
    }
}
