//! Wall-clock helpers.
//!
//! Timestamps in this client are Unix epoch milliseconds (UTC), matching the
//! `created` field the wallet expects on a transfer.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current system time in milliseconds since the Unix epoch.
///
/// A clock set before the epoch reads as zero.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
