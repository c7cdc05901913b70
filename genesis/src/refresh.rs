//! Refresh counter shared by views that show token data.
//!
//! Bumped by the neural link after each successful interaction; subscribers
//! re-fetch token data when the value moves.

use tokio::sync::watch;

pub struct RefreshTrigger {
    tx: watch::Sender<u64>,
}

impl RefreshTrigger {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    pub fn trigger(&self) {
        self.tx.send_modify(|n| *n = n.wrapping_add(1));
    }

    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for RefreshTrigger {
    fn default() -> Self {
        Self::new()
    }
}
