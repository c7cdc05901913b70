//! Mint workflow states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a single mint attempt stands.
///
/// Transitions only move forward, except the reset to `Awaiting` on error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    /// Ready for the user to start (initial, and after any failure).
    #[default]
    Awaiting,
    /// Transfer submitted; polling the backend for confirmation.
    Pending,
    /// Payment seen by the backend. Transient: always followed by `Minting`.
    Confirmed,
    /// Mint call in flight.
    Minting,
    /// Token created.
    Complete,
}

impl WorkflowState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Awaiting => "awaiting",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Minting => "minting",
            Self::Complete => "complete",
        }
    }

    /// The line shown to the user for this state.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Awaiting => "Ready to create your ANIMA",
            Self::Pending => "Verifying payment...",
            Self::Confirmed => "Payment confirmed!",
            Self::Minting => "Creating your ANIMA...",
            Self::Complete => "ANIMA created successfully! Redirecting to vault...",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, next),
            (Awaiting, Pending)
                | (Pending, Pending)
                | (Pending, Confirmed)
                | (Pending, Awaiting)
                | (Confirmed, Minting)
                | (Minting, Complete)
                | (Minting, Awaiting)
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
