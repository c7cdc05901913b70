//! Records returned by the ANIMA backend.

use serde::{Deserialize, Serialize};

use crate::Principal;

/// Backend-assigned token identifier.
pub type TokenId = u64;

/// Payload of a successful mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintResult {
    pub token_id: TokenId,
    pub designation: String,
}

/// A minted ANIMA as stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimaData {
    pub owner: Principal,
    pub designation: String,
    /// Backend time of the mint, in nanoseconds.
    pub created_at: u64,
    pub level: u64,
    pub experience: u64,
    pub payment_memo: u64,
}

/// Reply to a chat message sent to an ANIMA.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub message: String,
    pub experience_gained: u64,
}
