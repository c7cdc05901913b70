//! RPC error types.
//!
//! These cover the call failing. A backend that answers with its own
//! `Err(text)` is a successful call; see [`crate::BackendResult`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("replica returned HTTP {0}")]
    Http(u16),

    #[error("replica rejected call: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
