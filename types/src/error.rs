//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(String),

    #[error("invalid account id: {0:?}")]
    InvalidAccount(String),

    #[error("unknown route: {0}")]
    UnknownRoute(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
