use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet refused the request. Displays the wallet's own message.
    #[error("{0}")]
    Rejected(String),

    #[error("wallet not installed")]
    NotInstalled,

    #[error("wallet not connected")]
    NotConnected,

    #[error("wallet bridge error: {0}")]
    Bridge(String),

    #[error("invalid wallet response: {0}")]
    InvalidResponse(String),
}
