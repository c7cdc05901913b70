use anima_rpc::RpcError;
use anima_types::TokenId;
use anima_wallet_core::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("wallet connection declined")]
    ConnectDeclined,

    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
}

/// Why a mint attempt ended without a token.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("no identity: connect a wallet first")]
    IdentityMissing,

    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("transfer returned no block height")]
    TransferUnsettled,

    #[error("payment verification failed: {0}")]
    Verification(RpcError),

    #[error("payment not confirmed after {attempts} checks")]
    ConfirmationTimeout { attempts: u32 },

    #[error("mint rejected: {0}")]
    MintRejected(String),

    #[error("mint call failed: {0}")]
    MintCall(RpcError),

    #[error("this workflow already minted")]
    AlreadyComplete,

    #[error("cancelled")]
    Cancelled,

    #[error("cancelled after payment at height {height}")]
    CancelledAfterPayment { height: u64 },
}

impl MintError {
    /// The message shown to the user, if any.
    pub fn user_message(&self) -> Option<String> {
        let text = match self {
            Self::IdentityMissing => "Please connect your wallet".to_string(),
            Self::Wallet(e) => non_empty(e.to_string(), "Payment failed"),
            Self::TransferUnsettled => "Payment failed".to_string(),
            Self::Verification(_) => "Payment verification failed. Please try again.".to_string(),
            Self::ConfirmationTimeout { .. } => {
                "Payment was not confirmed in time. Please try again.".to_string()
            }
            Self::MintRejected(reason) => non_empty(reason.clone(), "Minting failed"),
            Self::MintCall(e) => non_empty(e.to_string(), "Minting failed"),
            Self::AlreadyComplete => "ANIMA already created".to_string(),
            Self::CancelledAfterPayment { .. } => {
                "Payment sent; mint was cancelled".to_string()
            }
            Self::Cancelled => return None,
        };
        Some(text)
    }
}

fn non_empty(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("backend error: {0}")]
    Rpc(#[from] RpcError),

    #[error("ANIMA {0} not found")]
    NotFound(TokenId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
