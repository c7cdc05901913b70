//! The wallet capability the client depends on.

use std::future::Future;

use anima_types::{PaymentRequest, Principal, TransferReceipt};
use serde::Serialize;

use crate::WalletError;

/// Parameters for asking the wallet to connect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConnectRequest {
    /// Canister ids the wallet should allow calls to.
    pub whitelist: Vec<String>,
    pub host: String,
}

/// A wallet able to report identity and move funds.
///
/// Every call may open an approval prompt outside the client's control, so
/// any of them can take arbitrarily long.
pub trait WalletProvider: Send + Sync {
    /// Ask the user to connect. `Ok(false)` means the user declined.
    fn request_connect(
        &self,
        request: &ConnectRequest,
    ) -> impl Future<Output = Result<bool, WalletError>> + Send;

    fn is_connected(&self) -> impl Future<Output = Result<bool, WalletError>> + Send;

    fn disconnect(&self) -> impl Future<Output = Result<(), WalletError>> + Send;

    /// Submit a transfer for approval.
    fn request_transfer(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<TransferReceipt, WalletError>> + Send;

    fn get_principal(&self) -> impl Future<Output = Result<Principal, WalletError>> + Send;
}
