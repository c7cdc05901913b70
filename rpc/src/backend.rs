//! The typed backend stub.

use std::future::Future;

use anima_types::{AnimaData, InteractionResponse, MintResult, Principal, TokenId};

use crate::RpcError;

/// A backend reply that may carry a business failure as text.
pub type BackendResult<T> = Result<T, String>;

/// Calls the workflow and views make against the backend.
///
/// The outer `Result` is the transport; the inner [`BackendResult`] is the
/// canister's own verdict.
pub trait AnimaBackend: Send + Sync {
    fn mint_anima(
        &self,
        owner: &Principal,
    ) -> impl Future<Output = Result<BackendResult<MintResult>, RpcError>> + Send;

    fn get_anima(
        &self,
        token_id: TokenId,
    ) -> impl Future<Output = Result<Option<AnimaData>, RpcError>> + Send;

    fn get_user_animas(
        &self,
        owner: &Principal,
    ) -> impl Future<Output = Result<Vec<(TokenId, AnimaData)>, RpcError>> + Send;

    fn interact(
        &self,
        token_id: TokenId,
        message: Option<String>,
    ) -> impl Future<Output = Result<BackendResult<InteractionResponse>, RpcError>> + Send;

    /// Whether the backend has seen the owner's mint payment.
    fn verify_payment(
        &self,
        owner: &Principal,
    ) -> impl Future<Output = Result<bool, RpcError>> + Send;
}
