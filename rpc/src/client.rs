//! HTTP client for the backend canister.
//!
//! Calls go through a replica gateway as JSON:
//! `POST {host}/api/v2/canister/{canister_id}/call` with
//! `{ "canister_id", "method", "kind", "args": [...] }`, answered by
//! `{ "result": ... }` or `{ "error": "..." }`.

use std::time::Duration;

use anima_types::{AnimaData, InteractionResponse, MintResult, Principal, TokenId};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::interface;
use crate::{AnimaBackend, BackendResult, RpcError};

#[derive(Clone)]
pub struct CanisterClient {
    http: reqwest::Client,
    host: String,
    canister_id: String,
}

impl CanisterClient {
    pub fn new(host: impl Into<String>, canister_id: impl Into<String>) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            host: host.into(),
            canister_id: canister_id.into(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn canister_id(&self) -> &str {
        &self.canister_id
    }

    pub fn call_url(&self) -> String {
        format!(
            "{}/api/v2/canister/{}/call",
            self.host.trim_end_matches('/'),
            self.canister_id
        )
    }

    /// Call `method` with positional `args` and decode the `result` field.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        args: serde_json::Value,
    ) -> Result<T, RpcError> {
        let spec =
            interface::method(method).ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;
        let body = serde_json::json!({
            "canister_id": self.canister_id,
            "method": spec.name,
            "kind": spec.kind.as_str(),
            "args": args,
        });

        debug!(method, kind = spec.kind.as_str(), "canister call");

        let response = self
            .http
            .post(self.call_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("invalid JSON: {e}")))?;

        decode_reply(method, json)
    }
}

fn decode_reply<T: DeserializeOwned>(method: &str, json: serde_json::Value) -> Result<T, RpcError> {
    if let Some(err) = json.get("error") {
        let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
        return Err(RpcError::Rejected(message));
    }
    let result = json.get("result").cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
}

impl AnimaBackend for CanisterClient {
    async fn mint_anima(&self, owner: &Principal) -> Result<BackendResult<MintResult>, RpcError> {
        self.call("mint_anima", serde_json::json!([owner])).await
    }

    async fn get_anima(&self, token_id: TokenId) -> Result<Option<AnimaData>, RpcError> {
        self.call("get_anima", serde_json::json!([token_id])).await
    }

    async fn get_user_animas(
        &self,
        owner: &Principal,
    ) -> Result<Vec<(TokenId, AnimaData)>, RpcError> {
        self.call("get_user_animas", serde_json::json!([owner])).await
    }

    async fn interact(
        &self,
        token_id: TokenId,
        message: Option<String>,
    ) -> Result<BackendResult<InteractionResponse>, RpcError> {
        self.call("interact", serde_json::json!([token_id, message])).await
    }

    async fn verify_payment(&self, owner: &Principal) -> Result<bool, RpcError> {
        self.call("verify_payment", serde_json::json!([owner])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_url_joins_host_and_canister() {
        let client = CanisterClient::new("http://localhost:4943/", "rrkah-fqaaa-aaaaa-aaaaq-cai").unwrap();
        assert_eq!(
            client.call_url(),
            "http://localhost:4943/api/v2/canister/rrkah-fqaaa-aaaaa-aaaaq-cai/call"
        );
    }

    #[test]
    fn variant_replies_decode_into_nested_result() {
        let ok: BackendResult<MintResult> = decode_reply(
            "mint_anima",
            serde_json::json!({ "result": { "Ok": { "token_id": 42, "designation": "X" } } }),
        )
        .unwrap();
        assert_eq!(
            ok,
            Ok(MintResult {
                token_id: 42,
                designation: "X".into()
            })
        );

        let err: BackendResult<MintResult> = decode_reply(
            "mint_anima",
            serde_json::json!({ "result": { "Err": "No payment record found" } }),
        )
        .unwrap();
        assert_eq!(err, Err("No payment record found".to_string()));
    }

    #[test]
    fn optional_record_decodes_null_as_none() {
        let none: Option<AnimaData> =
            decode_reply("get_anima", serde_json::json!({ "result": null })).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn user_animas_decode_as_pairs() {
        let list: Vec<(TokenId, AnimaData)> = decode_reply(
            "get_user_animas",
            serde_json::json!({ "result": [[3, {
                "owner": "2vxsx-fae",
                "designation": "ANIMA-00000003",
                "created_at": 1,
                "level": 1,
                "experience": 0,
                "payment_memo": 9
            }]] }),
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].0, 3);
        assert_eq!(list[0].1.designation, "ANIMA-00000003");
    }

    #[test]
    fn error_field_is_a_rejection() {
        let err = decode_reply::<bool>("verify_payment", serde_json::json!({ "error": "canister stopped" }))
            .unwrap_err();
        assert!(matches!(err, RpcError::Rejected(ref m) if m == "canister stopped"));
    }
}
