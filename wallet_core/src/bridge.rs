//! HTTP client for a locally running wallet bridge.
//!
//! The bridge exposes the browser wallet's capability set over JSON: every
//! request is a POST of `{ "action": ..., ...params }` and every reply is
//! either `{ "result": ... }` or `{ "error": "..." }`.

use std::time::Duration;

use anima_types::{PaymentRequest, Principal, TransferReceipt};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{ConnectRequest, WalletError, WalletProvider};

/// Wallet approvals wait on a human, so the request timeout is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct WalletBridge {
    http: reqwest::Client,
    bridge_url: String,
}

impl WalletBridge {
    /// Create a client targeting the bridge base URL (e.g. `http://127.0.0.1:8765`).
    pub fn new(bridge_url: impl Into<String>) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Bridge(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            bridge_url: bridge_url.into(),
        })
    }

    pub fn bridge_url(&self) -> &str {
        &self.bridge_url
    }

    /// Send one action and return the `result` field.
    async fn call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, WalletError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| WalletError::Bridge("params must be a JSON object".into()))?
            .insert("action".to_string(), serde_json::json!(action));

        debug!(action, "wallet bridge request");

        let response = self
            .http
            .post(&self.bridge_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    WalletError::NotInstalled
                } else {
                    WalletError::Bridge(format!("request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(WalletError::Bridge(format!(
                "bridge returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WalletError::InvalidResponse(format!("invalid JSON: {e}")))?;

        parse_reply(json)
    }
}

/// Split a bridge reply into its result or the wallet's refusal.
fn parse_reply(json: serde_json::Value) -> Result<serde_json::Value, WalletError> {
    if let Some(err) = json.get("error") {
        let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
        return Err(WalletError::Rejected(message));
    }
    Ok(json.get("result").cloned().unwrap_or(serde_json::Value::Null))
}

fn decode<T: DeserializeOwned>(
    action: &str,
    value: serde_json::Value,
) -> Result<T, WalletError> {
    serde_json::from_value(value)
        .map_err(|e| WalletError::InvalidResponse(format!("{action}: {e}")))
}

impl WalletProvider for WalletBridge {
    async fn request_connect(&self, request: &ConnectRequest) -> Result<bool, WalletError> {
        let result = self
            .call(
                "request_connect",
                serde_json::json!({ "whitelist": request.whitelist, "host": request.host }),
            )
            .await?;
        decode("request_connect", result)
    }

    async fn is_connected(&self) -> Result<bool, WalletError> {
        let result = self.call("is_connected", serde_json::json!({})).await?;
        decode("is_connected", result)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.call("disconnect", serde_json::json!({})).await?;
        Ok(())
    }

    async fn request_transfer(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransferReceipt, WalletError> {
        // The memo exceeds 2^53, so it travels as a decimal string.
        let result = self
            .call(
                "request_transfer",
                serde_json::json!({
                    "to": request.to.as_str(),
                    "amount": request.amount.raw(),
                    "memo": request.memo.to_string(),
                    "created": request.created_at_millis,
                }),
            )
            .await?;
        decode("request_transfer", result)
    }

    async fn get_principal(&self) -> Result<Principal, WalletError> {
        let result = self.call("get_principal", serde_json::json!({})).await?;
        let text: String = decode("get_principal", result)?;
        Principal::new(text).map_err(|e| WalletError::InvalidResponse(e.to_string()))
    }
}
