//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use anima_types::{AccountId, NetworkId};

use crate::retry::DEFAULT_POLL_INTERVAL;
use crate::workflow::REDIRECT_DELAY;
use crate::{ConfigError, MintSettings, RetryPolicy};

/// Configuration for the ANIMA client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The mint fee is deliberately
/// absent: it is fixed at one ICP.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which replica to talk to.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Replica host override. Defaults to the network's host.
    #[serde(default)]
    pub host: Option<String>,

    /// Backend canister id.
    #[serde(default)]
    pub canister_id: String,

    /// Account receiving mint fees.
    #[serde(default)]
    pub treasury_account: String,

    /// Base URL of the local wallet bridge.
    #[serde(default = "default_wallet_bridge_url")]
    pub wallet_bridge_url: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Delay between payment confirmation checks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up after this many checks. Unbounded when absent.
    #[serde(default)]
    pub poll_max_attempts: Option<u32>,

    /// Give up once polling has run this long. Unbounded when absent.
    #[serde(default)]
    pub poll_max_elapsed_ms: Option<u64>,

    /// Growth factor applied to the poll delay after each check.
    #[serde(default = "default_poll_backoff_multiplier")]
    pub poll_backoff_multiplier: f64,

    /// Upper bound for a grown poll delay.
    #[serde(default)]
    pub poll_max_delay_ms: Option<u64>,

    /// How long the success state shows before the vault redirect.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Local
}

fn default_wallet_bridge_url() -> String {
    "http://127.0.0.1:8765".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_poll_backoff_multiplier() -> f64 {
    1.0
}

fn default_redirect_delay_ms() -> u64 {
    REDIRECT_DELAY.as_millis() as u64
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Replica host: the override if set, else the network default.
    pub fn host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| self.network.default_host().to_string())
    }

    pub fn treasury(&self) -> Result<AccountId, ConfigError> {
        AccountId::new(self.treasury_account.clone())
            .map_err(|_| ConfigError::Invalid("treasury_account is not set".into()))
    }

    pub fn require_canister_id(&self) -> Result<&str, ConfigError> {
        let id = self.canister_id.trim();
        if id.is_empty() {
            return Err(ConfigError::Invalid("canister_id is not set".into()));
        }
        Ok(id)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::fixed(Duration::from_millis(self.poll_interval_ms))
            .with_backoff(
                self.poll_backoff_multiplier,
                self.poll_max_delay_ms.map(Duration::from_millis),
            );
        if let Some(attempts) = self.poll_max_attempts {
            policy = policy.with_max_attempts(attempts);
        }
        if let Some(limit) = self.poll_max_elapsed_ms {
            policy = policy.with_max_elapsed(Duration::from_millis(limit));
        }
        policy
    }

    /// Everything the mint workflow needs. A zero poll interval is rejected
    /// so the default unbounded policy cannot spin on `verify_payment`.
    pub fn mint_settings(&self) -> Result<MintSettings, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(MintSettings {
            treasury: self.treasury()?,
            retry: self.retry_policy(),
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            host: None,
            canister_id: String::new(),
            treasury_account: String::new(),
            wallet_bridge_url: default_wallet_bridge_url(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_max_attempts: None,
            poll_max_elapsed_ms: None,
            poll_backoff_multiplier: default_poll_backoff_multiplier(),
            poll_max_delay_ms: None,
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}
