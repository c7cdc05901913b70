//! Client core for ANIMA.
//!
//! Everything here drives the external wallet and backend; none of it
//! settles payments or mints on its own:
//! - [`Session`]: identity plus the wallet and backend handles
//! - [`MintWorkflow`]: pay the fee, wait for confirmation, mint, redirect
//! - [`RetryPolicy`] and [`CancelSignal`]: how and whether polling continues
//! - [`Vault`] and [`NeuralLink`]: owned tokens and chat with one of them
//! - [`ClientConfig`]: TOML configuration

pub mod cancel;
pub mod config;
pub mod error;
pub mod navigation;
pub mod neural_link;
pub mod refresh;
pub mod retry;
pub mod session;
pub mod vault;
pub mod workflow;

pub use cancel::{cancel_pair, CancelSignal, Canceller};
pub use config::ClientConfig;
pub use error::{ConfigError, MintError, SessionError, VaultError};
pub use navigation::{LogNavigator, Navigator, RecordingNavigator};
pub use neural_link::{ChatMessage, NeuralLink, Speaker};
pub use refresh::RefreshTrigger;
pub use retry::RetryPolicy;
pub use session::{GuardDecision, Session};
pub use vault::{AnimaSummary, Vault};
pub use workflow::{MintSettings, MintWorkflow, WorkflowStatus};
