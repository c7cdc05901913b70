//! Fundamental types for the ANIMA client.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! principals, currency amounts, payment requests, token records, workflow states and routes.

pub mod address;
pub mod amount;
pub mod anima;
pub mod error;
pub mod network;
pub mod payment;
pub mod route;
pub mod state;
pub mod time;

pub use address::{AccountId, Principal};
pub use amount::{E8s, E8S_PER_ICP};
pub use anima::{AnimaData, InteractionResponse, MintResult, TokenId};
pub use error::TypesError;
pub use network::NetworkId;
pub use payment::{Memo, PaymentRequest, TransferReceipt};
pub use route::Route;
pub use state::WorkflowState;
