//! Client side of the ANIMA backend.
//!
//! The backend canister owns payment settlement, minting, experience and
//! replies. This crate only describes its surface and calls it:
//! - [`AnimaBackend`], the typed stub every caller depends on
//! - [`CanisterClient`], an HTTP implementation against a replica gateway
//! - [`interface`], the Candid description of the service

pub mod backend;
pub mod client;
pub mod error;
pub mod interface;

pub use backend::{AnimaBackend, BackendResult};
pub use client::CanisterClient;
pub use error::RpcError;
