//! The signed-in session.
//!
//! Built once at start-up and passed explicitly to everything that needs an
//! identity or the backend. Only the session mutates the identity; everyone
//! else reads a clone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use anima_rpc::AnimaBackend;
use anima_types::{Principal, Route};
use anima_wallet_core::{ConnectRequest, WalletProvider};
use tracing::{info, warn};

use crate::SessionError;

/// What the identity guard decides for a requested route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    /// Still finding out whether the wallet is connected.
    Wait,
    Redirect(Route),
}

pub struct Session<W, B> {
    wallet: W,
    backend: B,
    connect: ConnectRequest,
    identity: RwLock<Option<Principal>>,
    connecting: AtomicBool,
}

impl<W: WalletProvider, B: AnimaBackend> Session<W, B> {
    /// A session with no identity yet. Call [`Session::restore`] next.
    pub fn new(wallet: W, backend: B, connect: ConnectRequest) -> Self {
        Self {
            wallet,
            backend,
            connect,
            identity: RwLock::new(None),
            connecting: AtomicBool::new(true),
        }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn identity(&self) -> Option<Principal> {
        self.identity
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::SeqCst)
    }

    pub fn require_identity(&self) -> Result<Principal, SessionError> {
        self.identity().ok_or(SessionError::NotConnected)
    }

    /// Pick up an existing wallet connection. Failures are logged, not
    /// returned; the session just stays signed out.
    pub async fn restore(&self) -> bool {
        let restored = match self.wallet.is_connected().await {
            Ok(true) => match self.wallet.get_principal().await {
                Ok(principal) => {
                    info!(principal = %principal, "restored wallet session");
                    self.set_identity(Some(principal));
                    true
                }
                Err(e) => {
                    warn!("connected wallet did not report a principal: {e}");
                    false
                }
            },
            Ok(false) => false,
            Err(e) => {
                warn!("failed to check wallet connection: {e}");
                false
            }
        };
        self.connecting.store(false, Ordering::SeqCst);
        restored
    }

    /// Ask the wallet to connect and adopt its principal.
    pub async fn connect(&self) -> Result<Principal, SessionError> {
        self.connecting.store(true, Ordering::SeqCst);
        let result = self.connect_inner().await;
        self.connecting.store(false, Ordering::SeqCst);
        if let Err(ref e) = result {
            warn!("failed to connect: {e}");
        }
        result
    }

    async fn connect_inner(&self) -> Result<Principal, SessionError> {
        if !self.wallet.request_connect(&self.connect).await? {
            return Err(SessionError::ConnectDeclined);
        }
        let principal = self.wallet.get_principal().await?;
        info!(principal = %principal, host = %self.connect.host, "wallet connected");
        self.set_identity(Some(principal.clone()));
        Ok(principal)
    }

    /// Disconnect the wallet, then forget the identity.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        self.wallet.disconnect().await.inspect_err(|e| {
            warn!("failed to disconnect: {e}");
        })?;
        self.set_identity(None);
        info!("wallet disconnected");
        Ok(())
    }

    /// The identity guard in front of every non-public view.
    pub fn guard(&self, route: Route) -> GuardDecision {
        if !route.requires_identity() {
            return GuardDecision::Render(route);
        }
        if self.is_connecting() {
            return GuardDecision::Wait;
        }
        match self.identity() {
            Some(_) => GuardDecision::Render(route),
            None => GuardDecision::Redirect(Route::Landing),
        }
    }

    fn set_identity(&self, identity: Option<Principal>) {
        *self
            .identity
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = identity;
    }
}
