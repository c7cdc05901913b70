//! Owned tokens.

use anima_rpc::AnimaBackend;
use anima_types::{AnimaData, TokenId};
use anima_wallet_core::WalletProvider;
use serde::Serialize;
use tracing::debug;

use crate::{Session, VaultError};

/// The fields a token list shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnimaSummary {
    pub token_id: TokenId,
    pub designation: String,
    pub level: u64,
    pub experience: u64,
}

impl AnimaSummary {
    pub fn new(token_id: TokenId, data: &AnimaData) -> Self {
        Self {
            token_id,
            designation: data.designation.clone(),
            level: data.level,
            experience: data.experience,
        }
    }
}

pub struct Vault<'a, W, B> {
    session: &'a Session<W, B>,
}

impl<'a, W: WalletProvider, B: AnimaBackend> Vault<'a, W, B> {
    pub fn new(session: &'a Session<W, B>) -> Self {
        Self { session }
    }

    /// Tokens owned by the session identity, by ascending id.
    pub async fn owned(&self) -> Result<Vec<AnimaSummary>, VaultError> {
        let owner = self.session.require_identity()?;
        let mut animas = self.session.backend().get_user_animas(&owner).await?;
        animas.sort_by_key(|(id, _)| *id);
        debug!(owner = %owner, count = animas.len(), "loaded vault");
        Ok(animas
            .iter()
            .map(|(id, data)| AnimaSummary::new(*id, data))
            .collect())
    }

    pub async fn get(&self, token_id: TokenId) -> Result<AnimaData, VaultError> {
        self.session.require_identity()?;
        self.session
            .backend()
            .get_anima(token_id)
            .await?
            .ok_or(VaultError::NotFound(token_id))
    }
}
