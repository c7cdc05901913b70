//! Chat with a single ANIMA.

use anima_rpc::AnimaBackend;
use anima_types::TokenId;
use anima_utils::Clock;
use anima_wallet_core::WalletProvider;
use serde::Serialize;
use tracing::warn;

use crate::{AnimaSummary, RefreshTrigger, Session, Vault, VaultError};

const SEND_FAILED: &str = "Failed to send message";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Anima,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Speaker,
    pub content: String,
    pub timestamp_millis: u64,
}

pub struct NeuralLink<'a, W, B, C> {
    session: &'a Session<W, B>,
    clock: &'a C,
    refresh: &'a RefreshTrigger,
    anima: AnimaSummary,
    transcript: Vec<ChatMessage>,
    error: Option<String>,
}

impl<'a, W, B, C> NeuralLink<'a, W, B, C>
where
    W: WalletProvider,
    B: AnimaBackend,
    C: Clock,
{
    /// Load the token and start an empty transcript.
    pub async fn open(
        session: &'a Session<W, B>,
        clock: &'a C,
        refresh: &'a RefreshTrigger,
        token_id: TokenId,
    ) -> Result<Self, VaultError> {
        let data = Vault::new(session).get(token_id).await?;
        Ok(Self {
            session,
            clock,
            refresh,
            anima: AnimaSummary::new(token_id, &data),
            transcript: Vec::new(),
            error: None,
        })
    }

    pub fn anima(&self) -> &AnimaSummary {
        &self.anima
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Send `input` and return the reply, if one came back.
    ///
    /// Blank input is ignored. The user's line stays in the transcript even
    /// when sending fails.
    pub async fn send(&mut self, input: &str) -> Option<ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage {
            sender: Speaker::User,
            content: text.to_string(),
            timestamp_millis: self.clock.now_millis(),
        });

        let token_id = self.anima.token_id;
        let reply = match self
            .session
            .backend()
            .interact(token_id, Some(text.to_string()))
            .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(reason)) => {
                warn!(token_id, "interaction refused: {reason}");
                self.error = Some(SEND_FAILED.to_string());
                return None;
            }
            Err(e) => {
                warn!(token_id, "interaction failed: {e}");
                self.error = Some(SEND_FAILED.to_string());
                return None;
            }
        };

        let message = ChatMessage {
            sender: Speaker::Anima,
            content: reply.message,
            timestamp_millis: self.clock.now_millis(),
        };
        self.transcript.push(message.clone());
        self.error = None;

        match self.session.backend().get_anima(token_id).await {
            Ok(Some(data)) => self.anima = AnimaSummary::new(token_id, &data),
            Ok(None) => warn!(token_id, "ANIMA vanished after interaction"),
            Err(e) => warn!(token_id, "failed to refresh ANIMA: {e}"),
        }
        self.refresh.trigger();
        Some(message)
    }
}
