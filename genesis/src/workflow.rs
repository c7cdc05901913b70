//! Payment-and-mint workflow.
//!
//! One [`MintWorkflow`] drives one mint attempt:
//!
//! ```text
//! awaiting --transfer ok--> pending --confirmed--> confirmed --> minting --ok--> complete
//!                            |  ^                                  |
//!                            +--+ not yet (after retry delay)      +--err--> awaiting
//!                            +--verify error / ceiling------------------------> awaiting
//! ```
//!
//! Every step waits for the previous one. Failures become a user-visible
//! message plus a reset to `awaiting`; nothing is retried except the
//! confirmation poll. After `complete` the workflow redirects to the vault
//! once, after a short display delay, and cannot be run again.
//!
//! A cancel before the transfer is silent and never reaches the wallet. Once
//! the fee is paid a cancel still stops polling, but is reported to the user.

use std::time::Duration;

use anima_rpc::AnimaBackend;
use anima_types::{AccountId, MintResult, PaymentRequest, Principal, Route, WorkflowState};
use anima_utils::{format_duration, Clock};
use anima_wallet_core::{MemoGenerator, MemoRandom, PaymentBuilder, WalletProvider};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{CancelSignal, MintError, Navigator, RetryPolicy, Session};

/// How long the success state stays up before the vault redirect.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
pub struct MintSettings {
    pub treasury: AccountId,
    pub retry: RetryPolicy,
    pub redirect_delay: Duration,
}

impl MintSettings {
    /// Production timing: poll every 5 s without limit, redirect after 2 s.
    pub fn new(treasury: AccountId) -> Self {
        Self {
            treasury,
            retry: RetryPolicy::default(),
            redirect_delay: REDIRECT_DELAY,
        }
    }
}

/// What a view renders for the workflow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowStatus {
    pub state: WorkflowState,
    /// Whether a request is in flight; the start action is disabled while set.
    pub loading: bool,
    pub error: Option<String>,
}

pub struct MintWorkflow<'a, W, B, R, C, N> {
    session: &'a Session<W, B>,
    memos: &'a MemoGenerator<R>,
    clock: &'a C,
    navigator: &'a N,
    payments: PaymentBuilder,
    retry: RetryPolicy,
    redirect_delay: Duration,
    cancel: CancelSignal,
    status: watch::Sender<WorkflowStatus>,
    history: Vec<WorkflowState>,
    last_payment: Option<PaymentRequest>,
    navigated: bool,
}

impl<'a, W, B, R, C, N> MintWorkflow<'a, W, B, R, C, N>
where
    W: WalletProvider,
    B: AnimaBackend,
    R: MemoRandom,
    C: Clock,
    N: Navigator,
{
    pub fn new(
        session: &'a Session<W, B>,
        memos: &'a MemoGenerator<R>,
        clock: &'a C,
        navigator: &'a N,
        settings: MintSettings,
        cancel: CancelSignal,
    ) -> Self {
        let (status, _) = watch::channel(WorkflowStatus::default());
        Self {
            session,
            memos,
            clock,
            navigator,
            payments: PaymentBuilder::new(settings.treasury),
            retry: settings.retry,
            redirect_delay: settings.redirect_delay,
            cancel,
            status,
            history: vec![WorkflowState::Awaiting],
            last_payment: None,
            navigated: false,
        }
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> WorkflowState {
        self.status.borrow().state
    }

    /// Live status updates.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowStatus> {
        self.status.subscribe()
    }

    /// Every state entered so far, starting with `Awaiting`.
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    /// The payment submitted by the latest attempt.
    pub fn last_payment(&self) -> Option<&PaymentRequest> {
        self.last_payment.as_ref()
    }

    /// Whether the vault redirect has happened.
    pub fn navigated(&self) -> bool {
        self.navigated
    }

    /// Run one attempt from payment to redirect.
    ///
    /// Errors are also reflected in [`MintWorkflow::status`]: the message is
    /// set, loading is cleared and the state is back at `Awaiting`.
    pub async fn run(&mut self) -> Result<MintResult, MintError> {
        if self.state() == WorkflowState::Complete {
            return Err(MintError::AlreadyComplete);
        }
        let result = self.attempt().await;
        if let Err(ref e) = result {
            self.fail(e);
        }
        result
    }

    async fn attempt(&mut self) -> Result<MintResult, MintError> {
        let owner = self
            .session
            .identity()
            .ok_or(MintError::IdentityMissing)?;
        if self.cancel.is_cancelled() {
            return Err(MintError::Cancelled);
        }

        self.status.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let payment = self.payments.mint_payment(self.memos, self.clock.now_millis());
        info!(memo = %payment.memo, amount = %payment.amount, "requesting mint payment");
        let submitted = self.session.wallet().request_transfer(&payment).await;
        self.last_payment = Some(payment);
        let receipt = submitted?;
        let Some(height) = receipt.height else {
            return Err(MintError::TransferUnsettled);
        };
        info!(height, "transfer submitted");
        self.transition(WorkflowState::Pending);

        // The fee is spent from here on; a cancel must not go unreported.
        self.await_confirmation(&owner)
            .await
            .map_err(|e| match e {
                MintError::Cancelled => MintError::CancelledAfterPayment { height },
                other => other,
            })?;
        self.transition(WorkflowState::Confirmed);
        self.transition(WorkflowState::Minting);

        let minted = match self.session.backend().mint_anima(&owner).await {
            Ok(Ok(minted)) => minted,
            Ok(Err(reason)) => return Err(MintError::MintRejected(reason)),
            Err(e) => return Err(MintError::MintCall(e)),
        };
        info!(token_id = minted.token_id, designation = %minted.designation, "ANIMA minted");
        self.transition(WorkflowState::Complete);
        self.status.send_modify(|s| s.loading = false);

        self.redirect().await;
        Ok(minted)
    }

    /// Poll `verify_payment` until it says yes, fails, hits the policy
    /// ceiling, or the workflow is cancelled.
    async fn await_confirmation(&self, owner: &Principal) -> Result<(), MintError> {
        let started = self.clock.now_millis();
        let mut attempt: u32 = 0;
        loop {
            if self.cancel.is_cancelled() {
                return Err(MintError::Cancelled);
            }
            attempt = attempt.saturating_add(1);
            debug!(attempt, "checking payment");
            let confirmed = self
                .session
                .backend()
                .verify_payment(owner)
                .await
                .map_err(MintError::Verification)?;
            if confirmed {
                info!(attempt, "payment confirmed");
                return Ok(());
            }

            let elapsed = Duration::from_millis(self.clock.now_millis().saturating_sub(started));
            let Some(delay) = self.retry.next_delay(attempt, elapsed) else {
                return Err(MintError::ConfirmationTimeout { attempts: attempt });
            };
            debug!(attempt, delay = %format_duration(delay), "payment not confirmed yet");
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(MintError::Cancelled),
                _ = self.clock.sleep(delay) => {}
            }
        }
    }

    async fn redirect(&mut self) {
        if !self.cancel.is_cancelled() {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {}
                _ = self.clock.sleep(self.redirect_delay) => {}
            }
        }
        if self.cancel.is_cancelled() {
            info!("cancelled before vault redirect");
            return;
        }
        self.navigator.navigate(Route::Vault);
        self.navigated = true;
    }

    fn transition(&mut self, next: WorkflowState) {
        let current = self.state();
        debug_assert!(
            current.can_transition_to(next),
            "illegal transition {current} -> {next}"
        );
        info!(from = %current, to = %next, "mint workflow transition");
        self.history.push(next);
        self.status.send_modify(|s| s.state = next);
    }

    fn fail(&mut self, error: &MintError) {
        let message = error.user_message();
        match &message {
            Some(text) => warn!(error = %error, "mint attempt failed: {text}"),
            None => info!(error = %error, "mint attempt stopped"),
        }
        if self.state() != WorkflowState::Awaiting {
            self.transition(WorkflowState::Awaiting);
        }
        self.status.send_modify(|s| {
            s.loading = false;
            s.error = message;
        });
    }
}
