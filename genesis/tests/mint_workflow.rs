//! End-to-end runs of the payment-and-mint workflow against nullables.
//!
//! Time is virtual: `NullClock::sleep` returns at once after moving the
//! clock, so the 5 s poll interval and 2 s redirect delay are asserted on
//! recorded timestamps rather than waited out.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anima_genesis::{
    cancel_pair, CancelSignal, MintError, MintSettings, MintWorkflow, Navigator,
    RecordingNavigator, RetryPolicy, Session,
};
use anima_nullables::{NullBackend, NullClock, NullWallet};
use anima_types::{AccountId, MintResult, Principal, Route, TransferReceipt, WorkflowState};
use anima_utils::Clock;
use anima_wallet_core::{ConnectRequest, MemoGenerator, WalletError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const START_MILLIS: u64 = 1_700_000_000_000;

fn principal() -> Principal {
    Principal::new("2vxsx-fae").unwrap()
}

fn connect_request() -> ConnectRequest {
    ConnectRequest {
        whitelist: vec!["rrkah-fqaaa-aaaaa-aaaaq-cai".into()],
        host: "http://localhost:4943".into(),
    }
}

fn settings() -> MintSettings {
    MintSettings::new(AccountId::new("treasury-account").unwrap())
}

async fn signed_in(wallet: NullWallet, backend: NullBackend) -> Session<NullWallet, NullBackend> {
    let session = Session::new(wallet, backend, connect_request());
    session.restore().await;
    session
}

/// Records each route with the virtual time it was reached.
struct TimedNavigator {
    clock: Arc<NullClock>,
    visits: Mutex<Vec<(Route, u64)>>,
}

impl TimedNavigator {
    fn new(clock: Arc<NullClock>) -> Self {
        Self {
            clock,
            visits: Mutex::new(Vec::new()),
        }
    }

    fn visits(&self) -> Vec<(Route, u64)> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for TimedNavigator {
    fn navigate(&self, route: Route) {
        self.visits
            .lock()
            .unwrap()
            .push((route, self.clock.now_millis()));
    }
}

// ---------------------------------------------------------------------------
// Preconditions and wallet errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_identity_means_no_wallet_request() {
    let session = signed_in(NullWallet::new(principal()), NullBackend::new()).await;
    assert!(session.identity().is_none());
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::IdentityMissing));
    assert!(session.wallet().transfers().is_empty());
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(status.error.as_deref(), Some("Please connect your wallet"));
    assert!(!status.loading);
    assert_eq!(flow.history(), &[WorkflowState::Awaiting]);
}

#[tokio::test]
async fn wallet_rejection_surfaces_wallet_message() {
    let wallet = NullWallet::connected(principal());
    wallet.script_transfer(Err(WalletError::Rejected("User rejected".into())));
    let session = signed_in(wallet, NullBackend::new()).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::Wallet(_)));
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(status.error.as_deref(), Some("User rejected"));
    assert!(!status.loading);
    assert!(session.backend().verify_calls().is_empty());
    assert_eq!(flow.history(), &[WorkflowState::Awaiting]);
}

#[tokio::test]
async fn missing_wallet_uses_its_own_message() {
    let wallet = NullWallet::connected(principal());
    wallet.script_transfer(Err(WalletError::NotInstalled));
    let session = signed_in(wallet, NullBackend::new()).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::default();
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    flow.run().await.unwrap_err();
    assert_eq!(flow.status().error.as_deref(), Some("wallet not installed"));
    assert!(!flow.status().loading);
}

// ---------------------------------------------------------------------------
// Confirmation polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pending_is_entered_before_first_verification() {
    let session = signed_in(
        NullWallet::connected(principal()),
        NullBackend::new().verify_default(true),
    )
    .await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    let rx = flow.subscribe();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    session.backend().on_verify(move |_| {
        let status = rx.borrow().clone();
        sink.lock().unwrap().push((status.state, status.loading));
    });

    flow.run().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(WorkflowState::Pending, true)]);
}

#[tokio::test]
async fn negative_answers_wait_the_full_interval_and_stay_pending() {
    let backend = NullBackend::new();
    backend.script_verify([Ok(false), Ok(false), Ok(false), Ok(true)]);
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = Arc::new(NullClock::new(START_MILLIS));
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &*clock, &nav, settings(), CancelSignal::never());

    let rx = flow.subscribe();
    let polls = Arc::new(Mutex::new(Vec::new()));
    let sink = polls.clone();
    let hook_clock = clock.clone();
    session.backend().on_verify(move |_| {
        sink.lock()
            .unwrap()
            .push((hook_clock.now_millis(), rx.borrow().state));
    });

    flow.run().await.unwrap();

    let polls = polls.lock().unwrap().clone();
    assert_eq!(polls.len(), 4);
    for pair in polls.windows(2) {
        assert!(pair[1].0 - pair[0].0 >= 5_000, "polls too close: {pair:?}");
    }
    assert!(polls.iter().all(|(_, state)| *state == WorkflowState::Pending));
}

#[tokio::test]
async fn positive_answer_mints_once_and_stops_polling() {
    let backend = NullBackend::new();
    backend.script_verify([Ok(false), Ok(true), Ok(true)]);
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    flow.run().await.unwrap();

    assert_eq!(session.backend().verify_calls().len(), 2);
    assert_eq!(session.backend().mint_calls(), vec![principal()]);
}

#[tokio::test]
async fn verification_error_aborts_without_retry() {
    let backend = NullBackend::new();
    backend.script_verify([Ok(false), Err("replica unreachable".into())]);
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::Verification(_)));
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(
        status.error.as_deref(),
        Some("Payment verification failed. Please try again.")
    );
    assert!(!status.loading);
    assert_eq!(session.backend().verify_calls().len(), 2);
    assert!(session.backend().mint_calls().is_empty());
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
    assert!(nav.visits().is_empty());
}

#[tokio::test]
async fn bounded_policy_gives_up_after_max_attempts() {
    let session = signed_in(NullWallet::connected(principal()), NullBackend::new()).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut settings = settings();
    settings.retry = RetryPolicy::default().with_max_attempts(3);
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings, CancelSignal::never());

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::ConfirmationTimeout { attempts: 3 }));
    assert_eq!(session.backend().verify_calls().len(), 3);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(
        status.error.as_deref(),
        Some("Payment was not confirmed in time. Please try again.")
    );
    assert!(!status.loading);
}

// ---------------------------------------------------------------------------
// Minting and redirect
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mint_success_redirects_once_after_display_delay() {
    let backend = NullBackend::new().verify_default(true);
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = Arc::new(NullClock::new(START_MILLIS));
    let nav = TimedNavigator::new(clock.clone());
    let mut flow = MintWorkflow::new(&session, &memos, &*clock, &nav, settings(), CancelSignal::never());

    let confirmed_at = Arc::new(Mutex::new(0));
    let sink = confirmed_at.clone();
    let hook_clock = clock.clone();
    session
        .backend()
        .on_verify(move |_| *sink.lock().unwrap() = hook_clock.now_millis());

    flow.run().await.unwrap();

    let confirmed_at = *confirmed_at.lock().unwrap();
    assert_eq!(nav.visits(), vec![(Route::Vault, confirmed_at + 2_000)]);
    assert_eq!(flow.state(), WorkflowState::Complete);
    assert!(flow.navigated());
    assert!(!flow.status().loading);
}

#[tokio::test]
async fn mint_rejection_surfaces_backend_text() {
    let backend = NullBackend::new().verify_default(true);
    backend.script_mint(Ok(Err("Payment already processed".into())));
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::MintRejected(_)));
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(status.error.as_deref(), Some("Payment already processed"));
    assert!(!status.loading);
    assert_eq!(
        flow.history(),
        &[
            WorkflowState::Awaiting,
            WorkflowState::Pending,
            WorkflowState::Confirmed,
            WorkflowState::Minting,
            WorkflowState::Awaiting,
        ]
    );
    assert!(nav.visits().is_empty());
}

#[tokio::test]
async fn mint_transport_failure_resets_workflow() {
    let backend = NullBackend::new().verify_default(true);
    backend.script_mint(Err("connection reset".into()));
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::MintCall(_)));
    assert_eq!(flow.state(), WorkflowState::Awaiting);
    assert_eq!(
        flow.status().error.as_deref(),
        Some("transport error: connection reset")
    );
    assert!(!flow.status().loading);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancelled_before_run_never_reaches_wallet() {
    let session = signed_in(
        NullWallet::connected(principal()),
        NullBackend::new().verify_default(true),
    )
    .await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let (canceller, signal) = cancel_pair();
    canceller.cancel();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), signal);

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::Cancelled));
    assert!(session.wallet().transfers().is_empty());
    assert!(session.backend().verify_calls().is_empty());
    assert!(session.backend().mint_calls().is_empty());
    assert_eq!(flow.last_payment(), None);
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(status.error, None);
    assert!(!status.loading);
    assert_eq!(flow.history(), &[WorkflowState::Awaiting]);
}

#[tokio::test]
async fn cancel_during_polling_stops_before_next_check() {
    let session = signed_in(NullWallet::connected(principal()), NullBackend::new()).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let (canceller, signal) = cancel_pair();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), signal);

    session.backend().on_verify(move |call| {
        if call == 2 {
            canceller.cancel();
        }
    });

    let err = flow.run().await.unwrap_err();

    assert!(matches!(err, MintError::CancelledAfterPayment { height: 1 }));
    assert_eq!(session.wallet().transfers().len(), 1);
    assert_eq!(session.backend().verify_calls().len(), 2);
    assert!(session.backend().mint_calls().is_empty());
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(
        status.error.as_deref(),
        Some("Payment sent; mint was cancelled")
    );
    assert!(!status.loading);
    assert!(nav.visits().is_empty());
}

#[tokio::test]
async fn cancel_after_confirmation_skips_redirect() {
    let backend = NullBackend::new().verify_default(true);
    let session = signed_in(NullWallet::connected(principal()), backend).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let (canceller, signal) = cancel_pair();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), signal);

    session.backend().on_verify(move |_| canceller.cancel());

    let minted = flow.run().await.unwrap();

    // The fee is already paid, so the mint itself still goes through.
    assert_eq!(minted.token_id, 0);
    assert_eq!(flow.state(), WorkflowState::Complete);
    assert!(!flow.navigated());
    assert!(nav.visits().is_empty());
    assert!(clock.sleeps().is_empty());
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_two_negative_polls_then_mint() {
    let wallet = NullWallet::connected(principal());
    wallet.script_transfer(Ok(TransferReceipt::at_height(100)));
    let backend = NullBackend::new();
    backend.script_verify([Ok(false), Ok(false), Ok(true)]);
    backend.script_mint(Ok(Ok(MintResult {
        token_id: 42,
        designation: "X".into(),
    })));
    let session = signed_in(wallet, backend).await;
    let memos = MemoGenerator::new();
    let clock = Arc::new(NullClock::new(START_MILLIS));
    let nav = TimedNavigator::new(clock.clone());
    let mut flow = MintWorkflow::new(&session, &memos, &*clock, &nav, settings(), CancelSignal::never());

    let minted = flow.run().await.unwrap();

    assert_eq!(
        minted,
        MintResult {
            token_id: 42,
            designation: "X".into()
        }
    );
    assert_eq!(
        flow.history(),
        &[
            WorkflowState::Awaiting,
            WorkflowState::Pending,
            WorkflowState::Confirmed,
            WorkflowState::Minting,
            WorkflowState::Complete,
        ]
    );
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(5),
            Duration::from_secs(2)
        ]
    );
    assert_eq!(nav.visits(), vec![(Route::Vault, START_MILLIS + 12_000)]);
    assert_eq!(Route::Vault.path(), "/vault");
    assert_eq!(session.backend().anima(42).unwrap().designation, "X");
}

#[tokio::test]
async fn scenario_user_rejects_transfer() {
    let wallet = NullWallet::connected(principal());
    wallet.script_transfer(Err(WalletError::Rejected("User rejected".into())));
    let session = signed_in(wallet, NullBackend::new()).await;
    let memos = MemoGenerator::new();
    let clock = NullClock::new(START_MILLIS);
    let nav = RecordingNavigator::new();
    let mut flow = MintWorkflow::new(&session, &memos, &clock, &nav, settings(), CancelSignal::never());

    flow.run().await.unwrap_err();

    let status = flow.status();
    assert_eq!(status.state, WorkflowState::Awaiting);
    assert_eq!(status.error.as_deref(), Some("User rejected"));
    assert!(!status.loading);
}
