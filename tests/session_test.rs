/// Session state machine tests over a mock backend
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::B256;
use async_trait::async_trait;
use whitelist_sdk::{
    Action, Error, JoinReceipt, SessionController, SessionState, WhitelistBackend,
    NETWORK_SWITCH_NOTICE,
};

const REQUIRED_CHAIN_ID: u64 = 4;

/// Backend stub with scriptable failures
struct MockBackend {
    chain_id: u64,
    member: AtomicBool,
    count: AtomicU64,
    fail_status: AtomicBool,
    fail_submit: AtomicBool,
    fail_confirm: AtomicBool,
    submit_calls: AtomicUsize,
}

impl MockBackend {
    fn new(chain_id: u64, member: bool, count: u64) -> Self {
        Self {
            chain_id,
            member: AtomicBool::new(member),
            count: AtomicU64::new(count),
            fail_status: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            fail_confirm: AtomicBool::new(false),
            submit_calls: AtomicUsize::new(0),
        }
    }

    fn on_required_network(member: bool, count: u64) -> Self {
        Self::new(REQUIRED_CHAIN_ID, member, count)
    }
}

#[async_trait]
impl WhitelistBackend for MockBackend {
    async fn connect(&self) -> Result<(), Error> {
        if self.chain_id != REQUIRED_CHAIN_ID {
            return Err(Error::NetworkMismatch {
                expected: REQUIRED_CHAIN_ID,
                actual: self.chain_id,
            });
        }
        Ok(())
    }

    async fn member_status(&self) -> Result<bool, Error> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(Error::ContractRead("membership read failed".to_string()));
        }
        Ok(self.member.load(Ordering::SeqCst))
    }

    async fn member_count(&self) -> Result<u64, Error> {
        Ok(self.count.load(Ordering::SeqCst))
    }

    async fn submit_join(&self) -> Result<B256, Error> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(Error::Rpc("submission refused".to_string()));
        }
        Ok(B256::with_last_byte(0x42))
    }

    async fn await_confirmation(&self, tx_hash: B256) -> Result<JoinReceipt, Error> {
        // Give view subscribers a chance to observe the submitting state
        tokio::time::sleep(Duration::from_millis(50)).await;
        if self.fail_confirm.load(Ordering::SeqCst) {
            return Err(Error::TransactionReverted(
                "join transaction failed on-chain".to_string(),
            ));
        }
        self.member.store(true, Ordering::SeqCst);
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(JoinReceipt {
            tx_hash,
            block_number: Some(1),
            confirmed_at: chrono::Utc::now(),
        })
    }
}

#[tokio::test]
async fn wrong_network_leaves_session_disconnected() {
    let mut session = SessionController::new(MockBackend::new(1, false, 5));

    let err = session.connect_wallet().await.unwrap_err();
    assert!(matches!(
        err,
        Error::NetworkMismatch {
            expected: 4,
            actual: 1
        }
    ));

    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(session.whitelist_status(), None);
    assert_eq!(session.whitelist_count(), None);

    // The mismatch is a blocking notice, and the page still offers connect
    let view = session.view();
    assert_eq!(view.action, Action::Connect);
    assert_eq!(view.notice.as_deref(), Some(NETWORK_SWITCH_NOTICE));
}

#[tokio::test]
async fn connect_fetches_status_and_count() {
    let mut session = SessionController::new(MockBackend::on_required_network(false, 5));

    session.connect_wallet().await.unwrap();

    assert_eq!(session.state(), SessionState::ConnectedChecked);
    assert_eq!(session.whitelist_status(), Some(false));
    assert_eq!(session.whitelist_count(), Some(5));

    let view = session.view();
    assert_eq!(view.count_line(), "5 have already joined the Whitelist");
    assert_eq!(view.action, Action::Join);
}

#[tokio::test]
async fn connect_when_already_member_shows_joined() {
    let mut session = SessionController::new(MockBackend::on_required_network(true, 7));

    session.connect_wallet().await.unwrap();

    assert_eq!(session.whitelist_status(), Some(true));
    assert_eq!(session.view().action, Action::Joined);
}

#[tokio::test]
async fn status_failure_leaves_count_intact() {
    let backend = MockBackend::on_required_network(false, 5);
    backend.fail_status.store(true, Ordering::SeqCst);
    let mut session = SessionController::new(backend);

    session.connect_wallet().await.unwrap();

    // Membership stays unset while the independent count fetch completed
    assert_eq!(session.state(), SessionState::ConnectedChecked);
    assert_eq!(session.whitelist_status(), None);
    assert_eq!(session.whitelist_count(), Some(5));
    assert_eq!(session.view().action, Action::Join);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn join_passes_through_loading_and_updates_count() {
    let mut session = SessionController::new(MockBackend::on_required_network(false, 5));

    let mut view_rx = session.subscribe();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let collector_seen = seen.clone();
    let collector = tokio::spawn(async move {
        while view_rx.changed().await.is_ok() {
            let view = view_rx.borrow_and_update().clone();
            collector_seen.lock().unwrap().push(view);
        }
    });

    session.connect_wallet().await.unwrap();
    session.join_whitelist().await.unwrap();

    assert_eq!(session.state(), SessionState::ConnectedChecked);
    assert_eq!(session.whitelist_status(), Some(true));
    assert_eq!(session.whitelist_count(), Some(6));
    assert_eq!(session.pending_tx(), None);

    let view = session.view();
    assert_eq!(view.action, Action::Joined);
    assert_eq!(view.count_line(), "6 have already joined the Whitelist");
    assert_eq!(view.notice, None);

    drop(session);
    collector.await.unwrap();

    let seen = seen.lock().unwrap();
    let actions: Vec<Action> = seen.iter().map(|v| v.action).collect();
    assert!(actions.contains(&Action::Loading), "views: {:?}", actions);
    assert_eq!(actions.last(), Some(&Action::Joined));
}

#[tokio::test]
async fn join_is_noop_when_already_member() {
    let backend = MockBackend::on_required_network(true, 7);
    let mut session = SessionController::new(backend);

    session.connect_wallet().await.unwrap();
    session.join_whitelist().await.unwrap();

    let backend = session_backend(&session);
    assert_eq!(backend.submit_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.whitelist_count(), Some(7));
    assert_eq!(session.view().action, Action::Joined);
}

#[tokio::test]
async fn join_is_noop_while_disconnected() {
    let mut session = SessionController::new(MockBackend::on_required_network(false, 5));

    session.join_whitelist().await.unwrap();

    let backend = session_backend(&session);
    assert_eq!(backend.submit_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn failed_submission_is_surfaced_without_state_change() {
    let backend = MockBackend::on_required_network(false, 5);
    backend.fail_submit.store(true, Ordering::SeqCst);
    let mut session = SessionController::new(backend);

    session.connect_wallet().await.unwrap();
    session.join_whitelist().await.unwrap();

    assert_eq!(session.state(), SessionState::ConnectedChecked);
    assert_eq!(session.whitelist_status(), Some(false));
    assert_eq!(session.whitelist_count(), Some(5));
    assert!(session.view().notice.unwrap().contains("Join failed"));
}

#[tokio::test]
async fn failed_confirmation_reverts_to_checked_with_notice() {
    let backend = MockBackend::on_required_network(false, 5);
    backend.fail_confirm.store(true, Ordering::SeqCst);
    let mut session = SessionController::new(backend);

    session.connect_wallet().await.unwrap();
    session.join_whitelist().await.unwrap();

    // Status and count are unchanged, the pending reference is gone, and
    // the failure shows up as a notice instead of vanishing into the log
    assert_eq!(session.state(), SessionState::ConnectedChecked);
    assert_eq!(session.whitelist_status(), Some(false));
    assert_eq!(session.whitelist_count(), Some(5));
    assert_eq!(session.pending_tx(), None);
    assert!(session.view().notice.is_some());
}

#[tokio::test]
async fn disconnect_clears_cached_chain_state() {
    let mut session = SessionController::new(MockBackend::on_required_network(true, 7));

    session.connect_wallet().await.unwrap();
    assert_eq!(session.whitelist_count(), Some(7));

    session.disconnect();

    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(session.whitelist_status(), None);
    assert_eq!(session.whitelist_count(), None);
    assert_eq!(session.view().action, Action::Connect);
}

#[tokio::test]
async fn connect_twice_is_idempotent() {
    let mut session = SessionController::new(MockBackend::on_required_network(false, 5));

    session.connect_wallet().await.unwrap();
    session.connect_wallet().await.unwrap();

    assert_eq!(session.state(), SessionState::ConnectedChecked);
    assert_eq!(session.whitelist_count(), Some(5));
}

/// Helper to reach the mock through the controller
fn session_backend(session: &SessionController<MockBackend>) -> &MockBackend {
    session.backend()
}
