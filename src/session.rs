//! Session state machine
//!
//! Drives the whitelist flow: connect a wallet, check membership and count,
//! join, await confirmation. All chain access goes through the
//! [`WhitelistBackend`] seam so the machine itself carries no RPC details.
//! Every state change publishes a [`View`] snapshot over a watch channel;
//! surfaces render from that and never reach into the controller.

use alloy_primitives::B256;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::contracts::JoinReceipt;
use crate::error::Error;

/// Notice shown when the provider reports the wrong chain
pub const NETWORK_SWITCH_NOTICE: &str = "Change the network to Rinkeby :-)";

/// Chain access as the session sees it
#[async_trait]
pub trait WhitelistBackend: Send + Sync {
    /// Acquire a read-only connection, verifying chain identity
    async fn connect(&self) -> Result<(), Error>;

    /// Whether the connected address is on the whitelist
    async fn member_status(&self) -> Result<bool, Error>;

    /// Total number of whitelisted addresses
    async fn member_count(&self) -> Result<u64, Error>;

    /// Submit the join transaction, returning its hash
    async fn submit_join(&self) -> Result<B256, Error>;

    /// Wait for a submitted join to be confirmed on-chain
    async fn await_confirmation(&self, tx_hash: B256) -> Result<JoinReceipt, Error>;
}

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No wallet attached
    Disconnected,
    /// Wallet attached; membership and count not yet fetched
    ConnectedUnchecked,
    /// Membership and count fetched (either may have failed and stayed
    /// unset)
    ConnectedChecked,
    /// A join transaction is in flight
    Submitting,
}

/// The single user action the page offers in each state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Join,
    Loading,
    Joined,
}

impl Action {
    /// Label rendered for this action
    pub fn label(&self) -> &'static str {
        match self {
            Action::Connect => "Connect your wallet",
            Action::Join => "Join the Whitelist",
            Action::Loading => "Loading...",
            Action::Joined => "Thanks for joining the Whitelist!",
        }
    }

    /// Whether the action accepts user input (loading and joined are
    /// terminal labels, not buttons)
    pub fn is_actionable(&self) -> bool {
        matches!(self, Action::Connect | Action::Join)
    }
}

/// Renderable snapshot of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Whitelist count to display (0 while unknown)
    pub count: u64,
    /// The action or status label to render
    pub action: Action,
    /// A notice that must be shown to the user, if any
    pub notice: Option<String>,
}

impl View {
    /// The count line as rendered on the page
    pub fn count_line(&self) -> String {
        format!("{} have already joined the Whitelist", self.count)
    }
}

/// Session controller
///
/// Owns the connection state, the cached whitelist status and count, and
/// the pending transaction reference. Constructed once at application start
/// and passed by reference to the surfaces; there is no process-wide state.
pub struct SessionController<B> {
    backend: B,
    state: SessionState,
    whitelist_status: Option<bool>,
    whitelist_count: Option<u64>,
    pending_tx: Option<B256>,
    notice: Option<String>,
    view_tx: watch::Sender<View>,
}

impl<B: WhitelistBackend> SessionController<B> {
    /// Create a disconnected session over the given backend
    pub fn new(backend: B) -> Self {
        let controller = Self {
            backend,
            state: SessionState::Disconnected,
            whitelist_status: None,
            whitelist_count: None,
            pending_tx: None,
            notice: None,
            view_tx: watch::channel(View {
                count: 0,
                action: Action::Connect,
                notice: None,
            })
            .0,
        };
        controller.publish();
        controller
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The backend this session drives
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cached membership, if fetched
    pub fn whitelist_status(&self) -> Option<bool> {
        self.whitelist_status
    }

    /// Cached count, if fetched
    pub fn whitelist_count(&self) -> Option<u64> {
        self.whitelist_count
    }

    /// Hash of the in-flight join transaction, if any
    pub fn pending_tx(&self) -> Option<B256> {
        self.pending_tx
    }

    /// Subscribe to view snapshots; a new value is published on every
    /// state change
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view_tx.subscribe()
    }

    /// Render the current view
    pub fn view(&self) -> View {
        let action = match (self.state, self.whitelist_status) {
            (SessionState::Disconnected, _) => Action::Connect,
            (_, Some(true)) => Action::Joined,
            (SessionState::Submitting, _) => Action::Loading,
            _ => Action::Join,
        };
        View {
            count: self.whitelist_count.unwrap_or(0),
            action,
            notice: self.notice.clone(),
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view());
    }

    /// Connect the wallet and kick off the membership and count checks.
    ///
    /// On acquire failure the error propagates and the session stays
    /// `Disconnected`; a network mismatch additionally sets the blocking
    /// notice. The two checks run concurrently and fail independently: a
    /// failure in either is logged and leaves the other value intact.
    pub async fn connect_wallet(&mut self) -> Result<(), Error> {
        if self.state != SessionState::Disconnected {
            return Ok(());
        }

        if let Err(e) = self.backend.connect().await {
            if e.is_blocking() {
                self.notice = Some(NETWORK_SWITCH_NOTICE.to_string());
                self.publish();
            }
            return Err(e);
        }

        self.notice = None;
        self.state = SessionState::ConnectedUnchecked;
        self.publish();

        self.refresh().await;
        Ok(())
    }

    /// Run the membership and count fetches, joined without
    /// short-circuiting. Either order of completion (or neither
    /// completing) is tolerated.
    pub async fn refresh(&mut self) {
        if self.state == SessionState::Disconnected {
            return;
        }

        let (status, count) = tokio::join!(
            self.backend.member_status(),
            self.backend.member_count()
        );

        match status {
            Ok(joined) => self.whitelist_status = Some(joined),
            Err(e) => warn!(error = %e, "membership check failed"),
        }
        match count {
            Ok(n) => self.whitelist_count = Some(n),
            Err(e) => warn!(error = %e, "whitelist count fetch failed"),
        }

        self.state = SessionState::ConnectedChecked;
        self.publish();
    }

    /// Join the whitelist.
    ///
    /// A no-op unless the session is connected, checked, and not already a
    /// member. Submits the join, holds the pending hash while awaiting
    /// confirmation, then forces membership true client-side and re-fetches
    /// the count. Failures do not advance the state: they are logged and
    /// recorded as a notice for the view.
    pub async fn join_whitelist(&mut self) -> Result<(), Error> {
        if self.state != SessionState::ConnectedChecked || self.whitelist_status == Some(true) {
            debug!(state = ?self.state, status = ?self.whitelist_status, "join not applicable");
            return Ok(());
        }

        self.notice = None;
        let tx_hash = match self.backend.submit_join().await {
            Ok(hash) => hash,
            Err(e) => {
                warn!(error = %e, "join submission failed");
                self.notice = Some(format!("Join failed: {}", e));
                self.publish();
                return Ok(());
            }
        };

        self.pending_tx = Some(tx_hash);
        self.state = SessionState::Submitting;
        self.publish();

        match self.backend.await_confirmation(tx_hash).await {
            Ok(receipt) => {
                debug!(tx = %receipt.tx_hash, block = ?receipt.block_number, "join confirmed");
                self.pending_tx = None;
                self.whitelist_status = Some(true);
                // Membership is forced true client-side; only the count is
                // re-fetched after confirmation.
                match self.backend.member_count().await {
                    Ok(n) => self.whitelist_count = Some(n),
                    Err(e) => warn!(error = %e, "post-join count fetch failed"),
                }
            }
            Err(e) => {
                warn!(error = %e, "join confirmation failed");
                self.pending_tx = None;
                self.notice = Some(format!("Join failed: {}", e));
            }
        }

        self.state = SessionState::ConnectedChecked;
        self.publish();
        Ok(())
    }

    /// Drop the connection and all cached chain state; values fetched
    /// before a disconnect must not be trusted after it.
    pub fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;
        self.whitelist_status = None;
        self.whitelist_count = None;
        self.pending_tx = None;
        self.notice = None;
        self.publish();
    }
}
