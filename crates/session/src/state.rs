//! The single canonical reactive session feed
//!
//! One `SessionState` exists per running client. It mirrors the auth
//! store into `Session` snapshots over a `tokio::sync::watch` channel:
//! consumers call `subscribe()` for a receiver (drop it to unsubscribe)
//! and re-render on every change. The feed is a pure reader of the store
//! — it never writes it and never calls the remote service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

use foyer_remote::{AuthSnapshot, AuthStore};
use foyer_remote::record::UserRecord;

use crate::context::ClientContext;

/// Snapshot of "who is signed in".
///
/// Invariant: `is_authenticated` equals "a user record is cached and the
/// stored token is valid" at the moment of emission. `is_loading` is true
/// only between construction and `init()`, never during individual
/// operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<UserRecord>,
    pub is_loading: bool,
    pub is_authenticated: bool,
}

impl Session {
    /// The fixed snapshot for signed-out and non-interactive contexts.
    pub fn signed_out() -> Self {
        Self {
            user: None,
            is_loading: false,
            is_authenticated: false,
        }
    }

    fn bootstrapping() -> Self {
        Self {
            user: None,
            is_loading: true,
            is_authenticated: false,
        }
    }

    fn derive(snapshot: &AuthSnapshot) -> Self {
        Self {
            user: snapshot.record.clone(),
            is_loading: false,
            is_authenticated: snapshot.is_valid(),
        }
    }
}

/// Owner of the canonical session feed.
pub struct SessionState {
    store: Arc<AuthStore>,
    context: ClientContext,
    tx: watch::Sender<Session>,
    subscribed: AtomicBool,
}

impl SessionState {
    /// Create the feed in its bootstrapping state (`is_loading = true`).
    pub fn new(store: Arc<AuthStore>, context: ClientContext) -> Self {
        let (tx, _rx) = watch::channel(Session::bootstrapping());
        Self {
            store,
            context,
            tx,
            subscribed: AtomicBool::new(false),
        }
    }

    /// Receiver over the session feed. Holds the latest snapshot
    /// immediately; dropping it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Clone of the latest emitted snapshot.
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Emit the current auth state and start mirroring the store.
    ///
    /// Non-interactive contexts get the fixed signed-out snapshot and no
    /// listener is registered. Interactive contexts emit the derived
    /// snapshot immediately, then mirror every store change for the rest
    /// of the process lifetime. Idempotent: a second call re-emits the
    /// current snapshot but never registers a second listener.
    pub fn init(&self) {
        if !self.context.is_interactive() {
            self.tx.send_replace(Session::signed_out());
            return;
        }

        self.tx.send_replace(Session::derive(&self.store.snapshot()));

        if self.subscribed.swap(true, Ordering::SeqCst) {
            debug!("session feed already mirroring the auth store");
            return;
        }
        let tx = self.tx.clone();
        self.store.on_change(move |snapshot| {
            tx.send_replace(Session::derive(snapshot));
        });
        debug!("session feed initialized");
    }

    /// Merge the loading flag into the current snapshot, leaving the user
    /// and authentication state untouched. Used only around bootstrap.
    pub fn set_loading(&self, loading: bool) {
        self.tx.send_modify(|session| session.is_loading = loading);
    }
}
