//! Foyer session core: reactive auth state, credential operations, and
//! role-based navigation for a PocketBase-style backend
//!
//! The crate is the client-side single source of truth for "who is signed
//! in". It never renders UI and never owns a route table beyond the role
//! destinations; rendering and the navigation primitive are injected
//! collaborators.
//!
//! Typical wiring:
//! 1. Load a `SessionConfig` (or build one with `SessionConfig::new`)
//! 2. Call `connect()` with a `ClientContext` and a `Navigate` impl
//! 3. Call `SessionHandle::state.init()` once at startup and hand
//!    `subscribe()` receivers to consumers
//! 4. Drive sign-up/sign-in/sign-out through `SessionHandle::auth`

pub mod config;
pub mod context;
pub mod error;
pub mod normalize;
pub mod ops;
pub mod roles;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use foyer_remote::{AuthStore, HttpRecordService};

pub use config::SessionConfig;
pub use context::{ClientContext, Navigate};
pub use error::{OpError, OpResult};
pub use ops::{AuthManager, SignUpData};
pub use roles::Role;
pub use state::{Session, SessionState};

/// Everything an embedding application needs: the shared store, the
/// canonical session feed, and the credential operations.
pub struct SessionHandle {
    pub store: Arc<AuthStore>,
    pub state: SessionState,
    pub auth: AuthManager,
}

/// Wire a session core against an HTTP backend.
///
/// Builds the shared auth store, the reqwest-backed record service with
/// the configured timeout, the session feed, and the credential
/// operations. The feed is not initialized; call `state.init()` at
/// process start.
pub fn connect(
    config: &SessionConfig,
    context: ClientContext,
    navigator: Arc<dyn Navigate>,
) -> common::Result<SessionHandle> {
    config.validate()?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| common::Error::Config(format!("failed to build HTTP client: {e}")))?;

    let store = Arc::new(AuthStore::new());
    let service = Arc::new(HttpRecordService::with_client(
        client,
        config.base_url.clone(),
        store.clone(),
    ));

    let state = SessionState::new(store.clone(), context);
    let auth = AuthManager::new(
        service,
        store.clone(),
        context,
        navigator,
        config.sign_in_path.clone(),
    );

    Ok(SessionHandle { store, state, auth })
}
