//! Client-held auth store: bearer token + cached user record
//!
//! The store is the local mirror of "who the service thinks is signed in".
//! Its only writers are the `RecordService` implementations (on successful
//! auth and refresh) and sign-out's `clear()`; everything else reads.
//! Mutations notify registered listeners synchronously, after the data
//! lock is released, in registration order — the session state feed hangs
//! off this notification.

use std::sync::Mutex;

use tracing::debug;

use crate::record::UserRecord;

/// Listener-facing clone of the store contents.
#[derive(Debug, Clone, Default)]
pub struct AuthSnapshot {
    pub token: Option<String>,
    pub record: Option<UserRecord>,
}

impl AuthSnapshot {
    /// A snapshot is valid when a non-empty token and a cached record are
    /// both present. Tokens are opaque; staleness is handled by the
    /// fail-closed refresh path, not by inspecting the token.
    pub fn is_valid(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty()) && self.record.is_some()
    }
}

type Listener = Box<dyn Fn(&AuthSnapshot) + Send + Sync>;

/// Token + cached record with synchronous change notification.
#[derive(Default)]
pub struct AuthStore {
    state: Mutex<AuthSnapshot>,
    listeners: Mutex<Vec<Listener>>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store currently holds a signed-in session.
    pub fn is_valid(&self) -> bool {
        self.snapshot().is_valid()
    }

    /// Clone of the cached user record, if any.
    pub fn model(&self) -> Option<UserRecord> {
        self.lock_state().record.clone()
    }

    /// Clone of the stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.lock_state().token.clone()
    }

    /// Clone of the full store contents.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.lock_state().clone()
    }

    /// Replace the stored token and record, then notify listeners.
    pub fn save(&self, token: String, record: UserRecord) {
        let snapshot = {
            let mut state = self.lock_state();
            state.token = Some(token);
            state.record = Some(record);
            state.clone()
        };
        debug!(
            user_id = snapshot.record.as_ref().map(|r| r.id.as_str()),
            "auth store updated"
        );
        self.notify(&snapshot);
    }

    /// Drop the token and record, then notify listeners.
    pub fn clear(&self) {
        let snapshot = {
            let mut state = self.lock_state();
            *state = AuthSnapshot::default();
            state.clone()
        };
        debug!("auth store cleared");
        self.notify(&snapshot);
    }

    /// Register a synchronous change listener for the process lifetime.
    ///
    /// Listeners run on the mutating thread and must not perform I/O.
    pub fn on_change(&self, listener: impl Fn(&AuthSnapshot) + Send + Sync + 'static) {
        self.lock_listeners().push(Box::new(listener));
    }

    /// Number of registered listeners (diagnostic).
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn notify(&self, snapshot: &AuthSnapshot) {
        let listeners = self.lock_listeners();
        for listener in listeners.iter() {
            listener(snapshot);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AuthSnapshot> {
        // A poisoned lock means a listener or caller panicked mid-read;
        // the snapshot itself is still coherent, so keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn test_record(id: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            email: format!("{id}@example.com"),
            name: "Test".into(),
            username: format!("{id}123abc"),
            role: Some("customer".into()),
            verified: true,
            phone: None,
            created: String::new(),
            updated: String::new(),
        }
    }

    #[test]
    fn empty_store_is_invalid() {
        let store = AuthStore::new();
        assert!(!store.is_valid());
        assert!(store.model().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn save_makes_store_valid() {
        let store = AuthStore::new();
        store.save("tok_abc".into(), test_record("u1"));
        assert!(store.is_valid());
        assert_eq!(store.token().as_deref(), Some("tok_abc"));
        assert_eq!(store.model().unwrap().id, "u1");
    }

    #[test]
    fn empty_token_is_invalid() {
        let store = AuthStore::new();
        store.save(String::new(), test_record("u1"));
        assert!(!store.is_valid());
    }

    #[test]
    fn clear_empties_the_store() {
        let store = AuthStore::new();
        store.save("tok_abc".into(), test_record("u1"));
        store.clear();
        assert!(!store.is_valid());
        assert!(store.model().is_none());
    }

    #[test]
    fn listeners_fire_on_every_mutation() {
        let store = AuthStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.on_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.save("tok_abc".into(), test_record("u1"));
        store.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_sees_post_mutation_snapshot() {
        let store = AuthStore::new();
        let valid = Arc::new(AtomicUsize::new(0));
        let seen = valid.clone();
        store.on_change(move |snapshot| {
            seen.store(usize::from(snapshot.is_valid()), Ordering::SeqCst);
        });

        store.save("tok_abc".into(), test_record("u1"));
        assert_eq!(valid.load(Ordering::SeqCst), 1);

        store.clear();
        assert_eq!(valid.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let store = AuthStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = order.clone();
            store.on_change(move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        store.save("tok_abc".into(), test_record("u1"));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }
}
