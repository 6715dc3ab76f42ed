//! Client runtime capabilities
//!
//! Interactivity is an explicit value injected at construction rather
//! than an ambient environment check per call site. Operations query
//! `ClientContext::is_interactive()` and short-circuit
//! in non-interactive (server/prerender) contexts without touching the
//! network. Navigation is a consumed fire-and-forget primitive behind
//! the `Navigate` trait so tests can inject a recorder.

/// Fire-and-forget navigation to a client-side route.
pub trait Navigate: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Whether this process is an interactive client runtime (can navigate
/// and reach the network) or a non-interactive context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientContext {
    interactive: bool,
}

impl ClientContext {
    /// An interactive client runtime.
    pub fn interactive() -> Self {
        Self { interactive: true }
    }

    /// A non-interactive context (server render, background job): every
    /// operation short-circuits, nothing navigates.
    pub fn headless() -> Self {
        Self { interactive: false }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}
