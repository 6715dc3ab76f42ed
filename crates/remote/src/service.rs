//! The record-service contract consumed by the session core
//!
//! Credential operations depend on this trait rather than on a concrete
//! HTTP client, so unit tests can inject a scripted fake. Uses
//! `Pin<Box<dyn Future>>` return types for dyn-compatibility
//! (`Arc<dyn RecordService>`).

use std::future::Future;
use std::pin::Pin;

use crate::failure::RemoteFailure;
use crate::record::{AuthResponse, NewUser, ProfilePatch, UserRecord};

/// Boxed future used by the dyn-compatible trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result alias for remote calls.
pub type ServiceResult<T> = Result<T, RemoteFailure>;

/// Operations the remote auth/record service exposes.
///
/// Implementations own the store-writing side effects: a successful
/// `auth_with_password` or `auth_refresh` must write the shared
/// `AuthStore` before returning, mirroring how an auth SDK maintains its
/// own token store. Callers never write the store except to clear it on
/// sign-out.
pub trait RecordService: Send + Sync {
    /// Create a new user record. Side effects on the server (account +
    /// verification state), so callers must not silently retry.
    fn create<'a>(&'a self, user: &'a NewUser) -> BoxFuture<'a, ServiceResult<UserRecord>>;

    /// Authenticate by identity (email) and password. On success the
    /// token and record are written to the shared store.
    fn auth_with_password<'a>(
        &'a self,
        identity: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<AuthResponse>>;

    /// Refresh the current session using the stored token. On success the
    /// rotated token and record are written to the shared store.
    fn auth_refresh(&self) -> BoxFuture<'_, ServiceResult<AuthResponse>>;

    /// Ask the service to email a password-reset link.
    fn request_password_reset<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ServiceResult<()>>;

    /// Ask the service to email a verification link.
    fn request_verification<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ServiceResult<()>>;

    /// Apply a partial update to a user record.
    fn update<'a>(
        &'a self,
        id: &'a str,
        patch: &'a ProfilePatch,
    ) -> BoxFuture<'a, ServiceResult<UserRecord>>;
}
