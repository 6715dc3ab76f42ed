//! Credential lifecycle operations
//!
//! `AuthManager` owns the request/response round trips against the record
//! service: sign-up, sign-in, sign-out, password reset, profile update,
//! and session refresh, plus the role-based navigation dispatch. Every
//! operation checks the client context first and returns a normalized
//! result; no remote-layer fault ever escapes as a panic or a typed
//! transport error.
//!
//! Operations are safe to retry at the caller's discretion except
//! sign-up, which has server-side side effects (account + verification
//! email) and is never retried here.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngExt;
use tracing::{debug, info, warn};

use common::Secret;
use foyer_remote::record::{NewUser, PhoneField, ProfilePatch, UserRecord};
use foyer_remote::{AuthStore, RecordService};

use crate::context::{ClientContext, Navigate};
use crate::error::{OpError, OpResult};
use crate::normalize::{normalize, sign_in_message};
use crate::roles::Role;

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = "customer";

/// Uniform short-circuit message for non-interactive contexts.
const NOT_AVAILABLE: &str = "record service not available";

/// Caller-supplied sign-up fields. Passwords are wrapped so Debug output
/// and logs stay redacted.
#[derive(Debug, Clone)]
pub struct SignUpData {
    pub name: String,
    pub email: String,
    pub password: Secret<String>,
    pub password_confirm: Secret<String>,
    pub phone: Option<String>,
}

/// Credential operations bound to one record service, one auth store,
/// one client context, and one navigator.
pub struct AuthManager {
    service: Arc<dyn RecordService>,
    store: Arc<AuthStore>,
    context: ClientContext,
    navigator: Arc<dyn Navigate>,
    sign_in_path: String,
}

impl AuthManager {
    pub fn new(
        service: Arc<dyn RecordService>,
        store: Arc<AuthStore>,
        context: ClientContext,
        navigator: Arc<dyn Navigate>,
        sign_in_path: impl Into<String>,
    ) -> Self {
        Self {
            service,
            store,
            context,
            navigator,
            sign_in_path: sign_in_path.into(),
        }
    }

    /// Create an account and best-effort request a verification email.
    ///
    /// The account handle is generated from the email local-part; the
    /// email remains the stable sign-in identifier. A verification
    /// failure after a successful create is logged and swallowed — the
    /// account exists either way.
    pub async fn sign_up(&self, data: SignUpData) -> OpResult<UserRecord> {
        if !self.context.is_interactive() {
            return Err(OpError::new(NOT_AVAILABLE));
        }

        let new_user = NewUser {
            username: generate_username(&data.email),
            email: data.email.clone(),
            email_visibility: true,
            password: data.password.expose().clone(),
            password_confirm: data.password_confirm.expose().clone(),
            name: data.name.clone(),
            role: DEFAULT_ROLE.into(),
            phone: data.phone.as_deref().and_then(coerce_phone),
        };
        debug!(email = %new_user.email, username = %new_user.username, "creating account");

        let record = self.service.create(&new_user).await.map_err(|failure| {
            warn!(email = %new_user.email, error = %failure, "sign-up rejected");
            OpError::new(normalize(&failure, "Failed to create account"))
        })?;

        if let Err(failure) = self.service.request_verification(&data.email).await {
            warn!(email = %data.email, error = %failure, "verification email failed, continuing");
        }

        info!(user_id = %record.id, "account created");
        Ok(record)
    }

    /// Authenticate by email and password. On success the store is
    /// already updated by the service; the role redirect fires
    /// synchronously before this returns.
    pub async fn sign_in(&self, email: &str, password: &str) -> OpResult<UserRecord> {
        if !self.context.is_interactive() {
            return Err(OpError::new(NOT_AVAILABLE));
        }

        match self.service.auth_with_password(email, password).await {
            Ok(auth) => {
                info!(user_id = %auth.record.id, "signed in");
                self.redirect_by_role(Some(&auth.record));
                Ok(auth.record)
            }
            Err(failure) => {
                warn!(email, error = %failure, "sign-in failed");
                Err(OpError::new(sign_in_message(&failure)))
            }
        }
    }

    /// Clear the session and navigate to the sign-in entry point.
    /// No-op outside an interactive context.
    pub fn sign_out(&self) {
        if !self.context.is_interactive() {
            return;
        }
        self.store.clear();
        self.navigator.navigate(&self.sign_in_path);
        info!("signed out");
    }

    /// Ask the service to email a password-reset link.
    pub async fn request_password_reset(&self, email: &str) -> OpResult<()> {
        if !self.context.is_interactive() {
            return Err(OpError::new(NOT_AVAILABLE));
        }

        self.service
            .request_password_reset(email)
            .await
            .map_err(|failure| {
                warn!(email, error = %failure, "password reset request failed");
                OpError::new(normalize(&failure, "Failed to send reset email"))
            })
    }

    /// Apply a partial update to the user's own record.
    pub async fn update_profile(&self, user_id: &str, patch: ProfilePatch) -> OpResult<UserRecord> {
        if !self.context.is_interactive() {
            return Err(OpError::new(NOT_AVAILABLE));
        }

        self.service.update(user_id, &patch).await.map_err(|failure| {
            warn!(user_id, error = %failure, "profile update failed");
            OpError::new(normalize(&failure, "Failed to update profile"))
        })
    }

    /// Refresh the session token, fail-closed.
    ///
    /// No-op without an interactive context or a valid stored token. On
    /// any refresh failure the store is cleared: an unrefreshable token
    /// is treated as invalid rather than left stale. Fatal to the
    /// session, never to the process.
    pub async fn refresh(&self) {
        if !self.context.is_interactive() || !self.store.is_valid() {
            return;
        }

        if let Err(failure) = self.service.auth_refresh().await {
            warn!(error = %failure, "session refresh failed, clearing auth store");
            self.store.clear();
        }
    }

    /// Navigate the user to their role's destination.
    ///
    /// Warns and does nothing without an interactive context or a user.
    /// Unrecognized, empty, or missing roles route to the customer
    /// dashboard with a warning.
    pub fn redirect_by_role(&self, user: Option<&UserRecord>) {
        if !self.context.is_interactive() {
            warn!("cannot redirect: no interactive context");
            return;
        }
        let Some(user) = user else {
            warn!("cannot redirect: no user");
            return;
        };

        let raw = user.role.as_deref().unwrap_or("");
        let role = Role::parse(raw).unwrap_or_else(|| {
            warn!(user_id = %user.id, role = raw, "unrecognized role, defaulting to dashboard");
            Role::default()
        });
        debug!(user_id = %user.id, role = role.as_str(), path = role.path(), "redirecting by role");
        self.navigator.navigate(role.path());
    }

    /// Normalized role of the currently cached user. A cached user with
    /// an empty or missing role reports the default; no user (or no
    /// interactive context) reports `None`.
    pub fn current_role(&self) -> Option<String> {
        if !self.context.is_interactive() {
            return None;
        }
        let record = self.store.model()?;
        let role = record
            .role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(DEFAULT_ROLE);
        Some(role.trim().to_lowercase())
    }

    /// Case/whitespace-insensitive role check against the cached user.
    pub fn has_role(&self, role: &str) -> bool {
        self.current_role()
            .is_some_and(|current| current == role.trim().to_lowercase())
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    pub fn is_manager(&self) -> bool {
        self.has_role("manager")
    }

    pub fn is_customer(&self) -> bool {
        self.has_role("customer")
    }
}

/// Derive an account handle from the email local-part: non-alphanumerics
/// stripped, then the last six digits of the unix-millis clock and six
/// random alphanumerics appended. Collision-avoidance heuristic only;
/// the service enforces real uniqueness.
fn generate_username(email: &str) -> String {
    let base: String = email
        .split('@')
        .next()
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string();
    let clock_tail = &millis[millis.len().saturating_sub(6)..];

    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut bytes = [0u8; 6];
    rand::rng().fill(&mut bytes);
    let suffix: String = bytes
        .iter()
        .map(|b| CHARSET[(b % 36) as usize] as char)
        .collect();

    format!("{base}{clock_tail}{suffix}")
}

/// Phone storage rule: skip when empty after trim; numeric when any
/// digits survive stripping separators; otherwise the trimmed text.
fn coerce_phone(raw: &str) -> Option<PhoneField> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        if let Ok(number) = digits.parse::<u64>() {
            return Some(PhoneField::Number(number));
        }
    }
    Some(PhoneField::Text(trimmed.to_string()))
}
