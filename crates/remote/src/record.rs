//! Wire types for the record service
//!
//! `UserRecord` is the remote-owned user document; the client holds a
//! read-only cached copy in the auth store. `NewUser` and `ProfilePatch`
//! are request payloads. Unknown fields in service responses are ignored
//! so the client survives server-side schema additions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user record as returned by the record service.
///
/// `role` is free-form text owned by the remote service. Consumers
/// normalize it (lowercase + trim) at use time; the stored value is never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneField>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

/// Phone value as stored by the service: numeric when the submitted value
/// was all digits after stripping separators, otherwise the trimmed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhoneField {
    Number(u64),
    Text(String),
}

/// Payload for account creation.
///
/// `username` is the generated account handle; authentication always uses
/// the email, which is the stable identifier.
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(rename = "emailVisibility")]
    pub email_visibility: bool,
    pub password: String,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneField>,
}

// Manual Debug: the payload is logged when a create call is issued, and
// the password fields must never reach the log stream.
impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("email_visibility", &self.email_visibility)
            .field("password", &"[REDACTED]")
            .field("password_confirm", &"[REDACTED]")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("phone", &self.phone)
            .finish()
    }
}

/// Partial update to the user's own record. `None` fields are omitted
/// from the request body entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneField>,
}

/// Response from `auth-with-password` and `auth-refresh`: the bearer token
/// plus the authenticated record.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub record: UserRecord,
}
