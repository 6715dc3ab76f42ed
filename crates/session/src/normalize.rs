//! Failure-to-message normalization
//!
//! One pure function maps a typed `RemoteFailure` to the string shown to
//! the user, in priority order: per-field validation map, then the
//! service's own message, then the transport message, then a
//! caller-supplied fallback. Sign-in adds a status-aware specialization
//! whose wording is part of the public contract.

use foyer_remote::RemoteFailure;
use foyer_remote::failure::join_fields;

/// Shown for a sign-in rejected with HTTP 400.
pub const SIGN_IN_BAD_CREDENTIALS: &str =
    "Invalid email or password. Please check your credentials.";

/// Shown for a sign-in rejected with HTTP 404.
pub const SIGN_IN_UNKNOWN_USER: &str =
    "User not found. Please check your email or sign up for a new account.";

/// Map a failure to a display string. Never panics, always returns text.
pub fn normalize(failure: &RemoteFailure, fallback: &str) -> String {
    match failure {
        RemoteFailure::Validation { fields, .. } if !fields.is_empty() => join_fields(fields),
        RemoteFailure::Status { message, .. } if !message.trim().is_empty() => message.clone(),
        RemoteFailure::Transport(message) if !message.trim().is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

/// Sign-in specialization: 400 and 404 carry fixed wording regardless of
/// the body shape; everything else follows the general rules.
pub fn sign_in_message(failure: &RemoteFailure) -> String {
    match failure.status() {
        Some(400) => SIGN_IN_BAD_CREDENTIALS.to_string(),
        Some(404) => SIGN_IN_UNKNOWN_USER.to_string(),
        _ => normalize(failure, "Invalid email or password"),
    }
}
