//! Typed failures produced at the remote-call boundary
//!
//! The record service rejects calls with several body shapes: a per-field
//! validation map, a flat `{code, message}` envelope, or nothing useful at
//! all. Classifying the rejection once, here, means the session core never
//! walks response structures — it matches on `RemoteFailure` variants and
//! maps them to display text with a single pure function.

use std::collections::BTreeMap;

use serde_json::Value;

/// A rejected remote call, classified at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteFailure {
    /// Per-field validation errors. The status is kept so status-aware
    /// messaging (sign-in) applies regardless of body shape. Fields are
    /// ordered (sorted) so joined output is deterministic.
    #[error("validation failed: {}", join_fields(.fields))]
    Validation {
        status: u16,
        fields: BTreeMap<String, String>,
    },

    /// Status-coded rejection without per-field detail.
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Network or protocol error before any service response arrived.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteFailure {
    /// HTTP status of the rejection, if the service responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// Classify a non-2xx response body.
    ///
    /// PocketBase-style bodies look like
    /// `{"code":400,"message":"...","data":{"email":{"code":"...","message":"..."}}}`.
    /// Per-field `message` is preferred over `code`; a plain-string detail
    /// is accepted as-is. Anything unparseable becomes a `Status` carrying
    /// the raw body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => {
                return Self::Status {
                    status,
                    message: body.trim().to_string(),
                };
            }
        };

        if let Some(map) = parsed.get("data").and_then(Value::as_object) {
            let mut fields = BTreeMap::new();
            for (field, detail) in map {
                let text = detail
                    .get("message")
                    .and_then(Value::as_str)
                    .or_else(|| detail.get("code").and_then(Value::as_str))
                    .or_else(|| detail.as_str());
                if let Some(text) = text {
                    fields.insert(field.clone(), text.to_string());
                }
            }
            if !fields.is_empty() {
                return Self::Validation { status, fields };
            }
        }

        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        Self::Status { status, message }
    }
}

/// `"<field>: <message>"` entries joined with `", "`, in field order.
pub fn join_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_becomes_validation() {
        let body = r#"{
            "code": 400,
            "message": "Failed to create record.",
            "data": {
                "email": {"code": "validation_invalid_email", "message": "Must be a valid email address."},
                "password": {"code": "validation_length_out_of_range", "message": "Must be at least 8 characters."}
            }
        }"#;
        let failure = RemoteFailure::from_response(400, body);
        match &failure {
            RemoteFailure::Validation { status, fields } => {
                assert_eq!(*status, 400);
                assert_eq!(
                    fields.get("email").map(String::as_str),
                    Some("Must be a valid email address.")
                );
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(failure.status(), Some(400));
    }

    #[test]
    fn field_detail_falls_back_to_code() {
        let body = r#"{"code":400,"message":"x","data":{"username":{"code":"validation_not_unique"}}}"#;
        let failure = RemoteFailure::from_response(400, body);
        match failure {
            RemoteFailure::Validation { fields, .. } => {
                assert_eq!(
                    fields.get("username").map(String::as_str),
                    Some("validation_not_unique")
                );
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn plain_string_detail_is_accepted() {
        let body = r#"{"code":400,"data":{"phone":"must be numeric"}}"#;
        let failure = RemoteFailure::from_response(400, body);
        match failure {
            RemoteFailure::Validation { fields, .. } => {
                assert_eq!(fields.get("phone").map(String::as_str), Some("must be numeric"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn message_only_body_becomes_status() {
        let body = r#"{"code":404,"message":"The requested resource wasn't found.","data":{}}"#;
        let failure = RemoteFailure::from_response(404, body);
        assert_eq!(
            failure,
            RemoteFailure::Status {
                status: 404,
                message: "The requested resource wasn't found.".into(),
            }
        );
    }

    #[test]
    fn unparseable_body_keeps_raw_text() {
        let failure = RemoteFailure::from_response(502, "Bad Gateway\n");
        assert_eq!(
            failure,
            RemoteFailure::Status {
                status: 502,
                message: "Bad Gateway".into(),
            }
        );
    }

    #[test]
    fn display_joins_fields_sorted() {
        let body = r#"{"code":400,"data":{"b":{"message":"second"},"a":{"message":"first"}}}"#;
        let failure = RemoteFailure::from_response(400, body);
        assert_eq!(
            failure.to_string(),
            "validation failed: a: first, b: second"
        );
    }

    #[test]
    fn transport_has_no_status() {
        let failure = RemoteFailure::Transport("connection refused".into());
        assert_eq!(failure.status(), None);
        assert_eq!(failure.to_string(), "transport error: connection refused");
    }
}
