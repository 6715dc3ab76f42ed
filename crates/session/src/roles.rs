//! Role classification and the navigation route table
//!
//! The stored role is open string data owned by the remote service; this
//! closed enum exists only at consumption time. Parsing is
//! case-insensitive and trims whitespace, and the stored value is never
//! rewritten.

/// Recognized roles, each mapping to exactly one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    Manager,
    /// The documented fallback for unrecognized, empty, or missing roles.
    #[default]
    Customer,
}

impl Role {
    /// Parse a stored role value. Returns `None` for anything outside the
    /// closed set so callers can warn before falling back.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }

    /// Navigation destination for this role.
    pub fn path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Manager => "/manager",
            Self::Customer => "/dashboard",
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Customer => "customer",
        }
    }
}
