//! identity.rs
//!
//! Caller and recipient identities.

use serde::{Deserialize, Serialize};

/// Authenticated identity of a caller or a transfer recipient.
///
/// `Identity` is a lightweight wrapper around `String`, designed to:
/// - Keep approvers, callers and recipients type safe across APIs
/// - Serve as a `HashSet`/`HashMap` key for membership and dedup checks
/// - Serialize as a plain string in config and script files
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    /// ```rust
    /// use custody_common::Identity;
    /// let id: Identity = "alice".into();
    /// assert_eq!(id.as_str(), "alice");
    /// ```
    fn from(s: &str) -> Self {
        Identity(s.to_string())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Identity(s)
    }
}
