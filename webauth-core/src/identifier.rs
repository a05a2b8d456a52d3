//! Per-attempt identifiers.
//!
//! The authorization `state` is the only identifier an attempt needs. It is
//! sent with the authorize URL and must come back unchanged in the callback.

use std::fmt;
use uuid::Uuid;

/// Opaque CSRF token for one authorization attempt.
///
/// Generated from a random UUID v4, so values are distinct across attempts.
/// Comparison is exact; see [`AuthorizationState::matches`].
///
/// # Example
///
/// ```rust
/// use webauth_core::AuthorizationState;
///
/// let a = AuthorizationState::new();
/// let b = AuthorizationState::new();
/// assert_ne!(a, b);
/// assert_eq!(a.as_str().len(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizationState {
    value: String,
}

impl AuthorizationState {
    /// Generate a fresh state value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Wrap an existing value.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self { value: s.into() }
    }

    /// Get the raw value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Byte-for-byte comparison against the value returned in a callback.
    #[must_use]
    pub fn matches(&self, returned: &str) -> bool {
        self.value == returned
    }
}

impl Default for AuthorizationState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for AuthorizationState {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
