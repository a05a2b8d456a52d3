//! Error types for webauth.
//!
//! Every failure of an authorization attempt is one [`AuthError`]. All of them
//! are terminal for the attempt; nothing here is retried.

use thiserror::Error;

/// The main error type for webauth operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Client id or client secret is absent or empty.
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    /// Another attempt is still in flight.
    #[error("An authorization attempt is already in progress")]
    AttemptInProgress,

    /// The user closed the browser surface or declined the authorization.
    #[error("Authorization cancelled by the user")]
    UserCancelled,

    /// The web authentication session failed for a reason other than cancellation.
    #[error("Web authentication session failed: {0}")]
    SessionFailed(String),

    /// The callback URL is malformed or lacks `code`/`state`.
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),

    /// The callback `state` does not match the one sent with the authorize URL.
    #[error("State mismatch: callback state does not match this attempt")]
    StateMismatch {
        /// State generated when the attempt started.
        expected: String,
        /// State carried by the callback.
        actual: String,
    },

    /// Non-200 status, or no HTTP response at all.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },

    /// The provider answered with an OAuth error body.
    #[error(
        "Provider rejected the request: {error}{}",
        .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    ProviderRejected {
        /// OAuth error code, e.g. `bad_verification_code`.
        error: String,
        /// Human-readable description from the provider.
        description: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias using AuthError.
pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationMissing(message.into())
    }

    /// Create an invalid callback error.
    pub fn invalid_callback(message: impl Into<String>) -> Self {
        Self::InvalidCallback(message.into())
    }

    /// Create an invalid response error for an unexpected HTTP status.
    pub fn http(status: u16) -> Self {
        Self::InvalidResponse {
            status: Some(status),
            message: format!("unexpected HTTP status {status}"),
        }
    }

    /// Create an invalid response error for a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status code, if this error came from an HTTP response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the user ended the attempt themselves.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}
