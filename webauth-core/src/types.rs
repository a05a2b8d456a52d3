//! Wire types for the token and user endpoints, plus client credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AuthError, Result};

/// Token endpoint response.
///
/// Field names match the provider's snake-case JSON keys. All fields are
/// required; a body missing any of them fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// The user access token.
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Seconds until the refresh token expires.
    pub refresh_token_expires_in: u64,
    /// Granted scopes.
    pub scope: String,
    /// Token type, usually `bearer`.
    pub token_type: String,
}

/// OAuth error body.
///
/// GitHub returns this with HTTP 200 when, for example, the code has expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthErrorBody {
    /// OAuth error code.
    pub error: String,
    /// Human-readable description.
    #[serde(default)]
    pub error_description: Option<String>,
    /// Link to documentation about the error.
    #[serde(default)]
    pub error_uri: Option<String>,
}

impl From<OAuthErrorBody> for AuthError {
    fn from(body: OAuthErrorBody) -> Self {
        AuthError::ProviderRejected {
            error: body.error,
            description: body.error_description,
        }
    }
}

/// The authenticated user. Only `login` is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The user's login name.
    pub login: String,
}

impl AuthenticatedUser {
    /// Greeting shown when an attempt succeeds.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!("Hello, {}!", self.login)
    }
}

/// OAuth client id and secret.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

impl ClientCredentials {
    /// Create credentials. Emptiness is checked by [`ClientCredentials::validate`].
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load from environment variables with given prefix.
    ///
    /// Looks for:
    /// - `{PREFIX}_CLIENT_ID`
    /// - `{PREFIX}_CLIENT_SECRET`
    pub fn from_env(prefix: &str) -> Result<Self> {
        let id_var = format!("{}_CLIENT_ID", prefix);
        let secret_var = format!("{}_CLIENT_SECRET", prefix);

        let client_id = std::env::var(&id_var)
            .map_err(|_| AuthError::configuration(format!("{id_var} is not set")))?;
        let client_secret = std::env::var(&secret_var)
            .map_err(|_| AuthError::configuration(format!("{secret_var} is not set")))?;

        let credentials = Self::new(client_id, client_secret);
        credentials.validate()?;
        Ok(credentials)
    }

    /// Ensure neither value is empty or blank.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::configuration("client id is empty"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(AuthError::configuration("client secret is empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}
