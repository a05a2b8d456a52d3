//! OAuth configuration.

use url::Url;

use crate::errors::{AuthError, Result};

/// Redirect URI registered for the application.
pub const DEFAULT_REDIRECT_URI: &str = "net.mtgto.examplewebauthenticationsession://";

/// Pinned value of the `X-GitHub-Api-Version` header.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Endpoints and redirect settings for an OAuth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// Authorization endpoint URL (opened in the browser)
    pub authorize_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Authenticated-user endpoint URL
    pub user_url: String,
    /// Redirect URI; must be identical for authorization and token exchange
    pub redirect_uri: String,
    /// API version header value
    pub api_version: String,
    /// How long a session may wait for the browser redirect
    pub callback_timeout_secs: u64,
}

impl OAuthConfig {
    /// Create a new OAuth configuration.
    pub fn new(
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
        user_url: impl Into<String>,
    ) -> Self {
        Self {
            authorize_url: authorize_url.into(),
            token_url: token_url.into(),
            user_url: user_url.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            api_version: GITHUB_API_VERSION.to_string(),
            callback_timeout_secs: 300,
        }
    }

    /// Set the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    /// Set the API version header value.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set callback timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.callback_timeout_secs = timeout_secs;
        self
    }

    /// Point the token and user endpoints at another host, keeping their paths.
    ///
    /// Used to aim the client at a local test server.
    #[must_use]
    pub fn with_api_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.token_url = format!("{}/login/oauth/access_token", base);
        self.user_url = format!("{}/user", base);
        self
    }

    /// Scheme of the redirect URI, handed to the web authentication session.
    pub fn callback_scheme(&self) -> Result<String> {
        let url = Url::parse(&self.redirect_uri).map_err(|e| {
            AuthError::configuration(format!("invalid redirect URI {}: {}", self.redirect_uri, e))
        })?;
        Ok(url.scheme().to_string())
    }

    /// Build the authorize URL for one attempt.
    pub fn authorization_url(&self, client_id: &str, state: &str) -> Result<Url> {
        let mut url = Url::parse(&self.authorize_url).map_err(|e| {
            AuthError::configuration(format!(
                "invalid authorize URL {}: {}",
                self.authorize_url, e
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state);
        Ok(url)
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        github_oauth_config()
    }
}

/// GitHub OAuth configuration.
pub fn github_oauth_config() -> OAuthConfig {
    OAuthConfig::new(
        "https://github.com/login/oauth/authorize",
        "https://github.com/login/oauth/access_token",
        "https://api.github.com/user",
    )
    .with_redirect_uri(DEFAULT_REDIRECT_URI)
    .with_api_version(GITHUB_API_VERSION)
}
