//! Authorization initiation.

use url::Url;
use webauth_core::{validate_callback, AuthorizationState, OAuthConfig, Result};

/// One authorization attempt: the authorize URL and the state it carries.
///
/// The state is consumed by [`AuthorizationRequest::validate`], so it can be
/// compared against at most one callback.
#[derive(Debug)]
pub struct AuthorizationRequest {
    state: AuthorizationState,
    url: Url,
    callback_scheme: String,
}

impl AuthorizationRequest {
    /// Start an attempt with a fresh state.
    pub fn new(config: &OAuthConfig, client_id: &str) -> Result<Self> {
        Self::with_state(config, client_id, AuthorizationState::new())
    }

    /// Start an attempt with a given state.
    pub fn with_state(
        config: &OAuthConfig,
        client_id: &str,
        state: AuthorizationState,
    ) -> Result<Self> {
        let url = config.authorization_url(client_id, state.as_str())?;
        let callback_scheme = config.callback_scheme()?;
        Ok(Self {
            state,
            url,
            callback_scheme,
        })
    }

    /// URL to present to the user.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Scheme the session should wait for.
    pub fn callback_scheme(&self) -> &str {
        &self.callback_scheme
    }

    /// State sent with this attempt.
    pub fn state(&self) -> &AuthorizationState {
        &self.state
    }

    /// Check the callback against this attempt's state and return the code.
    pub fn validate(self, callback_url: &str) -> Result<String> {
        validate_callback(callback_url, &self.state)
    }
}
