//! Mock provider for testing.
//!
//! [`MockProvider`] answers from queues of pre-configured results and records
//! every call, so a test can assert not only what the flow returned but also
//! which endpoints it reached.
//!
//! ```rust
//! use webauth_providers::MockProvider;
//!
//! let provider = MockProvider::new()
//!     .with_token("abc")
//!     .with_user("octocat");
//! assert!(provider.token_calls().is_empty());
//! ```

use crate::provider::OAuthProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use webauth_core::{
    github_oauth_config, AccessTokenResponse, AuthError, AuthenticatedUser, ClientCredentials,
    OAuthConfig, Result,
};

/// A mock provider with pre-configured responses.
#[derive(Debug, Clone)]
pub struct MockProvider {
    config: OAuthConfig,
    tokens: Arc<Mutex<VecDeque<Result<AccessTokenResponse>>>>,
    users: Arc<Mutex<VecDeque<Result<AuthenticatedUser>>>>,
    token_calls: Arc<Mutex<Vec<String>>>,
    user_calls: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new mock provider using the GitHub configuration.
    pub fn new() -> Self {
        Self::with_config(github_oauth_config())
    }

    /// Create a new mock provider with a custom configuration.
    pub fn with_config(config: OAuthConfig) -> Self {
        Self {
            config,
            tokens: Arc::new(Mutex::new(VecDeque::new())),
            users: Arc::new(Mutex::new(VecDeque::new())),
            token_calls: Arc::new(Mutex::new(Vec::new())),
            user_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful token response with the given access token.
    pub fn with_token(self, access_token: impl Into<String>) -> Self {
        let token = AccessTokenResponse {
            access_token: access_token.into(),
            expires_in: 28800,
            refresh_token: "ghr_mock".to_string(),
            refresh_token_expires_in: 15_897_600,
            scope: String::new(),
            token_type: "bearer".to_string(),
        };
        lock(&self.tokens).push_back(Ok(token));
        self
    }

    /// Queue a failing token exchange.
    pub fn with_token_error(self, error: AuthError) -> Self {
        lock(&self.tokens).push_back(Err(error));
        self
    }

    /// Queue a successful user lookup.
    pub fn with_user(self, login: impl Into<String>) -> Self {
        lock(&self.users).push_back(Ok(AuthenticatedUser {
            login: login.into(),
        }));
        self
    }

    /// Queue a failing user lookup.
    pub fn with_user_error(self, error: AuthError) -> Self {
        lock(&self.users).push_back(Err(error));
        self
    }

    /// Codes passed to the token exchange, in call order.
    pub fn token_calls(&self) -> Vec<String> {
        lock(&self.token_calls).clone()
    }

    /// Access tokens passed to the user lookup, in call order.
    pub fn user_calls(&self) -> Vec<String> {
        lock(&self.user_calls).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OAuthProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn generate_access_token(
        &self,
        _credentials: &ClientCredentials,
        code: &str,
    ) -> Result<AccessTokenResponse> {
        lock(&self.token_calls).push(code.to_string());
        lock(&self.tokens)
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::transport("no mock token response queued")))
    }

    async fn get_authenticated_user(&self, access_token: &str) -> Result<AuthenticatedUser> {
        lock(&self.user_calls).push(access_token.to_string());
        lock(&self.users)
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::transport("no mock user response queued")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_in_order_and_records_calls() {
        let provider = MockProvider::new()
            .with_token("first")
            .with_token_error(AuthError::http(500))
            .with_user("octocat");
        let credentials = ClientCredentials::new("id", "secret");

        let token = provider
            .generate_access_token(&credentials, "c1")
            .await
            .unwrap();
        assert_eq!(token.access_token, "first");

        let err = provider
            .generate_access_token(&credentials, "c2")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));

        let user = provider.get_authenticated_user("first").await.unwrap();
        assert_eq!(user.login, "octocat");

        assert_eq!(provider.token_calls(), vec!["c1", "c2"]);
        assert_eq!(provider.user_calls(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_empty_queue_is_an_error() {
        let provider = MockProvider::new();
        let err = provider.get_authenticated_user("abc").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_recordings() {
        let provider = MockProvider::new().with_user("octocat");
        let clone = provider.clone();

        clone.get_authenticated_user("abc").await.unwrap();
        assert_eq!(provider.user_calls(), vec!["abc"]);
    }
}
