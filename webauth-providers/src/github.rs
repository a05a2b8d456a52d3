//! GitHub provider implementation.

use crate::provider::OAuthProvider;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use webauth_core::{
    github_oauth_config, AccessTokenResponse, AuthError, AuthenticatedUser, ClientCredentials,
    OAuthConfig, OAuthErrorBody, Result,
};

/// GitHub rejects REST calls without a user agent.
const USER_AGENT: &str = concat!("webauth/", env!("CARGO_PKG_VERSION"));

/// GitHub OAuth provider.
///
/// Performs the token exchange against `github.com/login/oauth/access_token`
/// and the user lookup against `api.github.com/user`. No retries, no caching.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    config: OAuthConfig,
    client: Client,
}

impl GitHubProvider {
    /// Create a provider with the default GitHub configuration.
    pub fn new() -> Self {
        Self::from_config(github_oauth_config())
    }

    /// Create from configuration.
    pub fn from_config(config: OAuthConfig) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Require HTTP 200 and return the body.
    async fn read_ok_body(response: Response, endpoint: &str) -> Result<Vec<u8>> {
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), endpoint, "Unexpected status code");
            return Err(AuthError::http(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::transport(format!("failed to read {} body: {}", endpoint, e)))?;
        Ok(body.to_vec())
    }
}

impl Default for GitHubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OAuthProvider for GitHubProvider {
    fn name(&self) -> &str {
        "github"
    }

    fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn generate_access_token(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<AccessTokenResponse> {
        tracing::debug!(url = %self.config.token_url, "Requesting access token");

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .query(&params)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AuthError::transport(format!("token request failed: {}", e)))?;

        let body = Self::read_ok_body(response, "token").await?;

        // GitHub reports a bad or expired code as 200 with an error body.
        if let Ok(error) = serde_json::from_slice::<OAuthErrorBody>(&body) {
            tracing::warn!(error = %error.error, "Token endpoint returned an OAuth error");
            return Err(error.into());
        }

        let token: AccessTokenResponse = serde_json::from_slice(&body)?;
        tracing::debug!(
            token_type = %token.token_type,
            scope = %token.scope,
            expires_in = token.expires_in,
            "Access token received"
        );
        Ok(token)
    }

    async fn get_authenticated_user(&self, access_token: &str) -> Result<AuthenticatedUser> {
        tracing::debug!(url = %self.config.user_url, "Requesting authenticated user");

        let response = self
            .client
            .get(&self.config.user_url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .header("X-GitHub-Api-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| AuthError::transport(format!("user request failed: {}", e)))?;

        let body = Self::read_ok_body(response, "user").await?;
        let user: AuthenticatedUser = serde_json::from_slice(&body)?;
        Ok(user)
    }
}
