//! Provider trait.
//!
//! A provider performs the two HTTP calls of the authorization-code exchange.
//! The flow only sees this trait, so a test double or another provider can be
//! substituted without touching it.

use async_trait::async_trait;
use std::sync::Arc;
use webauth_core::{AccessTokenResponse, AuthenticatedUser, ClientCredentials, OAuthConfig, Result};

/// Token exchange client for one OAuth provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync + std::fmt::Debug {
    /// Provider name (e.g., "github").
    fn name(&self) -> &str;

    /// Endpoints and redirect URI this provider talks to.
    ///
    /// The flow builds the authorize URL from the same config so the
    /// `redirect_uri` sent at authorization and at token exchange agree.
    fn config(&self) -> &OAuthConfig;

    /// Exchange an authorization code for an access token.
    async fn generate_access_token(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<AccessTokenResponse>;

    /// Look up the user the access token belongs to.
    async fn get_authenticated_user(&self, access_token: &str) -> Result<AuthenticatedUser>;
}

/// Type alias for boxed providers.
pub type BoxedProvider = Arc<dyn OAuthProvider>;

#[async_trait]
impl<P: OAuthProvider + ?Sized> OAuthProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn config(&self) -> &OAuthConfig {
        (**self).config()
    }

    async fn generate_access_token(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<AccessTokenResponse> {
        (**self).generate_access_token(credentials, code).await
    }

    async fn get_authenticated_user(&self, access_token: &str) -> Result<AuthenticatedUser> {
        (**self).get_authenticated_user(access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;

    #[tokio::test]
    async fn test_boxed_provider_delegates() {
        let mock = MockProvider::new().with_token("abc").with_user("octocat");
        let provider: BoxedProvider = Arc::new(mock.clone());

        assert_eq!(provider.name(), "mock");
        assert_eq!(provider.config(), mock.config());

        let credentials = ClientCredentials::new("id", "secret");
        let token = provider
            .generate_access_token(&credentials, "c1")
            .await
            .unwrap();
        let user = provider
            .get_authenticated_user(&token.access_token)
            .await
            .unwrap();

        assert_eq!(user.login, "octocat");
        assert_eq!(mock.token_calls(), vec!["c1"]);
        assert_eq!(mock.user_calls(), vec!["abc"]);
    }
}
