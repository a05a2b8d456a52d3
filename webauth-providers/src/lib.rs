//! Provider abstractions for webauth.
//!
//! This crate provides the token exchange side of the authorization-code flow:
//!
//! - [`OAuthProvider`] - the two-call interface the flow depends on
//! - [`GitHubProvider`] - token exchange and user lookup against GitHub
//! - [`MockProvider`] - a recording test double
//!
//! ## Example
//!
//! ```rust,ignore
//! use webauth_core::ClientCredentials;
//! use webauth_providers::{GitHubProvider, OAuthProvider};
//!
//! let provider = GitHubProvider::new();
//! let credentials = ClientCredentials::from_env("GITHUB")?;
//!
//! let token = provider.generate_access_token(&credentials, &code).await?;
//! let user = provider.get_authenticated_user(&token.access_token).await?;
//! println!("{}", user.greeting());
//! ```

mod github;
mod mock;
mod provider;

// Re-exports
pub use github::GitHubProvider;
pub use mock::MockProvider;
pub use provider::*;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{BoxedProvider, GitHubProvider, MockProvider, OAuthProvider};
}
