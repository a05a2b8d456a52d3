//! # webauth - GitHub OAuth sign-in for Rust
//!
//! webauth runs the OAuth 2.0 authorization-code flow against GitHub: it
//! builds the authorize URL with a fresh `state`, hands it to a web
//! authentication session, validates the redirect, exchanges the code for an
//! access token and greets the authenticated user.
//!
//! ## Quick Start
//!
//! ```ignore
//! use webauth::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = GitHubProvider::from_config(
//!         github_oauth_config().with_redirect_uri("http://127.0.0.1:8765/callback"),
//!     );
//!     let session = LoopbackSession::from_config(provider.config())?;
//!     let credentials = ClientCredentials::from_env("GITHUB")?;
//!
//!     let state = authorize(FlowState::new(), &provider, &session, &credentials).await;
//!     if let Some(outcome) = state.last_response() {
//!         println!("{}", outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`webauth_core`] - errors, configuration, state and callback validation
//! - [`webauth_providers`] - the token exchange client
//! - this crate - sessions, the authorization initiator and the flow
//!
//! ## Sessions
//!
//! A [`WebAuthenticationSession`] is whatever shows the user the authorize
//! page and returns the callback URL:
//!
//! - [`LoopbackSession`] listens on `http://127.0.0.1:<port>/...`
//! - [`PasteSession`] asks the user to paste a custom-scheme URL back
//! - any async closure, which is how tests script the browser

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod flow;
pub mod initiator;
pub mod loopback;
pub mod paste;
pub mod session;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Core types, configuration and errors.
pub use webauth_core as core;

/// Token exchange providers.
pub use webauth_providers as providers;

// ============================================================================
// Type Re-exports (Flat)
// ============================================================================

pub use flow::{authorize, FlowOutcome, FlowPhase, FlowState};
pub use initiator::AuthorizationRequest;
pub use loopback::LoopbackSession;
pub use paste::PasteSession;
pub use session::WebAuthenticationSession;

pub use webauth_core::{
    github_oauth_config, AccessTokenResponse, AuthError, AuthenticatedUser, AuthorizationState,
    ClientCredentials, OAuthConfig, Result, DEFAULT_REDIRECT_URI,
};
pub use webauth_providers::{BoxedProvider, GitHubProvider, MockProvider, OAuthProvider};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        authorize, github_oauth_config, AuthError, ClientCredentials, FlowOutcome, FlowPhase,
        FlowState, GitHubProvider, LoopbackSession, OAuthConfig, OAuthProvider, PasteSession,
        Result, WebAuthenticationSession,
    };
}
