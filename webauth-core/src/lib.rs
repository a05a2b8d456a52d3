//! # webauth-core
//!
//! Core types, configuration, and error handling for the webauth workspace.
//!
//! This crate provides the pieces every other webauth crate builds on:
//!
//! - **Errors**: [`AuthError`], one variant per way an attempt can fail
//! - **Types**: token and user responses, client credentials
//! - **Identifiers**: the per-attempt [`AuthorizationState`]
//! - **Config**: provider endpoints and the redirect URI
//! - **Callback**: parsing and validating the redirect URL
//!
//! ## Example
//!
//! ```rust
//! use webauth_core::{callback, github_oauth_config, AuthorizationState};
//!
//! let config = github_oauth_config();
//! let state = AuthorizationState::new();
//!
//! let callback_url = format!("{}?code=abc&state={}", config.redirect_uri, state);
//! let code = callback::validate_callback(&callback_url, &state).unwrap();
//! assert_eq!(code, "abc");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod callback;
pub mod config;
pub mod errors;
pub mod identifier;
pub mod types;

// Re-exports for convenience
pub use callback::{validate_callback, CallbackParams};
pub use config::{github_oauth_config, OAuthConfig, DEFAULT_REDIRECT_URI, GITHUB_API_VERSION};
pub use errors::{AuthError, Result};
pub use identifier::AuthorizationState;
pub use types::{AccessTokenResponse, AuthenticatedUser, ClientCredentials, OAuthErrorBody};
