//! Web authentication session capability.
//!
//! A session presents the authorize URL to the user in a browser-like surface
//! and resolves with the full callback URL once the provider redirects back.
//! It suspends the caller without blocking a thread, and fails when the user
//! cancels or the surface errors.
//!
//! Any async closure `(Url, String) -> Result<String>` is a session, which is
//! how tests inject canned callbacks:
//!
//! ```rust
//! use url::Url;
//! use webauth::WebAuthenticationSession;
//! use webauth_core::AuthError;
//!
//! let session = |_url: Url, scheme: String| async move {
//!     Ok::<_, AuthError>(format!("{}://?code=abc&state=s1", scheme))
//! };
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let url = Url::parse("https://github.com/login/oauth/authorize").unwrap();
//! let callback = runtime
//!     .block_on(session.authenticate(&url, "myapp"))
//!     .unwrap();
//! assert_eq!(callback, "myapp://?code=abc&state=s1");
//! ```

use async_trait::async_trait;
use std::future::Future;
use url::Url;
use webauth_core::Result;

/// Presents an authorize URL and captures the redirect back into the app.
#[async_trait]
pub trait WebAuthenticationSession: Send + Sync {
    /// Show `authorize_url` and wait for a redirect using `callback_scheme`.
    ///
    /// Returns the full callback URL. Cancellation is
    /// [`AuthError::UserCancelled`](webauth_core::AuthError::UserCancelled).
    async fn authenticate(&self, authorize_url: &Url, callback_scheme: &str) -> Result<String>;
}

#[async_trait]
impl<F, Fut> WebAuthenticationSession for F
where
    F: Fn(Url, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    async fn authenticate(&self, authorize_url: &Url, callback_scheme: &str) -> Result<String> {
        (self)(authorize_url.clone(), callback_scheme.to_string()).await
    }
}
