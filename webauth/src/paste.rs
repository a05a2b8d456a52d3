//! Session for custom-scheme redirects that the user pastes back.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use url::Url;
use webauth_core::{AuthError, Result};

use crate::session::WebAuthenticationSession;

/// Prints the authorize URL and reads the callback URL from a reader.
///
/// Meant for redirect URIs like `net.mtgto.examplewebauthenticationsession://`
/// that no local process can listen on: the browser shows the final URL and
/// the user copies it back. An empty line or end of input is cancellation.
#[derive(Debug)]
pub struct PasteSession<R> {
    reader: Mutex<R>,
}

impl PasteSession<BufReader<Stdin>> {
    /// Read the callback URL from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> PasteSession<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Read the callback URL from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

#[async_trait]
impl<R> WebAuthenticationSession for PasteSession<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn authenticate(&self, authorize_url: &Url, callback_scheme: &str) -> Result<String> {
        println!("Open this URL in your browser to continue:\n\n  {}\n", authorize_url);
        println!("Then paste the {}:// URL you were redirected to:", callback_scheme);

        let mut line = String::new();
        let read = self
            .reader
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(|e| AuthError::SessionFailed(format!("failed to read callback URL: {}", e)))?;

        let callback = line.trim();
        if read == 0 || callback.is_empty() {
            return Err(AuthError::UserCancelled);
        }

        let prefix = format!("{}:", callback_scheme);
        if !callback.starts_with(&prefix) {
            return Err(AuthError::invalid_callback(format!(
                "expected a {}:// URL",
                callback_scheme
            )));
        }

        Ok(callback.to_string())
    }
}
