//! Local HTTP callback server for loopback redirects.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;
use webauth_core::{AuthError, OAuthConfig, Result};

use crate::session::WebAuthenticationSession;

/// Session that captures an `http://127.0.0.1:<port>/<path>` redirect.
///
/// The authorize URL is printed for the user to open. The session then
/// listens on the redirect URI's host and port until the browser comes back,
/// or until the timeout elapses, which counts as cancellation.
#[derive(Debug, Clone)]
pub struct LoopbackSession {
    redirect_uri: Url,
    timeout: Duration,
}

impl LoopbackSession {
    /// Create a session for the given redirect URI.
    pub fn new(redirect_uri: &str, timeout: Duration) -> Result<Self> {
        let redirect_uri = Url::parse(redirect_uri).map_err(|e| {
            AuthError::configuration(format!("invalid redirect URI {}: {}", redirect_uri, e))
        })?;
        if redirect_uri.scheme() != "http" || redirect_uri.port().is_none() {
            return Err(AuthError::configuration(format!(
                "loopback redirect URI needs http and an explicit port, got {}",
                redirect_uri
            )));
        }
        Ok(Self {
            redirect_uri,
            timeout,
        })
    }

    /// Create a session from the redirect URI and timeout in `config`.
    pub fn from_config(config: &OAuthConfig) -> Result<Self> {
        Self::new(
            &config.redirect_uri,
            Duration::from_secs(config.callback_timeout_secs),
        )
    }

    fn bind_addr(&self) -> String {
        format!(
            "{}:{}",
            self.redirect_uri.host_str().unwrap_or("127.0.0.1"),
            self.redirect_uri.port().unwrap_or_default()
        )
    }

    /// Accept connections until one hits the redirect path.
    ///
    /// A connection that fails to accept or read is dropped and the wait goes
    /// on; only the caller's timeout ends it.
    async fn accept_callback(&self, listener: TcpListener) -> String {
        loop {
            let (mut stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to accept loopback connection");
                    continue;
                }
            };
            tracing::debug!(%peer, "Loopback connection");

            let mut buffer = [0u8; 4096];
            let n = match stream.read(&mut buffer).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(%peer, error = %e, "Failed to read loopback request");
                    continue;
                }
            };
            let request = String::from_utf8_lossy(&buffer[..n]);

            match self.parse_callback_request(&request) {
                Some(callback) => {
                    let has_code = callback.query_pairs().any(|(k, _)| k == "code");
                    let response = if has_code {
                        success_response()
                    } else {
                        error_response("The authorization server did not return a code.")
                    };
                    respond(&mut stream, &response).await;
                    return callback.to_string();
                }
                None => respond(&mut stream, &not_found_response()).await,
            }
        }
    }

    /// Parse `GET /callback?code=xxx&state=yyy HTTP/1.1` into a full URL.
    fn parse_callback_request(&self, request: &str) -> Option<Url> {
        let first_line = request.lines().next()?;
        let mut parts = first_line.split_whitespace();
        if parts.next()? != "GET" {
            return None;
        }
        let target = parts.next()?;

        let callback = self.redirect_uri.join(target).ok()?;
        if callback.path() != self.redirect_uri.path() {
            return None;
        }
        Some(callback)
    }
}

#[async_trait]
impl WebAuthenticationSession for LoopbackSession {
    async fn authenticate(&self, authorize_url: &Url, callback_scheme: &str) -> Result<String> {
        if callback_scheme != self.redirect_uri.scheme() {
            return Err(AuthError::configuration(format!(
                "loopback session cannot capture {}:// redirects",
                callback_scheme
            )));
        }

        let addr = self.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AuthError::SessionFailed(format!("failed to listen on {}: {}", addr, e)))?;

        tracing::info!(%addr, "Waiting for browser redirect");
        println!("Open this URL in your browser to continue:\n\n  {}\n", authorize_url);

        match tokio::time::timeout(self.timeout, self.accept_callback(listener)).await {
            Ok(callback) => Ok(callback),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "No redirect before timeout");
                Err(AuthError::UserCancelled)
            }
        }
    }
}

async fn respond(stream: &mut TcpStream, response: &str) {
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        tracing::debug!(error = %e, "Failed to answer loopback request");
    }
}

fn success_response() -> String {
    let body = r#"<!DOCTYPE html>
<html>
<head><title>Authorization Complete</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px;">
<h1>Authorization complete</h1>
<p>You can close this window and return to the application.</p>
</body>
</html>"#;
    http_response("200 OK", body)
}

fn error_response(message: &str) -> String {
    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Authorization Failed</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px;">
<h1>Authorization failed</h1>
<p>{}</p>
</body>
</html>"#,
        message
    );
    http_response("400 Bad Request", &body)
}

fn not_found_response() -> String {
    http_response("404 Not Found", "")
}

fn http_response(status: &str, body: &str) -> String {
    format!(
        concat!(
            "HTTP/1.1 {}\r\n",
            "Content-Type: text/html\r\n",
            "Content-Length: {}\r\n",
            "Connection: close\r\n\r\n{}"
        ),
        status,
        body.len(),
        body
    )
}
