//! Sign in with GitHub from the terminal.
//!
//! ```text
//! GITHUB_CLIENT_ID=... GITHUB_CLIENT_SECRET=... webauth \
//!     --redirect-uri http://127.0.0.1:8765/callback
//! ```
//!
//! With the default custom-scheme redirect URI the browser cannot reach this
//! process, so the callback URL is pasted back on stdin.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use webauth::prelude::*;
use webauth::DEFAULT_REDIRECT_URI;

/// How the callback URL gets back to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SessionKind {
    /// Listen on the `http://127.0.0.1:<port>` redirect URI.
    Loopback,
    /// Read the callback URL from stdin.
    Paste,
}

#[derive(Debug, Parser)]
#[command(
    name = "webauth",
    version,
    about = "Sign in with GitHub using the OAuth authorization-code flow"
)]
struct Args {
    /// OAuth app client id.
    #[arg(long, env = "GITHUB_CLIENT_ID", default_value = "", hide_env_values = true)]
    client_id: String,

    /// OAuth app client secret.
    #[arg(long, env = "GITHUB_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    client_secret: String,

    /// Redirect URI registered for the OAuth app.
    #[arg(long, default_value = DEFAULT_REDIRECT_URI)]
    redirect_uri: String,

    /// Session used to capture the redirect. Picked from the redirect URI if omitted.
    #[arg(long, value_enum)]
    session: Option<SessionKind>,

    /// Seconds to wait for the browser redirect.
    #[arg(long, default_value_t = 300)]
    timeout: u64,
}

impl Args {
    fn session_kind(&self) -> SessionKind {
        self.session.unwrap_or_else(|| {
            if self.redirect_uri.starts_with("http://") {
                SessionKind::Loopback
            } else {
                SessionKind::Paste
            }
        })
    }

    fn config(&self) -> OAuthConfig {
        github_oauth_config()
            .with_redirect_uri(&self.redirect_uri)
            .with_timeout(self.timeout)
    }

    fn credentials(&self) -> ClientCredentials {
        ClientCredentials::new(&self.client_id, &self.client_secret)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let provider = GitHubProvider::from_config(args.config());
    let credentials = args.credentials();

    let state = match args.session_kind() {
        SessionKind::Loopback => {
            let session = LoopbackSession::new(
                &provider.config().redirect_uri,
                Duration::from_secs(args.timeout),
            )?;
            authorize(FlowState::new(), &provider, &session, &credentials).await
        }
        SessionKind::Paste => {
            let session = PasteSession::stdin();
            authorize(FlowState::new(), &provider, &session, &credentials).await
        }
    };

    let greeting = report(&state)?;
    println!("{}", greeting);
    Ok(())
}

/// Log the outcome of a finished attempt and turn a failure into an error.
fn report(state: &FlowState) -> Result<String> {
    match state.last_response() {
        Some(FlowOutcome::Success(message)) => {
            tracing::info!(phase = ?state.phase(), "Signed in");
            Ok(message.clone())
        }
        Some(FlowOutcome::Failure(message)) => {
            tracing::error!(phase = ?state.phase(), "Sign-in failed");
            anyhow::bail!("{}", message)
        }
        None => anyhow::bail!("authorization did not run"),
    }
}
