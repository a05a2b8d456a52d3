//! The authorization-code flow.
//!
//! [`authorize`] drives one attempt through
//!
//! ```text
//! Idle -> Authorizing -> (CallbackReceived | Cancelled) -> StateValidated
//!      -> TokenRequested -> TokenReceived -> UserRequested -> Done
//! ```
//!
//! Any failure jumps straight to `Done` with a failure message. There is no
//! retry transition. The UI-facing state (in-flight flag, last message) lives
//! in a [`FlowState`] value that is passed in and handed back.

use chrono::{DateTime, Utc};
use std::fmt;
use webauth_core::{AuthError, ClientCredentials, Result};
use webauth_providers::OAuthProvider;

use crate::initiator::AuthorizationRequest;
use crate::session::WebAuthenticationSession;

/// Phase of the current or most recent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    /// No attempt has started.
    Idle,
    /// The session is presenting the authorize URL.
    Authorizing,
    /// The session returned a callback URL.
    CallbackReceived,
    /// The user cancelled in the browser.
    Cancelled,
    /// The callback state matched.
    StateValidated,
    /// Waiting on the token endpoint.
    TokenRequested,
    /// The token endpoint answered with a token.
    TokenReceived,
    /// Waiting on the user endpoint.
    UserRequested,
    /// The attempt finished; see [`FlowState::last_response`].
    Done,
}

/// Message shown to the user when an attempt finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The attempt succeeded, e.g. `Hello, octocat!`.
    Success(String),
    /// The attempt failed.
    Failure(String),
}

impl FlowOutcome {
    /// The text to display.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
        }
    }

    /// Whether the attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl fmt::Display for FlowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// UI state for the authorization flow.
///
/// `is_authorizing` is authoritative: while it is set, [`authorize`] refuses
/// to start another attempt. Because [`authorize`] owns the state for the
/// whole attempt, callers only ever observe `Idle` or `Done` phases (or
/// `Authorizing` after a manual [`FlowState::begin`]).
#[derive(Debug)]
pub struct FlowState {
    phase: FlowPhase,
    is_authorizing: bool,
    last_response: Option<FlowOutcome>,
    last_error: Option<AuthError>,
    finished_at: Option<DateTime<Utc>>,
}

impl FlowState {
    /// A fresh, idle state.
    pub fn new() -> Self {
        Self {
            phase: FlowPhase::Idle,
            is_authorizing: false,
            last_response: None,
            last_error: None,
            finished_at: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    /// Whether an attempt is in flight.
    pub fn is_authorizing(&self) -> bool {
        self.is_authorizing
    }

    /// Whether a new attempt may start.
    ///
    /// [`authorize`] takes the state by value, so while it runs nobody else
    /// holds it; ownership already keeps attempts from overlapping. The flag
    /// only matters for a state that was [`begin`](Self::begin)-marked by
    /// hand, and the intermediate phases are recorded for logging.
    pub fn can_start(&self) -> bool {
        !self.is_authorizing
    }

    /// Outcome of the most recent finished attempt.
    pub fn last_response(&self) -> Option<&FlowOutcome> {
        self.last_response.as_ref()
    }

    /// Error behind the most recent failure.
    pub fn last_error(&self) -> Option<&AuthError> {
        self.last_error.as_ref()
    }

    /// When the most recent attempt finished.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Mark an attempt as started.
    ///
    /// Fails with [`AuthError::AttemptInProgress`] if one already is.
    pub fn begin(&mut self) -> Result<()> {
        if self.is_authorizing {
            return Err(AuthError::AttemptInProgress);
        }
        self.is_authorizing = true;
        self.last_error = None;
        self.transition(FlowPhase::Authorizing);
        Ok(())
    }

    fn transition(&mut self, next: FlowPhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "Flow transition");
        self.phase = next;
    }

    fn finish(&mut self, result: Result<String>) {
        let outcome = match result {
            Ok(message) => {
                tracing::info!("Authorization succeeded");
                FlowOutcome::Success(message)
            }
            Err(err) => {
                if err.is_cancelled() {
                    self.transition(FlowPhase::Cancelled);
                }
                tracing::error!(error = %err, "Authorization failed");
                let outcome = FlowOutcome::Failure(format!("Authorization failed: {}", err));
                self.last_error = Some(err);
                outcome
            }
        };

        self.transition(FlowPhase::Done);
        self.last_response = Some(outcome);
        self.finished_at = Some(Utc::now());
        self.is_authorizing = false;
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one authorization attempt and return the updated state.
///
/// Credentials are checked before anything else, so a missing client id or
/// secret never reaches the session or the network. If an attempt is already
/// in flight nothing runs; the refusal is recorded as
/// [`AuthError::AttemptInProgress`] and the phase is left alone.
pub async fn authorize<P, S>(
    mut state: FlowState,
    provider: &P,
    session: &S,
    credentials: &ClientCredentials,
) -> FlowState
where
    P: OAuthProvider + ?Sized,
    S: WebAuthenticationSession + ?Sized,
{
    if let Err(err) = state.begin() {
        tracing::warn!(error = %err, "Ignoring authorization request");
        state.last_error = Some(err);
        return state;
    }

    let result = run_attempt(&mut state, provider, session, credentials).await;
    state.finish(result);
    state
}

async fn run_attempt<P, S>(
    state: &mut FlowState,
    provider: &P,
    session: &S,
    credentials: &ClientCredentials,
) -> Result<String>
where
    P: OAuthProvider + ?Sized,
    S: WebAuthenticationSession + ?Sized,
{
    credentials.validate()?;

    let request = AuthorizationRequest::new(provider.config(), &credentials.client_id)?;
    tracing::info!(provider = provider.name(), "Starting authorization");

    let callback = session
        .authenticate(request.url(), request.callback_scheme())
        .await?;
    state.transition(FlowPhase::CallbackReceived);

    let code = request.validate(&callback)?;
    state.transition(FlowPhase::StateValidated);

    state.transition(FlowPhase::TokenRequested);
    let token = provider.generate_access_token(credentials, &code).await?;
    state.transition(FlowPhase::TokenReceived);

    state.transition(FlowPhase::UserRequested);
    let user = provider.get_authenticated_user(&token.access_token).await?;

    Ok(user.greeting())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use url::Url;
    use webauth_core::github_oauth_config;
    use webauth_providers::{GitHubProvider, MockProvider};

    /// Session that echoes the request's state back with a fixed code.
    fn echo_session(code: &'static str) -> impl WebAuthenticationSession {
        move |url: Url, scheme: String| async move {
            let state = url
                .query_pairs()
                .find(|(k, _)| k == "state")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            Ok::<_, AuthError>(format!("{}://?code={}&state={}", scheme, code, state))
        }
    }

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("Iv1.client", "secret")
    }

    #[tokio::test]
    async fn test_successful_attempt() {
        let provider = MockProvider::new().with_token("abc").with_user("octocat");

        let state = authorize(
            FlowState::new(),
            &provider,
            &echo_session("code-1"),
            &credentials(),
        )
        .await;

        assert_eq!(
            state.last_response(),
            Some(&FlowOutcome::Success("Hello, octocat!".to_string()))
        );
        assert_eq!(state.phase(), FlowPhase::Done);
        assert!(!state.is_authorizing());
        assert!(state.finished_at().is_some());
        assert_eq!(provider.token_calls(), vec!["code-1"]);
        assert_eq!(provider.user_calls(), vec!["abc"]);
    }

    #[tokio::test]
    async fn test_state_mismatch_never_exchanges_token() {
        let provider = MockProvider::new().with_token("abc").with_user("octocat");
        let session = |_url: Url, scheme: String| async move {
            Ok::<_, AuthError>(format!("{}://?code=abc&state=forged", scheme))
        };

        let state = authorize(FlowState::new(), &provider, &session, &credentials()).await;

        assert!(matches!(state.last_error(), Some(AuthError::StateMismatch { .. })));
        let outcome = state.last_response().unwrap();
        assert!(!outcome.is_success());
        assert!(!outcome.message().contains("forged"));
        assert!(provider.token_calls().is_empty());
        assert!(provider.user_calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_code_is_invalid_callback() {
        let provider = MockProvider::new();
        let session = |url: Url, scheme: String| async move {
            let state = url
                .query_pairs()
                .find(|(k, _)| k == "state")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            Ok::<_, AuthError>(format!("{}://?state={}", scheme, state))
        };

        let state = authorize(FlowState::new(), &provider, &session, &credentials()).await;

        assert!(matches!(state.last_error(), Some(AuthError::InvalidCallback(_))));
        assert!(provider.token_calls().is_empty());
    }

    #[tokio::test]
    async fn test_token_failure_never_looks_up_user() {
        let provider = MockProvider::new()
            .with_token_error(AuthError::http(401))
            .with_user("octocat");

        let state = authorize(
            FlowState::new(),
            &provider,
            &echo_session("c"),
            &credentials(),
        )
        .await;

        assert_eq!(state.last_error().and_then(AuthError::status), Some(401));
        assert_eq!(provider.token_calls(), vec!["c"]);
        assert!(provider.user_calls().is_empty());
    }

    #[tokio::test]
    async fn test_user_failure_is_reported() {
        let provider = MockProvider::new()
            .with_token("abc")
            .with_user_error(AuthError::http(403));

        let state = authorize(
            FlowState::new(),
            &provider,
            &echo_session("c"),
            &credentials(),
        )
        .await;

        assert_eq!(
            state.last_response(),
            Some(&FlowOutcome::Failure(
                "Authorization failed: Invalid response: unexpected HTTP status 403".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_cancellation_passes_through_cancelled() {
        let provider = MockProvider::new();
        let session =
            |_url: Url, _scheme: String| async move { Err::<String, _>(AuthError::UserCancelled) };

        let state = authorize(FlowState::new(), &provider, &session, &credentials()).await;

        assert!(state.last_error().unwrap().is_cancelled());
        assert_eq!(state.phase(), FlowPhase::Done);
        assert!(!state.is_authorizing());
        assert!(provider.token_calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_credentials_short_circuit() {
        let provider = MockProvider::new().with_token("abc").with_user("octocat");
        let presented = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&presented);
        let session = move |_url: Url, scheme: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, AuthError>(format!("{}://?code=abc&state=s", scheme)) }
        };

        for credentials in [
            ClientCredentials::new("", "secret"),
            ClientCredentials::new("Iv1.client", ""),
        ] {
            let state = authorize(FlowState::new(), &provider, &session, &credentials).await;
            assert!(matches!(
                state.last_error(),
                Some(AuthError::ConfigurationMissing(_))
            ));
        }

        assert_eq!(presented.load(Ordering::SeqCst), 0);
        assert!(provider.token_calls().is_empty());
        assert!(provider.user_calls().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_attempt_refuses_second() {
        let provider = MockProvider::new().with_token("abc").with_user("octocat");
        let mut state = FlowState::new();
        state.begin().unwrap();
        assert!(!state.can_start());

        let state = authorize(state, &provider, &echo_session("c"), &credentials()).await;

        assert!(state.is_authorizing());
        assert_eq!(state.phase(), FlowPhase::Authorizing);
        assert!(matches!(state.last_error(), Some(AuthError::AttemptInProgress)));
        assert!(state.last_response().is_none());
        assert!(provider.token_calls().is_empty());
    }

    #[tokio::test]
    async fn test_state_is_reusable_after_done() {
        let provider = MockProvider::new()
            .with_token_error(AuthError::http(500))
            .with_token("abc")
            .with_user("octocat");

        let state = authorize(
            FlowState::new(),
            &provider,
            &echo_session("c1"),
            &credentials(),
        )
        .await;
        assert!(state.can_start());
        assert!(state.last_error().is_some());

        let state = authorize(state, &provider, &echo_session("c2"), &credentials()).await;
        assert!(state.last_error().is_none());
        assert_eq!(state.last_response().map(FlowOutcome::message), Some("Hello, octocat!"));
    }

    #[tokio::test]
    async fn test_each_attempt_uses_fresh_state() {
        let provider = MockProvider::new()
            .with_token("a")
            .with_user("octocat")
            .with_token("b")
            .with_user("octocat");
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let session = move |url: Url, scheme: String| {
            let state = url
                .query_pairs()
                .find(|(k, _)| k == "state")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            record.lock().unwrap().push(state.clone());
            async move { Ok::<_, AuthError>(format!("{}://?code=c&state={}", scheme, state)) }
        };

        let state = authorize(FlowState::new(), &provider, &session, &credentials()).await;
        let _ = authorize(state, &provider, &session, &credentials()).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn test_end_to_end_against_http_server() {
        use serde_json::json;
        use wiremock::matchers::{header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(query_param("code", "real-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "abc",
                "expires_in": 3600,
                "refresh_token": "r",
                "refresh_token_expires_in": 7200,
                "scope": "repo",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "octocat"})))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            GitHubProvider::from_config(github_oauth_config().with_api_base(&server.uri()));
        let state = authorize(
            FlowState::new(),
            &provider,
            &echo_session("real-code"),
            &credentials(),
        )
        .await;

        assert_eq!(
            state.last_response(),
            Some(&FlowOutcome::Success("Hello, octocat!".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unauthorized_token_never_reaches_user_endpoint() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider =
            GitHubProvider::from_config(github_oauth_config().with_api_base(&server.uri()));
        let state = authorize(
            FlowState::new(),
            &provider,
            &echo_session("c"),
            &credentials(),
        )
        .await;

        assert!(matches!(
            state.last_error(),
            Some(AuthError::InvalidResponse { status: Some(401), .. })
        ));
    }
}
