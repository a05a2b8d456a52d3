//! Callback URL parsing and state validation.

use url::Url;

use crate::errors::{AuthError, Result};
use crate::identifier::AuthorizationState;

/// Query parameters carried by the redirect back into the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code
    pub code: Option<String>,
    /// State echoed back by the provider
    pub state: Option<String>,
    /// OAuth error code, when the provider reports a failure
    pub error: Option<String>,
    /// Description accompanying `error`
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse the query string of a callback URL.
    pub fn parse(callback_url: &str) -> Result<Self> {
        let url = Url::parse(callback_url)
            .map_err(|e| AuthError::invalid_callback(format!("malformed callback URL: {}", e)))?;

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let value = Some(value.into_owned());
            match key.as_ref() {
                "code" => params.code = value,
                "state" => params.state = value,
                "error" => params.error = value,
                "error_description" => params.error_description = value,
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Validate a callback URL against the state sent at initiation.
///
/// Returns the authorization code. The state is consumed by the comparison;
/// a mismatch is [`AuthError::StateMismatch`].
pub fn validate_callback(callback_url: &str, expected: &AuthorizationState) -> Result<String> {
    let params = CallbackParams::parse(callback_url)?;

    if let Some(error) = params.error {
        if error == "access_denied" {
            return Err(AuthError::UserCancelled);
        }
        let message = match params.error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        };
        return Err(AuthError::invalid_callback(message));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::invalid_callback("missing code parameter"))?;
    let state = params
        .state
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::invalid_callback("missing state parameter"))?;

    if !expected.matches(&state) {
        return Err(AuthError::StateMismatch {
            expected: expected.to_string(),
            actual: state,
        });
    }

    Ok(code)
}
