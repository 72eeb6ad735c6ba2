//! Callback URL parsing for the delegated flow
//!
//! The user pastes the full redirect URL from the browser address bar.
//! Only the `code` and `state` query parameters matter here; per URL query
//! semantics the first occurrence of a duplicated key is authoritative.

use url::Url;

use crate::error::{AuthError, Result};

/// Query parameters extracted from a pasted redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Parse a pasted redirect URL into its `code` and `state` parameters.
///
/// Input that is not a URL at all is a `MalformedCallback` — the same
/// user-correctable class as a URL with no code, so the caller treats both
/// identically.
pub fn parse_callback(raw: &str) -> Result<CallbackParams> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AuthError::MalformedCallback(format!("not a valid URL: {e}")))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if code.is_none() => code = Some(value.into_owned()),
            "state" if state.is_none() => state = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok(CallbackParams { code, state })
}
