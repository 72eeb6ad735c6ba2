//! The three authorization strategies
//!
//! A closed set of strategies, each driving its protocol to a uniform
//! `Result<TokenBundle, AuthError>`. The delegated flow is two-step
//! (issue URL, complete callback); assertion and static token are
//! single-step. Identity verification and session commit belong to the
//! coordinator — this module ends at token acquisition.

use serde::Deserialize;
use tracing::{info, warn};

use common::{Secret, SecretStore};

use crate::antiforgery::AntiForgeryToken;
use crate::api::BoxApi;
use crate::assertion::{self, AssertionConfig};
use crate::callback;
use crate::constants::{AUTHORIZE_ENDPOINT, DEFAULT_REDIRECT_URI, DEVELOPER_TOKEN_LIFETIME_SECS};
use crate::error::{AuthError, Result};
use crate::validator;

/// Which credential strategy a session is using. Exactly one is active at
/// a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    DelegatedCode,
    SignedAssertion,
    StaticToken,
}

impl StrategyKind {
    /// Strategy label for logging and status display.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::DelegatedCode => "oauth",
            StrategyKind::SignedAssertion => "jwt",
            StrategyKind::StaticToken => "developer-token",
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "oauth" | "oauth2" | "delegated" => Ok(StrategyKind::DelegatedCode),
            "jwt" | "assertion" => Ok(StrategyKind::SignedAssertion),
            "dev" | "developer-token" | "token" => Ok(StrategyKind::StaticToken),
            other => Err(format!(
                "unknown strategy '{other}' (expected oauth, jwt, or dev)"
            )),
        }
    }
}

/// Token material held by the session after a strategy completes.
#[derive(Debug, Clone)]
pub struct TokenBundle {
    pub access_token: String,
    /// Retained for a future refresh capability; the static token has none.
    pub refresh_token: Option<String>,
    pub issued_for: StrategyKind,
    /// Advisory lifetime in seconds, never enforced here.
    pub expires_in: Option<u64>,
}

impl TokenBundle {
    /// Whether this bundle can be renewed without re-authentication.
    pub fn is_refreshable(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// The `box_oauth` secrets section.
#[derive(Debug, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn oauth_config(store: &SecretStore) -> Result<OAuthConfig> {
    validator::validate(StrategyKind::DelegatedCode, store)?;
    store
        .parse_section("box_oauth")
        .map_err(|e| AuthError::ConfigurationIncomplete(vec![format!("box_oauth ({e})")]))
}

/// Start a delegated authorization attempt.
///
/// Returns the URL the user must open plus the fresh state token the
/// caller stores as pending. Any previously pending token is simply
/// superseded — one outstanding attempt at a time.
pub fn begin_authorization(store: &SecretStore) -> Result<(String, AntiForgeryToken)> {
    let config = oauth_config(store)?;
    let token = AntiForgeryToken::generate();

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("state", token.as_str())
        .finish();
    let authorization_url = format!("{AUTHORIZE_ENDPOINT}?{query}");

    info!(redirect_uri = %config.redirect_uri, "authorization URL issued");
    Ok((authorization_url, token))
}

/// Complete a delegated attempt from the pasted redirect URL.
///
/// A URL without a `code` is user-correctable (`MalformedCallback`, the
/// pending token stays valid for a retry). A `state` that is absent or
/// differs from `pending` is fatal for the attempt: `AntiForgeryMismatch`
/// is returned before the exchange capability is ever invoked.
pub async fn complete_authorization(
    api: &dyn BoxApi,
    store: &SecretStore,
    callback_url: &str,
    pending: &AntiForgeryToken,
) -> Result<TokenBundle> {
    let params = callback::parse_callback(callback_url)?;

    let code = params.code.ok_or_else(|| {
        AuthError::MalformedCallback(
            "paste the full redirect URL including the '...&code=...' parameter".into(),
        )
    })?;

    match params.state.as_deref() {
        Some(state) if pending.matches(state) => {}
        _ => {
            warn!("state parameter absent or mismatched in callback");
            return Err(AuthError::AntiForgeryMismatch);
        }
    }

    let config = oauth_config(store)?;
    let response = api
        .exchange_code(&code, &config.client_id, config.client_secret.expose())
        .await?;

    info!("authorization code exchanged");
    Ok(TokenBundle {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        issued_for: StrategyKind::DelegatedCode,
        expires_in: response.expires_in,
    })
}

/// Run the signed-assertion strategy to completion.
///
/// The structural gate runs first: an incomplete `box_jwt` section is a
/// configuration error and no signing is attempted.
pub async fn execute_assertion(api: &dyn BoxApi, store: &SecretStore) -> Result<TokenBundle> {
    validator::validate(StrategyKind::SignedAssertion, store)?;

    let config: AssertionConfig = store
        .parse_section("box_jwt")
        .map_err(|e| AuthError::ConfigurationIncomplete(vec![format!("box_jwt ({e})")]))?;

    let signed = assertion::build_assertion(&config)?;
    let response = api
        .exchange_assertion(
            &signed,
            &config.app_settings.client_id,
            config.app_settings.client_secret.expose(),
        )
        .await?;

    info!(enterprise_id = %config.enterprise_id, "signed assertion exchanged");
    Ok(TokenBundle {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        issued_for: StrategyKind::SignedAssertion,
        expires_in: response.expires_in,
    })
}

/// Wrap the pre-issued developer token as a credential.
///
/// No network call — liveness is the coordinator's identity check. The
/// bundle carries the advisory 60-minute lifetime and no refresh token.
pub fn execute_static(store: &SecretStore) -> Result<TokenBundle> {
    validator::validate(StrategyKind::StaticToken, store)?;

    let token = store
        .resolve_str("box_dev", "developer_token")
        .ok_or_else(|| {
            AuthError::ConfigurationIncomplete(vec!["box_dev.developer_token".into()])
        })?;

    warn!("developer token in use; it expires 60 minutes after issuance and cannot be refreshed");
    Ok(TokenBundle {
        access_token: token.to_string(),
        refresh_token: None,
        issued_for: StrategyKind::StaticToken,
        expires_in: Some(DEVELOPER_TOKEN_LIFETIME_SECS),
    })
}
