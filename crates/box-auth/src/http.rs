//! reqwest-backed implementation of the Box API capability
//!
//! Both grants POST form-encoded bodies to the token endpoint; the
//! identity check is a bearer GET against `users/me`. Non-success
//! responses are read back and surfaced verbatim in the error message.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use tracing::debug;

use crate::api::{BoxApi, Identity, TokenResponse};
use crate::constants::{CURRENT_USER_ENDPOINT, JWT_BEARER_GRANT_TYPE, TOKEN_ENDPOINT};
use crate::error::{AuthError, Result};

/// Raw `users/me` resource. Only the fields the core needs.
#[derive(Debug, Deserialize)]
struct UserResource {
    name: String,
    #[serde(default)]
    login: Option<String>,
}

/// Box names the enterprise service account behind a JWT app with this
/// login prefix.
const SERVICE_ACCOUNT_LOGIN_PREFIX: &str = "AutomationUser_";

/// Real Box API over HTTP.
pub struct HttpBoxApi {
    client: reqwest::Client,
}

impl HttpBoxApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::Http(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(AuthError::RemoteAuthorizationFailure(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::RemoteAuthorizationFailure(format!(
                "invalid token response: {e}"
            )))
    }
}

impl BoxApi for HttpBoxApi {
    fn exchange_code<'a>(
        &'a self,
        code: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TokenResponse>> + Send + 'a>> {
        Box::pin(async move {
            debug!("exchanging authorization code");
            self.token_grant(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .await
        })
    }

    fn exchange_assertion<'a>(
        &'a self,
        assertion: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TokenResponse>> + Send + 'a>> {
        Box::pin(async move {
            debug!("exchanging signed assertion");
            self.token_grant(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .await
        })
    }

    fn current_user<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Identity>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(CURRENT_USER_ENDPOINT)
                .bearer_auth(access_token)
                .send()
                .await
                .map_err(|e| AuthError::Http(format!("identity request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<no body>"));
                return Err(AuthError::IdentityVerificationFailure(format!(
                    "users/me returned {status}: {body}"
                )));
            }

            let user = response.json::<UserResource>().await.map_err(|e| {
                AuthError::IdentityVerificationFailure(format!("invalid users/me response: {e}"))
            })?;

            let is_service_account = user
                .login
                .as_deref()
                .is_some_and(|l| l.starts_with(SERVICE_ACCOUNT_LOGIN_PREFIX));
            Ok(Identity {
                name: user.name,
                login: user.login,
                is_service_account,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_resource_deserializes() {
        let json = r#"{"type":"user","id":"1","name":"Alice","login":"alice@example.com"}"#;
        let user: UserResource = serde_json::from_str(json).unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.login.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn service_account_detected_by_login_prefix() {
        assert!("AutomationUser_123@boxdevedition.com".starts_with(SERVICE_ACCOUNT_LOGIN_PREFIX));
        assert!(!"alice@example.com".starts_with(SERVICE_ACCOUNT_LOGIN_PREFIX));
    }

    #[test]
    fn grant_type_constants_match_protocol() {
        assert_eq!(TOKEN_ENDPOINT, "https://api.box.com/oauth2/token");
        assert_eq!(
            JWT_BEARER_GRANT_TYPE,
            "urn:ietf:params:oauth:grant-type:jwt-bearer"
        );
    }
}
