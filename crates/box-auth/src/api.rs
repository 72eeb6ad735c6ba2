//! Box API capability abstraction
//!
//! Defines the `BoxApi` trait that decouples the strategy layer from the
//! real Box endpoints. `HttpBoxApi` implements it over reqwest; tests use
//! in-crate mocks. The trait covers exactly the remote capabilities the
//! core consumes: code exchange, assertion exchange, and the "who am I"
//! liveness check.
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
//! (`Arc<dyn BoxApi>`).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::Result;

/// Response from the token endpoint for both code and assertion grants.
///
/// `expires_in` is a delta in seconds from the response time, advisory to
/// the caller; the assertion grant returns no refresh token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// The authenticated principal, fetched once after token acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub login: Option<String>,
    /// True for the enterprise service account behind the assertion grant.
    pub is_service_account: bool,
}

/// Abstraction over the remote Box capabilities the core consumes.
pub trait BoxApi: Send + Sync {
    /// Exchange a delegated authorization code for tokens.
    fn exchange_code<'a>(
        &'a self,
        code: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TokenResponse>> + Send + 'a>>;

    /// Exchange a signed JWT assertion for enterprise tokens.
    fn exchange_assertion<'a>(
        &'a self,
        assertion: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TokenResponse>> + Send + 'a>>;

    /// Fetch the identity behind an access token (liveness check).
    fn current_user<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Identity>> + Send + 'a>>;
}

/// Opaque authenticated handle handed to downstream pages.
///
/// Binds an access token to the API implementation it was issued against.
/// Cloning is cheap; the token string is shared, not re-fetched.
#[derive(Clone)]
pub struct ClientHandle {
    api: Arc<dyn BoxApi>,
    access_token: String,
}

impl ClientHandle {
    pub fn new(api: Arc<dyn BoxApi>, access_token: String) -> Self {
        Self { api, access_token }
    }

    /// The bearer token this handle authenticates with.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Run the "who am I" check through the bound API.
    pub async fn current_user(&self) -> Result<Identity> {
        self.api.current_user(&self.access_token).await
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak the token through Debug
        f.debug_struct("ClientHandle")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
