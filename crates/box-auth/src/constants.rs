//! Box OAuth 2.0 endpoints and protocol constants
//!
//! Endpoint URLs are not secrets — they identify the Box authorization
//! server and API. The actual credentials (client secrets, tokens, key
//! material) come from the secret store.

/// Authorization endpoint for the interactive code grant
pub const AUTHORIZE_ENDPOINT: &str = "https://account.box.com/api/oauth2/authorize";

/// Token endpoint for code exchange and assertion exchange
pub const TOKEN_ENDPOINT: &str = "https://api.box.com/oauth2/token";

/// "Who am I" endpoint used as the post-auth liveness check
pub const CURRENT_USER_ENDPOINT: &str = "https://api.box.com/2.0/users/me";

/// Default redirect target when `box_oauth.redirect_uri` is not configured
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8501/";

/// Grant type for the signed-assertion exchange (RFC 7523)
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion validity window. Box rejects `exp` more than 60 seconds out,
/// so the assertion is stamped well inside that limit.
pub const ASSERTION_LIFETIME_SECS: u64 = 45;

/// Developer tokens expire 60 minutes after issuance. Advisory only —
/// the core never proactively invalidates the session.
pub const DEVELOPER_TOKEN_LIFETIME_SECS: u64 = 3600;
