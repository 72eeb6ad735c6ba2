//! Anti-forgery state token for the delegated authorization flow
//!
//! One token is generated per authorization URL and must come back
//! unchanged in the callback's `state` parameter. A token is consumed by a
//! single attempt: starting a new authorization overwrites any stale
//! pending value, and a mismatch discards it entirely.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

/// Opaque one-time state token bound to a single delegated attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    /// Generate a fresh random token.
    ///
    /// 32 random bytes encoded as URL-safe base64 (no padding) — safe to
    /// embed directly as a URL query value.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// The token as the string sent in the authorization URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact-match check against the `state` value from a callback.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}
