//! Error types for authorization operations
//!
//! Every strategy failure is returned as a typed `AuthError`; nothing in
//! this crate panics on a failed protocol step. The variants separate
//! user-correctable problems (missing configuration, a badly pasted
//! callback URL) from fatal ones (state mismatch, rejected exchange).

/// Errors from credential validation and strategy execution.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Required secret keys are absent. Carries the unresolved identifiers
    /// (`box_dev.developer_token` form) so the message names exactly what
    /// to fix.
    #[error("missing required secrets: {}", .0.join(", "))]
    ConfigurationIncomplete(Vec<String>),

    /// The pasted callback URL carries no authorization code. The pending
    /// attempt stays open; the user can paste again.
    #[error("malformed callback URL: {0}")]
    MalformedCallback(String),

    /// The `state` parameter is absent or differs from the pending token.
    /// Fatal for this attempt — authorization must be restarted.
    #[error("state parameter mismatch; restart authorization")]
    AntiForgeryMismatch,

    /// The token endpoint rejected the exchange. The remote response is
    /// surfaced verbatim.
    #[error("authorization rejected: {0}")]
    RemoteAuthorizationFailure(String),

    /// Tokens were obtained but the post-auth identity check failed.
    /// Treated as an authorization failure; nothing is committed.
    #[error("identity verification failed: {0}")]
    IdentityVerificationFailure(String),

    /// Transport-level failure before any protocol-level response.
    #[error("HTTP request failed: {0}")]
    Http(String),
}

/// Result alias for authorization operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_incomplete_lists_identifiers() {
        let err = AuthError::ConfigurationIncomplete(vec![
            "box_dev.developer_token".into(),
            "box_dev.client_id".into(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("box_dev.developer_token"), "got: {msg}");
        assert!(msg.contains("box_dev.client_id"), "got: {msg}");
    }

    #[test]
    fn messages_name_the_failed_step() {
        assert!(
            AuthError::RemoteAuthorizationFailure("400: invalid_grant".into())
                .to_string()
                .contains("invalid_grant")
        );
        assert!(
            AuthError::AntiForgeryMismatch
                .to_string()
                .contains("restart authorization")
        );
    }
}
