//! Error types for session coordination

use box_auth::AuthError;

/// Errors from coordinator operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A second transition was attempted while one is executing. The
    /// caller retries after the in-flight attempt settles; nothing is
    /// queued.
    #[error("another authorization attempt is already executing")]
    Busy,

    /// The requested operation is not legal in the current phase.
    #[error("operation not valid in the current state: {0}")]
    InvalidTransition(String),

    /// A strategy-level failure, passed through unchanged.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result alias for coordinator operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_pass_through_verbatim() {
        let err: Error = AuthError::AntiForgeryMismatch.into();
        assert_eq!(err.to_string(), AuthError::AntiForgeryMismatch.to_string());
    }

    #[test]
    fn busy_message_names_the_condition() {
        assert!(Error::Busy.to_string().contains("already executing"));
    }
}
