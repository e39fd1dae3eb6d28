use api::ApiError;
use thiserror::Error;

/// Why a user action did not go through.
///
/// Every variant leaves the action retryable: controllers roll back whatever
/// they showed tentatively before returning one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action needs a signed-in user and there is none.
    #[error("sign in to continue")]
    SignInRequired,

    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    /// The same control already has a mutation in flight.
    #[error("already in progress")]
    Busy,

    /// The backend answered 401 and the session has been signed out.
    #[error("your session has expired, sign in again")]
    SessionExpired,

    #[error("{0}")]
    Failed(String),

    /// The owning screen went away before the call resolved.
    #[error("cancelled")]
    Cancelled,
}

impl ActionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ActionError::Invalid(message.into())
    }

    /// Map a backend error onto what the user is told. `fallback` is used
    /// when neither the backend nor the transport said anything useful.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Unauthorized { .. } => ActionError::SessionExpired,
            ApiError::NotAuthenticated => ActionError::SignInRequired,
            other => ActionError::Failed(other.user_message(fallback)),
        }
    }

    /// Whether the session is gone and the user must sign in again.
    pub fn needs_sign_in(&self) -> bool {
        matches!(self, ActionError::SignInRequired | ActionError::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api() {
        assert_eq!(
            ActionError::from_api(&ApiError::Unauthorized { detail: None }, "x"),
            ActionError::SessionExpired
        );
        assert_eq!(
            ActionError::from_api(&ApiError::NotAuthenticated, "x"),
            ActionError::SignInRequired
        );
        assert_eq!(
            ActionError::from_api(
                &ApiError::Rejected {
                    status: 422,
                    detail: Some("rating out of range".to_string())
                },
                "Could not submit review"
            ),
            ActionError::Failed("rating out of range".to_string())
        );
        assert_eq!(
            ActionError::from_api(
                &ApiError::Rejected {
                    status: 500,
                    detail: None
                },
                "Could not submit review"
            )
            .to_string(),
            "Could not submit review"
        );
    }
}
