//! Errors surfaced by backend calls.

use thiserror::Error;

/// Everything that can go wrong between a caller and the review backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The gateway has already logged the session out.
    #[error("{}", unauthorized_message(.detail))]
    Unauthorized { detail: Option<String> },

    /// Any other non-2xx answer.
    #[error("{}", rejected_message(.status, .detail))]
    Rejected { status: u16, detail: Option<String> },

    /// A call that requires a bearer token was attempted without one.
    #[error("not signed in")]
    NotAuthenticated,

    /// The request never produced a response (DNS, TLS, timeout, offline).
    #[error("{0}")]
    Transport(String),

    /// The configured base URL cannot be parsed or cannot carry a path.
    #[error("invalid base URL {0}")]
    BaseUrl(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] store::StoreError),
}

fn unauthorized_message(detail: &Option<String>) -> &str {
    detail.as_deref().unwrap_or("unauthorized")
}

fn rejected_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("request failed with status {status}"),
    }
}

impl ApiError {
    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message to show a user: the backend's `detail`, else the transport
    /// error text, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized { detail: Some(detail) }
            | ApiError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Transport(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_precedence() {
        let rejected = ApiError::Rejected {
            status: 400,
            detail: Some("Email already registered".to_string()),
        };
        assert_eq!(rejected.user_message("Could not register"), "Email already registered");

        let offline = ApiError::Transport("connection refused".to_string());
        assert_eq!(offline.user_message("Could not register"), "connection refused");

        let bare = ApiError::Rejected {
            status: 502,
            detail: None,
        };
        assert_eq!(bare.user_message("Could not register"), "Could not register");
        assert_eq!(bare.to_string(), "request failed with status 502");
    }

    #[test]
    fn test_status_classification() {
        assert!(ApiError::Unauthorized { detail: None }.is_unauthorized());
        assert_eq!(ApiError::Unauthorized { detail: None }.status(), Some(401));
        assert!(ApiError::Rejected {
            status: 404,
            detail: None
        }
        .is_not_found());
        assert_eq!(ApiError::NotAuthenticated.status(), None);
    }
}
