//! Error types for backend calls.

/// Everything that can go wrong between a hook and the backend.
///
/// Validation failures never get here; they are caught by
/// [`crate::validation`] before any request is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("session renewal failed: {0}")]
    RenewalFailed(Box<ApiError>),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("{0} is required")]
    MissingIdentifier(&'static str),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status of the failure, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RenewalFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// The `message` field of the backend's error body, when present.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            ApiError::RenewalFailed(inner) => inner.server_message(),
            _ => None,
        }
    }

    /// Text to show the user: the server's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Status {
            status: 409,
            message: Some("Email already exists".into()),
        };
        assert_eq!(err.user_message("Registration failed"), "Email already exists");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Status { status: 500, message: None };
        assert_eq!(err.user_message("Failed to fetch projects"), "Failed to fetch projects");

        let blank = ApiError::Status { status: 400, message: Some("  ".into()) };
        assert_eq!(blank.user_message("Failed"), "Failed");

        let offline = ApiError::Transport("connection refused".into());
        assert_eq!(offline.user_message("Failed"), "Failed");
    }

    #[test]
    fn test_renewal_failure_exposes_inner_status() {
        let err = ApiError::RenewalFailed(Box::new(ApiError::Status { status: 401, message: None }));
        assert_eq!(err.status(), Some(401));
    }
}
