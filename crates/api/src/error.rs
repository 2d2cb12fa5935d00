use thiserror::Error;

/// Failure classification for backend calls. The split the rest of the app
/// cares about is connectivity (eligible for the offline queue) versus
/// everything the server actually said.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    Connectivity(String),
    #[error("request timed out")]
    Timeout,
    #[error("authentication required")]
    Unauthorized,
    #[error("not permitted: {message}")]
    Forbidden { message: String },
    #[error("rejected by server ({status}): {message}")]
    Business { status: u16, message: String },
    #[error("server error ({status})")]
    Server { status: u16 },
    #[error("could not decode server response: {0}")]
    Decode(String),
    #[error("invalid request url: {0}")]
    Url(String),
}

impl ApiError {
    /// Connectivity failures queue writes for offline replay; business and
    /// auth errors never do.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Timeout)
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden { .. })
    }

    /// Banner text. Backend-provided business messages pass through; the
    /// rest collapse to stable user-safe phrasing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connectivity(_) | Self::Timeout => {
                "No connection. Your change will be retried when you are back online.".to_string()
            }
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Forbidden { message } | Self::Business { message, .. } => message.clone(),
            Self::Server { .. } => "The server had a problem. Please try again later.".to_string(),
            Self::Decode(_) | Self::Url(_) => "Received an unexpected response.".to_string(),
        }
    }

    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Connectivity(error.to_string())
        }
    }

    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden { message },
            400..=499 => Self::Business { status, message },
            _ => Self::Server { status },
        }
    }
}

/// Backend error bodies are `{"error": "..."}` or `{"detail": "..."}`; fall
/// back to the raw body for anything else.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn only_connectivity_and_timeout_feed_the_offline_queue() {
        assert!(ApiError::Connectivity("dns".to_string()).is_connectivity());
        assert!(ApiError::Timeout.is_connectivity());
        assert!(!ApiError::Server { status: 503 }.is_connectivity());
        assert!(!ApiError::Business { status: 400, message: String::new() }.is_connectivity());
    }

    #[test]
    fn status_classification_matches_the_taxonomy() {
        assert!(matches!(ApiError::from_status(401, ""), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(403, ""), ApiError::Forbidden { .. }));
        assert!(matches!(ApiError::from_status(422, ""), ApiError::Business { status: 422, .. }));
        assert!(matches!(ApiError::from_status(502, ""), ApiError::Server { status: 502 }));
    }

    #[test]
    fn business_message_comes_from_the_error_body() {
        let error = ApiError::from_status(400, r#"{"error": "Rejection reason is required"}"#);
        assert_eq!(error.user_message(), "Rejection reason is required");

        let error = ApiError::from_status(403, r#"{"detail": "Not the next approver"}"#);
        assert_eq!(error.user_message(), "Not the next approver");
    }
}
