use thiserror::Error;

use super::common::ApiErrorDetails;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        #[source]
        details: Option<Box<ApiErrorDetails>>,
    },

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Too many requests, rate limited")]
    RateLimited,

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,
}

impl ApiError {
    /// Classification rule driving the retry policy: transient failures are
    /// worth another attempt, everything else is terminal
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout(_) | ApiError::RateLimited | ApiError::ServiceUnavailable => true,
            ApiError::RequestError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Stale identity or read-after-delete; read paths drop local state on
    /// this instead of failing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ApiError::ServiceUnavailable.is_transient());
        assert!(ApiError::RateLimited.is_transient());
        assert!(ApiError::Timeout(30).is_transient());

        assert!(!ApiError::AuthError.is_transient());
        assert!(!ApiError::NotFound {
            path: "/api/v1/packages/1".to_string()
        }
        .is_transient());
        assert!(!ApiError::ApiError {
            status: 400,
            message: "bad request".to_string(),
            details: None,
        }
        .is_transient());
    }

    #[test]
    fn not_found_is_distinct_from_other_errors() {
        let err = ApiError::NotFound {
            path: "/api/v1/webhooks/9".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!ApiError::AuthError.is_not_found());
    }
}
