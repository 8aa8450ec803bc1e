//! Errors surfaced by the HTTP client

use thiserror::Error;

/// Fallback text when the backend gives no usable message
pub const GENERIC_FAILURE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx response
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Could not reach the server: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Map a non-success response body to an error, reading FastAPI's `detail` field
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self::Status { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_becomes_message() {
        let err = ApiError::from_response(404, br#"{"detail": "Form not found"}"#);
        assert_eq!(err.to_string(), "Form not found");
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[test]
    fn test_missing_detail_uses_fallback() {
        let err = ApiError::from_response(500, b"<html>oops</html>");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_validation_detail_list_uses_fallback() {
        let err = ApiError::from_response(422, br#"{"detail": [{"loc": ["body"], "msg": "x"}]}"#);
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_401_is_unauthorized() {
        let err = ApiError::from_response(401, br#"{"detail": "Invalid token"}"#);
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
