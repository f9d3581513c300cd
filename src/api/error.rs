use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures talking to the analysis service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response at all: connection refused, DNS, timeout
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map an error response, preferring the service's `{"error": "..."}` message
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let msg = error_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Server(msg),
        }
    }

    /// Transport failures and 5xx responses may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    Some(from_json.unwrap_or_else(|| body.to_string()))
}
