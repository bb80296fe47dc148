//! Boundary error surface for the feed API.
//!
//! Every failure an operation can hit is folded into [`ApiError`] so the
//! controllers can convert it into exactly one user-facing message:
//! local validation failures, transport failures with no response, HTTP
//! status failures (with the server's own message when its body carries
//! one), and unparseable responses.

use std::fmt;

use serde_json::Value;

/// Fixed user-facing message for transport failures with no response.
pub const NETWORK_UNREACHABLE_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Categories of boundary errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Local validation failure detected before any network call.
    Validation,
    /// No response received (connect failure, timeout).
    Network,
    /// HTTP status error (4xx, 5xx).
    HttpStatus,
    /// Failed to parse the response body.
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the feed boundary.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// One-line summary suitable for logs.
    pub message: String,
    /// Message the server reported in a structured error body, verbatim.
    pub server_message: Option<String>,
    /// Optional additional details (e.g. raw error body).
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new boundary error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
            details: None,
        }
    }

    /// Creates a local validation error (no network call was made).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Creates a transport error (no response received).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Creates an HTTP status error, extracting the server's message
    /// from a JSON error body when one is present (either a top-level
    /// `message` or a nested `error.message`).
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = extract_server_message(body);
        Self {
            kind: ApiErrorKind::HttpStatus,
            message: match &server_message {
                Some(msg) => format!("HTTP {status}: {msg}"),
                None => format!("HTTP {status}"),
            },
            server_message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Maps a transport-layer error from the HTTP client.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::parse(format!("Failed to parse server response: {err}"));
        }
        let mut error = Self::network("No response received from the server");
        error.details = Some(err.to_string());
        error
    }

    /// Converts the failure into the message shown to the user.
    ///
    /// Validation messages and server-reported messages surface
    /// verbatim; transport failures get the fixed network-unreachable
    /// wording; everything else falls back to the operation's generic
    /// failure string.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Validation => self.message.clone(),
            ApiErrorKind::Network => NETWORK_UNREACHABLE_MESSAGE.to_string(),
            ApiErrorKind::HttpStatus => self
                .server_message
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
            ApiErrorKind::Parse => fallback.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Digs the human-readable message out of a JSON error body.
fn extract_server_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    if let Some(msg) = json.get("message").and_then(Value::as_str) {
        return Some(msg.to_string());
    }
    json.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: top-level and nested server messages are both extracted.
    #[test]
    fn test_http_status_extracts_message() {
        let err = ApiError::http_status(401, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(err.server_message.as_deref(), Some("Invalid credentials"));
        assert_eq!(err.message, "HTTP 401: Invalid credentials");

        let err = ApiError::http_status(500, r#"{"error":{"message":"boom"}}"#);
        assert_eq!(err.server_message.as_deref(), Some("boom"));
    }

    /// Test: non-JSON bodies keep the bare status summary.
    #[test]
    fn test_http_status_plain_body() {
        let err = ApiError::http_status(502, "Bad Gateway");
        assert_eq!(err.server_message, None);
        assert_eq!(err.message, "HTTP 502");
        assert_eq!(err.details.as_deref(), Some("Bad Gateway"));
    }

    /// Test: user message precedence per kind.
    #[test]
    fn test_user_message_precedence() {
        let validation = ApiError::validation("Post content cannot be empty.");
        assert_eq!(
            validation.user_message("fallback"),
            "Post content cannot be empty."
        );

        let network = ApiError::network("no response");
        assert_eq!(network.user_message("fallback"), NETWORK_UNREACHABLE_MESSAGE);

        let with_message = ApiError::http_status(400, r#"{"message":"Too long"}"#);
        assert_eq!(with_message.user_message("fallback"), "Too long");

        let without_message = ApiError::http_status(500, "");
        assert_eq!(without_message.user_message("fallback"), "fallback");

        let parse = ApiError::parse("bad json");
        assert_eq!(parse.user_message("fallback"), "fallback");
    }
}
