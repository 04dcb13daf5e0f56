use thiserror::Error;

/// Failures a backend call can surface.
///
/// Transport failures and HTTP-level failures are separate variants so
/// callers (and tests) can tell them apart without inspecting message text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response; message comes from the body's `error` field when
    /// the body parses, otherwise a generic status line.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// DNS, connection, or timeout failure before a response arrived.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response whose body did not match the expected shape.
    #[error("unparseable response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A precondition the client checks before issuing any request.
    #[error("{0}")]
    InvalidInput(String),
}

/// Normalise a non-2xx response body into a [`ClientError::Http`].
///
/// The body is probed for a JSON `error` field; anything else (non-JSON,
/// JSON without `error`, empty) falls back to `HTTP <status>`.
pub fn error_from_body(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));
    ClientError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_message(err: ClientError) -> (u16, String) {
        match err {
            ClientError::Http { status, message } => (status, message),
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn json_error_field_used() {
        let (status, message) = http_message(error_from_body(400, r#"{"error": "Missing image_base64"}"#));
        assert_eq!(status, 400);
        assert_eq!(message, "Missing image_base64");
    }

    #[test]
    fn non_json_body_falls_back_to_status() {
        let (status, message) = http_message(error_from_body(500, "<html>Internal Server Error</html>"));
        assert_eq!(status, 500);
        assert_eq!(message, "HTTP 500");
    }

    #[test]
    fn json_without_error_field_falls_back() {
        let (_, message) = http_message(error_from_body(502, r#"{"detail": "bad gateway"}"#));
        assert_eq!(message, "HTTP 502");
    }

    #[test]
    fn empty_body_falls_back() {
        let (_, message) = http_message(error_from_body(503, ""));
        assert_eq!(message, "HTTP 503");
    }

    #[test]
    fn non_string_error_field_falls_back() {
        let (_, message) = http_message(error_from_body(500, r#"{"error": {"code": 7}}"#));
        assert_eq!(message, "HTTP 500");
    }
}
