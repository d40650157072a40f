//! Error types for the USDA client.

use thiserror::Error;

/// Result type for USDA operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the USDA client.
#[derive(Error, Debug)]
pub enum Error {
    /// The client could not be configured (bad API key or base URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request path is not a usable relative URL reference.
    #[error("Invalid request path {path:?}: {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// The API key was rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network or HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// The request deadline passed.
    #[error("Request timed out")]
    Timeout,
}

impl Error {
    /// Whether this error came from the transport layer.
    ///
    /// A fired [`Context`](crate::Context) takes precedence over these.
    pub(crate) fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Timeout)
    }

    /// Create an API error from a non-success response.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();

        let body: std::result::Result<ErrorResponse, _> = response.json().await;
        let message = body
            .ok()
            .and_then(ErrorResponse::into_message)
            .unwrap_or_else(|| "Unknown error".into());

        match status {
            401 | 403 => Error::Authentication(message),
            _ => Error::Api { status, message },
        }
    }
}

// The NDB service reports `{"errors":{"error":[...]}}`, while the api.data.gov
// gateway in front of it reports `{"error":{"code":..,"message":..}}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    errors: Option<ErrorList>,
    error: Option<GatewayError>,
}

#[derive(serde::Deserialize)]
struct ErrorList {
    #[serde(default)]
    error: Vec<ErrorDetail>,
}

#[derive(serde::Deserialize)]
struct ErrorDetail {
    parameter: Option<String>,
    message: Option<String>,
}

#[derive(serde::Deserialize)]
struct GatewayError {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        if let Some(list) = self.errors {
            let messages: Vec<String> = list
                .error
                .into_iter()
                .filter_map(|detail| match (detail.parameter, detail.message) {
                    (Some(param), Some(msg)) => Some(format!("{}: {}", param, msg)),
                    (None, Some(msg)) => Some(msg),
                    _ => None,
                })
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }

        let gateway = self.error?;
        match (gateway.code, gateway.message) {
            (Some(code), Some(msg)) => Some(format!("{} ({})", msg, code)),
            (None, Some(msg)) => Some(msg),
            (Some(code), None) => Some(code),
            (None, None) => None,
        }
    }
}
