//! Request errors returned by the TMDB client.

use reqwest::StatusCode;

/// Failure of a single TMDB request.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// The server answered with a non-success status.
    #[error("HTTP status: {}. Check API key{}", .status.as_u16(), detail(.message.as_deref()))]
    Http {
        /// Response status.
        status: StatusCode,
        /// `status_message` from the TMDB error body, if any.
        message: Option<String>,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("failed to decode JSON response from {path}: {source}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The request URL could not be built.
    #[error("invalid request URL for {path}: {source}")]
    Url {
        /// Request path.
        path: String,
        /// Parse error.
        #[source]
        source: url::ParseError,
    },
}

fn detail(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(" ({m})"))
}

impl TmdbError {
    /// Returns the HTTP status code for `Http` errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
