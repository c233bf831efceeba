use thiserror::Error;

/// Top-level error type for the `coursely-api` crate.
///
/// Every failure the HTTP gateway can classify: non-2xx statuses, responses
/// that are not JSON when JSON was expected, and transport-level failures
/// where no response arrived at all. `coursely-core` maps these into
/// user-facing error kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP status ─────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the body's `message` field
    /// when present, otherwise `HTTP <status>`.
    #[error("{message}")]
    Status { status: u16, message: String },

    // ── Content type ────────────────────────────────────────────────
    /// A 2xx response whose body is not JSON. Usually a misrouted request
    /// hitting an HTML fallback page, or an endpoint that doesn't exist.
    #[error(
        "Server returned {content_type} instead of JSON (HTTP {status}). Check that the API endpoint exists."
    )]
    UnexpectedContentType { status: u16, content_type: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL can't carry a path (e.g. `mailto:`).
    #[error("Base URL cannot carry an API path: {0}")]
    InvalidBaseUrl(String),

    /// The bearer token can't be sent as an HTTP header value.
    #[error("Bearer token contains characters not allowed in an HTTP header")]
    InvalidToken,

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::UnexpectedContentType { status, .. } => {
                Some(*status)
            }
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the request timed out (only possible when a
    /// timeout was configured on the transport).
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
