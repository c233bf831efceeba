// ── Core error types ──
//
// User-facing errors from coursely-core. Consumers see three operation
// kinds (auth, validation, gateway) plus local storage and config failures. The
// `From<coursely_api::Error>` impl translates transport-layer errors.

use thiserror::Error;

/// How a gateway call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum GatewayFailure {
    /// Non-2xx HTTP status.
    Status,
    /// 2xx response that wasn't JSON.
    ContentType,
    /// No response at all (connection refused, DNS).
    Transport,
    /// The configured request timeout elapsed.
    Timeout,
    /// JSON that couldn't be decoded.
    Decode,
    /// Request couldn't be built (bad base URL, unusable token).
    Request,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Precondition errors ──────────────────────────────────────────
    /// No session token; the operation never reached the network.
    #[error("Authentication error: not logged in (no session token)")]
    NotAuthenticated,

    /// Credentials rejected by the server at login.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Missing identifier or payload, or a record without identity.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Gateway errors ───────────────────────────────────────────────
    /// The HTTP gateway classified the call as failed.
    #[error("{message}")]
    Gateway {
        message: String,
        status: Option<u16>,
        failure: GatewayFailure,
    },

    // ── Local errors ─────────────────────────────────────────────────
    /// The durable token store couldn't be read or written.
    #[error("Token storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status attached to a gateway failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Gateway { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Authentication { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn gateway_failure(&self) -> Option<GatewayFailure> {
        match self {
            Self::Gateway { failure, .. } => Some(*failure),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<coursely_api::Error> for CoreError {
    fn from(err: coursely_api::Error) -> Self {
        let status = err.status();
        let failure = match &err {
            coursely_api::Error::Status { .. } => GatewayFailure::Status,
            coursely_api::Error::UnexpectedContentType { .. } => GatewayFailure::ContentType,
            coursely_api::Error::Transport(e) if e.is_timeout() => GatewayFailure::Timeout,
            coursely_api::Error::Transport(_) => GatewayFailure::Transport,
            coursely_api::Error::Deserialization { .. } => GatewayFailure::Decode,
            coursely_api::Error::InvalidUrl(_)
            | coursely_api::Error::InvalidBaseUrl(_)
            | coursely_api::Error::InvalidToken => GatewayFailure::Request,
            coursely_api::Error::Tls(msg) => {
                return CoreError::Config {
                    message: format!("TLS error: {msg}"),
                };
            }
        };
        CoreError::Gateway {
            message: err.to_string(),
            status,
            failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_message_and_status() {
        let err = CoreError::from(coursely_api::Error::Status {
            status: 422,
            message: "Title is required".into(),
        });
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.gateway_failure(), Some(GatewayFailure::Status));
    }

    #[test]
    fn content_type_error_is_distinct_failure() {
        let err = CoreError::from(coursely_api::Error::UnexpectedContentType {
            status: 200,
            content_type: "text/html".into(),
        });
        assert_eq!(err.gateway_failure(), Some(GatewayFailure::ContentType));
        assert!(err.to_string().contains("text/html"));
    }

    #[test]
    fn tls_error_becomes_config_error() {
        let err = CoreError::from(coursely_api::Error::Tls("bad cert".into()));
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn not_authenticated_is_auth_kind() {
        let err = CoreError::NotAuthenticated;
        assert!(err.is_authentication());
        assert!(!err.is_gateway());
    }
}
