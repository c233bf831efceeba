//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use coursely_config::ConfigError;
use coursely_core::{CoreError, GatewayFailure};

/// Process exit codes. Success exits with 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the course API")]
    #[diagnostic(
        code(coursely::connection_failed),
        help(
            "Check that the API server is running and reachable.\n\
             {message}\n\
             Override the URL with --api-url or `coursely config set api_url <url>`."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(coursely::timeout),
        help("Increase --timeout or check that the API server is responding.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(code(coursely::not_logged_in), help("Run: coursely login"))]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(coursely::auth_failed),
        help("Check your email and password, or sign in again with: coursely login")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(coursely::not_found),
        help("Run: coursely courses list to see your courses")
    )]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(coursely::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(coursely::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(coursely::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: coursely config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(coursely::config))]
    Config(ConfigError),

    // ── Local state ──────────────────────────────────────────────────
    #[error("Could not access the stored session: {message}")]
    #[diagnostic(
        code(coursely::token_storage),
        help("Switch stores with: coursely config set token_store file")
    )]
    TokenStorage { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(coursely::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => CliError::NotLoggedIn,

            CoreError::Authentication { message } => CliError::AuthFailed { message },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Gateway {
                message,
                status: Some(404),
                ..
            } => CliError::NotFound { message },

            // An expired or revoked token.
            CoreError::Gateway {
                message,
                status: Some(401),
                ..
            } => CliError::AuthFailed { message },

            CoreError::Gateway {
                failure: GatewayFailure::Timeout,
                ..
            } => CliError::Timeout,

            CoreError::Gateway {
                message,
                failure: GatewayFailure::Transport,
                ..
            } => CliError::ConnectionFailed { message },

            CoreError::Gateway {
                message, status, ..
            } => CliError::Api { message, status },

            CoreError::Storage { message } => CliError::TokenStorage { message },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}
