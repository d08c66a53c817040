//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use petstay_core::CoreError;

/// Exit codes emitted by the binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
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
    #[error("Could not reach the Petstay backend at {url}")]
    #[diagnostic(
        code(petstay::connection_failed),
        help(
            "Check that the backend is reachable.\n\
             URL: {url}\n\
             Cause: {reason}\n\
             Override with --server or PETSTAY_SERVER."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(petstay::timeout),
        help("The backend did not answer in time. Raise --timeout if it is just slow.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(petstay::auth_failed),
        help(
            "Your token was rejected.\n\
             Store a fresh one with: petstay config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured")]
    #[diagnostic(
        code(petstay::no_token),
        help(
            "Set PETSTAY_TOKEN, pass --token, or store one with:\n\
             petstay config set-token"
        )
    )]
    NoToken,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(petstay::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(petstay::validation))]
    Validation { field: String, reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(petstay::api_error))]
    ApiError {
        message: String,
        code: Option<i64>,
    },

    // ── Everything else ──────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(petstay::general))]
    General(String),
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoToken => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ApiError { .. } | Self::General(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout { .. } => Self::Timeout,
            CoreError::OrderNotFound { order_id } => Self::NotFound {
                resource_type: "order".into(),
                identifier: order_id,
            },
            CoreError::StoreNotFound { store_id } => Self::NotFound {
                resource_type: "store".into(),
                identifier: store_id.to_string(),
            },
            CoreError::Api { message, code, .. } => Self::ApiError { message, code },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::General(message),
        }
    }
}

impl From<petstay_api::Error> for CliError {
    fn from(err: petstay_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<petstay_config::ConfigError> for CliError {
    fn from(err: petstay_config::ConfigError) -> Self {
        match err {
            petstay_config::ConfigError::NoToken => Self::NoToken,
            petstay_config::ConfigError::Validation { field, reason } => {
                Self::Validation { field, reason }
            }
            other => Self::General(other.to_string()),
        }
    }
}
