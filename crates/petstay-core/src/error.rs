// ── Core error types ──
//
// User-facing errors from petstay-core. These are NOT wire-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<petstay_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the marketplace backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    #[error("Store not found: {store_id}")]
    StoreNotFound { store_id: i64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The backend business code (e.g. 100500), when present.
        code: Option<i64>,
        /// HTTP status code, when applicable.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<petstay_api::Error> for CoreError {
    fn from(err: petstay_api::Error) -> Self {
        match err {
            petstay_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            petstay_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            petstay_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            petstay_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            petstay_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status,
            },
            petstay_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
