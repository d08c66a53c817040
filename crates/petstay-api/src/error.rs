use thiserror::Error;

/// Top-level error type for the `petstay-api` crate.
///
/// Covers every failure mode of the marketplace backend surface:
/// authentication, transport, and the `{code, msg, data}` envelope.
/// `petstay-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Bearer token rejected or session no longer valid.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Backend envelope ────────────────────────────────────────────
    /// Non-success envelope or HTTP error status from the backend.
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Business result code from the envelope (e.g. 100500), when present.
        code: Option<i64>,
        /// HTTP status code, when the failure happened at the HTTP layer.
        status: Option<u16>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries -- callers decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api {
                status: Some(404), ..
            } => true,
            _ => false,
        }
    }

    /// Extract the backend business code, if available.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}
