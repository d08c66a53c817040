// Marketplace API HTTP client
//
// Wraps `reqwest::Client` with Petstay-specific URL construction, bearer
// auth, and `{code, msg, data}` envelope unwrapping. Endpoint groups
// (orders, catalog) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Business result code the backend uses to signal success.
///
/// Independent of the HTTP status: a request can come back HTTP 200 with a
/// failure code in the envelope.
pub const SUCCESS_CODE: i64 = 100_200;

/// The `{code, msg, data}` wrapper every backend response arrives in.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    code: Option<i64>,
    msg: Option<String>,
    /// Some error responses carry `message` instead of `msg`.
    message: Option<String>,
    data: Option<T>,
}

/// Raw HTTP client for the Petstay marketplace backend.
///
/// Handles bearer authentication, API path construction, and envelope
/// unwrapping. All methods return unwrapped `data` payloads -- the
/// envelope is stripped before the caller sees it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl ApiClient {
    /// Create a new client for the given backend root URL.
    ///
    /// `base_url` is the server root (e.g. `https://api.petstay.app`);
    /// the `/api/` prefix is appended per request.
    pub fn new(base_url: Url, token: SecretString, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you need custom transport settings (proxies, test
    /// servers) beyond what [`new`](Self::new) configures.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }
}

/// Parse the `{code, msg, data}` envelope, returning `data` when
/// `code == SUCCESS_CODE` or an `Error::Api` otherwise.
///
/// Error responses are inconsistent about the message field name
/// (`msg` vs `message`) -- both are accepted, `msg` wins.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "bearer token rejected or session expired".into(),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            message: format!("HTTP {status}: {}", &body[..body.len().min(200)]),
            code: None,
            status: Some(status.as_u16()),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;

    match envelope.code {
        Some(SUCCESS_CODE) => envelope.data.ok_or_else(|| Error::Deserialization {
            message: "envelope is missing the data field".into(),
            body,
        }),
        code => Err(Error::Api {
            message: envelope.msg.or(envelope.message).unwrap_or_else(|| match code {
                Some(c) => format!("code={c}"),
                None => "missing result code".into(),
            }),
            code,
            status: Some(status.as_u16()),
        }),
    }
}
