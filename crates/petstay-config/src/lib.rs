//! Shared configuration for Petstay client binaries.
//!
//! TOML config file, `PETSTAY_*` environment overrides, token resolution
//! (env + keyring + plaintext), and translation to
//! `petstay_core::ClientConfig`. The core crates never read config files
//! — binaries resolve everything here and hand runtime config in.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use petstay_core::ClientConfig;

/// Keyring service name for stored tokens.
const KEYRING_SERVICE: &str = "petstay";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured (set PETSTAY_TOKEN, store one with `petstay config set-token`, or add `token` to the config file)")]
    NoToken,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Backend root URL (e.g. "https://api.petstay.app").
    pub server: Option<String>,

    /// Plaintext API token (prefer keyring or env).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Countdown machinery tuning.
    #[serde(default)]
    pub countdown: CountdownSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CountdownSettings {
    /// Local countdown tick in seconds (pure re-derivation, no I/O).
    #[serde(default = "default_tick")]
    pub tick_interval_secs: u64,

    /// Server reconciliation interval in seconds.
    #[serde(default = "default_reconcile")]
    pub reconcile_interval_secs: u64,

    /// Assumed payment window (seconds) when the server reports no expiry.
    #[serde(default = "default_fallback_window")]
    pub fallback_payment_window_secs: u64,

    /// Where to persist countdowns (defaults to the platform data dir).
    pub storage_path: Option<PathBuf>,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick(),
            reconcile_interval_secs: default_reconcile(),
            fallback_payment_window_secs: default_fallback_window(),
            storage_path: None,
        }
    }
}

fn default_tick() -> u64 {
    1
}
fn default_reconcile() -> u64 {
    30
}
fn default_fallback_window() -> u64 {
    15 * 60
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("app", "petstay", "petstay").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the persisted countdown document.
pub fn countdown_storage_path(config: &Config) -> PathBuf {
    if let Some(ref path) = config.countdown.storage_path {
        return path.clone();
    }
    ProjectDirs::from("app", "petstay", "petstay").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("countdowns.json");
            p
        },
        |dirs| dirs.data_dir().join("countdowns.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("petstay");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PETSTAY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the API token from the credential chain:
/// named env var, `PETSTAY_TOKEN`, keyring, then plaintext config.
pub fn resolve_token(config: &Config) -> Result<SecretString, ConfigError> {
    // 1. Config's token_env → env var lookup
    if let Some(ref env_name) = config.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Conventional env var
    if let Ok(val) = std::env::var("PETSTAY_TOKEN") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, "api-token") {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = config.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken)
}

/// Store the API token in the system keyring.
pub fn store_token(token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, "api-token")?;
    entry.set_password(token)?;
    Ok(())
}

// ── Translation to runtime config ───────────────────────────────────

/// Build a `ClientConfig` from the loaded configuration.
pub fn to_client_config(config: &Config) -> Result<ClientConfig, ConfigError> {
    let server_str = config
        .server
        .as_deref()
        .ok_or_else(|| ConfigError::Validation {
            field: "server".into(),
            reason: "no backend URL configured".into(),
        })?;

    let server: url::Url = server_str.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server_str}"),
    })?;

    let token = resolve_token(config)?;

    Ok(ClientConfig {
        server,
        token,
        timeout: Duration::from_secs(config.defaults.timeout),
        tick_interval: Duration::from_secs(config.countdown.tick_interval_secs.max(1)),
        reconcile_interval: Duration::from_secs(config.countdown.reconcile_interval_secs.max(1)),
        fallback_payment_window: Duration::from_secs(
            config.countdown.fallback_payment_window_secs,
        ),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_production_cadence() {
        let settings = CountdownSettings::default();
        assert_eq!(settings.tick_interval_secs, 1);
        assert_eq!(settings.reconcile_interval_secs, 30);
        assert_eq!(settings.fallback_payment_window_secs, 900);
    }

    #[test]
    fn explicit_storage_path_wins() {
        let config = Config {
            countdown: CountdownSettings {
                storage_path: Some(PathBuf::from("/tmp/custom.json")),
                ..CountdownSettings::default()
            },
            ..Config::default()
        };
        assert_eq!(
            countdown_storage_path(&config),
            PathBuf::from("/tmp/custom.json")
        );
    }

    #[test]
    fn missing_server_is_a_validation_error() {
        let config = Config {
            token: Some("t".into()),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let config = Config {
            server: Some("not a url".into()),
            token: Some("t".into()),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn plaintext_token_resolves_as_last_resort() {
        let config = Config {
            server: Some("https://api.example.test".into()),
            token: Some("plain-token".into()),
            ..Config::default()
        };
        // No env vars set in the test environment for this name.
        let client = to_client_config(&config).unwrap();
        assert_eq!(client.server.as_str(), "https://api.example.test/");
        assert_eq!(client.reconcile_interval, Duration::from_secs(30));
    }
}
