// ── Runtime client configuration ──
//
// These types describe *how* to talk to the marketplace backend and how
// fast the countdown machinery ticks. They carry credential data and
// tuning, but never touch disk -- the CLI (via petstay-config) constructs
// a `ClientConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How long an unpaid order stays payable when the server doesn't report
/// an authoritative remaining time: 15 minutes from creation.
pub const FALLBACK_PAYMENT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Configuration for talking to one marketplace backend.
///
/// Built by the consumer, passed into `ApiClient` / `PaymentWatcher`
/// construction -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root URL (e.g. `https://api.petstay.app`).
    pub server: Url,
    /// Bearer token for the signed-in account.
    pub token: SecretString,
    /// Request timeout.
    pub timeout: Duration,
    /// Local countdown tick -- pure re-derivation, no I/O.
    pub tick_interval: Duration,
    /// How often to reconcile against the server's order status.
    pub reconcile_interval: Duration,
    /// Assumed payment window when the server reports no expiry.
    pub fallback_payment_window: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "https://api.petstay.app"
                .parse()
                .expect("default server URL is valid"),
            token: SecretString::from(String::new()),
            timeout: Duration::from_secs(30),
            tick_interval: Duration::from_secs(1),
            reconcile_interval: Duration::from_secs(30),
            fallback_payment_window: FALLBACK_PAYMENT_WINDOW,
        }
    }
}
