// ── Payment countdown watcher ──
//
// Owns the two timers a payment screen needs, as cancellable background
// tasks sharing the countdown store:
//
// - a local tick (1s) that re-derives remaining time from `expire_at` and
//   publishes it over a `watch` channel -- never any I/O on this path;
// - a reconcile tick (30s) that queries the order-status endpoint and
//   overwrites the local entry with the server's authoritative value, or
//   force-expires it once the order is no longer awaiting payment.
//
// Network failures during reconciliation keep the last local countdown;
// only an explicit "no longer payable" response zeroes it. A response
// arriving after `stop()` is never applied.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use petstay_api::ApiClient;

use crate::config::ClientConfig;
use crate::convert;
use crate::store::CountdownStore;

/// The order handle a payment surface carries into the watcher.
///
/// `create_time` and `expire_seconds_hint` come from the order-creation
/// response and only matter when the initial status query can't supply
/// an authoritative expiry.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub order_id: String,
    pub create_time: Option<DateTime<Utc>>,
    pub expire_seconds_hint: Option<i64>,
}

impl PaymentOrder {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            create_time: None,
            expire_seconds_hint: None,
        }
    }
}

/// Timer tuning for a watcher. Defaults match production cadence
/// (1s local tick, 30s reconcile, 15min fallback window).
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub tick_interval: Duration,
    pub reconcile_interval: Duration,
    pub fallback_payment_window: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        let config = ClientConfig::default();
        Self {
            tick_interval: config.tick_interval,
            reconcile_interval: config.reconcile_interval,
            fallback_payment_window: config.fallback_payment_window,
        }
    }
}

impl From<&ClientConfig> for WatcherConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            tick_interval: config.tick_interval,
            reconcile_interval: config.reconcile_interval,
            fallback_payment_window: config.fallback_payment_window,
        }
    }
}

/// Live countdown driver for a single order awaiting payment.
///
/// Watchers for different orders are fully independent; they share only
/// the store. Dropping a watcher cancels both timers; in-flight
/// reconciliation responses are discarded after cancellation.
pub struct PaymentWatcher {
    order_id: String,
    remaining_rx: watch::Receiver<Option<i64>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl PaymentWatcher {
    /// Arm the countdown for `order` and start both timers.
    pub fn spawn(
        api: Arc<ApiClient>,
        store: Arc<CountdownStore>,
        order: PaymentOrder,
        config: WatcherConfig,
    ) -> Self {
        let (remaining_tx, remaining_rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let order_id = order.order_id.clone();
        let mut tasks = Vec::with_capacity(2);

        // Reconcile task: arm once, then poll at the coarse interval.
        // The first interval tick fires immediately, so a payment screen
        // verifies against the server as soon as it opens.
        {
            let api = Arc::clone(&api);
            let store = Arc::clone(&store);
            let tx = remaining_tx.clone();
            let cancel = cancel.clone();
            let fallback = config.fallback_payment_window;
            let period = config.reconcile_interval;
            tasks.push(tokio::spawn(async move {
                arm(&api, &store, &order, fallback, &tx).await;

                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            reconcile_once(&api, &store, &order.order_id, &tx, &cancel).await;
                        }
                    }
                }
                debug!(order_id = %order.order_id, "reconcile task stopped");
            }));
        }

        // Local tick task: pure re-derivation and publication, no I/O.
        {
            let store = Arc::clone(&store);
            let tx = remaining_tx;
            let cancel = cancel.clone();
            let id = order_id.clone();
            let period = config.tick_interval;
            tasks.push(tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            store.refresh(&id);
                            let _ = tx.send(store.remaining_seconds(&id));
                        }
                    }
                }
                debug!(order_id = %id, "tick task stopped");
            }));
        }

        Self {
            order_id,
            remaining_rx,
            cancel,
            tasks,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Subscribe to the published remaining-seconds value.
    ///
    /// `None` means "unknown" (no countdown entry); `Some(0)` means
    /// expired or no longer payable.
    pub fn remaining(&self) -> watch::Receiver<Option<i64>> {
        self.remaining_rx.clone()
    }

    /// The most recently published remaining value.
    pub fn current_remaining(&self) -> Option<i64> {
        *self.remaining_rx.borrow()
    }

    /// Cancel both timers and wait for them to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
    }
}

impl Drop for PaymentWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Task bodies ──────────────────────────────────────────────────────

/// Seed the store entry for an order entering the payment flow.
///
/// An existing, still-live entry is reused as-is. Otherwise the server is
/// asked once; failing that, the creation-time fallback window or the
/// caller's hint applies. Publishes whatever remains afterwards.
async fn arm(
    api: &ApiClient,
    store: &CountdownStore,
    order: &PaymentOrder,
    fallback_window: Duration,
    tx: &watch::Sender<Option<i64>>,
) {
    let live = store
        .remaining_seconds(&order.order_id)
        .is_some_and(|s| s > 0);

    if !live {
        match api.order_status(&order.order_id).await {
            Ok(dto) => {
                let status = convert::order_status_from_dto(&order.order_id, dto);
                if let Some(secs) = status.expire_seconds.filter(|&s| s > 0) {
                    store.set(
                        &order.order_id,
                        Utc::now() + TimeDelta::seconds(secs),
                        Some(secs),
                    );
                } else if let Some(created) = status.create_time.or(order.create_time) {
                    let window =
                        TimeDelta::from_std(fallback_window).unwrap_or_else(|_| TimeDelta::zero());
                    store.set(&order.order_id, created + window, None);
                }
            }
            Err(e) => {
                warn!(order_id = %order.order_id, error = %e, "failed to arm countdown from order status");
                if let Some(hint) = order.expire_seconds_hint.filter(|&s| s > 0) {
                    store.set(
                        &order.order_id,
                        Utc::now() + TimeDelta::seconds(hint),
                        Some(hint),
                    );
                }
            }
        }
    }

    let _ = tx.send(store.remaining_seconds(&order.order_id));
}

/// One reconciliation round against the order-status endpoint.
///
/// A positive authoritative remaining re-arms the entry. An order-state
/// that is no longer awaiting payment force-expires an existing entry
/// (a cleared entry is never resurrected). An awaiting-payment response
/// without an authoritative value keeps the local countdown (e.g. the
/// creation-window fallback) running. Errors change nothing.
async fn reconcile_once(
    api: &ApiClient,
    store: &CountdownStore,
    order_id: &str,
    tx: &watch::Sender<Option<i64>>,
    cancel: &CancellationToken,
) {
    let result = tokio::select! {
        () = cancel.cancelled() => return,
        res = api.order_status(order_id) => res,
    };

    // The watcher may have been stopped while the request was in flight.
    if cancel.is_cancelled() {
        return;
    }

    match result {
        Ok(dto) => {
            let status = convert::order_status_from_dto(order_id, dto);
            if let Some(secs) = status.expire_seconds.filter(|&s| s > 0) {
                store.set(order_id, Utc::now() + TimeDelta::seconds(secs), Some(secs));
            } else if !status.awaiting_payment() && store.get(order_id).is_some() {
                // Paid, cancelled, or expired server-side: end the countdown.
                store.set(order_id, Utc::now(), Some(0));
            }
            let _ = tx.send(store.remaining_seconds(order_id));
        }
        Err(e) => {
            warn!(order_id = %order_id, error = %e, "order status reconciliation failed; keeping local countdown");
        }
    }
}
