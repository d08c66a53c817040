// ── Order countdown store ──
//
// Keyed, reload-durable storage for payment-expiry tracking. `expire_at`
// is the only ground truth; remaining seconds are re-derived from the
// wall clock on every read so the countdown stays correct across missed
// ticks (suspended tab, stopped process). Mutations broadcast a fresh
// snapshot via a `watch` channel and write through to durable storage.

mod persist;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::warn;

use crate::model::OrderCountdown;

pub use persist::{CountdownStorage, JsonFileStorage, MemoryStorage, StorageError};

/// Clock-derived remaining seconds: `max(0, floor(expire_at - now))`.
///
/// Zero means expired; the value is never negative.
pub fn remaining_between(expire_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expire_at - now).num_seconds().max(0)
}

/// Keyed store of per-order payment countdowns.
///
/// Entries are independent by order id: list views may track many orders
/// at once without interference. Every mutation rebuilds the broadcast
/// snapshot and writes the full map through to the storage adapter.
pub struct CountdownStore {
    entries: DashMap<String, OrderCountdown>,
    snapshot: watch::Sender<Arc<Vec<OrderCountdown>>>,
    storage: Box<dyn CountdownStorage>,
}

impl CountdownStore {
    /// Create a store backed by the given storage adapter, rehydrating
    /// any previously persisted entries.
    ///
    /// A failed load degrades to an empty store with a warning -- stale
    /// local state is never worth refusing to start over.
    pub fn with_storage(storage: impl CountdownStorage + 'static) -> Self {
        let persisted = match storage.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "failed to load persisted countdowns, starting empty");
                HashMap::new()
            }
        };

        let entries = DashMap::new();
        for (order_id, countdown) in persisted {
            entries.insert(order_id, countdown);
        }

        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let store = Self {
            entries,
            snapshot,
            storage: Box::new(storage),
        };
        store.rebuild_snapshot();
        store
    }

    /// Create an ephemeral store (nothing survives the process).
    pub fn in_memory() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// Insert or overwrite the countdown for an order. Last writer wins;
    /// there are no merge semantics -- reconciliation is an overwrite.
    ///
    /// When the server has just reported authoritative remaining seconds,
    /// pass them in to seed the cached value without a clock read;
    /// otherwise the cache is derived from `expire_at`.
    pub fn set(&self, order_id: &str, expire_at: DateTime<Utc>, authoritative_secs: Option<i64>) {
        let now = Utc::now();
        let remaining =
            authoritative_secs.map_or_else(|| remaining_between(expire_at, now), |s| s.max(0));

        self.entries.insert(
            order_id.to_owned(),
            OrderCountdown {
                order_id: order_id.to_owned(),
                expire_at,
                last_known_remaining_secs: remaining,
                last_update_time: now,
            },
        );
        self.after_mutation();
    }

    /// Live remaining seconds for an order, or `None` when the order is
    /// unknown (callers must treat that as "unknown", not "zero").
    ///
    /// Always recomputed from `expire_at` and the wall clock -- this read
    /// path never serves the cached value.
    pub fn remaining_seconds(&self, order_id: &str) -> Option<i64> {
        self.entries
            .get(order_id)
            .map(|entry| remaining_between(entry.expire_at, Utc::now()))
    }

    /// Recompute and store the cached remaining value for an order.
    ///
    /// Driven by the once-per-second UI tick purely to push a fresh
    /// snapshot at subscribers; reads should use
    /// [`remaining_seconds`](Self::remaining_seconds) instead.
    pub fn refresh(&self, order_id: &str) {
        let now = Utc::now();
        let updated = {
            match self.entries.get_mut(order_id) {
                Some(mut entry) => {
                    entry.last_known_remaining_secs = remaining_between(entry.expire_at, now);
                    entry.last_update_time = now;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.after_mutation();
        }
    }

    /// Remove one order's countdown (e.g. once it leaves the
    /// awaiting-payment state). Returns the removed entry if it existed.
    pub fn clear(&self, order_id: &str) -> Option<OrderCountdown> {
        let removed = self.entries.remove(order_id).map(|(_, entry)| entry);
        if removed.is_some() {
            self.after_mutation();
        }
        removed
    }

    /// Remove all countdowns.
    pub fn clear_all(&self) {
        self.entries.clear();
        self.after_mutation();
    }

    /// A full copy of one entry (cached value included).
    pub fn get(&self, order_id: &str) -> Option<OrderCountdown> {
        self.entries.get(order_id).map(|entry| entry.value().clone())
    }

    /// The current snapshot of all entries (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<OrderCountdown>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<OrderCountdown>>> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Rebuild the broadcast snapshot and write through to storage.
    ///
    /// Storage failures are logged and swallowed: the in-memory state
    /// stays correct, and the next mutation retries the full write.
    fn after_mutation(&self) {
        self.rebuild_snapshot();

        let map: HashMap<String, OrderCountdown> = self
            .entries
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        if let Err(e) = self.storage.save(&map) {
            warn!(error = %e, "failed to persist countdowns");
        }
    }

    fn rebuild_snapshot(&self) {
        let values: Vec<OrderCountdown> = self.entries.iter().map(|r| r.value().clone()).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

impl<S: CountdownStorage + ?Sized> CountdownStorage for Arc<S> {
    fn load(&self) -> Result<HashMap<String, OrderCountdown>, StorageError> {
        (**self).load()
    }

    fn save(&self, entries: &HashMap<String, OrderCountdown>) -> Result<(), StorageError> {
        (**self).save(entries)
    }
}
