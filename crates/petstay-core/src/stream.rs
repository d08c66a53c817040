// ── Reactive countdown streams ──
//
// Subscription handle for consuming store changes push-style. The store
// itself stays pull-based; this is a thin adapter for consumers that
// want a `Stream` (order-list views, notification surfaces).

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::OrderCountdown;

/// A subscription to the countdown store's snapshot.
///
/// Provides both point-in-time access and change notification via
/// `changed()`, or conversion into a `Stream`.
pub struct CountdownStream {
    current: Arc<Vec<OrderCountdown>>,
    receiver: watch::Receiver<Arc<Vec<OrderCountdown>>>,
}

impl CountdownStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<OrderCountdown>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<OrderCountdown>> {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<OrderCountdown>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<OrderCountdown>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> CountdownWatchStream {
        CountdownWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by the store's `watch::Receiver`.
pub struct CountdownWatchStream {
    inner: WatchStream<Arc<Vec<OrderCountdown>>>,
}

impl Stream for CountdownWatchStream {
    type Item = Arc<Vec<OrderCountdown>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl crate::store::CountdownStore {
    /// Subscribe as a [`CountdownStream`].
    pub fn stream(&self) -> CountdownStream {
        CountdownStream::new(self.subscribe())
    }
}
