//! Client-side core for the Petstay boarding marketplace.
//!
//! This crate owns the domain model and the two pieces of real business
//! logic a Petstay front end needs, between `petstay-api` and UI consumers
//! (CLI, or any other surface):
//!
//! - **[`pricing`]** — pure price computation: tier matching by pet type
//!   and weight-classified size, stay-day rounding, add-on service
//!   subtotals. Safe to call on every form field change; partial input
//!   degrades to a zero breakdown instead of erroring.
//!
//! - **[`CountdownStore`]** — reload-durable keyed store of per-order
//!   payment expiries. The absolute `expire_at` instant is the only
//!   ground truth; remaining seconds are re-derived from the wall clock
//!   on every read, so the countdown survives missed ticks and process
//!   restarts. Mutations write through to a swappable
//!   [`CountdownStorage`] adapter and broadcast snapshots over `watch`
//!   channels.
//!
//! - **[`PaymentWatcher`]** — per-order timer pair (1s local tick, 30s
//!   server reconciliation) as cancellable background tasks. Network
//!   failures keep the local countdown; only an explicit "no longer
//!   payable" status ends it.
//!
//! - **Domain model** ([`model`]) — canonical types (`PriceTier`,
//!   `PetSize`, `OrderStatus`, `OrderCountdown`, …); [`convert`]
//!   translates the wire DTOs from `petstay-api` into them.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pricing;
pub mod store;
pub mod stream;
pub mod watcher;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, FALLBACK_PAYMENT_WINDOW};
pub use error::CoreError;
pub use pricing::{QuoteInputs, compute_price_breakdown};
pub use store::{CountdownStorage, CountdownStore, JsonFileStorage, MemoryStorage};
pub use stream::CountdownStream;
pub use watcher::{PaymentOrder, PaymentWatcher, WatcherConfig};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    OrderCountdown,
    OrderState,
    OrderStatus,
    OrderSummary,
    PetSize,
    PriceBreakdown,
    PriceTier,
    ServiceItem,
    ServiceSelection,
};
