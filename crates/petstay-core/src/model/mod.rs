// ── Domain model ──
//
// Canonical types consumed by UI layers (CLI, or any front end).
// Wire DTOs live in `petstay-api`; `convert` translates them here.

mod order;
mod pricing;

pub use order::{OrderCountdown, OrderState, OrderStatus, OrderSummary};
pub use pricing::{
    MEDIUM_MAX_KG, PetSize, PriceBreakdown, PriceTier, SMALL_MAX_KG, ServiceItem,
    ServiceSelection,
};
