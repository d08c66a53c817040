// ── Pricing domain types ──

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Size bracket a pet falls into, classified from its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

/// Upper bound (kg) of the small bracket. Policy constant, not physics --
/// tune alongside the store-side price table seeds.
pub const SMALL_MAX_KG: f64 = 10.0;

/// Upper bound (kg) of the medium bracket.
pub const MEDIUM_MAX_KG: f64 = 25.0;

impl PetSize {
    /// Classify a pet by weight. Non-positive weights fall into the
    /// smallest bracket rather than erroring -- the form may hand us a
    /// half-typed value.
    pub fn from_weight_kg(weight: f64) -> Self {
        if weight <= SMALL_MAX_KG {
            Self::Small
        } else if weight <= MEDIUM_MAX_KG {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// The bare size token used for price table matching.
    pub fn token(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// One row of a store's tiered price table.
///
/// `category` and `size_label` may each be a wildcard (empty, "any",
/// "all"); `size_label` may carry a parenthesized annotation such as
/// `"small(<=7.5kg)"` that matching strips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub tier_id: Option<i64>,
    pub category: String,
    pub size_label: String,
    pub price_per_day: f64,
}

/// One add-on service from a store's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub service_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: f64,
}

/// Selected add-on quantities, keyed by service id.
///
/// Entries with quantity 0 are treated as absent.
pub type ServiceSelection = HashMap<i64, u32>;

/// Computed price summary for a booking form.
///
/// Derived output only -- recomputed from inputs on every change, never
/// persisted. `total_price` always equals `base_price + service_price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    /// Billable days; 0 until a date range is supplied, then always >= 1.
    pub stay_days: u32,
    /// The tier selected by matching, if pet attributes were known.
    pub matched_tier: Option<PriceTier>,
    pub price_per_day: f64,
    pub base_price: f64,
    pub service_price: f64,
    pub total_price: f64,
}

impl PriceBreakdown {
    /// The well-defined "nothing to show" breakdown for all-missing input.
    pub fn empty() -> Self {
        Self {
            stay_days: 0,
            matched_tier: None,
            price_per_day: 0.0,
            base_price: 0.0,
            service_price: 0.0,
            total_price: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_small_at_boundary() {
        assert_eq!(PetSize::from_weight_kg(10.0), PetSize::Small);
        assert_eq!(PetSize::from_weight_kg(7.5), PetSize::Small);
    }

    #[test]
    fn classify_medium_and_large() {
        assert_eq!(PetSize::from_weight_kg(10.1), PetSize::Medium);
        assert_eq!(PetSize::from_weight_kg(25.0), PetSize::Medium);
        assert_eq!(PetSize::from_weight_kg(25.1), PetSize::Large);
    }

    #[test]
    fn classify_non_positive_weight_as_small() {
        assert_eq!(PetSize::from_weight_kg(0.0), PetSize::Small);
        assert_eq!(PetSize::from_weight_kg(-3.0), PetSize::Small);
    }
}
