// ── Price engine ──
//
// Pure computation from (price table, pet attributes, date range, service
// selection) to a price breakdown. No I/O, no state, no error channel:
// a booking form calls this on every field change, and partial or invalid
// input always degrades to a zero/empty breakdown instead of failing.

use chrono::{DateTime, Utc};

use crate::model::{PetSize, PriceBreakdown, PriceTier, ServiceItem, ServiceSelection};

const SECS_PER_DAY: i64 = 86_400;

/// Everything a quote needs. All pet/date fields are optional -- the form
/// may be half-filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteInputs<'a> {
    pub tiers: &'a [PriceTier],
    pub pet_type: Option<&'a str>,
    pub pet_weight_kg: Option<f64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub services: Option<&'a ServiceSelection>,
    pub catalog: &'a [ServiceItem],
}

/// Remove parenthesized annotations from a size label and trim.
///
/// Handles both half-width `(...)` and full-width `（...）` -- store seed
/// data uses both. Unclosed parentheses are left as-is.
pub fn strip_annotation(label: &str) -> String {
    fn strip_pair(s: &str, open: char, close: char) -> String {
        let mut out = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find(open) {
            let Some(rel_end) = rest[start..].find(close) else {
                break;
            };
            out.push_str(&rest[..start]);
            rest = &rest[start + rel_end + close.len_utf8()..];
        }
        out.push_str(rest);
        out
    }

    let stripped = strip_pair(label, '(', ')');
    strip_pair(&stripped, '（', '）').trim().to_owned()
}

/// A label that matches any value: empty, "any", or "all".
fn is_wildcard(label: &str) -> bool {
    matches!(label, "" | "any" | "all")
}

/// Match a tier by pet type and size, in strict priority order:
///
/// 1. exact category + exact size (annotation-stripped size also counts)
/// 2. exact category + wildcard size
/// 3. wildcard category + exact size
/// 4. wildcard category + wildcard size
/// 5. the first tier in the table
///
/// Step 5 deliberately returns *some* price rather than none when nothing
/// matches -- deployed price tables rely on it as the default row. Callers
/// that need "no price available" must check the table themselves first.
pub fn match_tier<'t>(
    tiers: &'t [PriceTier],
    pet_type: &str,
    size: PetSize,
) -> Option<&'t PriceTier> {
    if tiers.is_empty() {
        return None;
    }

    let pet_type = pet_type.trim();
    let token = size.token();

    let size_matches = |tier: &PriceTier| {
        let label = tier.size_label.trim();
        label == token || strip_annotation(label) == token
    };
    let size_is_wildcard = |tier: &PriceTier| {
        let label = tier.size_label.trim();
        is_wildcard(label) || is_wildcard(&strip_annotation(label))
    };
    let category_exact = |tier: &PriceTier| tier.category.trim() == pet_type;
    let category_wildcard = |tier: &PriceTier| is_wildcard(tier.category.trim());

    tiers
        .iter()
        .find(|t| category_exact(t) && size_matches(t))
        .or_else(|| tiers.iter().find(|t| category_exact(t) && size_is_wildcard(t)))
        .or_else(|| tiers.iter().find(|t| category_wildcard(t) && size_matches(t)))
        .or_else(|| {
            tiers
                .iter()
                .find(|t| category_wildcard(t) && size_is_wildcard(t))
        })
        .or_else(|| tiers.first())
}

/// Billable days between two instants: hours / 24, rounded up, minimum 1.
///
/// Ordering is the caller's problem (the form rejects inverted ranges
/// before quoting); whenever this is invoked it guarantees at least one
/// billable day.
pub fn stay_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let secs = (end - start).num_seconds();
    let days = if secs > 0 {
        i64::try_from((secs as u64).div_ceil(SECS_PER_DAY as u64)).unwrap_or(i64::MAX)
    } else {
        0
    };
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}

/// Sum of `unit_price * quantity` over selected services.
///
/// Zero quantities are skipped; ids missing from the catalog contribute 0.
pub fn service_price(selection: &ServiceSelection, catalog: &[ServiceItem]) -> f64 {
    selection
        .iter()
        .filter(|&(_, &qty)| qty > 0)
        .map(|(id, &qty)| {
            catalog
                .iter()
                .find(|item| item.service_id == *id)
                .map_or(0.0, |item| item.unit_price * f64::from(qty))
        })
        .sum()
}

/// Compute the full price breakdown for the current form state.
///
/// Base price requires a known pet type, a positive weight, and a matched
/// tier; everything else contributes zero. Never fails.
pub fn compute_price_breakdown(inputs: &QuoteInputs<'_>) -> PriceBreakdown {
    let stay_days = match (inputs.start, inputs.end) {
        (Some(start), Some(end)) => stay_days(start, end),
        _ => 0,
    };

    let mut matched_tier = None;
    let mut price_per_day = 0.0;
    let mut base_price = 0.0;

    if let (Some(pet_type), Some(weight)) = (inputs.pet_type, inputs.pet_weight_kg) {
        if !pet_type.trim().is_empty() && weight > 0.0 {
            let size = PetSize::from_weight_kg(weight);
            matched_tier = match_tier(inputs.tiers, pet_type, size).cloned();
            if let Some(tier) = &matched_tier {
                price_per_day = tier.price_per_day;
                base_price = price_per_day * f64::from(stay_days);
            }
        }
    }

    let service_price = inputs
        .services
        .map_or(0.0, |selection| service_price(selection, inputs.catalog));

    PriceBreakdown {
        stay_days,
        matched_tier,
        price_per_day,
        base_price,
        service_price,
        total_price: base_price + service_price,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn tier(category: &str, size: &str, price: f64) -> PriceTier {
        PriceTier {
            tier_id: None,
            category: category.into(),
            size_label: size.into(),
            price_per_day: price,
        }
    }

    fn item(id: i64, price: f64) -> ServiceItem {
        ServiceItem {
            service_id: id,
            name: None,
            description: None,
            unit_price: price,
        }
    }

    // ── Annotation stripping ────────────────────────────────────────

    #[test]
    fn strips_half_width_annotation() {
        assert_eq!(strip_annotation("small(<=7.5kg)"), "small");
    }

    #[test]
    fn strips_full_width_annotation() {
        assert_eq!(strip_annotation("small（<=7.5kg）"), "small");
    }

    #[test]
    fn strips_and_trims() {
        assert_eq!(strip_annotation("  medium (10-25kg) "), "medium");
    }

    #[test]
    fn leaves_unclosed_parenthesis() {
        assert_eq!(strip_annotation("small(<=7.5"), "small(<=7.5");
    }

    // ── Tier matching ───────────────────────────────────────────────

    #[test]
    fn exact_match_beats_wildcard() {
        let tiers = [tier("dog", "small", 10.0), tier("any", "any", 5.0)];
        let matched = match_tier(&tiers, "dog", PetSize::Small).unwrap();
        assert_eq!(matched.price_per_day, 10.0);
    }

    #[test]
    fn wildcard_category_catches_other_species() {
        let tiers = [tier("dog", "small", 10.0), tier("any", "any", 5.0)];
        let matched = match_tier(&tiers, "cat", PetSize::Small).unwrap();
        assert_eq!(matched.price_per_day, 5.0);
    }

    #[test]
    fn annotated_size_label_matches_bare_token() {
        let tiers = [tier("dog", "small(<=7.5kg)", 48.0)];
        let matched = match_tier(&tiers, "dog", PetSize::Small).unwrap();
        assert_eq!(matched.price_per_day, 48.0);
    }

    #[test]
    fn exact_category_wildcard_size_beats_wildcard_category() {
        let tiers = [
            tier("any", "small", 7.0),
            tier("dog", "all", 12.0),
        ];
        let matched = match_tier(&tiers, "dog", PetSize::Small).unwrap();
        assert_eq!(matched.price_per_day, 12.0);
    }

    #[test]
    fn empty_labels_act_as_wildcards() {
        let tiers = [tier("", "", 9.0)];
        let matched = match_tier(&tiers, "rabbit", PetSize::Large).unwrap();
        assert_eq!(matched.price_per_day, 9.0);
    }

    #[test]
    fn fallback_returns_first_tier_when_nothing_matches() {
        // Pinned behavior: an unmatched request still gets the first row.
        let tiers = [tier("cat", "large", 20.0)];
        let matched = match_tier(&tiers, "dog", PetSize::Small).unwrap();
        assert_eq!(matched.price_per_day, 20.0);
    }

    #[test]
    fn empty_table_matches_nothing() {
        assert!(match_tier(&[], "dog", PetSize::Small).is_none());
    }

    // ── Stay days ───────────────────────────────────────────────────

    #[test]
    fn partial_day_rounds_up() {
        let start = Utc::now();
        assert_eq!(stay_days(start, start + TimeDelta::hours(25)), 2);
    }

    #[test]
    fn short_stay_clamps_to_one_day() {
        let start = Utc::now();
        assert_eq!(stay_days(start, start + TimeDelta::hours(1)), 1);
    }

    #[test]
    fn exact_days_do_not_round_up() {
        let start = Utc::now();
        assert_eq!(stay_days(start, start + TimeDelta::hours(48)), 2);
    }

    #[test]
    fn inverted_range_clamps_to_one_day() {
        let start = Utc::now();
        assert_eq!(stay_days(start, start - TimeDelta::hours(5)), 1);
        assert_eq!(stay_days(start, start), 1);
    }

    // ── Service price ───────────────────────────────────────────────

    #[test]
    fn sums_selected_services() {
        let catalog = [item(1, 10.0), item(3, 2.0)];
        let selection: ServiceSelection = HashMap::from([(1, 2), (2, 0), (3, 5)]);
        // id 2 has zero quantity; id 2 is also absent from the catalog.
        assert_eq!(service_price(&selection, &catalog), 30.0);
    }

    #[test]
    fn unknown_service_id_contributes_zero() {
        let catalog = [item(1, 10.0)];
        let selection: ServiceSelection = HashMap::from([(1, 1), (99, 4)]);
        assert_eq!(service_price(&selection, &catalog), 10.0);
    }

    #[test]
    fn empty_selection_is_free() {
        let catalog = [item(1, 10.0)];
        assert_eq!(service_price(&HashMap::new(), &catalog), 0.0);
    }

    // ── Breakdown ───────────────────────────────────────────────────

    #[test]
    fn breakdown_totals_add_up() {
        let tiers = [tier("dog", "small", 50.0)];
        let catalog = [item(1, 10.0), item(3, 2.0)];
        let selection: ServiceSelection = HashMap::from([(1, 2), (3, 5)]);
        let start = Utc::now();

        let breakdown = compute_price_breakdown(&QuoteInputs {
            tiers: &tiers,
            pet_type: Some("dog"),
            pet_weight_kg: Some(6.0),
            start: Some(start),
            end: Some(start + TimeDelta::hours(48)),
            services: Some(&selection),
            catalog: &catalog,
        });

        assert_eq!(breakdown.stay_days, 2);
        assert_eq!(breakdown.base_price, 100.0);
        assert_eq!(breakdown.service_price, 30.0);
        assert_eq!(breakdown.total_price, 130.0);
    }

    #[test]
    fn missing_pet_attributes_zero_the_base_price() {
        let tiers = [tier("dog", "small", 50.0)];
        let catalog = [item(1, 10.0)];
        let selection: ServiceSelection = HashMap::from([(1, 3)]);

        let breakdown = compute_price_breakdown(&QuoteInputs {
            tiers: &tiers,
            services: Some(&selection),
            catalog: &catalog,
            ..QuoteInputs::default()
        });

        assert!(breakdown.matched_tier.is_none());
        assert_eq!(breakdown.base_price, 0.0);
        assert_eq!(breakdown.service_price, 30.0);
        assert_eq!(breakdown.total_price, 30.0);
    }

    #[test]
    fn all_missing_input_yields_the_empty_breakdown() {
        let breakdown = compute_price_breakdown(&QuoteInputs::default());
        assert_eq!(breakdown, PriceBreakdown::empty());
    }

    #[test]
    fn non_positive_weight_never_matches() {
        let tiers = [tier("dog", "small", 50.0)];

        let breakdown = compute_price_breakdown(&QuoteInputs {
            tiers: &tiers,
            pet_type: Some("dog"),
            pet_weight_kg: Some(0.0),
            ..QuoteInputs::default()
        });

        assert!(breakdown.matched_tier.is_none());
        assert_eq!(breakdown.total_price, 0.0);
    }

    #[test]
    fn base_price_without_dates_is_zero() {
        // A matched tier with no date range bills zero days.
        let tiers = [tier("dog", "small", 50.0)];

        let breakdown = compute_price_breakdown(&QuoteInputs {
            tiers: &tiers,
            pet_type: Some("dog"),
            pet_weight_kg: Some(6.0),
            ..QuoteInputs::default()
        });

        assert!(breakdown.matched_tier.is_some());
        assert_eq!(breakdown.stay_days, 0);
        assert_eq!(breakdown.base_price, 0.0);
    }
}
