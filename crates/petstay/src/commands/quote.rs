//! Quote command: price a stay against a store's tier table.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use owo_colors::OwoColorize;

use petstay_core::model::{PriceBreakdown, ServiceSelection};
use petstay_core::pricing::QuoteInputs;
use petstay_core::{ClientConfig, convert};

use crate::cli::{GlobalOpts, QuoteArgs};
use crate::error::CliError;
use crate::output;

/// Parse an RFC 3339 timestamp, or a bare date as midnight UTC.
fn parse_time(value: &str, field: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("invalid timestamp '{value}' (use RFC3339 or YYYY-MM-DD)"),
        })
}

/// Parse repeated `id=qty` service selections.
fn parse_services(raw: &[String]) -> Result<ServiceSelection, CliError> {
    let mut selection = HashMap::new();
    for pair in raw {
        let (id, qty) = pair.split_once('=').ok_or_else(|| CliError::Validation {
            field: "service".into(),
            reason: format!("expected ID=QTY, got '{pair}'"),
        })?;
        let id: i64 = id.trim().parse().map_err(|_| CliError::Validation {
            field: "service".into(),
            reason: format!("invalid service id '{id}'"),
        })?;
        let qty: u32 = qty.trim().parse().map_err(|_| CliError::Validation {
            field: "service".into(),
            reason: format!("invalid quantity '{qty}'"),
        })?;
        selection.insert(id, qty);
    }
    Ok(selection)
}

fn render_breakdown(breakdown: &PriceBreakdown, color: bool) -> String {
    let mut lines = Vec::new();

    match &breakdown.matched_tier {
        Some(tier) => {
            let label = if tier.size_label.is_empty() {
                "any size".to_owned()
            } else {
                tier.size_label.clone()
            };
            let category = if tier.category.is_empty() {
                "any pet"
            } else {
                tier.category.as_str()
            };
            lines.push(format!(
                "Tier:           {category} / {label} @ {:.2}/day",
                tier.price_per_day
            ));
        }
        None => lines.push("Tier:           (none matched)".to_owned()),
    }

    lines.push(format!("Stay days:      {}", breakdown.stay_days));
    lines.push(format!("Base price:     {:.2}", breakdown.base_price));
    lines.push(format!("Service price:  {:.2}", breakdown.service_price));

    let total = format!("{:.2}", breakdown.total_price);
    if color {
        lines.push(format!("Total:          {}", total.bold().green()));
    } else {
        lines.push(format!("Total:          {total}"));
    }

    lines.join("\n")
}

pub async fn handle(
    args: QuoteArgs,
    global: &GlobalOpts,
    config: &ClientConfig,
) -> Result<(), CliError> {
    let start = args.start.as_deref().map(|v| parse_time(v, "start")).transpose()?;
    let end = args.end.as_deref().map(|v| parse_time(v, "end")).transpose()?;
    if let (Some(s), Some(e)) = (start, end) {
        if e <= s {
            return Err(CliError::Validation {
                field: "end".into(),
                reason: "end must be after start".into(),
            });
        }
    }
    let selection = parse_services(&args.services)?;

    let api = super::build_api(config)?;

    let store = api.store_detail(args.store).await?;
    let catalog_dtos = api.service_items(args.store).await?;

    let tiers: Vec<_> = store
        .prices
        .into_iter()
        .map(convert::price_tier_from_dto)
        .collect();
    let catalog: Vec<_> = catalog_dtos
        .into_iter()
        .filter_map(convert::service_item_from_dto)
        .collect();

    tracing::debug!(
        tiers = tiers.len(),
        services = catalog.len(),
        "fetched store catalog"
    );

    let breakdown = petstay_core::compute_price_breakdown(&QuoteInputs {
        tiers: &tiers,
        pet_type: args.pet_type.as_deref(),
        pet_weight_kg: args.weight,
        start,
        end,
        services: Some(&selection),
        catalog: &catalog,
    });

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &breakdown,
        |b| render_breakdown(b, color),
        |b| format!("{:.2}", b.total_price),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_dates_as_midnight() {
        let dt = parse_time("2025-11-02", "start").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-11-02T00:00:00+00:00");
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_time("tomorrow", "start").is_err());
    }

    #[test]
    fn parses_service_pairs() {
        let selection = parse_services(&["1=2".into(), "3=5".into()]).unwrap();
        assert_eq!(selection.get(&1), Some(&2));
        assert_eq!(selection.get(&3), Some(&5));
    }

    #[test]
    fn rejects_malformed_service_pairs() {
        assert!(parse_services(&["bath".into()]).is_err());
        assert!(parse_services(&["1=lots".into()]).is_err());
    }
}
