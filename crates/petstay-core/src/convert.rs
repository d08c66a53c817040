// ── Wire-to-domain conversion ──
//
// The API crate stays shape-faithful to the backend; this module turns
// its DTOs into canonical types. Missing wire fields degrade to empty
// labels / zero prices rather than erroring -- matching happens on
// whatever the backend actually sent.

use chrono::{DateTime, NaiveDateTime, Utc};

use petstay_api::catalog::{PriceTierDto, ServiceItemDto};
use petstay_api::orders::{OrderStatusDto, OrderSummaryDto};

use crate::model::{OrderState, OrderStatus, OrderSummary, PriceTier, ServiceItem};

/// Parse a backend timestamp: RFC 3339 first, then the bare
/// `YYYY-MM-DD HH:MM:SS` form older endpoints emit (interpreted as UTC).
pub(crate) fn parse_wire_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn order_status_from_dto(order_id: &str, dto: OrderStatusDto) -> OrderStatus {
    OrderStatus {
        order_id: dto.order_id.unwrap_or_else(|| order_id.to_owned()),
        state: OrderState::from_code(dto.order_status.unwrap_or(-1)),
        expire_seconds: dto.expire_seconds,
        deposit_paid: dto.deposit_paid == Some(1),
        create_time: dto.create_time.as_deref().and_then(parse_wire_time),
        total_price: dto.total_price,
        deposit_amount: dto.deposit_amount,
    }
}

pub fn order_summary_from_dto(dto: OrderSummaryDto) -> Option<OrderSummary> {
    Some(OrderSummary {
        order_id: dto.order_id?,
        state: OrderState::from_code(dto.order_status.unwrap_or(-1)),
        store_id: dto.store_id,
        store_name: dto.store_name,
        pet_name: dto.pet_name,
        expire_seconds: dto.expire_seconds,
        deposit_paid: dto.deposit_paid == Some(1),
        create_time: dto.create_time.as_deref().and_then(parse_wire_time),
        total_price: dto.total_price,
    })
}

pub fn price_tier_from_dto(dto: PriceTierDto) -> PriceTier {
    PriceTier {
        tier_id: dto.price_id,
        category: dto.pet_category.unwrap_or_default(),
        size_label: dto.pet_size.unwrap_or_default(),
        price_per_day: dto.price_per_day.unwrap_or(0.0),
    }
}

pub fn service_item_from_dto(dto: ServiceItemDto) -> Option<ServiceItem> {
    Some(ServiceItem {
        service_id: dto.service_id?,
        name: dto.service_name,
        description: dto.description,
        unit_price: dto.price.unwrap_or(0.0),
    })
}
