// ── Order domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a boarding order.
///
/// The backend speaks numeric codes; unknown codes are preserved in
/// `Other` rather than dropped so list views can still render the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[non_exhaustive]
pub enum OrderState {
    #[strum(to_string = "cancelled")]
    Cancelled,
    /// Created, deposit not yet paid -- the only state with a live countdown.
    #[strum(to_string = "awaiting-confirmation")]
    AwaitingConfirmation,
    /// Deposit paid, stay reserved.
    #[strum(to_string = "reserved")]
    Reserved,
    #[strum(to_string = "boarding")]
    Boarding,
    #[strum(to_string = "awaiting-settlement")]
    AwaitingSettlement,
    #[strum(to_string = "completed")]
    Completed,
    #[strum(to_string = "unknown({code})")]
    Other { code: i32 },
}

impl OrderState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Cancelled,
            1 => Self::AwaitingConfirmation,
            2 => Self::Reserved,
            3 => Self::Boarding,
            4 => Self::AwaitingSettlement,
            5 => Self::Completed,
            other => Self::Other { code: other },
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Cancelled => 0,
            Self::AwaitingConfirmation => 1,
            Self::Reserved => 2,
            Self::Boarding => 3,
            Self::AwaitingSettlement => 4,
            Self::Completed => 5,
            Self::Other { code } => code,
        }
    }
}

/// Canonical live status of one order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatus {
    pub order_id: String,
    pub state: OrderState,
    /// Authoritative remaining seconds to pay, straight from the server.
    /// Absent once no longer applicable.
    pub expire_seconds: Option<i64>,
    pub deposit_paid: bool,
    pub create_time: Option<DateTime<Utc>>,
    pub total_price: Option<f64>,
    pub deposit_amount: Option<f64>,
}

impl OrderStatus {
    /// An order counts as awaiting payment only while it sits in
    /// `AwaitingConfirmation` with the deposit unpaid.
    pub fn awaiting_payment(&self) -> bool {
        self.state == OrderState::AwaitingConfirmation && !self.deposit_paid
    }
}

/// One row of an order-list view.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub state: OrderState,
    pub store_id: Option<i64>,
    pub store_name: Option<String>,
    pub pet_name: Option<String>,
    pub expire_seconds: Option<i64>,
    pub deposit_paid: bool,
    pub create_time: Option<DateTime<Utc>>,
    pub total_price: Option<f64>,
}

/// The persisted payment-countdown record for one order.
///
/// `expire_at` is the single source of truth; the cached
/// `last_known_remaining_secs` is re-derived on every read or refresh and
/// exists only so consumers can render the last value without a clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCountdown {
    pub order_id: String,
    pub expire_at: DateTime<Utc>,
    pub last_known_remaining_secs: i64,
    /// When the cached value was last recomputed. Informational only.
    pub last_update_time: DateTime<Utc>,
}
