// Order endpoints
//
// Wire DTOs stay shape-faithful to the backend: mixed camelCase/snake_case
// field names (the generated server surface is inconsistent), numeric
// status codes, optional everything. `petstay-core` converts these into
// canonical domain types.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Error;

/// Live status of a boarding order, as reported by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusDto {
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,

    /// Numeric order state: 0 cancelled, 1 awaiting confirmation,
    /// 2 reserved, 3 boarding, 4 awaiting settlement, 5 completed.
    #[serde(default, alias = "orderStatus")]
    pub order_status: Option<i32>,

    /// Authoritative remaining seconds to pay. Absent once the order is no
    /// longer awaiting payment.
    #[serde(default, alias = "expireSeconds")]
    pub expire_seconds: Option<i64>,

    /// 1 when the deposit has been paid.
    #[serde(default, alias = "depositPaid")]
    pub deposit_paid: Option<i32>,

    #[serde(default, alias = "createTime")]
    pub create_time: Option<String>,

    #[serde(default, alias = "totalPrice")]
    pub total_price: Option<f64>,

    #[serde(default, alias = "depositAmount")]
    pub deposit_amount: Option<f64>,
}

/// One row of the order-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummaryDto {
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,

    #[serde(default, alias = "orderStatus")]
    pub order_status: Option<i32>,

    #[serde(default, alias = "storeId")]
    pub store_id: Option<i64>,

    #[serde(default, alias = "storeName")]
    pub store_name: Option<String>,

    #[serde(default, alias = "petName")]
    pub pet_name: Option<String>,

    #[serde(default, alias = "expireSeconds")]
    pub expire_seconds: Option<i64>,

    #[serde(default, alias = "depositPaid")]
    pub deposit_paid: Option<i32>,

    #[serde(default, alias = "createTime")]
    pub create_time: Option<String>,

    #[serde(default, alias = "totalPrice")]
    pub total_price: Option<f64>,
}

/// The order-list endpoint sometimes wraps its rows in `{ "list": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MaybeList<T> {
    Items(Vec<T>),
    Wrapped { list: Vec<T> },
    One(T),
}

impl<T> MaybeList<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Items(items) => items,
            Self::Wrapped { list } => list,
            Self::One(item) => vec![item],
        }
    }
}

impl ApiClient {
    /// Fetch the live status of one order (includes remaining payment time).
    pub async fn order_status(&self, order_id: &str) -> Result<OrderStatusDto, Error> {
        let url = self.api_url(&format!("order/status/{order_id}"))?;
        self.get(url).await
    }

    /// List orders in a given numeric state.
    pub async fn orders_by_state(&self, state: i32) -> Result<Vec<OrderSummaryDto>, Error> {
        let mut url = self.api_url("order/list")?;
        url.query_pairs_mut()
            .append_pair("status", &state.to_string());
        let rows: MaybeList<OrderSummaryDto> = self.get(url).await?;
        Ok(rows.into_vec())
    }
}
