// Store catalog endpoints: price tiers and add-on service items.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Error;
use crate::orders::MaybeList;

/// One row of a store's tiered price table.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceTierDto {
    #[serde(default, alias = "priceId")]
    pub price_id: Option<i64>,

    /// Pet species label (e.g. "dog"). Empty / "any" / "all" is a wildcard.
    #[serde(default, alias = "petCategory")]
    pub pet_category: Option<String>,

    /// Size bracket label, possibly annotated: "small(<=7.5kg)".
    #[serde(default, alias = "petSize")]
    pub pet_size: Option<String>,

    #[serde(default, alias = "pricePerDay")]
    pub price_per_day: Option<f64>,
}

/// Store detail payload. Only the fields the core consumes are modeled;
/// the backend sends plenty more.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreDetailDto {
    #[serde(default, alias = "storeId")]
    pub store_id: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, alias = "fullAddress")]
    pub full_address: Option<String>,

    #[serde(default)]
    pub prices: Vec<PriceTierDto>,
}

/// One add-on service offered by a store.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceItemDto {
    #[serde(default, alias = "serviceId")]
    pub service_id: Option<i64>,

    #[serde(default, alias = "serviceName")]
    pub service_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Serialize)]
struct ServiceItemQuery {
    #[serde(rename = "storeId")]
    store_id: i64,
}

impl ApiClient {
    /// Fetch a store's detail record, including its price tier table.
    pub async fn store_detail(&self, store_id: i64) -> Result<StoreDetailDto, Error> {
        let url = self.api_url(&format!("store/{store_id}"))?;
        self.get(url).await
    }

    /// Fetch the add-on service catalog for a store.
    pub async fn service_items(&self, store_id: i64) -> Result<Vec<ServiceItemDto>, Error> {
        let url = self.api_url("service-item/list")?;
        let rows: MaybeList<ServiceItemDto> = self.post(url, &ServiceItemQuery { store_id }).await?;
        Ok(rows.into_vec())
    }
}
