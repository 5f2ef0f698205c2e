use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Collection, Document};
use crate::models::product_stat::ProductStat;

/// Catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub supply: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for Product {
    const COLLECTION: Collection = Collection::Products;
}

/// Product joined with its yearly statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithStats {
    #[serde(flatten)]
    pub product: Product,
    pub stat: Vec<ProductStat>,
}
