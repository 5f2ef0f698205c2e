use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Collection, Document};
use crate::models::overall_stat::{DailyData, MonthlyData};

/// Per-product yearly sales time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStat {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_id: String,
    pub yearly_sales_total: f64,
    pub yearly_total_sold_units: i64,
    pub year: i32,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyData>,
    #[serde(default)]
    pub daily_data: Vec<DailyData>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for ProductStat {
    const COLLECTION: Collection = Collection::ProductStats;
}
