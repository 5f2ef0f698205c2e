//! Dashboard-wide sales summary and the time-series rows shared with
//! product statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Collection, Document};

/// Sales for one calendar month, keyed by English month name ("November").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    pub month: String,
    pub total_sales: f64,
    pub total_units: i64,
}

/// Sales for one day, keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyData {
    pub date: String,
    pub total_sales: f64,
    pub total_units: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStat {
    #[serde(rename = "_id")]
    pub id: String,
    pub total_customers: i64,
    pub yearly_sales_total: f64,
    pub yearly_total_sold_units: i64,
    pub year: i32,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyData>,
    #[serde(default)]
    pub daily_data: Vec<DailyData>,
    #[serde(default)]
    pub sales_by_category: BTreeMap<String, f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for OverallStat {
    const COLLECTION: Collection = Collection::OverallStats;
}
