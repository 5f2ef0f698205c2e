//! Dashboard statistics and the sales overview.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::json;

use crate::db::{find_as, DocumentStore};
use crate::errors::AppError;
use crate::models::overall_stat::{DailyData, MonthlyData, OverallStat};
use crate::models::transaction::Transaction;

/// Number of transactions shown in the dashboard feed.
const RECENT_TRANSACTIONS: usize = 50;

/// Aggregated statistics for the main overview page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_customers: i64,
    pub yearly_total_sold_units: i64,
    pub yearly_sales_total: f64,
    pub monthly_data: Vec<MonthlyData>,
    pub sales_by_category: BTreeMap<String, f64>,
    pub this_month_stats: Option<MonthlyData>,
    pub today_stats: Option<DailyData>,
    pub transactions: Vec<Transaction>,
}

/// Dashboard numbers as of `today`.
pub async fn get_stats(
    store: &dyn DocumentStore,
    today: NaiveDate,
) -> Result<DashboardStats, AppError> {
    let year = today.year();
    let month = today.format("%B").to_string();
    let day = today.format("%Y-%m-%d").to_string();

    let overall = find_as::<OverallStat>(store, &json!({ "year": year }))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("No overall statistics for {year}")))?;

    let transactions = recent_transactions(store).await?;

    let this_month_stats = overall
        .monthly_data
        .iter()
        .find(|m| m.month == month)
        .cloned();
    let today_stats = overall.daily_data.iter().find(|d| d.date == day).cloned();

    Ok(DashboardStats {
        total_customers: overall.total_customers,
        yearly_total_sold_units: overall.yearly_total_sold_units,
        yearly_sales_total: overall.yearly_sales_total,
        monthly_data: overall.monthly_data,
        sales_by_category: overall.sales_by_category,
        this_month_stats,
        today_stats,
        transactions,
    })
}

/// Newest transactions first, capped at [`RECENT_TRANSACTIONS`].
async fn recent_transactions(store: &dyn DocumentStore) -> Result<Vec<Transaction>, AppError> {
    let mut transactions = find_as::<Transaction>(store, &json!({})).await?;
    // Stable sort: equal timestamps keep insertion order.
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    transactions.truncate(RECENT_TRANSACTIONS);
    Ok(transactions)
}

/// The overall sales statistics document.
pub async fn sales_overview(store: &dyn DocumentStore) -> Result<OverallStat, AppError> {
    find_as::<OverallStat>(store, &json!({}))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("No overall statistics recorded".to_string()))
}
