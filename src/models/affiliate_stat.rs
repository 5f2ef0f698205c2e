use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Collection, Document};
use crate::models::transaction::Transaction;
use crate::models::user::UserResponse;

/// Per-affiliate performance: the transactions a user brought in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateStat {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub affiliate_sales: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for AffiliateStat {
    const COLLECTION: Collection = Collection::AffiliateStats;
}

/// User profile joined with its affiliate stat.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithAffiliateStats {
    #[serde(flatten)]
    pub user: UserResponse,
    pub affiliate_stats: AffiliateStat,
}

/// Response of the user performance endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UserPerformance {
    pub user: UserWithAffiliateStats,
    pub sales: Vec<Transaction>,
}
