//! Management views: affiliate performance per user.

use serde_json::json;

use crate::db::{find_as, find_by_id_as, DocumentStore};
use crate::errors::AppError;
use crate::models::affiliate_stat::{AffiliateStat, UserPerformance, UserWithAffiliateStats};
use crate::models::transaction::Transaction;
use crate::models::user::{User, UserResponse};

/// A user with their affiliate stat and the sales it references. Sales whose
/// transaction no longer exists are dropped.
pub async fn user_performance(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<UserPerformance, AppError> {
    let user = find_by_id_as::<User>(store, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{user_id}' not found")))?;

    let affiliate_stats = find_as::<AffiliateStat>(store, &json!({ "userId": user_id }))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            AppError::NotFound(format!("No affiliate statistics for user '{user_id}'"))
        })?;

    let mut sales = Vec::with_capacity(affiliate_stats.affiliate_sales.len());
    for transaction_id in &affiliate_stats.affiliate_sales {
        match find_by_id_as::<Transaction>(store, transaction_id).await? {
            Some(transaction) => sales.push(transaction),
            None => tracing::debug!(%transaction_id, "Affiliate sale references missing transaction"),
        }
    }

    Ok(UserPerformance {
        user: UserWithAffiliateStats {
            user: UserResponse::from(user),
            affiliate_stats,
        },
        sales,
    })
}
