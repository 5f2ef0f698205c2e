//! Client-facing listings: products, customers, transactions, geography.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::json;

use crate::db::{find_as, DocumentStore};
use crate::errors::AppError;
use crate::models::pagination::Pagination;
use crate::models::product::{Product, ProductWithStats};
use crate::models::product_stat::ProductStat;
use crate::models::transaction::{Transaction, TransactionPage};
use crate::models::user::{User, UserResponse, UserRole};
use crate::services::geography::{self, CountryCount};

/// Search and sort parameters for the transactions grid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilters {
    /// JSON object `{"field": "...", "sort": "asc" | "desc"}`.
    pub sort: Option<String>,
    /// Case-insensitive regex matched against `cost` and `userId`.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Id,
    UserId,
    Cost,
    Products,
    CreatedAt,
    UpdatedAt,
}

impl TransactionField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "_id" | "id" => Some(Self::Id),
            "userId" => Some(Self::UserId),
            "cost" => Some(Self::Cost),
            "products" => Some(Self::Products),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::UserId => a.user_id.cmp(&b.user_id),
            Self::Cost => match (a.cost.parse::<f64>(), b.cost.parse::<f64>()) {
                (Ok(x), Ok(y)) => x.total_cmp(&y),
                _ => a.cost.cmp(&b.cost),
            },
            Self::Products => a.products.len().cmp(&b.products.len()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: TransactionField,
    pub direction: SortDirection,
}

#[derive(Deserialize)]
struct RawSort {
    field: String,
    #[serde(default = "default_direction")]
    sort: SortDirection,
}

fn default_direction() -> SortDirection {
    SortDirection::Asc
}

impl SortSpec {
    /// Parse the grid's sort model. Blank input and `null` mean unsorted.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, AppError> {
        let raw = match raw.map(str::trim) {
            None | Some("") | Some("null") => return Ok(None),
            Some(raw) => raw,
        };

        let parsed: RawSort = serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("Invalid sort parameter: {e}")))?;
        let field = TransactionField::parse(&parsed.field).ok_or_else(|| {
            AppError::Validation(format!("Cannot sort transactions by '{}'", parsed.field))
        })?;

        Ok(Some(Self {
            field,
            direction: parsed.sort,
        }))
    }

    fn apply(self, transactions: &mut [Transaction]) {
        transactions.sort_by(|a, b| {
            let ordering = self.field.compare(a, b);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

fn search_pattern(search: Option<&str>) -> Result<Option<Regex>, AppError> {
    match search.map(str::trim) {
        None | Some("") => Ok(None),
        Some(pattern) => RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(|e| AppError::Validation(format!("Invalid search pattern: {e}"))),
    }
}

/// Every product with its statistics attached.
pub async fn products_with_stats(
    store: &dyn DocumentStore,
) -> Result<Vec<ProductWithStats>, AppError> {
    let products = find_as::<Product>(store, &json!({})).await?;

    let mut stats_by_product: HashMap<String, Vec<ProductStat>> = HashMap::new();
    for stat in find_as::<ProductStat>(store, &json!({})).await? {
        stats_by_product
            .entry(stat.product_id.clone())
            .or_default()
            .push(stat);
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let stat = stats_by_product.remove(&product.id).unwrap_or_default();
            ProductWithStats { product, stat }
        })
        .collect())
}

/// Users with the given role, password removed.
pub async fn users_with_role(
    store: &dyn DocumentStore,
    role: UserRole,
) -> Result<Vec<UserResponse>, AppError> {
    let users = find_as::<User>(store, &json!({ "role": role.as_str() })).await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

/// Search, sort and page the transactions grid. `total` counts every match
/// before paging.
pub async fn transactions(
    store: &dyn DocumentStore,
    filters: &TransactionFilters,
    pagination: &Pagination,
) -> Result<TransactionPage, AppError> {
    let sort = SortSpec::parse(filters.sort.as_deref())?;
    let pattern = search_pattern(filters.search.as_deref())?;

    let mut matching: Vec<Transaction> = find_as::<Transaction>(store, &json!({}))
        .await?
        .into_iter()
        .filter(|t| {
            pattern
                .as_ref()
                .map_or(true, |re| re.is_match(&t.cost) || re.is_match(&t.user_id))
        })
        .collect();

    if let Some(sort) = sort {
        sort.apply(&mut matching);
    }

    let total = matching.len();
    let transactions = matching
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit())
        .collect();

    Ok(TransactionPage {
        transactions,
        total,
    })
}

/// User counts per alpha-3 country code.
pub async fn geography(store: &dyn DocumentStore) -> Result<Vec<CountryCount>, AppError> {
    let users = find_as::<User>(store, &json!({})).await?;
    Ok(geography::count_by_country(&users))
}
