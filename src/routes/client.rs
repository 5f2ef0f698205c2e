//! Client routes: product catalog, customers, transactions grid, geography.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::pagination::Pagination;
use crate::models::product::ProductWithStats;
use crate::models::transaction::TransactionPage;
use crate::models::user::{UserResponse, UserRole};
use crate::routes::extract::ValidQuery;
use crate::services::client::{self as client_service, TransactionFilters};
use crate::services::geography::CountryCount;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products))
        .route("/customers", get(customers))
        .route("/transactions", get(transactions))
        .route("/geography", get(geography))
}

/// GET /client/products - products with their yearly stats.
pub async fn products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductWithStats>>>, AppError> {
    let products = client_service::products_with_stats(state.store.as_ref()).await?;
    Ok(ApiResponse::success(products))
}

/// GET /client/customers - users with the `user` role.
pub async fn customers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let customers = client_service::users_with_role(state.store.as_ref(), UserRole::User).await?;
    Ok(ApiResponse::success(customers))
}

/// GET /client/transactions - searchable, sortable, paged transactions.
pub async fn transactions(
    State(state): State<AppState>,
    ValidQuery(pagination): ValidQuery<Pagination>,
    ValidQuery(filters): ValidQuery<TransactionFilters>,
) -> Result<Json<ApiResponse<TransactionPage>>, AppError> {
    let page =
        client_service::transactions(state.store.as_ref(), &filters, &pagination).await?;
    Ok(ApiResponse::success(page))
}

/// GET /client/geography - users per country (ISO alpha-3).
pub async fn geography(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CountryCount>>>, AppError> {
    let counts = client_service::geography(state.store.as_ref()).await?;
    Ok(ApiResponse::success(counts))
}
