//! Management routes: admin roster and affiliate performance.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::affiliate_stat::UserPerformance;
use crate::models::user::{UserResponse, UserRole};
use crate::services::{client as client_service, management};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(admins))
        .route("/performance/{id}", get(performance))
}

/// GET /management/admins - users with the `admin` role.
pub async fn admins(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let admins = client_service::users_with_role(state.store.as_ref(), UserRole::Admin).await?;
    Ok(ApiResponse::success(admins))
}

/// GET /management/performance/:id - a user's affiliate stat and its sales.
pub async fn performance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserPerformance>>, AppError> {
    let performance = management::user_performance(state.store.as_ref(), &id).await?;
    Ok(ApiResponse::success(performance))
}
