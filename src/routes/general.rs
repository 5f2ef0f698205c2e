//! General routes: single user lookup and the dashboard overview.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::db::find_by_id_as;
use crate::errors::{ApiResponse, AppError};
use crate::models::user::{User, UserResponse};
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/{id}", get(user))
        .route("/dashboard", get(stats))
}

/// GET /general/user/:id - a user profile without the password.
pub async fn user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = find_by_id_as::<User>(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{id}' not found")))?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// GET /general/dashboard - aggregated dashboard statistics.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = dashboard::get_stats(state.store.as_ref(), state.config.reference_date).await?;
    Ok(ApiResponse::success(stats))
}
