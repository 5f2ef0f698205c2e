//! Sales routes.

use axum::{extract::State, routing::get, Json, Router};

use crate::errors::{ApiResponse, AppError};
use crate::models::overall_stat::OverallStat;
use crate::services::dashboard;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/sales", get(sales))
}

/// GET /sales/sales - overall sales statistics.
pub async fn sales(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OverallStat>>, AppError> {
    let overall = dashboard::sales_overview(state.store.as_ref()).await?;
    Ok(ApiResponse::success(overall))
}
