//! Route definitions for the dashboard API.

pub mod client;
pub mod extract;
pub mod general;
pub mod health;
pub mod management;
pub mod sales;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::errors::AppError;
use crate::middleware::{access_log, security_headers};
use crate::AppState;

/// Largest accepted request body (JSON or URL-encoded).
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Build the full application: four route groups plus health probes, with
/// the same middleware stack on every route.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/client", client::routes())
        .nest("/general", general::routes())
        .nest("/management", management::routes())
        .nest("/sales", sales::routes())
        .nest("/health", health::routes())
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive());

    security_headers::apply(router)
        .layer(access_log::layer())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use chrono::NaiveDate;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::db::{MemoryStore, SharedStore};
    use crate::services::seed;

    async fn app() -> Router {
        let store: SharedStore = std::sync::Arc::new(MemoryStore::new());
        seed::seed_all(store.as_ref()).await.unwrap();
        create_router(AppState {
            store,
            config: AppConfig {
                database_url: "memory://".to_string(),
                database_max_connections: 1,
                host: "127.0.0.1".to_string(),
                port: 0,
                reference_date: NaiveDate::from_ymd_opt(2021, 11, 15).unwrap(),
            },
        })
    }

    async fn get(uri: &str) -> Response {
        app()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn customers_route_hides_passwords() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/client/customers")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["cross-origin-resource-policy"],
            "cross-origin"
        );

        let body = json_body(response).await;
        let customers = body["data"].as_array().unwrap();
        assert_eq!(customers.len(), 7);
        assert!(customers.iter().all(|c| c.get("password").is_none()));
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn transactions_route_reads_query() {
        let response = get("/client/transactions?page=0&pageSize=5&search=134ad24e").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn malformed_paging_uses_the_envelope() {
        for uri in [
            "/client/transactions?page=-1",
            "/client/transactions?pageSize=lots",
        ] {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                response.headers()["content-type"],
                "application/json",
                "{uri}"
            );
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn sparse_documents_do_not_break_listings() {
        let store: SharedStore = std::sync::Arc::new(MemoryStore::new());
        let legacy_users = (0..5)
            .map(|i| serde_json::json!({"_id": format!("legacy-{i}"), "name": "Legacy", "country": "US"}))
            .collect();
        store
            .insert_many(crate::db::Collection::Users, legacy_users)
            .await
            .unwrap();
        seed::seed_all(store.as_ref()).await.unwrap();
        store
            .insert_many(
                crate::db::Collection::Transactions,
                vec![serde_json::json!({"_id": "legacy-t", "userId": "legacy-0"})],
            )
            .await
            .unwrap();
        let app = create_router(AppState {
            store,
            config: AppConfig {
                database_url: "memory://".to_string(),
                database_max_connections: 1,
                host: "127.0.0.1".to_string(),
                port: 0,
                reference_date: NaiveDate::from_ymd_opt(2021, 11, 15).unwrap(),
            },
        });

        let call = |uri: &'static str| {
            app.clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        };

        let response = call("/client/geography").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows, &[serde_json::json!({"id": "USA", "value": 5})]);

        let response = call("/client/transactions").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["total"], 24);

        let response = call("/general/dashboard").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bad_sort_is_a_validation_error() {
        let response = get("/client/transactions?sort=%7Bbroken").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let response = get("/general/user/does-not-exist").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn dashboard_and_sales_routes() {
        let body = json_body(get("/general/dashboard").await).await;
        assert_eq!(body["data"]["totalCustomers"], 7);
        assert_eq!(body["data"]["thisMonthStats"]["month"], "November");

        let body = json_body(get("/sales/sales").await).await;
        assert_eq!(body["data"]["year"], 2021);
    }

    #[tokio::test]
    async fn management_routes() {
        let body = json_body(get("/management/admins").await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);

        let body = json_body(get("/management/performance/134ad24e99806ca111197065").await).await;
        assert_eq!(body["data"]["sales"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"]["user"]["name"], "Tillie");
    }

    #[tokio::test]
    async fn geography_route() {
        let body = json_body(get("/client/geography").await).await;
        let rows = body["data"].as_array().unwrap();
        assert!(rows.iter().any(|r| r["id"] == "USA" && r["value"] == 2));
    }

    #[tokio::test]
    async fn unknown_path_uses_the_envelope() {
        let response = get("/nowhere").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn readiness_reports_backend() {
        let body = json_body(get("/health/ready").await).await;
        assert_eq!(body["data"]["backend"], "memory");
        assert_eq!(body["data"]["store"], "connected");
    }
}
