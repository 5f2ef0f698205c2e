//! Per-request access logging in the fields of the common log format:
//! remote address, request line, status and response length.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::http::{header::CONTENT_LENGTH, Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::Span;

pub type AccessLogLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, DefaultOnRequest, AccessLine>;

/// Tracing layer that opens a span per request and logs one line per response.
pub fn layer() -> AccessLogLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(AccessLine)
}

#[derive(Debug, Clone, Copy)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "-".to_string());

        tracing::info_span!(
            "request",
            remote_addr = %remote_addr,
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessLine;

impl<B> OnResponse<B> for AccessLine {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info!(
            status = response.status().as_u16(),
            length,
            latency_ms = latency.as_millis() as u64,
            "request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;
    use crate::testing::CapturedLogs;

    #[test]
    fn span_is_built_without_connect_info() {
        let request = Request::builder()
            .uri("/client/products")
            .body(())
            .unwrap();
        // No subscriber is installed, so the span is disabled; building it
        // must still not panic on a missing remote address.
        let _span = RequestSpan.make_span(&request);
    }

    #[tokio::test]
    async fn one_line_per_response_with_status_length_and_latency() {
        let (logs, _guard) = CapturedLogs::install();
        let app = Router::new()
            .route(
                "/ok",
                get(|| async { ([(CONTENT_LENGTH, "2")], "ok") }),
            )
            .layer(layer());

        let response = app
            .oneshot(Request::builder().uri("/ok?x=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let lines: Vec<serde_json::Value> = logs
            .contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .filter(|line: &serde_json::Value| line["fields"]["message"] == "request completed")
            .collect();
        assert_eq!(lines.len(), 1);

        let line = &lines[0];
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["fields"]["status"], 200);
        assert_eq!(line["fields"]["length"], "2");
        assert!(line["fields"]["latency_ms"].is_u64());
        assert_eq!(line["span"]["method"], "GET");
        assert_eq!(line["span"]["uri"], "/ok?x=1");
        assert_eq!(line["span"]["remote_addr"], "-");
    }
}
