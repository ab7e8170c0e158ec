//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits (art uploads are raw bytes, so the limit comes from `Config`)
//! - Global timeout

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply HTTP-level middleware to the given Router.
///
/// - `max_body_bytes` bounds every request body, including `Bytes` extractors
///   (axum's own 2 MiB default is replaced).
pub fn apply(router: Router, max_body_bytes: usize) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::post};
    use tower::ServiceExt;

    async fn accept(body: axum::body::Bytes) -> String {
        body.len().to_string()
    }

    fn app(limit: usize) -> Router {
        apply(Router::new().route("/upload", post(accept)), limit)
    }

    fn upload(len: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from(vec![0u8; len]))
            .unwrap()
    }

    #[tokio::test]
    async fn sets_request_id_on_response() {
        let response = app(16).oneshot(upload(4)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn rejects_bodies_over_limit() {
        let response = app(16).oneshot(upload(17)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn allows_bodies_larger_than_axum_default() {
        let three_mib = 3 * 1024 * 1024;
        let response = app(4 * 1024 * 1024).oneshot(upload(three_mib)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
