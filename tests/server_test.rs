//! Tests for the liveness HTTP surface

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ryze::server::build_router;
use tower::ServiceExt;

/// The health check answers 200 "OK" as a JSON string
#[tokio::test]
async fn test_health_check_ok() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/_health_check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"\"OK\"");
}

/// Unknown routes are 404
#[tokio::test]
async fn test_unknown_route() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Only GET is served on the health route
#[tokio::test]
async fn test_health_check_post_rejected() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/_health_check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
