//! HTTP surface integration tests
//!
//! Drive the axum router end to end with in-memory state and a mock
//! Google Books server.

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use helpers::{memory_pool, mock_no_results, mock_volumes, test_state, volume_json};
use http_body_util::BodyExt;
use libris_api::build_router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::MockServer;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = build_router(test_state(memory_pool().await, &server.uri()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "libris-api");
}

#[tokio::test]
async fn test_find_book_requires_title() {
    let server = MockServer::start().await;
    let app = build_router(test_state(memory_pool().await, &server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/books/find?authors=Frank%20Herbert")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_find_book_success_with_provenance() {
    let server = MockServer::start().await;
    mock_volumes(
        &server,
        vec![volume_json("gb-dune", "Dune", &["Frank Herbert"], "en")],
    )
    .await;

    let app = build_router(test_state(memory_pool().await, &server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/books/find?title=Dune&authors=Frank%20Herbert")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["source"], "external");
    assert_eq!(body["book"]["external_id"], "gb-dune");
    assert_eq!(body["book"]["title"], "Dune");
}

#[tokio::test]
async fn test_find_book_not_found() {
    let server = MockServer::start().await;
    mock_no_results(&server).await;

    let app = build_router(test_state(memory_pool().await, &server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/books/find?title=qwzx%20unbook")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cache_endpoints_inspect_and_clear() {
    let server = MockServer::start().await;
    mock_volumes(
        &server,
        vec![volume_json("gb-dune", "Dune", &["Frank Herbert"], "en")],
    )
    .await;

    let app = build_router(test_state(memory_pool().await, &server.uri()));

    // Resolve once to populate the cache
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/books/find?title=Dune")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/cache/contents")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Dune");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cleared"], 1);

    // Cleared cache: same query now resolves from the database
    let response = app
        .oneshot(
            Request::builder()
                .uri("/books/find?title=Dune")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["source"], "database");
    assert_eq!(body["book"]["external_id"], "gb-dune");
}

#[tokio::test]
async fn test_recommendation_resolve_and_list_flow() {
    let server = MockServer::start().await;
    mock_volumes(
        &server,
        vec![volume_json("gb-dune", "Dune", &["Frank Herbert"], "en")],
    )
    .await;

    let app = build_router(test_state(memory_pool().await, &server.uri()));
    let user = Uuid::new_v4();

    let request_body = json!({
        "user_id": user,
        "recommendations": [
            { "title": "Dune", "authors": ["Frank Herbert"], "reason": "You enjoy epics" }
        ]
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/recommendations/resolve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["book_external_id"], "gb-dune");
    assert_eq!(body[0]["reason"], "You enjoy epics");

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/recommendations?user_id={}", user))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Dune");
}
