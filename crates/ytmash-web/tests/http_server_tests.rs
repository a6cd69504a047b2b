//! HTTP server and routing integration tests
//!
//! Validation failures are rejected before the pipeline spawns anything,
//! so these run without yt-dlp, ffmpeg, or an SMTP relay.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use ytmash_core::Config;
use ytmash_web::{build_router, AppState};

fn test_app() -> Router {
    build_router(AppState::new(Config::default()))
}

async fn post_form(app: Router, body: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/mashup")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[tokio::test]
async fn test_root_serves_form() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE);
    assert!(
        content_type.is_some() && content_type.unwrap().to_str().unwrap().contains("text/html"),
        "root should serve HTML"
    );

    let html = body_text(response).await;
    for field in ["singer_name", "video_count", "clip_offset", "email"] {
        assert!(html.contains(field), "form should have a {} field", field);
    }
}

#[tokio::test]
async fn test_health_returns_json() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE);
    assert!(
        content_type.is_some()
            && content_type
                .unwrap()
                .to_str()
                .unwrap()
                .contains("application/json")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "ytmash-web");
    assert!(json["version"].is_string());
    assert!(json["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_submit_rejects_too_few_videos() {
    let response = post_form(
        test_app(),
        "singer_name=Nina+Simone&video_count=10&clip_offset=20&email=user%40example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("greater than 10"));
    // The rejection re-renders the form for another attempt
    assert!(html.contains("name=\"singer_name\""));
}

#[tokio::test]
async fn test_submit_rejects_short_offset() {
    let response = post_form(
        test_app(),
        "singer_name=Nina+Simone&video_count=11&clip_offset=19&email=user%40example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("at least 20"));
}

#[tokio::test]
async fn test_submit_rejects_blank_singer() {
    let response = post_form(
        test_app(),
        "singer_name=++&video_count=11&clip_offset=20&email=user%40example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("must not be empty"));
}

#[tokio::test]
async fn test_submit_rejects_bad_email() {
    let response = post_form(
        test_app(),
        "singer_name=Nina+Simone&video_count=11&clip_offset=20&email=not-an-address",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("not a valid email address"));
}

#[tokio::test]
async fn test_submit_rejects_missing_fields() {
    // Axum's Form extractor rejects before the handler runs
    let response = post_form(test_app(), "singer_name=Nina+Simone").await;
    assert!(
        response.status().is_client_error(),
        "missing fields should be a 4xx, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_submit_rejects_non_numeric_count() {
    let response = post_form(
        test_app(),
        "singer_name=Nina+Simone&video_count=many&clip_offset=20&email=user%40example.com",
    )
    .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
