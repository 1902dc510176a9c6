//! End-to-end tests for the HTTP surface, driven through the router with
//! an offline pipeline (failing search, so every job completes quickly on
//! the mock tier).

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use research::testing::{FailingSearcher, MockFetcher};
use research::{KeywordSynthesizer, ResearchPipeline};
use server_core::app::{build_app, AppState};
use server_core::jobs::JobStore;

fn test_state(upload_dir: &std::path::Path) -> AppState {
    let pipeline = ResearchPipeline::new(
        Arc::new(FailingSearcher),
        Arc::new(MockFetcher::new()),
        Arc::new(KeywordSynthesizer),
    )
    .with_fetch_delay(Duration::ZERO);

    AppState {
        jobs: Arc::new(JobStore::new()),
        pipeline: Arc::new(pipeline),
        upload_dir: upload_dir.to_path_buf(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_topic(app: &Router, topic: &str) -> axum::response::Response {
    let request = Request::post("/research")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!("{{\"topic\": {:?}}}", topic)))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Poll the status endpoint until the job reaches a terminal state.
async fn wait_for_completion(app: &Router, id: &str) -> Value {
    for _ in 0..200 {
        let response = get(app, &format!("/research/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let record = json_body(response).await;
        match record["status"].as_str() {
            Some("completed") | Some("error") => return record,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {id} never completed");
}

#[tokio::test]
async fn submit_poll_download_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = post_topic(&app, "quantum computing").await;
    assert_eq!(response.status(), StatusCode::OK);
    let started = json_body(response).await;
    assert_eq!(started["status"], "initializing");
    let id = started["result_id"].as_str().unwrap().to_string();

    let record = wait_for_completion(&app, &id).await;
    assert_eq!(record["status"], "completed");
    assert_eq!(record["topic"], "quantum computing");
    assert!(record["html_content"].as_str().unwrap().contains("<h1>"));
    assert_eq!(
        record["filename"].as_str().unwrap(),
        format!("research_presentation_{id}.md")
    );

    let response = get(&app, &format!("/download/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        disposition,
        "attachment; filename=\"research_quantum computing.md\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("# Research Briefing: quantum computing"));
}

#[tokio::test]
async fn empty_topic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = post_topic(&app, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Topic is required");
}

#[tokio::test]
async fn oversized_topic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = post_topic(&app, &"x".repeat(201)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_job_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = get(&app, "/research/not%20a%20valid%20id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_job_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = get(&app, "/research/20240101000000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_before_completion_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let app = build_app(state.clone());

    // Insert a job that has not finished.
    state
        .jobs
        .insert("123", server_core::jobs::JobRecord::new("rust"))
        .await;

    let response = get(&app, "/download/123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Research not completed");
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn index_serves_the_form_page() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(test_state(dir.path()));

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8(bytes.to_vec())
        .unwrap()
        .contains("AI Research Agent"));
}
