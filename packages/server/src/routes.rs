//! HTTP route handlers: topic submission, status polling, download.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::jobs::{self, JobRecord, JobStatus};

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Longest accepted topic, in characters.
const MAX_TOPIC_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ResearchStarted {
    pub result_id: String,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Landing page with the topic form.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Submit a topic and start a background research job.
pub async fn start_research_handler(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Response {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Topic is required");
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Topic too long (max 200 characters)",
        );
    }

    let id = jobs::new_job_id();
    state.jobs.insert(id.clone(), JobRecord::new(topic.clone())).await;
    jobs::spawn_research_job(
        state.jobs.clone(),
        state.pipeline.clone(),
        state.upload_dir.clone(),
        id.clone(),
        topic,
    );

    Json(ResearchStarted {
        result_id: id,
        status: JobStatus::Initializing,
        message: "Research started successfully".to_string(),
    })
    .into_response()
}

/// Poll the status record for a job.
pub async fn research_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if !jobs::is_valid_job_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid research ID");
    }

    match state.jobs.get(&id).await {
        Some(record) => Json(record).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Research not found"),
    }
}

/// Download the finished presentation as a Markdown attachment.
pub async fn download_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if !jobs::is_valid_job_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid research ID");
    }
    let Some(record) = state.jobs.get(&id).await else {
        return error_response(StatusCode::NOT_FOUND, "Research not found");
    };
    if record.status != JobStatus::Completed {
        return error_response(StatusCode::BAD_REQUEST, "Research not completed");
    }
    let Some(filepath) = record.filepath else {
        return error_response(StatusCode::NOT_FOUND, "File not found");
    };

    let body = match tokio::fs::read_to_string(&filepath).await {
        Ok(body) => body,
        Err(_) => return error_response(StatusCode::NOT_FOUND, "File not found"),
    };

    let download_name = format!("research_{}.md", sanitize_topic(&record.topic));
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/markdown; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// JSON 404 for unmatched routes.
pub async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Resource not found")
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Keep only characters safe for a download filename.
fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}
