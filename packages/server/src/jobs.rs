//! In-memory job tracking and the background research worker.
//!
//! The job table is an explicit store object shared behind an `Arc`, not a
//! global: exactly one writer per job id (that job's worker task) and any
//! number of readers (status polls). Records live for the process lifetime
//! and are lost on restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info};

use research::ResearchPipeline;

use crate::render;

/// Lifecycle states of a research job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Initializing,
    Searching,
    Analyzing,
    Completed,
    Error,
}

/// Status record for one research job.
///
/// Mutated in place by the job's worker as the pipeline advances; read by
/// status polls. Completion fields stay `None` until the terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub status: JobStatus,
    pub topic: String,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    /// Fresh record for a just-submitted topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Initializing,
            topic: topic.into(),
            message: "Initializing research...".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            presentation: None,
            html_content: None,
            filename: None,
            filepath: None,
            error: None,
        }
    }
}

/// Process-lifetime key-value store for job records.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: impl Into<String>, record: JobRecord) {
        self.jobs.write().await.insert(id.into(), record);
    }

    /// Clone out the record for a job id.
    pub async fn get(&self, id: &str) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Mutate a record in place; missing ids are ignored.
    pub async fn update<F>(&self, id: &str, mutate: F)
    where
        F: FnOnce(&mut JobRecord),
    {
        if let Some(record) = self.jobs.write().await.get_mut(id) {
            mutate(record);
            record.timestamp = Utc::now().to_rfc3339();
        }
    }
}

/// New job id derived from the submission time. Digits only, so it is safe
/// in filenames and URL path segments.
pub fn new_job_id() -> String {
    Utc::now().format("%Y%m%d%H%M%S%f").to_string()
}

/// Ids accepted from the URL path: non-empty alphanumeric, bounded length.
pub fn is_valid_job_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 50 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Spawn the background worker for one submitted topic.
///
/// Returns immediately; all progress is reported through the store. The
/// pipeline itself cannot fail, so the error path here covers rendering and
/// file IO only.
pub fn spawn_research_job(
    jobs: Arc<JobStore>,
    pipeline: Arc<ResearchPipeline>,
    upload_dir: PathBuf,
    id: String,
    topic: String,
) {
    tokio::spawn(async move {
        if let Err(e) = run_research_job(&jobs, &pipeline, &upload_dir, &id, &topic).await {
            error!(job_id = %id, error = %e, "research job failed");
            jobs.update(&id, |job| {
                job.status = JobStatus::Error;
                job.message = "Research failed".to_string();
                job.error = Some(e.to_string());
            })
            .await;
        }
    });
}

async fn run_research_job(
    jobs: &JobStore,
    pipeline: &ResearchPipeline,
    upload_dir: &Path,
    id: &str,
    topic: &str,
) -> Result<()> {
    jobs.update(id, |job| {
        job.status = JobStatus::Searching;
        job.message = "Searching for reliable sources...".to_string();
    })
    .await;

    let record = pipeline.research(topic).await;

    jobs.update(id, |job| {
        job.status = JobStatus::Analyzing;
        job.message = "Generating presentation...".to_string();
    })
    .await;

    let presentation = render::render_presentation(&record, topic);
    let html_content = render::render_html(&presentation);

    let filename = format!("research_presentation_{id}.md");
    let filepath = upload_dir.join(&filename);
    tokio::fs::write(&filepath, &presentation)
        .await
        .with_context(|| format!("failed to write {}", filepath.display()))?;

    jobs.update(id, |job| {
        job.status = JobStatus::Completed;
        job.message = "Research completed".to_string();
        job.presentation = Some(presentation);
        job.html_content = Some(html_content);
        job.filename = Some(filename);
        job.filepath = Some(filepath.display().to_string());
    })
    .await;

    info!(job_id = %id, topic, "research completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use research::testing::{FailingSearcher, MockFetcher};
    use research::KeywordSynthesizer;
    use std::time::Duration;

    fn offline_pipeline() -> ResearchPipeline {
        ResearchPipeline::new(
            Arc::new(FailingSearcher),
            Arc::new(MockFetcher::new()),
            Arc::new(KeywordSynthesizer),
        )
        .with_fetch_delay(Duration::ZERO)
    }

    #[test]
    fn job_ids_are_filename_safe() {
        let id = new_job_id();
        assert!(is_valid_job_id(&id));
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn job_id_validation_rejects_path_tricks() {
        assert!(!is_valid_job_id(""));
        assert!(!is_valid_job_id("../etc/passwd"));
        assert!(!is_valid_job_id("id with spaces"));
        assert!(!is_valid_job_id(&"9".repeat(51)));
    }

    #[tokio::test]
    async fn store_insert_get_update_roundtrip() {
        let store = JobStore::new();
        store.insert("1", JobRecord::new("rust")).await;

        let record = store.get("1").await.unwrap();
        assert_eq!(record.status, JobStatus::Initializing);
        assert_eq!(record.topic, "rust");

        store
            .update("1", |job| {
                job.status = JobStatus::Searching;
                job.message = "searching".to_string();
            })
            .await;

        let record = store.get("1").await.unwrap();
        assert_eq!(record.status, JobStatus::Searching);

        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn update_on_unknown_id_is_a_no_op() {
        let store = JobStore::new();
        store
            .update("missing", |job| job.status = JobStatus::Error)
            .await;
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn worker_completes_and_writes_the_presentation() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new();
        store.insert("42", JobRecord::new("quantum computing")).await;

        run_research_job(
            &store,
            &offline_pipeline(),
            dir.path(),
            "42",
            "quantum computing",
        )
        .await
        .unwrap();

        let record = store.get("42").await.unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(
            record.filename.as_deref(),
            Some("research_presentation_42.md")
        );

        let written =
            std::fs::read_to_string(dir.path().join("research_presentation_42.md")).unwrap();
        assert!(written.contains("quantum computing"));
        assert_eq!(record.presentation.as_deref(), Some(written.as_str()));
        assert!(record.html_content.as_deref().unwrap().contains("<h1>"));
    }

    #[tokio::test]
    async fn worker_records_error_on_unwritable_directory() {
        let store = Arc::new(JobStore::new());
        store.insert("7", JobRecord::new("rust")).await;

        spawn_research_job(
            store.clone(),
            Arc::new(offline_pipeline()),
            PathBuf::from("/nonexistent-dir/really"),
            "7".to_string(),
            "rust".to_string(),
        );

        // Wait for the spawned worker to reach a terminal state.
        for _ in 0..100 {
            if let Some(record) = store.get("7").await {
                if record.status == JobStatus::Error {
                    assert!(record.error.is_some());
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("worker never reached the error state");
    }
}
