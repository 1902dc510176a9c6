//! Typed errors for the research library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Every error here is absorbed
//! inside the pipeline's fallback chain; nothing crosses the `research()`
//! boundary.

use thiserror::Error;

/// Errors that can occur inside the research pipeline.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Search provider request failed
    #[error("search error: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Page fetch failed (transport error or non-success status)
    #[error("fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Chat-completion request failed
    #[error("LLM request error: {0}")]
    Llm(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model output did not parse into the expected record shape
    #[error("malformed model output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// Model output parsed but failed validation
    #[error("model output rejected: {reason}")]
    RejectedOutput { reason: String },

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;
