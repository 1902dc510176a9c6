//! Application state and router construction.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use research::{
    ChatClient, DuckDuckGoSearcher, HttpFetcher, KeywordSynthesizer, LlmSynthesizer,
    ResearchPipeline, Synthesizer,
};

use crate::config::Config;
use crate::jobs::JobStore;
use crate::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobStore>,
    pub pipeline: Arc<ResearchPipeline>,
    pub upload_dir: PathBuf,
}

/// Build the research pipeline from configuration.
///
/// Synthesis mode is chosen once at startup: with an OpenAI key the record
/// comes from the model (keyword analysis stays as the failure fallback);
/// without one the keyword analyzer runs directly.
pub fn build_pipeline(config: &Config) -> research::Result<ResearchPipeline> {
    let searcher = Arc::new(DuckDuckGoSearcher::new()?);
    let fetcher = Arc::new(HttpFetcher::new()?);

    let synthesizer: Arc<dyn Synthesizer> = match &config.openai_api_key {
        Some(api_key) => {
            let mut client = ChatClient::new(api_key.clone());
            if let Some(model) = &config.openai_model {
                client = client.with_model(model.clone());
            }
            info!(model = client.model(), "LLM synthesis enabled");
            Arc::new(LlmSynthesizer::new(client))
        }
        None => {
            info!("no OpenAI API key configured, using keyword analysis");
            Arc::new(KeywordSynthesizer)
        }
    };

    Ok(ResearchPipeline::new(searcher, fetcher, synthesizer).with_source_count(config.source_count))
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index_handler))
        .route("/research", post(routes::start_research_handler))
        .route("/research/:id", get(routes::research_status_handler))
        .route("/download/:id", get(routes::download_handler))
        .route("/health", get(routes::health_handler))
        .fallback(routes::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
