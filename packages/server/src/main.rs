// Main entry point for the research service

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{
    app::{build_app, build_pipeline, AppState},
    config::Config,
    jobs::JobStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,research=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AI Research Agent");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Presentations are written here and served by the download endpoint
    let upload_dir = std::path::PathBuf::from(&config.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .context("Failed to create upload directory")?;

    let pipeline = build_pipeline(&config).context("Failed to build research pipeline")?;

    let state = AppState {
        jobs: Arc::new(JobStore::new()),
        pipeline: Arc::new(pipeline),
        upload_dir,
    };
    let app = build_app(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
