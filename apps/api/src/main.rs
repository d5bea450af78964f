mod config;
mod errors;
mod interpretation;
mod journal;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interpretation::extractor::ResponseExtractor;
use crate::interpretation::orchestrator::InterpretationOrchestrator;
use crate::interpretation::summarizer::HistorySummarizer;
use crate::journal::InMemoryDreamRepository;
use crate::llm_client::ModelClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DreamScapes API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let model = ModelClient::new(config.model_client_config())?;
    info!(
        "Model client initialized (endpoint: {}, model: {}, timeout: {}s)",
        config.model_endpoint_url, config.model_name, config.model_timeout_secs
    );

    let orchestrator = InterpretationOrchestrator::new(Arc::new(model), ResponseExtractor::default());
    let summarizer = HistorySummarizer::new(config.history_preview_chars);
    let shutdown = CancellationToken::new();

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        summarizer,
        dreams: Arc::new(InMemoryDreamRepository::new()),
        config: config.clone(),
        shutdown: shutdown.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on ctrl-c, cancelling in-flight interpretations first.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested; cancelling in-flight interpretations");
    shutdown.cancel();
}
