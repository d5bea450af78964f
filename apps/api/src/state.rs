use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::interpretation::orchestrator::InterpretationOrchestrator;
use crate::interpretation::summarizer::HistorySummarizer;
use crate::journal::DreamRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<InterpretationOrchestrator>,
    pub summarizer: HistorySummarizer,
    pub dreams: Arc<dyn DreamRepository>,
    pub config: Config,
    /// Cancelled on shutdown; every interpretation runs on a child token.
    pub shutdown: CancellationToken,
}
