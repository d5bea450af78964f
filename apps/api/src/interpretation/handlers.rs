//! Axum route handlers for the Interpretation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interpretation::extractor::Extraction;
use crate::models::{DreamEntry, InterpretationResult, UserContext};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    pub user: UserContext,
    pub dream: DreamEntry,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub raw: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub stored_response: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub preview: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interpretations
///
/// Interprets a transient dream entry. Nothing is stored; callers persist the
/// result themselves if they want to.
pub async fn handle_interpret(
    State(state): State<AppState>,
    Json(request): Json<InterpretRequest>,
) -> Result<Json<InterpretationResult>, AppError> {
    let result = state
        .orchestrator
        .interpret_with_cancel(&request.user, &request.dream, &state.shutdown.child_token())
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/interpretations/extract
///
/// Re-runs extraction over raw or stored model text and reports which format matched.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Json<Extraction> {
    Json(state.orchestrator.extractor().extract_detailed(&request.raw))
}

/// POST /api/v1/interpretations/summary
///
/// One-line preview of a stored response, old or new format.
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        preview: state.summarizer.summarize(&request.stored_response),
    })
}
