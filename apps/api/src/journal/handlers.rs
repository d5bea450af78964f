use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interpretation::extractor::Extraction;
use crate::models::{DreamEntry, InterpretationResult, UserContext};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

/// A row in the journal history list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamListItem {
    pub id: String,
    pub date: String,
    pub dream_text: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub preview: String,
}

#[derive(Debug, Serialize)]
pub struct DreamDetailResponse {
    pub dream: DreamEntry,
    /// Present once a response has been stored.
    pub interpretation: Option<Extraction>,
}

/// POST /api/v1/dreams
pub async fn handle_create_dream(
    State(state): State<AppState>,
    Json(entry): Json<DreamEntry>,
) -> Result<(StatusCode, Json<DreamEntry>), AppError> {
    if entry.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId cannot be empty".to_string()));
    }
    if !entry.has_dream_text() {
        return Err(AppError::Validation("dreamText cannot be empty".to_string()));
    }

    let created = state.dreams.create(entry).await?;
    info!("Journaled dream {} for user {}", created.id, created.user_id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/dreams?user_id=
pub async fn handle_list_dreams(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<DreamListItem>>, AppError> {
    let entries = state.dreams.list_for_user(&params.user_id).await?;
    let items = entries
        .into_iter()
        .map(|entry| DreamListItem {
            preview: state.summarizer.summarize(&entry.response),
            id: entry.id,
            date: entry.date,
            dream_text: entry.dream_text,
            timestamp: entry.timestamp,
        })
        .collect();
    Ok(Json(items))
}

/// GET /api/v1/dreams/:id
pub async fn handle_get_dream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DreamDetailResponse>, AppError> {
    let dream = state.dreams.get(&id).await?;
    let interpretation = dream
        .is_interpreted()
        .then(|| state.orchestrator.extractor().extract_detailed(&dream.response));
    Ok(Json(DreamDetailResponse {
        dream,
        interpretation,
    }))
}

/// POST /api/v1/dreams/:id/interpret
///
/// Interprets a journaled dream and stores the result on it as a JSON string.
pub async fn handle_interpret_dream(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(user): Json<UserContext>,
) -> Result<Json<InterpretationResult>, AppError> {
    let dream = state.dreams.get(&id).await?;
    let result = state
        .orchestrator
        .interpret_with_cancel(&user, &dream, &state.shutdown.child_token())
        .await?;

    let stored = result
        .to_stored_response()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize interpretation: {e}")))?;
    state.dreams.set_response(&id, stored).await?;
    info!("Stored interpretation for dream {id}");

    Ok(Json(result))
}
