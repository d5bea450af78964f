use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A journaled dream, or a transient entry built only for an interpretation call.
///
/// `response` is empty until an interpretation has been stored. Stored values are
/// either a JSON-serialized `InterpretationResult` or free-form prose written by
/// older clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    /// User-supplied calendar date. Not validated.
    #[serde(default)]
    pub date: String,
    /// Required for interpretation, but checked by the orchestrator, not at decode.
    #[serde(default)]
    pub dream_text: String,
    #[serde(default)]
    pub emotions_in_dream: Vec<String>,
    #[serde(default)]
    pub mood_before_sleep: Option<String>,
    #[serde(default)]
    pub mood_after_waking: Option<String>,
    #[serde(default)]
    pub sleep_quality: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurring_symbols: Vec<String>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl DreamEntry {
    #[allow(dead_code)]
    pub fn new(dream_text: impl Into<String>) -> Self {
        Self {
            dream_text: dream_text.into(),
            ..Self::default()
        }
    }

    pub fn has_dream_text(&self) -> bool {
        !self.dream_text.trim().is_empty()
    }

    pub fn is_interpreted(&self) -> bool {
        !self.response.trim().is_empty()
    }
}
