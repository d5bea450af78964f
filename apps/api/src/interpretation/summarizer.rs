//! One-line previews of stored interpretations for the journal history list.
//!
//! Unlike the extractor this never fills placeholders: unstructured stored text
//! is truncated and shown as-is.

use serde_json::Value;

/// Preview length used by the journal history list, in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 150;

pub const SUMMARY_LABEL: &str = "Summary:";
pub const TRUNCATED_SUFFIX: &str = "... (older entry, preview truncated)";
pub const NO_INTERPRETATION: &str = "No interpretation has been saved for this dream yet.";

/// Values older clients stored when no interpretation existed.
const EMPTY_MARKERS: &[&str] = &["N/A"];

#[derive(Debug, Clone, Copy)]
pub struct HistorySummarizer {
    preview_chars: usize,
}

impl Default for HistorySummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CHARS)
    }
}

impl HistorySummarizer {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    #[allow(dead_code)]
    pub fn preview_chars(&self) -> usize {
        self.preview_chars
    }

    /// Labeled summary for structured responses, truncated prose otherwise.
    pub fn summarize(&self, stored_response: &str) -> String {
        let stored = stored_response.trim();
        if stored.is_empty() || EMPTY_MARKERS.iter().any(|m| stored.eq_ignore_ascii_case(m)) {
            return NO_INTERPRETATION.to_string();
        }

        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(stored) {
            if let Some(Value::String(summary)) = object.get("summary") {
                return format!("{SUMMARY_LABEL} {}", summary.trim());
            }
        }

        self.truncate(stored)
    }

    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.preview_chars) {
            Some((cut, _)) => format!("{}{TRUNCATED_SUFFIX}", &text[..cut]),
            None => text.to_string(),
        }
    }
}

/// Summarizes with the default preview length.
#[allow(dead_code)]
pub fn summarize(stored_response: &str) -> String {
    HistorySummarizer::default().summarize(stored_response)
}
