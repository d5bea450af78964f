//! Response extractor — recovers a complete `InterpretationResult` from raw model text.
//!
//! Model output is untrusted. `extract` is total: every input, including empty or
//! garbage text, yields all five fields as plain strings. Shapes are tried in order,
//! first match wins:
//!
//! 1. fenced JSON (```` ```json {...} ``` ````, tag optional)
//! 2. bare JSON object between the first `{` and the last `}`
//! 3. legacy labeled sections (see `sections`)
//! 4. unstructured text, kept whole as the summary
//!
//! Anomalies become data, never errors: missing sections get a placeholder naming
//! the section, and non-string values are rendered into a flagged diagnostic string.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::interpretation::sections::SectionMarkers;
use crate::models::{InterpretationField, InterpretationResult};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
});

pub const MISSING_SECTION_PREFIX: &str = "[Section missing:";
pub const FORMAT_ANOMALY_PREFIX: &str = "[Formatting anomaly:";

/// Placeholder for a section the model did not provide.
pub fn missing_section(field: InterpretationField) -> String {
    format!("{MISSING_SECTION_PREFIX} {}]", field.label())
}

/// Diagnostic for a section that arrived as something other than a string.
/// The raw JSON is embedded so the anomaly stays visible downstream.
pub fn format_anomaly(field: InterpretationField, value: &Value) -> String {
    format!(
        "{FORMAT_ANOMALY_PREFIX} {} was returned as {} instead of text] {}",
        field.label(),
        json_kind(value),
        value
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Which historical shape the raw text was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    FencedJson,
    BareJson,
    LabeledSections,
    Unstructured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub result: InterpretationResult,
    pub format: ResponseFormat,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseExtractor {
    markers: SectionMarkers,
}

impl ResponseExtractor {
    #[allow(dead_code)]
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    pub fn extract(&self, raw: &str) -> InterpretationResult {
        self.extract_detailed(raw).result
    }

    /// Same as `extract`, also reporting which strategy matched.
    pub fn extract_detailed(&self, raw: &str) -> Extraction {
        let extraction = if let Some(object) = fenced_json(raw) {
            from_object(&object, ResponseFormat::FencedJson)
        } else if let Some(object) = bare_json(raw) {
            from_object(&object, ResponseFormat::BareJson)
        } else if let Some(sections) = self.markers.split(raw) {
            Extraction {
                result: InterpretationResult::from_fn(|field| {
                    sections
                        .iter()
                        .find(|(f, _)| *f == field)
                        .map(|(_, body)| body.clone())
                        .unwrap_or_else(|| missing_section(field))
                }),
                format: ResponseFormat::LabeledSections,
            }
        } else {
            warn!(
                "Model output matched no known format ({} chars); keeping it as the summary",
                raw.len()
            );
            unstructured(raw)
        };

        debug!("Extracted interpretation as {:?}", extraction.format);
        extraction
    }
}

/// Extracts with the default marker vocabulary.
#[allow(dead_code)]
pub fn extract(raw: &str) -> InterpretationResult {
    ResponseExtractor::default().extract(raw)
}

/// First fenced block whose interior yields a JSON object.
fn fenced_json(raw: &str) -> Option<Map<String, Value>> {
    FENCED_BLOCK
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|interior| parse_object(interior.as_str()).or_else(|| bare_json(interior.as_str())))
}

/// Object spanning the first `{` to the last `}`.
fn bare_json(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&raw[start..=end])
}

/// Parses a JSON object. A JSON string that itself holds an object (double
/// encoding) is unwrapped once.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()).ok()? {
        Value::Object(map) => Some(map),
        Value::String(inner) => match serde_json::from_str::<Value>(inner.trim()).ok()? {
            Value::Object(map) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

fn from_object(object: &Map<String, Value>, format: ResponseFormat) -> Extraction {
    let result = InterpretationResult::from_fn(|field| {
        let value = object
            .get(field.key())
            .or_else(|| object.get(field.snake_key()));
        coerce_field(field, value)
    });
    Extraction { result, format }
}

fn coerce_field(field: InterpretationField, value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => missing_section(field),
        Some(other) => {
            warn!(
                "Model returned {} for '{}'; flagging as formatting anomaly",
                json_kind(other),
                field.key()
            );
            format_anomaly(field, other)
        }
    }
}

fn unstructured(raw: &str) -> Extraction {
    let text = raw.trim();
    let result = InterpretationResult::from_fn(|field| match field {
        InterpretationField::Summary if !text.is_empty() => text.to_string(),
        _ => missing_section(field),
    });
    Extraction {
        result,
        format: ResponseFormat::Unstructured,
    }
}
