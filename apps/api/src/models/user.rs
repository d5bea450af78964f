use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFERRED_TONE: &str = "gentle and reflective";
pub const DEFAULT_CULTURAL_BACKGROUND: &str = "General Western";
pub const DEFAULT_AGE_RANGE: &str = "N/A";

/// Lens the interpreter should lean on. Serialized lowercase to match stored profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpretationStyle {
    #[default]
    Psychological,
    Creative,
    Spiritual,
}

impl InterpretationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpretationStyle::Psychological => "psychological",
            InterpretationStyle::Creative => "creative",
            InterpretationStyle::Spiritual => "spiritual",
        }
    }
}

/// Per-request description of the dreamer. Only `id` is required; every other
/// field resolves to a default when rendered into a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub id: String,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub cultural_background: Option<String>,
    #[serde(default)]
    pub interpretation_style: Option<InterpretationStyle>,
    #[serde(default)]
    pub preferred_tone: Option<String>,
}

impl UserContext {
    /// Context for a caller with no profile, e.g. an anonymous session.
    #[allow(dead_code)]
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn style(&self) -> InterpretationStyle {
        self.interpretation_style.unwrap_or_default()
    }

    pub fn tone(&self) -> &str {
        non_blank(self.preferred_tone.as_deref()).unwrap_or(DEFAULT_PREFERRED_TONE)
    }

    pub fn cultural_background(&self) -> &str {
        non_blank(self.cultural_background.as_deref()).unwrap_or(DEFAULT_CULTURAL_BACKGROUND)
    }

    pub fn age_range(&self) -> &str {
        non_blank(self.age_range.as_deref()).unwrap_or(DEFAULT_AGE_RANGE)
    }
}

/// Treats whitespace-only strings the same as absent ones.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
