use std::fmt;

use serde::{Deserialize, Serialize};

/// The five sections of an interpretation, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpretationField {
    Summary,
    SymbolicMeaning,
    EmotionalInsight,
    CulturalAnalysis,
    ReflectionPrompt,
}

impl InterpretationField {
    pub const ALL: [InterpretationField; 5] = [
        InterpretationField::Summary,
        InterpretationField::SymbolicMeaning,
        InterpretationField::EmotionalInsight,
        InterpretationField::CulturalAnalysis,
        InterpretationField::ReflectionPrompt,
    ];

    /// JSON key used on the wire and in stored responses.
    pub fn key(&self) -> &'static str {
        match self {
            InterpretationField::Summary => "summary",
            InterpretationField::SymbolicMeaning => "symbolicMeaning",
            InterpretationField::EmotionalInsight => "emotionalInsight",
            InterpretationField::CulturalAnalysis => "culturalAnalysis",
            InterpretationField::ReflectionPrompt => "reflectionPrompt",
        }
    }

    /// Alternate key some models emit instead of the camelCase one.
    pub fn snake_key(&self) -> &'static str {
        match self {
            InterpretationField::Summary => "summary",
            InterpretationField::SymbolicMeaning => "symbolic_meaning",
            InterpretationField::EmotionalInsight => "emotional_insight",
            InterpretationField::CulturalAnalysis => "cultural_analysis",
            InterpretationField::ReflectionPrompt => "reflection_prompt",
        }
    }

    /// Human-readable section title.
    pub fn label(&self) -> &'static str {
        match self {
            InterpretationField::Summary => "Dream Summary",
            InterpretationField::SymbolicMeaning => "Symbolic Meaning",
            InterpretationField::EmotionalInsight => "Emotional Insight",
            InterpretationField::CulturalAnalysis => "Cultural Analysis",
            InterpretationField::ReflectionPrompt => "Reflection Prompt",
        }
    }
}

impl fmt::Display for InterpretationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical structured interpretation. Every field is always a plain string;
/// unrecoverable sections hold a placeholder rather than being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationResult {
    pub summary: String,
    pub symbolic_meaning: String,
    pub emotional_insight: String,
    pub cultural_analysis: String,
    pub reflection_prompt: String,
}

impl InterpretationResult {
    /// Builds a result by resolving each field in canonical order.
    pub fn from_fn(mut resolve: impl FnMut(InterpretationField) -> String) -> Self {
        Self {
            summary: resolve(InterpretationField::Summary),
            symbolic_meaning: resolve(InterpretationField::SymbolicMeaning),
            emotional_insight: resolve(InterpretationField::EmotionalInsight),
            cultural_analysis: resolve(InterpretationField::CulturalAnalysis),
            reflection_prompt: resolve(InterpretationField::ReflectionPrompt),
        }
    }

    #[allow(dead_code)]
    pub fn get(&self, field: InterpretationField) -> &str {
        match field {
            InterpretationField::Summary => &self.summary,
            InterpretationField::SymbolicMeaning => &self.symbolic_meaning,
            InterpretationField::EmotionalInsight => &self.emotional_insight,
            InterpretationField::CulturalAnalysis => &self.cultural_analysis,
            InterpretationField::ReflectionPrompt => &self.reflection_prompt,
        }
    }

    /// Serializes to the JSON string stored on a dream record.
    pub fn to_stored_response(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_keys_follow_canonical_order() {
        let result = InterpretationResult::from_fn(|f| f.key().to_uppercase());
        let json = result.to_stored_response().unwrap();

        let positions: Vec<usize> = InterpretationField::ALL
            .iter()
            .map(|f| json.find(&format!("\"{}\"", f.key())).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_from_fn_and_get_agree() {
        let result = InterpretationResult::from_fn(|f| f.label().to_string());
        for field in InterpretationField::ALL {
            assert_eq!(result.get(field), field.label());
        }
    }

    #[test]
    fn test_snake_key_differs_only_for_compound_names() {
        assert_eq!(
            InterpretationField::Summary.key(),
            InterpretationField::Summary.snake_key()
        );
        assert_eq!(
            InterpretationField::ReflectionPrompt.snake_key(),
            "reflection_prompt"
        );
    }
}
