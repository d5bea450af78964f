// All prompt text for dream interpretation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::models::InterpretationField;

/// Interpretation prompt template.
/// Placeholders are filled in a single pass by `prompt_builder`, so user text
/// containing `{...}` is never re-expanded.
pub const INTERPRETATION_PROMPT_TEMPLATE: &str = r#"{persona}
{no_prediction}

{json_contract}

The JSON object MUST contain exactly five (5) top-level keys in this precise order. The value of each key MUST be a plain string (do NOT use nested objects, arrays, numbers, or further JSON):

{field_instructions}

Example of the required shape:
```json
{example}
```

User Context for Analysis:
- Interpretation Style: {style}
- Preferred Tone: {tone}
- Age Range: {age_range}
- Cultural Background: {cultural_background}

Dream Entry ({date}):
"{dream_text}"

Emotions in Dream: {emotions}
Mood Before Sleep: {mood_before_sleep}
Mood After Waking: {mood_after_waking}
Sleep Quality: {sleep_quality}
Recurring Symbols: {recurring_symbols}
Notes: {notes}

Generate the content for the five JSON sections, ensuring the entire output is wrapped in ```json ... ```."#;

/// What the model should write for each section.
pub fn field_instruction(field: InterpretationField) -> &'static str {
    match field {
        InterpretationField::Summary => "Provide a detailed, 3-4 sentence summary of the dream.",
        InterpretationField::SymbolicMeaning => {
            "Provide a comprehensive analysis of the symbolic meanings of key elements, \
            including relevant context for each symbol."
        }
        InterpretationField::EmotionalInsight => {
            "Offer deep, detailed psychological and emotional insights into the dream's \
            core conflicts and feelings."
        }
        InterpretationField::CulturalAnalysis => {
            "Provide the cultural analysis (you MUST specifically reference the dreamer's \
            Cultural Background)."
        }
        InterpretationField::ReflectionPrompt => {
            "Generate a thoughtful and expansive reflective journaling prompt that \
            encourages deep introspection."
        }
    }
}

/// Shown when an optional dream field was left blank.
pub const NOT_PROVIDED: &str = "N/A";
/// Shown for notes and empty tag lists.
pub const NONE_PROVIDED: &str = "None";
pub const UNDATED: &str = "date not recorded";
