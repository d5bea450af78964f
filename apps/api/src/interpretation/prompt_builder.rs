//! Prompt builder — renders a user context and a dream into the interpretation prompt.
//!
//! Pure and deterministic. Missing optional fields are replaced with textual
//! defaults; nothing absent ever reaches the prompt as an empty slot.

use crate::interpretation::prompts::{
    field_instruction, INTERPRETATION_PROMPT_TEMPLATE, NONE_PROVIDED, NOT_PROVIDED, UNDATED,
};
use crate::llm_client::prompts::{
    FENCED_JSON_CONTRACT, INTERPRETER_PERSONA, NO_PREDICTION_INSTRUCTION,
};
use crate::models::user::non_blank;
use crate::models::{DreamEntry, InterpretationField, UserContext};

/// Builds the full interpretation prompt. Callers are expected to have
/// rejected empty dream text already.
pub fn build_prompt(user: &UserContext, dream: &DreamEntry) -> String {
    let field_instructions = render_field_instructions();
    let example = render_example();
    let emotions = join_tags(&dream.emotions_in_dream);
    let recurring_symbols = join_tags(&dream.recurring_symbols);

    render_template(
        INTERPRETATION_PROMPT_TEMPLATE,
        &[
            ("persona", INTERPRETER_PERSONA),
            ("no_prediction", NO_PREDICTION_INSTRUCTION),
            ("json_contract", FENCED_JSON_CONTRACT),
            ("field_instructions", &field_instructions),
            ("example", &example),
            ("style", user.style().as_str()),
            ("tone", user.tone()),
            ("age_range", user.age_range()),
            ("cultural_background", user.cultural_background()),
            ("date", non_blank(Some(&dream.date)).unwrap_or(UNDATED)),
            ("dream_text", dream.dream_text.trim()),
            ("emotions", &emotions),
            (
                "mood_before_sleep",
                or_default(&dream.mood_before_sleep, NOT_PROVIDED),
            ),
            (
                "mood_after_waking",
                or_default(&dream.mood_after_waking, NOT_PROVIDED),
            ),
            ("sleep_quality", or_default(&dream.sleep_quality, NOT_PROVIDED)),
            ("recurring_symbols", &recurring_symbols),
            ("notes", or_default(&dream.notes, NONE_PROVIDED)),
        ],
    )
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    non_blank(value.as_deref()).unwrap_or(default)
}

fn join_tags(tags: &[String]) -> String {
    let tags: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        NONE_PROVIDED.to_string()
    } else {
        tags.join(", ")
    }
}

fn render_field_instructions() -> String {
    InterpretationField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{}. {}: {}", i + 1, field.key(), field_instruction(*field)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_example() -> String {
    let body = InterpretationField::ALL
        .iter()
        .map(|f| format!("  \"{}\": \"...\"", f.key()))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{body}\n}}")
}

/// Substitutes `{name}` placeholders in one left-to-right pass. Unknown
/// placeholders and stray braces are copied through untouched.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 512);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
