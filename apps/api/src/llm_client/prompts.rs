// Shared prompt fragments.
// Each feature that calls the model defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Persona line every interpretation prompt opens with.
pub const INTERPRETER_PERSONA: &str = "You are a thoughtful and insightful dream interpreter \
    who blends psychological understanding, symbolic analysis, and cross-cultural context.";

/// Guard against fortune-telling output.
pub const NO_PREDICTION_INSTRUCTION: &str = "Avoid mystical or predictive claims. \
    Do NOT predict the future or present the dream as an omen. \
    Focus on emotional meaning and reflection.";

/// Formatting contract the response extractor is built around.
pub const FENCED_JSON_CONTRACT: &str = "\
    CRITICAL INSTRUCTION: Your entire response MUST be a single, valid JSON object, \
    enclosed within a single pair of triple backticks (```json ... ```). \
    Do NOT include any other text, explanation, or introduction outside of the backticks.";
