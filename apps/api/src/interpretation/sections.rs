//! Legacy labeled-section parsing.
//!
//! Older prompts asked the model for five headed sections instead of JSON, and
//! different client builds used different emoji in front of the same heading
//! ("🎶 Symbolic Meaning" in one, "🔑 Symbolic Meaning" in another). Labels are
//! therefore matched on their text only, and the vocabulary is an explicit list
//! that callers can extend.
//!
//! Headings may appear anywhere, several to a line. A label occurrence counts as
//! a heading when something marks it as one: a following `:`, decoration in
//! front of it (emoji, `*`, `#`, bullets), or, for multi-word labels, sitting at
//! the start of a line. A bare one-word label at the start of a line only counts
//! when nothing else follows on that line.

use regex::Regex;
use tracing::warn;

use crate::models::InterpretationField;

/// Headings observed in stored legacy responses, emoji included as written.
pub const LEGACY_LABELS: &[(InterpretationField, &str)] = &[
    (InterpretationField::Summary, "✨ Dream Summary"),
    (InterpretationField::Summary, "Summary"),
    (InterpretationField::SymbolicMeaning, "🎶 Symbolic Meaning"),
    (InterpretationField::SymbolicMeaning, "🔑 Symbolic Meaning"),
    (InterpretationField::EmotionalInsight, "❤️ Emotional Insight"),
    (InterpretationField::CulturalAnalysis, "🌍 Cultural Analysis"),
    (InterpretationField::ReflectionPrompt, "⚠️ Reflection Prompt"),
];

/// Characters stripped from the front of a section body, after the label.
const LEADING_PUNCTUATION: &[char] = &[':', '-', '–', '—', '*', '#', '.', '>', '_', '=', '|', '~'];

/// Punctuation that ends or wraps prose, so it never marks a heading.
const PROSE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']'];

/// Recognized section headings, stored without decoration.
#[derive(Debug, Clone)]
pub struct SectionMarkers {
    labels: Vec<(InterpretationField, String)>,
    /// One capture group per entry of `labels`, in the same order.
    pattern: Option<Regex>,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        InterpretationField::ALL
            .iter()
            .map(|f| (*f, f.label()))
            .chain(LEGACY_LABELS.iter().copied())
            .fold(Self::empty(), |markers, (field, label)| {
                markers.with_label(field, label)
            })
    }
}

/// One heading found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MarkerHit {
    field: InterpretationField,
    /// Byte offset where the heading starts, decoration included.
    heading_start: usize,
    /// Byte offset just past the label text.
    body_start: usize,
}

impl SectionMarkers {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            pattern: None,
        }
    }

    /// Adds a heading variant. Leading decoration is dropped; blank or duplicate
    /// labels are ignored.
    pub fn with_label(mut self, field: InterpretationField, label: &str) -> Self {
        let normalized = strip_decoration(label)
            .trim_end_matches(|c: char| c.is_whitespace() || c == ':')
            .to_string();
        let duplicate = self
            .labels
            .iter()
            .any(|(f, l)| *f == field && l.eq_ignore_ascii_case(&normalized));
        if !normalized.is_empty() && !duplicate {
            self.labels.push((field, normalized));
            // Longest first, so a longer heading wins over one it ends with.
            self.labels.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
            self.pattern = build_pattern(&self.labels);
        }
        self
    }

    #[allow(dead_code)]
    pub fn labels(&self) -> impl Iterator<Item = (InterpretationField, &str)> {
        self.labels.iter().map(|(f, l)| (*f, l.as_str()))
    }

    /// Splits `text` at recognized headings. Returns `None` when no heading with
    /// a non-empty body is present. For a field headed more than once, the first
    /// non-empty body wins.
    pub fn split(&self, text: &str) -> Option<Vec<(InterpretationField, String)>> {
        let hits = self.find_markers(text);
        if hits.is_empty() {
            return None;
        }

        let mut sections: Vec<(InterpretationField, String)> = Vec::with_capacity(hits.len());
        for (i, hit) in hits.iter().enumerate() {
            if sections.iter().any(|(f, _)| *f == hit.field) {
                continue;
            }
            let end = hits.get(i + 1).map_or(text.len(), |next| next.heading_start);
            let body = clean_body(&text[hit.body_start..end]);
            if !body.is_empty() {
                sections.push((hit.field, body.to_string()));
            }
        }
        (!sections.is_empty()).then_some(sections)
    }

    fn find_markers(&self, text: &str) -> Vec<MarkerHit> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let (index, label) = caps
                    .iter()
                    .skip(1)
                    .enumerate()
                    .find_map(|(i, group)| group.map(|m| (i, m)))?;
                let (field, label_text) = self.labels.get(index)?;
                let (start, end) = (label.start(), label.end());
                if !is_word_bounded(text, start, end) {
                    return None;
                }

                let line_begin = text[..start].rfind('\n').map_or(0, |i| i + 1);
                let at_line_start = !text[line_begin..start].chars().any(char::is_alphabetic);
                let multi_word = label_text.contains(char::is_whitespace);

                let is_heading = followed_by_colon(&text[end..])
                    || preceded_by_decoration(&text[..start])
                    || (at_line_start && (multi_word || rest_of_line_is_blank(&text[end..])));
                if !is_heading {
                    return None;
                }

                let heading_start = if at_line_start {
                    line_begin
                } else {
                    decoration_start(text, start)
                };
                Some(MarkerHit {
                    field: *field,
                    heading_start,
                    body_start: end,
                })
            })
            .collect()
    }
}

/// Case-insensitive alternation with one group per label.
fn build_pattern(labels: &[(InterpretationField, String)]) -> Option<Regex> {
    let alternation = labels
        .iter()
        .map(|(_, label)| format!("({})", regex::escape(label)))
        .collect::<Vec<_>>()
        .join("|");
    match Regex::new(&format!("(?i){alternation}")) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!("Section heading vocabulary could not be compiled: {e}");
            None
        }
    }
}

fn is_decoration(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !PROSE_PUNCTUATION.contains(&c)
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn followed_by_colon(after: &str) -> bool {
    after
        .trim_start_matches(|c: char| matches!(c, '*' | '_' | ' ' | '\t'))
        .starts_with(':')
}

fn preceded_by_decoration(before: &str) -> bool {
    before
        .trim_end_matches([' ', '\t'])
        .chars()
        .next_back()
        .is_some_and(is_decoration)
}

fn rest_of_line_is_blank(after: &str) -> bool {
    after
        .split('\n')
        .next()
        .map_or(true, |rest| !rest.chars().any(char::is_alphanumeric))
}

/// Walks back over decoration and spaces in front of a mid-line heading.
fn decoration_start(text: &str, label_start: usize) -> usize {
    text[..label_start]
        .char_indices()
        .rev()
        .take_while(|(_, c)| *c == ' ' || *c == '\t' || is_decoration(*c))
        .last()
        .map_or(label_start, |(i, _)| i)
}

/// Drops everything before the first letter: emoji, bullets, markdown
/// emphasis, heading hashes, list numbers.
fn strip_decoration(label: &str) -> &str {
    label.trim_start_matches(|c: char| !c.is_alphabetic())
}

fn clean_body(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_whitespace() || LEADING_PUNCTUATION.contains(&c))
        .trim_end()
}
