//! Prompts for LLM-based window summarisation.
//!
//! Every prompt lives here so the default behaviour can be changed in one
//! place and inspected by unit tests without calling a model. Callers can
//! override the system prompt via
//! [`crate::config::SummaryConfig::system_prompt`]; the length instruction is
//! always generated from the per-window [`LengthBounds`].

use crate::summarizer::LengthBounds;

/// Default system prompt for summarising one window of a document.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a careful summariser. You receive one excerpt of a longer document and must condense it.

Follow these rules precisely:

1. CONTENT
   - Keep the main facts, claims, names and numbers of the excerpt
   - Do not add information that is not in the excerpt
   - The excerpt may start or end mid-sentence; summarise what is there

2. STYLE
   - Write plain prose in complete sentences
   - No headings, bullet points, tables or Markdown
   - No emoji or decorative characters

3. OUTPUT FORMAT
   - Output ONLY the summary text
   - Do NOT add a preamble such as "Summary:" or "Here is the summary"
   - Do NOT wrap the output in code fences"#;

/// Build the length instruction that precedes the excerpt.
///
/// When the bounds cross (`min > max`, which happens for short windows) the
/// lower bound is dropped and only the upper bound is requested.
pub fn length_instruction(bounds: LengthBounds) -> String {
    if bounds.min_length <= bounds.max_length {
        format!(
            "Summarise the following excerpt in {} to {} words.",
            bounds.min_length, bounds.max_length
        )
    } else {
        format!(
            "Summarise the following excerpt in at most {} words.",
            bounds.max_length.max(1)
        )
    }
}
