//! Post-processing: deterministic clean-up of summariser output.
//!
//! Even well-prompted models occasionally wrap their answer in artefacts that
//! make no sense in a merged, space-joined summary (and would be transcribed
//! glyph by glyph into braille):
//!
//! - ` ``` ` fences around the whole answer
//! - a preamble such as `Summary:` or `Here is a summary of the excerpt:`
//! - bullet or numbered list markers at the start of lines
//! - zero-width spaces, BOMs and soft hyphens
//! - line breaks and runs of spaces
//!
//! Each rule is a pure `&str → String` pass, applied in a fixed order: fences
//! first so the preamble rule sees the real first line, whitespace last so
//! every earlier rule can rely on line structure.
//!
//! An answer that is empty after clean-up counts as a degenerate output and
//! the window is retried or recorded as failed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all clean-up rules to one raw summariser answer.
///
/// Rules (applied in order):
/// 1. Strip outer code fences
/// 2. Strip a leading "Summary:"-style preamble
/// 3. Strip list markers at line starts
/// 4. Strip invisible Unicode
/// 5. Collapse all whitespace to single spaces and trim
pub fn clean_summary(input: &str) -> String {
    let s = strip_code_fences(input);
    let s = strip_preamble(&s);
    let s = strip_list_markers(&s);
    let s = remove_invisible_chars(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Strip outer code fences ──────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\n(.*)\n```\s*$").unwrap());

fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(caps) = RE_OUTER_FENCES.captures(trimmed) {
        caps[1].to_string()
    } else {
        trimmed.to_string()
    }
}

// ── Rule 2: Strip preamble ───────────────────────────────────────────────────

static RE_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:here\s+is|here's)\s+(?:a|the)\s+(?:concise\s+|short\s+|brief\s+)?summary(?:\s+of\s+the\s+(?:excerpt|text|passage))?\s*:|summary\s*:)\s*",
    )
    .unwrap()
});

fn strip_preamble(input: &str) -> String {
    RE_PREAMBLE.replace(input, "").to_string()
}

// ── Rule 3: Strip list markers ───────────────────────────────────────────────

static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*•]|\d{1,3}[.)])[ \t]+").unwrap());

fn strip_list_markers(input: &str) -> String {
    RE_LIST_MARKER.replace_all(input, "").to_string()
}

// ── Rule 4: Remove invisible Unicode characters ──────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 5: Collapse whitespace ──────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ────────────────────────────────────────────────────────────────────
