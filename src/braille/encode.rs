//! Text → braille.
//!
//! The whole input is lower-cased before lookup because this braille has no
//! capital sign; `"Hello"` and `"hello"` encode identically. Digits are
//! written as the numeric indicator followed by the digit glyph, once per
//! digit rather than once per run, so `"42"` becomes `⠼⠙⠼⠃`. Characters the
//! table does not know pass through untouched.

use super::table::{SymbolTable, NUMERIC_INDICATOR};

/// Encode `text` to six-dot braille. Never fails.
pub fn encode(text: &str) -> String {
    encode_with(SymbolTable::global(), text)
}

/// Encode against an explicit table.
pub fn encode_with(table: &SymbolTable, text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len() * 3);

    for c in lowered.chars() {
        if let Some(glyph) = table.glyph_for(c) {
            out.push(glyph);
        } else if let Some(glyph) = table.digit_glyph_for(c) {
            out.push(NUMERIC_INDICATOR);
            out.push(glyph);
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_letters_and_space() {
        assert_eq!(encode("hello world"), "⠓⠑⠇⠇⠕ ⠺⠕⠗⠇⠙");
    }

    #[test]
    fn case_is_discarded() {
        assert_eq!(encode("Hello"), encode("hello"));
        assert_eq!(encode("ABC"), "⠁⠃⠉");
    }

    #[test]
    fn one_indicator_per_digit() {
        assert_eq!(encode("42"), "⠼⠙⠼⠃");
        assert_eq!(encode("2024"), "⠼⠃⠼⠚⠼⠃⠼⠙");
    }

    #[test]
    fn punctuation_maps_to_glyphs() {
        assert_eq!(encode("a, b."), "⠁⠂ ⠃⠲");
        assert_eq!(encode("(x)?!"), "⠷⠭⠾⠦⠖");
        assert_eq!(encode("it's $5"), "⠊⠞⠈⠎ ⠴⠼⠑");
    }

    #[test]
    fn unmapped_characters_pass_through() {
        assert_eq!(encode("é"), "é");
        assert_eq!(encode("a\nb"), "⠁\n⠃");
        assert_eq!(encode("50%"), "⠼⠑⠼⠚%");
    }

    #[test]
    fn empty_input_encodes_to_empty() {
        assert_eq!(encode(""), "");
    }
}
