//! Braille → text.
//!
//! A two-state scanner over the input symbols:
//!
//! ```text
//!            ⠼                       any symbol
//!  NORMAL ───────▶ NUMBER-PENDING ───────────────▶ NORMAL
//!    │ other symbol: letter/punctuation lookup, else pass through
//! ```
//!
//! In NUMBER-PENDING exactly one symbol is consumed. A digit glyph becomes
//! its digit; anything else is emitted as the raw symbol, without a second
//! letter lookup. An indicator with nothing after it is dropped.

use super::table::{SymbolTable, NUMERIC_INDICATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    NumberPending,
}

/// Decode braille (possibly mixed with pass-through characters). Never fails.
pub fn decode(braille: &str) -> String {
    decode_with(SymbolTable::global(), braille)
}

/// Decode against an explicit table.
pub fn decode_with(table: &SymbolTable, braille: &str) -> String {
    let mut out = String::with_capacity(braille.len());
    let mut state = State::Normal;

    for symbol in braille.chars() {
        state = match state {
            State::Normal if symbol == NUMERIC_INDICATOR => State::NumberPending,
            State::Normal => {
                out.push(table.char_for(symbol).unwrap_or(symbol));
                State::Normal
            }
            State::NumberPending => {
                out.push(table.digit_for(symbol).unwrap_or(symbol));
                State::Normal
            }
        };
    }

    match state {
        State::Normal => out,
        // Indicator with nothing after it: dropped.
        State::NumberPending => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_letters_and_punctuation() {
        assert_eq!(decode("⠓⠑⠇⠇⠕ ⠺⠕⠗⠇⠙⠖"), "hello world!");
    }

    #[test]
    fn decodes_digits_after_indicator() {
        assert_eq!(decode("⠼⠃⠼⠚⠼⠃⠼⠙"), "2024");
    }

    #[test]
    fn glyph_without_indicator_is_a_letter() {
        assert_eq!(decode("⠁⠼⠁⠁"), "a1a");
    }

    #[test]
    fn trailing_indicator_is_dropped() {
        assert_eq!(decode("⠁⠃⠼"), "ab");
        assert_eq!(decode("⠼"), "");
    }

    #[test]
    fn indicator_before_non_digit_emits_raw_symbol() {
        // ⠅ is "k" in normal mode but has no digit meaning.
        assert_eq!(decode("⠼⠅"), "⠅");
        assert_eq!(decode("⠼⠲"), "⠲");
        assert_eq!(decode("⠼x⠁"), "xa");
    }

    #[test]
    fn double_indicator_emits_second_raw() {
        assert_eq!(decode("⠼⠼⠁"), "⠼a");
    }

    #[test]
    fn unmapped_symbols_pass_through() {
        assert_eq!(decode("é\n⠁"), "é\na");
        assert_eq!(decode("⠿"), "⠿");
    }

    #[test]
    fn never_produces_uppercase() {
        let decoded = decode(&crate::braille::encode("Hello World"));
        assert_eq!(decoded, "hello world");
    }
}
