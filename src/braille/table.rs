//! The fixed six-dot symbol table shared by the encoder and decoder.
//!
//! Three categories live here, each injective on its own:
//!
//! * letters `a`–`z`
//! * punctuation, plus the space character which maps to itself
//! * digits `0`–`9`, which reuse the glyphs of `a`–`j` and are therefore only
//!   reachable after [`NUMERIC_INDICATOR`]
//!
//! Letter and punctuation glyphs never collide, so decoding in the normal
//! state can use one combined reverse map. Digits get their own map because
//! they deliberately share glyphs with the first ten letters.
//!
//! The table is built once per process behind a [`Lazy`] and handed out as a
//! `&'static SymbolTable`; nothing allocates per call.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Glyph that switches the decoder into number mode for exactly one symbol.
pub const NUMERIC_INDICATOR: char = '⠼';

const LETTERS: [(char, char); 26] = [
    ('a', '⠁'),
    ('b', '⠃'),
    ('c', '⠉'),
    ('d', '⠙'),
    ('e', '⠑'),
    ('f', '⠋'),
    ('g', '⠛'),
    ('h', '⠓'),
    ('i', '⠊'),
    ('j', '⠚'),
    ('k', '⠅'),
    ('l', '⠇'),
    ('m', '⠍'),
    ('n', '⠝'),
    ('o', '⠕'),
    ('p', '⠏'),
    ('q', '⠟'),
    ('r', '⠗'),
    ('s', '⠎'),
    ('t', '⠞'),
    ('u', '⠥'),
    ('v', '⠧'),
    ('w', '⠺'),
    ('x', '⠭'),
    ('y', '⠽'),
    ('z', '⠵'),
];

const PUNCTUATION: [(char, char); 13] = [
    (' ', ' '),
    ('.', '⠲'),
    (',', '⠂'),
    ('?', '⠦'),
    ('!', '⠖'),
    ('-', '⠤'),
    (':', '⠒'),
    ('(', '⠷'),
    (')', '⠾'),
    ('/', '⠸'),
    ('&', '⠡'),
    ('$', '⠴'),
    ('\'', '⠈'),
];

const DIGITS: [(char, char); 10] = [
    ('1', '⠁'),
    ('2', '⠃'),
    ('3', '⠉'),
    ('4', '⠙'),
    ('5', '⠑'),
    ('6', '⠋'),
    ('7', '⠛'),
    ('8', '⠓'),
    ('9', '⠊'),
    ('0', '⠚'),
];

static TABLE: Lazy<SymbolTable> = Lazy::new(|| {
    SymbolTable::from_entries(&LETTERS, &PUNCTUATION, &DIGITS)
        .unwrap_or_else(|e| panic!("built-in braille table is malformed: {e}"))
});

/// Why a set of table entries cannot form a [`SymbolTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two source characters in one category share a glyph.
    #[error("glyph {glyph:?} is assigned to both {first:?} and {second:?}")]
    DuplicateGlyph { glyph: char, first: char, second: char },

    /// The same source character appears twice.
    #[error("character {0:?} is mapped more than once")]
    DuplicateChar(char),

    /// A letter and a punctuation mark share a glyph.
    #[error("glyph {0:?} is used by both a letter and a punctuation mark")]
    CategoryCollision(char),

    /// An entry uses the numeric indicator as its glyph.
    #[error("the numeric indicator cannot be used as a glyph for {0:?}")]
    ReservedGlyph(char),
}

/// Immutable bidirectional character ↔ glyph mapping.
#[derive(Debug)]
pub struct SymbolTable {
    text_to_glyph: HashMap<char, char>,
    glyph_to_text: HashMap<char, char>,
    digit_to_glyph: HashMap<char, char>,
    glyph_to_digit: HashMap<char, char>,
}

impl SymbolTable {
    /// The process-wide built-in table.
    pub fn global() -> &'static SymbolTable {
        &TABLE
    }

    /// Build a table from explicit entries, rejecting any ambiguity.
    pub fn from_entries(
        letters: &[(char, char)],
        punctuation: &[(char, char)],
        digits: &[(char, char)],
    ) -> Result<Self, TableError> {
        let (letter_fwd, letter_rev) = build_category(letters)?;
        let (punct_fwd, punct_rev) = build_category(punctuation)?;
        let (digit_to_glyph, glyph_to_digit) = build_category(digits)?;

        let mut text_to_glyph = letter_fwd;
        for (c, g) in punct_fwd {
            if text_to_glyph.insert(c, g).is_some() {
                return Err(TableError::DuplicateChar(c));
            }
        }

        let mut glyph_to_text = letter_rev;
        for (g, c) in punct_rev {
            if glyph_to_text.insert(g, c).is_some() {
                return Err(TableError::CategoryCollision(g));
            }
        }

        Ok(Self {
            text_to_glyph,
            glyph_to_text,
            digit_to_glyph,
            glyph_to_digit,
        })
    }

    /// Glyph for a lowercase letter, punctuation mark or space.
    pub fn glyph_for(&self, c: char) -> Option<char> {
        self.text_to_glyph.get(&c).copied()
    }

    /// Letter or punctuation for a glyph (never a digit).
    pub fn char_for(&self, glyph: char) -> Option<char> {
        self.glyph_to_text.get(&glyph).copied()
    }

    /// Glyph that follows the numeric indicator for `digit`.
    pub fn digit_glyph_for(&self, digit: char) -> Option<char> {
        self.digit_to_glyph.get(&digit).copied()
    }

    /// Digit for a glyph read in number mode.
    pub fn digit_for(&self, glyph: char) -> Option<char> {
        self.glyph_to_digit.get(&glyph).copied()
    }
}

type CategoryMaps = (HashMap<char, char>, HashMap<char, char>);

fn build_category(entries: &[(char, char)]) -> Result<CategoryMaps, TableError> {
    let mut forward = HashMap::with_capacity(entries.len());
    let mut reverse = HashMap::with_capacity(entries.len());

    for &(c, g) in entries {
        if g == NUMERIC_INDICATOR {
            return Err(TableError::ReservedGlyph(c));
        }
        if forward.insert(c, g).is_some() {
            return Err(TableError::DuplicateChar(c));
        }
        if let Some(first) = reverse.insert(g, c) {
            return Err(TableError::DuplicateGlyph {
                glyph: g,
                first,
                second: c,
            });
        }
    }

    Ok((forward, reverse))
}
