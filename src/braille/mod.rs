//! Six-dot braille transcoding.
//!
//! [`encode`] and [`decode`] are total: every input string produces an
//! output, and characters outside the table travel through unchanged. The
//! round trip is lossy for case (braille here has no capital sign) and for
//! any punctuation the table does not cover.
//!
//! ```rust
//! use edgequake_text2braille::braille::{decode, encode};
//!
//! let b = encode("Route 66");
//! assert_eq!(b, "⠗⠕⠥⠞⠑ ⠼⠋⠼⠋");
//! assert_eq!(decode(&b), "route 66");
//! ```

pub mod decode;
pub mod encode;
pub mod table;

pub use decode::{decode, decode_with};
pub use encode::{encode, encode_with};
pub use table::{SymbolTable, TableError, NUMERIC_INDICATOR};
