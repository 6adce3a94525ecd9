//! Windowing: split a document into overlapping, bounded word spans.
//!
//! Summarisation models have an input budget, so long documents are cut into
//! windows of at most `max_tokens` words. Consecutive windows share `overlap`
//! words so a sentence cut at a boundary still reaches the model with some
//! context on the other side.
//!
//! ```text
//! words:   0 ─────────────────────────────────────────── n
//! win 0:   [0 ........ max)
//! win 1:        [step ........ step+max)
//! win 2:                [2·step ........ n)       step = max − overlap
//! ```
//!
//! The plan only stores the word slices; window text is joined on demand, and
//! [`WindowPlan::windows`] can be iterated as many times as needed.

use crate::error::Text2BrailleError;

/// A half-open span `[start, end)` of word indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Window {
    /// Position of this window in the plan (0-based).
    pub index: usize,
    /// First word index (inclusive).
    pub start: usize,
    /// Last word index (exclusive).
    pub end: usize,
}

impl Window {
    /// Number of words in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Whitespace-split words of a document plus the windowing parameters.
#[derive(Debug, Clone)]
pub struct WindowPlan<'a> {
    words: Vec<&'a str>,
    max_tokens: usize,
    overlap: usize,
}

impl<'a> WindowPlan<'a> {
    /// Split `text` into words and validate the parameters.
    ///
    /// # Errors
    /// [`Text2BrailleError::InvalidConfig`] when `max_tokens` is zero or
    /// `overlap >= max_tokens` (the window would never advance).
    pub fn new(text: &'a str, max_tokens: usize, overlap: usize) -> Result<Self, Text2BrailleError> {
        validate_window_params(max_tokens, overlap)?;
        Ok(Self {
            words: text.split_whitespace().collect(),
            max_tokens,
            overlap,
        })
    }

    /// Total number of words in the document.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Words advanced between consecutive window starts.
    pub fn step(&self) -> usize {
        self.max_tokens - self.overlap
    }

    /// Iterate the windows in ascending start order.
    pub fn windows(&self) -> Windows {
        Windows {
            total: self.words.len(),
            max_tokens: self.max_tokens,
            step: self.step(),
            next_start: 0,
            next_index: 0,
        }
    }

    /// Number of windows [`windows`](Self::windows) will yield.
    pub fn len(&self) -> usize {
        let n = self.words.len();
        if n == 0 {
            0
        } else {
            n.div_ceil(self.step())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words of `window`, joined by single spaces.
    pub fn text(&self, window: &Window) -> String {
        self.words[window.start..window.end].join(" ")
    }
}

/// Lazy iterator over a [`WindowPlan`].
#[derive(Debug, Clone)]
pub struct Windows {
    total: usize,
    max_tokens: usize,
    step: usize,
    next_start: usize,
    next_index: usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.next_start >= self.total {
            return None;
        }
        let start = self.next_start;
        let end = (start + self.max_tokens).min(self.total);
        let window = Window {
            index: self.next_index,
            start,
            end,
        };
        self.next_start += self.step;
        self.next_index += 1;
        Some(window)
    }
}

/// Reject window parameters that cannot make progress.
pub fn validate_window_params(max_tokens: usize, overlap: usize) -> Result<(), Text2BrailleError> {
    if max_tokens == 0 {
        return Err(Text2BrailleError::InvalidConfig(
            "max_tokens must be ≥ 1".into(),
        ));
    }
    if overlap >= max_tokens {
        return Err(Text2BrailleError::InvalidConfig(format!(
            "overlap ({overlap}) must be smaller than max_tokens ({max_tokens})"
        )));
    }
    Ok(())
}

/// Chunk `text` into window strings in one call.
pub fn chunk_text(
    text: &str,
    max_tokens: usize,
    overlap: usize,
) -> Result<Vec<String>, Text2BrailleError> {
    let plan = WindowPlan::new(text, max_tokens, overlap)?;
    Ok(plan.windows().map(|w| plan.text(&w)).collect())
}
