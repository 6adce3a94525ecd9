//! Result types returned by the summarisation entry points.

use crate::error::{Text2BrailleError, WindowError};
use crate::summarizer::LengthBounds;
use serde::{Deserialize, Serialize};

/// Everything a summarisation request produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Merged summary, the input verbatim for short texts, or the fallback.
    pub summary: String,
    /// `summary` encoded as six-dot braille.
    pub braille: String,
    /// Per-window results in ascending window order. Empty for short inputs.
    pub windows: Vec<WindowResult>,
    pub stats: SummaryStats,
}

impl SummaryOutput {
    /// Turn any window failure into [`Text2BrailleError::PartialFailure`].
    ///
    /// The default behaviour tolerates failed windows; strict callers can
    /// use this to fail fast instead.
    pub fn into_result(self) -> Result<Self, Text2BrailleError> {
        if self.stats.failed_windows > 0 {
            return Err(Text2BrailleError::PartialFailure {
                success: self.stats.succeeded_windows,
                failed: self.stats.failed_windows,
                total: self.stats.total_windows,
            });
        }
        Ok(self)
    }
}

/// Outcome of summarising one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowResult {
    /// Window position (0-based); merge order.
    pub index: usize,
    /// First word index (inclusive).
    pub start: usize,
    /// Last word index (exclusive).
    pub end: usize,
    pub word_count: usize,
    /// Length bounds passed to the summariser for this window.
    pub bounds: LengthBounds,
    /// Cleaned summary text; `None` when the window failed.
    pub summary: Option<String>,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
    /// Attempts made beyond the first.
    pub retries: u32,
    pub error: Option<WindowError>,
}

impl WindowResult {
    pub fn is_success(&self) -> bool {
        self.summary.is_some()
    }
}

/// Aggregate statistics for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Whitespace-delimited words in the input.
    pub word_count: usize,
    /// False when the input was under the threshold and returned verbatim.
    pub summarized: bool,
    pub total_windows: usize,
    pub succeeded_windows: usize,
    pub failed_windows: usize,
    /// True when no window succeeded and the fallback summary was used.
    pub fallback_used: bool,
    /// Bounds computed from the whole document's word count.
    pub document_bounds: Option<LengthBounds>,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_duration_ms: u64,
    pub oracle_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(failed: usize, succeeded: usize) -> SummaryOutput {
        SummaryOutput {
            summary: "s".into(),
            braille: "⠎".into(),
            windows: vec![],
            stats: SummaryStats {
                total_windows: failed + succeeded,
                succeeded_windows: succeeded,
                failed_windows: failed,
                summarized: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn into_result_passes_clean_output() {
        assert!(output_with(0, 3).into_result().is_ok());
    }

    #[test]
    fn into_result_rejects_partial_failure() {
        let err = output_with(1, 2).into_result().unwrap_err();
        assert!(matches!(
            err,
            Text2BrailleError::PartialFailure {
                success: 2,
                failed: 1,
                total: 3
            }
        ));
    }

    #[test]
    fn output_serialises_to_json() {
        let json = serde_json::to_value(output_with(0, 1)).unwrap();
        assert_eq!(json["summary"], "s");
        assert_eq!(json["stats"]["succeeded_windows"], 1);
    }
}
