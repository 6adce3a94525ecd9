//! Progress-callback trait for per-window summarisation events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to receive
//! events as each window is summarised. Callers can forward them to a
//! terminal progress bar, a channel or a log without the library knowing how.
//!
//! # Example
//!
//! ```rust
//! use edgequake_text2braille::{SummaryConfig, SummaryProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl SummaryProgressCallback for CountingCallback {
//!     fn on_window_complete(&self, window: usize, total_windows: usize, summary_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("window {}/{} done ({} bytes)", window + 1, total_windows, summary_len);
//!     }
//! }
//!
//! let config = SummaryConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the summarisation pipeline as it processes each window.
///
/// Window indices are 0-based. With `concurrency > 1` the window methods may
/// be called concurrently and out of order, so implementations must
/// synchronise any shared state. All methods default to no-ops.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called once before the first window is sent.
    fn on_summary_start(&self, total_windows: usize) {
        let _ = total_windows;
    }

    /// Called just before the summariser is invoked for a window.
    fn on_window_start(&self, window: usize, total_windows: usize) {
        let _ = (window, total_windows);
    }

    /// Called when a window produced a usable summary.
    fn on_window_complete(&self, window: usize, total_windows: usize, summary_len: usize) {
        let _ = (window, total_windows, summary_len);
    }

    /// Called when a window failed after all retries.
    fn on_window_error(&self, window: usize, total_windows: usize, error: &str) {
        let _ = (window, total_windows, error);
    }

    /// Called once after every window has been attempted.
    fn on_summary_complete(&self, total_windows: usize, success_count: usize) {
        let _ = (total_windows, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
