//! Structured progress reporting for long-running operations.
//!
//! Listing an index and summarizing every file in it can take minutes; the
//! reporter gives callers incremental feedback.

use std::sync::Arc;
use std::time::Instant;

/// Progress event emitted during index operations.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the operation: "list", "summarize"
    pub phase: String,

    /// Items finished so far
    pub current: u64,

    /// Total expected work (if known)
    pub total: Option<u64>,

    /// Percentage complete (0.0 - 100.0)
    pub percentage: Option<f64>,

    pub message: String,

    /// Elapsed time since the reporter was created
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    pub fn new(
        phase: impl Into<String>,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage =
            total.map(|t| if t > 0 { (current as f64 / t as f64) * 100.0 } else { 0.0 });

        Self {
            phase: phase.into(),
            current,
            total,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = if let Some(total) = self.total {
            format!("{}/{}", self.current, total)
        } else {
            format!("{}", self.current)
        };

        let pct = if let Some(p) = self.percentage {
            format!(" ({:.0}%)", p)
        } else {
            String::new()
        };

        format!("[{}] {}{} - {}", self.phase, progress, pct, self.message)
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress reporter that emits events through a callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Arc<Instant>,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            start_time: Arc::new(Instant::now()),
        }
    }

    /// Reporter that emits nothing.
    pub fn noop() -> Self {
        Self {
            callback: None,
            start_time: Arc::new(Instant::now()),
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.callback {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            let event = event.with_elapsed(elapsed);

            tracing::debug!(
                phase = %event.phase,
                current = event.current,
                total = ?event.total,
                percentage = ?event.percentage,
                message = %event.message,
                elapsed_secs = elapsed,
                "Progress event"
            );

            callback(event);
        }
    }

    /// Index listing finished.
    pub fn listed(&self, files: u64, index_id: &str) {
        self.emit(ProgressEvent::new(
            "list",
            files,
            Some(files),
            format!("{} files in {}", files, index_id),
        ));
    }

    /// One file summarized (successfully or not).
    pub fn summarized(&self, current: u64, total: u64, filename: &str, ok: bool) {
        let message = if ok {
            filename.to_string()
        } else {
            format!("{} (failed)", filename)
        };
        self.emit(ProgressEvent::new("summarize", current, Some(total), message));
    }
}
