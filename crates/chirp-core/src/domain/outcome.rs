use serde::Serialize;
use std::path::PathBuf;

/// A single file that failed to sync.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
  pub path: PathBuf,
  pub reason: String,
}

/// Terminal state of a batch run. Cancellation is not an error; an
/// unwritable error log is, and aborts the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
  Completed,
  Cancelled,
  AbortedOnLogFailure,
}

/// Aggregate outcome of one completed or cancelled batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
  pub success_count: usize,
  pub error_count: usize,
  /// Failures in processing order.
  pub failures: Vec<FileFailure>,
  /// Set when the durable error log could not be written.
  pub log_write_failed: bool,
  pub termination: Termination,
}
