use async_trait::async_trait;

/// Progress boundary to whatever front end is driving the batch.
///
/// Events for file `i` are never interleaved with events for file `i + 1`;
/// the orchestrator finishes one file before starting the next.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
  async fn job_started(&self, file_count: usize);
  async fn file_progress(&self, index: usize, percent: u8);
  /// Display only; carries no contract beyond naming the file in flight.
  async fn file_named(&self, index: usize, basename: &str);
  async fn file_failed(&self, basename: &str);
  async fn job_cancelled(&self);
  async fn job_finished(&self, success_count: usize, error_count: usize, log_write_failed: bool);
}
