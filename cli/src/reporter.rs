use async_trait::async_trait;
use tracing::debug;

use chirp_core::ports::ProgressReporter;

/// Prints batch progress to stderr, mirroring what the desktop progress bar
/// used to show: one line per file, error lines as they happen, a summary at
/// the end.
pub struct TerminalReporter {
  file_count: usize,
}

impl TerminalReporter {
  pub fn new(file_count: usize) -> Self {
    Self { file_count }
  }
}

#[async_trait]
impl ProgressReporter for TerminalReporter {
  async fn job_started(&self, file_count: usize) {
    eprintln!("Starting to sync {file_count} file{}.", plural(file_count));
  }

  async fn file_progress(&self, index: usize, percent: u8) {
    debug!(index, percent, "sync progress");
  }

  async fn file_named(&self, index: usize, basename: &str) {
    eprintln!("Syncing {basename} ({} of {}).", index + 1, self.file_count);
  }

  async fn file_failed(&self, basename: &str) {
    eprintln!("Error when syncing {basename}.");
  }

  async fn job_cancelled(&self) {
    eprintln!("Sync cancelled.");
  }

  async fn job_finished(&self, success_count: usize, error_count: usize, log_write_failed: bool) {
    if error_count > 0 {
      eprintln!("Errors occurred in {error_count} file{}.", plural(error_count));
      if log_write_failed {
        eprintln!("Failed to write ERRORS.TXT to destination.");
      } else {
        eprintln!("See ERRORS.TXT for details.");
      }
    } else {
      eprintln!("Successfully synced {success_count} file{}.", plural(success_count));
    }
  }
}

fn plural(count: usize) -> &'static str {
  if count == 1 { "" } else { "s" }
}
