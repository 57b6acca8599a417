use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::channel::mpsc;
use tracing::{info, warn};

use crate::domain::backoff::{BackoffState, DEFAULT_BACKOFF};
use crate::domain::job::{OutputPolicy, SyncJob};
use crate::domain::outcome::{BatchResult, FileFailure, Termination};
use crate::ports::{
  CancellationSource, LogSink, ProgressReporter, SyncOutcome, SyncRequest, Synchronizer,
};
use crate::services::error_log::{ErrorLogEntry, ErrorLogWriter};

/// Knobs a front end rarely touches; tests shrink the backoff delay.
#[derive(Debug, Clone)]
pub struct SyncTuning {
  pub default_backoff: Duration,
}

impl Default for SyncTuning {
  fn default() -> Self {
    Self { default_backoff: DEFAULT_BACKOFF }
  }
}

/// Batch sync orchestrator.
///
/// Walks the job's file list strictly in order, invokes the external sync
/// operation per file and drives progress reporting, failure logging and
/// backoff. A single logical worker processes the batch; nothing here runs
/// files in parallel, so the reporter and the error log observe one coherent,
/// monotonically increasing file index sequence.
///
/// One service instance drives one run; `run` consumes it, matching the
/// run-scoped lifetime of the backoff state and the error log buffer.
pub struct SyncService<S, R, C, L>
where
  S: Synchronizer,
  R: ProgressReporter,
  C: CancellationSource,
  L: LogSink,
{
  synchronizer: S,
  reporter: R,
  cancel: C,
  sink: L,
  tuning: SyncTuning,
}

impl<S, R, C, L> SyncService<S, R, C, L>
where
  S: Synchronizer,
  R: ProgressReporter,
  C: CancellationSource,
  L: LogSink,
{
  pub fn new(synchronizer: S, reporter: R, cancel: C, sink: L) -> Self {
    Self { synchronizer, reporter, cancel, sink, tuning: SyncTuning::default() }
  }

  pub fn with_tuning(mut self, tuning: SyncTuning) -> Self {
    self.tuning = tuning;
    self
  }

  /// Runs the batch to completion, cancellation or log-failure abort.
  ///
  /// Per-file failures never escape as errors; everything is folded into the
  /// returned `BatchResult` and surfaced through the reporter.
  pub async fn run(self, job: &SyncJob) -> BatchResult {
    let Self { synchronizer, reporter, cancel, sink, tuning } = self;

    let mut backoff = BackoffState::new(tuning.default_backoff);
    let mut log = ErrorLogWriter::new(sink);

    let mut success_count = 0usize;
    let mut failures: Vec<FileFailure> = Vec::new();
    let mut log_write_failed = false;
    let mut termination = Termination::Completed;

    reporter.job_started(job.files.len()).await;

    for (index, file) in job.files.iter().enumerate() {
      // Cooperative cancellation, observed at file granularity only.
      if cancel.is_cancelled() {
        info!("sync cancelled");
        termination = Termination::Cancelled;
        reporter.job_cancelled().await;
        break;
      }

      let basename = basename_of(file);

      reporter.file_progress(index, 0).await;
      reporter.file_named(index, &basename).await;

      info!(file = %file.display(), "syncing");

      let outcome = match resolve_output_dir(&job.output, file) {
        Ok(output_dir) => {
          let request = SyncRequest {
            input: file.clone(),
            output_dir,
            prefix: job.prefix.clone(),
            resample_hz: job.resample_hz,
            auto_resolve: job.auto_resolve,
          };
          invoke(&synchronizer, &reporter, index, request).await
        }
        Err(e) => {
          SyncOutcome::Failed { reason: format!("unable to create output directory: {e}") }
        }
      };

      match outcome {
        SyncOutcome::Synced => {
          success_count += 1;
          backoff.on_success();
        }
        SyncOutcome::Failed { reason } => {
          failures.push(FileFailure { path: file.clone(), reason: reason.clone() });
          reporter.file_failed(&basename).await;

          let log_dir = job.output.error_log_dir(file);
          let written = log
            .record(&log_dir, ErrorLogEntry { basename, reason })
            .and_then(|()| log.maybe_flush(Instant::now()));

          if let Err(e) = written {
            // Failures can no longer be durably recorded, so stop rather
            // than lose error data silently.
            warn!(error = %e, "error log write failed, aborting batch");
            log_write_failed = true;
            termination = Termination::AbortedOnLogFailure;
            log.abandon();
            break;
          }

          tokio::time::sleep(backoff.on_failure()).await;
        }
      }
    }

    if !log_write_failed {
      if let Err(e) = log.final_flush() {
        warn!(error = %e, "final error log flush failed");
        log_write_failed = true;
        if termination == Termination::Completed {
          termination = Termination::AbortedOnLogFailure;
        }
      }
    }

    let error_count = failures.len();
    reporter.job_finished(success_count, error_count, log_write_failed).await;

    BatchResult { success_count, error_count, failures, log_write_failed, termination }
  }
}

/// Invokes the external operation, forwarding its progress stream to the
/// reporter while it runs.
async fn invoke<S: Synchronizer, R: ProgressReporter>(
  synchronizer: &S,
  reporter: &R,
  index: usize,
  request: SyncRequest,
) -> SyncOutcome {
  let (tx, mut rx) = mpsc::unbounded();

  let forward = async {
    while let Some(percent) = rx.next().await {
      reporter.file_progress(index, percent).await;
    }
  };

  let (outcome, ()) = futures::join!(synchronizer.sync(request, tx), forward);
  outcome
}

fn basename_of(path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string())
}

/// Resolves the directory the synced output goes to, creating the mirrored
/// subdirectory when the policy asks for it. `None` means "alongside the
/// input file". Creation is idempotent; only a real I/O error fails the
/// affected file.
fn resolve_output_dir(policy: &OutputPolicy, input: &Path) -> io::Result<Option<PathBuf>> {
  match policy {
    OutputPolicy::InPlace => Ok(None),
    OutputPolicy::Custom(dir) => Ok(Some(dir.clone())),
    OutputPolicy::CustomMirrored(dir) => {
      let Some(folder) = input.parent().and_then(Path::file_name) else {
        return Ok(Some(dir.clone()));
      };
      let subdir = dir.join(folder);
      fs::create_dir_all(&subdir)?;
      Ok(Some(subdir))
    }
  }
}
