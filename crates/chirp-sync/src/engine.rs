use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use chirp_core::ports::{SyncOutcome, SyncRequest, Synchronizer};

/// Binary searched on PATH when no engine is configured.
pub const DEFAULT_ENGINE_NAME: &str = "chirp-syncd";

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("sync engine not found: {0}")]
  NotFound(String),
}

/// `Synchronizer` adapter that runs the external sync engine as a
/// subprocess, one invocation per file.
///
/// The engine prints `progress <n>` lines on stdout while it works; its last
/// non-empty stderr line is kept as the failure reason when it exits
/// non-zero. Launch failures are per-file failures, never panics.
pub struct CommandSynchronizer {
  program: PathBuf,
}

impl CommandSynchronizer {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self { program: program.into() }
  }

  /// Locates the default engine binary on PATH.
  pub fn locate() -> Result<Self, EngineError> {
    let program = which::which(DEFAULT_ENGINE_NAME)
      .map_err(|e| EngineError::NotFound(format!("{DEFAULT_ENGINE_NAME}: {e}")))?;
    Ok(Self::new(program))
  }
}

/// Builds the engine's argument list from one request; only the options
/// present on the request appear.
fn engine_args(request: &SyncRequest) -> Vec<OsString> {
  let mut args: Vec<OsString> = vec![request.input.as_os_str().to_os_string()];

  if let Some(dir) = &request.output_dir {
    args.push("--destination".into());
    args.push(dir.as_os_str().to_os_string());
  }

  if let Some(prefix) = &request.prefix {
    args.push("--prefix".into());
    args.push(prefix.into());
  }

  if let Some(hz) = request.resample_hz {
    args.push("--resample".into());
    args.push(hz.to_string().into());
  }

  if request.auto_resolve {
    args.push("--auto-resolve".into());
  }

  args
}

/// Parses a `progress <n>` stdout line; values above 100 clamp to 100.
fn parse_progress(line: &str) -> Option<u8> {
  let rest = line.trim().strip_prefix("progress")?;
  let value: u32 = rest.trim().parse().ok()?;
  Some(value.min(100) as u8)
}

#[async_trait]
impl Synchronizer for CommandSynchronizer {
  async fn sync(&self, request: SyncRequest, progress: UnboundedSender<u8>) -> SyncOutcome {
    let mut child = match Command::new(&self.program)
      .args(engine_args(&request))
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
    {
      Ok(child) => child,
      Err(e) => {
        warn!(engine = %self.program.display(), error = %e, "failed to launch sync engine");
        return SyncOutcome::Failed { reason: format!("failed to launch sync engine: {e}") };
      }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let forward_progress = async {
      if let Some(stdout) = stdout {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
          match parse_progress(&line) {
            Some(percent) => {
              let _ = progress.unbounded_send(percent);
            }
            None => debug!(%line, "unrecognized engine output"),
          }
        }
      }
    };

    let collect_stderr = async {
      let mut last = None;
      if let Some(stderr) = stderr {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
          let line = line.trim();
          if !line.is_empty() {
            last = Some(line.to_string());
          }
        }
      }
      last
    };

    let ((), last_stderr, status) =
      futures::join!(forward_progress, collect_stderr, child.wait());

    match status {
      Ok(status) if status.success() => SyncOutcome::Synced,
      Ok(status) => SyncOutcome::Failed {
        reason: last_stderr.unwrap_or_else(|| format!("sync engine exited with {status}")),
      },
      Err(e) => SyncOutcome::Failed { reason: format!("failed to wait for sync engine: {e}") },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn request(input: &str) -> SyncRequest {
    SyncRequest {
      input: PathBuf::from(input),
      output_dir: None,
      prefix: None,
      resample_hz: None,
      auto_resolve: false,
    }
  }

  #[test]
  fn minimal_request_yields_only_the_input() {
    let args = engine_args(&request("/rec/20220914_120000.WAV"));
    assert_eq!(args, vec![OsString::from("/rec/20220914_120000.WAV")]);
  }

  #[test]
  fn full_request_yields_every_option() {
    let mut req = request("/rec/a.wav");
    req.output_dir = Some(PathBuf::from("/out"));
    req.prefix = Some("SYNCED_".to_string());
    req.resample_hz = Some(192_000);
    req.auto_resolve = true;

    let args: Vec<String> =
      engine_args(&req).into_iter().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(
      args,
      vec![
        "/rec/a.wav",
        "--destination",
        "/out",
        "--prefix",
        "SYNCED_",
        "--resample",
        "192000",
        "--auto-resolve",
      ]
    );
  }

  #[test]
  fn progress_lines_parse_and_clamp() {
    assert_eq!(parse_progress("progress 0"), Some(0));
    assert_eq!(parse_progress("progress 42"), Some(42));
    assert_eq!(parse_progress("  progress 100 "), Some(100));
    assert_eq!(parse_progress("progress 250"), Some(100));
    assert_eq!(parse_progress("progress"), None);
    assert_eq!(parse_progress("done"), None);
    assert_eq!(parse_progress("progress -3"), None);
  }

  #[cfg(unix)]
  mod subprocess {
    use super::*;
    use futures::StreamExt;
    use futures::channel::mpsc;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn script(dir: &std::path::Path, body: &str) -> PathBuf {
      let path = dir.join("engine.sh");
      fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
      fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
      path
    }

    #[tokio::test]
    async fn successful_engine_streams_progress() {
      let dir = tempdir().unwrap();
      let engine = script(dir.path(), "echo 'progress 50'\necho 'progress 100'\nexit 0");

      let (tx, rx) = mpsc::unbounded();
      let outcome = CommandSynchronizer::new(engine).sync(request("/rec/a.wav"), tx).await;

      assert_eq!(outcome, SyncOutcome::Synced);
      assert_eq!(rx.collect::<Vec<u8>>().await, vec![50, 100]);
    }

    #[tokio::test]
    async fn failing_engine_reports_the_last_stderr_line() {
      let dir = tempdir().unwrap();
      let engine = script(dir.path(), "echo 'opening input' >&2\necho 'bad header' >&2\nexit 1");

      let (tx, _rx) = mpsc::unbounded();
      let outcome = CommandSynchronizer::new(engine).sync(request("/rec/a.wav"), tx).await;

      assert_eq!(outcome, SyncOutcome::Failed { reason: "bad header".to_string() });
    }

    #[tokio::test]
    async fn missing_engine_is_a_per_file_failure() {
      let (tx, _rx) = mpsc::unbounded();
      let outcome = CommandSynchronizer::new("/nonexistent/chirp-syncd")
        .sync(request("/rec/a.wav"), tx)
        .await;

      assert!(matches!(outcome, SyncOutcome::Failed { .. }));
    }
  }
}
