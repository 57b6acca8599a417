use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use chirp_core::ports::{LogError, LogSink};

/// File name of the durable error log, written under the custom destination
/// directory or next to the first failing file.
pub const ERROR_LOG_NAME: &str = "ERRORS.TXT";

/// Append-mode `LogSink` backed by `<dir>/ERRORS.TXT`.
///
/// Holds the file handle for one run; the handle is released by `close`,
/// which the error log writer calls on every exit path.
#[derive(Debug, Default)]
pub struct FsLogSink {
  file: Option<File>,
  path: Option<PathBuf>,
}

impl FsLogSink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Path of the opened log, if any.
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }
}

impl LogSink for FsLogSink {
  fn open_append(&mut self, dir: &Path) -> Result<(), LogError> {
    let path = dir.join(ERROR_LOG_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    info!(path = %path.display(), "opened sync error log");

    self.file = Some(file);
    self.path = Some(path);
    Ok(())
  }

  fn append(&mut self, text: &str) -> Result<(), LogError> {
    let Some(file) = self.file.as_mut() else {
      return Err(LogError::Io("error log is not open".to_string()));
    };

    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(())
  }

  fn close(&mut self) -> Result<(), LogError> {
    if let Some(file) = self.file.take() {
      file.sync_all()?;
    }
    Ok(())
  }
}
