use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
  #[error("io error: {0}")]
  Io(String),
}

impl From<std::io::Error> for LogError {
  fn from(e: std::io::Error) -> Self {
    LogError::Io(e.to_string())
  }
}

/// Append-only destination for the durable error log.
///
/// Opened lazily by the `ErrorLogWriter` on the first failure of a run and
/// owned exclusively by it until the run ends; a failed write is fatal for
/// the rest of the run.
pub trait LogSink: Send {
  fn open_append(&mut self, dir: &Path) -> Result<(), LogError>;
  fn append(&mut self, text: &str) -> Result<(), LogError>;
  fn close(&mut self) -> Result<(), LogError>;
}
