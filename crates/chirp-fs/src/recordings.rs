use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Recorder naming scheme: `YYYYMMDD_HHMMSS.WAV`, any case.
static RECORDING_NAME: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)^\d{8}_\d{6}\.WAV$").expect("recording name regex"));

#[derive(Debug, Error)]
pub enum CollectError {
  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("not a directory: {0}")]
  NotADirectory(PathBuf),
}

/// Whether `path` carries a recorder-format file name.
pub fn is_recording(path: &Path) -> bool {
  path.file_name().and_then(|name| name.to_str()).is_some_and(|name| RECORDING_NAME.is_match(name))
}

/// Lists the recording files directly contained in each selected folder,
/// sorted by path so job order is deterministic.
pub fn collect_recordings(folders: &[PathBuf]) -> Result<Vec<PathBuf>, CollectError> {
  let mut recordings = Vec::new();

  for folder in folders {
    if !folder.is_dir() {
      return Err(CollectError::NotADirectory(folder.clone()));
    }

    for entry in fs::read_dir(folder)? {
      let path = entry?.path();
      if path.is_file() && is_recording(&path) {
        recordings.push(path);
      }
    }
  }

  recordings.sort();
  debug!(count = recordings.len(), "collected recordings");

  Ok(recordings)
}
