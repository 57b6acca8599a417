use std::path::{Path, PathBuf};

/// Sample rate applied when the "synced 192 kHz" option is enabled.
pub const SYNCED_SAMPLE_RATE: u32 = 192_000;

/// Where synced output files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPolicy {
  /// Alongside each input file.
  InPlace,
  /// Under a fixed destination directory.
  Custom(PathBuf),
  /// Under a fixed destination directory, inside a subdirectory named after
  /// the input file's parent folder. Selected at job-construction time, only
  /// when the job was built from folder selection.
  CustomMirrored(PathBuf),
}

impl OutputPolicy {
  /// Directory the error log goes to: the custom destination if one is
  /// configured, otherwise the parent of the first failing file.
  pub fn error_log_dir(&self, first_failure: &Path) -> PathBuf {
    match self {
      OutputPolicy::InPlace => {
        first_failure.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
      }
      OutputPolicy::Custom(dir) | OutputPolicy::CustomMirrored(dir) => dir.clone(),
    }
  }
}

/// One batch of recordings to synchronize. Immutable once a run starts;
/// `files` order determines processing order and index-based progress.
#[derive(Debug, Clone)]
pub struct SyncJob {
  pub files: Vec<PathBuf>,
  pub output: OutputPolicy,
  /// Optional output file name prefix; `None` or empty means none.
  pub prefix: Option<String>,
  /// Target sample rate; `None` means "no resample".
  pub resample_hz: Option<u32>,
  /// Let the engine auto-resolve ambiguous timestamps.
  pub auto_resolve: bool,
}
