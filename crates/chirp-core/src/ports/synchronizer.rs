use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use std::path::PathBuf;

/// Inputs of one external sync operation.
#[derive(Debug, Clone)]
pub struct SyncRequest {
  pub input: PathBuf,
  /// `None` writes the output alongside the input file.
  pub output_dir: Option<PathBuf>,
  pub prefix: Option<String>,
  /// `None` means "no resample".
  pub resample_hz: Option<u32>,
  pub auto_resolve: bool,
}

/// Result of one external sync operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  Synced,
  Failed { reason: String },
}

/// The external, opaque per-file transformation.
///
/// The orchestrator blocks on the returned future. Progress percentages
/// (0..=100, non-decreasing) are sent through `progress` while the operation
/// runs; the sender is dropped when it returns.
#[async_trait]
pub trait Synchronizer: Send + Sync {
  async fn sync(&self, request: SyncRequest, progress: UnboundedSender<u8>) -> SyncOutcome;
}
