use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use chirp_core::ports::CancellationSource;

/// Cancellation source backed by Ctrl-C.
///
/// The flag is set from a background task, so the orchestrator's per-file
/// poll is a plain atomic load and never blocks.
#[derive(Clone)]
pub struct CtrlCCancellation {
  cancelled: Arc<AtomicBool>,
}

impl CtrlCCancellation {
  pub fn install() -> Self {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        info!("cancellation requested");
        flag.store(true, Ordering::Relaxed);
      }
    });

    Self { cancelled }
  }
}

impl CancellationSource for CtrlCCancellation {
  fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Relaxed)
  }
}
