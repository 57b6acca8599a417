pub mod cancel;
pub mod log;
pub mod reporter;
pub mod synchronizer;

pub use cancel::CancellationSource;
pub use log::{LogError, LogSink};
pub use reporter::ProgressReporter;
pub use synchronizer::{SyncOutcome, SyncRequest, Synchronizer};
