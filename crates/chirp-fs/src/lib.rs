pub mod io;
pub mod log_sink;
pub mod recordings;

pub use io::atomic_write_str;
pub use log_sink::{ERROR_LOG_NAME, FsLogSink};
pub use recordings::{CollectError, collect_recordings, is_recording};
