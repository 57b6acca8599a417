mod paths;
mod settings;

pub use paths::{ChirpPaths, ConfigError};
pub use settings::SyncSettings;

use once_cell::sync::Lazy;

/// Resolved config paths, shared process-wide.
pub static PATHS: Lazy<ChirpPaths> =
  Lazy::new(|| ChirpPaths::detect().expect("failed to init ChirpPaths"));
