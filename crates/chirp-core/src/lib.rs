pub mod domain;
pub mod ports;
pub mod services;

pub use domain::job::{OutputPolicy, SyncJob, SYNCED_SAMPLE_RATE};
pub use domain::outcome::{BatchResult, FileFailure, Termination};
pub use services::sync_service::{SyncService, SyncTuning};
