pub mod error_log;
pub mod sync_service;
