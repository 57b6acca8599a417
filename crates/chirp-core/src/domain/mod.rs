pub mod backoff;
pub mod job;
pub mod outcome;
