pub mod engine;

pub use engine::{CommandSynchronizer, DEFAULT_ENGINE_NAME, EngineError};
