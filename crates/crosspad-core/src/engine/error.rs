//! Mixer engine error types

use thiserror::Error;

/// Errors from engine lifecycle operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// The mixer thread could not be created
    #[error("Failed to spawn mixer thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),

    /// Operation needs the engine to be stopped
    #[error("Mixer engine is running")]
    Running,
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
