// src/error.rs
use entsync_core::EngineError;
use entsync_executor::PoolError;
use thiserror::Error;

/// Errors that stop a whole batch before or after it runs.
///
/// Problems with a single document never surface here; they are recorded
/// in that document's report instead.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Executor setup failed: {0}")]
    Pool(#[from] PoolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Nothing to do: {0}")]
    NoInput(String),
}
