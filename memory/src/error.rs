use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Memory ID not set. Create memory first.")]
    NotInitialized,

    #[error("Failed to create memory: {0:#}")]
    Create(anyhow::Error),

    #[error("Memory service error: {0:#}")]
    Service(anyhow::Error),

    #[error("Run-state error: {0}")]
    RunState(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<MemoryError> for support_core::SupportError {
    fn from(e: MemoryError) -> Self {
        support_core::SupportError::Memory(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
