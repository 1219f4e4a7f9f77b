use memory::MemoryError;
use support_core::SupportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Agent(#[from] SupportError),

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote agent error ({code}): {message}")]
    Remote { code: i64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RuntimeError {
    fn from(err: reqwest::Error) -> Self {
        RuntimeError::Transport(err.to_string())
    }
}

impl From<RuntimeError> for SupportError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Agent(inner) => inner,
            RuntimeError::Config(message) => SupportError::Config(message),
            other => SupportError::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
