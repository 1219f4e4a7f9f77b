use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupportError {
    #[error("Memory error: {0}")]
    Memory(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Unknown agent type: {0}")]
    UnknownAgentType(String),
}

pub type Result<T> = std::result::Result<T, SupportError>;
