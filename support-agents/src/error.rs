use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

impl ToolError {
    pub(crate) fn invalid(tool: &str, err: serde_json::Error) -> Self {
        ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: err.to_string(),
        }
    }
}
