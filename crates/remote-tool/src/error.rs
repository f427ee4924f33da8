use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteToolError {
    #[error("Failed to fetch schema from {url}: {reason}")]
    SchemaFetch { url: String, reason: String },

    #[error("No valid operation found in schema")]
    NoOperationFound,

    #[error("RemoteTool only supports asynchronous execution")]
    UnsupportedMode,

    #[error("Remote operation failed: status={status}, body={body}")]
    RemoteOperation { status: StatusCode, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

impl RemoteToolError {
    pub(crate) fn schema_fetch(url: &str, reason: impl ToString) -> Self {
        Self::SchemaFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RemoteToolError>;
