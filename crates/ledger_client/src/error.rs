use thiserror::Error;

/// Response did not have the expected shape. `path` locates the offending
/// value inside the JSON-Cadence tree (`$` is the root).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct DecodeError {
    pub path: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("script execution failed ({code}): {message}")]
    Execution { code: u16, message: String },
    #[error("failed to decode query response: {0}")]
    Decode(#[from] DecodeError),
}

impl QueryError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
