use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the Flow Access REST API for non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("access api error {code}: {message}")]
pub struct AccessApiError {
    pub code: u16,
    pub message: String,
}

impl AccessApiError {
    /// The script ran and aborted (panic, failed force-unwrap, bad argument).
    pub fn is_script_failure(&self) -> bool {
        let lower = self.message.to_ascii_lowercase();
        self.code == 400
            && (lower.contains("failed to execute")
                || lower.contains("execution reverted")
                || lower.contains("cadence runtime error")
                || lower.contains("invalid flow argument"))
    }
}
