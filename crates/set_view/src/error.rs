use ledger_client::QueryError;
use shared::domain::PlayId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("edition references play {play_id} which is not in the play catalog")]
    MissingPlayReference { play_id: PlayId },
    #[error("play {play_id} has no '{key}' metadata")]
    MissingPlayMetadata { play_id: PlayId, key: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Execution,
    Decode,
    Consistency,
}

impl ViewError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Query(QueryError::Transport(_)) => ErrorCategory::Transport,
            Self::Query(QueryError::Execution { .. }) => ErrorCategory::Execution,
            Self::Query(QueryError::Decode(_)) => ErrorCategory::Decode,
            Self::MissingPlayReference { .. } | Self::MissingPlayMetadata { .. } => {
                ErrorCategory::Consistency
            }
        }
    }
}
