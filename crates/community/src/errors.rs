use stockhero_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommunityError {
    #[error(transparent)]
    Upstream(#[from] CoreError),

    #[error("Timeline page has no __NEXT_DATA__ payload")]
    MissingNextData,

    #[error("Failed to parse timeline: {0}")]
    Parse(String),

    /// A fetch task panicked or was cancelled.
    #[error("Timeline task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for CommunityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
