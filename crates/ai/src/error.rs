//! AI error types.

use stockhero_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// Transport or status failure talking to the model provider.
    #[error(transparent)]
    Upstream(#[from] CoreError),

    /// The provider answered with a body we could not read.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl AiError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Whether the provider answered with a non-success status.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Upstream(CoreError::UpstreamStatus { .. }))
    }
}
