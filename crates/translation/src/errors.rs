use stockhero_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error(transparent)]
    Upstream(#[from] CoreError),

    /// The service answered but carried no translated segments.
    #[error("Translation response had no segments")]
    EmptyResponse,
}

impl TranslationError {
    /// The service answered with a non-success status.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Upstream(CoreError::UpstreamStatus { .. }))
    }
}
