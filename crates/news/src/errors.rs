use stockhero_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error(transparent)]
    Upstream(#[from] CoreError),

    #[error("Malformed RSS: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for NewsError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}
