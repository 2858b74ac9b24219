use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PagerError {
    #[error("A pager needs at least one page")]
    NoPages,

    #[error("Invalid page width: {0}")]
    InvalidWidth(f64),
}
