#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Entry not found")]
    EntryNotFound,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Backend failure: {0}")]
    Backend(#[source] anyhow::Error),
}

impl From<anyhow::Error> for DataError {
    fn from(value: anyhow::Error) -> Self {
        Self::Backend(value)
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Backend(value.into())
    }
}

pub type DataResult<T> = Result<T, DataError>;

use crate::validation::ValidationError;
