use crate::transaction::StepError;
use richdoc_markup::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl EditorError {
    pub fn storage(message: impl Into<String>) -> Self {
        EditorError::Storage(message.into())
    }
}
