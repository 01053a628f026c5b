use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unknown class: {0}")]
    UnknownClass(String),
    #[error("invalid timestamp: {0}")]
    Timestamp(String),
    #[error("record error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Db(String),
}
