use cpt_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Required field missing or malformed; never reaches the store
    #[error("Validation error: {0}")]
    Validation(String),
    /// The targeted id is not in the session
    #[error("Not found: {0}")]
    NotFound(String),
    /// The store handed out an id the session already holds
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Store responded with status {status}: {message}")]
    Status { status: u16, message: String },
    /// An import file whose top level is not a list of records
    #[error("Import format error: {0}")]
    ImportFormat(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether retrying the same action may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => Self::DuplicateId(id),
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(crate::validation::describe(&errors))
    }
}
