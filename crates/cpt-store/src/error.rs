use thiserror::Error;

/// Repository invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The id is already mirrored
    #[error("a record with id `{0}` already exists")]
    DuplicateId(String),
    /// The id is not mirrored
    #[error("no record with id `{0}`")]
    NotFound(String),
}
