//! Shared error types for the sales pipeline board

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Unknown sort option: {input}")]
    UnknownSortOption { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
