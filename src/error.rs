//! Error type shared by the table, its backing array and the shared wrapper.

use thiserror::Error;

/// Recoverable failures reported by table and array operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table full: no empty or tombstone slot among {capacity} slots")]
    TableFull { capacity: usize },
    #[error("key {key:?} not found")]
    KeyNotFound { key: String },
    #[error("index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: isize, capacity: usize },
    #[error("keys must be non-empty")]
    EmptyKey,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TableError {
    pub(crate) fn not_found(key: &str) -> Self {
        TableError::KeyNotFound {
            key: key.to_owned(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
