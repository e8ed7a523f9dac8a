//! Error types for the csvgrid core.

use thiserror::Error;

/// Errors that can occur in the sheet model.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid filter condition: {condition}")]
    InvalidFilterCondition { condition: String },
}

pub type Result<T> = std::result::Result<T, SheetError>;
