//! Error types for the csvgrid application.

use thiserror::Error;

use csvgrid_core::SheetError;

/// Errors that can occur in the csvgrid application.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub type Result<T> = std::result::Result<T, AppError>;
