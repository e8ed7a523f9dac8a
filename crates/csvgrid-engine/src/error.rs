//! Error types for the csvgrid formula engine.

use thiserror::Error;

/// Errors raised while parsing or evaluating a formula expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
}

pub type Result<T> = std::result::Result<T, FormulaError>;
