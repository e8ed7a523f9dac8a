//! csvgrid_engine - Formula parsing and evaluation.

pub mod engine;
pub mod error;

pub use error::{FormulaError, Result};
