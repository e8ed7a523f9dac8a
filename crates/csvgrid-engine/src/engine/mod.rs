//! Formula engine API.
//!
//! This module provides the computation machinery for the sheet:
//!
//! - [`Cell`] - Tagged cell value (literal vs. formula)
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`tokenize`], [`shift_rows`], [`render`] - Formula token stream
//! - [`Parser`], [`evaluate`] - Recursive-descent arithmetic evaluation
//! - [`format_number`] - Format values for display
//!
//! The engine has no knowledge of the grid itself; callers substitute cell
//! references with literal values before handing an expression to
//! [`evaluate`].

mod cell;
mod cell_ref;
mod eval;
mod format;
mod tokens;

pub use cell::Cell;
pub use cell_ref::{CellRef, letters_to_col};
pub use eval::{Parser, evaluate};
pub use format::format_number;
pub use tokens::{FormulaToken, render, shift_rows, tokenize};
