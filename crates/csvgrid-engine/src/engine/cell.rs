//! Cell data for the sheet grid.
//!
//! A cell is the raw text stored at one grid position, classified once at
//! write time: values beginning with `=` are formulas, everything else is a
//! literal. [`Cell::Formula`] holds the expression body with the `=` sigil
//! stripped.

use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Plain text, shown as-is.
    Literal(String),
    /// An arithmetic expression (stored without the leading `=`).
    Formula(String),
}

impl Cell {
    pub fn empty() -> Cell {
        Cell::Literal(String::new())
    }

    /// Classify raw input. A leading `=` marks a formula; the sigil is not
    /// part of the stored body.
    pub fn from_raw(raw: &str) -> Cell {
        match raw.strip_prefix('=') {
            Some(body) => Cell::Formula(body.to_string()),
            None => Cell::Literal(raw.to_string()),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Cell::Formula(_))
    }

    /// True if the cell contains nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Literal(s) => s.trim().is_empty(),
            Cell::Formula(_) => false,
        }
    }

    /// The formula body, if this cell is a formula.
    pub fn formula_body(&self) -> Option<&str> {
        match self {
            Cell::Formula(body) => Some(body),
            Cell::Literal(_) => None,
        }
    }

    /// Reconstruct the raw text as it was typed or stored (formulas regain
    /// their `=` prefix). This is what editing and persistence see.
    pub fn to_raw_string(&self) -> String {
        match self {
            Cell::Literal(s) => s.clone(),
            Cell::Formula(body) => format!("={}", body),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::empty()
    }
}
