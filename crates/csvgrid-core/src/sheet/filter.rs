//! Column filtering with a restorable pre-filter snapshot.

use regex::Regex;
use std::sync::OnceLock;

use csvgrid_engine::engine::Cell;

use crate::error::{Result, SheetError};

use super::state::Sheet;

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap())
}

/// Comparison operator at the front of a filter condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterOp {
    Ge,
    Le,
    Eq,
    Ne,
    Gt,
    Lt,
}

impl FilterOp {
    fn is_ordering(self) -> bool {
        matches!(self, FilterOp::Ge | FilterOp::Le | FilterOp::Gt | FilterOp::Lt)
    }
}

/// A parsed filter condition: an operator and a comparison value.
///
/// When the value is numeric the comparison is numeric on each cell's parsed
/// value; otherwise only (case-insensitive) string equality and inequality
/// are allowed.
#[derive(Clone, Debug)]
pub struct Condition {
    op: FilterOp,
    value: String,
    numeric: Option<f64>,
}

impl Condition {
    /// Parse a condition like `>10`, `<=3.5`, `==Peru`, `!=x`. Operators
    /// match longest first so `>=` never reads as `>` followed by `=`.
    pub fn parse(condition: &str) -> Result<Condition> {
        let invalid = || SheetError::InvalidFilterCondition {
            condition: condition.to_string(),
        };

        let (op, rest) = if let Some(rest) = condition.strip_prefix(">=") {
            (FilterOp::Ge, rest)
        } else if let Some(rest) = condition.strip_prefix("<=") {
            (FilterOp::Le, rest)
        } else if let Some(rest) = condition.strip_prefix("==") {
            (FilterOp::Eq, rest)
        } else if let Some(rest) = condition.strip_prefix("!=") {
            (FilterOp::Ne, rest)
        } else if let Some(rest) = condition.strip_prefix('>') {
            (FilterOp::Gt, rest)
        } else if let Some(rest) = condition.strip_prefix('<') {
            (FilterOp::Lt, rest)
        } else {
            return Err(invalid());
        };

        let value = rest.trim().to_string();
        let numeric = numeric_re()
            .is_match(&value)
            .then(|| value.parse::<f64>())
            .transpose()
            .map_err(|_| invalid())?;

        // Ordering comparisons require a numeric value.
        if numeric.is_none() && op.is_ordering() {
            return Err(invalid());
        }

        Ok(Condition { op, value, numeric })
    }

    /// Does a cell match? Non-numeric cells never match a numeric condition.
    fn matches(&self, cell: Option<&Cell>) -> bool {
        let Some(cell) = cell else {
            return false;
        };
        let text = cell.to_raw_string();

        if let Some(wanted) = self.numeric {
            let Ok(actual) = text.trim().parse::<f64>() else {
                return false;
            };
            match self.op {
                FilterOp::Gt => actual > wanted,
                FilterOp::Lt => actual < wanted,
                FilterOp::Ge => actual >= wanted,
                FilterOp::Le => actual <= wanted,
                FilterOp::Eq => actual == wanted,
                FilterOp::Ne => actual != wanted,
            }
        } else {
            match self.op {
                FilterOp::Eq => text.eq_ignore_ascii_case(&self.value),
                FilterOp::Ne => !text.eq_ignore_ascii_case(&self.value),
                // Rejected at parse time.
                _ => false,
            }
        }
    }
}

impl Sheet {
    /// Keep only the rows whose cell in `col` matches `condition`.
    ///
    /// The first filter since load (or since [`Sheet::clear_filter`])
    /// snapshots the full row set; further filters narrow the already
    /// filtered rows cumulatively. An invalid condition leaves the sheet
    /// untouched.
    pub fn filter_by_column(&mut self, col: usize, condition: &str) -> Result<()> {
        let condition = Condition::parse(condition)?;

        if self.snapshot.is_none() {
            self.snapshot = Some(self.rows.clone());
        }
        self.rows.retain(|row| condition.matches(row.get(col)));
        Ok(())
    }

    /// Restore the pre-filter row set. A no-op when no filter is active.
    pub fn clear_filter(&mut self) {
        if let Some(saved) = self.snapshot.take() {
            self.rows = saved;
        }
    }
}
