//! Formula evaluation against the grid: reference resolution and fill-down.

use std::collections::HashSet;

use csvgrid_engine::engine::{
    Cell, CellRef, FormulaToken, evaluate, format_number, shift_rows, tokenize,
};
use csvgrid_engine::error::Result as FormulaResult;

use super::state::Sheet;

/// Display sentinel for any formula that fails to evaluate.
pub const ERROR_SENTINEL: &str = "#ERR";

impl Sheet {
    /// The display string for `(row, col)`: the raw value for literals, the
    /// evaluated result for formulas, or `#ERR` when evaluation fails.
    pub fn evaluate_cell(&self, row: usize, col: usize) -> String {
        match self.get_cell(row, col) {
            Cell::Literal(text) => text.clone(),
            Cell::Formula(body) => {
                let tokens = tokenize(body);
                let mut visited = HashSet::from([CellRef::new(col, row)]);
                match self.eval_tokens(&tokens, &mut visited) {
                    Ok(value) => format_number(value),
                    Err(_) => ERROR_SENTINEL.to_string(),
                }
            }
        }
    }

    /// Substitute every reference token with a literal value and evaluate
    /// the resulting expression.
    pub(crate) fn eval_tokens(
        &self,
        tokens: &[FormulaToken],
        visited: &mut HashSet<CellRef>,
    ) -> FormulaResult<f64> {
        let mut expr = String::new();
        for token in tokens {
            match token {
                FormulaToken::Text(text) => expr.push_str(text),
                FormulaToken::Reference(cell_ref) => {
                    let value = self.resolve_reference(*cell_ref, visited)?;
                    expr.push_str(&format_number(value));
                }
            }
        }
        evaluate(&expr)
    }

    /// Resolve one reference to a numeric value.
    ///
    /// Out-of-bounds, blank, and non-numeric cells resolve to 0, as does any
    /// reference back into a cell currently being evaluated (the cycle
    /// guard, covering direct self-references and transitive cycles alike).
    /// A referenced formula is evaluated recursively; its failure propagates
    /// to the referring cell.
    fn resolve_reference(
        &self,
        cell_ref: CellRef,
        visited: &mut HashSet<CellRef>,
    ) -> FormulaResult<f64> {
        if cell_ref.row >= self.row_count() || cell_ref.col >= self.column_count() {
            return Ok(0.0);
        }
        if visited.contains(&cell_ref) {
            return Ok(0.0);
        }

        match self.get_cell(cell_ref.row, cell_ref.col) {
            Cell::Literal(text) => Ok(text.trim().parse::<f64>().unwrap_or(0.0)),
            Cell::Formula(body) => {
                visited.insert(cell_ref);
                let tokens = tokenize(body);
                let value = self.eval_tokens(&tokens, visited);
                visited.remove(&cell_ref);
                value
            }
        }
    }

    /// Fill `col` with row-shifted copies of `raw_formula` (as entered at
    /// `source_row`), writing each row's evaluated result as a literal.
    ///
    /// A failing row gets `#ERR` in that cell only; the fill continues for
    /// its siblings.
    pub fn fill_column_with_formula(&mut self, col: usize, source_row: usize, raw_formula: &str) {
        if col >= self.column_count() {
            return;
        }
        let Some(body) = raw_formula.strip_prefix('=') else {
            return;
        };
        let tokens = tokenize(body);

        for target_row in 0..self.rows.len() {
            let delta = target_row as isize - source_row as isize;
            let shifted = shift_rows(&tokens, delta);
            let mut visited = HashSet::from([CellRef::new(col, target_row)]);
            let text = match self.eval_tokens(&shifted, &mut visited) {
                Ok(value) => format_number(value),
                Err(_) => ERROR_SENTINEL.to_string(),
            };
            self.rows[target_row][col] = Cell::Literal(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::Sheet;

    fn sheet_from(rows: &[&[&str]]) -> Sheet {
        let mut sheet = Sheet::new();
        for row in rows {
            sheet.append_row(row.iter().map(|s| s.to_string()).collect());
        }
        sheet
    }

    #[test]
    fn test_literal_cells_display_raw_text() {
        let sheet = sheet_from(&[&["hello", "42"]]);
        assert_eq!(sheet.evaluate_cell(0, 0), "hello");
        assert_eq!(sheet.evaluate_cell(0, 1), "42");
        assert_eq!(sheet.evaluate_cell(5, 5), "");
    }

    #[test]
    fn test_reference_resolution() {
        let mut sheet = sheet_from(&[&["10", "20", ""]]);
        sheet.set_cell(0, 2, "=A1+B1");
        assert_eq!(sheet.evaluate_cell(0, 2), "30");
    }

    #[test]
    fn test_blank_and_non_numeric_references_are_zero() {
        let mut sheet = sheet_from(&[&["", "abc", ""]]);
        sheet.set_cell(0, 2, "=A1+B1+5");
        assert_eq!(sheet.evaluate_cell(0, 2), "5");
    }

    #[test]
    fn test_out_of_bounds_reference_is_zero() {
        let mut sheet = sheet_from(&[&["1", ""]]);
        sheet.set_cell(0, 1, "=Z99+A1");
        assert_eq!(sheet.evaluate_cell(0, 1), "1");
    }

    #[test]
    fn test_nested_formula_reference() {
        // B holds a formula cell (loaded, not filled); referencing it
        // evaluates the formula rather than reading its text.
        let mut sheet = Sheet::new();
        sheet.append_row(vec!["2".to_string(), "=A1*10".to_string(), String::new()]);
        sheet.set_cell(0, 2, "=B1+1");
        assert_eq!(sheet.evaluate_cell(0, 2), "21");
    }

    #[test]
    fn test_fill_shifts_row_references() {
        let mut sheet = sheet_from(&[&["1", ""], &["2", ""], &["3", ""]]);
        sheet.set_cell(0, 1, "=A1+1");
        assert_eq!(sheet.evaluate_cell(0, 1), "2");
        assert_eq!(sheet.evaluate_cell(1, 1), "3");
        assert_eq!(sheet.evaluate_cell(2, 1), "4");
    }

    #[test]
    fn test_fill_from_middle_row_shifts_both_ways() {
        let mut sheet = sheet_from(&[&["10", ""], &["20", ""], &["30", ""]]);
        sheet.set_cell(1, 1, "=A2*2");
        assert_eq!(sheet.evaluate_cell(0, 1), "20");
        assert_eq!(sheet.evaluate_cell(1, 1), "40");
        assert_eq!(sheet.evaluate_cell(2, 1), "60");
    }

    #[test]
    fn test_fill_clamps_references_above_first_row() {
        let mut sheet = sheet_from(&[&["5", ""], &["7", ""]]);
        // At row 0 the shifted reference A0 clamps to A1.
        sheet.set_cell(1, 1, "=A1");
        assert_eq!(sheet.evaluate_cell(0, 1), "5");
        assert_eq!(sheet.evaluate_cell(1, 1), "5");
    }

    #[test]
    fn test_fill_materializes_literals() {
        let mut sheet = sheet_from(&[&["1", ""], &["2", ""]]);
        sheet.set_cell(0, 1, "=A1");
        assert!(!sheet.get_cell(0, 1).is_formula());
        assert_eq!(sheet.get_cell(1, 1).to_raw_string(), "2");
    }

    #[test]
    fn test_self_reference_resolves_to_zero() {
        let mut sheet = sheet_from(&[&["1", ""]]);
        sheet.set_cell(0, 1, "=B1+5");
        assert_eq!(sheet.evaluate_cell(0, 1), "5");
    }

    #[test]
    fn test_indirect_cycle_terminates_with_zero_base() {
        // A1 -> B1 -> A1: the back-reference into the in-flight cell
        // substitutes 0 instead of recursing forever.
        let mut sheet = Sheet::new();
        sheet.append_row(vec!["=B1+1".to_string(), "=A1+1".to_string()]);
        assert_eq!(sheet.evaluate_cell(0, 0), "2");
        assert_eq!(sheet.evaluate_cell(0, 1), "2");
    }

    #[test]
    fn test_bad_formula_shows_error_sentinel() {
        let mut sheet = Sheet::new();
        sheet.append_row(vec!["=2+".to_string()]);
        assert_eq!(sheet.evaluate_cell(0, 0), "#ERR");
    }

    #[test]
    fn test_fill_error_is_per_cell() {
        // Row 0's C cell holds a broken formula; only the row that
        // references it gets the sentinel, siblings fill normally.
        let mut sheet = Sheet::new();
        sheet.append_row(vec!["1".to_string(), String::new(), "=2+".to_string()]);
        sheet.append_row(vec!["2".to_string(), String::new(), "4".to_string()]);
        sheet.set_cell(0, 1, "=C1+A1");
        assert_eq!(sheet.evaluate_cell(0, 1), "#ERR");
        assert_eq!(sheet.evaluate_cell(1, 1), "6");
    }

    #[test]
    fn test_division_by_zero_in_fill() {
        let mut sheet = sheet_from(&[&["1", ""], &["x", ""], &["2", ""]]);
        // The middle row's "x" resolves to 0 and the division is IEEE
        // infinity; the rows around it fill normally.
        sheet.set_cell(0, 1, "=10/A1");
        assert_eq!(sheet.evaluate_cell(0, 1), "10");
        assert_eq!(sheet.evaluate_cell(1, 1), "inf");
        assert_eq!(sheet.evaluate_cell(2, 1), "5");
    }

    #[test]
    fn test_division_by_zero_displays_ieee_values() {
        let mut sheet = Sheet::new();
        sheet.append_row(vec!["=1/0".to_string(), "=0/0".to_string()]);
        assert_eq!(sheet.evaluate_cell(0, 0), "inf");
        assert_eq!(sheet.evaluate_cell(0, 1), "NaN");
    }

    #[test]
    fn test_whitespace_in_formula() {
        let mut sheet = sheet_from(&[&["10", "20", ""]]);
        sheet.set_cell(0, 2, "= A1 + B1 ");
        assert_eq!(sheet.evaluate_cell(0, 2), "30");
    }
}
