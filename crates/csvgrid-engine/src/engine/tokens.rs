//! Formula tokenization and reference transformation.
//!
//! A formula body is scanned once into a stream of [`FormulaToken`]s: cell
//! references (`A1`, `AA12`) become structured [`CellRef`]s, everything else
//! is passed through as text. The same stream feeds both the fill-down
//! row-shift step and the literal-substitution step, so references are never
//! re-scanned with a second pattern.
//!
//! Tokenization is longest-match first: `AA12` is a single reference to
//! column AA, never `A` followed by `A12`.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::{CellRef, letters_to_col};

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z]+)([0-9]+)").unwrap())
}

/// One piece of a formula body.
#[derive(Clone, Debug, PartialEq)]
pub enum FormulaToken {
    /// Verbatim text between references (operators, literals, whitespace).
    Text(String),
    /// A cell reference, resolved to zero-based coordinates.
    Reference(CellRef),
}

/// Scan a formula body into tokens.
///
/// Letter-digit runs whose column part overflows are kept as text rather
/// than silently truncated.
pub fn tokenize(body: &str) -> Vec<FormulaToken> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for caps in reference_re().captures_iter(body) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last_end {
            tokens.push(FormulaToken::Text(body[last_end..whole.start()].to_string()));
        }

        match parse_reference(&caps[1], &caps[2]) {
            Some(cell_ref) => tokens.push(FormulaToken::Reference(cell_ref)),
            None => tokens.push(FormulaToken::Text(whole.as_str().to_string())),
        }
        last_end = whole.end();
    }

    if last_end < body.len() {
        tokens.push(FormulaToken::Text(body[last_end..].to_string()));
    }
    tokens
}

fn parse_reference(letters: &str, digits: &str) -> Option<CellRef> {
    let col = letters_to_col(letters)?;
    // Row numbers below 1 clamp to row 1.
    let row = digits.parse::<usize>().ok()?.saturating_sub(1);
    Some(CellRef::new(col, row))
}

/// Shift every reference's row by `delta`, leaving columns untouched.
/// Rows clamp at row 1, mirroring drag-fill near the top of a sheet.
pub fn shift_rows(tokens: &[FormulaToken], delta: isize) -> Vec<FormulaToken> {
    tokens
        .iter()
        .map(|token| match token {
            FormulaToken::Reference(cell_ref) => {
                FormulaToken::Reference(cell_ref.with_row_offset(delta))
            }
            FormulaToken::Text(text) => FormulaToken::Text(text.clone()),
        })
        .collect()
}

/// Render a token stream back into formula text.
pub fn render(tokens: &[FormulaToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            FormulaToken::Text(text) => out.push_str(text),
            FormulaToken::Reference(cell_ref) => out.push_str(&cell_ref.to_string()),
        }
    }
    out
}
