use csvgrid_engine::engine::{Cell, CellRef};

/// One sheet row. Rows are owned exclusively by the [`Sheet`] and are kept
/// exactly `column_count` cells wide after every mutation.
pub type Row = Vec<Cell>;

/// UI-agnostic sheet state.
///
/// The grid is rectangular at rest: every row's length equals
/// `column_count` after any operation returns. Reads are total — any
/// out-of-range position is an empty cell, never an error.
pub struct Sheet {
    /// Live rows, in display order. Reordered only by filtering.
    pub(crate) rows: Vec<Row>,
    /// Authoritative grid width.
    pub(crate) column_count: usize,
    /// Rows ever appended through the bulk-load path. Never decremented;
    /// drives the visible/total indicator while a filter is active.
    pub(crate) total_original_rows: usize,
    /// Pre-filter row set, captured lazily on the first filter and
    /// discarded when the filter is cleared.
    pub(crate) snapshot: Option<Vec<Row>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Sheet {
        Sheet {
            rows: Vec::new(),
            column_count: 0,
            total_original_rows: 0,
            snapshot: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Rows ever bulk-loaded, regardless of active filters.
    pub fn total_original_rows(&self) -> usize {
        self.total_original_rows
    }

    /// True while a filter is narrowing the live row set.
    pub fn is_filtered(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The live rows, for serialization.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Spreadsheet-style column name (0 -> A, 25 -> Z, 26 -> AA).
    pub fn column_name(index: usize) -> String {
        CellRef::col_to_letters(index)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
