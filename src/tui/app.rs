//! Application state and logic.
//!
//! The main [`App`] struct holds the sheet, cursor and viewport position,
//! editing buffers, and UI state. The app operates in different [`Mode`]s
//! (Normal, Edit, Filter) similar to Vim's modal editing.

use std::collections::HashMap;
use std::path::PathBuf;

use csvgrid_core::{Sheet, storage};

use crate::error::Result;

/// Modal editing state for the application.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, execute single-key commands.
    Normal,
    /// Edit the contents of the current cell.
    Edit,
    /// Enter a filter condition for the cursor column.
    Filter,
}

/// Which mark operation is waiting for its letter key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MarkPending {
    Set,
    Jump,
}

/// Main application state container.
pub struct App {
    /// The sheet being edited
    pub sheet: Sheet,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since the last save
    pub modified: bool,
    /// Current cursor position (row)
    pub cursor_row: usize,
    /// Current cursor position (column)
    pub cursor_col: usize,
    /// Viewport offset (row)
    pub viewport_row: usize,
    /// Viewport offset (column)
    pub viewport_col: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Column width for display
    pub col_width: usize,
    /// Current mode
    pub mode: Mode,
    /// Shared text buffer for Edit and Filter modes
    pub input_buffer: String,
    /// Cursor position within the input buffer (byte offset)
    pub input_cursor: usize,
    /// Status message to display
    pub status_message: String,
    /// Vim-style position marks
    pub marks: HashMap<char, (usize, usize)>,
    /// A `g` is waiting for a second `g`
    pub pending_g: bool,
    /// A mark command is waiting for its letter
    pub pending_mark: Option<MarkPending>,
}

impl App {
    /// Create a new application with an empty sheet.
    pub fn new() -> Self {
        App {
            sheet: Sheet::new(),
            file_path: None,
            modified: false,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            viewport_col: 0,
            visible_rows: 20,
            visible_cols: 10,
            col_width: 12,
            mode: Mode::Normal,
            input_buffer: String::new(),
            input_cursor: 0,
            status_message: String::new(),
            marks: HashMap::new(),
            pending_g: false,
            pending_mark: None,
        }
    }

    /// Create the app and load the file if it exists. A missing file leaves
    /// the sheet empty and remembers the path for the first save.
    pub fn with_file(path: Option<PathBuf>) -> Result<Self> {
        let mut app = Self::new();
        if let Some(p) = path {
            if p.exists() {
                app.sheet = storage::load_csv(&p)?;
            }
            app.file_path = Some(p);
        }
        Ok(app)
    }

    fn last_row(&self) -> usize {
        self.sheet.row_count().max(1) - 1
    }

    fn last_col(&self) -> usize {
        self.sheet.column_count().max(1) - 1
    }

    /// Move the cursor by a relative offset, clamped to the sheet extents.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let col = self.cursor_col as isize + dx;
        let row = self.cursor_row as isize + dy;
        self.cursor_col = col.clamp(0, self.last_col() as isize) as usize;
        self.cursor_row = row.clamp(0, self.last_row() as isize) as usize;
        self.update_viewport();
    }

    /// Scroll the viewport so the cursor stays visible.
    pub fn update_viewport(&mut self) {
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        }
        if self.cursor_row >= self.viewport_row + self.visible_rows {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows;
        }
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        }
        if self.cursor_col >= self.viewport_col + self.visible_cols {
            self.viewport_col = self.cursor_col + 1 - self.visible_cols;
        }
    }

    pub fn goto_first_row(&mut self) {
        self.cursor_row = 0;
        self.update_viewport();
    }

    pub fn goto_last_row(&mut self) {
        self.cursor_row = self.last_row();
        self.update_viewport();
    }

    pub fn home_col(&mut self) {
        self.cursor_col = 0;
        self.update_viewport();
    }

    pub fn end_col(&mut self) {
        self.cursor_col = self.last_col();
        self.update_viewport();
    }

    pub fn half_page(&mut self, dir: isize) {
        let delta = (self.visible_rows as isize / 2).max(1);
        self.move_cursor(0, delta * dir);
    }

    /// Start editing the current cell with its raw text in the buffer.
    pub fn enter_edit_mode(&mut self) {
        self.mode = Mode::Edit;
        self.input_buffer = self
            .sheet
            .get_cell(self.cursor_row, self.cursor_col)
            .to_raw_string();
        self.input_cursor = self.input_buffer.len();
        self.status_message.clear();
    }

    /// Store the edit buffer into the current cell. A formula entry fills
    /// its whole column.
    pub fn commit_edit(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        self.sheet.set_cell(self.cursor_row, self.cursor_col, &value);
        self.modified = true;
        self.input_cursor = 0;
        self.mode = Mode::Normal;
    }

    pub fn enter_filter_mode(&mut self) {
        self.mode = Mode::Filter;
        self.input_buffer.clear();
        self.input_cursor = 0;
        self.status_message.clear();
    }

    /// Apply the filter buffer to the cursor column. An invalid condition
    /// leaves the sheet untouched and reports on the status line.
    pub fn commit_filter(&mut self) {
        let condition = std::mem::take(&mut self.input_buffer);
        self.input_cursor = 0;
        self.mode = Mode::Normal;

        match self.sheet.filter_by_column(self.cursor_col, &condition) {
            Ok(()) => {
                self.cursor_row = 0;
                self.viewport_row = 0;
                self.status_message =
                    format!("Filter applied: {} rows visible", self.sheet.row_count());
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    pub fn clear_filter(&mut self) {
        if self.sheet.is_filtered() {
            self.sheet.clear_filter();
            self.cursor_row = 0;
            self.viewport_row = 0;
            self.status_message = "Filter cleared".to_string();
        }
    }

    /// Cancel Edit/Filter mode without touching the sheet.
    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.input_buffer.clear();
        self.input_cursor = 0;
    }

    pub fn save(&mut self) {
        let Some(path) = self.file_path.clone() else {
            self.status_message = "Error: no file path".to_string();
            return;
        };
        match storage::save_csv(&path, &self.sheet) {
            Ok(()) => {
                self.modified = false;
                self.status_message = format!("Saved {}", path.display());
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Insert an empty column before the cursor.
    pub fn insert_column(&mut self) {
        self.sheet.add_column_at(self.cursor_col);
        self.modified = true;
        self.status_message = "Column inserted".to_string();
    }

    /// Append an empty column at the right edge and move to it.
    pub fn append_column(&mut self) {
        self.sheet.add_column();
        self.cursor_col = self.last_col();
        self.modified = true;
        self.update_viewport();
        self.status_message = "Column added".to_string();
    }

    /// Duplicate the cursor column and move onto the copy.
    pub fn duplicate_column(&mut self) {
        if self.sheet.column_count() == 0 {
            return;
        }
        self.sheet.duplicate_column_at(self.cursor_col);
        self.cursor_col += 1;
        self.modified = true;
        self.update_viewport();
    }

    /// Delete the cursor column, keeping the cursor in range.
    pub fn delete_column(&mut self) {
        self.sheet.remove_column_at(self.cursor_col);
        self.cursor_col = self.cursor_col.min(self.last_col());
        self.modified = true;
        self.update_viewport();
    }

    pub fn set_mark(&mut self, label: char) {
        if label.is_alphabetic() {
            self.marks
                .insert(label, (self.cursor_row, self.cursor_col));
            self.status_message = format!("Mark '{}' set", label);
        }
    }

    pub fn jump_to_mark(&mut self, label: char) {
        match self.marks.get(&label) {
            Some(&(row, col)) => {
                self.cursor_row = row.min(self.last_row());
                self.cursor_col = col.min(self.last_col());
                self.update_viewport();
                self.status_message.clear();
            }
            None => {
                self.status_message = format!("No mark '{}'", label);
            }
        }
    }

    /// Mark label at a grid position, if any.
    pub fn mark_at(&self, row: usize, col: usize) -> Option<char> {
        self.marks
            .iter()
            .find(|&(_, &pos)| pos == (row, col))
            .map(|(&label, _)| label)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
