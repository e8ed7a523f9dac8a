//! UI rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell as TableCell, Paragraph, Row as TableRow, Table},
};

use csvgrid_core::Sheet;
use csvgrid_engine::engine::CellRef;

use super::app::{App, Mode};

pub(crate) const CELL_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 5;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Draw the application UI.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let grid_area = chunks[1];
    let available_width = grid_area.width.saturating_sub(ROW_HEADER_WIDTH + 2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders

    app.visible_cols = (available_width / (app.col_width + 1)).max(1);
    app.visible_rows = available_height.max(1);
    app.update_viewport();

    draw_cell_bar(f, app, chunks[0]);
    draw_grid(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);
}

fn draw_cell_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_name = CellRef::new(app.cursor_col, app.cursor_row).to_string();

    let content = match app.mode {
        Mode::Edit => {
            // Insert cursor marker at cursor position
            let (before, after) = app.input_buffer.split_at(app.input_cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Filter => {
            let (before, after) = app.input_buffer.split_at(app.input_cursor);
            format!(
                "filter {} (e.g. >30, ==Peru): {}│{}",
                Sheet::column_name(app.cursor_col),
                before,
                after
            )
        }
        Mode::Normal => {
            let raw = app
                .sheet
                .get_cell(app.cursor_row, app.cursor_col)
                .to_raw_string();
            if raw.is_empty() {
                format!("{}: (empty)", cell_name)
            } else {
                format!("{}: {}", cell_name, raw)
            }
        }
    };

    let title = match app.mode {
        Mode::Edit => " Edit ",
        Mode::Filter => " Filter ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Filter => Color::Cyan,
            Mode::Normal => Color::White,
        }));

    let paragraph = Paragraph::new(content).block(block);
    f.render_widget(paragraph, area);
}

fn draw_grid(f: &mut Frame, app: &mut App, area: Rect) {
    let max_rows = app.sheet.row_count();
    let max_cols = app.sheet.column_count();

    // Build header row
    let mut header_cells = vec![TableCell::from(" ")]; // Corner
    for col in app.viewport_col..app.viewport_col + app.visible_cols {
        if col >= max_cols {
            break;
        }
        let col_name = Sheet::column_name(col);
        let style = if col == app.cursor_col {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header_cells.push(TableCell::from(col_name).style(style));
    }
    let header = TableRow::new(header_cells).height(1);

    // Columns with no content at all render dimmed.
    let empty_cols: Vec<bool> = (0..max_cols).map(|c| app.sheet.is_column_empty(c)).collect();

    // Build data rows
    let mut rows = Vec::new();
    for row in app.viewport_row..app.viewport_row + app.visible_rows {
        if row >= max_rows {
            break;
        }

        let mut cells = Vec::new();

        // Row header
        let row_style = if row == app.cursor_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        cells.push(TableCell::from(format!("{}", row + 1)).style(row_style));

        // Data cells
        for col in app.viewport_col..app.viewport_col + app.visible_cols {
            if col >= max_cols {
                break;
            }

            let display = app.sheet.evaluate_cell(row, col);

            let is_cursor = row == app.cursor_row && col == app.cursor_col;
            let style = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if app.mark_at(row, col).is_some() {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if display.starts_with('#') {
                Style::default().fg(Color::Red)
            } else if empty_cols.get(col).copied().unwrap_or(false) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            cells.push(TableCell::from(display).style(style));
        }

        rows.push(TableRow::new(cells));
    }

    // Column widths: row header plus fixed-width data columns
    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    for col in app.viewport_col..app.viewport_col + app.visible_cols {
        if col >= max_cols {
            break;
        }
        widths.push(Constraint::Length(app.col_width as u16));
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Csvgrid "))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    if !app.status_message.is_empty() {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(&app.status_message, style)));
        f.render_widget(paragraph, area);
        return;
    }

    let file_info = if let Some(ref path) = app.file_path {
        let modified_indicator = if app.modified { " [+]" } else { "" };
        format!("{}{}", path.display(), modified_indicator)
    } else if app.modified {
        "[No File] [+]".to_string()
    } else {
        "[No File]".to_string()
    };

    // Visible/total row ratio, highlighted while a filter narrows the view.
    let ratio = format!(
        "rows {}/{}",
        app.sheet.row_count(),
        app.sheet.total_original_rows()
    );
    let ratio_style = if app.sheet.is_filtered() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let help = "h/j/k/l move | e edit | f filter | r restore | c/C/y/d columns | s save | q quit";

    let spans = vec![
        Span::styled(file_info, Style::default().fg(Color::DarkGray)),
        Span::raw("  |  "),
        Span::styled(ratio, ratio_style),
        Span::raw("  |  "),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(Line::from(spans));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_main_chunks_heights() {
        let [cell_bar, grid, status] = split_main_chunks(Rect::new(0, 0, 80, 24));
        assert_eq!(cell_bar.height, CELL_BAR_HEIGHT);
        assert_eq!(status.height, STATUS_BAR_HEIGHT);
        assert_eq!(
            grid.height,
            24 - CELL_BAR_HEIGHT - STATUS_BAR_HEIGHT
        );
    }
}
