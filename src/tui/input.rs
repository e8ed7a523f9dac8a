//! Event loop and key dispatch.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::io;

use super::app::{App, MarkPending, Mode};
use super::ui;

/// Result of applying a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ApplyResult {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (Windows reports Press + Release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match app.mode {
                Mode::Normal => {
                    if handle_normal_key(app, key) == ApplyResult::Quit {
                        return Ok(());
                    }
                }
                Mode::Edit | Mode::Filter => handle_input_key(app, key),
            }
        }
    }
}

fn handle_normal_key(app: &mut App, key: event::KeyEvent) -> ApplyResult {
    // A pending mark command consumes the next letter.
    if let Some(pending) = app.pending_mark.take() {
        if let KeyCode::Char(c) = key.code {
            match pending {
                MarkPending::Set => app.set_mark(c),
                MarkPending::Jump => app.jump_to_mark(c),
            }
        }
        return ApplyResult::Continue;
    }

    if app.pending_g {
        app.pending_g = false;
        if key.code == KeyCode::Char('g') {
            app.goto_first_row();
            return ApplyResult::Continue;
        }
    }

    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.half_page(-1);
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.half_page(1);
        }

        KeyCode::Char('h') | KeyCode::Left => app.move_cursor(-1, 0),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor(1, 0),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(0, -1),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(0, 1),

        KeyCode::Char('0') | KeyCode::Home => app.home_col(),
        KeyCode::Char('$') | KeyCode::End => app.end_col(),
        KeyCode::Char('G') => app.goto_last_row(),
        KeyCode::Char('g') => app.pending_g = true,
        KeyCode::PageUp => app.half_page(-2),
        KeyCode::PageDown => app.half_page(2),

        KeyCode::Char('e') | KeyCode::Enter => app.enter_edit_mode(),

        KeyCode::Char('c') => app.insert_column(),
        KeyCode::Char('C') => app.append_column(),
        KeyCode::Char('y') => app.duplicate_column(),
        KeyCode::Char('d') => app.delete_column(),

        KeyCode::Char('f') => app.enter_filter_mode(),
        KeyCode::Char('r') => app.clear_filter(),

        KeyCode::Char('m') => app.pending_mark = Some(MarkPending::Set),
        KeyCode::Char('\'') => app.pending_mark = Some(MarkPending::Jump),

        KeyCode::Char('s') => app.save(),
        KeyCode::Char('q') => return ApplyResult::Quit,

        _ => {}
    }
    ApplyResult::Continue
}

fn handle_input_key(app: &mut App, key: event::KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => match app.mode {
            Mode::Edit => app.commit_edit(),
            Mode::Filter => app.commit_filter(),
            Mode::Normal => {}
        },
        _ => handle_text_input(&mut app.input_buffer, &mut app.input_cursor, key),
    }
}

/// Text editing on a buffer with UTF-8 aware cursor movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = buffer.len();
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with_rows(rows: &[&[&str]]) -> App {
        let mut app = App::new();
        for row in rows {
            app.sheet
                .append_row(row.iter().map(|s| s.to_string()).collect());
        }
        app
    }

    #[test]
    fn test_vim_motion_keys() {
        let mut app = app_with_rows(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        handle_normal_key(&mut app, press(KeyCode::Char('j')));
        handle_normal_key(&mut app, press(KeyCode::Char('l')));
        assert_eq!((app.cursor_col, app.cursor_row), (1, 1));

        handle_normal_key(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.cursor_row, 2);

        handle_normal_key(&mut app, press(KeyCode::Char('g')));
        handle_normal_key(&mut app, press(KeyCode::Char('g')));
        assert_eq!(app.cursor_row, 0);
    }

    #[test]
    fn test_gg_requires_two_presses() {
        let mut app = app_with_rows(&[&["a"], &["b"]]);
        app.cursor_row = 1;
        handle_normal_key(&mut app, press(KeyCode::Char('g')));
        assert_eq!(app.cursor_row, 1);
        // A different key cancels the pending g.
        handle_normal_key(&mut app, press(KeyCode::Char('j')));
        assert!(!app.pending_g);
    }

    #[test]
    fn test_half_page_scroll() {
        let mut app = app_with_rows(&[&["x"] as &[&str]; 40]);
        app.visible_rows = 10;
        handle_normal_key(&mut app, ctrl('d'));
        assert_eq!(app.cursor_row, 5);
        handle_normal_key(&mut app, ctrl('u'));
        assert_eq!(app.cursor_row, 0);
    }

    #[test]
    fn test_edit_mode_keys() {
        let mut app = app_with_rows(&[&["abc"]]);
        handle_normal_key(&mut app, press(KeyCode::Enter));
        assert!(app.mode == Mode::Edit);

        handle_input_key(&mut app, press(KeyCode::Backspace));
        handle_input_key(&mut app, press(KeyCode::Char('z')));
        handle_input_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.sheet.get_cell(0, 0).to_raw_string(), "abz");
    }

    #[test]
    fn test_escape_cancels_edit_without_mutation() {
        let mut app = app_with_rows(&[&["keep"]]);
        handle_normal_key(&mut app, press(KeyCode::Char('e')));
        handle_input_key(&mut app, press(KeyCode::Char('x')));
        handle_input_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.sheet.get_cell(0, 0).to_raw_string(), "keep");
        assert!(app.mode == Mode::Normal);
    }

    #[test]
    fn test_mark_keys_round_trip() {
        let mut app = app_with_rows(&[&["a", "b"], &["c", "d"]]);
        app.cursor_row = 1;
        handle_normal_key(&mut app, press(KeyCode::Char('m')));
        handle_normal_key(&mut app, press(KeyCode::Char('a')));

        handle_normal_key(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.cursor_row, 0);

        handle_normal_key(&mut app, press(KeyCode::Char('\'')));
        handle_normal_key(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.cursor_row, 1);
    }

    #[test]
    fn test_column_keys() {
        let mut app = app_with_rows(&[&["a", "b"]]);
        handle_normal_key(&mut app, press(KeyCode::Char('y')));
        assert_eq!(app.sheet.column_count(), 3);
        assert_eq!(app.cursor_col, 1);

        handle_normal_key(&mut app, press(KeyCode::Char('d')));
        assert_eq!(app.sheet.column_count(), 2);

        handle_normal_key(&mut app, press(KeyCode::Char('C')));
        assert_eq!(app.sheet.column_count(), 3);
        assert_eq!(app.cursor_col, 2);
    }

    #[test]
    fn test_quit_key() {
        let mut app = app_with_rows(&[&["a"]]);
        assert_eq!(
            handle_normal_key(&mut app, press(KeyCode::Char('q'))),
            ApplyResult::Quit
        );
    }

    #[test]
    fn test_text_input_utf8_cursor() {
        let mut buffer = String::new();
        let mut cursor = 0;
        for c in ['ü', 'b'] {
            handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Char(c)));
        }
        assert_eq!(buffer, "üb");

        handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Left));
        handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Backspace));
        assert_eq!(buffer, "b");
    }
}
