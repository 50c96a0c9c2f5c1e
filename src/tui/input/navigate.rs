use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }

        // Column and card movement
        (_, KeyCode::Left | KeyCode::Char('h')) => {
            app.cursor_col = app.cursor_col.saturating_sub(1);
            app.clamp_cursor();
        }
        (_, KeyCode::Right | KeyCode::Char('l')) => {
            app.cursor_col += 1;
            app.clamp_cursor();
        }
        (_, KeyCode::Up | KeyCode::Char('k')) => {
            app.cursor_card = app.cursor_card.saturating_sub(1);
        }
        (_, KeyCode::Down | KeyCode::Char('j')) => {
            app.cursor_card += 1;
            app.clamp_cursor();
        }
        (_, KeyCode::Char('g')) => app.cursor_card = 0,
        (_, KeyCode::Char('G')) => {
            app.cursor_card = usize::MAX;
            app.clamp_cursor();
        }

        // Open the detail panel
        (_, KeyCode::Enter | KeyCode::Char(' ')) => {
            if let Some(card) = app.selected_card().cloned() {
                app.click_card(&card);
            }
        }
        (_, KeyCode::Esc) => app.detail.close(),

        // Keyboard move: the same drag path, driven by keys
        (_, KeyCode::Char('m')) => {
            if let Some(card) = app.selected_card().cloned() {
                app.begin_drag(&card);
                app.mode = Mode::Move;
            }
        }

        (_, KeyCode::Tab | KeyCode::Char('c')) => app.focus_comment(),
        (_, KeyCode::Char('r')) => app.reload(),
        _ => {}
    }
}
