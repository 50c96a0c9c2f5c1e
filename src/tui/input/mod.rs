mod edit;
mod mouse;
mod move_mode;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Focus, Mode};

use edit::handle_edit;
use move_mode::handle_move;
use navigate::handle_navigate;

pub use mouse::handle_mouse;

/// Handle a key event for the focused widget
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.message = None;

    match (app.focus, app.mode) {
        (Focus::Comment, _) => handle_edit(app, key),
        (Focus::Board, Mode::Move) => handle_move(app, key),
        (Focus::Board, Mode::Navigate) => handle_navigate(app, key),
    }
}

/// Handle a bracketed paste. Only the comment field takes text.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.focus != Focus::Comment || text.is_empty() {
        return;
    }
    app.comment.insert_str(text);
    app.comment_changed();
}
