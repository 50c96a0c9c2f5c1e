use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Keys while a card is being moved with the keyboard. The hovered column
/// is the drop target.
pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => step_target(app, -1),
        KeyCode::Right | KeyCode::Char('l') => step_target(app, 1),
        KeyCode::Enter | KeyCode::Char('m') => {
            let target = app.hover.clone();
            app.drop_on(target.as_deref());
            app.end_drag();
        }
        KeyCode::Esc => app.end_drag(),
        _ => {}
    }
}

fn step_target(app: &mut App, delta: isize) {
    let current = app
        .hover
        .as_deref()
        .and_then(|s| app.board.column_index(s))
        .unwrap_or(app.cursor_col);
    let last = app.board.column_count().saturating_sub(1);
    let next = current.saturating_add_signed(delta).min(last);
    let status = app.board.column_at(next).map(|c| c.status.clone());
    app.drag_over(status.as_deref());
}
