use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, COMMENT_FIELD};

/// Keys while the comment field has focus
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let showing = app
        .mention
        .session(COMMENT_FIELD)
        .is_some_and(|s| s.is_showing());

    // Dropdown navigation takes precedence over editing
    if showing {
        match key.code {
            KeyCode::Up => {
                app.mention.move_selection(COMMENT_FIELD, -1);
                return;
            }
            KeyCode::Down => {
                app.mention.move_selection(COMMENT_FIELD, 1);
                return;
            }
            KeyCode::Enter | KeyCode::Tab => {
                if app.mention.accept(COMMENT_FIELD, &mut app.comment) {
                    app.comment_changed();
                }
                return;
            }
            KeyCode::Esc => {
                app.mention.dismiss(COMMENT_FIELD);
                return;
            }
            _ => {}
        }
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let input = &mut app.comment;
    let edited = match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.blur_comment(Instant::now());
            return;
        }
        KeyCode::Char('a') if ctrl => {
            input.home();
            false
        }
        KeyCode::Char('e') if ctrl => {
            input.end();
            false
        }
        KeyCode::Char('u') if ctrl => {
            input.clear();
            true
        }
        KeyCode::Char('w') if ctrl => {
            let end = input.cursor();
            input.move_word_left();
            let start = input.cursor();
            input.replace_range(start..end, "");
            true
        }
        KeyCode::Char(c) if !ctrl => {
            input.insert_char(c);
            true
        }
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left if ctrl || alt => {
            input.move_word_left();
            false
        }
        KeyCode::Right if ctrl || alt => {
            input.move_word_right();
            false
        }
        KeyCode::Left => {
            input.move_left();
            false
        }
        KeyCode::Right => {
            input.move_right();
            false
        }
        KeyCode::Home => {
            input.home();
            false
        }
        KeyCode::End => {
            input.end();
            false
        }
        _ => return,
    };
    if edited {
        app.comment_changed();
    } else {
        app.comment_cursor_moved();
    }
}
