//! Pointer gestures mapped onto the drag protocol.
//!
//! Button down on a card arms a gesture; the first motion with the button
//! held starts the drag. Release drops on the column under the pointer,
//! then delivers the trailing click (which the drag session swallows) and
//! ends the drag. A press and release without motion is a plain click.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::{App, Mode, PointerState};
use crate::util::unicode::display_col_to_byte_offset;

pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let (x, y) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => press(app, x, y, now),
        MouseEventKind::Drag(MouseButton::Left) => motion(app, x, y),
        MouseEventKind::Up(MouseButton::Left) => release(app, x, y),
        _ => {}
    }
}

fn press(app: &mut App, x: u16, y: u16, now: Instant) {
    // A dropdown pick lands before the field loses focus
    if let Some(index) = app.hits.suggestion_at(x, y) {
        app.pick_suggestion(index);
        app.focus_comment();
        return;
    }

    if app.hits.in_comment(x, y) {
        app.focus_comment();
        if let Some(rect) = app.hits.comment {
            let col = (x - rect.x) as usize + app.hits.comment_scroll;
            let offset = display_col_to_byte_offset(app.comment.text(), col);
            app.comment.set_cursor(offset);
            app.comment_cursor_moved();
        }
        return;
    }

    app.blur_comment(now);
    if app.mode == Mode::Move {
        return;
    }
    let pressed = app.hits.card_at(x, y).cloned();
    if let Some(card) = &pressed {
        app.select_card(card);
    }
    app.pointer = PointerState {
        pressed,
        dragging: false,
    };
}

fn motion(app: &mut App, x: u16, y: u16) {
    let Some(card) = app.pointer.pressed.clone() else {
        return;
    };
    if !app.pointer.dragging {
        app.pointer.dragging = true;
        app.begin_drag(&card);
    }
    let status = app.hits.column_at(x, y).map(str::to_string);
    app.drag_over(status.as_deref());
}

fn release(app: &mut App, x: u16, y: u16) {
    let pointer = std::mem::take(&mut app.pointer);
    let Some(card) = pointer.pressed else {
        return;
    };
    if pointer.dragging {
        let status = app.hits.column_at(x, y).map(str::to_string);
        app.drop_on(status.as_deref());
        app.click_card(&card);
        app.end_drag();
    } else if app.hits.card_at(x, y) == Some(&card) {
        app.click_card(&card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::api::StatusUpdate;
    use crate::io::dispatch::ApiRequest;
    use crate::model::CardRef;
    use crate::tui::app::{COMMENT_FIELD, Focus};
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn down(app: &mut App, x: u16, y: u16) {
        handle_mouse(app, mouse(MouseEventKind::Down(MouseButton::Left), x, y), Instant::now());
    }

    fn drag(app: &mut App, x: u16, y: u16) {
        handle_mouse(app, mouse(MouseEventKind::Drag(MouseButton::Left), x, y), Instant::now());
    }

    fn up(app: &mut App, x: u16, y: u16) {
        handle_mouse(app, mouse(MouseEventKind::Up(MouseButton::Left), x, y), Instant::now());
    }

    #[test]
    fn test_drag_card_to_other_column() {
        let mut app = sample_app();
        let (cx, cy) = center_of_card(&mut app, &CardRef::new("lead", "7"));
        let (tx, ty) = center_of_column(&mut app, "Won");

        down(&mut app, cx, cy);
        drag(&mut app, cx + 1, cy);
        assert!(app.drag.session().is_active());
        drag(&mut app, tx, ty);
        assert_eq!(app.hover.as_deref(), Some("Won"));
        up(&mut app, tx, ty);

        assert!(!app.drag.session().is_active());
        assert_eq!(app.hover, None);
        assert_eq!(app.board.status_of(&CardRef::new("lead", "7")), Some("Won"));
        // Only the status update: the trailing click did not open the panel
        assert_eq!(
            app.take_outbox(),
            vec![ApiRequest::UpdateStatus(StatusUpdate {
                model: "lead".into(),
                id: "7".into(),
                status: "Won".into(),
            })]
        );
    }

    #[test]
    fn test_drop_outside_columns_changes_nothing() {
        let mut app = sample_app();
        let (cx, cy) = center_of_card(&mut app, &CardRef::new("lead", "7"));
        down(&mut app, cx, cy);
        drag(&mut app, cx, cy + 1);
        up(&mut app, 0, TERM_H - 1);

        assert_eq!(app.board.status_of(&CardRef::new("lead", "7")), Some("New"));
        assert!(app.outbox.is_empty());
        assert!(!app.drag.session().is_active());
    }

    #[test]
    fn test_plain_click_opens_detail() {
        let mut app = sample_app();
        let card = CardRef::new("lead", "8");
        let (cx, cy) = center_of_card(&mut app, &card);
        down(&mut app, cx, cy);
        up(&mut app, cx, cy);
        assert_eq!(
            app.take_outbox(),
            vec![ApiRequest::FetchRecord { ticket: 0, card }]
        );
    }

    #[test]
    fn test_click_after_drag_needs_new_press() {
        let mut app = sample_app();
        let card = CardRef::new("lead", "7");
        let (cx, cy) = center_of_card(&mut app, &card);
        let (tx, ty) = center_of_column(&mut app, "Contacted");
        down(&mut app, cx, cy);
        drag(&mut app, tx, ty);
        up(&mut app, tx, ty);
        app.take_outbox();

        let (cx, cy) = center_of_card(&mut app, &card);
        down(&mut app, cx, cy);
        up(&mut app, cx, cy);
        assert!(matches!(
            app.take_outbox().as_slice(),
            [ApiRequest::FetchRecord { .. }]
        ));
    }

    #[test]
    fn test_press_outside_comment_blurs() {
        let mut app = sample_app();
        layout(&mut app);
        app.focus_comment();
        down(&mut app, 0, 1);
        assert_eq!(app.focus, Focus::Board);
        assert!(!app.mention.session(COMMENT_FIELD).unwrap().focused);
    }

    #[test]
    fn test_click_in_comment_places_cursor() {
        let mut app = sample_app();
        app.comment.insert_str("hello world");
        layout(&mut app);
        let rect = app.hits.comment.expect("comment rect");
        down(&mut app, rect.x + 5, rect.y);
        assert_eq!(app.focus, Focus::Comment);
        assert_eq!(app.comment.cursor(), 5);
    }

    #[test]
    fn test_click_after_existing_mention_starts_nothing() {
        let mut app = sample_app();
        app.comment.insert_str("hi @bob");
        layout(&mut app);
        let rect = app.hits.comment.expect("comment rect");
        // Right after the "@"
        down(&mut app, rect.x + 4, rect.y);
        assert_eq!(app.comment.cursor(), 4);
        assert!(app.outbox.is_empty());
        assert!(!app.mention.session(COMMENT_FIELD).unwrap().is_composing());
    }

    #[test]
    fn test_pointer_pick_during_blur_grace() {
        let mut app = sample_app();
        app.focus_comment();
        for c in "@al".chars() {
            app.comment.insert_char(c);
            app.comment_changed();
        }
        let seq = match app.take_outbox().pop() {
            Some(ApiRequest::SuggestUsers { seq, .. }) => seq,
            other => panic!("expected suggestion request, got {:?}", other),
        };
        app.mention
            .on_suggestions(COMMENT_FIELD, seq, vec!["alice".into(), "alan".into()]);
        layout(&mut app);
        let (rect, index) = app.hits.suggestions[1];

        down(&mut app, rect.x + 1, rect.y);
        assert_eq!(index, 1);
        assert_eq!(app.comment.text(), "@alan ");
        assert_eq!(app.focus, Focus::Comment);
    }
}
