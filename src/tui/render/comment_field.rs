use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Focus};
use crate::util::unicode;

/// Render the single-line comment input, scrolled so the cursor stays visible
pub fn render_comment_field(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::Comment;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(if focused { app.theme.highlight } else { app.theme.dim })
                .bg(bg),
        )
        .title(Span::styled(" Comment ", Style::default().fg(app.theme.text).bg(bg)))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let cursor_col = app.comment.cursor_col();
    let scroll = if width > 0 && cursor_col >= width {
        cursor_col + 1 - width
    } else {
        0
    };

    let text = app.comment.text();
    let start = unicode::display_col_to_byte_offset(text, scroll);
    let visible = unicode::truncate_to_width(&text[start..], width);
    let line = if text.is_empty() && !focused {
        Line::from(Span::styled(
            "Tab to comment, @ to mention",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(visible, Style::default().fg(app.theme.text_bright).bg(bg)))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused && inner.width > 0 {
        let x = inner.x + (cursor_col - scroll) as u16;
        frame.set_cursor_position(Position::new(x, inner.y));
    }

    app.hits.comment = Some(inner);
    app.hits.comment_scroll = scroll;
}
