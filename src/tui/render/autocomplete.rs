use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, COMMENT_FIELD};
use crate::util::unicode;

/// Render the mention dropdown floating next to the comment field,
/// anchored under the trigger character
pub fn render_autocomplete(frame: &mut Frame, app: &mut App, field_area: Rect) {
    let Some(session) = app.mention.session(COMMENT_FIELD) else {
        return;
    };
    let Some(trigger) = session.trigger() else {
        return;
    };
    if !session.is_showing() {
        return;
    }

    let bg = app.theme.background;
    let text_color = app.theme.text;
    let bright = app.theme.text_bright;
    let dim = app.theme.dim;
    let max_visible = app.max_visible;

    let entries = &session.suggestions;
    let count = entries.len().min(max_visible);

    // Determine the widest entry (+ padding)
    let max_width = entries
        .iter()
        .take(max_visible)
        .map(|s| unicode::display_width(s))
        .max()
        .unwrap_or(10)
        + 4;

    let popup_w = (max_width as u16)
        .min(field_area.width.saturating_sub(2))
        .max(12);
    let popup_h = (count as u16) + 2;

    // Below the field if it fits, otherwise above
    let term_area = frame.area();
    let y = if field_area.y + field_area.height + popup_h <= term_area.height {
        field_area.y + field_area.height
    } else {
        field_area.y.saturating_sub(popup_h)
    };

    // Horizontal: align with the trigger inside the field
    let trigger_col = unicode::byte_offset_to_display_col(app.comment.text(), trigger)
        .saturating_sub(app.hits.comment_scroll);
    let x = (field_area.x + 1 + trigger_col as u16).min(term_area.width.saturating_sub(popup_w));

    let popup_area = Rect::new(x, y, popup_w, popup_h);

    // Scroll window around selected item
    let scroll_start = if session.selected >= max_visible {
        session.selected - max_visible + 1
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut rows = Vec::new();
    for (i, entry) in entries.iter().skip(scroll_start).take(max_visible).enumerate() {
        let actual_idx = scroll_start + i;
        let is_selected = actual_idx == session.selected;

        let style = if is_selected {
            Style::default()
                .fg(bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_color).bg(bg)
        };

        let prefix = if is_selected { " \u{25B8} " } else { "   " };
        let label = unicode::fit_to_width(entry, (popup_w as usize).saturating_sub(5));

        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(label, style),
        ]));
        rows.push((
            Rect::new(popup_area.x + 1, popup_area.y + 1 + i as u16, popup_w - 2, 1),
            actual_idx,
        ));
    }

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines).block(block).style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);

    app.hits.suggestions = rows;
}
