use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Focus};
use crate::util::unicode;

/// Render every status column side by side and record their hit regions
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let count = app.board.column_count();
    if count == 0 {
        let empty = Paragraph::new(" No columns")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = (0..count)
        .map(|_| Constraint::Ratio(1, count as u32))
        .collect();
    let rects = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let dragged = app.drag.session().card().cloned();
    let board_focused = app.focus == Focus::Board;

    for (col_idx, rect) in rects.iter().enumerate() {
        let Some(column) = app.board.column_at(col_idx) else {
            continue;
        };
        let is_target = app.hover.as_deref() == Some(column.status.as_str());
        let is_cursor_col = board_focused && col_idx == app.cursor_col;

        let border_color = if is_target {
            app.theme.highlight
        } else if is_cursor_col {
            app.theme.text
        } else {
            app.theme.dim
        };
        let title = format!(" {} ({}) ", column.status, column.cards.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color).bg(bg))
            .title(Span::styled(
                title,
                Style::default().fg(app.theme.text_bright).bg(bg),
            ))
            .style(Style::default().bg(bg));
        let inner = block.inner(*rect);
        frame.render_widget(block, *rect);

        let height = inner.height as usize;
        let scroll = if is_cursor_col && app.cursor_card >= height {
            app.cursor_card + 1 - height
        } else {
            0
        };

        let mut lines: Vec<Line> = Vec::new();
        let mut card_rows = Vec::new();
        for (i, card_ref) in column.cards.iter().enumerate().skip(scroll).take(height) {
            let label = app
                .board
                .card(card_ref)
                .map_or_else(|| card_ref.to_string(), |c| c.label.clone());
            let selected = is_cursor_col && i == app.cursor_card;
            let is_dragged = dragged.as_ref() == Some(card_ref);

            let mut style = Style::default().fg(app.theme.text).bg(bg);
            if selected {
                style = style
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD);
            }
            if is_dragged {
                style = style.fg(app.theme.dim).add_modifier(Modifier::ITALIC);
            }
            let marker = if selected { "\u{25B8}" } else { " " };
            let text = unicode::fit_to_width(
                &format!("{}{}", marker, label),
                inner.width as usize,
            );
            lines.push(Line::from(Span::styled(text, style)));

            let row = Rect::new(inner.x, inner.y + (i - scroll) as u16, inner.width, 1);
            card_rows.push((row, card_ref.clone()));
        }

        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
        app.hits.columns.push((*rect, column.status.clone()));
        app.hits.cards.extend(card_rows);
    }
}
