pub mod autocomplete;
pub mod board_view;
pub mod comment_field;
pub mod detail_view;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Hit regions are rebuilt by every frame
    app.hits.clear();

    // Layout: title (1 row) | board | comment field (3 rows) | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, chunks[0]);

    if app.detail.panel().open {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        board_view::render_board_view(frame, app, content[0]);
        detail_view::render_detail_view(frame, app, content[1]);
    } else {
        board_view::render_board_view(frame, app, chunks[1]);
    }

    comment_field::render_comment_field(frame, app, chunks[2]);

    // Suggestion dropdown floats over the board
    autocomplete::render_autocomplete(frame, app, chunks[2]);

    status_row::render_status_row(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let bg = app.theme.background;
    let title = if app.board.title.is_empty() {
        "Board"
    } else {
        app.board.title.as_str()
    };
    let count = format!("{} cards ", app.board.card_count());
    let mut spans = vec![Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    let used = crate::util::unicode::display_width(title) + 1;
    let width = area.width as usize;
    if used + count.len() < width {
        spans.push(Span::styled(
            " ".repeat(width - used - count.len()),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(count, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
