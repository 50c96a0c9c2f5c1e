use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus, Mode};

fn key_hint(app: &App) -> &'static str {
    match (app.focus, app.mode) {
        (Focus::Comment, _) => "@ mention  Esc leave",
        (Focus::Board, Mode::Move) => "\u{2190}\u{2192} target  Enter drop  Esc cancel",
        (Focus::Board, Mode::Navigate) => "Enter open  m move  Tab comment  q quit",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if app.mode == Mode::Move {
        spans.push(Span::styled(
            " MOVE ",
            Style::default().fg(app.theme.background).bg(app.theme.highlight),
        ));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }
    if let Some(msg) = &app.message {
        spans.push(Span::styled(msg.clone(), Style::default().fg(app.theme.warning).bg(bg)));
    } else if app.show_key_hints || app.mode == Mode::Move {
        spans.push(Span::styled(key_hint(app), Style::default().fg(app.theme.dim).bg(bg)));
    }

    // Right side: time of the last confirmed status update
    if let Some(synced) = app.last_synced {
        let right = format!("synced {}", synced.format("%H:%M:%S"));
        let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let right_width = right.chars().count();
        if content_width + right_width < width {
            let padding = width - content_width - right_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(right, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
