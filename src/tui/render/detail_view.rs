use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

/// Render the record detail panel
pub fn render_detail_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let panel = app.detail.panel();

    let title = unicode::truncate_to_width(
        &format!(" {} ", panel.title),
        area.width.saturating_sub(2) as usize,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text).bg(bg);

    let mut lines: Vec<Line> = panel
        .lines
        .iter()
        .map(|line| {
            let label = format!("{}: ", line.field);
            let room = width.saturating_sub(unicode::display_width(&label));
            Line::from(vec![
                Span::styled(label, label_style),
                Span::styled(unicode::truncate_to_width(&line.value, room), value_style),
            ])
        })
        .collect();

    if panel.loading {
        lines.push(Line::from(Span::styled(
            "loading\u{2026}",
            Style::default().fg(app.theme.warning).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
