use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::board_io::parse_board;
use crate::model::{CardRef, Config};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Three columns: New (two leads), Contacted (empty), Won (one deal).
pub const SAMPLE_BOARD_JSON: &str = r#"{
    "title": "Leads",
    "columns": [
        {"status": "New", "cards": [
            {"model": "lead", "id": 7, "label": "Acme Corp"},
            {"model": "lead", "id": 8, "label": "Initech"}
        ]},
        {"status": "Contacted", "cards": []},
        {"status": "Won", "cards": [
            {"model": "deal", "id": "9", "label": "Big deal"}
        ]}
    ]
}"#;

/// Build an App over a snapshot given as JSON, with default config.
pub fn app_with_board(json: &str) -> App {
    App::new(parse_board(json).unwrap(), &Config::default())
}

pub fn sample_app() -> App {
    app_with_board(SAMPLE_BOARD_JSON)
}

/// Render the full UI once so the hit map is populated.
pub fn layout(app: &mut App) {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app));
}

fn center(rect: Rect) -> (u16, u16) {
    (rect.x + rect.width / 2, rect.y + rect.height / 2)
}

/// Screen position of a card after a fresh layout.
pub fn center_of_card(app: &mut App, card: &CardRef) -> (u16, u16) {
    layout(app);
    let rect = app
        .hits
        .cards
        .iter()
        .find(|(_, c)| c == card)
        .map(|(r, _)| *r)
        .unwrap_or_else(|| panic!("card {} not on screen", card));
    center(rect)
}

/// Screen position inside a column, below its cards, after a fresh layout.
pub fn center_of_column(app: &mut App, status: &str) -> (u16, u16) {
    layout(app);
    let rect = app
        .hits
        .columns
        .iter()
        .find(|(_, s)| s == status)
        .map(|(r, _)| *r)
        .unwrap_or_else(|| panic!("column {} not on screen", status));
    (rect.x + rect.width / 2, rect.y + rect.height - 2)
}
