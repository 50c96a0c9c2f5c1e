use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Board;
use crate::ops::detail::DetailPanel;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson {
    pub title: String,
    pub columns: Vec<ColumnJson>,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub status: String,
    pub cards: Vec<CardJson>,
}

#[derive(Serialize)]
pub struct CardJson {
    pub model: String,
    pub id: String,
    pub label: String,
}

/// A record as the detail panel shows it: title plus visible fields in order
#[derive(Serialize)]
pub struct DetailJson {
    pub title: String,
    pub fields: IndexMap<String, String>,
}

pub fn board_to_json(board: &Board) -> BoardJson {
    BoardJson {
        title: board.title.clone(),
        columns: board
            .columns()
            .map(|col| ColumnJson {
                status: col.status.clone(),
                cards: col
                    .cards
                    .iter()
                    .filter_map(|r| board.card(r))
                    .map(|card| CardJson {
                        model: card.card.model.clone(),
                        id: card.card.id.clone(),
                        label: card.label.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn detail_to_json(panel: &DetailPanel) -> DetailJson {
    DetailJson {
        title: panel.title.clone(),
        fields: panel
            .lines
            .iter()
            .map(|l| (l.field.clone(), l.value.clone()))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One heading per column, cards indented beneath it
pub fn format_columns(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    if !board.title.is_empty() {
        lines.push(board.title.clone());
    }
    let id_width = board
        .columns()
        .flat_map(|c| c.cards.iter())
        .map(|r| r.to_string().len())
        .max()
        .unwrap_or(0);

    for col in board.columns() {
        lines.push(format!("{} ({})", col.status, col.cards.len()));
        for card_ref in &col.cards {
            let label = board.card(card_ref).map_or("", |c| c.label.as_str());
            lines.push(format!(
                "  {:<width$}  {}",
                card_ref.to_string(),
                label,
                width = id_width
            ));
        }
    }
    lines
}

/// Title line, then one `"<field>: <value>"` line per visible field
pub fn format_detail(panel: &DetailPanel) -> Vec<String> {
    let mut lines = vec![panel.title.clone()];
    lines.extend(panel.lines.iter().map(|l| l.text()));
    lines
}
