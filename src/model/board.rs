use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardRef, string_or_number};

/// Error type for building or mutating a board
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("duplicate column status: {0}")]
    DuplicateStatus(String),
    #[error("card {0} appears more than once")]
    DuplicateCard(CardRef),
    #[error("no column with status {0}")]
    UnknownStatus(String),
    #[error("no card {0} on the board")]
    UnknownCard(CardRef),
}

// ---------------------------------------------------------------------------
// Snapshot (wire form of a rendered board page)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub title: String,
    pub columns: Vec<ColumnSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub status: String,
    #[serde(default)]
    pub cards: Vec<CardSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub model: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A status column: the cards it currently displays, in presentation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: String,
    pub cards: Vec<CardRef>,
}

/// In-memory board: columns keyed by status plus a card index.
///
/// Every card is listed in exactly one column, and its `status` always
/// names that column.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub title: String,
    columns: IndexMap<String, Column>,
    cards: HashMap<CardRef, Card>,
}

impl Board {
    /// Build a board from a snapshot, rejecting duplicate statuses or cards.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Result<Self, BoardError> {
        let mut board = Board {
            title: snapshot.title,
            ..Default::default()
        };

        for col in snapshot.columns {
            if board.columns.contains_key(&col.status) {
                return Err(BoardError::DuplicateStatus(col.status));
            }
            let mut refs = Vec::with_capacity(col.cards.len());
            for c in col.cards {
                let card_ref = CardRef::new(c.model, c.id);
                if board.cards.contains_key(&card_ref) {
                    return Err(BoardError::DuplicateCard(card_ref));
                }
                let label = c.label.unwrap_or_else(|| card_ref.to_string());
                board.cards.insert(
                    card_ref.clone(),
                    Card {
                        card: card_ref.clone(),
                        label,
                        status: col.status.clone(),
                    },
                );
                refs.push(card_ref);
            }
            board.columns.insert(
                col.status.clone(),
                Column {
                    status: col.status,
                    cards: refs,
                },
            );
        }

        Ok(board)
    }

    /// Columns in display order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, status: &str) -> Option<&Column> {
        self.columns.get(status)
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get_index(index).map(|(_, col)| col)
    }

    pub fn column_index(&self, status: &str) -> Option<usize> {
        self.columns.get_index_of(status)
    }

    /// Look a card up by exact (model, id) match
    pub fn card(&self, card: &CardRef) -> Option<&Card> {
        self.cards.get(card)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Current status of a card
    pub fn status_of(&self, card: &CardRef) -> Option<&str> {
        self.cards.get(card).map(|c| c.status.as_str())
    }

    /// Move a card to the end of the target column's list.
    ///
    /// Dropping a card onto its own column moves it to the end of that
    /// column. Returns the status the card had before the move.
    pub fn move_card(&mut self, card: &CardRef, status: &str) -> Result<String, BoardError> {
        if !self.columns.contains_key(status) {
            return Err(BoardError::UnknownStatus(status.to_string()));
        }
        let entry = self
            .cards
            .get_mut(card)
            .ok_or_else(|| BoardError::UnknownCard(card.clone()))?;
        let previous = std::mem::replace(&mut entry.status, status.to_string());

        if let Some(from) = self.columns.get_mut(&previous) {
            from.cards.retain(|r| r != card);
        }
        if let Some(to) = self.columns.get_mut(status) {
            to.cards.push(card.clone());
        }
        Ok(previous)
    }
}
