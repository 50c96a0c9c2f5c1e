//! Drag/drop protocol for board cards.
//!
//! A pointer gesture on a card arrives as `drag_start`, zero or more
//! `drag_over`, `drop`, then a `click` on the same card, then `drag_end`.
//! The Drag Session flag is what tells that trailing click apart from a
//! plain click, so a finished drag never opens the detail panel.

use tracing::{debug, info};

use crate::io::api::StatusUpdate;
use crate::model::{Board, CardRef};

/// Tracks whether a drag gesture is in progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    card: Option<CardRef>,
    active: bool,
}

impl DragSession {
    pub fn begin(&mut self, card: CardRef) {
        self.card = Some(card);
        self.active = true;
    }

    pub fn end(&mut self) {
        self.card = None;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The card being dragged, while the session is active
    pub fn card(&self) -> Option<&CardRef> {
        if self.active { self.card.as_ref() } else { None }
    }

    /// Return the active flag and clear it
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.active)
    }
}

/// Data carried from drag start to drop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragTransfer {
    pub model: Option<String>,
    pub id: Option<String>,
}

impl DragTransfer {
    /// The transferred identity, if both halves are present
    pub fn card(&self) -> Option<CardRef> {
        match (&self.model, &self.id) {
            (Some(model), Some(id)) if !model.is_empty() && !id.is_empty() => {
                Some(CardRef::new(model.clone(), id.clone()))
            }
            _ => None,
        }
    }
}

/// What a click on a card should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click closed a drag gesture and is ignored
    Suppressed,
    /// Open the detail panel for this card
    OpenDetail(CardRef),
}

/// Owns the drag lifecycle for board cards
#[derive(Debug, Default)]
pub struct DragController {
    session: DragSession,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Record the card identity in the transfer and mark a drag in progress
    pub fn drag_start(&mut self, card: &CardRef, transfer: &mut DragTransfer) {
        transfer.model = Some(card.model.clone());
        transfer.id = Some(card.id.clone());
        self.session.begin(card.clone());
        debug!(card = %card, "drag start");
    }

    /// Whether a column accepts drops (any column on the board does)
    pub fn drag_over(&self, board: &Board, status: &str) -> bool {
        board.column(status).is_some()
    }

    /// Apply a drop: move the card optimistically and return the status
    /// update to persist. Returns None (and changes nothing) when the
    /// identity, the target status, or the card itself is missing.
    pub fn drop(
        &mut self,
        board: &mut Board,
        status: Option<&str>,
        transfer: &DragTransfer,
    ) -> Option<StatusUpdate> {
        let card = transfer.card()?;
        let status = status.filter(|s| !s.is_empty())?;
        board.card(&card)?;

        match board.move_card(&card, status) {
            Ok(previous) => {
                info!(card = %card, from = %previous, to = %status, "card moved");
                Some(StatusUpdate {
                    model: card.model,
                    id: card.id,
                    status: status.to_string(),
                })
            }
            Err(e) => {
                debug!(card = %card, "drop ignored: {}", e);
                None
            }
        }
    }

    pub fn drag_end(&mut self) {
        self.session.end();
    }

    /// Disambiguate a click: the click that trails a drop is swallowed
    pub fn click(&mut self, card: &CardRef) -> ClickOutcome {
        if self.session.consume() {
            debug!(card = %card, "click after drag suppressed");
            ClickOutcome::Suppressed
        } else {
            ClickOutcome::OpenDetail(card.clone())
        }
    }
}
