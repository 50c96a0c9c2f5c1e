//! "@mention" autocomplete for text inputs.
//!
//! Each input gets its own [`MentionSession`], kept in an arena keyed by
//! [`FieldId`]. A session is `Idle` until an edit leaves the trigger right
//! before the cursor; it then stays `Composing` until the cursor moves
//! to or before the trigger, the trigger is deleted, or a suggestion is
//! accepted.
//!
//! Suggestion requests carry a per-session sequence number. A response is
//! applied only when its number is the session's latest issued one, so a
//! slow answer for `"al"` can never overwrite the list for `"ali"`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::io::dispatch::ApiRequest;
use crate::model::{FieldId, MentionConfig, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MentionState {
    #[default]
    Idle,
    /// `trigger` is the byte offset of the trigger character
    Composing { trigger: usize },
}

/// Per-input autocomplete state
#[derive(Debug, Clone, Default)]
pub struct MentionSession {
    pub state: MentionState,
    /// Text between the trigger and the cursor
    pub query: String,
    /// Candidates from the latest applied response
    pub suggestions: Vec<String>,
    /// Highlighted entry in `suggestions`
    pub selected: usize,
    pub visible: bool,
    pub focused: bool,
    next_seq: u64,
    /// Sequence number of the request whose answer may still be shown
    latest: Option<u64>,
    /// Query that `latest` was issued for
    latest_query: String,
    hide_at: Option<Instant>,
}

impl MentionSession {
    pub fn is_composing(&self) -> bool {
        matches!(self.state, MentionState::Composing { .. })
    }

    pub fn trigger(&self) -> Option<usize> {
        match self.state {
            MentionState::Composing { trigger } => Some(trigger),
            MentionState::Idle => None,
        }
    }

    pub fn selected_entry(&self) -> Option<&str> {
        self.suggestions.get(self.selected).map(String::as_str)
    }

    /// Dropdown is on screen with something in it
    pub fn is_showing(&self) -> bool {
        self.visible && !self.suggestions.is_empty()
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    /// Forget any in-flight request so its answer is discarded
    fn invalidate(&mut self) {
        self.latest = None;
        self.latest_query.clear();
    }

    fn end(&mut self) {
        self.state = MentionState::Idle;
        self.query.clear();
        self.suggestions.clear();
        self.selected = 0;
        self.hide();
        self.invalidate();
    }

    fn issue(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest = Some(seq);
        self.latest_query = self.query.clone();
        seq
    }
}

/// Drives the mention sessions of every attached input
#[derive(Debug)]
pub struct MentionEngine {
    sessions: BTreeMap<FieldId, MentionSession>,
    trigger: char,
    min_query_len: usize,
    blur_grace: Duration,
}

impl MentionEngine {
    pub fn new(config: &MentionConfig) -> Self {
        MentionEngine {
            sessions: BTreeMap::new(),
            trigger: config.trigger,
            min_query_len: config.min_query_len,
            blur_grace: config.blur_grace(),
        }
    }

    /// Create the session for a newly initialized input
    pub fn attach(&mut self, field: FieldId) {
        self.sessions.entry(field).or_default();
    }

    /// Drop the session of an input that went away
    pub fn detach(&mut self, field: FieldId) {
        self.sessions.remove(&field);
    }

    pub fn session(&self, field: FieldId) -> Option<&MentionSession> {
        self.sessions.get(&field)
    }

    /// React to a text change in `field`.
    ///
    /// Returns the suggestion request to send, if any.
    pub fn on_input(&mut self, field: FieldId, input: &TextInput) -> Option<ApiRequest> {
        self.update(field, input, true)
    }

    /// React to a cursor move that left the text alone.
    ///
    /// Can end or re-query a running session but never starts one.
    pub fn on_cursor(&mut self, field: FieldId, input: &TextInput) -> Option<ApiRequest> {
        self.update(field, input, false)
    }

    fn update(&mut self, field: FieldId, input: &TextInput, edited: bool) -> Option<ApiRequest> {
        let trigger_char = self.trigger;
        let min_query_len = self.min_query_len;
        let session = self.sessions.get_mut(&field)?;
        let text = input.text();
        let cursor = input.cursor();

        if let MentionState::Composing { trigger } = session.state
            && (cursor <= trigger
                || !text
                    .get(trigger..)
                    .is_some_and(|rest| rest.starts_with(trigger_char)))
        {
            debug!(?field, "mention session ended");
            session.end();
        }

        if session.state == MentionState::Idle {
            if !edited || !text[..cursor].ends_with(trigger_char) {
                return None;
            }
            let trigger = cursor - trigger_char.len_utf8();
            session.state = MentionState::Composing { trigger };
            trace!(?field, trigger, "mention session started");
        }

        let trigger = session.trigger()?;
        session.query = text[trigger + trigger_char.len_utf8()..cursor].to_string();

        if session.query.chars().any(char::is_whitespace) {
            session.hide();
            session.invalidate();
            return None;
        }
        if session.query.chars().count() < min_query_len {
            session.hide();
            session.invalidate();
            return None;
        }
        if session.latest.is_some() && session.latest_query == session.query {
            return None;
        }

        let seq = session.issue();
        debug!(?field, seq, query = %session.query, "suggestion request");
        Some(ApiRequest::SuggestUsers {
            field,
            seq,
            query: session.query.clone(),
        })
    }

    /// Apply a suggestion response. Returns false if it was stale.
    pub fn on_suggestions(&mut self, field: FieldId, seq: u64, users: Vec<String>) -> bool {
        let Some(session) = self.sessions.get_mut(&field) else {
            return false;
        };
        if !session.is_composing() || session.latest != Some(seq) {
            debug!(?field, seq, "stale suggestions dropped");
            return false;
        }
        session.suggestions = users;
        session.selected = 0;
        // Still shown during the blur grace window
        let on_screen = session.focused || session.hide_at.is_some();
        session.visible = on_screen && !session.suggestions.is_empty();
        true
    }

    /// Insert the suggestion at `index` in place of the trigger and query.
    ///
    /// The span from the trigger through the cursor becomes
    /// `"<trigger><candidate> "` and the cursor lands after the space.
    pub fn select(&mut self, field: FieldId, index: usize, input: &mut TextInput) -> bool {
        let trigger_char = self.trigger;
        let Some(session) = self.sessions.get_mut(&field) else {
            return false;
        };
        let (Some(trigger), Some(candidate)) = (session.trigger(), session.suggestions.get(index))
        else {
            return false;
        };
        let cursor = input.cursor();
        if cursor <= trigger {
            return false;
        }
        let replacement = format!("{}{} ", trigger_char, candidate);
        debug!(?field, candidate = %candidate, "mention inserted");
        input.replace_range(trigger..cursor, &replacement);
        session.end();
        true
    }

    /// Insert the highlighted suggestion
    pub fn accept(&mut self, field: FieldId, input: &mut TextInput) -> bool {
        let index = match self.sessions.get(&field) {
            Some(s) if s.is_showing() => s.selected,
            _ => return false,
        };
        self.select(field, index, input)
    }

    /// Move the highlight, clamped to the list
    pub fn move_selection(&mut self, field: FieldId, delta: isize) {
        if let Some(session) = self.sessions.get_mut(&field)
            && !session.suggestions.is_empty()
        {
            let last = session.suggestions.len() - 1;
            session.selected = session.selected.saturating_add_signed(delta).min(last);
        }
    }

    /// Hide the dropdown but keep composing; the next query shows it again
    pub fn dismiss(&mut self, field: FieldId) {
        if let Some(session) = self.sessions.get_mut(&field) {
            session.hide();
            session.invalidate();
        }
    }

    pub fn on_focus(&mut self, field: FieldId) {
        if let Some(session) = self.sessions.get_mut(&field) {
            session.focused = true;
            session.hide_at = None;
        }
    }

    /// Schedule the dropdown to hide once the grace period runs out
    pub fn on_blur(&mut self, field: FieldId, now: Instant) {
        if let Some(session) = self.sessions.get_mut(&field) {
            session.focused = false;
            session.hide_at = Some(now + self.blur_grace);
        }
    }

    /// Apply due blur hides. Returns true if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for session in self.sessions.values_mut() {
            if let Some(at) = session.hide_at
                && at <= now
            {
                session.hide_at = None;
                session.hide();
                changed = true;
            }
        }
        changed
    }
}
