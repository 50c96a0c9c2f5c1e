use tracing::debug;

use crate::io::dispatch::ApiRequest;
use crate::model::{CardRef, Record, format_value};

/// One labeled line in the detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub field: String,
    pub value: String,
}

impl DetailLine {
    /// `"<field>: <value>"`
    pub fn text(&self) -> String {
        format!("{}: {}", self.field, self.value)
    }
}

/// Side panel showing one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPanel {
    pub open: bool,
    /// Card whose record is shown
    pub card: Option<CardRef>,
    pub title: String,
    pub lines: Vec<DetailLine>,
    /// A fetch is outstanding
    pub loading: bool,
}

/// Fetches a record on click and renders it into the panel
#[derive(Debug)]
pub struct DetailFetcher {
    panel: DetailPanel,
    private_prefix: String,
    next_ticket: u64,
    latest: Option<u64>,
}

impl DetailFetcher {
    pub fn new(private_prefix: impl Into<String>) -> Self {
        DetailFetcher {
            panel: DetailPanel::default(),
            private_prefix: private_prefix.into(),
            next_ticket: 0,
            latest: None,
        }
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    /// Issue a read for `card`. Only the newest ticket will be rendered.
    pub fn request(&mut self, card: CardRef) -> ApiRequest {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.latest = Some(ticket);
        self.panel.loading = true;
        debug!(card = %card, ticket, "fetch record");
        ApiRequest::FetchRecord { ticket, card }
    }

    /// Render a fetched record. Returns false when the response was
    /// superseded by a later request.
    pub fn apply(&mut self, ticket: u64, card: &CardRef, record: &Record) -> bool {
        if self.latest != Some(ticket) {
            debug!(card = %card, ticket, "stale record response dropped");
            return false;
        }
        self.latest = None;
        self.render(card, record);
        true
    }

    /// A fetch failed: stop waiting, keep whatever the panel showed
    pub fn fail(&mut self, ticket: u64) {
        if self.latest == Some(ticket) {
            self.latest = None;
            self.panel.loading = false;
        }
    }

    /// Fill the panel from a record and reveal it
    pub fn render(&mut self, card: &CardRef, record: &Record) {
        let prefix = self.private_prefix.as_str();
        let panel = &mut self.panel;
        panel.title = match record.get("name") {
            Some(v) if !v.is_null() => format_value(v),
            _ => card.to_string(),
        };
        panel.lines.clear();
        panel.lines.extend(
            record
                .iter()
                .filter(|(k, v)| !v.is_null() && !is_private(prefix, k))
                .map(|(k, v)| DetailLine {
                    field: k.clone(),
                    value: format_value(v),
                }),
        );
        panel.card = Some(card.clone());
        panel.loading = false;
        panel.open = true;
    }

    pub fn close(&mut self) {
        self.panel.open = false;
    }
}

fn is_private(prefix: &str, field: &str) -> bool {
    !prefix.is_empty() && field.starts_with(prefix)
}
