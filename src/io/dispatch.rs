use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::io::api::{ApiError, Backend, StatusUpdate};
use crate::model::{CardRef, FieldId, Record};

/// Outgoing work produced by the board controllers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Persist a drop; nothing on the board waits for the answer
    UpdateStatus(StatusUpdate),
    FetchRecord { ticket: u64, card: CardRef },
    SuggestUsers { field: FieldId, seq: u64, query: String },
}

/// A finished backend call, delivered back to the event loop
#[derive(Debug)]
pub enum ApiEvent {
    StatusUpdated {
        update: StatusUpdate,
        result: Result<(), ApiError>,
    },
    RecordFetched {
        ticket: u64,
        card: CardRef,
        result: Result<Record, ApiError>,
    },
    UsersSuggested {
        field: FieldId,
        seq: u64,
        result: Result<Vec<String>, ApiError>,
    },
}

/// Runs backend calls on worker threads.
///
/// `submit()` returns immediately; results queue up until the event loop
/// drains them with `poll()`. Nothing orders the results, so a later
/// request can finish first.
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<ApiEvent>,
    rx: mpsc::Receiver<ApiEvent>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Dispatcher { backend, tx, rx }
    }

    pub fn submit(&self, request: ApiRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        debug!(?request, "submit");
        thread::spawn(move || {
            let event = run(backend.as_ref(), request);
            // Receiver gone means the UI is shutting down
            let _ = tx.send(event);
        });
    }

    pub fn submit_all(&self, requests: impl IntoIterator<Item = ApiRequest>) {
        for request in requests {
            self.submit(request);
        }
    }

    /// Non-blocking drain of finished calls
    pub fn poll(&self) -> Vec<ApiEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

/// Perform one request synchronously
pub fn run(backend: &dyn Backend, request: ApiRequest) -> ApiEvent {
    match request {
        ApiRequest::UpdateStatus(update) => {
            let result = backend.update_status(&update);
            if let Err(e) = &result {
                warn!(model = %update.model, id = %update.id, "status update failed: {}", e);
            }
            ApiEvent::StatusUpdated { update, result }
        }
        ApiRequest::FetchRecord { ticket, card } => {
            let result = backend.fetch_record(&card);
            if let Err(e) = &result {
                warn!(card = %card, "record fetch failed: {}", e);
            }
            ApiEvent::RecordFetched {
                ticket,
                card,
                result,
            }
        }
        ApiRequest::SuggestUsers { field, seq, query } => {
            let result = backend.suggest_users(&query);
            if let Err(e) = &result {
                warn!(query = %query, "suggestion fetch failed: {}", e);
            }
            ApiEvent::UsersSuggested { field, seq, result }
        }
    }
}
