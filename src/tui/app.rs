use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::io::api::{Backend, HttpBackend};
use crate::io::board_io::load_board;
use crate::io::dispatch::{ApiEvent, ApiRequest, Dispatcher};
use crate::io::watcher::{FileEvent, SnapshotWatcher};
use crate::model::{Board, CardRef, Config, FieldId, TextInput};
use crate::ops::detail::DetailFetcher;
use crate::ops::drag::{ClickOutcome, DragController, DragTransfer};
use crate::ops::mention::MentionEngine;

use super::input;
use super::render;
use super::theme::Theme;

/// The board's single comment input
pub const COMMENT_FIELD: FieldId = FieldId(0);

/// Which widget receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Board,
    Comment,
}

/// Current interaction mode on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Keyboard move: a drag is in progress, arrows pick the target column
    Move,
}

/// Screen regions recorded by the last render, for mouse hit-testing
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub columns: Vec<(Rect, String)>,
    pub cards: Vec<(Rect, CardRef)>,
    pub comment: Option<Rect>,
    /// Display columns of comment text scrolled off the left edge
    pub comment_scroll: usize,
    /// Dropdown rows and the suggestion index each shows
    pub suggestions: Vec<(Rect, usize)>,
}

fn contains(rect: &Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

impl HitMap {
    pub fn clear(&mut self) {
        *self = HitMap::default();
    }

    pub fn card_at(&self, x: u16, y: u16) -> Option<&CardRef> {
        self.cards
            .iter()
            .find(|(r, _)| contains(r, x, y))
            .map(|(_, c)| c)
    }

    pub fn column_at(&self, x: u16, y: u16) -> Option<&str> {
        self.columns
            .iter()
            .find(|(r, _)| contains(r, x, y))
            .map(|(_, s)| s.as_str())
    }

    pub fn suggestion_at(&self, x: u16, y: u16) -> Option<usize> {
        self.suggestions
            .iter()
            .find(|(r, _)| contains(r, x, y))
            .map(|(_, i)| *i)
    }

    pub fn in_comment(&self, x: u16, y: u16) -> bool {
        self.comment.is_some_and(|r| contains(&r, x, y))
    }
}

/// Mouse gesture in progress
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Card under the last button press
    pub pressed: Option<CardRef>,
    /// Pointer moved with the button held: a drag has started
    pub dragging: bool,
}

/// Main application state
pub struct App {
    pub board: Board,
    pub snapshot_path: Option<PathBuf>,
    pub mode: Mode,
    pub focus: Focus,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Dropdown rows shown before scrolling
    pub max_visible: usize,

    pub drag: DragController,
    pub transfer: DragTransfer,
    pub detail: DetailFetcher,
    pub mention: MentionEngine,
    pub comment: TextInput,

    /// Keyboard cursor: column index, card index within it
    pub cursor_col: usize,
    pub cursor_card: usize,
    /// Column highlighted as the drop target
    pub hover: Option<String>,
    pub pointer: PointerState,
    pub hits: HitMap,

    /// Requests waiting for the dispatcher
    pub outbox: Vec<ApiRequest>,
    /// Time of the last confirmed status update
    pub last_synced: Option<DateTime<Local>>,
    /// One-line message for the status row
    pub message: Option<String>,
}

impl App {
    pub fn new(board: Board, config: &Config) -> Self {
        let mut mention = MentionEngine::new(&config.mention);
        mention.attach(COMMENT_FIELD);

        App {
            board,
            snapshot_path: None,
            mode: Mode::Navigate,
            focus: Focus::Board,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            max_visible: config.mention.max_visible.max(1),
            drag: DragController::new(),
            transfer: DragTransfer::default(),
            detail: DetailFetcher::new(config.detail.private_prefix.clone()),
            mention,
            comment: TextInput::new(),
            cursor_col: 0,
            cursor_card: 0,
            hover: None,
            pointer: PointerState::default(),
            hits: HitMap::default(),
            outbox: Vec::new(),
            last_synced: None,
            message: None,
        }
    }

    // -----------------------------------------------------------------------
    // Board cursor
    // -----------------------------------------------------------------------

    /// Card under the keyboard cursor
    pub fn selected_card(&self) -> Option<&CardRef> {
        self.board
            .column_at(self.cursor_col)?
            .cards
            .get(self.cursor_card)
    }

    /// Keep the cursor inside the board after columns or cards change
    pub fn clamp_cursor(&mut self) {
        let cols = self.board.column_count();
        self.cursor_col = self.cursor_col.min(cols.saturating_sub(1));
        let len = self
            .board
            .column_at(self.cursor_col)
            .map_or(0, |c| c.cards.len());
        self.cursor_card = self.cursor_card.min(len.saturating_sub(1));
    }

    /// Put the keyboard cursor on a card
    pub fn select_card(&mut self, card: &CardRef) {
        let Some(status) = self.board.status_of(card) else {
            return;
        };
        if let Some(col) = self.board.column_index(status) {
            self.cursor_col = col;
            self.cursor_card = self
                .board
                .column_at(col)
                .and_then(|c| c.cards.iter().position(|r| r == card))
                .unwrap_or(0);
        }
    }

    // -----------------------------------------------------------------------
    // Drag protocol
    // -----------------------------------------------------------------------

    pub fn begin_drag(&mut self, card: &CardRef) {
        self.drag.drag_start(card, &mut self.transfer);
        self.hover = self.board.status_of(card).map(str::to_string);
    }

    /// Track the column under the dragged card
    pub fn drag_over(&mut self, status: Option<&str>) {
        self.hover = status
            .filter(|s| self.drag.drag_over(&self.board, s))
            .map(str::to_string);
    }

    /// Drop on `status` and queue the status update
    pub fn drop_on(&mut self, status: Option<&str>) {
        let moved = self.transfer.card();
        if let Some(update) = self.drag.drop(&mut self.board, status, &self.transfer) {
            self.outbox.push(ApiRequest::UpdateStatus(update));
            if let Some(card) = moved {
                self.select_card(&card);
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.drag.drag_end();
        self.transfer = DragTransfer::default();
        self.hover = None;
        self.pointer = PointerState::default();
        self.mode = Mode::Navigate;
    }

    /// A click on a card: opens the detail panel unless it ends a drag
    pub fn click_card(&mut self, card: &CardRef) {
        match self.drag.click(card) {
            ClickOutcome::OpenDetail(card) => {
                let req = self.detail.request(card);
                self.outbox.push(req);
            }
            ClickOutcome::Suppressed => {}
        }
    }

    // -----------------------------------------------------------------------
    // Comment field
    // -----------------------------------------------------------------------

    pub fn focus_comment(&mut self) {
        self.focus = Focus::Comment;
        self.mention.on_focus(COMMENT_FIELD);
    }

    pub fn blur_comment(&mut self, now: Instant) {
        if self.focus == Focus::Comment {
            self.focus = Focus::Board;
            self.mention.on_blur(COMMENT_FIELD, now);
        }
    }

    /// Run mention detection after the comment text changed
    pub fn comment_changed(&mut self) {
        if let Some(req) = self.mention.on_input(COMMENT_FIELD, &self.comment) {
            self.outbox.push(req);
        }
    }

    /// Same for a cursor move that left the text alone
    pub fn comment_cursor_moved(&mut self) {
        if let Some(req) = self.mention.on_cursor(COMMENT_FIELD, &self.comment) {
            self.outbox.push(req);
        }
    }

    /// Insert the suggestion at `index` into the comment
    pub fn pick_suggestion(&mut self, index: usize) {
        if self.mention.select(COMMENT_FIELD, index, &mut self.comment) {
            self.comment_changed();
        }
    }

    // -----------------------------------------------------------------------
    // Background work
    // -----------------------------------------------------------------------

    pub fn take_outbox(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Fold a finished backend call into the UI
    pub fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::StatusUpdated { result, .. } => {
                if result.is_ok() {
                    self.last_synced = Some(Local::now());
                }
            }
            ApiEvent::RecordFetched {
                ticket,
                card,
                result,
            } => match result {
                Ok(record) => {
                    self.detail.apply(ticket, &card, &record);
                }
                Err(_) => self.detail.fail(ticket),
            },
            ApiEvent::UsersSuggested { field, seq, result } => {
                if let Ok(users) = result {
                    self.mention.on_suggestions(field, seq, users);
                }
            }
        }
    }

    /// Time-driven updates (blur grace expiry)
    pub fn tick(&mut self, now: Instant) {
        self.mention.tick(now);
    }

    /// Replace the board from the snapshot file
    pub fn reload(&mut self) {
        let Some(path) = self.snapshot_path.clone() else {
            return;
        };
        match load_board(&path) {
            Ok(board) => {
                info!(path = %path.display(), "snapshot reloaded");
                self.board = board;
                self.clamp_cursor();
                self.message = Some("board reloaded".into());
            }
            Err(e) => {
                warn!("reload failed: {}", e);
                self.message = Some(format!("reload failed: {}", e));
            }
        }
    }
}

/// Open the board UI over a snapshot file
pub fn run(snapshot: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let board = load_board(snapshot)?;
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config.server)?);
    let dispatcher = Dispatcher::new(backend);
    let watcher = match SnapshotWatcher::start(snapshot) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!("not watching {}: {}", snapshot.display(), e);
            None
        }
    };

    let mut app = App::new(board, config);
    app.snapshot_path = Some(snapshot.to_path_buf());
    info!(path = %snapshot.display(), "board opened");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &dispatcher, watcher.as_ref());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher,
    watcher: Option<&SnapshotWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        dispatcher.submit_all(app.take_outbox());
        for event in dispatcher.poll() {
            app.handle_api_event(event);
        }
        if let Some(FileEvent::SnapshotChanged) = watcher.and_then(SnapshotWatcher::poll) {
            app.reload();
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::api::{ApiError, StatusUpdate};
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_app_attaches_comment_field() {
        let app = sample_app();
        assert!(app.mention.session(COMMENT_FIELD).is_some());
        assert_eq!(app.selected_card(), Some(&CardRef::new("lead", "7")));
    }

    #[test]
    fn test_drop_queues_status_update_and_follows_card() {
        let mut app = sample_app();
        let card = CardRef::new("lead", "7");
        app.begin_drag(&card);
        app.drop_on(Some("Contacted"));
        app.click_card(&card);
        app.end_drag();

        assert_eq!(
            app.take_outbox(),
            vec![ApiRequest::UpdateStatus(StatusUpdate {
                model: "lead".into(),
                id: "7".into(),
                status: "Contacted".into(),
            })]
        );
        assert_eq!(app.selected_card(), Some(&card));
        assert_eq!(app.cursor_col, 1);
    }

    #[test]
    fn test_status_failure_keeps_optimistic_move() {
        let mut app = sample_app();
        let card = CardRef::new("lead", "7");
        app.begin_drag(&card);
        app.drop_on(Some("Contacted"));
        app.end_drag();
        let Some(ApiRequest::UpdateStatus(update)) = app.take_outbox().pop() else {
            panic!("expected status update");
        };

        app.handle_api_event(ApiEvent::StatusUpdated {
            update,
            result: Err(ApiError::Malformed("boom".into())),
        });
        assert_eq!(app.board.status_of(&card), Some("Contacted"));
        assert_eq!(app.last_synced, None);
    }

    #[test]
    fn test_status_success_records_sync_time() {
        let mut app = sample_app();
        app.handle_api_event(ApiEvent::StatusUpdated {
            update: StatusUpdate {
                model: "lead".into(),
                id: "7".into(),
                status: "New".into(),
            },
            result: Ok(()),
        });
        assert!(app.last_synced.is_some());
    }

    #[test]
    fn test_plain_click_fetches_record() {
        let mut app = sample_app();
        app.click_card(&CardRef::new("lead", "8"));
        assert_eq!(
            app.take_outbox(),
            vec![ApiRequest::FetchRecord {
                ticket: 0,
                card: CardRef::new("lead", "8")
            }]
        );

        let record = serde_json::from_str(r#"{"name":"Initech","_secret":1}"#).unwrap();
        app.handle_api_event(ApiEvent::RecordFetched {
            ticket: 0,
            card: CardRef::new("lead", "8"),
            result: Ok(record),
        });
        assert!(app.detail.panel().open);
        assert_eq!(app.detail.panel().title, "Initech");
    }

    #[test]
    fn test_suggestion_event_reaches_engine() {
        let mut app = sample_app();
        app.focus_comment();
        for c in "@al".chars() {
            app.comment.insert_char(c);
            app.comment_changed();
        }
        let seq = match app.take_outbox().pop() {
            Some(ApiRequest::SuggestUsers { seq, query, .. }) => {
                assert_eq!(query, "al");
                seq
            }
            other => panic!("expected suggestion request, got {:?}", other),
        };
        app.handle_api_event(ApiEvent::UsersSuggested {
            field: COMMENT_FIELD,
            seq,
            result: Ok(vec!["alice".into()]),
        });
        assert!(app.mention.session(COMMENT_FIELD).unwrap().is_showing());

        app.pick_suggestion(0);
        assert_eq!(app.comment.text(), "@alice ");
    }

    #[test]
    fn test_reload_without_path_is_noop() {
        let mut app = sample_app();
        app.reload();
        assert_eq!(app.message, None);
    }

    #[test]
    fn test_reload_reads_snapshot_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"title": "Deals", "columns": [{"status": "Open", "cards": []}]}"#,
        )
        .unwrap();
        let mut app = sample_app();
        app.cursor_col = 2;
        app.snapshot_path = Some(path);
        app.reload();
        assert_eq!(app.board.title, "Deals");
        assert_eq!(app.cursor_col, 0);
        assert_eq!(app.selected_card(), None);
    }

    #[test]
    fn test_hit_map_lookup() {
        let mut hits = HitMap::default();
        hits.cards.push((Rect::new(1, 2, 10, 1), CardRef::new("lead", "7")));
        hits.columns.push((Rect::new(0, 0, 12, 10), "New".into()));
        assert_eq!(hits.card_at(5, 2), Some(&CardRef::new("lead", "7")));
        assert_eq!(hits.card_at(5, 3), None);
        assert_eq!(hits.column_at(11, 9), Some("New"));
        assert_eq!(hits.column_at(12, 9), None);
        hits.clear();
        assert!(hits.cards.is_empty());
    }
}
