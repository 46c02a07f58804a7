//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the feed,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Threads of control
//!
//! ```text
//! UI thread (this loop)           tokio tasks
//! ─────────────────────           ───────────
//! poll keys → update() ──Effect──► spawn_fetch ──┐
//!                                  write worker ─┤ Action over mpsc
//! try_recv() → update() ◄────────────────────────┘
//! ```
//!
//! Only the UI thread touches `App` (and so the feed store). Fetches run as
//! independent tasks; writes go through a single worker so they reach the
//! backend in the order the viewer made them.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: polls every 100ms and only redraws on input or background
//!   actions.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::backend::{BackendError, FeedBackend, RestBackend, execute_writes};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::model::{Emotion, PostId, RemoteWrite};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{CommentBox, CommentEvent, FeedScrollState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Fetches that take longer than this are reported as failed.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// How long to wait for queued writes on exit.
const WRITE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub feed: FeedScrollState,
    /// Selected post, tracked by id so it survives refreshes
    pub selected_id: Option<PostId>,
    /// Comment composer overlay (None = hidden)
    pub comment_box: Option<CommentBox>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            feed: FeedScrollState::new(),
            selected_id: None,
            comment_box: None,
        }
    }

    /// Keep the selection on a post that still exists, falling back to the first.
    pub fn sync_selection(&mut self, app: &App) {
        let still_present = self
            .selected_id
            .as_deref()
            .is_some_and(|id| app.store.position(id).is_some());
        if !still_present {
            self.selected_id = app.store.id_at(0).cloned();
        }
    }

    fn move_selection(&mut self, app: &App, down: bool) {
        let len = app.store.len();
        if len == 0 {
            self.selected_id = None;
            return;
        }
        let current = self
            .selected_id
            .as_deref()
            .and_then(|id| app.store.position(id));
        let next = match (current, down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.selected_id = app.store.id_at(next).cloned();
        self.feed.follow_selection = true;
    }
}

/// Translate one terminal event into an [`Action`], updating TUI-local state
/// (selection, scroll, composer) along the way.
pub(crate) fn handle_event(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    // When the composer is open, route all events to it
    if let Some(comment_box) = tui.comment_box.as_mut() {
        return match comment_box.handle_event(event)? {
            CommentEvent::Submit { post_id, content } => {
                tui.comment_box = None;
                Some(Action::SubmitComment { post_id, content })
            }
            CommentEvent::Cancel => {
                tui.comment_box = None;
                None
            }
        };
    }

    let selected = tui.selected_id.clone();
    match event {
        TuiEvent::Escape | TuiEvent::InputChar('q') => Some(Action::Quit),
        TuiEvent::NextView => {
            tui.selected_id = None;
            tui.feed.reset();
            Some(Action::SwitchView(app.view.toggled()))
        }
        TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
            tui.move_selection(app, true);
            None
        }
        TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
            tui.move_selection(app, false);
            None
        }
        TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown => {
            tui.feed.handle_event(event);
            None
        }
        TuiEvent::InputChar('l') => selected.map(Action::ToggleLike),
        TuiEvent::InputChar('b') => selected.map(Action::ToggleBookmark),
        TuiEvent::InputChar('c') => {
            let post = selected.and_then(|id| app.store.get(&id).ok())?;
            tui.comment_box = Some(CommentBox::new(
                post.id.clone(),
                post.author_handle.clone(),
            ));
            None
        }
        TuiEvent::InputChar('r') => Some(Action::Refresh),
        TuiEvent::InputChar('0') => Some(Action::FilterEmotion(None)),
        TuiEvent::InputChar(c) => Emotion::from_digit(*c).map(|e| Action::FilterEmotion(Some(e))),
        _ => None,
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol makes a lone Esc unambiguous; terminals
        // without it ignore the request
        execute!(
            stdout(),
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, DisableBracketedPaste);
    }
}

/// Build the backend from a resolved config.
pub fn build_backend(config: &ResolvedConfig) -> Result<Arc<dyn FeedBackend>, BackendError> {
    let backend = RestBackend::new(
        config.backend_url.clone(),
        config.anon_key.clone(),
        config.access_token.clone(),
    )?;
    Ok(Arc::new(backend))
}

pub fn run(config: ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = build_backend(&config)?;
    info!("Using {} backend at {}", backend.name(), config.backend_url);
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let (write_tx, writer) = spawn_write_worker(app.backend.clone(), tx.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Could not enable terminal modes: {}", e));

    let effect = update(&mut app, Action::Refresh);
    dispatch(effect, &app, &tx, &write_tx);

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(100)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = handle_event(&event, &app, &mut tui) {
                debug!("Key action: {:?}", action);
                let effect = update(&mut app, action);
                should_quit |= dispatch(effect, &app, &tx, &write_tx);
            }
        }

        // Handle background task actions (fetch results, write outcomes)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            tui.sync_selection(&app);
            should_quit |= dispatch(effect, &app, &tx, &write_tx);
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();

    // Let queued likes and comments reach the backend before exiting
    drop(write_tx);
    let flushed = tokio::task::block_in_place(|| {
        tokio::runtime::Handle::current()
            .block_on(async { tokio::time::timeout(WRITE_FLUSH_TIMEOUT, writer).await })
    });
    if flushed.is_err() {
        warn!("Pending writes not flushed within {:?}", WRITE_FLUSH_TIMEOUT);
    }

    info!("FeelTok shutting down");
    Ok(())
}

/// Start the I/O an effect asks for. Returns true when the app should quit.
fn dispatch(
    effect: Effect,
    app: &App,
    tx: &mpsc::Sender<Action>,
    writes: &tokio::sync::mpsc::UnboundedSender<Vec<RemoteWrite>>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::FetchFeed(query) => spawn_fetch(app.backend.clone(), query, tx.clone()),
        Effect::Persist(batch) => {
            if writes.send(batch).is_err() {
                warn!("Write worker stopped; dropping remote writes");
            }
        }
    }
    false
}

fn spawn_fetch(
    backend: Arc<dyn FeedBackend>,
    query: crate::core::model::FeedQuery,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning {} feed fetch", query.view.label());
    tokio::spawn(async move {
        let result = tokio::time::timeout(FETCH_TIMEOUT, backend.fetch_feed(&query)).await;
        let action = match result {
            Ok(Ok(posts)) => Action::FeedLoaded { query, posts },
            Ok(Err(e)) => Action::FeedFailed {
                query,
                message: e.to_string(),
            },
            Err(_) => {
                warn!("Feed fetch timed out after {:?}", FETCH_TIMEOUT);
                Action::FeedFailed {
                    query,
                    message: format!("timed out after {}s", FETCH_TIMEOUT.as_secs()),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send fetch result: receiver dropped");
        }
    });
}

/// Single consumer for remote writes, so batches run strictly in order.
fn spawn_write_worker(
    backend: Arc<dyn FeedBackend>,
    tx: mpsc::Sender<Action>,
) -> (
    tokio::sync::mpsc::UnboundedSender<Vec<RemoteWrite>>,
    tokio::task::JoinHandle<()>,
) {
    let (write_tx, mut write_rx) = tokio::sync::mpsc::unbounded_channel::<Vec<RemoteWrite>>();
    let handle = tokio::spawn(async move {
        while let Some(batch) = write_rx.recv().await {
            let action = match execute_writes(backend.as_ref(), &batch).await {
                Ok(()) => Action::RemoteWriteDone,
                Err(e) => Action::RemoteWriteFailed(e.to_string()),
            };
            if tx.send(action).is_err() {
                // UI is gone; keep draining so queued writes still land
                debug!("Write result dropped: receiver closed");
            }
        }
        debug!("Write worker finished");
    });
    (write_tx, handle)
}
