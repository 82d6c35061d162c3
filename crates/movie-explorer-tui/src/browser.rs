//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use movie_explorer_api::tmdb::{SortKey, TmdbApi};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::executor::dispatch;
use crate::state::{BrowserState, Command, Event, InputMode};
use crate::ui;

/// Initial query for the browser.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    /// Initial search text.
    pub search: String,
    /// Initial sort selection (`None` = popular).
    pub sort: Option<SortKey>,
}

/// Result of handling one key press.
#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    /// Keep running; execute these commands.
    Continue(Vec<Command>),
    /// Open this URL in the system browser.
    Open(String),
    /// Exit the browser.
    Quit,
}

/// Runs the movie browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(api: Arc<A>, options: BrowseOptions) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    let mut state = BrowserState::new(options.search, options.sort);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &api).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop: redraws, then waits for a key or a fetch result.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    api: &Arc<A>,
) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(api, state.update(Event::Init), &tx);

    let mut keys = EventStream::new();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            term_event = keys.next() => match term_event {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handle_key(state, key) {
                        KeyOutcome::Continue(commands) => dispatch(api, commands, &tx),
                        KeyOutcome::Open(url) => open_url(&url),
                        KeyOutcome::Quit => return Ok(()),
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read event"),
                None => return Ok(()),
            },
            Some(event) = rx.recv() => {
                dispatch(api, state.update(event), &tx);
            }
        }
    }
}

/// Handles one key press.
fn handle_key(state: &mut BrowserState, key: KeyEvent) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }
    match state.input_mode {
        InputMode::Search => KeyOutcome::Continue(handle_search_input(state, key.code)),
        InputMode::Normal => handle_normal_input(state, key.code),
    }
}

/// Handles key input in search mode. Every edit re-queries.
fn handle_search_input(state: &mut BrowserState, key: KeyCode) -> Vec<Command> {
    match key {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.update(Event::SearchChanged(String::new()))
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
            Vec::new()
        }
        KeyCode::Backspace => {
            let mut search = state.search().to_owned();
            if search.pop().is_none() {
                return Vec::new();
            }
            state.update(Event::SearchChanged(search))
        }
        KeyCode::Char(c) => {
            let mut search = state.search().to_owned();
            search.push(c);
            state.update(Event::SearchChanged(search))
        }
        _ => Vec::new(),
    }
}

/// Handles key input in normal mode.
fn handle_normal_input(state: &mut BrowserState, key: KeyCode) -> KeyOutcome {
    let commands = match key {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Search;
            Vec::new()
        }
        KeyCode::Char('s') => state.update(Event::SortChanged(SortKey::cycle(state.sort(), true))),
        KeyCode::Char('S') => {
            state.update(Event::SortChanged(SortKey::cycle(state.sort(), false)))
        }
        KeyCode::Left | KeyCode::Char('h') => state.update(Event::PrevPage),
        KeyCode::Right | KeyCode::Char('l') => state.update(Event::NextPage),
        KeyCode::Char('g') => state.update(Event::FirstPage),
        KeyCode::Char('G') => state.update(Event::LastPage),
        KeyCode::Char('r') => state.update(Event::Reload),
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_up();
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_down();
            Vec::new()
        }
        KeyCode::Char('o') => {
            if let Some(url) = state
                .selected_card()
                .and_then(|card| card.poster.url().map(str::to_owned))
            {
                return KeyOutcome::Open(url);
            }
            Vec::new()
        }
        _ => Vec::new(),
    };
    KeyOutcome::Continue(commands)
}

/// Opens a URL in the system browser, logging failures.
fn open_url(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open URL");
    }
}
