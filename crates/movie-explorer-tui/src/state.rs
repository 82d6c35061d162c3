//! Browse state and the reducer that drives it.
//!
//! Every input (key presses translated into [`Event`]s, and fetch results
//! coming back from the executor) goes through [`BrowserState::update`],
//! which applies all derived resets in one place and returns the
//! [`Command`]s to run. Fetches are tagged with a [`RequestTicket`]; only
//! the response to the most recently issued ticket is accepted.

use std::fmt;

use movie_explorer_api::tmdb::{
    Endpoint, Movie, MoviePage, ServiceConfig, SortKey, TmdbError,
};
use ratatui::widgets::TableState;

use crate::pagination::Pagination;
use crate::render::{MovieCard, render_cards};

/// Message shown when a fetch succeeds with zero results.
pub const NO_RESULTS_MESSAGE: &str = "No Movies Found That Match Your Criteria";

/// Monotonically increasing identity of a movie fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Returns the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle of the current movie fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing requested yet.
    Idle,
    /// Waiting for the response to this ticket.
    Fetching(RequestTicket),
    /// Latest response had results.
    Loaded,
    /// Latest response was empty or failed.
    Failed,
}

/// User-facing error replacing the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseError {
    /// Successful response with zero results.
    NoResults,
    /// HTTP, network, or decode failure.
    Fetch(String),
}

impl fmt::Display for BrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResults => f.write_str(NO_RESULTS_MESSAGE),
            Self::Fetch(message) => write!(f, "Failed To Load Movies. {message}"),
        }
    }
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// Inputs to the reducer.
#[derive(Debug)]
pub enum Event {
    /// Startup: loads configuration and the first page.
    Init,
    /// The search text changed (full new value).
    SearchChanged(String),
    /// The sort selection changed (`None` = popular).
    SortChanged(Option<SortKey>),
    /// Jump to a page.
    GoToPage(u32),
    /// Next page.
    NextPage,
    /// Previous page.
    PrevPage,
    /// First page.
    FirstPage,
    /// Last page.
    LastPage,
    /// Re-issue the current request.
    Reload,
    /// Configuration fetch finished.
    ConfigurationLoaded(Result<ServiceConfig, TmdbError>),
    /// Movie fetch finished.
    MoviesLoaded {
        /// Ticket of the request this answers.
        ticket: RequestTicket,
        /// Outcome.
        result: Result<MoviePage, TmdbError>,
    },
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the service configuration.
    LoadConfiguration,
    /// Fetch one page of movies.
    FetchMovies {
        /// Ticket identifying this request.
        ticket: RequestTicket,
        /// Collection to fetch.
        endpoint: Endpoint,
        /// Page number.
        page: u32,
    },
}

/// What the main area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Only an error message.
    Error(String),
    /// Nothing to show yet; a fetch is pending.
    Loading,
    /// Rendered movie cards.
    Cards(Vec<MovieCard>),
}

/// State for the movie browser.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Search text as typed.
    search: String,
    /// Sort selection (`None` = popular).
    sort: Option<SortKey>,
    /// Current endpoint template.
    endpoint: Endpoint,
    /// Page cursor.
    pagination: Pagination,
    /// Movies of the latest accepted response.
    movies: Vec<Movie>,
    /// Service configuration, once loaded.
    config: Option<ServiceConfig>,
    /// Whether the configuration fetch has been issued.
    config_requested: bool,
    /// User-facing error.
    error: Option<BrowseError>,
    /// Fetch lifecycle.
    status: FetchStatus,
    /// Sequence number for the next ticket.
    next_ticket: u64,
    /// Table state for the result list (handles selection and scroll).
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(String::new(), None)
    }
}

impl BrowserState {
    /// Creates a browser with initial search text and sort selection.
    ///
    /// No request is issued until [`Event::Init`].
    #[must_use]
    pub fn new(search: String, sort: Option<SortKey>) -> Self {
        let endpoint = Endpoint::derive(&search, sort);
        Self {
            search,
            sort,
            endpoint,
            pagination: Pagination::new(),
            movies: Vec::new(),
            config: None,
            config_requested: false,
            error: None,
            status: FetchStatus::Idle,
            next_ticket: 1,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
        }
    }

    /// Returns the search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the sort selection.
    #[must_use]
    pub const fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    /// Returns the current endpoint template.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the page cursor.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Returns the current page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.pagination.page()
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }

    /// Returns the movies of the latest accepted response.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Returns the service configuration, if loaded.
    #[must_use]
    pub const fn config(&self) -> Option<&ServiceConfig> {
        self.config.as_ref()
    }

    /// Returns the user-facing error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&BrowseError> {
        self.error.as_ref()
    }

    /// Returns the fetch lifecycle state.
    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    /// Returns `true` while a fetch is outstanding.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        matches!(self.status, FetchStatus::Fetching(_))
    }

    /// Returns the selection cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the card under the cursor, if the list is shown.
    #[must_use]
    pub fn selected_card(&self) -> Option<MovieCard> {
        if self.error.is_some() {
            return None;
        }
        let movie = self.movies.get(self.cursor())?;
        Some(crate::render::render_card(movie, self.config.as_ref()))
    }

    /// Computes what the main area shows.
    #[must_use]
    pub fn view(&self) -> View {
        if let Some(error) = &self.error {
            return View::Error(error.to_string());
        }
        if self.movies.is_empty() && self.is_fetching() {
            return View::Loading;
        }
        View::Cards(render_cards(&self.movies, self.config.as_ref()))
    }

    /// Applies an event and returns the commands to execute.
    pub fn update(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Init => self.init(),
            Event::SearchChanged(search) => {
                self.search = search;
                self.apply_query()
            }
            Event::SortChanged(sort) => {
                self.sort = sort;
                self.apply_query()
            }
            Event::GoToPage(target) => self.go_to_page(target),
            Event::NextPage => self.go_to_page(self.page().saturating_add(1)),
            Event::PrevPage => self.go_to_page(self.page().saturating_sub(1)),
            Event::FirstPage => self.go_to_page(1),
            Event::LastPage => self.go_to_page(self.total_pages()),
            Event::Reload => vec![self.begin_fetch()],
            Event::ConfigurationLoaded(result) => {
                self.configuration_loaded(result);
                Vec::new()
            }
            Event::MoviesLoaded { ticket, result } => self.movies_loaded(ticket, result),
        }
    }

    /// Moves the selection cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
    }

    /// Moves the selection cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.cursor();
        if current + 1 < self.movies.len() {
            self.table_state.select(Some(current + 1));
        }
    }

    /// Resets selection and scroll to the top of the list.
    pub fn scroll_to_top(&mut self) {
        *self.table_state.offset_mut() = 0;
        let first = if self.movies.is_empty() { None } else { Some(0) };
        self.table_state.select(first);
    }

    fn init(&mut self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(2);
        if !self.config_requested {
            self.config_requested = true;
            commands.push(Command::LoadConfiguration);
        }
        commands.push(self.begin_fetch());
        commands
    }

    /// Re-derives the endpoint after a search or sort change.
    ///
    /// Always resets the page to 1. A new endpoint also forgets the old
    /// total until its first response arrives. A fetch is issued only if the
    /// endpoint or page actually changed.
    fn apply_query(&mut self) -> Vec<Command> {
        let endpoint = Endpoint::derive(&self.search, self.sort);
        let new_endpoint = endpoint != self.endpoint;
        let changed = new_endpoint || self.pagination.page() != 1;
        self.endpoint = endpoint;
        if new_endpoint {
            self.pagination.forget_total();
        } else {
            self.pagination.reset();
        }
        if !changed {
            return Vec::new();
        }
        self.scroll_to_top();
        vec![self.begin_fetch()]
    }

    fn go_to_page(&mut self, target: u32) -> Vec<Command> {
        let before = self.pagination.page();
        if !self.pagination.go_to(target) {
            tracing::debug!(
                target,
                total_pages = self.pagination.total_pages(),
                "page out of range"
            );
            return Vec::new();
        }
        self.scroll_to_top();
        if self.pagination.page() == before {
            return Vec::new();
        }
        vec![self.begin_fetch()]
    }

    /// Issues a fresh ticket and enters `Fetching`, clearing any error.
    #[allow(clippy::arithmetic_side_effects)]
    fn begin_fetch(&mut self) -> Command {
        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;
        self.status = FetchStatus::Fetching(ticket);
        self.error = None;
        Command::FetchMovies {
            ticket,
            endpoint: self.endpoint.clone(),
            page: self.pagination.page(),
        }
    }

    fn configuration_loaded(&mut self, result: Result<ServiceConfig, TmdbError>) {
        match result {
            Ok(config) => {
                if self.config.is_none() {
                    tracing::debug!(base_url = %config.images.base_url, "TMDB configuration loaded");
                    self.config = Some(config);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load TMDB configuration; posters disabled");
            }
        }
    }

    /// Accepts the response for the outstanding ticket.
    ///
    /// If the reported total puts the requested page out of range, the cursor
    /// moves to the last page and that page is fetched instead.
    fn movies_loaded(
        &mut self,
        ticket: RequestTicket,
        result: Result<MoviePage, TmdbError>,
    ) -> Vec<Command> {
        if self.status != FetchStatus::Fetching(ticket) {
            tracing::debug!(ticket = ticket.get(), "discarding stale movie response");
            return Vec::new();
        }

        match result {
            Ok(page) => {
                let requested = self.pagination.page();
                if self.pagination.set_total_pages(page.total_pages) {
                    tracing::debug!(
                        requested,
                        total_pages = self.pagination.total_pages(),
                        "requested page past the end; fetching last page"
                    );
                    return vec![self.begin_fetch()];
                }
                self.movies = page.results;
                if self.movies.is_empty() {
                    self.error = Some(BrowseError::NoResults);
                    self.status = FetchStatus::Failed;
                } else {
                    self.status = FetchStatus::Loaded;
                }
                self.scroll_to_top();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch movies");
                self.movies.clear();
                self.error = Some(BrowseError::Fetch(e.to_string()));
                self.status = FetchStatus::Failed;
                self.scroll_to_top();
            }
        }
        Vec::new()
    }
}
