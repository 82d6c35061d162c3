//! Terminal UI components for movie-explorer.
//!
//! The browse screen is driven by a single reducer ([`state::BrowserState`])
//! that turns user input and fetch results into state changes plus
//! [`state::Command`]s, which the [`executor`] runs against the TMDB API.
//! Rendering uses `ratatui` + `crossterm`.

mod browser;
/// Runs browse commands against the TMDB API.
pub mod executor;
/// Page cursor bounded by the server-reported total.
pub mod pagination;
/// Movie card rendering.
pub mod render;
/// Browse state and reducer.
pub mod state;
mod ui;

pub use browser::{BrowseOptions, run_browser};
