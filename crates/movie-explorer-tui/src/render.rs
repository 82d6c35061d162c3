//! Maps fetched movies plus service configuration into display cards.

use std::fmt;

use movie_explorer_api::tmdb::{Movie, ServiceConfig};

/// Shown in place of a poster URL when none can be resolved.
pub const PLACEHOLDER_POSTER: &str = "(no image)";

/// Poster reference for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Fully resolved image URL.
    Url(String),
    /// No poster available; the placeholder is shown.
    Placeholder,
}

impl Poster {
    /// Returns the URL, if resolved.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Placeholder => None,
        }
    }
}

impl fmt::Display for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Placeholder => f.write_str(PLACEHOLDER_POSTER),
        }
    }
}

/// One rendered movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Release date as delivered (may be empty).
    pub release_date: String,
    /// Vote average with one decimal place.
    pub rating: String,
    /// Poster.
    pub poster: Poster,
    /// Overview text (may be empty).
    pub overview: String,
}

/// Formats a vote average to one decimal place.
#[must_use]
pub fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

/// Resolves the poster for `movie`.
///
/// Falls back to [`Poster::Placeholder`] when the movie has no poster path
/// or the service configuration is not loaded.
#[must_use]
pub fn resolve_poster(movie: &Movie, config: Option<&ServiceConfig>) -> Poster {
    movie
        .poster_path
        .as_deref()
        .zip(config)
        .and_then(|(path, config)| config.poster_url(path))
        .map_or(Poster::Placeholder, Poster::Url)
}

/// Renders a single movie card.
#[must_use]
pub fn render_card(movie: &Movie, config: Option<&ServiceConfig>) -> MovieCard {
    MovieCard {
        id: movie.id,
        title: movie.title.clone(),
        release_date: movie.release_date.clone().unwrap_or_default(),
        rating: format_rating(movie.vote_average),
        poster: resolve_poster(movie, config),
        overview: movie.overview.clone().unwrap_or_default(),
    }
}

/// Renders all movies, preserving order.
#[must_use]
pub fn render_cards(movies: &[Movie], config: Option<&ServiceConfig>) -> Vec<MovieCard> {
    movies.iter().map(|m| render_card(m, config)).collect()
}
