//! TMDB API response types.

use serde::Deserialize;

/// Highest page number TMDB serves for list endpoints.
pub const MAX_PAGES: u32 = 500;

/// Index into `poster_sizes` used for rendered posters.
const POSTER_SIZE_INDEX: usize = 2;

// --- Configuration ---

/// Response from the `configuration` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Image URL metadata.
    pub images: ImagesConfig,
}

/// Image section of the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImagesConfig {
    /// Base URL for images (e.g. `http://image.tmdb.org/t/p/`).
    pub base_url: String,
    /// HTTPS base URL for images.
    #[serde(default)]
    pub secure_base_url: String,
    /// Available poster widths, smallest first.
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}

impl ServiceConfig {
    /// Resolves the full poster URL for a `poster_path`.
    ///
    /// Uses the third poster size. Returns `None` when the configuration
    /// lists fewer than three sizes.
    #[must_use]
    pub fn poster_url(&self, poster_path: &str) -> Option<String> {
        let size = self.images.poster_sizes.get(POSTER_SIZE_INDEX)?;
        Some(format!("{}{size}{poster_path}", self.images.base_url))
    }
}

// --- Movie lists ---

/// One page of a movie collection (`movie/popular`, `search/movie`,
/// `discover/movie`).
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<Movie>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

const fn first_page() -> u32 {
    1
}

/// A single movie entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
