//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves the
//! service configuration and paginated movie collections.

mod api;
mod client;
mod endpoint;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, TmdbClient, TmdbClientBuilder};
pub use endpoint::{Endpoint, ParseSortKeyError, SortKey};
#[allow(clippy::module_name_repetitions)]
pub use error::TmdbError;
pub use types::{ImagesConfig, MAX_PAGES, Movie, MoviePage, ServiceConfig, TmdbErrorResponse};
