//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::endpoint::Endpoint;
use super::error::TmdbError;
use super::types::{MoviePage, ServiceConfig};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the service configuration (image base URL and sizes).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn configuration(&self) -> Result<ServiceConfig, TmdbError>;

    /// Fetches one page of the movie collection identified by `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_page(&self, endpoint: &Endpoint, page: u32) -> Result<MoviePage, TmdbError>;
}
