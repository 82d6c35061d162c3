//! API client library for movie-explorer.
//!
//! Provides a client for the TMDB v3 API and the endpoint derivation used
//! to browse its movie collections.

/// TMDB API client.
pub mod tmdb;
