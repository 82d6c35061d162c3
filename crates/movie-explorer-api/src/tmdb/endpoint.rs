//! Movie collection endpoints and their derivation from browse inputs.

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Sort orders offered for the `discover/movie` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// `primary_release_date.asc`
    ReleaseDateAsc,
    /// `primary_release_date.desc`
    ReleaseDateDesc,
    /// `vote_average.asc`
    RatingAsc,
    /// `vote_average.desc`
    RatingDesc,
}

impl SortKey {
    /// All sort keys in menu order.
    pub const ALL: [Self; 4] = [
        Self::ReleaseDateAsc,
        Self::ReleaseDateDesc,
        Self::RatingAsc,
        Self::RatingDesc,
    ];

    /// Returns the `sort_by` query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReleaseDateAsc => "primary_release_date.asc",
            Self::ReleaseDateDesc => "primary_release_date.desc",
            Self::RatingAsc => "vote_average.asc",
            Self::RatingDesc => "vote_average.desc",
        }
    }

    /// Returns the human-readable menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReleaseDateAsc => "Release Date (Asc)",
            Self::ReleaseDateDesc => "Release Date (Desc)",
            Self::RatingAsc => "Rating (Asc)",
            Self::RatingDesc => "Rating (Desc)",
        }
    }

    /// Steps through `None` (popular) and every sort key, wrapping around.
    #[must_use]
    pub fn cycle(current: Option<Self>, forward: bool) -> Option<Self> {
        let position = current.and_then(|key| Self::ALL.iter().position(|k| *k == key));
        let last = Self::ALL.len().saturating_sub(1);
        let next = match (position, forward) {
            (None, true) => Some(0),
            (None, false) => Some(last),
            (Some(i), true) if i == last => None,
            (Some(i), true) => Some(i.saturating_add(1)),
            (Some(0), false) => None,
            (Some(i), false) => Some(i.saturating_sub(1)),
        };
        next.and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected one of: {keys})", keys = sort_key_list())]
pub struct ParseSortKeyError(String);

fn sort_key_list() -> String {
    SortKey::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseSortKeyError(String::from(s)))
    }
}

/// A movie collection to browse; a request URL without its `page` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `movie/popular`
    Popular,
    /// `search/movie` by title.
    Search {
        /// Search text (trimmed, non-empty).
        query: String,
    },
    /// `discover/movie` with a sort order.
    Discover {
        /// Sort order.
        sort_by: SortKey,
    },
}

impl Endpoint {
    /// Derives the endpoint from the search text and sort selection.
    ///
    /// Search wins over sort; with neither set the popular list is used.
    #[must_use]
    pub fn derive(search: &str, sort: Option<SortKey>) -> Self {
        let query = search.trim();
        if !query.is_empty() {
            return Self::Search {
                query: String::from(query),
            };
        }
        sort.map_or(Self::Popular, |sort_by| Self::Discover { sort_by })
    }

    /// Path relative to the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Popular => "movie/popular",
            Self::Search { .. } => "search/movie",
            Self::Discover { .. } => "discover/movie",
        }
    }

    /// Query parameters for this endpoint, excluding `page`.
    #[must_use]
    pub fn query(&self, language: &str) -> Vec<(&'static str, String)> {
        match self {
            Self::Popular => vec![("language", String::from(language))],
            Self::Search { query } => vec![
                ("query", query.clone()),
                ("include_adult", String::from("false")),
                ("language", String::from(language)),
            ],
            Self::Discover { sort_by } => vec![
                ("include_adult", String::from("false")),
                ("include_video", String::from("false")),
                ("language", String::from(language)),
                ("sort_by", String::from(sort_by.as_str())),
            ],
        }
    }

    /// Builds the endpoint template URL (everything but `page`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto `base_url`.
    pub fn template_url(&self, base_url: &Url, language: &str) -> Result<Url, url::ParseError> {
        let mut url = base_url.join(self.path())?;
        url.query_pairs_mut().extend_pairs(self.query(language));
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Popular => f.write_str("Popular"),
            Self::Search { query } => write!(f, "Search \"{query}\""),
            Self::Discover { sort_by } => write!(f, "Discover by {}", sort_by.label()),
        }
    }
}
