//! Cache keys and argument normalization.

use std::fmt;

use nolly_api::catalog::{DiscoverParams, ListParams, MovieLookup, SearchMovieParams};
use nolly_api::{MovieId, UserId, WatchlistId};
use url::form_urlencoded;

/// Arguments of a query endpoint.
///
/// `normalized` must return the same string for arguments that should
/// share a cache entry.
pub trait QueryArgs: Clone + Send + Sync + 'static {
    /// Stable string form used in the cache key.
    fn normalized(&self) -> String;
}

/// Arguments of a paged listing endpoint.
pub trait PagedArgs: QueryArgs + PartialEq {
    /// Page these arguments point at.
    fn page(&self) -> u32;

    /// Copy pointing at `page`.
    #[must_use]
    fn with_page(&self, page: u32) -> Self;
}

/// Cache entry address: endpoint name plus normalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Endpoint name.
    pub endpoint: &'static str,
    /// Normalized arguments.
    pub args: String,
}

impl QueryKey {
    /// Builds the key for `endpoint` called with `args`.
    pub fn new<A: QueryArgs>(endpoint: &'static str, args: &A) -> Self {
        Self {
            endpoint,
            args: args.normalized(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

/// Encodes query pairs sorted by key.
fn encode_pairs(mut pairs: Vec<(&'static str, String)>) -> String {
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

impl QueryArgs for () {
    fn normalized(&self) -> String {
        String::new()
    }
}

impl QueryArgs for String {
    fn normalized(&self) -> String {
        self.clone()
    }
}

impl QueryArgs for MovieId {
    fn normalized(&self) -> String {
        self.to_string()
    }
}

impl QueryArgs for UserId {
    fn normalized(&self) -> String {
        self.0.clone()
    }
}

impl QueryArgs for WatchlistId {
    fn normalized(&self) -> String {
        self.0.clone()
    }
}

impl QueryArgs for MovieLookup {
    fn normalized(&self) -> String {
        encode_pairs(vec![
            ("id", self.id.to_string()),
            ("language", self.language.clone()),
        ])
    }
}

impl QueryArgs for ListParams {
    fn normalized(&self) -> String {
        encode_pairs(self.query_pairs())
    }
}

impl QueryArgs for DiscoverParams {
    fn normalized(&self) -> String {
        encode_pairs(self.query_pairs())
    }
}

impl QueryArgs for SearchMovieParams {
    fn normalized(&self) -> String {
        encode_pairs(self.query_pairs())
    }
}

impl PagedArgs for ListParams {
    fn page(&self) -> u32 {
        self.page
    }

    fn with_page(&self, page: u32) -> Self {
        Self::with_page(self, page)
    }
}

impl PagedArgs for DiscoverParams {
    fn page(&self) -> u32 {
        self.list.page
    }

    fn with_page(&self, page: u32) -> Self {
        Self::with_page(self, page)
    }
}

impl PagedArgs for SearchMovieParams {
    fn page(&self) -> u32 {
        self.list.page
    }

    fn with_page(&self, page: u32) -> Self {
        Self::with_page(self, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_args_share_a_key() {
        // Arrange
        let a = DiscoverParams::page(2);
        let b = DiscoverParams::default().with_page(2);

        // Act & Assert
        assert_eq!(
            QueryKey::new("discover_movies", &a),
            QueryKey::new("discover_movies", &b)
        );
    }

    #[test]
    fn test_page_is_part_of_the_key() {
        // Arrange
        let first = ListParams::page(1);
        let second = ListParams::page(2);

        // Act & Assert
        assert_ne!(
            QueryKey::new("popular_movies", &first),
            QueryKey::new("popular_movies", &second)
        );
    }

    #[test]
    fn test_search_text_is_escaped() {
        // Arrange
        let params = SearchMovieParams::new("fast & furious");

        // Act
        let key = QueryKey::new("search_movies", &params);

        // Assert
        assert!(key.args.contains("query=fast+%26+furious"));
        assert!(key.to_string().starts_with("search_movies("));
    }

    #[test]
    fn test_paged_args_with_page() {
        // Arrange
        let params = SearchMovieParams::new("dune");

        // Act
        let next = PagedArgs::with_page(&params, 3);

        // Assert
        assert_eq!(PagedArgs::page(&next), 3);
        assert_eq!(next.query, "dune");
    }
}
