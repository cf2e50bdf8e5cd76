//! Catalog request parameters.

use crate::ids::MovieId;

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default sort order for discover endpoints.
pub const DEFAULT_SORT_BY: &str = "popularity.desc";

/// Parameters for paged listing endpoints
/// (`movie/popular`, `movie/now_playing`, `movie/upcoming`, `person/popular`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListParams {
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Response language (default: "en-US").
    pub language: String,
    /// Region filter (ISO 3166-1).
    pub region: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            language: String::from(DEFAULT_LANGUAGE),
            region: None,
        }
    }
}

impl ListParams {
    /// Creates params for the given page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the region filter.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Returns a copy pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Query-string pairs, in a fixed order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("language", self.language.clone()),
            ("page", self.page.to_string()),
        ];
        if let Some(ref region) = self.region {
            query.push(("region", region.clone()));
        }
        query
    }
}

/// Parameters for `discover/movie` and `discover/tv`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoverParams {
    /// Page, language and region.
    pub list: ListParams,
    /// Sort order (default: "popularity.desc").
    pub sort_by: String,
    /// Include adult content.
    pub include_adult: bool,
    /// Include titles that are only videos (movies only).
    pub include_video: bool,
}

impl Default for DiscoverParams {
    fn default() -> Self {
        Self {
            list: ListParams::default(),
            sort_by: String::from(DEFAULT_SORT_BY),
            include_adult: false,
            include_video: true,
        }
    }
}

impl DiscoverParams {
    /// Creates params for the given page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            list: ListParams::page(page),
            ..Self::default()
        }
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Sets the adult-content flag.
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Returns a copy pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            list: self.list.with_page(page),
            ..self.clone()
        }
    }

    /// Query-string pairs, in a fixed order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("include_adult", self.include_adult.to_string()),
            ("include_video", self.include_video.to_string()),
        ];
        query.extend(self.list.query_pairs());
        query.push(("sort_by", self.sort_by.clone()));
        query
    }
}

/// Parameters for `search/movie`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Page, language and region.
    pub list: ListParams,
    /// Filter by year.
    pub year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            list: ListParams::default(),
            year: None,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.list.page = page;
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.list.language = language.into();
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Returns a copy pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            list: self.list.with_page(page),
            ..self.clone()
        }
    }

    /// Query-string pairs, in a fixed order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("query", self.query.clone()),
            ("include_adult", self.include_adult.to_string()),
        ];
        query.extend(self.list.query_pairs());
        if let Some(year) = self.year {
            query.push(("year", year.to_string()));
        }
        query
    }
}

/// Identifies one movie for the per-movie endpoints
/// (`movie/{id}`, `movie/{id}/credits`, `movie/{id}/videos`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieLookup {
    /// Movie ID.
    pub id: MovieId,
    /// Response language.
    pub language: String,
}

impl MovieLookup {
    /// Looks up `id` in the default language.
    #[must_use]
    pub fn new(id: MovieId) -> Self {
        Self {
            id,
            language: String::from(DEFAULT_LANGUAGE),
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
