//! Search-as-you-type over the movie search endpoint.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use nolly_api::catalog::{CatalogItem, DEFAULT_LANGUAGE, Paginated, SearchMovieParams};
use unicode_normalization::UnicodeNormalization;

use crate::client::QueryClient;
use crate::debounce::Debouncer;
use crate::endpoint::QueryDef;
use crate::error::QueryError;
use crate::lazy::LazyQuery;
use crate::state::QueryState;

/// Quiet period before a search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced text input bound to a lazy movie search.
pub struct SearchAsYouType {
    input: Debouncer<String>,
    query: LazyQuery<SearchMovieParams, Paginated<CatalogItem>>,
    language: String,
}

impl SearchAsYouType {
    /// Search over `def` with the default quiet period.
    ///
    /// Must be called within a Tokio runtime.
    #[must_use]
    pub fn new(
        client: &QueryClient,
        def: &QueryDef<SearchMovieParams, Paginated<CatalogItem>>,
    ) -> Self {
        Self::with_delay(client, def, SEARCH_DEBOUNCE)
    }

    /// Search over `def` with a custom quiet period.
    #[must_use]
    pub fn with_delay(
        client: &QueryClient,
        def: &QueryDef<SearchMovieParams, Paginated<CatalogItem>>,
        delay: Duration,
    ) -> Self {
        Self {
            input: Debouncer::new(String::new(), delay),
            query: client.lazy(def),
            language: String::from(DEFAULT_LANGUAGE),
        }
    }

    /// Sets the result language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Records a keystroke. Text is NFC-normalized so composed and
    /// decomposed input share a cache entry.
    pub fn input(&self, text: &str) {
        self.input.push(text.nfc().collect());
    }

    /// Current debounced text.
    #[must_use]
    pub fn text(&self) -> String {
        self.input.value()
    }

    /// Waits for the debounced text to change, then searches for it.
    ///
    /// Returns `Ok(None)` when the text is blank; results are cleared and
    /// no request is made.
    ///
    /// # Errors
    ///
    /// Returns the search request's error.
    pub async fn results(&mut self) -> Result<Option<Arc<Paginated<CatalogItem>>>, QueryError> {
        let Some(text) = self.input.changed().await else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("search cleared");
            self.query.reset();
            return Ok(None);
        }

        tracing::debug!(query = %text, "searching");
        let params = SearchMovieParams::new(text).language(self.language.clone());
        self.query.trigger_cached(params).await.map(Some)
    }

    /// State of the last search.
    #[must_use]
    pub fn state(&self) -> QueryState<Paginated<CatalogItem>> {
        self.query.state()
    }
}

impl fmt::Debug for SearchAsYouType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchAsYouType")
            .field("input", &self.input)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
