//! Accumulating "load more" listings.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use nolly_api::catalog::{CatalogItem, Paginated, Person};
use nolly_api::{MovieId, PersonId};

use crate::client::QueryClient;
use crate::endpoint::QueryDef;
use crate::error::QueryError;
use crate::key::PagedArgs;

/// Items with a stable identity, used to drop repeats across pages.
pub trait Identified {
    /// Identity type.
    type Id: Eq + Hash + Copy + fmt::Debug;

    /// Identity of this item.
    fn id(&self) -> Self::Id;
}

impl Identified for CatalogItem {
    type Id = MovieId;

    fn id(&self) -> MovieId {
        self.id
    }
}

impl Identified for Person {
    type Id = PersonId;

    fn id(&self) -> PersonId {
        self.id
    }
}

/// Page cursor plus the items accumulated so far for one root query.
///
/// The root is the listing's arguments with the page reset to 1. Changing
/// it resets the cursor and the items together.
#[derive(Debug, Clone)]
pub struct PagedList<A, T: Identified> {
    root: A,
    page: u32,
    loaded_through: u32,
    items: Vec<T>,
    seen: HashSet<T::Id>,
    total_pages: Option<u32>,
    total_results: Option<u32>,
}

impl<A: PagedArgs, T: Identified + Clone> PagedList<A, T> {
    /// Empty list positioned on page 1 of `root`.
    #[must_use]
    pub fn new(root: &A) -> Self {
        Self {
            root: root.with_page(1),
            page: 1,
            loaded_through: 0,
            items: Vec::new(),
            seen: HashSet::new(),
            total_pages: None,
            total_results: None,
        }
    }

    /// Root arguments (page 1).
    #[must_use]
    pub const fn root(&self) -> &A {
        &self.root
    }

    /// Page the cursor points at.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Arguments for the page the cursor points at.
    #[must_use]
    pub fn request(&self) -> A {
        self.root.with_page(self.page)
    }

    /// Appends the items of `response`, fetched with `args`.
    ///
    /// Returns `false` when the page is ignored: it belongs to another
    /// root, it is not the page the cursor points at, or it was already
    /// accepted.
    pub fn accept(&mut self, args: &A, response: &Paginated<T>) -> bool {
        let page = PagedArgs::page(args);
        if args.with_page(1) != self.root {
            tracing::debug!(page, "ignoring page for a different root");
            return false;
        }
        if page != self.page || page <= self.loaded_through {
            tracing::debug!(page, expected = self.page, "ignoring unexpected page");
            return false;
        }

        let before = self.items.len();
        for item in &response.results {
            if self.seen.insert(item.id()) {
                self.items.push(item.clone());
            }
        }
        let dropped = response.results.len() - (self.items.len() - before);
        if dropped > 0 {
            tracing::debug!(page, dropped, "dropped duplicate items");
        }

        self.loaded_through = page;
        self.total_pages = Some(response.total_pages);
        self.total_results = Some(response.total_results);
        true
    }

    /// Moves the cursor to the next page once the current one is loaded.
    ///
    /// Returns `false` on the last page.
    pub fn advance(&mut self) -> bool {
        if self.needs_load() || !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Whether the page under the cursor still has to be fetched.
    #[must_use]
    pub const fn needs_load(&self) -> bool {
        self.loaded_through < self.page
    }

    /// Whether a page after the last loaded one exists.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.total_pages
            .is_none_or(|total| self.loaded_through < total)
    }

    /// Starts over for `root`.
    pub fn reset(&mut self, root: &A) {
        *self = Self::new(root);
    }

    /// Items accumulated so far, in page order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total result count reported by the last accepted page.
    #[must_use]
    pub const fn total_results(&self) -> Option<u32> {
        self.total_results
    }
}

/// Drives a [`PagedList`] through the query client.
pub struct Paginator<A, T: Identified> {
    client: QueryClient,
    def: QueryDef<A, Paginated<T>>,
    list: PagedList<A, T>,
}

impl<A, T> Paginator<A, T>
where
    A: PagedArgs,
    T: Identified + Clone + Send + Sync + 'static,
{
    /// Paginator for listing `def`, starting at `root`.
    pub fn new(client: QueryClient, def: QueryDef<A, Paginated<T>>, root: &A) -> Self {
        Self {
            client,
            def,
            list: PagedList::new(root),
        }
    }

    /// Loads page 1 if it has not been loaded yet.
    ///
    /// # Errors
    ///
    /// Returns the query error for page 1.
    pub async fn load_first(&mut self) -> Result<&[T], QueryError> {
        if self.list.loaded_through == 0 {
            self.load_current().await?;
        }
        Ok(self.list.items())
    }

    /// Loads the next page, or retries the current one if it failed.
    ///
    /// Returns `Ok(false)` when there is nothing more to load.
    ///
    /// # Errors
    ///
    /// Returns the query error for the requested page; accumulated items
    /// are kept and the next call retries the same page.
    pub async fn load_more(&mut self) -> Result<bool, QueryError> {
        if !self.list.needs_load() && !self.list.advance() {
            return Ok(false);
        }
        self.load_current().await
    }

    /// Switches to a new root, discarding accumulated items when it differs.
    pub fn set_root(&mut self, root: &A) {
        if root.with_page(1) != self.list.root {
            tracing::debug!(endpoint = self.def.name(), "listing root changed");
            self.list.reset(root);
        }
    }

    /// Accumulated state.
    #[must_use]
    pub const fn list(&self) -> &PagedList<A, T> {
        &self.list
    }

    async fn load_current(&mut self) -> Result<bool, QueryError> {
        let args = self.list.request();
        let response: Arc<Paginated<T>> = self.client.fetch(&self.def, args.clone()).await?;
        Ok(self.list.accept(&args, &response))
    }
}

impl<A: fmt::Debug, T: Identified + fmt::Debug> fmt::Debug for Paginator<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("def", &self.def)
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use nolly_api::catalog::{CatalogClient, ListParams};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::slices::CatalogEndpoints;

    const PAGE_ONE: &str = include_str!("../../../fixtures/catalog/movie_popular_page1.json");
    const PAGE_TWO: &str = include_str!("../../../fixtures/catalog/movie_popular_page2.json");

    fn page(json: &str) -> Paginated<CatalogItem> {
        serde_json::from_str(json).unwrap()
    }

    fn page_one() -> Paginated<CatalogItem> {
        page(PAGE_ONE)
    }

    fn page_two() -> Paginated<CatalogItem> {
        page(PAGE_TWO)
    }

    fn ids(list: &PagedList<ListParams, CatalogItem>) -> Vec<u64> {
        list.items().iter().map(|item| item.id.0).collect()
    }

    fn popular_paginator(
        server: &MockServer,
        root: &ListParams,
    ) -> Paginator<ListParams, CatalogItem> {
        let api = CatalogClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .access_token("test-token")
            .user_agent("nolly-test")
            .min_interval(Duration::ZERO)
            .build()
            .unwrap();
        let catalog = CatalogEndpoints::new(Arc::new(api));
        Paginator::new(QueryClient::builder().build(), catalog.popular_movies, root)
    }

    async fn mount_page(server: &MockServer, language: &str, page: &str, body: &'static str) {
        Mock::given(method("GET"))
            .and(path("/3/movie/popular"))
            .and(query_param("language", language))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_disjoint_pages_accumulate_in_order() {
        // Arrange
        let root = ListParams::page(1);
        let mut list = PagedList::new(&root);
        let first = page_one();
        let mut second = page_two();
        second.results.retain(|item| item.id != MovieId(1_022_789));

        // Act
        let accepted_first = list.accept(&root, &first);
        let advanced = list.advance();
        let accepted_second = list.accept(&root.with_page(2), &second);

        // Assert
        assert!(accepted_first && advanced && accepted_second);
        assert_eq!(list.items().len(), first.results.len() + second.results.len());
        assert_eq!(ids(&list), vec![533_535, 1_022_789, 1_034_541, 519_182]);
        assert_eq!(list.page(), 2);
    }

    #[test]
    fn test_overlapping_pages_drop_duplicates() {
        // Arrange
        let root = ListParams::page(1);
        let mut list = PagedList::new(&root);
        list.accept(&root, &page_one());
        list.advance();

        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .with_fields(expect::msg("dropped duplicate items"))
                    .at_level(tracing::Level::DEBUG),
            )
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            list.accept(&root.with_page(2), &page_two());
        });

        // Assert
        handle.assert_finished();
        assert_eq!(ids(&list), vec![533_535, 1_022_789, 1_034_541, 519_182]);
    }

    #[test]
    fn test_pages_for_other_root_or_page_are_ignored() {
        // Arrange
        let root = ListParams::page(1);
        let mut list = PagedList::new(&root);
        let other_root = ListParams::page(1).language("fr-FR");

        // Act
        let wrong_root = list.accept(&other_root, &page_one());
        let wrong_page = list.accept(&root.with_page(2), &page_two());
        let accepted = list.accept(&root, &page_one());
        let repeated = list.accept(&root, &page_one());

        // Assert
        assert!(!wrong_root);
        assert!(!wrong_page);
        assert!(accepted);
        assert!(!repeated);
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn test_reset_clears_page_and_items_together() {
        // Arrange
        let root = ListParams::page(1);
        let mut list = PagedList::new(&root);
        list.accept(&root, &page_one());
        list.advance();

        // Act
        list.reset(&ListParams::page(1).region("NG"));

        // Assert
        assert_eq!(list.page(), 1);
        assert!(list.items().is_empty());
        assert!(list.needs_load());
        assert_eq!(list.root().region.as_deref(), Some("NG"));
    }

    #[test]
    fn test_advance_stops_on_last_page() {
        // Arrange
        let root = ListParams::page(1);
        let mut list = PagedList::new(&root);
        let mut only = page_one();
        only.total_pages = 1;

        // Act
        let before_load = list.advance();
        list.accept(&root, &only);
        let after_load = list.advance();

        // Assert
        assert!(!before_load);
        assert!(!after_load);
        assert!(!list.has_more());
    }

    #[tokio::test]
    async fn test_paginator_loads_pages_through_client_without_repeats() {
        // Arrange
        let server = MockServer::start().await;
        mount_page(&server, "en-US", "1", PAGE_ONE).await;
        mount_page(&server, "en-US", "2", PAGE_TWO).await;
        let mut paginator = popular_paginator(&server, &ListParams::page(1));

        // Act
        let first = paginator.load_first().await.unwrap().len();
        let again = paginator.load_first().await.unwrap().len();
        let loaded = paginator.load_more().await.unwrap();

        // Assert
        assert_eq!(first, 3);
        assert_eq!(again, 3);
        assert!(loaded);
        assert_eq!(paginator.list().page(), 2);
        assert_eq!(
            ids(paginator.list()),
            vec![533_535, 1_022_789, 1_034_541, 519_182]
        );
    }

    #[tokio::test]
    async fn test_failed_page_is_retried_without_advancing() {
        // Arrange
        let server = MockServer::start().await;
        mount_page(&server, "en-US", "1", PAGE_ONE).await;
        Mock::given(method("GET"))
            .and(path("/3/movie/popular"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_page(&server, "en-US", "2", PAGE_TWO).await;
        let mut paginator = popular_paginator(&server, &ListParams::page(1));
        paginator.load_first().await.unwrap();

        // Act
        let failed = paginator.load_more().await;
        let page_after_failure = paginator.list().page();
        let kept = paginator.list().items().len();
        let retried = paginator.load_more().await.unwrap();

        // Assert
        assert!(failed.is_err());
        assert_eq!(page_after_failure, 2);
        assert_eq!(kept, 3);
        assert!(retried);
        assert_eq!(paginator.list().page(), 2);
        assert_eq!(paginator.list().items().len(), 4);
    }

    #[tokio::test]
    async fn test_new_root_restarts_from_page_one() {
        // Arrange
        let server = MockServer::start().await;
        mount_page(&server, "en-US", "1", PAGE_ONE).await;
        mount_page(&server, "en-US", "2", PAGE_TWO).await;
        mount_page(&server, "fr-FR", "1", PAGE_TWO).await;
        let mut paginator = popular_paginator(&server, &ListParams::page(1));
        paginator.load_first().await.unwrap();
        paginator.load_more().await.unwrap();

        // Act
        paginator.set_root(&ListParams::page(3).language("fr-FR"));
        let reset_page = paginator.list().page();
        let reset_empty = paginator.list().items().is_empty();
        paginator.load_first().await.unwrap();

        // Assert
        assert_eq!(reset_page, 1);
        assert!(reset_empty);
        assert_eq!(paginator.list().root().language, "fr-FR");
        assert_eq!(ids(paginator.list()), vec![1_022_789, 519_182]);
    }

    #[tokio::test]
    async fn test_same_root_keeps_loaded_pages() {
        // Arrange
        let server = MockServer::start().await;
        mount_page(&server, "en-US", "1", PAGE_ONE).await;
        let mut paginator = popular_paginator(&server, &ListParams::page(1));
        paginator.load_first().await.unwrap();

        // Act
        paginator.set_root(&ListParams::page(2));
        let items = paginator.load_first().await.unwrap().len();

        // Assert
        assert_eq!(items, 3);
    }
}
