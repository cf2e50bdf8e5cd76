//! Queries that run only when triggered.

use std::fmt;
use std::sync::Arc;

use crate::client::QueryClient;
use crate::endpoint::QueryDef;
use crate::error::QueryError;
use crate::key::{QueryArgs, QueryKey};
use crate::state::QueryState;
use crate::subscription::Subscription;

/// A query bound to a client but not dispatched until [`LazyQuery::trigger`].
///
/// After the first trigger the query stays subscribed to the last
/// arguments, so invalidations refetch it like an eager query.
pub struct LazyQuery<A, T> {
    client: QueryClient,
    def: QueryDef<A, T>,
    current: Option<Subscription<T>>,
}

impl<A, T> LazyQuery<A, T>
where
    A: QueryArgs,
    T: Send + Sync + 'static,
{
    pub(crate) const fn new(client: QueryClient, def: QueryDef<A, T>) -> Self {
        Self {
            client,
            def,
            current: None,
        }
    }

    /// Requests `args` now, bypassing a fresh cached value.
    ///
    /// # Errors
    ///
    /// Same as [`QueryClient::fetch`].
    pub async fn trigger(&mut self, args: A) -> Result<Arc<T>, QueryError> {
        self.track(&args);
        self.client.fetch_with(&self.def, args, true).await
    }

    /// Requests `args`, reusing a fresh cached value when there is one.
    ///
    /// # Errors
    ///
    /// Same as [`QueryClient::fetch`].
    pub async fn trigger_cached(&mut self, args: A) -> Result<Arc<T>, QueryError> {
        self.track(&args);
        self.client.fetch_with(&self.def, args, false).await
    }

    /// State for the last triggered arguments.
    #[must_use]
    pub fn state(&self) -> QueryState<T> {
        self.current
            .as_ref()
            .map_or_else(QueryState::uninitialized, Subscription::state)
    }

    /// Waits for the next change of the last triggered arguments.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        match &mut self.current {
            Some(subscription) => subscription.changed().await,
            None => None,
        }
    }

    /// Forgets the last triggered arguments.
    pub fn reset(&mut self) {
        self.current = None;
    }

    fn track(&mut self, args: &A) {
        let key = QueryKey::new(self.def.name(), args);
        if self.current.as_ref().and_then(Subscription::key) == Some(&key) {
            return;
        }
        self.current = Some(self.client.watch(&self.def, args.clone()));
    }
}

impl<A, T> fmt::Debug for LazyQuery<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyQuery")
            .field("def", &self.def)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
