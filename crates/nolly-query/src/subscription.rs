//! Live view of one cache entry.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;

use crate::client::Inner;
use crate::key::QueryKey;
use crate::state::{QueryState, RawState};

/// Subscription to a cached query.
///
/// Holding one keeps the entry "subscribed": invalidations refetch it
/// immediately instead of marking it stale. Dropping it releases the entry.
pub struct Subscription<T> {
    rx: watch::Receiver<RawState>,
    link: Option<Link>,
    endpoint: &'static str,
    _marker: PhantomData<fn() -> T>,
}

struct Link {
    inner: Arc<Inner>,
    key: QueryKey,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    pub(crate) const fn attached(
        inner: Arc<Inner>,
        key: QueryKey,
        rx: watch::Receiver<RawState>,
        endpoint: &'static str,
    ) -> Self {
        Self {
            rx,
            link: Some(Link { inner, key }),
            endpoint,
            _marker: PhantomData,
        }
    }

    /// A subscription that stays skipped forever.
    pub(crate) fn detached(endpoint: &'static str) -> Self {
        let (_, rx) = watch::channel(RawState::skipped());
        Self {
            rx,
            link: None,
            endpoint,
            _marker: PhantomData,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> QueryState<T> {
        self.rx.borrow().typed(self.endpoint)
    }

    /// Waits for the next state change.
    ///
    /// Returns `None` once no further change can happen.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().typed(self.endpoint))
    }

    /// Waits until no request is in flight, then returns the state.
    pub async fn settled(&mut self) -> QueryState<T> {
        let endpoint = self.endpoint;
        let settled = self
            .rx
            .wait_for(RawState::is_settled)
            .await
            .map(|state| state.typed::<T>(endpoint));
        settled.unwrap_or_else(|_| self.state())
    }

    /// Requests the entry again ("Try again"). Joins a request already in flight.
    pub fn refetch(&self) {
        if let Some(link) = &self.link {
            link.inner.refetch(&link.key);
        }
    }

    /// Cache key, or `None` for a detached subscription.
    #[must_use]
    pub fn key(&self) -> Option<&QueryKey> {
        self.link.as_ref().map(|link| &link.key)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            link.inner.release(&link.key);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("endpoint", &self.endpoint)
            .field("key", &self.link.as_ref().map(|link| &link.key))
            .field("status", &self.rx.borrow().status)
            .finish()
    }
}
