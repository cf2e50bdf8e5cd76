//! `QueryClient` - keyed result cache with request de-duplication,
//! subscriptions, tag invalidation and session guards.
//!
//! Every cache entry is addressed by a [`QueryKey`]. At most one request
//! per key is in flight; it is driven by a spawned task so that dropping
//! the last waiter does not abort it. The cache map sits behind a mutex
//! that is never held across an await point.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::watch;
use tracing::instrument;

use crate::endpoint::{AdmitFn, MutationDef, QueryDef};
use crate::error::QueryError;
use crate::key::{QueryArgs, QueryKey};
use crate::lazy::LazyQuery;
use crate::session::{Session, SessionState};
use crate::state::{Erased, QueryStatus, RawState};
use crate::subscription::Subscription;
use crate::tag::CacheTag;

/// Default bound on every query and mutation.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type SharedFetch = Shared<BoxFuture<'static, Result<Erased, QueryError>>>;
type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Erased, QueryError>> + Send + Sync>;

/// One cached endpoint/argument pair.
struct CacheEntry {
    /// Broadcast state.
    state: watch::Sender<RawState>,
    /// Issues a request for this entry's arguments.
    fetcher: Fetcher,
    /// Awaited before each request, outside the timeout.
    admission: Option<AdmitFn>,
    /// Tags carried by the result.
    tags: Vec<CacheTag>,
    /// Session guard.
    requires_session: bool,
    /// Request currently in flight.
    in_flight: Option<SharedFetch>,
    /// Live subscriptions.
    subscribers: usize,
    /// Invalidated while unsubscribed.
    stale: bool,
    /// Invalidated while a request was in flight.
    refetch_pending: bool,
    /// Bumped on reset; results of older requests are discarded.
    generation: u64,
    /// Session epoch of the last dispatched request.
    fetch_epoch: Option<u64>,
}

impl CacheEntry {
    fn new<A, T>(def: &QueryDef<A, T>, args: A) -> Self
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        let def_for_fetch = def.clone();
        let fetcher: Fetcher = Arc::new(move || {
            let request = def_for_fetch.call(args.clone());
            async move { request.await.map(|value| Arc::new(value) as Erased) }.boxed()
        });
        let (state, _) = watch::channel(RawState::uninitialized());

        Self {
            state,
            fetcher,
            admission: def.admission(),
            tags: def.tags().to_vec(),
            requires_session: def.needs_session(),
            in_flight: None,
            subscribers: 0,
            stale: false,
            refetch_pending: false,
            generation: 0,
            fetch_epoch: None,
        }
    }

    /// No data, stale data, or a failed last attempt.
    fn needs_data(&self) -> bool {
        let state = self.state.borrow();
        state.data.is_none() || self.stale || state.status == QueryStatus::Rejected
    }

    /// Fulfilled, not invalidated, and not being refetched.
    fn is_fresh(&self) -> bool {
        let state = self.state.borrow();
        state.status == QueryStatus::Fulfilled
            && state.data.is_some()
            && !self.stale
            && self.in_flight.is_none()
    }

    fn mark_skipped(&self) {
        self.state.send_if_modified(|state| {
            if state.status == QueryStatus::Uninitialized {
                *state = RawState::skipped();
                true
            } else {
                false
            }
        });
    }

    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
        self.stale = false;
        self.refetch_pending = false;
        self.fetch_epoch = None;
        self.state.send_replace(RawState::skipped());
    }
}

pub(crate) struct Inner {
    cache: Mutex<HashMap<QueryKey, CacheEntry>>,
    session: Option<Session>,
    request_timeout: Duration,
    watcher_started: AtomicBool,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_authenticated)
    }

    fn epoch(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.state().epoch)
    }

    fn guard_open(&self, entry: &CacheEntry) -> bool {
        !entry.requires_session || self.authenticated()
    }

    /// Starts a request for `entry`, or returns the one already in flight.
    fn start_fetch(self: &Arc<Self>, key: &QueryKey, entry: &mut CacheEntry) -> SharedFetch {
        if let Some(existing) = &entry.in_flight {
            tracing::debug!(%key, "joining in-flight request");
            return existing.clone();
        }

        let generation = entry.generation;
        let timeout = self.request_timeout;
        let request = (entry.fetcher)();
        let admission = entry.admission.as_ref().map(|admit| admit());
        let weak = Arc::downgrade(self);
        let done_key = key.clone();

        let shared = async move {
            if let Some(admission) = admission {
                admission.await;
            }
            let result = tokio::time::timeout(timeout, request)
                .await
                .unwrap_or(Err(QueryError::Timeout(timeout)));
            if let Some(inner) = weak.upgrade() {
                inner.complete(&done_key, generation, &result);
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(shared.clone());
        entry.stale = false;
        entry.fetch_epoch = Some(self.epoch());
        entry.state.send_modify(|state| {
            state.status = QueryStatus::Pending;
            state.is_fetching = true;
        });
        tracing::debug!(%key, "request started");

        tokio::spawn(shared.clone().map(drop));
        shared
    }

    fn dispatch(self: &Arc<Self>, key: &QueryKey, entry: &mut CacheEntry) {
        drop(self.start_fetch(key, entry));
    }

    /// Stores the outcome of a request started at `generation`.
    fn complete(
        self: &Arc<Self>,
        key: &QueryKey,
        generation: u64,
        result: &Result<Erased, QueryError>,
    ) {
        let mut cache = self.lock();
        let Some(entry) = cache.get_mut(key) else {
            return;
        };
        if entry.generation != generation {
            tracing::debug!(%key, "discarding result for a reset entry");
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(value) => {
                entry.state.send_modify(|state| {
                    state.status = QueryStatus::Fulfilled;
                    state.data = Some(Arc::clone(value));
                    state.error = None;
                    state.is_fetching = false;
                });
                tracing::debug!(%key, "request fulfilled");
            }
            Err(err) => {
                entry.state.send_modify(|state| {
                    state.status = QueryStatus::Rejected;
                    state.error = Some(err.clone());
                    state.is_fetching = false;
                });
                tracing::warn!(%key, error = %err, "request failed");
            }
        }

        if std::mem::take(&mut entry.refetch_pending) {
            if entry.subscribers > 0 && self.guard_open(entry) {
                tracing::debug!(%key, "refetching after invalidation");
                self.dispatch(key, entry);
            } else {
                entry.stale = true;
            }
        }
    }

    /// Registers a subscriber for `(def, args)`, dispatching if asked and needed.
    pub(crate) fn attach<A, T>(
        self: &Arc<Self>,
        def: &QueryDef<A, T>,
        args: A,
        dispatch: bool,
    ) -> Subscription<T>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        if def.needs_session() {
            self.ensure_session_watcher();
        }

        let key = QueryKey::new(def.name(), &args);
        if !def.accepts(&args) {
            tracing::debug!(%key, "precondition not met, skipping");
            return Subscription::detached(def.name());
        }

        let mut cache = self.lock();
        let entry = cache
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(def, args));
        entry.subscribers = entry.subscribers.saturating_add(1);
        let rx = entry.state.subscribe();

        if !self.guard_open(entry) {
            tracing::debug!(%key, "no session, skipping");
            entry.mark_skipped();
        } else if dispatch && entry.in_flight.is_none() && entry.needs_data() {
            self.dispatch(&key, entry);
        }
        drop(cache);

        Subscription::attached(Arc::clone(self), key, rx, def.name())
    }

    pub(crate) fn release(&self, key: &QueryKey) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
        }
    }

    pub(crate) fn refetch(self: &Arc<Self>, key: &QueryKey) {
        let mut cache = self.lock();
        if let Some(entry) = cache.get_mut(key) {
            if self.guard_open(entry) {
                self.dispatch(key, entry);
            }
        }
    }

    /// Spawns the session watcher on first use of a guarded endpoint.
    fn ensure_session_watcher(self: &Arc<Self>) {
        let Some(session) = &self.session else {
            return;
        };
        if self.watcher_started.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut rx = session.watch();
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = *rx.borrow_and_update();
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.on_session_change(state);
            }
        });
    }

    fn on_session_change(self: &Arc<Self>, session: SessionState) {
        tracing::debug!(
            authenticated = session.authenticated,
            epoch = session.epoch,
            "session changed"
        );
        let mut cache = self.lock();
        for (key, entry) in cache.iter_mut().filter(|(_, e)| e.requires_session) {
            if !session.authenticated {
                entry.reset();
            } else if entry.fetch_epoch != Some(session.epoch) && entry.in_flight.is_none() {
                if entry.subscribers > 0 {
                    self.dispatch(key, entry);
                } else if entry.fetch_epoch.is_some() {
                    entry.stale = true;
                }
            }
        }
    }
}

/// Async query cache shared by every endpoint of the application.
///
/// Must be used from within a Tokio runtime: requests and the session
/// watcher run on spawned tasks.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

/// Builder for `QueryClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct QueryClientBuilder {
    session: Option<Session>,
    request_timeout: Option<Duration>,
}

impl QueryClientBuilder {
    /// Sets the session that guards `requires_session` endpoints.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the client.
    #[must_use]
    pub fn build(self) -> QueryClient {
        QueryClient {
            inner: Arc::new(Inner {
                cache: Mutex::new(HashMap::new()),
                session: self.session,
                request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
                watcher_started: AtomicBool::new(false),
            }),
        }
    }
}

impl QueryClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> QueryClientBuilder {
        QueryClientBuilder::default()
    }

    /// Session guarding `requires_session` endpoints, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.inner.session.as_ref()
    }

    /// One-shot read: cached value when fresh, else the in-flight or a new request.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Skipped`] when a guard is not satisfied.
    /// - [`QueryError::Api`] or [`QueryError::Timeout`] when the request fails.
    pub async fn fetch<A, T>(&self, def: &QueryDef<A, T>, args: A) -> Result<Arc<T>, QueryError>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        self.fetch_with(def, args, false).await
    }

    #[instrument(skip_all, fields(endpoint = def.name(), force = force))]
    pub(crate) async fn fetch_with<A, T>(
        &self,
        def: &QueryDef<A, T>,
        args: A,
        force: bool,
    ) -> Result<Arc<T>, QueryError>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        let endpoint = def.name();
        let key = QueryKey::new(endpoint, &args);
        if !def.accepts(&args) {
            tracing::debug!(%key, "precondition not met, skipping");
            return Err(QueryError::Skipped { endpoint });
        }
        if def.needs_session() {
            self.inner.ensure_session_watcher();
        }

        let request = {
            let mut cache = self.inner.lock();
            let entry = cache
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(def, args));

            if !self.inner.guard_open(entry) {
                tracing::debug!(%key, "no session, skipping");
                entry.mark_skipped();
                return Err(QueryError::Skipped { endpoint });
            }

            let cached = if !force && entry.is_fresh() {
                entry.state.borrow().data.clone()
            } else {
                None
            };
            if let Some(value) = cached {
                tracing::debug!(%key, "cache hit");
                return downcast(value, endpoint);
            }

            self.inner.start_fetch(&key, entry)
        };

        downcast(request.await?, endpoint)
    }

    /// Eager query: subscribes and dispatches when there is no usable data.
    pub fn subscribe<A, T>(&self, def: &QueryDef<A, T>, args: A) -> Subscription<T>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        self.inner.attach(def, args, true)
    }

    /// Like [`Self::subscribe`]; `None` means "nothing selected" and yields a
    /// permanently skipped subscription.
    pub fn subscribe_optional<A, T>(&self, def: &QueryDef<A, T>, args: Option<A>) -> Subscription<T>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        args.map_or_else(
            || Subscription::detached(def.name()),
            |args| self.subscribe(def, args),
        )
    }

    /// Subscribes without dispatching.
    pub(crate) fn watch<A, T>(&self, def: &QueryDef<A, T>, args: A) -> Subscription<T>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        self.inner.attach(def, args, false)
    }

    /// A query that runs only when triggered.
    #[must_use]
    pub fn lazy<A, T>(&self, def: &QueryDef<A, T>) -> LazyQuery<A, T>
    where
        A: QueryArgs,
        T: Send + Sync + 'static,
    {
        LazyQuery::new(self.clone(), def.clone())
    }

    /// Runs a mutation once. On success every entry carrying one of its
    /// tags is invalidated; on failure nothing is.
    ///
    /// Entries already requested under a session that the mutation itself
    /// established (login, register) are left alone: the session watcher
    /// has dispatched them with the new credentials.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error, or [`QueryError::Timeout`].
    #[instrument(skip_all, fields(mutation = def.name()))]
    pub async fn mutate<B, T>(&self, def: &MutationDef<B, T>, body: B) -> Result<T, QueryError> {
        let timeout = self.inner.request_timeout;
        let started_epoch = self.inner.epoch();
        let result = tokio::time::timeout(timeout, def.call(body))
            .await
            .unwrap_or(Err(QueryError::Timeout(timeout)));

        match &result {
            Ok(_) => {
                tracing::debug!("mutation succeeded");
                self.invalidate(def.invalidated_tags(), Some(started_epoch));
            }
            Err(err) => tracing::warn!(error = %err, "mutation failed"),
        }
        result
    }

    /// Invalidates every entry carrying one of `tags`.
    ///
    /// Subscribed entries refetch now; unsubscribed ones are marked stale.
    /// Entries with a request in flight refetch once it lands.
    pub fn invalidate_tags(&self, tags: &[CacheTag]) {
        self.invalidate(tags, None);
    }

    /// With `since_epoch`, entries whose last request was dispatched in a
    /// later session epoch are skipped.
    fn invalidate(&self, tags: &[CacheTag], since_epoch: Option<u64>) {
        let mut cache = self.inner.lock();
        for (key, entry) in cache.iter_mut() {
            if !entry.tags.iter().any(|tag| tags.contains(tag)) {
                continue;
            }
            let refreshed = since_epoch
                .zip(entry.fetch_epoch)
                .is_some_and(|(since, fetched)| fetched != since);
            if refreshed {
                tracing::debug!(%key, "already requested under the new session");
                continue;
            }
            let status = entry.state.borrow().status;
            if entry.in_flight.is_some() {
                tracing::debug!(%key, "invalidated while in flight");
                entry.refetch_pending = true;
            } else if matches!(status, QueryStatus::Uninitialized | QueryStatus::Skipped) {
                continue;
            } else if entry.subscribers > 0 && self.inner.guard_open(entry) {
                tracing::debug!(%key, "invalidated, refetching");
                self.inner.dispatch(key, entry);
            } else {
                tracing::debug!(%key, "invalidated, marked stale");
                entry.stale = true;
            }
        }
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.inner.lock().len())
            .field("session", &self.inner.session)
            .field("request_timeout", &self.inner.request_timeout)
            .finish()
    }
}

fn downcast<T: Send + Sync + 'static>(
    value: Erased,
    endpoint: &'static str,
) -> Result<Arc<T>, QueryError> {
    value
        .downcast::<T>()
        .map_err(|_| QueryError::TypeMismatch { endpoint })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::AtomicU32;

    use nolly_api::ApiError;

    use super::*;

    /// Definition returning the call count after a short delay.
    fn counting(name: &'static str, calls: &Arc<AtomicU32>) -> QueryDef<String, u32> {
        let calls = Arc::clone(calls);
        QueryDef::new(name, move |_: String| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(n)
            }
        })
        .provides(&[CacheTag::Watchlist])
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);

        // Act
        let (a, b, c) = tokio::join!(
            client.fetch(&def, String::from("x")),
            client.fetch(&def, String::from("x")),
            client.fetch(&def, String::from("x")),
        );

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let a = a.unwrap();
        assert!(Arc::ptr_eq(&a, &b.unwrap()));
        assert!(Arc::ptr_eq(&a, &c.unwrap()));
    }

    #[tokio::test]
    async fn test_different_args_are_separate_entries() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);

        // Act
        let (a, b) = tokio::join!(
            client.fetch(&def, String::from("x")),
            client.fetch(&def, String::from("y")),
        );

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_ne!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn test_absent_selection_is_skipped() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);

        // Act
        let mut subscription = client.subscribe_optional(&def, None);
        let state = subscription.settled().await;

        // Assert
        assert!(state.is_skipped());
        assert!(subscription.changed().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalidation_during_flight_refetches_after_landing() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);

        // Act
        let mut subscription = client.subscribe(&def, String::from("x"));
        client.invalidate_tags(&[CacheTag::Watchlist]);
        let state = loop {
            let state = subscription.settled().await;
            if state.data.as_deref() == Some(&2) {
                break state;
            }
            subscription.changed().await.unwrap();
        };

        // Assert
        assert!(state.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_untagged_entries_survive_invalidation() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);
        client.fetch(&def, String::from("x")).await.unwrap();

        // Act
        client.invalidate_tags(&[CacheTag::User]);
        let again = client.fetch(&def, String::from("x")).await.unwrap();

        // Assert
        assert_eq!(*again, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_abort_request() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);

        // Act
        drop(client.subscribe(&def, String::from("x")));
        tokio::time::sleep(Duration::from_millis(100)).await;
        let cached = client.fetch(&def, String::from("x")).await.unwrap();

        // Assert
        assert_eq!(*cached, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_times_out() {
        // Arrange
        let client = QueryClient::builder()
            .request_timeout(Duration::from_millis(10))
            .build();
        let def: QueryDef<(), u32> = QueryDef::new("slow", |()| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        });

        // Act
        let result = client.fetch(&def, ()).await;

        // Assert
        assert_eq!(result.unwrap_err(), QueryError::Timeout(Duration::from_millis(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_starts_after_admission() {
        // Arrange
        let client = QueryClient::builder()
            .request_timeout(Duration::from_secs(2))
            .build();
        let def: QueryDef<(), u32> = QueryDef::new("queued", |()| async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(3)
        })
        .admitted_by(|| tokio::time::sleep(Duration::from_secs(10)));

        // Act
        let start = tokio::time::Instant::now();
        let result = client.fetch(&def, ()).await;

        // Assert
        assert_eq!(*result.unwrap(), 3);
        assert!(start.elapsed() >= Duration::from_secs(11));
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_previous_data() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let def: QueryDef<(), u32> = QueryDef::new("flaky", move |()| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Ok(7)
                } else {
                    Err(QueryError::Api(ApiError::Transport {
                        service: "catalog",
                        reason: String::from("connection reset"),
                    }))
                }
            }
        });
        let mut subscription = client.subscribe(&def, ());
        subscription.settled().await;

        // Act
        subscription.refetch();
        subscription.changed().await.unwrap();
        let state = subscription.settled().await;

        // Assert
        assert!(state.is_error());
        assert_eq!(state.data.as_deref(), Some(&7));
        assert_eq!(state.error.unwrap().user_message("Network error"), "Network error");
    }

    #[tokio::test]
    async fn test_mutation_failure_invalidates_nothing() {
        // Arrange
        let client = QueryClient::builder().build();
        let calls = Arc::new(AtomicU32::new(0));
        let def = counting("numbers", &calls);
        let mut subscription = client.subscribe(&def, String::from("x"));
        subscription.settled().await;
        let failing: MutationDef<(), ()> = MutationDef::new("fail", |()| async {
            Err(QueryError::Session(String::from("disk full")))
        })
        .invalidates(&[CacheTag::Watchlist]);

        // Act
        let result = client.mutate(&failing, ()).await;

        // Assert
        assert!(result.is_err());
        assert!(!subscription.state().is_fetching);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
