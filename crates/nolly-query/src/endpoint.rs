//! Declarative query and mutation definitions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::QueryError;
use crate::tag::CacheTag;

type FetchFn<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, QueryError>> + Send + Sync>;
pub(crate) type AdmitFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// A read endpoint: how to fetch it, which tags its result carries and
/// which guards must hold before it is requested.
pub struct QueryDef<A, T> {
    name: &'static str,
    provides: Vec<CacheTag>,
    requires_session: bool,
    precondition: Option<fn(&A) -> bool>,
    admission: Option<AdmitFn>,
    fetch: FetchFn<A, T>,
}

impl<A, T> QueryDef<A, T> {
    /// Defines endpoint `name`, fetched by `fetch`.
    pub fn new<F, Fut>(name: &'static str, fetch: F) -> Self
    where
        A: 'static,
        T: 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        Self {
            name,
            provides: Vec::new(),
            requires_session: false,
            precondition: None,
            admission: None,
            fetch: Arc::new(move |args| fetch(args).boxed()),
        }
    }

    /// Tags carried by the cached result.
    #[must_use]
    pub fn provides(mut self, tags: &[CacheTag]) -> Self {
        self.provides = tags.to_vec();
        self
    }

    /// Skip while signed out; request once on sign-in; drop data on sign-out.
    #[must_use]
    pub const fn requires_session(mut self) -> Self {
        self.requires_session = true;
        self
    }

    /// Skip whenever `check` rejects the arguments.
    #[must_use]
    pub fn precondition(mut self, check: fn(&A) -> bool) -> Self {
        self.precondition = Some(check);
        self
    }

    /// Await `admit` before every request, e.g. a rate limiter slot.
    /// The request timeout starts once it resolves.
    #[must_use]
    pub fn admitted_by<F, Fut>(mut self, admit: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.admission = Some(Arc::new(move || admit().boxed()));
        self
    }

    /// Endpoint name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Tags carried by the cached result.
    #[must_use]
    pub fn tags(&self) -> &[CacheTag] {
        &self.provides
    }

    /// Whether the endpoint needs an authenticated session.
    #[must_use]
    pub const fn needs_session(&self) -> bool {
        self.requires_session
    }

    /// Whether `args` pass the precondition.
    pub fn accepts(&self, args: &A) -> bool {
        self.precondition.is_none_or(|check| check(args))
    }

    pub(crate) fn call(&self, args: A) -> BoxFuture<'static, Result<T, QueryError>> {
        (self.fetch)(args)
    }

    pub(crate) fn admission(&self) -> Option<AdmitFn> {
        self.admission.clone()
    }
}

impl<A, T> Clone for QueryDef<A, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            provides: self.provides.clone(),
            requires_session: self.requires_session,
            precondition: self.precondition,
            admission: self.admission.clone(),
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<A, T> fmt::Debug for QueryDef<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDef")
            .field("name", &self.name)
            .field("provides", &self.provides)
            .field("requires_session", &self.requires_session)
            .field("precondition", &self.precondition.is_some())
            .field("admission", &self.admission.is_some())
            .finish_non_exhaustive()
    }
}

/// A write endpoint and the tags it invalidates on success.
pub struct MutationDef<B, T> {
    name: &'static str,
    invalidates: Vec<CacheTag>,
    run: FetchFn<B, T>,
}

impl<B, T> MutationDef<B, T> {
    /// Defines mutation `name`, performed by `run`.
    pub fn new<F, Fut>(name: &'static str, run: F) -> Self
    where
        B: 'static,
        T: 'static,
        F: Fn(B) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        Self {
            name,
            invalidates: Vec::new(),
            run: Arc::new(move |body| run(body).boxed()),
        }
    }

    /// Tags invalidated after a successful call.
    #[must_use]
    pub fn invalidates(mut self, tags: &[CacheTag]) -> Self {
        self.invalidates = tags.to_vec();
        self
    }

    /// Mutation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Tags invalidated after a successful call.
    #[must_use]
    pub fn invalidated_tags(&self) -> &[CacheTag] {
        &self.invalidates
    }

    pub(crate) fn call(&self, body: B) -> BoxFuture<'static, Result<T, QueryError>> {
        (self.run)(body)
    }
}

impl<B, T> Clone for MutationDef<B, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            invalidates: self.invalidates.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<B, T> fmt::Debug for MutationDef<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDef")
            .field("name", &self.name)
            .field("invalidates", &self.invalidates)
            .finish_non_exhaustive()
    }
}
