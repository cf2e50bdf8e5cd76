//! Endpoint definitions for the catalog and account services.

mod account;
mod catalog;

use std::future::Future;
use std::sync::Arc;

use nolly_api::ApiError;

use crate::endpoint::{MutationDef, QueryDef};
use crate::error::QueryError;

pub use account::{AccountEndpoints, RenameWatchlist};
pub use catalog::CatalogEndpoints;

/// Query backed by one call on `service`.
fn query<S, A, T, F, Fut>(service: &Arc<S>, name: &'static str, call: F) -> QueryDef<A, T>
where
    S: Send + Sync + 'static,
    A: 'static,
    T: 'static,
    F: Fn(Arc<S>, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let service = Arc::clone(service);
    QueryDef::new(name, move |args| {
        let request = call(Arc::clone(&service), args);
        async move { request.await.map_err(QueryError::from) }
    })
}

/// Mutation backed by one call on `service`.
fn mutation<S, B, T, F, Fut>(service: &Arc<S>, name: &'static str, call: F) -> MutationDef<B, T>
where
    S: Send + Sync + 'static,
    B: 'static,
    T: 'static,
    F: Fn(Arc<S>, B) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let service = Arc::clone(service);
    MutationDef::new(name, move |body| {
        let request = call(Arc::clone(&service), body);
        async move { request.await.map_err(QueryError::from) }
    })
}
