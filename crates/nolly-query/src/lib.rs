//! Query layer for nolly.
//!
//! Caches catalog and account reads under `(endpoint, normalized args)`,
//! de-duplicates concurrent requests, invalidates tagged entries after
//! successful mutations and gates account reads on the signed-in session.
//! Also hosts the debouncer, "load more" pagination and search-as-you-type.

mod client;
mod debounce;
mod endpoint;
mod error;
mod key;
mod lazy;
mod paginate;
mod search;
mod session;
/// Catalog and account endpoint definitions.
pub mod slices;
mod state;
mod subscription;
mod tag;

pub use client::{DEFAULT_REQUEST_TIMEOUT, QueryClient, QueryClientBuilder};
pub use debounce::Debouncer;
pub use endpoint::{MutationDef, QueryDef};
pub use error::QueryError;
pub use key::{PagedArgs, QueryArgs, QueryKey};
pub use lazy::LazyQuery;
pub use paginate::{Identified, PagedList, Paginator};
pub use search::{SEARCH_DEBOUNCE, SearchAsYouType};
pub use session::{Session, SessionState};
pub use state::{QueryState, QueryStatus};
pub use subscription::Subscription;
pub use tag::CacheTag;
