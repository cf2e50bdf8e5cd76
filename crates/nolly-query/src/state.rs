//! Observable query state.

use std::any::Any;
use std::sync::Arc;

use crate::error::QueryError;

/// Type-erased cached value.
pub(crate) type Erased = Arc<dyn Any + Send + Sync>;

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// Never requested.
    Uninitialized,
    /// A guard is not satisfied; no request is made.
    Skipped,
    /// A request is in flight.
    Pending,
    /// The last request succeeded.
    Fulfilled,
    /// The last request failed.
    Rejected,
}

/// Snapshot of a query as seen by a subscriber.
#[derive(Debug)]
pub struct QueryState<T> {
    /// Current status.
    pub status: QueryStatus,
    /// Last successful result. Kept while refetching and after a failed refetch.
    pub data: Option<Arc<T>>,
    /// Error of the last request, if it failed.
    pub error: Option<QueryError>,
    /// Whether a request is in flight.
    pub is_fetching: bool,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
        }
    }
}

impl<T> QueryState<T> {
    /// Fetching with no data yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none()
    }

    /// Whether the guard prevented the request.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.status == QueryStatus::Skipped
    }

    /// Whether the last request succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Fulfilled
    }

    /// Whether the last request failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Rejected
    }

    pub(crate) const fn uninitialized() -> Self {
        Self {
            status: QueryStatus::Uninitialized,
            data: None,
            error: None,
            is_fetching: false,
        }
    }
}

/// Untyped entry state, as broadcast to subscribers.
#[derive(Debug, Clone)]
pub(crate) struct RawState {
    pub(crate) status: QueryStatus,
    pub(crate) data: Option<Erased>,
    pub(crate) error: Option<QueryError>,
    pub(crate) is_fetching: bool,
}

impl RawState {
    pub(crate) const fn uninitialized() -> Self {
        Self {
            status: QueryStatus::Uninitialized,
            data: None,
            error: None,
            is_fetching: false,
        }
    }

    pub(crate) const fn skipped() -> Self {
        Self {
            status: QueryStatus::Skipped,
            data: None,
            error: None,
            is_fetching: false,
        }
    }

    /// No request is in flight and none is about to start.
    pub(crate) const fn is_settled(&self) -> bool {
        !self.is_fetching
            && !matches!(
                self.status,
                QueryStatus::Uninitialized | QueryStatus::Pending
            )
    }

    pub(crate) fn typed<T: Any + Send + Sync>(&self, endpoint: &'static str) -> QueryState<T> {
        let mut error = self.error.clone();
        let data = self.data.clone().and_then(|erased| {
            erased.downcast::<T>().map_or_else(
                |_| {
                    error = Some(QueryError::TypeMismatch { endpoint });
                    None
                },
                Some,
            )
        });
        QueryState {
            status: self.status,
            data,
            error,
            is_fetching: self.is_fetching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_loading_only_without_data() {
        // Arrange
        let mut state = RawState::uninitialized();
        state.status = QueryStatus::Pending;
        state.is_fetching = true;

        // Act
        let first: QueryState<u32> = state.typed("numbers");
        state.data = Some(Arc::new(7_u32));
        let refetch: QueryState<u32> = state.typed("numbers");

        // Assert
        assert!(first.is_loading());
        assert!(!refetch.is_loading());
        assert_eq!(refetch.data.as_deref(), Some(&7));
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        // Arrange
        let mut state = RawState::uninitialized();
        state.status = QueryStatus::Fulfilled;
        state.data = Some(Arc::new(String::from("text")));

        // Act
        let typed: QueryState<u32> = state.typed("numbers");

        // Assert
        assert!(typed.data.is_none());
        assert_eq!(
            typed.error,
            Some(QueryError::TypeMismatch {
                endpoint: "numbers"
            })
        );
    }

    #[test]
    fn test_skipped_is_settled() {
        // Arrange & Act & Assert
        assert!(RawState::skipped().is_settled());
        assert!(!RawState::uninitialized().is_settled());
    }
}
