//! Request pacing for the catalog API.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// TMDB allows roughly 40 requests per second.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Spaces catalog requests at least `min_interval` apart.
///
/// Callers reserve consecutive slots under a short lock and then sleep
/// outside it, so concurrent requests queue in arrival order.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogRateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl CatalogRateLimiter {
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Reserves the next slot and sleeps until it opens.
    pub async fn wait(&self) {
        let slot = {
            let mut next = self
                .next_slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = next.map_or(now, |at| at.max(now));
            *next = Some(slot.checked_add(self.min_interval).unwrap_or(slot));
            slot
        };

        if slot > Instant::now() {
            let delay = slot.saturating_duration_since(Instant::now());
            tracing::trace!(?delay, "pacing catalog request");
            tokio::time::sleep_until(slot).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_does_not_wait() {
        // Arrange
        let limiter = CatalogRateLimiter::new(Duration::from_secs(1));

        // Act
        let start = Instant::now();
        limiter.wait().await;

        // Assert
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_are_spaced() {
        // Arrange
        let limiter = Arc::new(CatalogRateLimiter::new(Duration::from_millis(50)));
        let start = Instant::now();

        // Act
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.wait().await;
                    start.elapsed()
                })
            })
            .collect();
        let mut elapsed = Vec::new();
        for handle in handles {
            elapsed.push(handle.await.unwrap_or_default());
        }
        elapsed.sort();

        // Assert
        assert_eq!(
            elapsed,
            vec![
                Duration::ZERO,
                Duration::from_millis(50),
                Duration::from_millis(100)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_gap_resets_spacing() {
        // Arrange
        let limiter = CatalogRateLimiter::new(Duration::from_millis(50));
        limiter.wait().await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Act
        let start = Instant::now();
        limiter.wait().await;

        // Assert
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
