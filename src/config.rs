//! # Bus configuration.
//!
//! Provides [`BusConfig`], centralized settings for a [`Bus`](crate::Bus).
//!
//! ## Sentinel values
//! - `max_async_workers = 0` → clamped to 1 (the pool always makes progress)
//! - `worker_threads = 0` → tokio default for the bus-owned runtime
//! - `grace = 0s` → `shutdown` does not wait for queued deliveries

use std::time::Duration;

/// Configuration for an event bus.
///
/// ## Field semantics
/// - `max_async_workers`: upper bound of concurrently running `Async` handlers
/// - `worker_threads`: size of the bus-owned runtime (ignored with an external runtime)
/// - `grace`: how long `shutdown` waits for queued deliveries
/// - `log_handler_failures`: log failing handlers at `error` level
/// - `send_handler_failed`: post a [`HandlerFailed`](crate::HandlerFailed) event on failure
/// - `send_no_subscribers`: post a [`NoSubscribers`](crate::NoSubscribers) event for unmatched posts
/// - `log_no_subscribers`: log unmatched posts at `debug` level
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Maximum number of `Async` handlers running at the same time.
    pub max_async_workers: usize,

    /// Worker threads of the runtime the bus builds when none is supplied.
    pub worker_threads: usize,

    /// Maximum time `shutdown` waits for background and async deliveries.
    pub grace: Duration,

    /// Log handler errors and panics.
    pub log_handler_failures: bool,

    /// Post a `HandlerFailed` event after a handler error or panic.
    pub send_handler_failed: bool,

    /// Post a `NoSubscribers` event when nothing handles a posted event.
    pub send_no_subscribers: bool,

    /// Log posts that found no subscriber.
    pub log_no_subscribers: bool,
}

impl BusConfig {
    /// Returns the async pool size clamped to a minimum of 1.
    #[inline]
    pub fn async_workers_clamped(&self) -> usize {
        self.max_async_workers.max(1)
    }

    /// Returns the worker thread count for the owned runtime as an `Option`.
    ///
    /// - `None` → tokio default (one per core)
    /// - `Some(n)` → exactly `n` threads
    #[inline]
    pub fn runtime_threads(&self) -> Option<usize> {
        if self.worker_threads == 0 {
            None
        } else {
            Some(self.worker_threads)
        }
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `max_async_workers = 16`
    /// - `worker_threads = 2`
    /// - `grace = 5s`
    /// - handler failures logged and reported as events
    /// - unmatched posts silently dropped
    fn default() -> Self {
        Self {
            max_async_workers: 16,
            worker_threads: 2,
            grace: Duration::from_secs(5),
            log_handler_failures: true,
            send_handler_failed: true,
            send_no_subscribers: false,
            log_no_subscribers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let cfg = BusConfig {
            max_async_workers: 0,
            worker_threads: 0,
            ..BusConfig::default()
        };
        assert_eq!(cfg.async_workers_clamped(), 1);
        assert_eq!(cfg.runtime_threads(), None);

        let cfg = BusConfig::default();
        assert_eq!(cfg.async_workers_clamped(), 16);
        assert_eq!(cfg.runtime_threads(), Some(2));
    }
}
