//! # Diagnostic events posted by the bus itself.
//!
//! - [`HandlerFailed`]: a handler returned an error or panicked
//!   (enabled by [`BusConfig::send_handler_failed`](crate::BusConfig::send_handler_failed)).
//! - [`NoSubscribers`]: a posted event matched nobody
//!   (enabled by [`BusConfig::send_no_subscribers`](crate::BusConfig::send_no_subscribers)).
//!
//! Both are ordinary events: subscribe to them like to any other type.
//! The bus never reports a failure of a `HandlerFailed` handler, and never
//! reports an unmatched `HandlerFailed`/`NoSubscribers`, so they cannot loop.
//!
//! ## Ordering
//! Each diagnostic event carries a global `seq` that increases monotonically;
//! use it to restore the order when events arrive through different thread modes.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use super::EventType;
use crate::subscribers::ThreadMode;

/// Global sequence counter for diagnostic event ordering.
static DIAGNOSTIC_SEQ: AtomicU64 = AtomicU64::new(0);

#[inline]
fn next_seq() -> u64 {
    DIAGNOSTIC_SEQ.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A handler returned an error or panicked.
#[derive(Clone, Debug)]
pub struct HandlerFailed {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Subscriber type name.
    pub subscriber: &'static str,
    /// Event type the handler was invoked with.
    pub event_type: EventType,
    /// Thread mode the handler was registered with.
    pub thread_mode: ThreadMode,
    /// Error message or panic payload.
    pub reason: String,
}

impl HandlerFailed {
    pub(crate) fn new(
        subscriber: &'static str,
        event_type: EventType,
        thread_mode: ThreadMode,
        reason: String,
    ) -> Self {
        Self {
            seq: next_seq(),
            at: SystemTime::now(),
            subscriber,
            event_type,
            thread_mode,
            reason,
        }
    }
}

/// A posted event had no subscriber.
#[derive(Clone, Debug)]
pub struct NoSubscribers {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Type of the unmatched event.
    pub event_type: EventType,
}

impl NoSubscribers {
    pub(crate) fn new(event_type: EventType) -> Self {
        Self {
            seq: next_seq(),
            at: SystemTime::now(),
            event_type,
        }
    }
}

/// Returns true for the bus' own diagnostic event types.
#[inline]
pub(crate) fn is_diagnostic(event_type: &EventType) -> bool {
    event_type.is::<HandlerFailed>() || event_type.is::<NoSubscribers>()
}
