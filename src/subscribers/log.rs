//! # LogWriter: logs the bus diagnostic events
//!
//! A minimal subscriber that forwards [`HandlerFailed`] and [`NoSubscribers`]
//! to `tracing`. Use it for tests or demos; production code usually subscribes
//! to the diagnostic events with its own handlers.
//!
//! ## Example output
//! ```text
//! WARN eventvisor: handler failed seq=3 subscriber="app::Screen" event_type=app::Ping thread_mode=main reason="boom"
//! INFO eventvisor: no subscribers seq=4 event_type=app::Tick
//! ```

use tracing::{info, warn};

use crate::events::{HandlerFailed, NoSubscribers};
use crate::subscribers::{Subscriber, SubscriberMethod, ThreadMode};

/// Diagnostic event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscriber for LogWriter {
    fn handlers(&self) -> Vec<SubscriberMethod> {
        vec![
            SubscriberMethod::new(ThreadMode::Posting, |_: &LogWriter, e: &HandlerFailed| {
                warn!(
                    target: "eventvisor",
                    seq = e.seq,
                    subscriber = e.subscriber,
                    event_type = %e.event_type,
                    thread_mode = %e.thread_mode,
                    reason = %e.reason,
                    "handler failed"
                );
                Ok(())
            }),
            SubscriberMethod::new(ThreadMode::Posting, |_: &LogWriter, e: &NoSubscribers| {
                info!(
                    target: "eventvisor",
                    seq = e.seq,
                    event_type = %e.event_type,
                    "no subscribers"
                );
                Ok(())
            }),
        ]
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
