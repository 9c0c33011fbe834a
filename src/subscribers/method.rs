//! # Handler descriptors.
//!
//! A [`SubscriberMethod`] describes one handler: the event type it accepts, the
//! [`ThreadMode`] it runs in, its priority, and whether it wants the last sticky
//! event replayed on registration. It replaces annotation scanning: subscribers
//! hand the bus a resolved list of descriptors.
//!
//! ## Example
//! ```rust
//! use eventvisor::{SubscriberMethod, ThreadMode};
//!
//! struct Screen;
//! struct Ping(u32);
//!
//! let m = SubscriberMethod::new(ThreadMode::Main, |_s: &Screen, p: &Ping| {
//!     println!("ping {}", p.0);
//!     Ok(())
//! })
//! .with_priority(10)
//! .sticky();
//!
//! assert_eq!(m.thread_mode(), ThreadMode::Main);
//! assert_eq!(m.priority(), 10);
//! assert!(m.is_sticky());
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::HandlerResult;
use crate::events::EventType;

/// Execution-context policy of a handler relative to the poster and the main context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThreadMode {
    /// Runs synchronously on the posting thread.
    #[default]
    Posting,
    /// Runs on the main context: inline when posted from it, queued otherwise.
    Main,
    /// Always queued on the main context, even when posted from it.
    MainOrdered,
    /// Off the main context: inline. On the main context: queued on the serial background worker.
    Background,
    /// Always submitted to the async worker pool.
    Async,
}

impl ThreadMode {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadMode::Posting => "posting",
            ThreadMode::Main => "main",
            ThreadMode::MainOrdered => "main_ordered",
            ThreadMode::Background => "background",
            ThreadMode::Async => "async",
        }
    }
}

impl fmt::Display for ThreadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

type ErasedHandler =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> HandlerResult + Send + Sync>;

/// Immutable record of one handler.
///
/// Built with [`SubscriberMethod::new`] and refined with
/// [`with_priority`](Self::with_priority) / [`sticky`](Self::sticky)
/// before being handed to the bus.
#[derive(Clone)]
pub struct SubscriberMethod {
    handler: ErasedHandler,
    event_type: EventType,
    subscriber_type: TypeId,
    subscriber_type_name: &'static str,
    thread_mode: ThreadMode,
    priority: i32,
    sticky: bool,
}

impl SubscriberMethod {
    /// Creates a descriptor for a handler of events `E` on subscribers `S`.
    ///
    /// The handler receives the subscriber as receiver context. Returning `Err`
    /// (or panicking) is caught at the invocation boundary and logged.
    pub fn new<S, E, F>(thread_mode: ThreadMode, handler: F) -> Self
    where
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: Fn(&S, &E) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |subscriber: &(dyn Any + Send + Sync), event: &(dyn Any + Send + Sync)| {
                match (subscriber.downcast_ref::<S>(), event.downcast_ref::<E>()) {
                    (Some(s), Some(e)) => handler(s, e),
                    _ => Err("subscriber or event type mismatch".into()),
                }
            },
        );

        Self {
            handler,
            event_type: EventType::of::<E>(),
            subscriber_type: TypeId::of::<S>(),
            subscriber_type_name: std::any::type_name::<S>(),
            thread_mode,
            priority: 0,
            sticky: false,
        }
    }

    /// Sets the delivery priority (higher runs first; default `0`).
    #[inline]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Asks for the last sticky event of this type on registration.
    #[inline]
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Event type handled by this method.
    #[inline]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Thread mode of this method.
    #[inline]
    pub fn thread_mode(&self) -> ThreadMode {
        self.thread_mode
    }

    /// Delivery priority.
    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the method receives sticky events on registration.
    #[inline]
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    #[inline]
    pub(crate) fn subscriber_type(&self) -> TypeId {
        self.subscriber_type
    }

    #[inline]
    pub(crate) fn subscriber_type_name(&self) -> &'static str {
        self.subscriber_type_name
    }

    #[inline]
    pub(crate) fn invoke(
        &self,
        subscriber: &(dyn Any + Send + Sync),
        event: &(dyn Any + Send + Sync),
    ) -> HandlerResult {
        (self.handler)(subscriber, event)
    }
}

impl fmt::Debug for SubscriberMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberMethod")
            .field("event_type", &self.event_type)
            .field("subscriber", &self.subscriber_type_name)
            .field("thread_mode", &self.thread_mode)
            .field("priority", &self.priority)
            .field("sticky", &self.sticky)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;
    struct Tick(u32);

    #[test]
    fn test_defaults() {
        let m = SubscriberMethod::new(ThreadMode::default(), |_: &Counter, _: &Tick| Ok(()));
        assert_eq!(m.thread_mode(), ThreadMode::Posting);
        assert_eq!(m.priority(), 0);
        assert!(!m.is_sticky());
        assert_eq!(m.event_type(), EventType::of::<Tick>());
        assert_eq!(m.subscriber_type(), TypeId::of::<Counter>());
    }

    #[test]
    fn test_invoke_downcasts() {
        let m = SubscriberMethod::new(ThreadMode::Posting, |_: &Counter, t: &Tick| {
            if t.0 == 0 {
                Err("zero".into())
            } else {
                Ok(())
            }
        });
        assert!(m.invoke(&Counter, &Tick(1)).is_ok());
        assert_eq!(m.invoke(&Counter, &Tick(0)).unwrap_err().to_string(), "zero");
        assert!(m.invoke(&Counter, &"wrong event").is_err());
        assert!(m.invoke(&"wrong subscriber", &Tick(1)).is_err());
    }

    #[test]
    fn test_thread_mode_labels() {
        assert_eq!(ThreadMode::MainOrdered.to_string(), "main_ordered");
        assert_eq!(ThreadMode::Async.as_label(), "async");
    }
}
