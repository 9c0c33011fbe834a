//! # Bus: the public façade over the registry and the dispatcher.
//!
//! [`Bus`] is a cheap-to-clone handle (internally an `Arc`) exposing
//! `register` / `unregister` / `post`. It owns the subscription registry, the
//! dispatcher and, when it built them, the default execution contexts.
//!
//! ## Flow
//! ```text
//! register(&Arc<S>) ─► S::handlers() ─► Registry::register ─► sticky replays ─► Dispatcher
//! unregister(&Arc<S>) ────────────────► Registry::unregister (active = false, remove)
//! post(event) ─► Registry::snapshot(TypeId) ─► for each active subscription ─► Dispatcher
//! ```
//!
//! ## Rules
//! - **Exact type matching**: an event reaches handlers of its concrete type only
//! - **Snapshot iteration**: a post iterates the list as it was when the post began;
//!   concurrent register/unregister never disturbs it
//! - **Order**: handlers are offered to their channels in priority, then
//!   registration order; delivery across different thread modes is not ordered
//! - **Isolation**: a failing handler never affects the poster or other handlers
//! - **Best-effort unregister**: queued deliveries to an unregistered subscriber
//!   are skipped when dequeued; `unregister` does not wait for running ones
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use eventvisor::{Bus, BusConfig, Subscriber, SubscriberMethod, ThreadMode};
//!
//! struct Ping;
//!
//! #[derive(Default)]
//! struct Counter(AtomicU32);
//!
//! impl Subscriber for Counter {
//!     fn handlers(&self) -> Vec<SubscriberMethod> {
//!         vec![SubscriberMethod::new(ThreadMode::Posting, |c: &Counter, _: &Ping| {
//!             c.0.fetch_add(1, Ordering::SeqCst);
//!             Ok(())
//!         })]
//!     }
//! }
//!
//! # fn main() -> Result<(), eventvisor::BusError> {
//! let bus = Bus::builder(BusConfig::default()).build()?;
//! let counter = Arc::new(Counter::default());
//!
//! bus.register(&counter)?;
//! bus.post(Ping);
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//!
//! bus.unregister(&counter);
//! bus.post(Ping);
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//! # Ok(())
//! # }
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::BusBuilder;
use super::dispatcher::Dispatcher;
use super::registry::{Registrant, Registry};
use super::runtime::RuntimeSlot;
use crate::config::BusConfig;
use crate::error::BusError;
use crate::events::{AnyEvent, EventType, NoSubscribers, is_diagnostic};
use crate::subscribers::{Subscriber, SubscriberId, SubscriberMethod};

pub(crate) struct BusInner {
    pub(crate) registry: Registry,
    pub(crate) dispatcher: Dispatcher,
    /// Stops the default background worker and async pool.
    pub(crate) workers_token: CancellationToken,
    pub(crate) cfg: BusConfig,
    pub(crate) _runtime: RuntimeSlot,
}

/// In-process event bus with thread-mode dispatch.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

impl Bus {
    /// Returns a builder with the given configuration.
    pub fn builder(cfg: BusConfig) -> BusBuilder {
        BusBuilder::new(cfg)
    }

    pub(crate) fn from_inner(inner: Arc<BusInner>) -> Self {
        Self { inner }
    }

    /// Registers every handler returned by [`Subscriber::handlers`].
    ///
    /// Takes the concrete `Arc<S>`, not `Arc<dyn Subscriber>`: each handler
    /// downcasts the stored instance back to `S`, so the bus must know the
    /// concrete type at registration. A heterogeneous set of subscribers is
    /// registered one `register` call per subscriber.
    ///
    /// A sticky handler receives the cached event of its type through its
    /// thread mode; the replay is skipped if a newer event of that type was
    /// posted while the registration was in progress.
    ///
    /// ### Errors
    /// - [`BusError::DuplicateSubscription`] if `subscriber` already handles one
    ///   of the event types (nothing is registered in that case)
    /// - [`BusError::SubscriberTypeMismatch`] if a handler was built for another type
    pub fn register<S: Subscriber>(&self, subscriber: &Arc<S>) -> Result<(), BusError> {
        let methods = subscriber.handlers();
        self.register_as(subscriber, subscriber.name(), methods)
    }

    /// Registers an explicit list of handlers for `subscriber`.
    ///
    /// Same contract as [`register`](Self::register), without requiring the
    /// [`Subscriber`] trait.
    pub fn register_methods<S>(
        &self,
        subscriber: &Arc<S>,
        methods: Vec<SubscriberMethod>,
    ) -> Result<(), BusError>
    where
        S: Send + Sync + 'static,
    {
        self.register_as(subscriber, std::any::type_name::<S>(), methods)
    }

    fn register_as<S>(
        &self,
        subscriber: &Arc<S>,
        name: &'static str,
        methods: Vec<SubscriberMethod>,
    ) -> Result<(), BusError>
    where
        S: Send + Sync + 'static,
    {
        let count = methods.len();
        let id = SubscriberId::of(subscriber);
        let instance: Arc<dyn Any + Send + Sync> = subscriber.clone();
        let who = Registrant {
            id,
            instance,
            type_id: TypeId::of::<S>(),
            type_name: std::any::type_name::<S>(),
            name,
        };

        let replays = self.inner.registry.register(who, methods).inspect_err(|err| {
            debug!(subscriber = name, label = err.as_label(), "registration rejected");
        })?;
        debug!(subscriber = name, ?id, handlers = count, "subscriber registered");

        for (sub, event) in replays {
            let event_type = sub.method().event_type();
            // A post since registration already delivered a newer event.
            if !self.inner.registry.is_latest_sticky(&event_type, &event) {
                trace!(subscriber = name, event_type = %event_type, "stale sticky replay skipped");
                continue;
            }
            trace!(subscriber = name, event_type = %event_type, "replaying sticky event");
            self.inner.dispatcher.dispatch(sub, event);
        }
        Ok(())
    }

    /// Removes every handler of `subscriber`. Unknown subscribers are ignored.
    ///
    /// Safe to call from any thread, including from inside one of the
    /// subscriber's own handlers.
    pub fn unregister<S: ?Sized>(&self, subscriber: &Arc<S>) {
        let id = SubscriberId::of(subscriber);
        if let Some((name, removed)) = self.inner.registry.unregister(id) {
            debug!(subscriber = name, ?id, handlers = removed, "subscriber unregistered");
        }
    }

    /// Returns `true` while `subscriber` has at least one registered handler.
    pub fn is_registered<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        self.inner.registry.is_registered(SubscriberId::of(subscriber))
    }

    /// Number of registered subscriber instances.
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.subscriber_count()
    }

    /// Returns `true` if any handler is registered for events of type `E`.
    pub fn has_subscribers<E: Any>(&self) -> bool {
        self.inner.registry.has_subscribers(&EventType::of::<E>())
    }

    /// Posts `event` to every handler registered for its exact type.
    ///
    /// Posting with no subscribers is not an error. If any handler of `E` is
    /// sticky, the event also replaces the cached sticky event of `E`.
    pub fn post<E: Any + Send + Sync>(&self, event: E) {
        self.post_any(EventType::of::<E>(), Arc::new(event), false);
    }

    /// Like [`post`](Self::post), but always keeps `event` as the sticky event of `E`.
    pub fn post_sticky<E: Any + Send + Sync>(&self, event: E) {
        self.post_any(EventType::of::<E>(), Arc::new(event), true);
    }

    fn post_any(&self, event_type: EventType, event: AnyEvent, sticky: bool) {
        let Some(subs) = self.inner.registry.snapshot(&event_type, &event, sticky) else {
            self.no_subscribers(event_type);
            return;
        };

        trace!(event_type = %event_type, subscribers = subs.len(), "posting event");
        for sub in subs.iter() {
            if sub.is_active() {
                self.inner
                    .dispatcher
                    .dispatch(Arc::clone(sub), Arc::clone(&event));
            }
        }
    }

    fn no_subscribers(&self, event_type: EventType) {
        if is_diagnostic(&event_type) {
            return;
        }
        if self.inner.cfg.log_no_subscribers {
            debug!(event_type = %event_type, "no subscribers for event");
        }
        if self.inner.cfg.send_no_subscribers {
            self.post(NoSubscribers::new(event_type));
        }
    }

    /// Returns the cached sticky event of type `E`.
    pub fn sticky_event<E: Any + Send + Sync>(&self) -> Option<Arc<E>> {
        self.inner
            .registry
            .sticky(&EventType::of::<E>())
            .and_then(|ev| ev.downcast::<E>().ok())
    }

    /// Removes and returns the cached sticky event of type `E`.
    pub fn remove_sticky_event<E: Any + Send + Sync>(&self) -> Option<Arc<E>> {
        self.inner
            .registry
            .remove_sticky(&EventType::of::<E>())
            .and_then(|ev| ev.downcast::<E>().ok())
    }

    /// Drops every cached sticky event.
    pub fn clear_sticky_events(&self) {
        self.inner.registry.clear_sticky();
    }

    /// Returns `true` when called from the bus' main context.
    pub fn is_main_context(&self) -> bool {
        self.inner.dispatcher.is_main_context()
    }

    /// Stops queued delivery and waits for background/async handlers to finish.
    ///
    /// After this call, `Background` deliveries from the main context and all
    /// `Async` deliveries are dropped (with a warning); the other modes keep
    /// working. Waits at most [`BusConfig::grace`]; must be awaited inside a
    /// tokio runtime with the time driver enabled.
    ///
    /// ### Errors
    /// [`BusError::GraceExceeded`] if deliveries were still pending after the grace period.
    pub async fn shutdown(&self) -> Result<(), BusError> {
        let tracker = self.inner.dispatcher.tracker();
        tracker.close();

        let grace = self.inner.cfg.grace;
        let waited = tokio::time::timeout(grace, tracker.wait()).await;
        let pending = tracker.len();
        self.inner.workers_token.cancel();

        match waited {
            Ok(()) => {
                debug!("bus shut down");
                Ok(())
            }
            Err(_) => {
                warn!(?grace, pending, "bus shutdown grace exceeded");
                Err(BusError::GraceExceeded { grace, pending })
            }
        }
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.inner.cfg)
            .finish()
    }
}
