//! # Subscribers and their handlers.
//!
//! This module provides the [`Subscriber`] trait, the [`SubscriberMethod`]
//! descriptor and the [`ThreadMode`] policy, plus the registry-owned
//! `Subscription` that binds a descriptor to a subscriber instance.
//!
//! ## Architecture
//! ```text
//! Subscriber::handlers()
//!     │
//!     ├──► SubscriberMethod { event_type, thread_mode, priority, sticky, handler }
//!     ├──► SubscriberMethod { ... }
//!     │
//!     ▼
//! Bus::register(&Arc<S>)
//!     └──► Subscription { subscriber: Arc<S>, method, active } (one per method)
//! ```
//!
//! ## Implementing subscribers
//! ```no_run
//! use eventvisor::{Subscriber, SubscriberMethod, ThreadMode};
//!
//! struct Metrics;
//! struct RequestDone { ms: u64 }
//!
//! impl Subscriber for Metrics {
//!     fn handlers(&self) -> Vec<SubscriberMethod> {
//!         vec![SubscriberMethod::new(ThreadMode::Async, |_m: &Metrics, e: &RequestDone| {
//!             // record e.ms
//!             let _ = e.ms;
//!             Ok(())
//!         })]
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod method;
mod subscriber;
mod subscription;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use method::{SubscriberMethod, ThreadMode};
pub use subscriber::{Subscriber, SubscriberId};
pub(crate) use subscription::Subscription;
