//! # eventvisor
//!
//! **Eventvisor** is an in-process, typed publish/subscribe event bus.
//!
//! Components register handler methods for event types; posting an event
//! delivers it to every handler registered for that exact type, on the
//! execution context the handler asked for. Handlers are fully decoupled
//! from posters: a failing handler never disturbs the poster or its peers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │  Subscriber  │   │  Subscriber  │   │  Subscriber  │
//!   │ (handlers()) │   │ (handlers()) │   │ (handlers()) │
//!   └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!          └──── register / unregister ──────────┘
//!                             ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Bus                                                             │
//! │  - Registry (event type → ordered subscriptions, sticky cache)   │
//! │  - Dispatcher (thread-mode routing, guarded invocation)          │
//! └──────┬───────────────┬───────────────────┬───────────────┬───────┘
//!        │ Posting       │ Main/MainOrdered  │ Background    │ Async
//!        ▼               ▼                   ▼               ▼
//!  caller thread    MainContext         SerialQueue      WorkerPool
//!                  (MainLoop thread)  (BackgroundWorker)  (AsyncPool)
//! ```
//!
//! ### Post
//! ```text
//! post(event)
//!   ├─► snapshot subscriptions of TypeId(event)   (sticky cache updated here)
//!   ├─► none? ─► NoSubscribers (opt-in), return
//!   └─► for each subscription (priority desc, then registration order):
//!         └─► dispatch ─► context ─► active? ─► handler(&subscriber, &event)
//!                                                 ├─ Ok      ─► done
//!                                                 └─ Err/panic ─► log + HandlerFailed
//! ```
//!
//! ## Features
//! | Area               | Description                                                  | Key types / traits                         |
//! |--------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Subscribers**    | Declare handlers per event type with a thread mode.          | [`Subscriber`], [`SubscriberMethod`]       |
//! | **Thread modes**   | Choose where handlers run.                                   | [`ThreadMode`]                             |
//! | **Contexts**       | Plug in your own main loop, serial queue or worker pool.     | [`MainContext`], [`SerialQueue`], [`WorkerPool`] |
//! | **Sticky events**  | Keep the latest event per type and replay it on register.    | [`Bus::post_sticky`], [`Bus::sticky_event`] |
//! | **Diagnostics**    | Events the bus posts about itself.                           | [`HandlerFailed`], [`NoSubscribers`]       |
//! | **Errors**         | Typed errors for registration and lifecycle.                 | [`BusError`]                               |
//! | **Configuration**  | Centralize bus settings.                                     | [`BusConfig`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber for the diagnostic events.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::mpsc;
//! use eventvisor::{Bus, BusConfig, HandlerResult, Subscriber, SubscriberMethod, ThreadMode};
//!
//! struct Ping(u32);
//!
//! struct Ui {
//!     seen: mpsc::Sender<u32>,
//! }
//!
//! impl Ui {
//!     fn on_ping(&self, ping: &Ping) -> HandlerResult {
//!         self.seen.send(ping.0)?;
//!         Ok(())
//!     }
//! }
//!
//! impl Subscriber for Ui {
//!     fn handlers(&self) -> Vec<SubscriberMethod> {
//!         vec![SubscriberMethod::new(ThreadMode::Async, Ui::on_ping)]
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::builder(BusConfig::default()).build()?;
//!
//!     let (tx, rx) = mpsc::channel();
//!     let ui = Arc::new(Ui { seen: tx });
//!     bus.register(&ui)?;
//!
//!     bus.post(Ping(42));
//!     assert_eq!(rx.recv()?, 42);
//!
//!     bus.unregister(&ui);
//!     Ok(())
//! }
//! ```
mod config;
mod context;
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use config::BusConfig;
pub use context::{AsyncPool, BackgroundWorker, Job, MainContext, MainLoop, SerialQueue, WorkerPool};
pub use core::{Bus, BusBuilder, global, install_global};
pub use error::{BoxError, BusError, HandlerResult};
pub use events::{EventType, HandlerFailed, NoSubscribers};
pub use subscribers::{Subscriber, SubscriberId, SubscriberMethod, ThreadMode};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
