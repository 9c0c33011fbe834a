//! Events: type keys and the diagnostic events the bus posts about itself.
//!
//! ## Contents
//! - [`EventType`] identity of a concrete event type, used only as a lookup key
//! - [`HandlerFailed`], [`NoSubscribers`] diagnostic events posted by the bus
//!
//! Application events are plain Rust values (`Any + Send + Sync`); the bus
//! never inspects them beyond their `TypeId`.

mod diagnostic;
mod event;

pub(crate) use diagnostic::is_diagnostic;
pub use diagnostic::{HandlerFailed, NoSubscribers};
pub(crate) use event::AnyEvent;
pub use event::EventType;
