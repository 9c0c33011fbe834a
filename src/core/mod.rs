//! Bus core: registry, dispatch and lifecycle.
//!
//! The public API from this module is [`Bus`] with its [`BusBuilder`], plus the
//! process-wide [`global`] bus.
//!
//! Internal modules:
//! - [`registry`]: subscription lists per event type, subscriber index, sticky cache;
//! - [`dispatcher`]: thread-mode routing and guarded handler invocation;
//! - [`runtime`]: the tokio runtime backing the default background/async contexts;
//! - [`builder`]: wires collaborators into a [`Bus`].

mod builder;
mod bus;
mod dispatcher;
mod global;
mod registry;
mod runtime;

pub use builder::BusBuilder;
pub use bus::Bus;
pub use global::{global, install_global};
