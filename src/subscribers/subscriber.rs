//! # Core subscriber trait
//!
//! `Subscriber` is the extension point for plugging handlers into the bus.
//! Instead of scanning annotated methods, a subscriber lists its handlers
//! explicitly; the bus calls [`Subscriber::handlers`] once per registration.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Subscriber, SubscriberMethod, ThreadMode};
//!
//! struct Audit;
//! struct Login { user: String }
//!
//! impl Subscriber for Audit {
//!     fn handlers(&self) -> Vec<SubscriberMethod> {
//!         vec![SubscriberMethod::new(ThreadMode::Background, |_a: &Audit, e: &Login| {
//!             println!("login {}", e.user);
//!             Ok(())
//!         })]
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//!
//! # fn main() -> Result<(), eventvisor::BusError> {
//! let bus = eventvisor::Bus::builder(Default::default()).build()?;
//! let audit = Arc::new(Audit);
//! bus.register(&audit)?;
//! bus.post(Login { user: "ada".into() });
//! bus.unregister(&audit);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::subscribers::SubscriberMethod;

/// Contract for event subscribers.
pub trait Subscriber: Send + Sync + 'static {
    /// Handlers this subscriber wants active, built for `Self`.
    fn handlers(&self) -> Vec<SubscriberMethod>;

    /// Human-readable name (for logs and diagnostic events).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Identity of a registered subscriber instance.
///
/// Derived from the address of the `Arc` allocation. The bus keeps the `Arc`
/// alive while the subscriber is registered, so two live registrations never
/// share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

impl SubscriberId {
    /// Returns the identity of `subscriber`.
    #[inline]
    pub fn of<S: ?Sized>(subscriber: &Arc<S>) -> Self {
        Self(Arc::as_ptr(subscriber) as *const () as usize)
    }
}
