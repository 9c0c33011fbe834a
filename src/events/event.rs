//! # Event type identity.
//!
//! [`EventType`] is the dispatch key: the concrete [`TypeId`] of a posted value.
//! Only exact types match; a handler for `A` never sees a `B`, whatever their
//! relationship (there is no subtyping between Rust types to begin with, and
//! wrappers like `Box<A>` or `Arc<A>` are distinct types).
//!
//! ## Example
//! ```rust
//! use eventvisor::EventType;
//!
//! struct Ping;
//! struct Pong;
//!
//! assert_eq!(EventType::of::<Ping>(), EventType::of::<Ping>());
//! assert_ne!(EventType::of::<Ping>(), EventType::of::<Pong>());
//! assert!(EventType::of::<Ping>().name().ends_with("Ping"));
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Type-erased event as it travels through the dispatcher.
pub(crate) type AnyEvent = Arc<dyn Any + Send + Sync>;

/// Identity of a concrete event type.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for logs.
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    /// Returns the event type key of `E`.
    #[inline]
    pub fn of<E: Any>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    /// Underlying [`TypeId`].
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name (for logs; not guaranteed stable across compilers).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) fn is<E: Any>(&self) -> bool {
        self.id == TypeId::of::<E>()
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Ping;
    struct Wrapper(#[allow(dead_code)] Ping);

    #[test]
    fn test_exact_type_identity() {
        assert_eq!(EventType::of::<Ping>(), EventType::of::<Ping>());
        assert_ne!(EventType::of::<Ping>(), EventType::of::<Wrapper>());
        assert_ne!(EventType::of::<Ping>(), EventType::of::<Box<Ping>>());
        assert!(EventType::of::<Ping>().is::<Ping>());
        assert!(!EventType::of::<Ping>().is::<Wrapper>());
    }

    #[test]
    fn test_usable_as_map_key() {
        let mut set = HashSet::new();
        set.insert(EventType::of::<Ping>());
        set.insert(EventType::of::<Ping>());
        set.insert(EventType::of::<String>());
        assert_eq!(set.len(), 2);
    }
}
