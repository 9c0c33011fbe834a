//! # Subscription: a handler bound to one subscriber instance.
//!
//! The `active` flag is the seam between `unregister` and in-flight delivery:
//! it is cleared (Release) before the subscription leaves the registry, and
//! every channel loads it (Acquire) right before invoking the handler.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::HandlerResult;
use crate::subscribers::{SubscriberId, SubscriberMethod};

/// Registry-owned pairing of a subscriber instance and one of its handlers.
pub(crate) struct Subscription {
    id: SubscriberId,
    subscriber: Arc<dyn Any + Send + Sync>,
    subscriber_name: &'static str,
    method: SubscriberMethod,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        subscriber: Arc<dyn Any + Send + Sync>,
        subscriber_name: &'static str,
        method: SubscriberMethod,
    ) -> Self {
        Self {
            id,
            subscriber,
            subscriber_name,
            method,
            active: AtomicBool::new(true),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> SubscriberId {
        self.id
    }

    #[inline]
    pub(crate) fn subscriber_name(&self) -> &'static str {
        self.subscriber_name
    }

    #[inline]
    pub(crate) fn method(&self) -> &SubscriberMethod {
        &self.method
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Clears the active flag. Returns `true` only for the first call.
    #[inline]
    pub(crate) fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub(crate) fn invoke(&self, event: &(dyn Any + Send + Sync)) -> HandlerResult {
        self.method.invoke(self.subscriber.as_ref(), event)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("subscriber", &self.subscriber_name)
            .field("method", &self.method)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::ThreadMode;

    struct Owner;
    struct Tick;

    #[test]
    fn test_deactivate_once() {
        let owner = Arc::new(Owner);
        let sub = Subscription::new(
            SubscriberId::of(&owner),
            owner.clone(),
            "Owner",
            SubscriberMethod::new(ThreadMode::Posting, |_: &Owner, _: &Tick| Ok(())),
        );
        assert!(sub.is_active());
        assert!(sub.deactivate());
        assert!(!sub.deactivate());
        assert!(!sub.is_active());
        assert!(sub.invoke(&Tick).is_ok());
    }

    #[test]
    fn test_debug_names_subscriber() {
        let owner = Arc::new(Owner);
        let sub = Subscription::new(
            SubscriberId::of(&owner),
            owner.clone(),
            "Owner",
            SubscriberMethod::new(ThreadMode::Posting, |_: &Owner, _: &Tick| Ok(())),
        );
        let out = format!("{sub:?}");
        assert!(out.contains("Owner"));
        assert!(out.contains("active: true"));
    }
}
