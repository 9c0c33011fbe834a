//! # Subscription registry.
//!
//! Two indices kept consistent under one lock, plus the sticky cache:
//! - `by_event_type`: event type → subscriptions, highest priority first
//! - `types_by_subscriber`: subscriber → event types it handles
//! - `sticky`: event type → last sticky event
//!
//! ## Architecture
//! ```text
//! register(S, methods) ──┐
//! unregister(S) ─────────┼──► Mutex<RegistryState> ──► by_event_type[T] = Arc<[Subscription]>
//! snapshot(T, event) ────┘                              types_by_subscriber[S] = [T, ...]
//!                                                       sticky[T] = event
//! ```
//!
//! ## Rules
//! - Per-type lists are **copy-on-write**: writers build a new `Arc<[..]>`,
//!   readers clone the `Arc` and iterate without holding the lock
//! - A subscription is in `by_event_type[T]` iff `T` is in `types_by_subscriber[S]`
//! - Registration is **all-or-nothing**: a rejected call inserts nothing
//! - Equal priorities keep registration order
//! - The lock is never held while a handler runs

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BusError;
use crate::events::{AnyEvent, EventType};
use crate::subscribers::{SubscriberId, SubscriberMethod, Subscription};

/// Immutable snapshot of the subscriptions for one event type.
pub(crate) type SubscriptionList = Arc<[Arc<Subscription>]>;

/// Sticky replays produced by a registration: deliver after the lock is released.
pub(crate) type StickyReplays = Vec<(Arc<Subscription>, AnyEvent)>;

/// Who is registering, as seen by the registry.
pub(crate) struct Registrant {
    pub(crate) id: SubscriberId,
    pub(crate) instance: Arc<dyn Any + Send + Sync>,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) name: &'static str,
}

#[derive(Default)]
struct RegistryState {
    by_event_type: HashMap<EventType, SubscriptionList>,
    types_by_subscriber: HashMap<SubscriberId, Vec<EventType>>,
    sticky: HashMap<EventType, AnyEvent>,
}

/// Lock-guarded subscription indices.
#[derive(Default)]
pub(crate) struct Registry {
    state: Mutex<RegistryState>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts one subscription per method, or nothing on error.
    ///
    /// Returns the sticky events to replay to the new sticky subscriptions.
    pub(crate) fn register(
        &self,
        who: Registrant,
        methods: Vec<SubscriberMethod>,
    ) -> Result<StickyReplays, BusError> {
        let mut st = self.state.lock();

        let mut seen = HashSet::with_capacity(methods.len());
        if let Some(known) = st.types_by_subscriber.get(&who.id) {
            seen.extend(known.iter().copied());
        }
        for method in &methods {
            if method.subscriber_type() != who.type_id {
                return Err(BusError::SubscriberTypeMismatch {
                    expected: who.type_name,
                    found: method.subscriber_type_name(),
                });
            }
            if !seen.insert(method.event_type()) {
                return Err(BusError::DuplicateSubscription {
                    subscriber: who.name,
                    event_type: method.event_type().name(),
                });
            }
        }

        let mut replays = Vec::new();
        for method in methods {
            let event_type = method.event_type();
            let sticky = method.is_sticky();
            let sub = Arc::new(Subscription::new(
                who.id,
                Arc::clone(&who.instance),
                who.name,
                method,
            ));

            let list = insert_by_priority(st.by_event_type.get(&event_type), Arc::clone(&sub));
            st.by_event_type.insert(event_type, list);
            st.types_by_subscriber
                .entry(who.id)
                .or_default()
                .push(event_type);

            if sticky {
                if let Some(event) = st.sticky.get(&event_type) {
                    replays.push((sub, Arc::clone(event)));
                }
            }
        }
        Ok(replays)
    }

    /// Deactivates and removes every subscription of `id`.
    ///
    /// Returns the subscriber name and the number of removed subscriptions,
    /// or `None` for unknown subscribers.
    pub(crate) fn unregister(&self, id: SubscriberId) -> Option<(&'static str, usize)> {
        let mut st = self.state.lock();
        let types = st.types_by_subscriber.remove(&id)?;

        let mut name = "";
        let mut removed = 0;
        for event_type in types {
            let Some(list) = st.by_event_type.get(&event_type) else {
                continue;
            };
            let mut kept = Vec::with_capacity(list.len());
            for sub in list.iter() {
                if sub.id() == id {
                    sub.deactivate();
                    name = sub.subscriber_name();
                    removed += 1;
                } else {
                    kept.push(Arc::clone(sub));
                }
            }
            if kept.is_empty() {
                st.by_event_type.remove(&event_type);
            } else {
                st.by_event_type.insert(event_type, kept.into());
            }
        }
        Some((name, removed))
    }

    /// Returns the current subscriptions for `event_type`.
    ///
    /// Under the same lock, records `event` as sticky when `force_sticky` is set
    /// or when any current subscription of that type is sticky.
    pub(crate) fn snapshot(
        &self,
        event_type: &EventType,
        event: &AnyEvent,
        force_sticky: bool,
    ) -> Option<SubscriptionList> {
        let mut st = self.state.lock();
        let list = st.by_event_type.get(event_type).cloned();
        let keep = force_sticky
            || list
                .as_ref()
                .is_some_and(|l| l.iter().any(|s| s.method().is_sticky()));
        if keep {
            st.sticky.insert(*event_type, Arc::clone(event));
        }
        list
    }

    /// Returns `true` if `event` is still the cached sticky event of `event_type`.
    pub(crate) fn is_latest_sticky(&self, event_type: &EventType, event: &AnyEvent) -> bool {
        self.state
            .lock()
            .sticky
            .get(event_type)
            .is_some_and(|cached| Arc::ptr_eq(cached, event))
    }

    pub(crate) fn sticky(&self, event_type: &EventType) -> Option<AnyEvent> {
        self.state.lock().sticky.get(event_type).cloned()
    }

    pub(crate) fn remove_sticky(&self, event_type: &EventType) -> Option<AnyEvent> {
        self.state.lock().sticky.remove(event_type)
    }

    pub(crate) fn clear_sticky(&self) {
        self.state.lock().sticky.clear();
    }

    pub(crate) fn has_subscribers(&self, event_type: &EventType) -> bool {
        self.state.lock().by_event_type.contains_key(event_type)
    }

    pub(crate) fn is_registered(&self, id: SubscriberId) -> bool {
        self.state.lock().types_by_subscriber.contains_key(&id)
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.state.lock().types_by_subscriber.len()
    }
}

/// Builds a new list with `sub` after every entry of equal or higher priority.
fn insert_by_priority(list: Option<&SubscriptionList>, sub: Arc<Subscription>) -> SubscriptionList {
    let mut next: Vec<Arc<Subscription>> = list.map(|l| l.to_vec()).unwrap_or_default();
    let priority = sub.method().priority();
    let pos = next
        .iter()
        .position(|s| s.method().priority() < priority)
        .unwrap_or(next.len());
    next.insert(pos, sub);
    next.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::ThreadMode;

    struct Owner;
    struct Other;
    struct Tick;
    struct Tock;

    fn registrant(owner: &Arc<Owner>) -> Registrant {
        Registrant {
            id: SubscriberId::of(owner),
            instance: owner.clone(),
            type_id: TypeId::of::<Owner>(),
            type_name: "Owner",
            name: "Owner",
        }
    }

    fn tick(priority: i32) -> SubscriberMethod {
        SubscriberMethod::new(ThreadMode::Posting, |_: &Owner, _: &Tick| Ok(()))
            .with_priority(priority)
    }

    fn tock() -> SubscriberMethod {
        SubscriberMethod::new(ThreadMode::Posting, |_: &Owner, _: &Tock| Ok(()))
    }

    fn event() -> AnyEvent {
        Arc::new(Tick)
    }

    #[test]
    fn test_indices_stay_in_sync() {
        let reg = Registry::new();
        let a = Arc::new(Owner);
        reg.register(registrant(&a), vec![tick(0), tock()]).unwrap();

        assert!(reg.is_registered(SubscriberId::of(&a)));
        assert!(reg.has_subscribers(&EventType::of::<Tick>()));
        assert!(reg.has_subscribers(&EventType::of::<Tock>()));

        assert_eq!(reg.unregister(SubscriberId::of(&a)), Some(("Owner", 2)));
        assert!(!reg.is_registered(SubscriberId::of(&a)));
        assert!(!reg.has_subscribers(&EventType::of::<Tick>()));
        assert!(!reg.has_subscribers(&EventType::of::<Tock>()));
        assert_eq!(reg.subscriber_count(), 0);
    }

    #[test]
    fn test_duplicate_rejected_without_partial_insert() {
        let reg = Registry::new();
        let a = Arc::new(Owner);
        reg.register(registrant(&a), vec![tick(0)]).unwrap();

        let err = reg
            .register(registrant(&a), vec![tock(), tick(5)])
            .unwrap_err();
        assert!(matches!(err, BusError::DuplicateSubscription { .. }));
        assert!(!reg.has_subscribers(&EventType::of::<Tock>()));

        let list = reg.snapshot(&EventType::of::<Tick>(), &event(), false).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_duplicate_within_one_call() {
        let reg = Registry::new();
        let a = Arc::new(Owner);
        let err = reg.register(registrant(&a), vec![tick(0), tick(1)]).unwrap_err();
        assert!(matches!(err, BusError::DuplicateSubscription { .. }));
        assert_eq!(reg.subscriber_count(), 0);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let reg = Registry::new();
        let a = Arc::new(Owner);
        let foreign = SubscriberMethod::new(ThreadMode::Posting, |_: &Other, _: &Tick| Ok(()));
        let err = reg.register(registrant(&a), vec![foreign]).unwrap_err();
        assert!(matches!(err, BusError::SubscriberTypeMismatch { .. }));
    }

    #[test]
    fn test_priority_order_with_stable_ties() {
        let reg = Registry::new();
        let owners: Vec<Arc<Owner>> = (0..4).map(|_| Arc::new(Owner)).collect();
        let priorities = [0, 10, 0, 10];
        for (owner, p) in owners.iter().zip(priorities) {
            reg.register(registrant(owner), vec![tick(p)]).unwrap();
        }

        let list = reg.snapshot(&EventType::of::<Tick>(), &event(), false).unwrap();
        let order: Vec<SubscriberId> = list.iter().map(|s| s.id()).collect();
        let expected: Vec<SubscriberId> = [1, 3, 0, 2]
            .iter()
            .map(|&i| SubscriberId::of(&owners[i]))
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_snapshot_survives_unregister() {
        let reg = Registry::new();
        let a = Arc::new(Owner);
        reg.register(registrant(&a), vec![tick(0)]).unwrap();

        let snap = reg.snapshot(&EventType::of::<Tick>(), &event(), false).unwrap();
        reg.unregister(SubscriberId::of(&a));

        assert_eq!(snap.len(), 1);
        assert!(!snap[0].is_active());
    }

    #[test]
    fn test_sticky_cache_rules() {
        let reg = Registry::new();
        let t = EventType::of::<Tick>();

        // No sticky subscriber: plain snapshot does not cache.
        assert!(reg.snapshot(&t, &event(), false).is_none());
        assert!(reg.sticky(&t).is_none());

        // Forced (post_sticky): cached even without subscribers.
        reg.snapshot(&t, &event(), true);
        assert!(reg.sticky(&t).is_some());

        // Sticky subscriber registered later gets a replay.
        let a = Arc::new(Owner);
        let replays = reg.register(registrant(&a), vec![tick(0).sticky()]).unwrap();
        assert_eq!(replays.len(), 1);

        let cached = reg.sticky(&t).unwrap();
        assert!(reg.is_latest_sticky(&t, &cached));
        reg.snapshot(&t, &event(), true);
        assert!(!reg.is_latest_sticky(&t, &cached));

        assert!(reg.remove_sticky(&t).is_some());
        assert!(!reg.is_latest_sticky(&t, &cached));
        assert!(reg.sticky(&t).is_none());

        // With a sticky subscriber present, plain posts refresh the cache.
        reg.snapshot(&t, &event(), false);
        assert!(reg.sticky(&t).is_some());
        reg.clear_sticky();
        assert!(reg.sticky(&t).is_none());
    }

    #[test]
    fn test_unknown_unregister_is_noop() {
        let reg = Registry::new();
        let a = Arc::new(Owner);
        assert_eq!(reg.unregister(SubscriberId::of(&a)), None);
    }
}
