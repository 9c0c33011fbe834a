//! # Dispatcher: thread-mode routing and guarded invocation.
//!
//! Given one `(subscription, event)` pair, the dispatcher picks the execution
//! context named by the subscription's [`ThreadMode`] and, eventually, invokes
//! the handler there.
//!
//! ## Routing
//! ```text
//! dispatch(sub, event)
//!   ├─ Posting     ─────────────────────────────► invoke (caller thread)
//!   ├─ Main        ─ on main?  yes ─────────────► invoke
//!   │                          no  ─► MainContext::enqueue ─► invoke (main)
//!   ├─ MainOrdered ─────────────────► MainContext::enqueue ─► invoke (main)
//!   ├─ Background  ─ on main?  no  ─────────────► invoke
//!   │                          yes ─► SerialQueue::enqueue ─► invoke (worker)
//!   └─ Async       ─────────────────► WorkerPool::submit   ─► invoke (pool)
//! ```
//!
//! ## Rules
//! - Every invocation re-checks `active` first; stale deliveries are skipped
//! - Errors and panics stop at the invocation boundary: logged, optionally
//!   reported as [`HandlerFailed`], never propagated
//! - Background/async jobs hold a [`TaskTracker`] token until they finish, so
//!   `Bus::shutdown` can wait for them; once the tracker is closed, new
//!   background/async deliveries are dropped

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use tokio_util::task::TaskTracker;
use tracing::{error, trace, warn};

use crate::context::{Job, MainContext, SerialQueue, WorkerPool};
use crate::core::bus::{Bus, BusInner};
use crate::error::{BusError, panic_message};
use crate::events::{AnyEvent, HandlerFailed};
use crate::subscribers::{Subscription, ThreadMode};

/// Failure handling shared by every invocation site.
#[derive(Clone)]
pub(crate) struct Invoker {
    log_failures: bool,
    report_failures: bool,
    bus: Weak<BusInner>,
}

impl Invoker {
    pub(crate) fn new(log_failures: bool, report_failures: bool, bus: Weak<BusInner>) -> Self {
        Self {
            log_failures,
            report_failures,
            bus,
        }
    }

    /// Invokes the handler unless the subscription went inactive.
    pub(crate) fn invoke(&self, sub: &Subscription, event: &AnyEvent) {
        if !sub.is_active() {
            trace!(
                subscriber = sub.subscriber_name(),
                event_type = %sub.method().event_type(),
                "skipping delivery to unregistered subscriber"
            );
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| sub.invoke(&**event)));
        let reason = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };
        self.fail(sub, reason);
    }

    fn fail(&self, sub: &Subscription, reason: String) {
        let method = sub.method();
        let event_type = method.event_type();

        if self.log_failures {
            let err = BusError::HandlerInvocation {
                subscriber: sub.subscriber_name(),
                event_type: event_type.name(),
                reason: reason.clone(),
            };
            error!(
                subscriber = sub.subscriber_name(),
                event_type = %event_type,
                thread_mode = %method.thread_mode(),
                label = err.as_label(),
                "{err}"
            );
        }

        // A failing HandlerFailed handler is not reported again.
        if !self.report_failures || event_type.is::<HandlerFailed>() {
            return;
        }
        if let Some(inner) = self.bus.upgrade() {
            Bus::from_inner(inner).post(HandlerFailed::new(
                sub.subscriber_name(),
                event_type,
                method.thread_mode(),
                reason,
            ));
        }
    }
}

/// Routes deliveries to the execution context of each thread mode.
pub(crate) struct Dispatcher {
    main: Arc<dyn MainContext>,
    background: Arc<dyn SerialQueue>,
    pool: Arc<dyn WorkerPool>,
    tracker: TaskTracker,
    invoker: Invoker,
}

impl Dispatcher {
    pub(crate) fn new(
        main: Arc<dyn MainContext>,
        background: Arc<dyn SerialQueue>,
        pool: Arc<dyn WorkerPool>,
        invoker: Invoker,
    ) -> Self {
        Self {
            main,
            background,
            pool,
            tracker: TaskTracker::new(),
            invoker,
        }
    }

    pub(crate) fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub(crate) fn is_main_context(&self) -> bool {
        self.main.is_current()
    }

    /// Hands one delivery to the context selected by its thread mode.
    pub(crate) fn dispatch(&self, sub: Arc<Subscription>, event: AnyEvent) {
        match sub.method().thread_mode() {
            ThreadMode::Posting => self.invoker.invoke(&sub, &event),
            ThreadMode::Main => {
                if self.main.is_current() {
                    self.invoker.invoke(&sub, &event);
                } else {
                    self.main.enqueue(self.job(sub, event));
                }
            }
            ThreadMode::MainOrdered => self.main.enqueue(self.job(sub, event)),
            ThreadMode::Background => {
                if !self.main.is_current() {
                    self.invoker.invoke(&sub, &event);
                } else if let Some(job) = self.tracked_job(sub, event) {
                    self.background.enqueue(job);
                }
            }
            ThreadMode::Async => {
                if let Some(job) = self.tracked_job(sub, event) {
                    self.pool.submit(job);
                }
            }
        }
    }

    fn job(&self, sub: Arc<Subscription>, event: AnyEvent) -> Job {
        let invoker = self.invoker.clone();
        Box::new(move || invoker.invoke(&sub, &event))
    }

    /// Wraps a job with a tracker token; `None` once the bus is shut down.
    fn tracked_job(&self, sub: Arc<Subscription>, event: AnyEvent) -> Option<Job> {
        if self.tracker.is_closed() {
            warn!(
                subscriber = sub.subscriber_name(),
                event_type = %sub.method().event_type(),
                thread_mode = %sub.method().thread_mode(),
                "bus is shut down; delivery dropped"
            );
            return None;
        }
        let token = self.tracker.token();
        let job = self.job(sub, event);
        Some(Box::new(move || {
            let _token = token;
            job();
        }))
    }
}
