//! Error types used by the bus.
//!
//! [`BusError`] covers every failure the bus can report. Only registration-time
//! structural errors are returned from [`Bus::register`](crate::Bus::register);
//! handler failures are built at the invocation boundary, logged and suppressed.
//!
//! Handlers themselves fail with a [`BoxError`], so any error type works with `?`.

use std::time::Duration;

use thiserror::Error;

/// Boxed error returned by failing handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type every handler returns.
pub type HandlerResult = Result<(), BoxError>;

/// # Errors produced by the event bus.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// The same subscriber instance already handles this event type.
    #[error("subscriber {subscriber} is already registered for {event_type}")]
    DuplicateSubscription {
        /// Subscriber type name.
        subscriber: &'static str,
        /// Event type name.
        event_type: &'static str,
    },

    /// A handler was built for a different subscriber type than the one being registered.
    #[error("handler built for {found} cannot be registered on {expected}")]
    SubscriberTypeMismatch {
        /// Type of the subscriber passed to `register`.
        expected: &'static str,
        /// Subscriber type the handler was built for.
        found: &'static str,
    },

    /// A handler returned an error or panicked.
    ///
    /// Never returned to the poster; logged and reported as
    /// [`HandlerFailed`](crate::HandlerFailed).
    #[error("handler of {subscriber} failed on {event_type}: {reason}")]
    HandlerInvocation {
        /// Subscriber type name.
        subscriber: &'static str,
        /// Event type name.
        event_type: &'static str,
        /// Error message or panic payload.
        reason: String,
    },

    /// Queued deliveries were still running when the shutdown grace period ran out.
    #[error("shutdown grace {grace:?} exceeded; {pending} deliveries still pending")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of queued deliveries that had not finished.
        pending: usize,
    },

    /// [`install_global`](crate::install_global) was called after the global bus was set.
    #[error("global bus is already installed")]
    GlobalAlreadyInstalled,

    /// Building the bus-owned runtime or main loop thread failed.
    #[error("failed to start bus runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::BusError;
    ///
    /// let err = BusError::DuplicateSubscription { subscriber: "Ui", event_type: "Ping" };
    /// assert_eq!(err.as_label(), "bus_duplicate_subscription");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::DuplicateSubscription { .. } => "bus_duplicate_subscription",
            BusError::SubscriberTypeMismatch { .. } => "bus_subscriber_type_mismatch",
            BusError::HandlerInvocation { .. } => "bus_handler_invocation",
            BusError::GraceExceeded { .. } => "bus_grace_exceeded",
            BusError::GlobalAlreadyInstalled => "bus_global_already_installed",
            BusError::Runtime(_) => "bus_runtime",
        }
    }

    /// Indicates whether the error was raised synchronously by `register`.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            BusError::DuplicateSubscription { .. } | BusError::SubscriberTypeMismatch { .. }
        )
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let dup = BusError::DuplicateSubscription {
            subscriber: "A",
            event_type: "Tick",
        };
        assert_eq!(dup.as_label(), "bus_duplicate_subscription");
        assert!(dup.is_registration_error());

        let grace = BusError::GraceExceeded {
            grace: Duration::from_secs(1),
            pending: 3,
        };
        assert_eq!(grace.as_label(), "bus_grace_exceeded");
        assert!(!grace.is_registration_error());
    }

    #[test]
    fn test_display_names_subscriber_and_event() {
        let err = BusError::HandlerInvocation {
            subscriber: "Ui",
            event_type: "Ping",
            reason: "boom".into(),
        };
        assert_eq!(err.to_string(), "handler of Ui failed on Ping: boom");
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
