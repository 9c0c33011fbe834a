//! # MainLoop: a dedicated thread acting as the main context.
//!
//! Used when the embedding application does not provide its own
//! [`MainContext`]. Jobs run one after another, in enqueue order, on a thread
//! named after the loop.
//!
//! ## Rules
//! - `is_current()` is true only on the loop thread
//! - A panicking job is logged; the loop keeps running
//! - Dropping the last handle (or calling [`MainLoop::stop`]) ends the thread
//!   once already queued jobs have run
//!
//! ## Example
//! ```rust
//! use std::sync::mpsc;
//! use eventvisor::{MainContext, MainLoop};
//!
//! # fn main() -> std::io::Result<()> {
//! let main = MainLoop::spawn("ui")?;
//! let (tx, rx) = mpsc::channel();
//! let probe = main.clone();
//! main.execute(move || tx.send(probe.is_current()).unwrap());
//! assert!(rx.recv().unwrap());
//! assert!(!main.is_current());
//! # Ok(())
//! # }
//! ```

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{error, warn};

use super::{Job, MainContext};
use crate::error::panic_message;

/// Dedicated-thread main context.
pub struct MainLoop {
    tx: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    thread: ThreadId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl MainLoop {
    /// Starts the loop thread.
    pub fn spawn(name: &str) -> io::Result<Arc<Self>> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let loop_name = name.to_string();

        let join = thread::Builder::new().name(name.to_string()).spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                    error!(
                        main_loop = %loop_name,
                        panic = %panic_message(payload.as_ref()),
                        "main loop job panicked"
                    );
                }
            }
        })?;

        Ok(Arc::new(Self {
            tx: Mutex::new(Some(tx)),
            thread: join.thread().id(),
            join: Mutex::new(Some(join)),
        }))
    }

    /// Runs `f` on the loop thread (shorthand for [`MainContext::enqueue`]).
    pub fn execute(&self, f: impl FnOnce() + Send + 'static) {
        self.enqueue(Box::new(f));
    }

    /// Closes the queue and waits for the thread to drain it.
    ///
    /// Called from the loop thread itself, it only closes the queue.
    pub fn stop(&self) {
        drop(self.tx.lock().take());
        if self.is_current() {
            return;
        }
        if let Some(join) = self.join.lock().take() {
            let _ = join.join();
        }
    }
}

impl MainContext for MainLoop {
    fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }

    fn enqueue(&self, job: Job) {
        let sent = match self.tx.lock().as_ref() {
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        };
        if !sent {
            warn!("main loop stopped; job dropped");
        }
    }
}
