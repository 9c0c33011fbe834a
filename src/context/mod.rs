//! # Execution contexts the dispatcher delivers into.
//!
//! The bus does not own a notion of "main thread" or of worker threads; it is
//! handed three collaborators and routes deliveries into them:
//!
//! | Trait           | Used by                           | Default implementation |
//! |-----------------|-----------------------------------|------------------------|
//! | [`MainContext`] | `Main`, `MainOrdered`, `Background` (main check) | [`MainLoop`] (dedicated thread) |
//! | [`SerialQueue`] | `Background` posted from main     | [`BackgroundWorker`] (one job at a time) |
//! | [`WorkerPool`]  | `Async`                           | [`AsyncPool`] (semaphore-bounded) |
//!
//! ## Architecture
//! ```text
//! Dispatcher
//!   ├─► MainContext::enqueue(job) ──► [main queue]   ──► main thread runs job
//!   ├─► SerialQueue::enqueue(job) ──► [serial queue] ──► worker ──► spawn_blocking(job) (awaited)
//!   └─► WorkerPool::submit(job)   ──► acquire permit ──► spawn_blocking(job) (N in parallel)
//! ```
//!
//! Custom implementations (an egui/winit event loop, a GTK main context, an
//! existing thread pool) plug in through
//! [`BusBuilder`](crate::BusBuilder).

mod background;
mod main_loop;
mod pool;

pub use background::BackgroundWorker;
pub use main_loop::MainLoop;
pub use pool::AsyncPool;

/// Zero-argument unit of work handed to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The distinguished serial context (UI thread, event-loop thread, ...).
pub trait MainContext: Send + Sync + 'static {
    /// Returns `true` when the calling thread is the main context.
    fn is_current(&self) -> bool;

    /// Queues `job` to run later on the main context, in FIFO order.
    fn enqueue(&self, job: Job);
}

/// A single shared queue whose jobs never run concurrently with each other.
pub trait SerialQueue: Send + Sync + 'static {
    /// Queues `job` behind every job enqueued before it.
    fn enqueue(&self, job: Job);
}

/// A pool that runs submitted jobs concurrently.
pub trait WorkerPool: Send + Sync + 'static {
    /// Submits `job`; no ordering guarantee relative to other jobs.
    fn submit(&self, job: Job);
}
