//! # AsyncPool: bounded concurrent worker pool.
//!
//! Every submitted job gets its own tokio task that waits for a semaphore
//! permit and then runs the job on the blocking pool. At most
//! `max_async_workers` jobs execute at once; the rest wait for a permit.
//!
//! ## Rules
//! - **No ordering**: jobs submitted back to back may finish in any order
//! - **Bounded**: permits cap concurrent execution, not the number of waiting jobs
//! - **Cancellation**: once the token fires, waiting jobs are dropped

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::{Job, WorkerPool};

/// Semaphore-bounded pool on top of tokio's blocking threads.
pub struct AsyncPool {
    handle: Handle,
    permits: Arc<Semaphore>,
    token: CancellationToken,
}

impl AsyncPool {
    /// Creates a pool running at most `max_workers` jobs at once (min 1).
    pub fn new(handle: Handle, max_workers: usize, token: CancellationToken) -> Self {
        Self {
            handle,
            permits: Arc::new(Semaphore::new(max_workers.max(1))),
            token,
        }
    }

    /// Number of permits currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl WorkerPool for AsyncPool {
    fn submit(&self, job: Job) {
        let permits = Arc::clone(&self.permits);
        let token = self.token.clone();

        self.handle.spawn(async move {
            let permit = tokio::select! {
                _ = token.cancelled() => return,
                permit = permits.acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => return,
                },
            };
            let _ = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job();
            })
            .await;
        });
    }
}
