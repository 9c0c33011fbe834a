//! # BackgroundWorker: the serial background queue.
//!
//! One tokio task drains an unbounded queue and runs each job on the blocking
//! pool, awaiting it before taking the next one. Jobs therefore never overlap,
//! and a slow handler delays every job queued behind it.
//!
//! ## Architecture
//! ```text
//! enqueue(job) ──► [mpsc queue] ──► worker task
//!                                      └─► spawn_blocking(job).await ─► next
//! ```
//!
//! The worker exits when its cancellation token fires or the queue closes;
//! jobs still queued at that point are dropped.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{Job, SerialQueue};

/// Serial background queue backed by a tokio runtime.
pub struct BackgroundWorker {
    tx: mpsc::UnboundedSender<Job>,
}

impl BackgroundWorker {
    /// Spawns the worker task on `handle`.
    pub fn spawn(handle: &Handle, token: CancellationToken) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        handle.spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    job = rx.recv() => match job {
                        Some(job) => {
                            let _ = tokio::task::spawn_blocking(job).await;
                        }
                        None => break,
                    }
                }
            }
        });

        Self { tx }
    }
}

impl SerialQueue for BackgroundWorker {
    fn enqueue(&self, job: Job) {
        if self.tx.send(job).is_err() {
            warn!("background worker stopped; job dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    #[test]
    fn test_jobs_never_overlap() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let worker = BackgroundWorker::spawn(rt.handle(), CancellationToken::new());
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = std_mpsc::channel();

        for i in 0..6 {
            let running = running.clone();
            let max_seen = max_seen.clone();
            let tx = tx.clone();
            worker.enqueue(Box::new(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(10));
                running.fetch_sub(1, Ordering::SeqCst);
                tx.send(i).unwrap();
            }));
        }

        let order: Vec<_> = (0..6)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancelled_worker_drops_jobs() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let token = CancellationToken::new();
        let worker = BackgroundWorker::spawn(rt.handle(), token.clone());
        token.cancel();
        std::thread::sleep(Duration::from_millis(50));

        let (tx, rx) = std_mpsc::channel::<()>();
        worker.enqueue(Box::new(move || tx.send(()).unwrap()));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
