//! Runtime used by the default background worker and async pool.
//!
//! Either a handle supplied by the application, or a multi-thread runtime the
//! bus builds on first need. The owned runtime is dropped with
//! `shutdown_background`, so dropping a bus inside async code does not panic.

use tokio::runtime::{Builder, Handle, Runtime};

use crate::config::BusConfig;

pub(crate) struct RuntimeSlot {
    external: Option<Handle>,
    owned: Option<Runtime>,
}

impl RuntimeSlot {
    pub(crate) fn new(external: Option<Handle>) -> Self {
        Self {
            external,
            owned: None,
        }
    }

    /// Returns the external handle, or builds the owned runtime once.
    pub(crate) fn handle(&mut self, cfg: &BusConfig) -> std::io::Result<Handle> {
        if let Some(handle) = &self.external {
            return Ok(handle.clone());
        }
        if let Some(rt) = &self.owned {
            return Ok(rt.handle().clone());
        }

        let mut builder = Builder::new_multi_thread();
        if let Some(n) = cfg.runtime_threads() {
            builder.worker_threads(n);
        }
        let rt = builder
            .thread_name("eventvisor-worker")
            .max_blocking_threads(cfg.async_workers_clamped() + 1)
            .enable_time()
            .build()?;
        let handle = rt.handle().clone();
        self.owned = Some(rt);
        Ok(handle)
    }
}

impl Drop for RuntimeSlot {
    fn drop(&mut self) {
        if let Some(rt) = self.owned.take() {
            rt.shutdown_background();
        }
    }
}
