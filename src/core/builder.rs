use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::bus::{Bus, BusInner};
use super::dispatcher::{Dispatcher, Invoker};
use super::registry::Registry;
use super::runtime::RuntimeSlot;
use crate::config::BusConfig;
use crate::context::{AsyncPool, BackgroundWorker, MainContext, MainLoop, SerialQueue, WorkerPool};
use crate::error::BusError;

/// Name of the thread started when no main context is supplied.
const DEFAULT_MAIN_LOOP: &str = "eventvisor-main";

/// Builder for constructing a [`Bus`] with optional collaborators.
///
/// Anything not supplied gets a default:
/// - main context → a dedicated [`MainLoop`] thread
/// - background queue → [`BackgroundWorker`]
/// - worker pool → [`AsyncPool`] with `max_async_workers` permits
/// - runtime → a bus-owned multi-thread runtime
pub struct BusBuilder {
    cfg: BusConfig,
    main: Option<Arc<dyn MainContext>>,
    background: Option<Arc<dyn SerialQueue>>,
    pool: Option<Arc<dyn WorkerPool>>,
    runtime: Option<Handle>,
}

impl BusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BusConfig) -> Self {
        Self {
            cfg,
            main: None,
            background: None,
            pool: None,
            runtime: None,
        }
    }

    /// Sets the main context `Main`/`MainOrdered` handlers run on.
    pub fn with_main_context(mut self, main: Arc<dyn MainContext>) -> Self {
        self.main = Some(main);
        self
    }

    /// Sets the serial queue for `Background` handlers posted from the main context.
    pub fn with_background_queue(mut self, queue: Arc<dyn SerialQueue>) -> Self {
        self.background = Some(queue);
        self
    }

    /// Sets the pool `Async` handlers run on.
    pub fn with_worker_pool(mut self, pool: Arc<dyn WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Runs the default background worker and async pool on an existing runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Builds the bus.
    ///
    /// Fails with [`BusError::Runtime`] when the owned runtime or the default
    /// main loop thread cannot be started.
    pub fn build(self) -> Result<Bus, BusError> {
        let cfg = self.cfg;
        let workers_token = CancellationToken::new();

        let mut runtime = RuntimeSlot::new(self.runtime);

        let main: Arc<dyn MainContext> = match self.main {
            Some(main) => main,
            None => MainLoop::spawn(DEFAULT_MAIN_LOOP)?,
        };

        let background: Arc<dyn SerialQueue> = match self.background {
            Some(queue) => queue,
            None => Arc::new(BackgroundWorker::spawn(
                &runtime.handle(&cfg)?,
                workers_token.child_token(),
            )),
        };

        let pool: Arc<dyn WorkerPool> = match self.pool {
            Some(pool) => pool,
            None => Arc::new(AsyncPool::new(
                runtime.handle(&cfg)?,
                cfg.async_workers_clamped(),
                workers_token.child_token(),
            )),
        };

        let inner = Arc::new_cyclic(|weak| {
            let invoker = Invoker::new(
                cfg.log_handler_failures,
                cfg.send_handler_failed,
                weak.clone(),
            );
            BusInner {
                registry: Registry::new(),
                dispatcher: Dispatcher::new(main, background, pool, invoker),
                workers_token,
                cfg,
                _runtime: runtime,
            }
        });
        Ok(Bus::from_inner(inner))
    }
}
