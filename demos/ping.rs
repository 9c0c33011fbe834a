//! # Example: Thread Modes
//!
//! One tracer per thread mode, all subscribed to the same event. The event is
//! posted from an ordinary thread and then from the main loop; each handler
//! prints the thread it ran on.
//!
//! Run with: `cargo run --example ping`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use eventvisor::{Bus, BusConfig, HandlerResult, MainLoop, Subscriber, SubscriberMethod, ThreadMode};

#[derive(Debug)]
struct Ping {
    from: &'static str,
}

struct Tracer {
    mode: ThreadMode,
}

impl Tracer {
    fn on_ping(&self, ping: &Ping) -> HandlerResult {
        let current = thread::current();
        println!(
            "[{:<12}] ping from {:<6} handled on {}",
            self.mode.as_label(),
            ping.from,
            current.name().unwrap_or("<unnamed>")
        );
        Ok(())
    }
}

impl Subscriber for Tracer {
    fn handlers(&self) -> Vec<SubscriberMethod> {
        vec![SubscriberMethod::new(self.mode, Tracer::on_ping)]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ui = MainLoop::spawn("ui")?;
    let bus = Bus::builder(BusConfig::default())
        .with_main_context(ui.clone())
        .with_runtime(tokio::runtime::Handle::current())
        .build()?;

    let tracers: Vec<Arc<Tracer>> = [
        ThreadMode::Posting,
        ThreadMode::Main,
        ThreadMode::MainOrdered,
        ThreadMode::Background,
        ThreadMode::Async,
    ]
    .into_iter()
    .map(|mode| Arc::new(Tracer { mode }))
    .collect();
    for t in &tracers {
        bus.register(t)?;
    }

    println!("--- posting from {:?}", thread::current().name());
    bus.post(Ping { from: "tokio" });
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!("--- posting from the ui loop");
    let b = bus.clone();
    ui.execute(move || b.post(Ping { from: "ui" }));
    tokio::time::sleep(Duration::from_millis(200)).await;

    for t in &tracers {
        bus.unregister(t);
    }
    bus.shutdown().await?;
    ui.stop();
    Ok(())
}
