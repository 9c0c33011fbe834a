//! # Example: Sticky Events
//!
//! A settings screen registers after the configuration was loaded and still
//! receives the latest `Settings` immediately.
//!
//! Run with: `cargo run --example sticky --features logging`

use std::sync::Arc;

use eventvisor::{Bus, BusConfig, HandlerResult, LogWriter, Subscriber, SubscriberMethod, ThreadMode};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Settings {
    theme: &'static str,
    revision: u32,
}

struct SettingsScreen;

impl SettingsScreen {
    fn on_settings(&self, s: &Settings) -> HandlerResult {
        println!("[screen] rendering theme={} (revision {})", s.theme, s.revision);
        Ok(())
    }
}

impl Subscriber for SettingsScreen {
    fn handlers(&self) -> Vec<SubscriberMethod> {
        vec![SubscriberMethod::new(ThreadMode::Posting, SettingsScreen::on_settings).sticky()]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::builder(BusConfig {
        send_no_subscribers: true,
        ..BusConfig::default()
    })
    .build()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Logs diagnostic events (NoSubscribers / HandlerFailed).
    let writer = Arc::new(LogWriter::new());
    bus.register(&writer)?;

    // Nobody listens yet: NoSubscribers is logged by the writer.
    bus.post_sticky(Settings { theme: "light", revision: 1 });
    bus.post_sticky(Settings { theme: "dark", revision: 2 });
    println!("[main] cached: {:?}", bus.sticky_event::<Settings>());

    let screen = Arc::new(SettingsScreen);
    bus.register(&screen)?;

    bus.post(Settings { theme: "solarized", revision: 3 });
    bus.unregister(&screen);

    if let Some(last) = bus.remove_sticky_event::<Settings>() {
        println!("[main] removed sticky revision {}", last.revision);
    }

    bus.unregister(&writer);
    Ok(())
}
