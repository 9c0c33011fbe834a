//! # Process-wide default bus.
//!
//! [`global`] lazily builds a bus with [`BusConfig::default`] on first use.
//! Applications that need a custom configuration call [`install_global`]
//! before anything touches the global bus.

use std::sync::OnceLock;

use super::bus::Bus;
use crate::config::BusConfig;
use crate::error::BusError;

static GLOBAL: OnceLock<Bus> = OnceLock::new();

/// Returns the process-wide bus, building it on first call.
///
/// If two threads race on the first call, both may build a bus; only one is
/// kept and the other is dropped.
///
/// ### Errors
/// [`BusError::Runtime`] if the default main loop or runtime cannot be started.
pub fn global() -> Result<&'static Bus, BusError> {
    if let Some(bus) = GLOBAL.get() {
        return Ok(bus);
    }
    let bus = Bus::builder(BusConfig::default()).build()?;
    Ok(GLOBAL.get_or_init(|| bus))
}

/// Installs `bus` as the process-wide bus.
///
/// ### Errors
/// [`BusError::GlobalAlreadyInstalled`] if [`global`] or `install_global` ran before.
pub fn install_global(bus: Bus) -> Result<(), BusError> {
    GLOBAL
        .set(bus)
        .map_err(|_| BusError::GlobalAlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::{SubscriberMethod, ThreadMode};
    use std::sync::Arc;

    struct Tick;
    struct Marker;

    #[test]
    fn test_install_then_global_returns_installed_bus() {
        let bus = Bus::builder(BusConfig::default()).build().unwrap();
        let marker = Arc::new(Marker);
        bus.register_methods(
            &marker,
            vec![SubscriberMethod::new(ThreadMode::Posting, |_: &Marker, _: &Tick| Ok(()))],
        )
        .unwrap();

        install_global(bus).unwrap();
        assert!(global().unwrap().is_registered(&marker));

        let second = Bus::builder(BusConfig::default()).build().unwrap();
        let err = install_global(second).unwrap_err();
        assert!(matches!(err, BusError::GlobalAlreadyInstalled));
    }
}
