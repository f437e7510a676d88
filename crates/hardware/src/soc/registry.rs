//! Device factories keyed by blackbox type name.
//!
//! A design names its peripherals by type (`"compactflash"`, `"serial_rx"`,
//! `"serial_tx"`); the registry maps each type to a constructor. Resolution
//! happens once, while the simulation is built, so an unknown type is reported
//! before the first step.

use std::collections::HashMap;
use std::fmt;
use std::io;

use tracing::debug;

use crate::common::constants::{COMPACTFLASH, SERIAL_RX, SERIAL_TX};
use crate::common::{HarnessError, Result};
use crate::sim::signal::Signals;
use crate::soc::devices::{CompactFlashModel, SerialRx, SerialTx};
use crate::soc::host::HostInput;
use crate::soc::instance::Instance;
use crate::soc::traits::DeviceModel;

/// Constructor for one blackbox type.
pub type DeviceFactory =
    Box<dyn Fn(&Instance, &Signals) -> Result<Box<dyn DeviceModel>> + Send + Sync>;

/// Map from blackbox type name to model constructor.
#[derive(Default)]
pub struct DeviceRegistry {
    factories: HashMap<String, DeviceFactory>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the standard models attached to the host.
    ///
    /// `serial_rx` reads the process's stdin (switched to raw, non-blocking
    /// mode while the model lives) and `serial_tx` writes to stdout.
    pub fn with_host_io() -> Self {
        let mut registry = Self::new();
        registry.register(COMPACTFLASH, |inst, signals| {
            Ok(Box::new(CompactFlashModel::new(inst, signals)?))
        });
        registry.register(SERIAL_RX, |inst, signals| {
            let input = HostInput::stdin().map_err(HarnessError::HostInput)?;
            Ok(Box::new(SerialRx::new(inst, signals, Box::new(input))?))
        });
        registry.register(SERIAL_TX, |inst, signals| {
            Ok(Box::new(SerialTx::new(inst, signals, Box::new(io::stdout()))?))
        });
        registry
    }

    /// Registers (or replaces) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn(&Instance, &Signals) -> Result<Box<dyn DeviceModel>> + Send + Sync + 'static,
    {
        if self
            .factories
            .insert(kind.to_string(), Box::new(factory))
            .is_some()
        {
            debug!(kind, "device factory replaced");
        }
    }

    /// Builds the model for `instance`.
    ///
    /// # Returns
    ///
    /// The model, `UnknownDevice` if no factory handles the instance's type, or
    /// whatever error the factory reports for its ports and parameters.
    pub fn create(&self, instance: &Instance, signals: &Signals) -> Result<Box<dyn DeviceModel>> {
        let factory = self
            .factories
            .get(&instance.kind)
            .ok_or_else(|| HarnessError::UnknownDevice(instance.kind.clone()))?;
        let model = factory(instance, signals)?;
        debug!(name = %instance.name, kind = %instance.kind, "device created");
        Ok(model)
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
