//! Simulation construction.
//!
//! A design elaborates itself into a [`SystemBuilder`]. It performs:
//! 1. **Signal declaration:** Names, widths, and initial values.
//! 2. **Device resolution:** Each blackbox instance is handed to the registry
//!    immediately, so port and parameter errors point at the offending call.
//! 3. **Logic registration:** The design's own processes.
//!
//! [`SystemBuilder::build`] then hands everything to the kernel.

use std::fmt;

use tracing::debug;

use crate::common::Result;
use crate::config::Config;
use crate::sim::signal::{SignalId, Signals};
use crate::sim::simulator::Simulation;
use crate::soc::instance::Instance;
use crate::soc::registry::DeviceRegistry;
use crate::soc::traits::{DeviceModel, Logic};

/// Accumulates signals, device models, and logic for one simulation.
pub struct SystemBuilder<'r> {
    signals: Signals,
    registry: &'r DeviceRegistry,
    devices: Vec<Box<dyn DeviceModel>>,
    logic: Vec<Box<dyn Logic>>,
    max_delta_cycles: usize,
}

impl fmt::Debug for SystemBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemBuilder")
            .field("signals", &self.signals.len())
            .field("devices", &self.devices.len())
            .field("logic", &self.logic.len())
            .finish_non_exhaustive()
    }
}

impl<'r> SystemBuilder<'r> {
    /// Creates an empty builder.
    ///
    /// # Arguments
    ///
    /// * `registry` - Resolves blackbox instances to models.
    /// * `config` - Supplies the kernel's settle bound.
    pub fn new(registry: &'r DeviceRegistry, config: &Config) -> Self {
        Self {
            signals: Signals::new(),
            registry,
            devices: Vec::new(),
            logic: Vec::new(),
            max_delta_cycles: config.harness.max_delta_cycles,
        }
    }

    /// Declares a signal initialized to zero.
    pub fn signal(&mut self, name: &str, width: u32) -> Result<SignalId> {
        self.signals.declare(name, width, 0)
    }

    /// Declares a signal with an explicit initial value.
    pub fn signal_init(&mut self, name: &str, width: u32, init: u64) -> Result<SignalId> {
        self.signals.declare(name, width, init)
    }

    /// Substitutes a model for a blackbox instance.
    ///
    /// Every port the model needs must already be declared.
    pub fn instance(&mut self, instance: Instance) -> Result<()> {
        let model = self.registry.create(&instance, &self.signals)?;
        self.devices.push(model);
        Ok(())
    }

    /// Adds a design process.
    pub fn logic(&mut self, logic: impl Logic + 'static) {
        self.logic.push(Box::new(logic));
    }

    /// Signals declared so far.
    pub const fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Finishes construction.
    pub fn build(self) -> Simulation {
        debug!(
            signals = self.signals.len(),
            devices = self.devices.len(),
            logic = self.logic.len(),
            "simulation built"
        );
        Simulation::from_parts(self.signals, self.devices, self.logic, self.max_delta_cycles)
    }
}
