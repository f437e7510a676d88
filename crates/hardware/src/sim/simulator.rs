//! Simulation kernel.
//!
//! Owns the signal table, the device models, and the design logic, and
//! advances them one step at a time. A step is a delta-cycle loop:
//! 1. **Evaluate:** Every logic process, then every device model, reads current
//!    values and schedules next values.
//! 2. **Commit:** Next values become current.
//! 3. **Repeat:** Until a commit changes nothing, or the pass limit is hit.
//!
//! Whoever drives the inputs (normally the [`Driver`](crate::sim::driver::Driver))
//! writes them between steps with [`Signals::set`].

use std::fmt;

use tracing::{debug, trace};

use crate::common::{HarnessError, Result};
use crate::config::Config;
use crate::design::Design;
use crate::sim::signal::{SignalId, Signals};
use crate::soc::builder::SystemBuilder;
use crate::soc::registry::DeviceRegistry;
use crate::soc::traits::{DeviceModel, Logic};

/// A fully built design ready to be stepped.
pub struct Simulation {
    signals: Signals,
    devices: Vec<Box<dyn DeviceModel>>,
    logic: Vec<Box<dyn Logic>>,
    max_delta_cycles: usize,
    steps: u64,
}

impl Simulation {
    /// Elaborates `design`, resolving its blackboxes through `registry`.
    ///
    /// # Arguments
    ///
    /// * `design` - The circuit to build.
    /// * `registry` - Factories for the blackbox types the design uses.
    /// * `config` - Kernel settings.
    pub fn elaborate(
        design: &dyn Design,
        registry: &DeviceRegistry,
        config: &Config,
    ) -> Result<Self> {
        let mut builder = SystemBuilder::new(registry, config);
        design.elaborate(&mut builder)?;
        debug!(design = design.name(), "design elaborated");
        Ok(builder.build())
    }

    pub(crate) fn from_parts(
        signals: Signals,
        devices: Vec<Box<dyn DeviceModel>>,
        logic: Vec<Box<dyn Logic>>,
        max_delta_cycles: usize,
    ) -> Self {
        Self {
            signals,
            devices,
            logic,
            max_delta_cycles,
            steps: 0,
        }
    }

    /// Resolves a signal by name, failing with `SignalNotFound`.
    pub fn lookup(&self, name: &str) -> Result<SignalId> {
        self.signals.require(name)
    }

    /// Signal table.
    pub const fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Signal table, for driving inputs between steps.
    pub const fn signals_mut(&mut self) -> &mut Signals {
        &mut self.signals
    }

    /// Commits pending inputs and evaluates until the design settles.
    ///
    /// # Returns
    ///
    /// `Unsettled` if the design still changes after `max_delta_cycles`
    /// passes, or the first error a device model reports.
    pub fn step(&mut self) -> Result<()> {
        // Inputs written since the last step are still in the next slots.
        let _ = self.signals.commit();
        let mut passes = 0;
        loop {
            if passes == self.max_delta_cycles {
                return Err(HarnessError::Unsettled(passes));
            }
            for logic in &mut self.logic {
                logic.eval(&mut self.signals);
            }
            for device in &mut self.devices {
                device.eval(&mut self.signals)?;
            }
            passes += 1;
            if !self.signals.commit() {
                break;
            }
        }
        self.steps += 1;
        trace!(step = self.steps, passes, "step settled");
        Ok(())
    }

    /// Steps completed so far.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Device models in construction order.
    pub fn devices(&self) -> impl Iterator<Item = &dyn DeviceModel> + '_ {
        self.devices.iter().map(|d| d.as_ref())
    }

    /// Finds a device model by instance name.
    pub fn device(&self, name: &str) -> Option<&dyn DeviceModel> {
        self.devices().find(|d| d.name() == name)
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("signals", &self.signals.len())
            .field("devices", &self.devices.iter().map(|d| d.name()).collect::<Vec<_>>())
            .field("logic", &self.logic.len())
            .field("steps", &self.steps)
            .finish()
    }
}

impl Drop for Simulation {
    /// Releases device models newest first, so host state they acquired is
    /// restored in the opposite order it was taken.
    fn drop(&mut self) {
        while let Some(device) = self.devices.pop() {
            drop(device);
        }
    }
}
