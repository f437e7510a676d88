//! Evaluation traits for everything the kernel steps.
//!
//! This module defines the processes the simulation kernel drives:
//! 1. **Device models:** Hand-written behavioral models substituted for blackbox
//!    instances (`DeviceModel`). They carry a name, a type, and an edge counter.
//! 2. **Design logic:** The circuit's own processes (`Logic`), written in Rust for
//!    the built-in designs.
//!
//! Both are evaluated once per settle pass. Implementors read current values and
//! write next values through [`Signals`]; evaluation order within a pass is
//! therefore irrelevant. [`ClockEdge`] is the rising-edge tracker both use.

use std::fmt;

use crate::common::Result;
use crate::sim::signal::Signals;
use crate::soc::devices::CompactFlash;

/// Behavioral model substituted for a blackbox instance.
pub trait DeviceModel: fmt::Debug + Send {
    /// Instance name from the design (e.g. `"cf"`).
    fn name(&self) -> &str;

    /// Blackbox type the model was created for (e.g. `"compactflash"`).
    fn kind(&self) -> &'static str;

    /// Evaluates the model for one settle pass.
    ///
    /// Synchronous models act only when they observe a rising edge on their
    /// clock port; an error aborts the whole run.
    fn eval(&mut self, signals: &mut Signals) -> Result<()>;

    /// Number of rising clock edges the model has acted on.
    fn posedges(&self) -> u64;

    /// Returns the register file if this model is a storage controller.
    fn as_compactflash(&self) -> Option<&CompactFlash> {
        None
    }
}

/// A process of the circuit itself.
pub trait Logic: Send {
    /// Evaluates the process for one settle pass.
    fn eval(&mut self, signals: &mut Signals);
}

/// Rising-edge detector for a single clock input.
///
/// Remembers the level seen on the previous evaluation, so an edge is reported
/// exactly once no matter how many settle passes follow it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClockEdge {
    prev: bool,
    count: u64,
}

impl ClockEdge {
    /// Creates a detector that assumes the clock starts low.
    pub const fn new() -> Self {
        Self {
            prev: false,
            count: 0,
        }
    }

    /// Records `level` and returns `true` on a low-to-high transition.
    pub const fn posedge(&mut self, level: bool) -> bool {
        let rising = level && !self.prev;
        self.prev = level;
        if rising {
            self.count += 1;
        }
        rising
    }

    /// Rising edges observed so far.
    pub const fn count(&self) -> u64 {
        self.count
    }
}
