//! Blackbox instantiation points.
//!
//! An [`Instance`] is what the circuit description leaves behind where a
//! peripheral should be: a type name, the signal bound to each port, and
//! integer parameters. The registry turns it into a [`DeviceModel`] at build
//! time.
//!
//! [`DeviceModel`]: crate::soc::traits::DeviceModel

use std::collections::BTreeMap;

use crate::common::{HarnessError, Result};
use crate::sim::signal::{SignalId, Signals};

/// A blackbox instance declared by a design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Instance name, unique within the design.
    pub name: String,
    /// Blackbox type name used for registry lookup.
    pub kind: String,
    /// Port name to signal name bindings.
    pub ports: BTreeMap<String, String>,
    /// Integer parameters (e.g. `BITS`).
    pub params: BTreeMap<String, u64>,
}

impl Instance {
    /// Creates an instance with no ports or parameters.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ports: BTreeMap::new(),
            params: BTreeMap::new(),
        }
    }

    /// Binds `port` to the signal named `signal`.
    #[must_use]
    pub fn port(mut self, port: &str, signal: &str) -> Self {
        let _ = self.ports.insert(port.to_string(), signal.to_string());
        self
    }

    /// Sets an integer parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: u64) -> Self {
        let _ = self.params.insert(name.to_string(), value);
        self
    }

    /// Resolves a required port to its signal handle.
    ///
    /// # Returns
    ///
    /// `UnboundPort` if the design left the port unconnected, `SignalNotFound`
    /// if it names a signal that was never declared.
    pub fn signal(&self, signals: &Signals, port: &str) -> Result<SignalId> {
        let name = self
            .ports
            .get(port)
            .ok_or_else(|| HarnessError::UnboundPort {
                instance: self.name.clone(),
                port: port.to_string(),
            })?;
        signals.require(name)
    }

    /// Returns a parameter value, or `default` when unset.
    pub fn param_or(&self, name: &str, default: u64) -> u64 {
        self.params.get(name).copied().unwrap_or(default)
    }

    /// Builds the error for a parameter value a model cannot honor.
    pub fn unsupported(&self, name: &str, value: u64) -> HarnessError {
        HarnessError::UnsupportedParameter {
            instance: self.name.clone(),
            name: name.to_string(),
            value,
        }
    }
}
