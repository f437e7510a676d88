//! Configuration for the harness.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Reset length, signal names, settle bound, and trace parameters.
//! 2. **Structures:** `HarnessConfig` for the driver and kernel, `TraceConfig` for waveforms.
//! 3. **Loading:** JSON parsing from a string or file, followed by validation.
//!
//! Every field is optional in JSON; omitted fields take their default value.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants;
use crate::common::{HarnessError, Result};

/// Default configuration constants for the harness.
mod defaults {
    use super::constants;

    /// Clock signal driven by the harness.
    pub const CLOCK_SIGNAL: &str = constants::CLOCK_SIGNAL;

    /// Reset signal driven by the harness.
    pub const RESET_SIGNAL: &str = constants::RESET_SIGNAL;

    /// Clock cycles spent with reset asserted.
    pub const RESET_CYCLES: u32 = constants::RESET_CYCLES;

    /// Delta passes allowed per step before the design is declared unsettled.
    pub const MAX_DELTA_CYCLES: usize = constants::MAX_DELTA_CYCLES;

    /// Trace timescale in nanoseconds.
    pub const TIMESCALE_NS: u32 = constants::TRACE_TIMESCALE_NS;

    /// Largest chunk handed out by one trace read.
    pub const CHUNK_SIZE: usize = constants::TRACE_CHUNK_SIZE;
}

/// Root configuration.
///
/// # Example
///
/// ```
/// use tbsim_core::config::Config;
///
/// let config = Config::from_json(r#"{ "harness": { "reset_cycles": 4 } }"#).unwrap();
/// assert_eq!(config.harness.reset_cycles, 4);
/// assert_eq!(config.harness.clock_signal, "clk_0__io");
/// assert_eq!(config.trace.timescale_ns, 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Clock/reset driver and kernel settings.
    #[serde(default)]
    pub harness: HarnessConfig,
    /// Waveform trace settings.
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON document.
    ///
    /// # Returns
    ///
    /// The validated configuration, or `ConfigParse`/`Configuration` on failure.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks the configuration for values the harness cannot run with.
    pub fn validate(&self) -> Result<()> {
        let h = &self.harness;
        if h.clock_signal.is_empty() || h.reset_signal.is_empty() {
            return Err(HarnessError::Configuration(
                "clock and reset signal names must not be empty".into(),
            ));
        }
        if h.clock_signal == h.reset_signal {
            return Err(HarnessError::Configuration(format!(
                "clock and reset both name `{}`",
                h.clock_signal
            )));
        }
        if h.reset_cycles == 0 {
            return Err(HarnessError::Configuration(
                "reset_cycles must be at least 1".into(),
            ));
        }
        if h.max_delta_cycles == 0 {
            return Err(HarnessError::Configuration(
                "max_delta_cycles must be at least 1".into(),
            ));
        }
        if self.trace.timescale_ns == 0 || self.trace.chunk_size == 0 {
            return Err(HarnessError::Configuration(
                "trace timescale and chunk size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for the clock/reset driver and the simulation kernel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Name of the clock signal in the design.
    #[serde(default = "HarnessConfig::default_clock_signal")]
    pub clock_signal: String,

    /// Name of the active-high reset signal in the design.
    #[serde(default = "HarnessConfig::default_reset_signal")]
    pub reset_signal: String,

    /// Clock cycles run with reset asserted before the run phase.
    #[serde(default = "HarnessConfig::default_reset_cycles")]
    pub reset_cycles: u32,

    /// Evaluate/commit passes allowed per step.
    #[serde(default = "HarnessConfig::default_max_delta_cycles")]
    pub max_delta_cycles: usize,
}

impl HarnessConfig {
    fn default_clock_signal() -> String {
        defaults::CLOCK_SIGNAL.to_string()
    }

    fn default_reset_signal() -> String {
        defaults::RESET_SIGNAL.to_string()
    }

    const fn default_reset_cycles() -> u32 {
        defaults::RESET_CYCLES
    }

    const fn default_max_delta_cycles() -> usize {
        defaults::MAX_DELTA_CYCLES
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            clock_signal: Self::default_clock_signal(),
            reset_signal: Self::default_reset_signal(),
            reset_cycles: Self::default_reset_cycles(),
            max_delta_cycles: Self::default_max_delta_cycles(),
        }
    }
}

/// Waveform trace settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Nanoseconds per trace tick. One clock cycle spans two ticks.
    #[serde(default = "TraceConfig::default_timescale_ns")]
    pub timescale_ns: u32,

    /// Largest number of bytes returned by one trace read.
    #[serde(default = "TraceConfig::default_chunk_size")]
    pub chunk_size: usize,
}

impl TraceConfig {
    const fn default_timescale_ns() -> u32 {
        defaults::TIMESCALE_NS
    }

    const fn default_chunk_size() -> usize {
        defaults::CHUNK_SIZE
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            timescale_ns: Self::default_timescale_ns(),
            chunk_size: Self::default_chunk_size(),
        }
    }
}
