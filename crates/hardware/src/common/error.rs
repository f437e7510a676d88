//! Harness error definitions.
//!
//! This module defines the single error type shared by the kernel, the device
//! models, and the driver. It provides:
//! 1. **Elaboration errors:** Missing signals, unbound ports, unknown blackbox types.
//! 2. **Run errors:** Invalid run configuration, failed settling, trace output failures.
//! 3. **Host errors:** Unrecoverable failures on the host input and output streams.
//!
//! Every variant is fatal to the run. Conditions the models recover from (unknown
//! storage commands, input temporarily unavailable) never surface as errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or running a simulation.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A named signal does not exist in the elaborated design.
    #[error("signal `{0}` not found in design")]
    SignalNotFound(String),

    /// A signal name was declared twice.
    #[error("signal `{0}` declared more than once")]
    DuplicateSignal(String),

    /// A signal was declared with a width outside 1..=64.
    #[error("signal `{name}` has unsupported width {width} (expected 1..=64)")]
    InvalidWidth {
        /// Signal name.
        name: String,
        /// Requested width in bits.
        width: u32,
    },

    /// The run or harness configuration is inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::Config`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// No device model is registered for a blackbox type.
    #[error("no device model registered for blackbox `{0}`")]
    UnknownDevice(String),

    /// No built-in design exists with the requested name.
    #[error("unknown design `{0}`")]
    UnknownDesign(String),

    /// A blackbox instance is missing a required port binding.
    #[error("instance `{instance}` has no binding for port `{port}`")]
    UnboundPort {
        /// Instance name.
        instance: String,
        /// Port name.
        port: String,
    },

    /// A blackbox instance carries a parameter value the model cannot honor.
    #[error("instance `{instance}`: unsupported {name}={value}")]
    UnsupportedParameter {
        /// Instance name.
        instance: String,
        /// Parameter name.
        name: String,
        /// Rejected value.
        value: u64,
    },

    /// A step did not converge within the configured number of delta passes.
    #[error("design failed to settle after {0} delta cycles")]
    Unsettled(usize),

    /// The trace output file could not be opened.
    #[error("failed to open trace file {path}: {source}")]
    TraceOpen {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing or draining the waveform trace failed.
    #[error("trace output failed: {0}")]
    TraceIo(#[source] io::Error),

    /// The host input stream failed in a way the receive model cannot recover from.
    #[error("host input failed: {0}")]
    HostInput(#[source] io::Error),

    /// The host output stream rejected a transmitted byte.
    #[error("host output failed: {0}")]
    HostOutput(#[source] io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
