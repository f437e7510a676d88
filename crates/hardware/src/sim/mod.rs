//! Simulation kernel and run control.
//!
//! Provides the double-buffered signal table, the delta-cycle kernel that
//! steps a built design, the clock/reset driver that sequences a run, and the
//! VCD tracer the driver samples into.

/// Clock/reset driver and run options.
pub mod driver;

/// Double-buffered signal table.
pub mod signal;

/// Delta-cycle simulation kernel.
pub mod simulator;

/// VCD waveform capture.
pub mod trace;

pub use driver::{Driver, RunOptions, RunSummary};
pub use signal::{SignalId, Signals};
pub use simulator::Simulation;
pub use trace::Tracer;
