//! Cycle-driven test harness for hardware designs.
//!
//! This crate elaborates a design into a delta-cycle simulation and drives it
//! with the following:
//! 1. **Kernel:** Double-buffered signals, settle loop, and step counting.
//! 2. **Driver:** Reset sequencing, clock generation, and VCD trace capture.
//! 3. **Models:** CompactFlash task-file controller and serial RX/TX, bound to
//!    blackbox instances through a registry keyed by type name.
//! 4. **Designs:** Built-in `echo` and `cfdump` circuits.
//! 5. **Configuration:** JSON-loadable harness and trace settings.

/// Shared constants and the error type.
pub mod common;
/// Harness configuration (defaults, structures, JSON loading).
pub mod config;
/// Built-in designs.
pub mod design;
/// Simulation kernel, clock/reset driver, and waveform trace.
pub mod sim;
/// Device models, host streams, registry, and builder.
pub mod soc;

/// Error type returned by every fallible operation in the crate.
pub use crate::common::HarnessError;
/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Clock/reset driver; attach to a simulation with `Driver::attach`.
pub use crate::sim::Driver;
/// Elaborated design; build with `Simulation::elaborate`.
pub use crate::sim::Simulation;
