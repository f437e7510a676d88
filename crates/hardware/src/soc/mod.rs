//! Design-side components of the harness.
//!
//! This module organizes everything a design is assembled from: the traits the
//! kernel evaluates, the peripheral models and the registry that creates them
//! from blackbox instances, host byte streams, and the builder that wires it
//! all into a [`Simulation`](crate::sim::Simulation).

/// Simulation builder used by designs during elaboration.
pub mod builder;

/// Peripheral model implementations.
pub mod devices;

/// Host terminal input for the serial receiver.
pub mod host;

/// Blackbox instance descriptions.
pub mod instance;

/// Device factories keyed by blackbox type name.
pub mod registry;

/// Evaluation traits for device models and design logic.
pub mod traits;

pub use builder::SystemBuilder;
pub use instance::Instance;
pub use registry::DeviceRegistry;
