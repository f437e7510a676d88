//! Kernel-level suites.


/// Signal table behavior seen through the public API.
pub mod signal;

/// Delta-cycle settling and device ordering.
pub mod simulator;
