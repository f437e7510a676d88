//! Common types and constants used throughout the harness.
//!
//! 1. **Constants:** Reset length, default signal names, blackbox type names, sector size.
//! 2. **Error Handling:** The [`HarnessError`] enum and crate-wide `Result` alias.

/// Harness-wide constants.
pub mod constants;

/// Error type shared by every component.
pub mod error;

pub use error::{HarnessError, Result};
