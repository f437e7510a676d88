//! Behavioral peripheral models.
//!
//! This module contains the models substituted for the blackbox instances a
//! design leaves unimplemented: a CompactFlash card on an 8-bit task-file bus,
//! and a byte-wide serial receiver and transmitter.

/// CompactFlash storage controller (ATA task file).
pub mod compactflash;

/// Serial receive and transmit models.
pub mod serial;

pub use compactflash::{CompactFlash, CompactFlashModel};
pub use serial::{SerialRx, SerialTx};

pub use crate::soc::traits::DeviceModel;
