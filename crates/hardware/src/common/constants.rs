//! Global harness constants.
//!
//! This module defines constants shared by the driver, the kernel, and the
//! device models. It includes:
//! 1. **Timing Constants:** Reset length and trace timescale.
//! 2. **Naming Constants:** Default clock/reset signal names and blackbox type names.
//! 3. **Storage Constants:** Sector geometry of the block-storage controller.

/// Number of clock cycles the reset line is held asserted.
pub const RESET_CYCLES: u32 = 20;

/// Trace timescale in nanoseconds per tick.
pub const TRACE_TIMESCALE_NS: u32 = 100;

/// Maximum number of bytes returned by a single trace read.
pub const TRACE_CHUNK_SIZE: usize = 4096;

/// Upper bound on evaluate/commit passes within one step.
pub const MAX_DELTA_CYCLES: usize = 1000;

/// Clock signal exported by the compiled top level.
///
/// The plain `clk` cell of the top level has no next slot; the `_io` alias does.
pub const CLOCK_SIGNAL: &str = "clk_0__io";

/// Reset signal exported by the compiled top level.
pub const RESET_SIGNAL: &str = "rst_0__io";

/// Blackbox type name of the block-storage controller.
pub const COMPACTFLASH: &str = "compactflash";

/// Blackbox type name of the serial receiver.
pub const SERIAL_RX: &str = "serial_rx";

/// Blackbox type name of the serial transmitter.
pub const SERIAL_TX: &str = "serial_tx";

/// Sector size of the storage device in bytes.
pub const SECTOR_SIZE: usize = 512;

/// Sector count used by the read command when the count register holds zero.
pub const SECTORS_WHEN_ZERO: u16 = 256;
