//! Built-in designs.
//!
//! A design declares its signals, instantiates blackboxes by type name, and
//! registers its own processes on a [`SystemBuilder`]. Two ship with the
//! harness:
//! 1. **`echo`:** Serial receiver looped back into the transmitter.
//! 2. **`cfdump`:** Reads the first sector of the CompactFlash card and prints
//!    it as hex over the serial transmitter.
//!
//! Both expect the harness to drive `clk_0__io` and `rst_0__io`.

/// Serial loopback.
pub mod echo;

/// CompactFlash sector hex dump.
pub mod sector_dump;

use crate::common::{HarnessError, Result};
use crate::soc::builder::SystemBuilder;

pub use echo::Echo;
pub use sector_dump::SectorDump;

/// Names accepted by [`by_name`], default first.
pub const DESIGNS: &[&str] = &[echo::NAME, sector_dump::NAME];

/// A circuit the harness can elaborate and drive.
pub trait Design {
    /// Name the design is selected by.
    fn name(&self) -> &'static str;

    /// Declares signals, blackbox instances, and logic on `builder`.
    fn elaborate(&self, builder: &mut SystemBuilder<'_>) -> Result<()>;
}

/// Looks up a built-in design.
///
/// # Returns
///
/// The design, or `UnknownDesign` if `name` is not in [`DESIGNS`].
pub fn by_name(name: &str) -> Result<Box<dyn Design>> {
    match name {
        echo::NAME => Ok(Box::new(Echo)),
        sector_dump::NAME => Ok(Box::new(SectorDump)),
        other => Err(HarnessError::UnknownDesign(other.to_string())),
    }
}
