//! Serial loopback design.
//!
//! Every byte the receiver produces is offered straight to the transmitter.
//! The glue is purely combinational; the receiver's one-byte buffer provides
//! all the storage.

use crate::common::Result;
use crate::common::constants::{CLOCK_SIGNAL, RESET_SIGNAL, SERIAL_RX, SERIAL_TX};
use crate::design::Design;
use crate::sim::signal::{SignalId, Signals};
use crate::soc::builder::SystemBuilder;
use crate::soc::instance::Instance;
use crate::soc::traits::Logic;

/// Selection name.
pub const NAME: &str = "echo";

/// Receive data carries three status bits above the character.
const RX_DATA_WIDTH: u32 = 11;

/// Serial loopback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Design for Echo {
    fn name(&self) -> &'static str {
        NAME
    }

    fn elaborate(&self, b: &mut SystemBuilder<'_>) -> Result<()> {
        let _ = b.signal(CLOCK_SIGNAL, 1)?;
        let rst = b.signal(RESET_SIGNAL, 1)?;

        let loopback = Loopback {
            rst,
            rx_data: b.signal("rx_0__data", RX_DATA_WIDTH)?,
            rx_valid: b.signal("rx_0__valid", 1)?,
            rx_ready: b.signal("rx_0__ready", 1)?,
            rx_rts: b.signal("rx_0__rts", 1)?,
            tx_data: b.signal("tx_0__data", 8)?,
            tx_valid: b.signal("tx_0__valid", 1)?,
            tx_ready: b.signal("tx_0__ready", 1)?,
        };

        b.instance(
            Instance::new("rx_0", SERIAL_RX)
                .port("clk", CLOCK_SIGNAL)
                .port("data", "rx_0__data")
                .port("valid", "rx_0__valid")
                .port("ready", "rx_0__ready")
                .port("rts", "rx_0__rts")
                .param("MAX_BITS", 8),
        )?;
        b.instance(
            Instance::new("tx_0", SERIAL_TX)
                .port("clk", CLOCK_SIGNAL)
                .port("data", "tx_0__data")
                .port("valid", "tx_0__valid")
                .port("ready", "tx_0__ready")
                .param("BITS", 8),
        )?;
        b.logic(loopback);
        Ok(())
    }
}

#[derive(Debug)]
struct Loopback {
    rst: SignalId,
    rx_data: SignalId,
    rx_valid: SignalId,
    rx_ready: SignalId,
    rx_rts: SignalId,
    tx_data: SignalId,
    tx_valid: SignalId,
    tx_ready: SignalId,
}

impl Logic for Loopback {
    fn eval(&mut self, s: &mut Signals) {
        s.set(self.tx_data, s.get(self.rx_data) & 0xff);
        s.set_bool(self.tx_valid, s.get_bool(self.rx_valid));
        s.set_bool(self.rx_ready, s.get_bool(self.tx_ready));
        s.set_bool(self.rx_rts, !s.get_bool(self.rst));
    }
}
