//! Byte-wide serial receiver and transmitter.
//!
//! Both models stand in for a UART on the circuit side of a ready/valid stream:
//! 1. **`SerialRx`:** A one-byte-deep producer fed from a [`ByteSource`] (host
//!    stdin by default), polled without blocking on each rising edge.
//! 2. **`SerialTx`:** A consumer that is always ready and writes every byte it
//!    accepts straight to a sink (host stdout by default).
//!
//! Bit timing, parity, and framing are not modeled; a transfer is one byte per
//! edge on which `valid` and `ready` are both high.

use std::fmt;
use std::io::{self, Write};
use std::thread;

use crate::common::constants::{SERIAL_RX, SERIAL_TX};
use crate::common::{HarnessError, Result};
use crate::sim::signal::{SignalId, Signals};
use crate::soc::host::ByteSource;
use crate::soc::instance::Instance;
use crate::soc::traits::{ClockEdge, DeviceModel};

/// Widest character the receiver can deliver.
const RX_MAX_BITS: u64 = 8;

/// Only character width the transmitter supports.
const TX_BITS: u64 = 8;

/// Serial receiver producing bytes from a byte source.
pub struct SerialRx {
    name: String,
    clk: SignalId,
    data: SignalId,
    valid: SignalId,
    ready: SignalId,
    rts: SignalId,
    /// Mask selecting the low `MAX_BITS` bits of a received byte.
    char_mask: u64,
    edge: ClockEdge,
    source: Box<dyn ByteSource>,
}

impl SerialRx {
    /// Binds a receiver to the ports of `instance`.
    ///
    /// # Arguments
    ///
    /// * `instance` - Needs `clk`, `data`, `valid`, `ready`, `rts`; parameter
    ///   `MAX_BITS` (default 8) must be in 1..=8.
    /// * `signals` - Signal table the ports resolve against.
    /// * `source` - Where received bytes come from.
    pub fn new(
        instance: &Instance,
        signals: &Signals,
        source: Box<dyn ByteSource>,
    ) -> Result<Self> {
        let max_bits = instance.param_or("MAX_BITS", RX_MAX_BITS);
        if !(1..=RX_MAX_BITS).contains(&max_bits) {
            return Err(instance.unsupported("MAX_BITS", max_bits));
        }
        Ok(Self {
            name: instance.name.clone(),
            clk: instance.signal(signals, "clk")?,
            data: instance.signal(signals, "data")?,
            valid: instance.signal(signals, "valid")?,
            ready: instance.signal(signals, "ready")?,
            rts: instance.signal(signals, "rts")?,
            char_mask: (1 << max_bits) - 1,
            edge: ClockEdge::new(),
            source,
        })
    }
}

impl DeviceModel for SerialRx {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        SERIAL_RX
    }

    /// Advances the one-byte buffer on the rising edge.
    ///
    /// An accepted byte (`ready` and `valid` both high) is retired first; a new
    /// byte is then fetched only if the output slot is free for the next cycle
    /// and the consumer requests data.
    fn eval(&mut self, signals: &mut Signals) -> Result<()> {
        if !self.edge.posedge(signals.get_bool(self.clk)) {
            return Ok(());
        }

        if signals.get_bool(self.ready) && signals.get_bool(self.valid) {
            signals.set_bool(self.valid, false);
        }

        if !signals.next_bool(self.valid) && signals.get_bool(self.rts) {
            if let Some(byte) = self.source.poll_byte().map_err(HarnessError::HostInput)? {
                signals.set(self.data, u64::from(byte) & self.char_mask);
                signals.set_bool(self.valid, true);
            }
        }
        Ok(())
    }

    fn posedges(&self) -> u64 {
        self.edge.count()
    }
}

impl fmt::Debug for SerialRx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialRx")
            .field("name", &self.name)
            .field("posedges", &self.edge.count())
            .finish_non_exhaustive()
    }
}

/// Serial transmitter writing accepted bytes to a sink.
pub struct SerialTx {
    name: String,
    clk: SignalId,
    data: SignalId,
    valid: SignalId,
    ready: SignalId,
    edge: ClockEdge,
    sink: Box<dyn Write + Send>,
}

impl SerialTx {
    /// Binds a transmitter to the ports of `instance`.
    ///
    /// # Arguments
    ///
    /// * `instance` - Needs `clk`, `data`, `valid`, `ready`; parameter `BITS`
    ///   must be 8 when present.
    /// * `signals` - Signal table the ports resolve against.
    /// * `sink` - Where transmitted bytes go; flushed after every byte.
    pub fn new(
        instance: &Instance,
        signals: &Signals,
        sink: Box<dyn Write + Send>,
    ) -> Result<Self> {
        let bits = instance.param_or("BITS", TX_BITS);
        if bits != TX_BITS {
            return Err(instance.unsupported("BITS", bits));
        }
        Ok(Self {
            name: instance.name.clone(),
            clk: instance.signal(signals, "clk")?,
            data: instance.signal(signals, "data")?,
            valid: instance.signal(signals, "valid")?,
            ready: instance.signal(signals, "ready")?,
            edge: ClockEdge::new(),
            sink,
        })
    }

    /// Writes and flushes one byte, retrying while a non-blocking sink is full.
    fn emit(&mut self, byte: u8) -> io::Result<()> {
        loop {
            match self.sink.write(&[byte]) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(_) => break,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    thread::yield_now();
                }
                Err(e) => return Err(e),
            }
        }
        loop {
            match self.sink.flush() {
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::yield_now(),
                other => return other,
            }
        }
    }
}

impl DeviceModel for SerialTx {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        SERIAL_TX
    }

    /// Asserts `ready` and, if `valid` is high, emits the low byte of `data`.
    fn eval(&mut self, signals: &mut Signals) -> Result<()> {
        if !self.edge.posedge(signals.get_bool(self.clk)) {
            return Ok(());
        }

        signals.set_bool(self.ready, true);
        if signals.get_bool(self.valid) {
            let byte = (signals.get(self.data) & 0xff) as u8;
            self.emit(byte).map_err(HarnessError::HostOutput)?;
        }
        Ok(())
    }

    fn posedges(&self) -> u64 {
        self.edge.count()
    }
}

impl fmt::Debug for SerialTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTx")
            .field("name", &self.name)
            .field("posedges", &self.edge.count())
            .finish_non_exhaustive()
    }
}
