//! CompactFlash sector dump design.
//!
//! A small bus controller that issues a one-sector READ SECTORS command to the
//! card, waits for DRQ, then streams the 512 data bytes out of the serial
//! transmitter as lowercase hex, sixteen bytes per line.
//!
//! # Bus timing
//!
//! * Writes drive `cs0_n`, `addr`, `data_wr` and pull `iowr_n` low for exactly
//!   one clock.
//! * Reads pull `iord_n` low and hold it until `data_rd_valid` is seen, then
//!   release the strobe for at least one clock before the next access.
//! * A character is handed to the transmitter by raising `valid` and holding it
//!   until `valid` and `ready` are both high on an edge.

use crate::common::Result;
use crate::common::constants::{
    CLOCK_SIGNAL, COMPACTFLASH, RESET_SIGNAL, SECTOR_SIZE, SERIAL_TX,
};
use crate::design::Design;
use crate::sim::signal::{SignalId, Signals};
use crate::soc::builder::SystemBuilder;
use crate::soc::devices::compactflash::{CMD_READ_SECTORS, STATUS_DRQ};
use crate::soc::instance::Instance;
use crate::soc::traits::{ClockEdge, Logic};

/// Selection name.
pub const NAME: &str = "cfdump";

const REG_DATA: u8 = 0x0;
const REG_COUNT: u8 = 0x2;
const REG_STATUS_COMMAND: u8 = 0x7;

const BYTES_PER_LINE: usize = 16;
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Hex dump of the card's first sector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectorDump;

impl Design for SectorDump {
    fn name(&self) -> &'static str {
        NAME
    }

    fn elaborate(&self, b: &mut SystemBuilder<'_>) -> Result<()> {
        let clk = b.signal(CLOCK_SIGNAL, 1)?;
        let rst = b.signal(RESET_SIGNAL, 1)?;

        let bus = CfBus {
            addr: b.signal("cf_0__addr", 3)?,
            data_wr: b.signal("cf_0__data_wr", 8)?,
            data_rd: b.signal("cf_0__data_rd", 8)?,
            data_rd_valid: b.signal("cf_0__data_rd_valid", 1)?,
            cs0_n: b.signal_init("cf_0__cs0_n", 1, 1)?,
            iord_n: b.signal_init("cf_0__iord_n", 1, 1)?,
            iowr_n: b.signal_init("cf_0__iowr_n", 1, 1)?,
        };
        let tx = TxPort {
            data: b.signal("tx_0__data", 8)?,
            valid: b.signal("tx_0__valid", 1)?,
            ready: b.signal("tx_0__ready", 1)?,
        };

        b.instance(
            Instance::new("cf_0", COMPACTFLASH)
                .port("clk", CLOCK_SIGNAL)
                .port("addr", "cf_0__addr")
                .port("data_wr", "cf_0__data_wr")
                .port("data_rd", "cf_0__data_rd")
                .port("data_rd_valid", "cf_0__data_rd_valid")
                .port("cs0_n", "cf_0__cs0_n")
                .port("iord_n", "cf_0__iord_n")
                .port("iowr_n", "cf_0__iowr_n"),
        )?;
        b.instance(
            Instance::new("tx_0", SERIAL_TX)
                .port("clk", CLOCK_SIGNAL)
                .port("data", "tx_0__data")
                .port("valid", "tx_0__valid")
                .port("ready", "tx_0__ready")
                .param("BITS", 8),
        )?;
        b.logic(DumpController::new(clk, rst, bus, tx));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct CfBus {
    addr: SignalId,
    data_wr: SignalId,
    data_rd: SignalId,
    data_rd_valid: SignalId,
    cs0_n: SignalId,
    iord_n: SignalId,
    iowr_n: SignalId,
}

#[derive(Debug, Clone, Copy)]
struct TxPort {
    data: SignalId,
    valid: SignalId,
    ready: SignalId,
}

/// Controller progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    SetCount,
    Command,
    Poll,
    Fetch,
    High(u8),
    Low(u8),
    Separator,
    Done,
}

#[derive(Debug)]
struct DumpController {
    clk: SignalId,
    rst: SignalId,
    bus: CfBus,
    tx: TxPort,
    edge: ClockEdge,
    phase: Phase,
    strobed: bool,
    sent: usize,
}

impl DumpController {
    const fn new(clk: SignalId, rst: SignalId, bus: CfBus, tx: TxPort) -> Self {
        Self {
            clk,
            rst,
            bus,
            tx,
            edge: ClockEdge::new(),
            phase: Phase::SetCount,
            strobed: false,
            sent: 0,
        }
    }

    fn reset(&mut self, s: &mut Signals) {
        self.phase = Phase::SetCount;
        self.strobed = false;
        self.sent = 0;
        s.set_bool(self.bus.cs0_n, true);
        s.set_bool(self.bus.iord_n, true);
        s.set_bool(self.bus.iowr_n, true);
        s.set_bool(self.tx.valid, false);
    }

    /// One-clock register write; returns `true` on the edge the strobe is released.
    fn write(&mut self, s: &mut Signals, addr: u8, data: u8) -> bool {
        if self.strobed {
            s.set_bool(self.bus.iowr_n, true);
            s.set_bool(self.bus.cs0_n, true);
            self.strobed = false;
            return true;
        }
        s.set(self.bus.addr, addr as u64);
        s.set(self.bus.data_wr, data as u64);
        s.set_bool(self.bus.cs0_n, false);
        s.set_bool(self.bus.iowr_n, false);
        self.strobed = true;
        false
    }

    /// Register read; yields the value once the card reports it valid.
    fn read(&mut self, s: &mut Signals, addr: u8) -> Option<u8> {
        if !self.strobed {
            s.set(self.bus.addr, addr as u64);
            s.set_bool(self.bus.cs0_n, false);
            s.set_bool(self.bus.iord_n, false);
            self.strobed = true;
            return None;
        }
        if !s.get_bool(self.bus.data_rd_valid) {
            return None;
        }
        s.set_bool(self.bus.iord_n, true);
        s.set_bool(self.bus.cs0_n, true);
        self.strobed = false;
        Some(s.get(self.bus.data_rd) as u8)
    }

    /// Offers `ch` to the transmitter; returns `true` once it has been taken.
    fn send(&self, s: &mut Signals, ch: u8) -> bool {
        if s.get_bool(self.tx.valid) && s.get_bool(self.tx.ready) {
            s.set_bool(self.tx.valid, false);
            return true;
        }
        s.set(self.tx.data, ch as u64);
        s.set_bool(self.tx.valid, true);
        false
    }

    fn separator(&self) -> u8 {
        if (self.sent + 1) % BYTES_PER_LINE == 0 {
            b'\n'
        } else {
            b' '
        }
    }
}

impl Logic for DumpController {
    fn eval(&mut self, s: &mut Signals) {
        if !self.edge.posedge(s.get_bool(self.clk)) {
            return;
        }
        if s.get_bool(self.rst) {
            self.reset(s);
            return;
        }

        let phase = self.phase;
        self.phase = match phase {
            Phase::SetCount if self.write(s, REG_COUNT, 1) => Phase::Command,
            Phase::Command if self.write(s, REG_STATUS_COMMAND, CMD_READ_SECTORS) => Phase::Poll,
            Phase::Poll => match self.read(s, REG_STATUS_COMMAND) {
                Some(status) if status & STATUS_DRQ != 0 => Phase::Fetch,
                _ => Phase::Poll,
            },
            Phase::Fetch => self.read(s, REG_DATA).map_or(Phase::Fetch, Phase::High),
            Phase::High(byte) if self.send(s, HEX_DIGITS[(byte >> 4) as usize]) => {
                Phase::Low(byte)
            }
            Phase::Low(byte) if self.send(s, HEX_DIGITS[(byte & 0xf) as usize]) => {
                Phase::Separator
            }
            Phase::Separator if self.send(s, self.separator()) => {
                self.sent += 1;
                if self.sent == SECTOR_SIZE {
                    Phase::Done
                } else {
                    Phase::Fetch
                }
            }
            unchanged => unchanged,
        };
    }
}
