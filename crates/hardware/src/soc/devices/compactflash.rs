//! CompactFlash storage controller (True IDE mode, 8-bit task file).
//!
//! Implements the eight-register ATA task file a CompactFlash card exposes on
//! its 8-bit bus, and the port-level model that drives it from the circuit's
//! chip-select and I/O strobes. Only the read-sectors path is modeled; the
//! sector contents are a deterministic placeholder pattern.
//!
//! # Registers
//!
//! * `0x0`: Data (read pops the next sector byte)
//! * `0x1`: Error (read) / Feature (write)
//! * `0x2`: Sector count
//! * `0x3`: Sector number (1-based)
//! * `0x4`: Cylinder low
//! * `0x5`: Cylinder high
//! * `0x6`: Drive/head (`mode[1:0]`, device select, head)
//! * `0x7`: Status (read) / Command (write)

use tracing::{debug, trace, warn};

use crate::common::Result;
use crate::common::constants::{COMPACTFLASH, SECTOR_SIZE, SECTORS_WHEN_ZERO};
use crate::sim::signal::{SignalId, Signals};
use crate::soc::instance::Instance;
use crate::soc::traits::{ClockEdge, DeviceModel};

/// Data register.
const REG_DATA: u8 = 0x0;
/// Error register (read) / Feature register (write).
const REG_ERROR_FEATURE: u8 = 0x1;
/// Sector count register.
const REG_COUNT: u8 = 0x2;
/// Sector number register.
const REG_SECTOR: u8 = 0x3;
/// Cylinder low register.
const REG_CYLINDER_LOW: u8 = 0x4;
/// Cylinder high register.
const REG_CYLINDER_HIGH: u8 = 0x5;
/// Drive/head register.
const REG_DRIVE_HEAD: u8 = 0x6;
/// Status register (read) / Command register (write).
const REG_STATUS_COMMAND: u8 = 0x7;

/// Status: drive ready (power-up finished).
pub const STATUS_RDY: u8 = 1 << 6;
/// Status: data request, a byte is pending in the sector buffer.
pub const STATUS_DRQ: u8 = 1 << 3;

/// Command: read sectors.
pub const CMD_READ_SECTORS: u8 = 0x20;
/// Command: set features.
pub const CMD_SET_FEATURES: u8 = 0xEF;

/// Feature: enable 8-bit data transfers.
const FEATURE_8BIT: u8 = 0x01;
/// Feature: enable volatile write cache.
const FEATURE_WRITE_CACHE_ON: u8 = 0x02;
/// Feature: disable volatile write cache.
const FEATURE_WRITE_CACHE_OFF: u8 = 0x82;

/// Drive/head mode field for cylinder-head-sector addressing.
pub const MODE_CHS: u8 = 0b101;
/// Drive/head mode field for 28-bit logical block addressing.
pub const MODE_LBA28: u8 = 0b111;

/// ATA task-file register state of the card.
#[derive(Debug, Clone)]
pub struct CompactFlash {
    count: u8,
    sector: u8,
    cylinder: u16,
    head: u8,
    device_select: bool,
    mode: u8,
    feature: u8,
    sectors_remaining: u16,
    buffer: [u8; SECTOR_SIZE],
    cursor: usize,
}

impl Default for CompactFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactFlash {
    /// Creates a card in its power-on state: sector 1, CHS mode, empty buffer.
    pub const fn new() -> Self {
        Self {
            count: 0,
            sector: 1,
            cylinder: 0,
            head: 0,
            device_select: false,
            mode: MODE_CHS,
            feature: 0,
            sectors_remaining: 0,
            buffer: [0; SECTOR_SIZE],
            cursor: SECTOR_SIZE,
        }
    }

    /// Reads a task-file register. Reading the data register consumes a byte.
    ///
    /// # Arguments
    ///
    /// * `addr` - Register address; values above 7 read as 0.
    pub fn read_reg(&mut self, addr: u8) -> u8 {
        match addr {
            REG_DATA => self.read_data(),
            REG_ERROR_FEATURE => 0,
            REG_COUNT => self.count,
            REG_SECTOR => self.sector,
            REG_CYLINDER_LOW => (self.cylinder & 0xff) as u8,
            REG_CYLINDER_HIGH => (self.cylinder >> 8) as u8,
            REG_DRIVE_HEAD => self.drive_head(),
            REG_STATUS_COMMAND => self.status(),
            _ => 0,
        }
    }

    /// Writes a task-file register. Writing the command register executes it.
    ///
    /// # Arguments
    ///
    /// * `addr` - Register address; values above 7 are ignored.
    /// * `val` - Byte from the data bus.
    pub fn write_reg(&mut self, addr: u8, val: u8) {
        match addr {
            REG_ERROR_FEATURE => self.feature = val,
            REG_COUNT => self.count = val,
            REG_SECTOR => self.sector = val,
            REG_CYLINDER_LOW => self.cylinder = (self.cylinder & 0xff00) | val as u16,
            REG_CYLINDER_HIGH => self.cylinder = (self.cylinder & 0x00ff) | ((val as u16) << 8),
            REG_DRIVE_HEAD => {
                self.mode = val >> 5;
                self.device_select = (val >> 4) & 1 != 0;
                self.head = val & 0xf;
            }
            REG_STATUS_COMMAND => self.command(val),
            _ => {}
        }
    }

    /// Status register value: RDY always, DRQ while a byte is pending.
    pub const fn status(&self) -> u8 {
        let drq = if self.data_pending() { STATUS_DRQ } else { 0 };
        STATUS_RDY | drq
    }

    /// Returns `true` while the sector buffer still holds unread bytes.
    pub const fn data_pending(&self) -> bool {
        self.cursor < SECTOR_SIZE
    }

    /// Index of the next byte the data register returns (512 when empty).
    pub const fn buffer_cursor(&self) -> usize {
        self.cursor
    }

    /// Sectors of the current read command not yet fully transferred.
    pub const fn sectors_remaining(&self) -> u16 {
        self.sectors_remaining
    }

    /// Sector count register.
    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Sector number register.
    pub const fn sector(&self) -> u8 {
        self.sector
    }

    /// 16-bit cylinder assembled from the low and high registers.
    pub const fn cylinder(&self) -> u16 {
        self.cylinder
    }

    /// Head number (0-15).
    pub const fn head(&self) -> u8 {
        self.head
    }

    /// Device select bit of the drive/head register.
    pub const fn device_select(&self) -> bool {
        self.device_select
    }

    /// Three-bit addressing mode field (`MODE_CHS` or `MODE_LBA28`).
    pub const fn mode(&self) -> u8 {
        self.mode
    }

    /// Last value written to the feature register.
    pub const fn feature(&self) -> u8 {
        self.feature
    }

    fn drive_head(&self) -> u8 {
        ((self.mode & 0x3) << 5) | ((self.device_select as u8) << 4) | (self.head & 0xf)
    }

    fn read_data(&mut self) -> u8 {
        if !self.data_pending() {
            return 0;
        }
        trace!(offset = self.cursor, "cf data read");
        let data = self.buffer[self.cursor];
        self.cursor += 1;

        if self.cursor == SECTOR_SIZE {
            self.sectors_remaining = self.sectors_remaining.saturating_sub(1);
            if self.sectors_remaining > 0 {
                // The next sector's contents are undefined, so the buffer stays
                // empty and DRQ drops until a new command arrives.
                warn!(
                    remaining = self.sectors_remaining,
                    "cf multi-sector read: following sectors are not transferred"
                );
            }
        }
        data
    }

    fn command(&mut self, cmd: u8) {
        match cmd {
            CMD_READ_SECTORS => self.read_sectors(),
            CMD_SET_FEATURES => match self.feature {
                FEATURE_8BIT | FEATURE_WRITE_CACHE_ON | FEATURE_WRITE_CACHE_OFF => {
                    debug!(feature = self.feature, "cf set features");
                }
                other => warn!("cf unknown set features {other:#04x}"),
            },
            other => warn!("cf unknown command {other:#04x}"),
        }
    }

    fn read_sectors(&mut self) {
        let count = if self.count == 0 {
            SECTORS_WHEN_ZERO
        } else {
            self.count as u16
        };
        debug!(
            "cf read {:03b} ({}) from {:#x} {} {} for {}",
            self.mode, self.device_select as u8, self.cylinder, self.head, self.sector, count
        );

        for (i, byte) in self.buffer.iter_mut().enumerate() {
            *byte = i as u8;
        }
        self.cursor = 0;
        self.sectors_remaining = count;
    }
}

/// Ports of the CompactFlash connector the model drives or samples.
#[derive(Debug, Clone, Copy)]
struct CfPorts {
    clk: SignalId,
    addr: SignalId,
    data_wr: SignalId,
    data_rd: SignalId,
    data_rd_valid: SignalId,
    cs0_n: SignalId,
    iord_n: SignalId,
    iowr_n: SignalId,
}

/// Port-level CompactFlash model bound into a design.
#[derive(Debug)]
pub struct CompactFlashModel {
    name: String,
    ports: CfPorts,
    edge: ClockEdge,
    card: CompactFlash,
}

impl CompactFlashModel {
    /// Binds a fresh card to the ports of `instance`.
    ///
    /// Required ports: `clk`, `addr`, `data_wr`, `data_rd`, `data_rd_valid`,
    /// `cs0_n`, `iord_n`, `iowr_n`. Other connector pins may be bound and are
    /// left alone.
    pub fn new(instance: &Instance, signals: &Signals) -> Result<Self> {
        let ports = CfPorts {
            clk: instance.signal(signals, "clk")?,
            addr: instance.signal(signals, "addr")?,
            data_wr: instance.signal(signals, "data_wr")?,
            data_rd: instance.signal(signals, "data_rd")?,
            data_rd_valid: instance.signal(signals, "data_rd_valid")?,
            cs0_n: instance.signal(signals, "cs0_n")?,
            iord_n: instance.signal(signals, "iord_n")?,
            iowr_n: instance.signal(signals, "iowr_n")?,
        };
        Ok(Self {
            name: instance.name.clone(),
            ports,
            edge: ClockEdge::new(),
            card: CompactFlash::new(),
        })
    }

    /// Register state of the card.
    pub const fn card(&self) -> &CompactFlash {
        &self.card
    }
}

impl DeviceModel for CompactFlashModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        COMPACTFLASH
    }

    /// Samples the strobes on the rising edge.
    ///
    /// A read latches the register once per strobe assertion: the value is
    /// captured on the first edge and held, with `data_rd_valid` set, until the
    /// strobe is released.
    fn eval(&mut self, signals: &mut Signals) -> Result<()> {
        let p = self.ports;
        if !self.edge.posedge(signals.get_bool(p.clk)) {
            return Ok(());
        }

        let selected = !signals.get_bool(p.cs0_n);
        let addr = signals.get(p.addr) as u8;

        if selected && !signals.get_bool(p.iord_n) {
            if !signals.get_bool(p.data_rd_valid) {
                let value = self.card.read_reg(addr);
                signals.set(p.data_rd, value as u64);
            }
            signals.set_bool(p.data_rd_valid, true);
        } else {
            signals.set(p.data_rd, 0);
            signals.set_bool(p.data_rd_valid, false);
        }

        if selected && !signals.get_bool(p.iowr_n) {
            self.card.write_reg(addr, signals.get(p.data_wr) as u8);
        }
        Ok(())
    }

    fn posedges(&self) -> u64 {
        self.edge.count()
    }

    fn as_compactflash(&self) -> Option<&CompactFlash> {
        Some(&self.card)
    }
}
