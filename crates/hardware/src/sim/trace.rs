//! VCD waveform capture.
//!
//! The [`Tracer`] encodes samples of the signal table into an in-memory VCD
//! stream. Output leaves the tracer only through [`Tracer::read`], which hands
//! out bounded chunks; the caller drains until it gets an empty one. This keeps
//! encoding separate from file I/O.

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use vcd::{IdCode, TimescaleUnit, Value, VarType, Writer as VcdWriter};

use crate::common::{HarnessError, Result};
use crate::sim::signal::Signals;

/// Growable byte buffer shared between the VCD writer and the reader side.
#[derive(Debug, Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encodes signal samples as VCD.
pub struct Tracer {
    vcd: VcdWriter<SharedBuffer>,
    pending: SharedBuffer,
    codes: Vec<IdCode>,
    last: Vec<Option<u64>>,
    chunk_size: usize,
}

impl Tracer {
    /// Writes the VCD header for every signal in `signals`.
    ///
    /// # Arguments
    ///
    /// * `signals` - The table whose signals are declared, in order, under module `top`.
    /// * `timescale_ns` - Length of one time unit in nanoseconds.
    /// * `chunk_size` - Largest chunk [`read`](Self::read) returns; must be non-zero.
    pub fn new(signals: &Signals, timescale_ns: u32, chunk_size: usize) -> io::Result<Self> {
        let pending = SharedBuffer::default();
        let mut vcd = VcdWriter::new(pending.clone());
        vcd.timescale(timescale_ns, TimescaleUnit::NS)?;
        vcd.add_module("top")?;
        let mut codes = Vec::with_capacity(signals.len());
        for (_, name, wire) in signals.iter() {
            codes.push(vcd.add_var(VarType::Wire, wire.width(), name, None)?);
        }
        vcd.upscope()?;
        vcd.enddefinitions()?;

        Ok(Self {
            vcd,
            pending,
            codes,
            last: vec![None; signals.len()],
            chunk_size: chunk_size.max(1),
        })
    }

    /// Records the settled values of `signals` at `time`.
    ///
    /// Only signals whose value differs from the previous sample are written;
    /// the first sample writes all of them.
    pub fn sample(&mut self, time: u64, signals: &Signals) -> io::Result<()> {
        self.vcd.timestamp(time)?;
        for (id, _, wire) in signals.iter() {
            let i = id.index();
            let value = wire.current();
            if self.last[i] == Some(value) {
                continue;
            }
            self.last[i] = Some(value);
            let code = self.codes[i];
            match wire.width() {
                1 => self.vcd.change_scalar(code, bit(value, 0))?,
                width => self
                    .vcd
                    .change_vector(code, (0..width).rev().map(|b| bit(value, b)))?,
            }
        }
        Ok(())
    }

    /// Removes and returns up to `chunk_size` bytes of encoded output.
    ///
    /// An empty vector means everything sampled so far has been handed out.
    pub fn read(&mut self) -> Vec<u8> {
        let mut buf = self.pending.0.borrow_mut();
        let n = buf.len().min(self.chunk_size);
        buf.drain(..n).collect()
    }

    /// Bytes encoded but not yet read.
    pub fn pending(&self) -> usize {
        self.pending.0.borrow().len()
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("signals", &self.codes.len())
            .field("pending", &self.pending())
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

fn bit(value: u64, index: u32) -> Value {
    if (value >> index) & 1 == 1 {
        Value::V1
    } else {
        Value::V0
    }
}

/// Opens (creating or truncating) the trace output file.
///
/// # Returns
///
/// A buffered writer, or `TraceOpen` naming the path.
pub fn create_trace_file(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| HarnessError::TraceOpen {
            path: path.to_path_buf(),
            source,
        })
}
