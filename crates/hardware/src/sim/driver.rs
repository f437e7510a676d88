//! Clock and reset driver.
//!
//! The driver is the only thing that moves time forward. A run has two phases:
//! 1. **Reset:** Reset held high for a fixed number of full clock periods.
//! 2. **Run:** Reset released, then a bounded or unbounded number of clock
//!    periods, each optionally sampled into a waveform trace.
//!
//! Every half period is one kernel step.

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::common::{HarnessError, Result};
use crate::config::{HarnessConfig, TraceConfig};
use crate::sim::signal::SignalId;
use crate::sim::simulator::Simulation;
use crate::sim::trace::Tracer;

/// What a run should do, as requested by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Clock cycles after reset; `None` runs until the process is stopped.
    pub cycles: Option<u64>,
    /// Waveform output file.
    pub trace: Option<PathBuf>,
}

impl RunOptions {
    /// Rejects a trace request without a bounded, non-zero cycle count.
    pub fn validate(&self) -> Result<()> {
        validate_run(self.cycles, self.trace.is_some())
    }
}

fn validate_run(cycles: Option<u64>, tracing: bool) -> Result<()> {
    match (tracing, cycles) {
        (true, None | Some(0)) => Err(HarnessError::Configuration(
            "a trace requires a non-zero cycle count".into(),
        )),
        _ => Ok(()),
    }
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Clock cycles spent in reset.
    pub reset_cycles: u32,
    /// Clock cycles after reset release.
    pub cycles: u64,
    /// Kernel steps taken over the whole run.
    pub steps: u64,
    /// Bytes written to the trace sink.
    pub trace_bytes: u64,
}

/// Drives the clock and reset inputs of a simulation.
#[derive(Debug, Clone, Copy)]
pub struct Driver {
    clock: SignalId,
    reset: SignalId,
    reset_cycles: u32,
}

impl Driver {
    /// Resolves the clock and reset inputs named in `config`.
    ///
    /// # Returns
    ///
    /// `SignalNotFound` if the design lacks either signal.
    pub fn attach(sim: &Simulation, config: &HarnessConfig) -> Result<Self> {
        Ok(Self {
            clock: sim.lookup(&config.clock_signal)?,
            reset: sim.lookup(&config.reset_signal)?,
            reset_cycles: config.reset_cycles,
        })
    }

    /// Resets the design, then clocks it.
    ///
    /// # Arguments
    ///
    /// * `sim` - The simulation to drive.
    /// * `cycles` - Clock cycles after reset; `None` never returns unless a
    ///   step fails.
    /// * `trace` - Sink for the VCD trace of the run phase.
    /// * `trace_config` - Timescale and chunk size of the trace.
    ///
    /// # Returns
    ///
    /// Totals for the run, or the first error. A trace without a bounded,
    /// non-zero `cycles` fails with `Configuration` before any step.
    pub fn run(
        &self,
        sim: &mut Simulation,
        cycles: Option<u64>,
        mut trace: Option<&mut dyn Write>,
        trace_config: &TraceConfig,
    ) -> Result<RunSummary> {
        validate_run(cycles, trace.is_some())?;

        let start_steps = sim.steps();
        sim.signals_mut().set_bool(self.reset, true);
        for _ in 0..self.reset_cycles {
            self.half_cycle(sim, false)?;
            self.half_cycle(sim, true)?;
        }
        sim.signals_mut().set_bool(self.reset, false);
        debug!(cycles = self.reset_cycles, "reset released");

        let mut tracer = match trace {
            Some(_) => Some(
                Tracer::new(sim.signals(), trace_config.timescale_ns, trace_config.chunk_size)
                    .map_err(HarnessError::TraceIo)?,
            ),
            None => None,
        };

        let mut summary = RunSummary {
            reset_cycles: self.reset_cycles,
            ..RunSummary::default()
        };
        let limit = cycles.unwrap_or(u64::MAX);
        while summary.cycles < limit {
            let i = summary.cycles;
            for (level, time) in [(false, 2 * i), (true, 2 * i + 1)] {
                self.half_cycle(sim, level)?;
                if let (Some(tracer), Some(sink)) = (tracer.as_mut(), trace.as_deref_mut()) {
                    tracer.sample(time, sim.signals()).map_err(HarnessError::TraceIo)?;
                    summary.trace_bytes += drain(tracer, sink)?;
                }
            }
            summary.cycles += 1;
        }

        if let Some(sink) = trace {
            sink.flush().map_err(HarnessError::TraceIo)?;
        }
        summary.steps = sim.steps() - start_steps;
        info!(
            cycles = summary.cycles,
            steps = summary.steps,
            trace_bytes = summary.trace_bytes,
            "run finished"
        );
        Ok(summary)
    }

    fn half_cycle(&self, sim: &mut Simulation, level: bool) -> Result<()> {
        sim.signals_mut().set_bool(self.clock, level);
        sim.step()
    }
}

/// Moves every pending trace chunk into `sink`; returns the bytes moved.
fn drain(tracer: &mut Tracer, sink: &mut dyn Write) -> Result<u64> {
    let mut total = 0;
    loop {
        let chunk = tracer.read();
        if chunk.is_empty() {
            return Ok(total);
        }
        sink.write_all(&chunk).map_err(HarnessError::TraceIo)?;
        total += chunk.len() as u64;
    }
}
