//! Command-line options.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use tbsim_core::design;
use tbsim_core::sim::RunOptions;

/// Parsed command line.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "tbsim",
    about = "Cycle-driven testbench for circuits with CompactFlash and serial peripherals",
    long_about = "Elaborates a built-in design, holds it in reset for 20 cycles, then clocks it.\n\nBytes received on stdin feed the serial receiver; bytes the design transmits go to stdout.\n\nExamples:\n  tbsim --cycles 1000\n  tbsim --design cfdump --cycles 20000\n  tbsim --cycles 100 --vcd out.vcd",
    disable_help_flag = true
)]
pub struct Cli {
    /// Print this help and exit.
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Clock cycles to run after reset (runs until interrupted if omitted).
    #[arg(short = 'c', long = "cycles", value_name = "N")]
    pub cycles: Option<u64>,

    /// Write a VCD trace of the run to PATH (requires a non-zero --cycles).
    #[arg(short = 'v', long = "vcd", value_name = "PATH")]
    pub vcd: Option<PathBuf>,

    /// Built-in design to simulate.
    #[arg(
        short = 'd',
        long = "design",
        value_name = "NAME",
        default_value = design::echo::NAME
    )]
    pub design: String,

    /// JSON configuration file overriding harness defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Options handed to the driver.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            cycles: self.cycles,
            trace: self.vcd.clone(),
        }
    }

    /// Full help text generated from the option definitions.
    pub fn help_text() -> String {
        Self::command().render_long_help().to_string()
    }
}
