//! Testbench harness CLI.
//!
//! This binary elaborates one built-in design and drives it. It performs:
//! 1. **Argument handling:** Usage errors print the generated help and exit 1.
//! 2. **Setup:** Configuration, design elaboration with host-attached models,
//!    and the optional trace file.
//! 3. **Run:** Reset followed by the requested number of cycles (or forever).
//!
//! Transmitted bytes go to stdout; diagnostics go to stderr.

mod args;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tbsim_core::sim::trace::create_trace_file;
use tbsim_core::soc::DeviceRegistry;
use tbsim_core::{Config, Driver, HarnessError, Simulation, design};

use crate::args::Cli;

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", Cli::help_text());
            return ExitCode::FAILURE;
        }
    };
    if cli.help {
        println!("{}", Cli::help_text());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Builds the simulation and runs it to completion.
///
/// The simulation is dropped before returning on every path, which restores
/// the host terminal.
fn run(cli: &Cli) -> Result<(), HarnessError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let options = cli.run_options();
    options.validate()?;

    let design = design::by_name(&cli.design)?;
    let registry = DeviceRegistry::with_host_io();
    let mut sim = Simulation::elaborate(design.as_ref(), &registry, &config)?;
    let driver = Driver::attach(&sim, &config.harness)?;

    let mut trace_file = options.trace.as_deref().map(create_trace_file).transpose()?;
    let summary = driver.run(
        &mut sim,
        options.cycles,
        trace_file.as_mut().map(|f| f as &mut dyn Write),
        &config.trace,
    )?;

    tracing::info!(
        design = design.name(),
        cycles = summary.cycles,
        steps = summary.steps,
        "simulation complete"
    );
    Ok(())
}
