//! # Echo Design Tests

use pretty_assertions::assert_eq;
use tbsim_core::config::Config;
use tbsim_core::design::Echo;
use tbsim_core::sim::{Driver, Simulation};

use crate::common::harness::{SharedSink, init_tracing, scripted_registry};

fn run_echo(input: &[u8], cycles: u64) -> (Simulation, String) {
    init_tracing();
    let sink = SharedSink::new();
    let registry = scripted_registry(input, &sink);
    let config = Config::default();
    let mut sim = Simulation::elaborate(&Echo, &registry, &config).unwrap();
    let driver = Driver::attach(&sim, &config.harness).unwrap();
    let _ = driver.run(&mut sim, Some(cycles), None, &config.trace).unwrap();
    (sim, sink.text())
}

#[test]
fn input_is_echoed_in_order() {
    let (_, out) = run_echo(b"The quick brown fox\r\n", 100);
    assert_eq!(out, "The quick brown fox\r\n");
}

#[test]
fn no_input_no_output() {
    let (_, out) = run_echo(b"", 50);
    assert_eq!(out, "");
}

#[test]
fn models_see_every_edge() {
    let (sim, _) = run_echo(b"", 3);
    for name in ["rx_0", "tx_0"] {
        assert_eq!(sim.device(name).unwrap().posedges(), 23, "{name}");
    }
}

#[test]
fn run_phase_clocks_each_model_once_per_cycle() {
    let (reset_only, _) = run_echo(b"", 0);
    let (clocked, _) = run_echo(b"", 3);
    for name in ["rx_0", "tx_0"] {
        let before = reset_only.device(name).unwrap().posedges();
        let after = clocked.device(name).unwrap().posedges();
        assert_eq!(before, 20, "{name}");
        assert_eq!(after - before, 3, "{name}");
    }
}

#[test]
fn nothing_is_received_during_reset() {
    // Two run cycles only leave room for the first byte to cross over.
    let (_, out) = run_echo(b"abc", 2);
    assert_eq!(out, "a");
}
