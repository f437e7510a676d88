//! # Serial Transmit Tests

use std::io;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tbsim_core::HarnessError;
use tbsim_core::common::constants::{CLOCK_SIGNAL, SERIAL_TX};
use tbsim_core::soc::devices::SerialTx;
use tbsim_core::soc::instance::Instance;
use tbsim_core::soc::registry::DeviceRegistry;

use crate::common::harness::{Bench, SharedSink, scripted_registry};
use crate::common::mocks::MockSink;

fn tx_instance() -> Instance {
    Instance::new("tx", SERIAL_TX)
        .port("clk", CLOCK_SIGNAL)
        .port("data", "data")
        .port("valid", "valid")
        .port("ready", "ready")
}

fn tx_bench(registry: &DeviceRegistry) -> Bench {
    Bench::new(registry, |b| {
        let _ = b.signal("data", 8)?;
        let _ = b.signal("valid", 1)?;
        let _ = b.signal("ready", 1)?;
        b.instance(tx_instance())
    })
}

fn sink_registry<F>(make: F) -> DeviceRegistry
where
    F: Fn() -> MockSink + Send + Sync + 'static,
{
    let mut registry = DeviceRegistry::new();
    registry.register(SERIAL_TX, move |inst, signals| {
        Ok(Box::new(SerialTx::new(inst, signals, Box::new(make()))?))
    });
    registry
}

#[test]
fn ready_from_first_edge() {
    let sink = SharedSink::new();
    let mut bench = tx_bench(&scripted_registry(&[], &sink));
    assert_eq!(bench.get("ready"), 0);
    bench.cycle();
    assert_eq!(bench.get("ready"), 1);
    bench.cycles(3);
    assert_eq!(bench.get("ready"), 1);
    assert!(sink.bytes().is_empty());
}

#[test]
fn one_byte_per_valid_edge() {
    let sink = SharedSink::new();
    let mut bench = tx_bench(&scripted_registry(&[], &sink));
    bench.set("data", u64::from(b'x'));
    bench.set("valid", 1);
    bench.cycle();
    assert_eq!(sink.bytes(), b"x");

    bench.set("data", u64::from(b'y'));
    bench.cycle();
    bench.set("valid", 0);
    bench.cycles(3);
    assert_eq!(sink.text(), "xy");
}

#[test]
fn sink_that_would_block_is_retried() {
    let registry = sink_registry(|| {
        let mut sink = MockSink::new();
        let mut blocked = true;
        sink.expect_write().times(2).returning(move |buf| {
            if std::mem::take(&mut blocked) {
                Err(io::ErrorKind::WouldBlock.into())
            } else {
                assert_eq!(buf, b"z");
                Ok(buf.len())
            }
        });
        sink.expect_flush().times(1).returning(|| Ok(()));
        sink
    });
    let mut bench = tx_bench(&registry);
    bench.set("data", u64::from(b'z'));
    bench.set("valid", 1);
    bench.cycle();
}

#[test]
fn broken_sink_aborts_the_step() {
    let registry = sink_registry(|| {
        let mut sink = MockSink::new();
        sink.expect_write()
            .returning(|_| Err(io::ErrorKind::BrokenPipe.into()));
        sink
    });
    let mut bench = tx_bench(&registry);
    let clk = bench.sim.lookup(CLOCK_SIGNAL).unwrap();
    bench.set("valid", 1);
    bench.sim.step().unwrap();
    bench.sim.signals_mut().set_bool(clk, true);
    let err = bench.sim.step().unwrap_err();
    assert!(matches!(err, HarnessError::HostOutput(_)), "{err}");
}

#[rstest]
#[case(7)]
#[case(9)]
fn only_eight_bit_characters(#[case] bits: u64) {
    let registry = scripted_registry(&[], &SharedSink::new());
    let config = tbsim_core::Config::default();
    let mut b = tbsim_core::soc::SystemBuilder::new(&registry, &config);
    for (name, width) in [(CLOCK_SIGNAL, 1), ("data", 8), ("valid", 1), ("ready", 1)] {
        let _ = b.signal(name, width).unwrap();
    }
    let err = b.instance(tx_instance().param("BITS", bits)).unwrap_err();
    assert!(matches!(err, HarnessError::UnsupportedParameter { .. }), "{err}");
    assert!(err.to_string().contains(&format!("BITS={bits}")));
}
