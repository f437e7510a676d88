//! # Kernel Tests
//!
//! Settling, step counting, device lookup, and teardown order.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tbsim_core::HarnessError;
use tbsim_core::common::Result;
use tbsim_core::config::Config;
use tbsim_core::sim::signal::{SignalId, Signals};
use tbsim_core::soc::builder::SystemBuilder;
use tbsim_core::soc::instance::Instance;
use tbsim_core::soc::registry::DeviceRegistry;
use tbsim_core::soc::traits::{ClockEdge, DeviceModel, Logic};

use crate::common::harness::init_tracing;

/// `out = !inp`, combinational.
struct Inverter {
    inp: SignalId,
    out: SignalId,
}

impl Logic for Inverter {
    fn eval(&mut self, s: &mut Signals) {
        s.set_bool(self.out, !s.get_bool(self.inp));
    }
}

/// Counts rising edges on `clk` into `count`, and records its drop.
#[derive(Debug)]
struct Counter {
    name: String,
    clk: SignalId,
    count: SignalId,
    edge: ClockEdge,
    dropped: Arc<Mutex<Vec<String>>>,
}

impl DeviceModel for Counter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "counter"
    }

    fn eval(&mut self, s: &mut Signals) -> Result<()> {
        if self.edge.posedge(s.get_bool(self.clk)) {
            let next = s.get(self.count) + 1;
            s.set(self.count, next);
        }
        Ok(())
    }

    fn posedges(&self) -> u64 {
        self.edge.count()
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        self.dropped.lock().unwrap().push(self.name.clone());
    }
}

fn counter_registry(dropped: &Arc<Mutex<Vec<String>>>) -> DeviceRegistry {
    let dropped = Arc::clone(dropped);
    let mut registry = DeviceRegistry::new();
    registry.register("counter", move |inst, signals| {
        Ok(Box::new(Counter {
            name: inst.name.clone(),
            clk: inst.signal(signals, "clk")?,
            count: inst.signal(signals, "count")?,
            edge: ClockEdge::new(),
            dropped: Arc::clone(&dropped),
        }))
    });
    registry
}

#[test]
fn combinational_chain_settles_within_one_step() {
    init_tracing();
    let registry = DeviceRegistry::new();
    let config = Config::default();
    let mut b = SystemBuilder::new(&registry, &config);
    let a = b.signal("a", 1).unwrap();
    let x = b.signal("x", 1).unwrap();
    let y = b.signal("y", 1).unwrap();
    // Registered in reverse dependency order on purpose.
    b.logic(Inverter { inp: x, out: y });
    b.logic(Inverter { inp: a, out: x });
    let mut sim = b.build();

    sim.signals_mut().set_bool(a, true);
    sim.step().unwrap();
    assert!(!sim.signals().get_bool(x));
    assert!(sim.signals().get_bool(y));
    assert_eq!(sim.steps(), 1);
}

#[test]
fn oscillator_reports_unsettled() {
    init_tracing();
    let registry = DeviceRegistry::new();
    let mut config = Config::default();
    config.harness.max_delta_cycles = 16;
    let mut b = SystemBuilder::new(&registry, &config);
    let osc = b.signal("osc", 1).unwrap();
    b.logic(Inverter { inp: osc, out: osc });
    let mut sim = b.build();

    match sim.step() {
        Err(HarnessError::Unsettled(n)) => assert_eq!(n, 16),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn devices_act_once_per_rising_edge() {
    let dropped = Arc::new(Mutex::new(Vec::new()));
    let registry = counter_registry(&dropped);
    let config = Config::default();
    let mut b = SystemBuilder::new(&registry, &config);
    let clk = b.signal("clk", 1).unwrap();
    let count = b.signal("count", 16).unwrap();
    b.instance(
        Instance::new("c0", "counter")
            .port("clk", "clk")
            .port("count", "count"),
    )
    .unwrap();
    let mut sim = b.build();

    for _ in 0..5 {
        sim.signals_mut().set_bool(clk, false);
        sim.step().unwrap();
        sim.signals_mut().set_bool(clk, true);
        sim.step().unwrap();
        // Extra steps with a steady clock must not count.
        sim.step().unwrap();
    }
    assert_eq!(sim.signals().get(count), 5);
    assert_eq!(sim.device("c0").unwrap().posedges(), 5);
    assert_eq!(sim.steps(), 15);
}

#[test]
fn device_lookup_by_name() {
    let dropped = Arc::new(Mutex::new(Vec::new()));
    let registry = counter_registry(&dropped);
    let config = Config::default();
    let mut b = SystemBuilder::new(&registry, &config);
    let _ = b.signal("clk", 1).unwrap();
    let _ = b.signal("count", 8).unwrap();
    for name in ["first", "second"] {
        b.instance(Instance::new(name, "counter").port("clk", "clk").port("count", "count"))
            .unwrap();
    }
    let sim = b.build();

    let names: Vec<&str> = sim.devices().map(|d| d.name()).collect();
    assert_eq!(names, ["first", "second"]);
    assert_eq!(sim.device("second").unwrap().kind(), "counter");
    assert!(sim.device("third").is_none());
    assert!(sim.device("first").unwrap().as_compactflash().is_none());
}

#[test]
fn devices_are_dropped_newest_first() {
    let dropped = Arc::new(Mutex::new(Vec::new()));
    let registry = counter_registry(&dropped);
    let config = Config::default();
    let mut b = SystemBuilder::new(&registry, &config);
    let _ = b.signal("clk", 1).unwrap();
    let _ = b.signal("count", 8).unwrap();
    for name in ["a", "b", "c"] {
        b.instance(Instance::new(name, "counter").port("clk", "clk").port("count", "count"))
            .unwrap();
    }
    drop(b.build());

    assert_eq!(*dropped.lock().unwrap(), ["c", "b", "a"]);
}

#[test]
fn unknown_blackbox_fails_at_build() {
    let registry = DeviceRegistry::new();
    let config = Config::default();
    let mut b = SystemBuilder::new(&registry, &config);
    let err = b.instance(Instance::new("m", "mystery")).unwrap_err();
    assert!(matches!(err, HarnessError::UnknownDevice(kind) if kind == "mystery"));
}
