//! Double-buffered signal table.
//!
//! Every signal is a [`Wire`] holding two slots: the *current* value, which is
//! what every reader sees during a step, and the *next* value, which writers
//! fill in and which becomes current only when the kernel commits. Readers and
//! writers never share a slot, so evaluation order inside a pass cannot leak a
//! half-updated value.

use std::collections::HashMap;

use crate::common::{HarnessError, Result};

/// Opaque handle to a signal, resolved once from its name at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(usize);

impl SignalId {
    /// Position of the signal in declaration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A bit-vector cell with current and next slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wire {
    width: u32,
    current: u64,
    next: u64,
}

impl Wire {
    /// Creates a wire whose both slots hold `init` (truncated to `width`).
    fn new(width: u32, init: u64) -> Self {
        let init = init & mask(width);
        Self {
            width,
            current: init,
            next: init,
        }
    }

    /// Width in bits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Settled value.
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Value that will become current at the next commit.
    pub const fn next(&self) -> u64 {
        self.next
    }

    fn set_next(&mut self, value: u64) {
        self.next = value & mask(self.width);
    }

    /// Moves next into current; returns `true` if the current value changed.
    fn commit(&mut self) -> bool {
        let changed = self.current != self.next;
        self.current = self.next;
        changed
    }
}

/// All-ones mask for a width in 1..=64.
const fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Table of named signals owned by the simulation kernel.
#[derive(Debug, Default, Clone)]
pub struct Signals {
    wires: Vec<Wire>,
    names: Vec<String>,
    by_name: HashMap<String, SignalId>,
}

impl Signals {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new signal.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique identifier used for lookup and tracing.
    /// * `width` - Width in bits, 1..=64.
    /// * `init` - Initial value of both slots.
    ///
    /// # Returns
    ///
    /// The handle of the new signal, or `DuplicateSignal`/`InvalidWidth`.
    pub fn declare(&mut self, name: &str, width: u32, init: u64) -> Result<SignalId> {
        if !(1..=64).contains(&width) {
            return Err(HarnessError::InvalidWidth {
                name: name.to_string(),
                width,
            });
        }
        if self.by_name.contains_key(name) {
            return Err(HarnessError::DuplicateSignal(name.to_string()));
        }
        let id = SignalId(self.wires.len());
        self.wires.push(Wire::new(width, init));
        self.names.push(name.to_string());
        let _ = self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Resolves a signal by name.
    pub fn lookup(&self, name: &str) -> Option<SignalId> {
        self.by_name.get(name).copied()
    }

    /// Resolves a signal by name, failing with `SignalNotFound`.
    pub fn require(&self, name: &str) -> Result<SignalId> {
        self.lookup(name)
            .ok_or_else(|| HarnessError::SignalNotFound(name.to_string()))
    }

    /// Settled value of a signal.
    pub fn get(&self, id: SignalId) -> u64 {
        self.wires[id.0].current
    }

    /// Settled value of a signal as a single bit (bit 0).
    pub fn get_bool(&self, id: SignalId) -> bool {
        self.get(id) & 1 != 0
    }

    /// Pending next value of a signal.
    ///
    /// Only a model reading back its own output may rely on this.
    pub fn next(&self, id: SignalId) -> u64 {
        self.wires[id.0].next
    }

    /// Pending next value of a signal as a single bit.
    pub fn next_bool(&self, id: SignalId) -> bool {
        self.next(id) & 1 != 0
    }

    /// Schedules `value` (truncated to the signal width) for the next commit.
    pub fn set(&mut self, id: SignalId, value: u64) {
        self.wires[id.0].set_next(value);
    }

    /// Schedules a single-bit value for the next commit.
    pub fn set_bool(&mut self, id: SignalId, value: bool) {
        self.set(id, u64::from(value));
    }

    /// Width of a signal in bits.
    pub fn width(&self, id: SignalId) -> u32 {
        self.wires[id.0].width
    }

    /// Name a signal was declared with.
    pub fn name(&self, id: SignalId) -> &str {
        &self.names[id.0]
    }

    /// Number of declared signals.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` if no signal has been declared.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Iterates over all signals in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalId, &str, &Wire)> + '_ {
        self.wires
            .iter()
            .zip(&self.names)
            .enumerate()
            .map(|(i, (wire, name))| (SignalId(i), name.as_str(), wire))
    }

    /// Commits every next value; returns `true` if any current value changed.
    pub fn commit(&mut self) -> bool {
        self.wires
            .iter_mut()
            .fold(false, |changed, wire| wire.commit() | changed)
    }
}
