//! The network registry: an arena of live chips plus the wire table that
//! connects their pins.
//!
//! Chips are addressed by stable [`ChipId`] keys, pins by [`PinId`] handles
//! built from a chip id, a side, and an index. Wires are rows in a single
//! insertion-ordered edge table rather than per-pin pointer sets, so a
//! destroyed chip can never leave a dangling reference behind: severing
//! every wire that touches it is one indexed sweep.

use std::fmt;

use log::{debug, warn};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::chip::{Chip, ChipKind, PinDir, PinState};

new_key_type! {
    /// Stable handle to a chip in the network arena.
    pub struct ChipId;
}

/// Handle to one pin of one chip. Copyable, non-owning; validity is checked
/// on every use, so a handle to a destroyed chip is an error, not a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId {
    pub chip: ChipId,
    pub dir: PinDir,
    pub index: usize,
}

impl PinId {
    pub(crate) fn input(chip: ChipId, index: usize) -> Self {
        PinId { chip, dir: PinDir::Input, index }
    }

    pub(crate) fn output(chip: ChipId, index: usize) -> Self {
        PinId { chip, dir: PinDir::Output, index }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.dir {
            PinDir::Input => "in",
            PinDir::Output => "out",
        };
        write!(f, "{:?}/{}{}", self.chip, side, self.index)
    }
}

/// Failures an engine operation can report to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetError {
    /// Wires must start at an output pin.
    #[error("wire source {0} is an input pin")]
    SourceIsInput(PinId),
    #[error("no wire from {src} to {dst}")]
    WireNotFound { src: PinId, dst: PinId },
    #[error("pin {0} does not exist")]
    PinNotFound(PinId),
    #[error("chip {0:?} does not exist")]
    ChipNotFound(ChipId),
    /// A cascade assigned the same pin twice: the wiring feeds back on
    /// itself and would never settle.
    #[error("cascade revisited {0}: the network wires a feedback loop")]
    Oscillation(PinId),
}

/// One directed edge, output pin to input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Wire {
    pub src: PinId,
    pub dst: PinId,
}

/// The set of live chips and the wires between their pins.
#[derive(Debug, Default)]
pub struct Network {
    pub(crate) chips: SlotMap<ChipId, Chip>,
    /// Chip ids in creation order, so dumps and iteration are deterministic
    /// even after arena slots get reused.
    order: Vec<ChipId>,
    /// Wires in creation order. Filtering by source pin yields that pin's
    /// downstream set, in the order the connections were made.
    pub(crate) wires: Vec<Wire>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new chip of `kind` with all pins at their initial levels.
    pub fn create_chip(&mut self, kind: ChipKind) -> ChipId {
        let id = self.chips.insert(Chip::new(kind));
        self.order.push(id);
        debug!("created {} chip {:?}", kind.name(), id);
        id
    }

    /// Removes a chip, severing any wires still touching it first. A wire
    /// sourced at the dying chip forces its target `Low` on the way out,
    /// exactly as [`disconnect`](Self::disconnect) would.
    pub fn destroy_chip(&mut self, id: ChipId) -> Result<(), NetError> {
        if !self.chips.contains_key(id) {
            return Err(NetError::ChipNotFound(id));
        }
        let sourced: Vec<Wire> = self
            .wires
            .iter()
            .copied()
            .filter(|w| w.src.chip == id)
            .collect();
        for wire in sourced {
            self.disconnect(wire.src, wire.dst)?;
        }
        // Wires ending at the chip die with its input pins.
        self.wires.retain(|w| w.dst.chip != id);
        self.chips.remove(id);
        self.order.retain(|&c| c != id);
        debug!("destroyed chip {:?}", id);
        Ok(())
    }

    /// Handle to input pin `index`, or `None` past the kind's fixed count.
    pub fn input_pin(&self, chip: ChipId, index: usize) -> Option<PinId> {
        let c = self.chips.get(chip)?;
        (index < c.inputs.len()).then(|| PinId::input(chip, index))
    }

    /// Handle to output pin `index`, or `None` past the kind's fixed count.
    pub fn output_pin(&self, chip: ChipId, index: usize) -> Option<PinId> {
        let c = self.chips.get(chip)?;
        (index < c.outputs.len()).then(|| PinId::output(chip, index))
    }

    pub fn pin_state(&self, pin: PinId) -> Option<PinState> {
        let chip = self.chips.get(pin.chip)?;
        let states = match pin.dir {
            PinDir::Input => &chip.inputs,
            PinDir::Output => &chip.outputs,
        };
        states.get(pin.index).copied()
    }

    /// Whether the pin currently carries `High`. A stale or out-of-range
    /// handle reads as `Low`.
    pub fn is_high(&self, pin: PinId) -> bool {
        self.pin_state(pin).is_some_and(PinState::is_high)
    }

    /// Flips output pin `index` of `chip` and drives the new level through
    /// the graph. Meant for `InputSwitch` outputs, the only pins nothing
    /// else ever drives.
    pub fn toggle(&mut self, chip: ChipId, index: usize) -> Result<(), NetError> {
        let pin = self
            .output_pin(chip, index)
            .ok_or(NetError::PinNotFound(PinId::output(chip, index)))?;
        let next = self.pin_state(pin).ok_or(NetError::PinNotFound(pin))?.toggled();
        self.drive(pin, next)
    }

    /// Adds a wire from `src` to `dst` and immediately pushes `src`'s
    /// current level into `dst`, so a fresh connection starts synchronized
    /// instead of waiting for the next upstream change. Fan-out is free:
    /// the same source may feed any number of targets. Re-connecting an
    /// existing pair adds nothing but still re-syncs the target.
    pub fn connect(&mut self, src: PinId, dst: PinId) -> Result<(), NetError> {
        if src.dir == PinDir::Input {
            warn!("rejected wire from {src}: source is an input pin");
            return Err(NetError::SourceIsInput(src));
        }
        let level = self.pin_state(src).ok_or(NetError::PinNotFound(src))?;
        self.pin_state(dst).ok_or(NetError::PinNotFound(dst))?;
        let wire = Wire { src, dst };
        if !self.wires.contains(&wire) {
            self.wires.push(wire);
            debug!("wired {src} -> {dst}");
        }
        self.drive(dst, level)
    }

    /// Removes the wire from `src` to `dst` and forces `dst` to `Low`,
    /// regardless of what any other driver would settle it to. One driver
    /// per input pin is the intended wiring discipline, so there normally
    /// is no other driver.
    pub fn disconnect(&mut self, src: PinId, dst: PinId) -> Result<(), NetError> {
        let pos = self
            .wires
            .iter()
            .position(|w| w.src == src && w.dst == dst)
            .ok_or(NetError::WireNotFound { src, dst })?;
        self.wires.remove(pos);
        debug!("unwired {src} -> {dst}");
        self.drive(dst, PinState::Low)
    }

    /// Live chips with their ids, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ChipId, &Chip)> {
        self.order
            .iter()
            .filter_map(|&id| self.chips.get(id).map(|c| (id, c)))
    }

    pub fn chip_count(&self) -> usize {
        self.chips.len()
    }

    pub(crate) fn downstream(&self, src: PinId) -> impl Iterator<Item = PinId> {
        self.wires.iter().filter(move |w| w.src == src).map(|w| w.dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch_nand_probe() -> (Network, ChipId, ChipId, ChipId) {
        let mut net = Network::new();
        let sw = net.create_chip(ChipKind::InputSwitch);
        let nand = net.create_chip(ChipKind::Nand);
        let probe = net.create_chip(ChipKind::OutputProbe);
        (net, sw, nand, probe)
    }

    #[test]
    fn connect_rejects_input_pin_source() {
        let (mut net, _, nand, probe) = switch_nand_probe();
        let src = net.input_pin(nand, 0).unwrap();
        let dst = net.input_pin(probe, 0).unwrap();
        assert_eq!(net.connect(src, dst), Err(NetError::SourceIsInput(src)));
        assert!(net.wires.is_empty());
    }

    #[test]
    fn connect_syncs_target_immediately() {
        let (mut net, sw, _, probe) = switch_nand_probe();
        net.toggle(sw, 0).unwrap();
        let src = net.output_pin(sw, 0).unwrap();
        let dst = net.input_pin(probe, 0).unwrap();
        assert!(!net.is_high(dst));
        net.connect(src, dst).unwrap();
        assert!(net.is_high(dst));
    }

    #[test]
    fn disconnect_forces_target_low() {
        let (mut net, sw, _, probe) = switch_nand_probe();
        let src = net.output_pin(sw, 0).unwrap();
        let dst = net.input_pin(probe, 0).unwrap();
        net.toggle(sw, 0).unwrap();
        net.connect(src, dst).unwrap();
        net.disconnect(src, dst).unwrap();
        assert!(!net.is_high(dst));
        // The source keeps its level; only the orphaned target drops.
        assert!(net.is_high(src));
    }

    #[test]
    fn disconnect_without_wire_is_an_error() {
        let (mut net, sw, _, probe) = switch_nand_probe();
        let src = net.output_pin(sw, 0).unwrap();
        let dst = net.input_pin(probe, 0).unwrap();
        assert_eq!(
            net.disconnect(src, dst),
            Err(NetError::WireNotFound { src, dst })
        );
    }

    #[test]
    fn toggle_twice_restores_state() {
        let (mut net, sw, _, _) = switch_nand_probe();
        let pin = net.output_pin(sw, 0).unwrap();
        assert!(!net.is_high(pin));
        net.toggle(sw, 0).unwrap();
        assert!(net.is_high(pin));
        net.toggle(sw, 0).unwrap();
        assert!(!net.is_high(pin));
    }

    #[test]
    fn toggle_out_of_range_pin_is_an_error() {
        let (mut net, sw, _, probe) = switch_nand_probe();
        assert!(matches!(net.toggle(sw, 1), Err(NetError::PinNotFound(_))));
        // A probe has no output pins at all.
        assert!(matches!(net.toggle(probe, 0), Err(NetError::PinNotFound(_))));
    }

    #[test]
    fn pin_accessors_return_none_out_of_range() {
        let (net, sw, nand, probe) = switch_nand_probe();
        assert!(net.input_pin(sw, 0).is_none());
        assert!(net.output_pin(sw, 0).is_some());
        assert!(net.input_pin(nand, 2).is_none());
        assert!(net.output_pin(probe, 0).is_none());
    }

    #[test]
    fn inverter_chain_drives_probe() {
        // A -> NAND in0, in1 held High by a second switch, NAND out -> probe.
        let (mut net, a, nand, probe) = switch_nand_probe();
        let held = net.create_chip(ChipKind::InputSwitch);
        net.toggle(held, 0).unwrap();

        let a_out = net.output_pin(a, 0).unwrap();
        let held_out = net.output_pin(held, 0).unwrap();
        let n_in0 = net.input_pin(nand, 0).unwrap();
        let n_in1 = net.input_pin(nand, 1).unwrap();
        let n_out = net.output_pin(nand, 0).unwrap();
        let p_in = net.input_pin(probe, 0).unwrap();

        net.connect(a_out, n_in0).unwrap();
        net.connect(held_out, n_in1).unwrap();
        net.connect(n_out, p_in).unwrap();
        // NAND(Low, High) = High.
        assert!(net.is_high(p_in));

        net.toggle(a, 0).unwrap();
        assert!(!net.is_high(p_in));
        net.toggle(a, 0).unwrap();
        assert!(net.is_high(p_in));
    }

    #[test]
    fn fanout_updates_every_probe_in_one_call() {
        let mut net = Network::new();
        let sw = net.create_chip(ChipKind::InputSwitch);
        let src = net.output_pin(sw, 0).unwrap();
        let probes: Vec<PinId> = (0..2)
            .map(|_| {
                let p = net.create_chip(ChipKind::OutputProbe);
                let pin = net.input_pin(p, 0).unwrap();
                net.connect(src, pin).unwrap();
                pin
            })
            .collect();
        net.toggle(sw, 0).unwrap();
        assert!(probes.iter().all(|&p| net.is_high(p)));
        net.toggle(sw, 0).unwrap();
        assert!(probes.iter().all(|&p| !net.is_high(p)));
    }

    #[test]
    fn duplicate_wire_is_not_added_twice() {
        let (mut net, sw, _, probe) = switch_nand_probe();
        let src = net.output_pin(sw, 0).unwrap();
        let dst = net.input_pin(probe, 0).unwrap();
        net.connect(src, dst).unwrap();
        net.connect(src, dst).unwrap();
        assert_eq!(net.wires.len(), 1);
        // One disconnect fully severs the pair.
        net.disconnect(src, dst).unwrap();
        assert!(net.wires.is_empty());
    }

    #[test]
    fn teardown_leaves_no_wires_behind() {
        let (mut net, sw, nand, probe) = switch_nand_probe();
        let sw_out = net.output_pin(sw, 0).unwrap();
        let n_in0 = net.input_pin(nand, 0).unwrap();
        let n_out = net.output_pin(nand, 0).unwrap();
        let p_in = net.input_pin(probe, 0).unwrap();
        net.connect(sw_out, n_in0).unwrap();
        net.connect(n_out, p_in).unwrap();

        net.disconnect(sw_out, n_in0).unwrap();
        net.disconnect(n_out, p_in).unwrap();
        net.destroy_chip(nand).unwrap();

        assert!(net.wires.iter().all(|w| w.src.chip != nand && w.dst.chip != nand));
        assert_eq!(net.chip_count(), 2);
    }

    #[test]
    fn destroy_chip_severs_remaining_wires() {
        let (mut net, sw, nand, probe) = switch_nand_probe();
        let sw_out = net.output_pin(sw, 0).unwrap();
        let n_in0 = net.input_pin(nand, 0).unwrap();
        let n_in1 = net.input_pin(nand, 1).unwrap();
        let n_out = net.output_pin(nand, 0).unwrap();
        let p_in = net.input_pin(probe, 0).unwrap();
        net.connect(sw_out, n_in0).unwrap();
        net.connect(sw_out, n_in1).unwrap();
        net.connect(n_out, p_in).unwrap();
        assert!(net.is_high(p_in));

        net.destroy_chip(nand).unwrap();
        assert!(net.wires.is_empty());
        // The probe lost its driver and dropped Low.
        assert!(!net.is_high(p_in));
        // The switch side is untouched.
        assert_eq!(net.pin_state(sw_out), Some(PinState::Low));
    }

    #[test]
    fn stale_handles_are_reported_not_fatal() {
        let (mut net, sw, _, probe) = switch_nand_probe();
        let src = net.output_pin(sw, 0).unwrap();
        let dst = net.input_pin(probe, 0).unwrap();
        net.destroy_chip(sw).unwrap();

        assert_eq!(net.pin_state(src), None);
        assert!(!net.is_high(src));
        assert_eq!(net.connect(src, dst), Err(NetError::PinNotFound(src)));
        assert!(matches!(net.toggle(sw, 0), Err(NetError::PinNotFound(_))));
        assert_eq!(net.destroy_chip(sw), Err(NetError::ChipNotFound(sw)));
    }

    #[test]
    fn iteration_preserves_creation_order() {
        let (mut net, sw, nand, probe) = switch_nand_probe();
        net.destroy_chip(nand).unwrap();
        let extra = net.create_chip(ChipKind::Nand);
        let ids: Vec<ChipId> = net.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![sw, probe, extra]);
    }
}
