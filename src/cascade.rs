//! The propagation engine: drives one pin-level change through every
//! reachable dependent pin before returning control to the caller.
//!
//! The cascade is push-based, synchronous, and deterministic: an explicit
//! worklist walks the graph depth-first, visiting each output pin's
//! downstream wires in the order they were created. Each pin may be
//! assigned at most once per cascade; a second assignment means the wiring
//! feeds back on itself, which is reported as
//! [`NetError::Oscillation`](crate::NetError::Oscillation) instead of
//! recursing until the stack blows.

use std::collections::HashSet;

use log::trace;

use crate::chip::{PinDir, PinState};
use crate::network::{NetError, Network, PinId};

impl Network {
    /// Assigns `level` to `pin` and cascades until the network settles.
    ///
    /// Assignment is unconditional, even when the level is unchanged. An
    /// input-pin assignment re-runs the owning chip's evaluator and keeps
    /// cascading only if the computed output actually differs from the
    /// output pin's current level; an output-pin assignment pushes the
    /// level into every downstream input pin.
    pub(crate) fn drive(&mut self, pin: PinId, level: PinState) -> Result<(), NetError> {
        let mut work = vec![(pin, level)];
        let mut assigned: HashSet<PinId> = HashSet::new();

        while let Some((pin, level)) = work.pop() {
            if !assigned.insert(pin) {
                return Err(NetError::Oscillation(pin));
            }
            self.write_pin(pin, level)?;
            trace!("{pin} <- {level:?}");

            match pin.dir {
                PinDir::Input => {
                    let chip = self
                        .chips
                        .get(pin.chip)
                        .ok_or(NetError::ChipNotFound(pin.chip))?;
                    if let Some(value) = chip.kind.evaluate(&chip.inputs) {
                        let out = PinId::output(pin.chip, 0);
                        if self.pin_state(out) != Some(value) {
                            work.push((out, value));
                        }
                    }
                }
                PinDir::Output => {
                    // Reversed so the stack pops wires in creation order.
                    let targets: Vec<PinId> = self.downstream(pin).collect();
                    for dst in targets.into_iter().rev() {
                        work.push((dst, level));
                    }
                }
            }
        }
        Ok(())
    }

    fn write_pin(&mut self, pin: PinId, level: PinState) -> Result<(), NetError> {
        let chip = self
            .chips
            .get_mut(pin.chip)
            .ok_or(NetError::ChipNotFound(pin.chip))?;
        let states = match pin.dir {
            PinDir::Input => &mut chip.inputs,
            PinDir::Output => &mut chip.outputs,
        };
        let slot = states.get_mut(pin.index).ok_or(NetError::PinNotFound(pin))?;
        *slot = level;
        Ok(())
    }
}
