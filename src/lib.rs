//! # logicnet
//!
//! The simulation core of an interactive boolean logic sandbox: a network
//! of chips (NAND gates, input switches, output probes) whose pins are
//! wired output-to-input, with eager signal propagation. Every mutation
//! (a switch toggle, a wire change, a chip removal) settles the whole
//! reachable subgraph before it returns, so a caller
//! (typically an editor or render loop) can read any pin and always see a
//! consistent network.
//!
//! ## Quick start
//!
//! ```rust
//! use logicnet::{ChipKind, Network};
//!
//! let mut net = Network::new();
//! let switch = net.create_chip(ChipKind::InputSwitch);
//! let nand = net.create_chip(ChipKind::Nand);
//! let probe = net.create_chip(ChipKind::OutputProbe);
//!
//! let src = net.output_pin(switch, 0).unwrap();
//! let in0 = net.input_pin(nand, 0).unwrap();
//! let in1 = net.input_pin(nand, 1).unwrap();
//! let out = net.output_pin(nand, 0).unwrap();
//! let shown = net.input_pin(probe, 0).unwrap();
//!
//! net.connect(src, in0).unwrap();
//! net.connect(src, in1).unwrap();
//! net.connect(out, shown).unwrap();
//!
//! // NAND(Low, Low) = High.
//! assert!(net.is_high(shown));
//!
//! net.toggle(switch, 0).unwrap();
//! // NAND(High, High) = Low, pushed through to the probe in one call.
//! assert!(!net.is_high(shown));
//! ```
//!
//! Wiring a feedback loop is reported as [`NetError::Oscillation`] by the
//! mutation that closed the loop, rather than hanging the cascade.

mod cascade;
pub mod chip;
mod dump;
pub mod network;

pub use chip::{Chip, ChipKind, PinDir, PinState};
pub use network::{ChipId, NetError, Network, PinId};
