//! ANSI-colored diagnostic dump of every chip and pin state. Debug aid
//! only; the exact format carries no stability guarantee.

use std::fmt::Write;

use crate::chip::PinState;
use crate::network::Network;

const BOLD_GREEN: &str = "\x1b[1;32m";
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_BLUE: &str = "\x1b[1;34m";
const CYAN: &str = "\x1b[0;36m";
const YELLOW: &str = "\x1b[0;33m";
const RESET: &str = "\x1b[0m";

impl Network {
    /// Renders every chip and pin state, in chip creation order.
    pub fn dump(&self) -> String {
        let mut buf = String::new();
        for (_, chip) in self.iter() {
            writeln!(&mut buf, "{BOLD_BLUE}{}{RESET}", chip.kind().name()).unwrap();
            render_pins(&mut buf, chip.inputs(), "Input");
            render_pins(&mut buf, chip.outputs(), "Output");
        }
        buf
    }
}

fn render_pins(buf: &mut String, pins: &[PinState], side: &str) {
    if pins.is_empty() {
        return;
    }
    writeln!(buf, "  {YELLOW}{side} Pins{RESET}").unwrap();
    for (idx, state) in pins.iter().enumerate() {
        let shown = if state.is_high() {
            format!("{BOLD_GREEN}ON{RESET}")
        } else {
            format!("{BOLD_RED}OFF{RESET}")
        };
        writeln!(buf, "    {CYAN}#{idx}{RESET} is {shown}").unwrap();
    }
}
