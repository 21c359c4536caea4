//! Chip and pin primitives: the typed evaluation units a network is built
//! from, and the boolean state their pins carry.

/// Logic level of a single pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinState {
    Low,
    High,
}

impl PinState {
    pub fn is_high(self) -> bool {
        matches!(self, PinState::High)
    }

    /// The opposite level. Toggling twice is a no-op.
    pub fn toggled(self) -> PinState {
        match self {
            PinState::Low => PinState::High,
            PinState::High => PinState::Low,
        }
    }
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high { PinState::High } else { PinState::Low }
    }
}

/// Which side of a chip a pin sits on. Wires run output -> input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDir {
    Input,
    Output,
}

/// The closed set of chip kinds.
///
/// Pin counts are fixed per kind at construction and never change:
/// a `Nand` has 2 inputs / 1 output, an `InputSwitch` 0 / 1, an
/// `OutputProbe` 1 / 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipKind {
    /// `output = NOT(input0 AND input1)`.
    Nand,
    /// Source of signal; its single output is only ever changed by an
    /// explicit toggle.
    InputSwitch,
    /// Sink of signal; consumes state for display, never produces.
    OutputProbe,
}

impl ChipKind {
    pub fn input_count(self) -> usize {
        match self {
            ChipKind::Nand => 2,
            ChipKind::InputSwitch => 0,
            ChipKind::OutputProbe => 1,
        }
    }

    pub fn output_count(self) -> usize {
        match self {
            ChipKind::Nand | ChipKind::InputSwitch => 1,
            ChipKind::OutputProbe => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChipKind::Nand => "NAND",
            ChipKind::InputSwitch => "INPUT",
            ChipKind::OutputProbe => "OUTPUT",
        }
    }

    /// Recomputes the output level from the current input levels, or `None`
    /// for kinds that produce nothing on their own (switches are driven by
    /// toggles, probes only consume).
    pub(crate) fn evaluate(self, inputs: &[PinState]) -> Option<PinState> {
        match self {
            ChipKind::Nand => {
                let both_high = inputs[0].is_high() && inputs[1].is_high();
                Some(PinState::from(!both_high))
            }
            ChipKind::InputSwitch | ChipKind::OutputProbe => None,
        }
    }
}

/// One evaluation unit. The pin arrays are allocated once per [`ChipKind`]
/// and never resize, so a pin's index is stable for the chip's lifetime.
#[derive(Debug, Clone)]
pub struct Chip {
    pub(crate) kind: ChipKind,
    pub(crate) inputs: Box<[PinState]>,
    pub(crate) outputs: Box<[PinState]>,
}

impl Chip {
    pub(crate) fn new(kind: ChipKind) -> Self {
        let mut chip = Chip {
            kind,
            inputs: vec![PinState::Low; kind.input_count()].into_boxed_slice(),
            outputs: vec![PinState::Low; kind.output_count()].into_boxed_slice(),
        };
        // NAND(Low, Low) = High, so a fresh NAND is born already settled.
        if kind == ChipKind::Nand {
            chip.outputs[0] = PinState::High;
        }
        chip
    }

    pub fn kind(&self) -> ChipKind {
        self.kind
    }

    pub fn inputs(&self) -> &[PinState] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PinState] {
        &self.outputs
    }
}
