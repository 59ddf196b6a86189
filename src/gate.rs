use std::{
    fmt::{self, Display},
    str::FromStr,
};

use log::trace;

use crate::error::GateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The logic function implemented by a gate.
///
/// [`FlipFlop`] and [`Latch`] are reserved tags: they can be named and parsed, but the
/// factory refuses to construct them and they have no evaluation rule.
///
/// [`FlipFlop`]: GateType::FlipFlop
/// [`Latch`]: GateType::Latch
pub enum GateType {
    And,
    Or,
    Not,
    Nor,
    Nand,
    Xor,
    Xnor,
    Buffer,
    FlipFlop,
    Latch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Number of inputs a gate type accepts.
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub const fn accepts(self, inputs: usize) -> bool {
        match self {
            Self::Exactly(n) => inputs == n,
            Self::AtLeast(n) => inputs >= n,
        }
    }

    /// The input count a freshly constructed gate starts with.
    pub const fn default_inputs(self) -> usize {
        match self {
            Self::Exactly(n) | Self::AtLeast(n) => n,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl GateType {
    const fn variants<'a>() -> &'a [Self] {
        &[
            Self::And,
            Self::Or,
            Self::Not,
            Self::Nor,
            Self::Nand,
            Self::Xor,
            Self::Xnor,
            Self::Buffer,
            Self::FlipFlop,
            Self::Latch,
        ]
    }

    fn matches(self, s: &str) -> bool {
        let s = s.to_ascii_lowercase();

        match self {
            Self::And => s == "and",
            Self::Or => s == "or",
            Self::Not => s == "not",
            Self::Nor => s == "nor",
            Self::Nand => s == "nand",
            Self::Xor => s == "xor",
            Self::Xnor => s == "xnor",
            Self::Buffer => matches!(s.as_str(), "buffer" | "buf"),
            Self::FlipFlop => matches!(s.as_str(), "flipflop" | "flip-flop"),
            Self::Latch => s == "latch",
        }
    }

    /// Canonical uppercase name of the tag.
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Nor => "NOR",
            Self::Nand => "NAND",
            Self::Xor => "XOR",
            Self::Xnor => "XNOR",
            Self::Buffer => "BUFFER",
            Self::FlipFlop => "FLIPFLOP",
            Self::Latch => "LATCH",
        }
    }

    /// Required input count, or `None` for the reserved sequential types.
    pub const fn arity(self) -> Option<Arity> {
        match self {
            Self::Not | Self::Buffer => Some(Arity::Exactly(1)),
            Self::And | Self::Or | Self::Nor | Self::Nand | Self::Xor | Self::Xnor => {
                Some(Arity::AtLeast(2))
            }
            Self::FlipFlop | Self::Latch => None,
        }
    }

    /// Applies the logic rule of this type to `inputs`.
    ///
    /// The arity is checked before anything else, so a vector of the wrong length is
    /// always rejected instead of being reduced.
    pub fn reduce(self, inputs: &[bool]) -> Result<bool, GateError> {
        let required = self.arity().ok_or(GateError::InvalidGateType(self))?;

        if !required.accepts(inputs.len()) {
            return Err(GateError::InvalidArity {
                gate_type: self,
                required,
                actual: inputs.len(),
            });
        }

        let all = || inputs.iter().all(|&v| v);
        let any = || inputs.iter().any(|&v| v);
        let odd = || inputs.iter().filter(|&&v| v).count() % 2 == 1;

        Ok(match self {
            Self::And => all(),
            Self::Or => any(),
            Self::Not => !inputs[0],
            Self::Nand => !all(),
            Self::Nor => !any(),
            Self::Xor => odd(),
            Self::Xnor => !odd(),
            Self::Buffer => inputs[0],
            Self::FlipFlop | Self::Latch => return Err(GateError::InvalidGateType(self)),
        })
    }
}

impl Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for GateType {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::variants()
            .iter()
            .find(|variant| variant.matches(s))
            .copied()
            .ok_or_else(|| GateError::UnknownGateType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GateId(pub usize);

impl Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A single logic gate, evaluated in isolation from manually assigned inputs.
///
/// Gates are created through [`GateFactory`](crate::factory::GateFactory), which assigns
/// the identity and sizes the input vector for the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    gate_type: GateType,
    inputs: Vec<bool>,
    output: bool,
    id: GateId,
    label: String,
}

macro_rules! variant_constructors {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub(crate) fn $name(id: GateId, label: String) -> Self {
                Self::new(GateType::$variant, id, label)
            }
        )*
    };
}

impl Gate {
    fn new(gate_type: GateType, id: GateId, label: String) -> Self {
        let inputs = gate_type.arity().map_or(0, Arity::default_inputs);
        let label = if label.is_empty() {
            format!("Gate{id}")
        } else {
            label
        };

        Self {
            gate_type,
            inputs: vec![false; inputs],
            output: false,
            id,
            label,
        }
    }

    variant_constructors! {
        and => And,
        or => Or,
        not => Not,
        nor => Nor,
        nand => Nand,
        xor => Xor,
        xnor => Xnor,
        buffer => Buffer,
    }

    fn check_index(&self, index: usize) -> Result<(), GateError> {
        if index < self.inputs.len() {
            Ok(())
        } else {
            Err(GateError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            })
        }
    }

    /// Overwrites one input slot. The output is unchanged until the next [`Gate::evaluate`].
    pub fn set_input(&mut self, index: usize, value: bool) -> Result<(), GateError> {
        self.check_index(index)?;
        self.inputs[index] = value;
        Ok(())
    }

    /// Overwrites every input slot at once; nothing is written on a length mismatch.
    pub fn set_inputs(&mut self, values: &[bool]) -> Result<(), GateError> {
        if values.len() != self.inputs.len() {
            return Err(GateError::SizeMismatch {
                expected: self.inputs.len(),
                actual: values.len(),
            });
        }

        self.inputs.copy_from_slice(values);
        Ok(())
    }

    pub fn input(&self, index: usize) -> Result<bool, GateError> {
        self.check_index(index)?;
        Ok(self.inputs[index])
    }

    pub fn inputs(&self) -> &[bool] {
        &self.inputs
    }

    pub const fn output(&self) -> bool {
        self.output
    }

    /// Appends an input slot.
    ///
    /// This does not consult the arity: a fixed-arity gate that grows past its requirement
    /// fails on the next evaluation.
    pub fn add_input(&mut self, value: bool) {
        self.inputs.push(value);
    }

    /// Removes an input slot and returns its value.
    pub fn remove_input(&mut self, index: usize) -> Result<bool, GateError> {
        self.check_index(index)?;
        Ok(self.inputs.remove(index))
    }

    /// Recomputes the output from the current inputs and returns it.
    ///
    /// The arity is validated on every call. On failure the previous output is kept.
    pub fn evaluate(&mut self) -> Result<bool, GateError> {
        self.output = self.gate_type.reduce(&self.inputs)?;
        trace!(
            "evaluated {} ({}): {:?} -> {}",
            self.label,
            self.gate_type,
            self.inputs,
            self.output
        );
        Ok(self.output)
    }

    /// Clears the output; inputs are left untouched.
    pub fn reset(&mut self) {
        self.output = false;
    }

    pub const fn id(&self) -> GateId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn gate_type(&self) -> GateType {
        self.gate_type
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} inputs)",
            self.label,
            self.gate_type,
            self.inputs.len()
        )
    }
}
