use thiserror::Error;

use crate::gate::{Arity, GateType};

/// Failures reported by gates, the gate factory and truth tables.
///
/// All of these are local to a single call: the failing operation leaves the gate or table
/// in the state it had before the call, and the caller decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The input vector does not satisfy the arity of the gate type at evaluation time.
    #[error("{gate_type} gate requires {required} inputs, but has {actual}")]
    InvalidArity {
        gate_type: GateType,
        required: Arity,
        actual: usize,
    },
    /// An input index outside of `[0, len)`.
    #[error("input index {index} out of range (gate has {len} inputs)")]
    IndexOutOfRange { index: usize, len: usize },
    /// The type is a valid tag, but no gate of that type can be constructed.
    #[error("invalid gate type: {0}")]
    InvalidGateType(GateType),
    /// The text does not name any gate type.
    #[error("unknown gate type: {0}")]
    UnknownGateType(String),
    /// A sequence of signals has the wrong length.
    #[error("expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// The gate has more inputs than a truth table can enumerate.
    #[error("cannot build a truth table for {inputs} inputs (at most {max} are supported)")]
    TooManyInputs { inputs: usize, max: usize },
    /// The truth table no longer refers to a gate.
    #[error("truth table has no gate attached")]
    MissingGate,
}
