use log::debug;

use crate::error::GateError;
use crate::gate::{Gate, GateId, GateType};

type Constructor = fn(GateId, String) -> Gate;

const CONSTRUCTORS: [(GateType, Constructor); 8] = [
    (GateType::And, Gate::and),
    (GateType::Or, Gate::or),
    (GateType::Not, Gate::not),
    (GateType::Nor, Gate::nor),
    (GateType::Nand, Gate::nand),
    (GateType::Xor, Gate::xor),
    (GateType::Xnor, Gate::xnor),
    (GateType::Buffer, Gate::buffer),
];

const SUPPORTED_TYPES: [GateType; 8] = [
    GateType::And,
    GateType::Or,
    GateType::Not,
    GateType::Nor,
    GateType::Nand,
    GateType::Xor,
    GateType::Xnor,
    GateType::Buffer,
];

/// Builds gates and hands out their identities.
///
/// Identities are unique per factory and start at zero, so two factories produce the
/// same sequence of ids.
#[derive(Debug, Default)]
pub struct GateFactory {
    next_id: usize,
}

impl GateFactory {
    pub const fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Creates a gate of `gate_type` sized to the type's default arity.
    ///
    /// An empty `label` is replaced by `Gate<id>`. Failed calls do not consume an id.
    pub fn create_gate(&mut self, gate_type: GateType, label: &str) -> Result<Gate, GateError> {
        let constructor = CONSTRUCTORS
            .iter()
            .find(|(t, _)| *t == gate_type)
            .map(|(_, constructor)| constructor)
            .ok_or(GateError::InvalidGateType(gate_type))?;

        let id = GateId(self.next_id);
        self.next_id += 1;

        let gate = constructor(id, label.to_string());
        debug!("created gate {} with id {}", gate, id);

        Ok(gate)
    }

    /// Parses `gate_type` and creates the gate.
    pub fn create_gate_named(&mut self, gate_type: &str, label: &str) -> Result<Gate, GateError> {
        self.create_gate(gate_type.parse()?, label)
    }

    pub fn is_valid_gate_type(gate_type: GateType) -> bool {
        SUPPORTED_TYPES.contains(&gate_type)
    }

    pub const fn supported_types() -> &'static [GateType] {
        &SUPPORTED_TYPES
    }

    /// Display name of a constructible type, or `"UNKNOWN"` for anything else.
    ///
    /// Unlike [`GateFactory::create_gate`] this never fails.
    pub fn gate_type_name(gate_type: GateType) -> &'static str {
        if Self::is_valid_gate_type(gate_type) {
            gate_type.name()
        } else {
            "UNKNOWN"
        }
    }

    /// The id the next successfully created gate will receive.
    pub const fn next_id(&self) -> GateId {
        GateId(self.next_id)
    }
}
