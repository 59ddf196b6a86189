#![warn(clippy::disallowed_types)]

pub use error::GateError;
pub use factory::GateFactory;
pub use gate::{Arity, Gate, GateId, GateType};
pub use truth_table::{TruthTable, TruthTableRow, ValidationReport};

pub mod error;
pub mod factory;
pub mod gate;
pub mod shell;
pub mod truth_table;
