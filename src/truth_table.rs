use std::fmt::{self, Display};

use itertools::Itertools;
use log::debug;

use crate::error::GateError;
use crate::gate::Gate;

/// Largest input count a truth table enumerates (2^16 rows).
pub const MAX_TABLE_INPUTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One input assignment of a truth table.
///
/// `actual` holds the output of the last evaluation and `is_match` is only meaningful after
/// [`TruthTable::compare_results`] (or [`TruthTable::evaluate_gate`]) has run.
pub struct TruthTableRow {
    pub inputs: Vec<bool>,
    pub expected: bool,
    pub actual: bool,
    pub is_match: bool,
}

impl TruthTableRow {
    pub const fn new(inputs: Vec<bool>, expected: bool) -> Self {
        Self {
            inputs,
            expected,
            actual: false,
            is_match: false,
        }
    }
}

/// Exhaustive verification of a single gate against a list of expected outputs.
///
/// The table borrows the gate for as long as it exists, and drives it by overwriting
/// its inputs during [`TruthTable::evaluate_gate`]. Row `i` assigns bit `b` of `i` to
/// input `b`, so the first input toggles fastest.
#[derive(Debug)]
pub struct TruthTable<'g> {
    gate: Option<&'g mut Gate>,
    num_inputs: usize,
    rows: Vec<TruthTableRow>,
}

/// Number of rows of an exhaustive table over `num_inputs` inputs.
pub fn row_count(num_inputs: usize) -> Result<usize, GateError> {
    if num_inputs > MAX_TABLE_INPUTS {
        Err(GateError::TooManyInputs {
            inputs: num_inputs,
            max: MAX_TABLE_INPUTS,
        })
    } else {
        Ok(1 << num_inputs)
    }
}

const fn bit(value: bool) -> char {
    if value {
        '1'
    } else {
        '0'
    }
}

impl<'g> TruthTable<'g> {
    /// Builds the `2^n` rows for the gate's current input count `n`.
    ///
    /// `expected[i]` is the expected output of row `i`; its length must be exactly `2^n`.
    pub fn new(gate: &'g mut Gate, expected: &[bool]) -> Result<Self, GateError> {
        let num_inputs = gate.input_count();
        let total = row_count(num_inputs)?;

        if expected.len() != total {
            return Err(GateError::SizeMismatch {
                expected: total,
                actual: expected.len(),
            });
        }

        let mut table = Self {
            gate: Some(gate),
            num_inputs,
            rows: Vec::with_capacity(total),
        };

        table.generate_input_combinations(num_inputs)?;
        table.set_expected_outputs(expected)?;

        Ok(table)
    }

    /// Replaces all rows by the `2^num_inputs` input assignments, expecting `false` everywhere.
    pub fn generate_input_combinations(&mut self, num_inputs: usize) -> Result<(), GateError> {
        let total = row_count(num_inputs)?;

        self.num_inputs = num_inputs;
        self.rows = (0..total)
            .map(|i| {
                let inputs = (0..num_inputs).map(|b| (i >> b) & 1 == 1).collect();
                TruthTableRow::new(inputs, false)
            })
            .collect();

        Ok(())
    }

    /// Runs the gate on every row, stores the outputs and recomputes the match flags.
    ///
    /// Stops at the first row whose assignment the gate rejects.
    pub fn evaluate_gate(&mut self) -> Result<(), GateError> {
        let gate = self.gate.as_deref_mut().ok_or(GateError::MissingGate)?;

        for row in &mut self.rows {
            gate.set_inputs(&row.inputs)?;
            row.actual = gate.evaluate()?;
        }

        self.compare_results();

        debug!(
            "evaluated {} rows of {}: {} mismatches",
            self.rows.len(),
            self.gate.as_deref().map_or("<none>", Gate::label),
            self.mismatches().len()
        );

        Ok(())
    }

    pub fn compare_results(&mut self) {
        for row in &mut self.rows {
            row.is_match = row.expected == row.actual;
        }
    }

    /// Replaces the expected output of every row and clears all match flags.
    pub fn set_expected_outputs(&mut self, expected: &[bool]) -> Result<(), GateError> {
        if expected.len() != self.rows.len() {
            return Err(GateError::SizeMismatch {
                expected: self.rows.len(),
                actual: expected.len(),
            });
        }

        for (row, &value) in self.rows.iter_mut().zip(expected) {
            row.expected = value;
            row.is_match = false;
        }

        Ok(())
    }

    /// Percentage of rows whose match flag is set; `0.0` for a table without rows.
    pub fn accuracy(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }

        let matches = self.rows.iter().filter(|row| row.is_match).count();
        matches as f64 / self.rows.len() as f64 * 100.0
    }

    pub fn mismatches(&self) -> Vec<usize> {
        self.rows
            .iter()
            .positions(|row| !row.is_match)
            .collect()
    }

    pub fn is_passing(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|row| row.is_match)
    }

    pub fn validation_report(&self) -> ValidationReport {
        let mismatches = self.mismatches();

        ValidationReport {
            total: self.rows.len(),
            passing: self.rows.len() - mismatches.len(),
            failing: mismatches.len(),
            accuracy: self.accuracy(),
            mismatches,
        }
    }

    /// Failing rows together with their index.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &TruthTableRow)> {
        self.rows.iter().enumerate().filter(|(_, row)| !row.is_match)
    }

    /// A view of the table that only renders the failing rows.
    pub const fn highlight_errors(&self) -> HighlightedErrors<'_, 'g> {
        HighlightedErrors(self)
    }

    pub const fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[TruthTableRow] {
        &self.rows
    }

    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_deref()
    }

    /// Drops every row and detaches the gate, leaving an empty zero-input table.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.num_inputs = 0;
        self.gate = None;
    }

    pub fn add_row(&mut self, inputs: Vec<bool>, expected: bool) -> Result<(), GateError> {
        if inputs.len() != self.num_inputs {
            return Err(GateError::SizeMismatch {
                expected: self.num_inputs,
                actual: inputs.len(),
            });
        }

        self.rows.push(TruthTableRow::new(inputs, expected));
        Ok(())
    }

    fn input_headers(&self) -> Vec<String> {
        (0..self.num_inputs).map(|i| format!("I{i}")).collect()
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!(
            "{:>4} | {} | Expected | Actual | Match",
            "Row",
            self.input_headers().join(" ")
        );
        writeln!(f, "{header}")?;
        writeln!(f, "{}", "-".repeat(header.len()))
    }

    fn write_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        row: &TruthTableRow,
    ) -> fmt::Result {
        let cells = self
            .input_headers()
            .iter()
            .zip(&row.inputs)
            .map(|(header, &value)| format!("{:>width$}", bit(value), width = header.len()))
            .join(" ");

        writeln!(
            f,
            "{:>4} | {} | {:>8} | {:>6} | {:>5}",
            index,
            cells,
            bit(row.expected),
            bit(row.actual),
            bit(row.is_match)
        )
    }
}

impl Display for TruthTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;

        for (index, row) in self.rows.iter().enumerate() {
            self.write_row(f, index, row)?;
        }

        writeln!(f, "Total rows: {}", self.rows.len())?;
        write!(f, "Accuracy: {:.2}%", self.accuracy())
    }
}

pub struct HighlightedErrors<'t, 'g>(&'t TruthTable<'g>);

impl Display for HighlightedErrors<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_header(f)?;

        for (index, row) in self.0.errors() {
            self.0.write_row(f, index, row)?;
        }

        Ok(())
    }
}

/// Summary of a comparison pass over a truth table.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub total: usize,
    pub passing: usize,
    pub failing: usize,
    pub accuracy: f64,
    pub mismatches: Vec<usize>,
}

impl ValidationReport {
    pub const fn is_passing(&self) -> bool {
        self.total > 0 && self.failing == 0
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total number of test cases: {}", self.total)?;
        writeln!(f, "Number of passing test cases: {}", self.passing)?;
        writeln!(f, "Number of failing test cases: {}", self.failing)?;
        writeln!(f, "Accuracy: {:.2}%", self.accuracy)?;

        if self.mismatches.is_empty() {
            writeln!(f, "Mismatches: none")?;
        } else {
            writeln!(f, "Mismatches: {}", self.mismatches.iter().join(" "))?;
        }

        if self.is_passing() {
            write!(f, "Test passed!")
        } else {
            write!(f, "Test failed!")
        }
    }
}
