//! Line-oriented command shell driving the gate registry.
//!
//! The shell owns every gate by name and is the only place where errors from the core
//! are caught: a failing command is reported and the session continues.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::factory::GateFactory;
use crate::gate::Gate;
use crate::truth_table::{row_count, TruthTable};

lazy_static! {
    static ref BIT_STRING: Regex = Regex::new(r"^[01]+$").expect("invalid bit string pattern");
}

const HELP: &str = "\
Available commands:
  create <type> <name>    - Create a new gate
  list                    - Show all created gates
  set <name> <inputs>     - Set gate inputs (e.g. set MyGate 1 0)
  eval <name>             - Evaluate gate and show output
  info <name>             - Show gate information
  reset <name>            - Reset the output of a gate
  table <name>            - Generate the truth table of a gate
  test <name> <expected>  - Verify a gate against expected outputs (e.g. test MyGate 0001)
  delete <name>           - Delete a gate
  clear                   - Clear screen
  help                    - Show this help message
  exit                    - Exit the simulator";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Create { gate_type: &'a str, name: &'a str },
    List,
    Set { name: &'a str, values: Vec<&'a str> },
    Eval { name: &'a str },
    Info { name: &'a str },
    Reset { name: &'a str },
    Table { name: &'a str },
    Test { name: &'a str, expected: Vec<&'a str> },
    Delete { name: &'a str },
    Clear,
    Help,
    Exit,
}

impl<'a> Command<'a> {
    /// Parses one command line. Blank lines yield `None`.
    pub fn parse(line: &'a str) -> Result<Option<Self>> {
        let tokens = line.split_whitespace().collect_vec();

        let Some((word, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match (word.to_ascii_lowercase().as_str(), args) {
            ("create", &[gate_type, name]) => Self::Create { gate_type, name },
            ("create", _) => bail!("usage: create <type> <name>"),
            ("list", _) => Self::List,
            ("set", &[name, ref values @ ..]) if !values.is_empty() => Self::Set {
                name,
                values: values.to_vec(),
            },
            ("set", _) => bail!("usage: set <name> <input1> <input2> ..."),
            ("eval", &[name]) => Self::Eval { name },
            ("eval", _) => bail!("usage: eval <name>"),
            ("info", &[name]) => Self::Info { name },
            ("info", _) => bail!("usage: info <name>"),
            ("reset", &[name]) => Self::Reset { name },
            ("reset", _) => bail!("usage: reset <name>"),
            ("table", &[name]) => Self::Table { name },
            ("table", _) => bail!("usage: table <name>"),
            ("test", &[name, ref expected @ ..]) if !expected.is_empty() => Self::Test {
                name,
                expected: expected.to_vec(),
            },
            ("test", _) => bail!("usage: test <name> <expected outputs>"),
            ("delete", &[name]) => Self::Delete { name },
            ("delete", _) => bail!("usage: delete <name>"),
            ("clear", _) => Self::Clear,
            ("help", _) => Self::Help,
            ("exit" | "quit", _) => Self::Exit,
            (other, _) => bail!("unknown command: {other}. Type 'help' for available commands."),
        };

        Ok(Some(command))
    }
}

fn parse_signal(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => bail!("invalid input value: {s}. Use 0, 1, true, or false."),
    }
}

/// Parses either a list of signal words or a single compact bit string such as `0110`.
pub fn parse_signals(values: &[&str]) -> Result<Vec<bool>> {
    match values {
        [compact] if BIT_STRING.is_match(compact) => {
            Ok(compact.chars().map(|c| c == '1').collect())
        }
        _ => values.iter().map(|value| parse_signal(value)).collect(),
    }
}

fn bits(values: &[bool]) -> String {
    values.iter().map(|&v| if v { "1" } else { "0" }).join(" ")
}

#[derive(Debug)]
pub struct Simulator {
    gates: FxHashMap<String, Gate>,
    factory: GateFactory,
    running: bool,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            gates: FxHashMap::default(),
            factory: GateFactory::new(),
            running: true,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn gate(&self, name: &str) -> Option<&Gate> {
        self.gates.get(name)
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn welcome<W: Write>(out: &mut W) -> io::Result<()> {
        writeln!(out, "=== Digital Logic Simulator ===")?;
        writeln!(out, "Type 'help' for available commands")?;
        writeln!(
            out,
            "Available gate types: {}",
            GateFactory::supported_types()
                .iter()
                .map(|t| t.name().to_ascii_lowercase())
                .join(", ")
        )?;
        writeln!(out)
    }

    /// Drops every gate and says goodbye.
    pub fn clean_up<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.gates.clear();
        writeln!(out, "Goodbye!")
    }

    /// Reads commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        prompt: bool,
    ) -> io::Result<()> {
        let mut lines = input.lines();

        while self.running {
            if prompt {
                write!(out, "> ")?;
                out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };

            self.execute(&line?, out)?;
        }

        Ok(())
    }

    /// Executes a single command line, reporting command failures on `out`.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        match self.dispatch(line, out) {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("command {:?} failed: {:#}", line.trim(), e);
                writeln!(out, "Error: {e}")
            }
        }
    }

    fn gate_ref(&self, name: &str) -> Result<&Gate> {
        self.gates
            .get(name)
            .ok_or_else(|| anyhow!("gate '{name}' not found"))
    }

    fn gate_mut(&mut self, name: &str) -> Result<&mut Gate> {
        self.gates
            .get_mut(name)
            .ok_or_else(|| anyhow!("gate '{name}' not found"))
    }

    fn dispatch<W: Write>(&mut self, line: &str, out: &mut W) -> Result<()> {
        let Some(command) = Command::parse(line)? else {
            return Ok(());
        };

        debug!("executing {:?}", command);

        match command {
            Command::Create { gate_type, name } => self.create(gate_type, name, out),
            Command::List => self.list(out),
            Command::Set { name, values } => self.set(name, &values, out),
            Command::Eval { name } => {
                let output = self.gate_mut(name)?.evaluate()?;
                writeln!(out, "Output: {} ({})", u8::from(output), output)?;
                Ok(())
            }
            Command::Info { name } => self.info(name, out),
            Command::Reset { name } => {
                self.gate_mut(name)?.reset();
                writeln!(out, "Reset output of '{name}'")?;
                Ok(())
            }
            Command::Table { name } => self.table(name, out),
            Command::Test { name, expected } => self.test(name, &expected, out),
            Command::Delete { name } => {
                self.gates
                    .remove(name)
                    .ok_or_else(|| anyhow!("gate '{name}' not found"))?;
                writeln!(out, "Deleted gate '{name}'")?;
                Ok(())
            }
            Command::Clear => {
                write!(out, "\x1b[2J\x1b[1;1H")?;
                Ok(())
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                Ok(())
            }
            Command::Exit => {
                self.running = false;
                writeln!(out, "Exiting simulator...")?;
                Ok(())
            }
        }
    }

    fn create<W: Write>(&mut self, gate_type: &str, name: &str, out: &mut W) -> Result<()> {
        if self.gates.contains_key(name) {
            bail!("gate '{name}' already exists");
        }

        let gate = self.factory.create_gate_named(gate_type, name)?;

        writeln!(
            out,
            "Created {} gate '{}' with {} inputs",
            gate.gate_type(),
            name,
            gate.input_count()
        )?;

        self.gates.insert(name.to_string(), gate);
        Ok(())
    }

    fn list<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.gates.is_empty() {
            writeln!(
                out,
                "No gates created yet. Use 'create <type> <name>' to create a gate."
            )?;
            return Ok(());
        }

        writeln!(out, "Active gates:")?;

        for (name, gate) in self.gates.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            writeln!(
                out,
                "- {} ({}, {} inputs)",
                name,
                GateFactory::gate_type_name(gate.gate_type()),
                gate.input_count()
            )?;
        }

        Ok(())
    }

    fn set<W: Write>(&mut self, name: &str, values: &[&str], out: &mut W) -> Result<()> {
        let values = parse_signals(values)?;
        let gate = self.gate_mut(name)?;

        if values.len() != gate.input_count() {
            bail!(
                "gate '{}' expects {} inputs, got {}",
                name,
                gate.input_count(),
                values.len()
            );
        }

        gate.set_inputs(&values)?;
        writeln!(out, "Set inputs for '{}': {}", name, bits(&values))?;
        Ok(())
    }

    fn info<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let gate = self.gate_ref(name)?;

        writeln!(out, "Gate: {name}")?;
        writeln!(out, "Id: {}", gate.id())?;
        writeln!(out, "Type: {}", GateFactory::gate_type_name(gate.gate_type()))?;
        writeln!(out, "Inputs: {}", gate.input_count())?;
        writeln!(out, "Current inputs: {}", bits(gate.inputs()))?;
        writeln!(out, "Last output: {}", u8::from(gate.output()))?;
        Ok(())
    }

    /// Tables run on a copy so the registered gate keeps its inputs and last output.
    fn table<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let mut gate = self.gate_ref(name)?.clone();
        let gate_type = gate.gate_type();
        let rows = row_count(gate.input_count())?;

        let mut table = TruthTable::new(&mut gate, &vec![false; rows])?;

        let expected = table
            .rows()
            .iter()
            .map(|row| gate_type.reduce(&row.inputs))
            .collect::<Result<Vec<bool>, _>>()?;

        table.set_expected_outputs(&expected)?;
        table.evaluate_gate()?;

        writeln!(out, "Truth table for '{name}' ({gate_type}):")?;
        writeln!(out, "{table}")?;
        Ok(())
    }

    fn test<W: Write>(&self, name: &str, expected: &[&str], out: &mut W) -> Result<()> {
        let expected = parse_signals(expected)?;
        let mut gate = self.gate_ref(name)?.clone();

        let mut table = TruthTable::new(&mut gate, &expected)?;
        table.evaluate_gate()?;

        writeln!(out, "{}", table.validation_report())?;

        if !table.is_passing() {
            writeln!(out, "Failing rows:")?;
            write!(out, "{}", table.highlight_errors())?;
        }

        Ok(())
    }
}
