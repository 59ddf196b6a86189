use pretty_assertions::assert_eq;

use logicsim::shell::{parse_signals, Command, Simulator};
use logicsim::GateType;

fn run(simulator: &mut Simulator, line: &str) -> String {
    let mut out = Vec::new();
    simulator.execute(line, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_parse_commands() {
    assert_eq!(Command::parse("").unwrap(), None);
    assert_eq!(Command::parse("   ").unwrap(), None);
    assert_eq!(
        Command::parse("CREATE and a1").unwrap(),
        Some(Command::Create {
            gate_type: "and",
            name: "a1"
        })
    );
    assert_eq!(
        Command::parse("set a1 1 0").unwrap(),
        Some(Command::Set {
            name: "a1",
            values: vec!["1", "0"]
        })
    );
    assert_eq!(
        Command::parse("test x 0110").unwrap(),
        Some(Command::Test {
            name: "x",
            expected: vec!["0110"]
        })
    );
    assert_eq!(Command::parse("quit").unwrap(), Some(Command::Exit));

    assert!(Command::parse("create and").is_err());
    assert!(Command::parse("set a1").is_err());
    assert!(Command::parse("eval").is_err());
    assert!(Command::parse("connect a b").is_err());
}

#[test]
fn test_parse_signals() {
    assert_eq!(parse_signals(&["1", "0"]).unwrap(), [true, false]);
    assert_eq!(parse_signals(&["true", "FALSE"]).unwrap(), [true, false]);
    assert_eq!(parse_signals(&["0110"]).unwrap(), [false, true, true, false]);
    assert_eq!(parse_signals(&["1"]).unwrap(), [true]);
    assert!(parse_signals(&["2"]).is_err());
    assert!(parse_signals(&["high", "low"]).is_err());
    assert!(parse_signals(&["t"]).is_err());
    assert!(parse_signals(&["10", "1"]).is_err());
}

#[test]
fn test_create_and_evaluate() {
    let mut sim = Simulator::new();

    assert_eq!(
        run(&mut sim, "create xor x"),
        "Created XOR gate 'x' with 2 inputs\n"
    );
    assert_eq!(sim.gate("x").map(|g| g.gate_type()), Some(GateType::Xor));

    assert_eq!(run(&mut sim, "set x 1 0"), "Set inputs for 'x': 1 0\n");
    assert_eq!(run(&mut sim, "eval x"), "Output: 1 (true)\n");
    assert_eq!(run(&mut sim, "set x 11"), "Set inputs for 'x': 1 1\n");
    assert_eq!(run(&mut sim, "eval x"), "Output: 0 (false)\n");
}

#[test]
fn test_errors_do_not_end_session() {
    let mut sim = Simulator::new();

    assert_eq!(
        run(&mut sim, "create mux m"),
        "Error: unknown gate type: mux\n"
    );
    assert_eq!(
        run(&mut sim, "create flipflop f"),
        "Error: invalid gate type: FLIPFLOP\n"
    );
    assert_eq!(run(&mut sim, "eval nothing"), "Error: gate 'nothing' not found\n");

    run(&mut sim, "create not n");
    assert_eq!(
        run(&mut sim, "create or n"),
        "Error: gate 'n' already exists\n"
    );
    assert_eq!(
        run(&mut sim, "set n 1 0"),
        "Error: gate 'n' expects 1 inputs, got 2\n"
    );
    assert_eq!(
        run(&mut sim, "set n maybe"),
        "Error: invalid input value: maybe. Use 0, 1, true, or false.\n"
    );
    assert_eq!(
        run(&mut sim, "frobnicate"),
        "Error: unknown command: frobnicate. Type 'help' for available commands.\n"
    );

    assert!(sim.is_running());
    assert_eq!(sim.gate_count(), 1);
}

#[test]
fn test_list_is_sorted() {
    let mut sim = Simulator::new();

    assert_eq!(
        run(&mut sim, "list"),
        "No gates created yet. Use 'create <type> <name>' to create a gate.\n"
    );

    run(&mut sim, "create or zeta");
    run(&mut sim, "create buffer alpha");
    run(&mut sim, "create nand mid");

    assert_eq!(
        run(&mut sim, "list"),
        "Active gates:\n\
         - alpha (BUFFER, 1 inputs)\n\
         - mid (NAND, 2 inputs)\n\
         - zeta (OR, 2 inputs)\n"
    );
}

#[test]
fn test_info_reset_delete() {
    let mut sim = Simulator::new();

    run(&mut sim, "create nor n");
    run(&mut sim, "eval n");

    assert_eq!(
        run(&mut sim, "info n"),
        "Gate: n\nId: 0\nType: NOR\nInputs: 2\nCurrent inputs: 0 0\nLast output: 1\n"
    );

    assert_eq!(run(&mut sim, "reset n"), "Reset output of 'n'\n");
    assert!(!sim.gate("n").unwrap().output());

    assert_eq!(run(&mut sim, "delete n"), "Deleted gate 'n'\n");
    assert_eq!(run(&mut sim, "delete n"), "Error: gate 'n' not found\n");
    assert_eq!(sim.gate_count(), 0);
}

#[test]
fn test_truth_table_commands() {
    let mut sim = Simulator::new();
    run(&mut sim, "create and a");

    let table = run(&mut sim, "table a");
    assert!(table.starts_with("Truth table for 'a' (AND):\n"));
    assert!(table.contains("Accuracy: 100.00%"));

    let report = run(&mut sim, "test a 0001");
    assert!(report.contains("Test passed!"));
    assert!(!report.contains("Failing rows:"));

    let report = run(&mut sim, "test a 0 1 1 1");
    assert!(report.contains("Accuracy: 50.00%"));
    assert!(report.contains("Mismatches: 1 2"));
    assert!(report.contains("Failing rows:"));

    assert_eq!(
        run(&mut sim, "test a 01"),
        "Error: expected 4 values, got 2\n"
    );
}

#[test]
fn test_truth_table_commands_keep_gate_state() {
    let mut sim = Simulator::new();
    run(&mut sim, "create and a");
    run(&mut sim, "set a 1 0");
    assert_eq!(run(&mut sim, "eval a"), "Output: 0 (false)\n");

    let info = run(&mut sim, "info a");
    assert!(info.ends_with("Current inputs: 1 0\nLast output: 0\n"));

    run(&mut sim, "test a 0001");
    assert_eq!(run(&mut sim, "info a"), info);

    run(&mut sim, "table a");
    assert_eq!(run(&mut sim, "info a"), info);
    assert_eq!(run(&mut sim, "eval a"), "Output: 0 (false)\n");
}

#[test]
fn test_run_until_exit() {
    let mut sim = Simulator::new();
    let script = "create or o\nexit\ncreate and never\n";
    let mut out = Vec::new();

    sim.run(script.as_bytes(), &mut out, false).unwrap();

    assert!(!sim.is_running());
    assert!(sim.gate("never").is_none());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Created OR gate 'o' with 2 inputs\nExiting simulator...\n"
    );
}

#[test]
fn test_prompt() {
    let mut sim = Simulator::new();
    let mut out = Vec::new();

    sim.run("help\n".as_bytes(), &mut out, true).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("> Available commands:"));
    assert!(out.ends_with("> "));
}
