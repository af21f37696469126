// Integration tests for the AnnoyScript interpreter

use annoyscript::config::MachineConfig;
use annoyscript::interpreter::errors::RuntimeError;
use annoyscript::interpreter::io::ScriptedInput;
use annoyscript::parser::Parser;
use annoyscript::{interpret, Error, Interpreter};

fn interpreter(source: &str, input: &str, config: MachineConfig) -> Interpreter {
    let program = annoyscript::load(source, &config).expect("Parsing failed");
    Interpreter::new(program, config)
        .with_input(ScriptedInput::new(input))
        .with_output(std::io::sink())
}

#[test]
fn test_triangular_run_prints_dollar() {
    let run = interpret("(< ++++++++ . >)", "").expect("Execution failed");

    assert_eq!(run.output, "$");
    assert_eq!(run.state.tape.cells()[0], 36);
    assert_eq!(run.state.instruction_counter, 1);
    assert_eq!(run.state.pointer(), 127);
}

#[test]
fn test_empty_blocks_alternate_direction() {
    let run = interpret("(< >)(< >)", "").expect("Execution failed");

    assert_eq!(run.output, "");
    assert_eq!(run.state.instruction_counter, 2);
    assert_eq!(run.state.pointer(), 0);
}

#[test]
fn test_printing_zero_is_display_of_dismay() {
    let mut interp = interpreter("(< # . >)", "", MachineConfig::default());
    let err = interp.run().unwrap_err();

    assert!(
        matches!(err, RuntimeError::DisplayOfDismay { cell: 0, value: 0, .. }),
        "unexpected error: {:?}",
        err
    );
    assert!(interp.transcript().is_empty());
    // The failing block never finished
    assert_eq!(interp.instruction_counter(), 0);
}

#[test]
fn test_zero_guard_skips_conditional_but_moves_pointer() {
    let run = interpret("(? ++++++++++ ?)", "").expect("Execution failed");

    assert_eq!(run.state.tape.cells()[0], 0);
    assert_eq!(run.output, "");
    assert_eq!(run.state.instruction_counter, 1);
    assert_eq!(run.state.pointer(), 127);
}

#[test]
fn test_skipped_conditional_has_no_side_effects() {
    // No input is available: reading it would fail, skipping must not
    let run = interpret("(? , . ^^^ (< + >) (? # ?) ?)", "").expect("Execution failed");

    assert!(run.state.tape.cells().iter().all(|&c| c == 0));
    assert_eq!(run.output, "");
    assert_eq!(run.state.instruction_counter, 1);
    assert_eq!(run.state.pointer(), 127);
}

#[test]
fn test_non_zero_guard_runs_conditional() {
    // 128 '^' moves the pointer by a full lap, so it stays on cell 0
    let source = format!("(< ++++++++ {} >)(? . ?)", "^".repeat(128));
    let run = interpret(&source, "").expect("Execution failed");

    assert_eq!(run.output, "$");
    assert_eq!(run.state.instruction_counter, 2);
    assert_eq!(run.state.pointer(), 1);
}

#[test]
fn test_hello_program() {
    // 'H' = 72: a run of 11 adds 66, a run of 3 adds 6
    // 'i' = 105: from 72 a run of 7 adds 28, a run of 2 adds 3, a run of 1 adds 1, then 1 more
    let source = "
        ; print \"Hi\" from a single cell
        (< +++++++++++ +++ . +++++++ ++ + + . >)
    ";
    let run = interpret(source, "").expect("Execution failed");

    assert_eq!(run.output, "Hi");
    assert_eq!(run.state.tape.cells()[0], 105);
}

#[test]
fn test_counter_equals_blocks_visited() {
    let source = "(< (< >) (? (< >) ?) >) (< + (< (< >) >) >) (? (< >) ?)";
    let mut interp = interpreter(source, "", MachineConfig::default());
    interp.run().expect("Execution failed");

    let visited: u64 = interp.block_hits().values().sum();
    assert_eq!(interp.instruction_counter(), visited);
}

#[test]
fn test_hottest_blocks_ordering() {
    let mut interp = interpreter("(< >)(< (< >) >)", "", MachineConfig::default());
    interp.run().expect("Execution failed");

    // Every block ran once; ties are ordered by id
    assert_eq!(interp.hottest_blocks(2), vec![(0, 1), (1, 1)]);
    assert_eq!(interp.hottest_blocks(10).len(), 3);
}

#[test]
fn test_error_messages_carry_prefixes() {
    let err = interpret("(< # . >)", "").unwrap_err();
    assert!(matches!(err, Error::Runtime(_)));
    assert!(
        err.to_string().starts_with("Runtime Error: Display of Dismay error: cell[0] = 0"),
        "got: {}",
        err
    );

    let err = interpret("(< +", "").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(
        err.to_string()
            .starts_with("Parse Error: Missing closing token '>)' for block starting at index 0"),
        "got: {}",
        err
    );
}

#[test]
fn test_parser_nesting_limit_from_config() {
    let source = format!("{}{}", "(<".repeat(10), ">)".repeat(10));
    let config = MachineConfig::default().with_max_nesting_depth(4);
    let err = annoyscript::load(&source, &config).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));

    let program = Parser::new(&source).parse_program().expect("Parsing failed");
    assert_eq!(program.node_count(), 10);
}

#[test]
fn test_deep_nesting_runs() {
    let depth = 500;
    let source = format!("{}{}", "(<".repeat(depth), ">)".repeat(depth));
    let run = interpret(&source, "").expect("Execution failed");

    assert_eq!(run.state.instruction_counter, depth as u64);
    // Alternating moves cancel out over an even number of blocks
    assert_eq!(run.state.pointer(), 0);
}

#[test]
fn test_history_replay() {
    let config = MachineConfig::default().with_history(1024 * 1024);
    let mut interp = interpreter("(< ++++++++ . >)(< >)", "", config);
    interp.run().expect("Execution failed");

    // Initial state plus one snapshot per block
    assert_eq!(interp.total_snapshots(), 3);

    interp.rewind_to_start().unwrap();
    assert_eq!(interp.instruction_counter(), 0);
    assert_eq!(interp.pointer(), 0);
    assert_eq!(interp.visible_output(), "");
    assert!(interp.current_point().is_none());

    interp.step_forward().unwrap();
    assert_eq!(interp.instruction_counter(), 1);
    assert_eq!(interp.pointer(), 127);
    assert_eq!(interp.tape().cells()[0], 36);
    assert_eq!(interp.visible_output(), "$");
    assert_eq!(interp.current_point().map(|p| p.block), Some(0));

    interp.step_forward().unwrap();
    assert_eq!(interp.instruction_counter(), 2);
    assert_eq!(interp.pointer(), 0);
    assert!(matches!(
        interp.step_forward(),
        Err(RuntimeError::HistoryOperationFailed { .. })
    ));

    interp.step_backward().unwrap();
    interp.step_backward().unwrap();
    assert!(matches!(
        interp.step_backward(),
        Err(RuntimeError::HistoryOperationFailed { .. })
    ));

    interp.jump_to_end().unwrap();
    assert_eq!(interp.history_position(), 2);
    assert_eq!(interp.visible_output(), "$");
}

#[test]
fn test_history_keeps_partial_run_on_error() {
    let config = MachineConfig::default().with_history(1024 * 1024);
    let mut interp = interpreter("(< ++++++++ . >)(< # . >)", "", config);
    assert!(interp.run().is_err());

    assert_eq!(interp.total_snapshots(), 2);
    interp.rewind_to_start().unwrap();
    interp.jump_to_end().unwrap();
    assert_eq!(interp.visible_output(), "$");
}

#[test]
fn test_history_limit_exceeded() {
    let config = MachineConfig::default().with_history(1);
    let mut interp = interpreter("(< >)", "", config);

    assert!(matches!(
        interp.run(),
        Err(RuntimeError::SnapshotLimitExceeded { limit: 1, .. })
    ));
}

#[test]
fn test_history_disabled_by_default() {
    let mut interp = interpreter("(< >)", "", MachineConfig::default());
    interp.run().expect("Execution failed");

    assert_eq!(interp.total_snapshots(), 0);
    assert!(interp.rewind_to_start().is_err());
}
