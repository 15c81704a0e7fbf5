//! JikiScript evaluator tests: frames, output, 1-based indexing, value
//! semantics and the errors JikiScript reports under its own names.

use jiki_eval::{jikiscript, EvalOptions, RunOutput};
use jiki_parser::jikiscript::parse_source;
use jiki_types::translator::Language;
use jiki_types::{LanguageFeatures, RuntimeErrorType, Snapshot, Translator};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn run_with(source: &str, features: &LanguageFeatures) -> RunOutput {
    let program = match parse_source(source, features) {
        Ok(program) => program,
        Err(e) => panic!("unexpected syntax error: {e}"),
    };
    let options = EvalOptions::new(features).with_translator(Translator::new(Language::System));
    jikiscript::run(&program, source, &options)
}

fn run(source: &str) -> RunOutput {
    run_with(source, &LanguageFeatures::default())
}

fn output(out: &RunOutput) -> Vec<&str> {
    out.log_lines.iter().map(|l| l.output.as_str()).collect()
}

/// The type of the final error frame, panicking if the run succeeded.
fn error_type(out: &RunOutput) -> RuntimeErrorType {
    match out.frames.last().and_then(|f| f.error.as_ref()) {
        Some(err) => err.error_type,
        None => panic!("expected an error frame, got {:?}", out.frames),
    }
}

fn assert_success(out: &RunOutput) {
    if let Some(frame) = out.frames.iter().find(|f| f.is_error()) {
        panic!("unexpected error frame: {:?}", frame.error);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Variables and frames
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_set_and_change_record_frames() {
    let out = run("set x to 5\nchange x to x + 1\nlog x");
    assert_success(&out);
    assert_eq!(out.frames.len(), 3);
    assert_eq!(out.frames[0].variables.get("x"), Some(&Snapshot::Number(5.0)));
    assert_eq!(out.frames[1].variables.get("x"), Some(&Snapshot::Number(6.0)));
    assert_eq!(out.frames[1].line, 2);
    assert_eq!(out.frames[0].code, "set x to 5");
    assert_eq!(output(&out), vec!["6"]);
}

#[test]
fn test_frame_times_increase() {
    let out = run("set a to 1\nset b to 2\nset c to 3");
    let times: Vec<u64> = out.frames.iter().map(|f| f.time).collect();
    assert_eq!(times, vec![0, 1, 2]);
    let indexes: Vec<usize> = out.frames.iter().map(|f| f.index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
}

#[test]
fn test_set_twice_is_an_error() {
    let out = run("set x to 1\nset x to 2");
    assert_eq!(error_type(&out), RuntimeErrorType::VariableAlreadyDeclaredInScope);
    assert_eq!(out.frames.len(), 2);
}

#[test]
fn test_change_undeclared_variable() {
    let out = run("change y to 2");
    assert_eq!(error_type(&out), RuntimeErrorType::VariableNotDeclared);
}

#[test]
fn test_reading_undeclared_variable() {
    let out = run("log missing");
    assert_eq!(error_type(&out), RuntimeErrorType::VariableNotDeclared);
}

#[test]
fn test_snapshots_are_deep_copies() {
    let out = run("set xs to [1, 2]\nchange xs[1] to 9\nlog xs");
    assert_success(&out);
    let before = out.frames[0].variables.get("xs");
    let after = out.frames[1].variables.get("xs");
    assert_eq!(
        before,
        Some(&Snapshot::List(vec![Snapshot::Number(1.0), Snapshot::Number(2.0)]))
    );
    assert_eq!(
        after,
        Some(&Snapshot::List(vec![Snapshot::Number(9.0), Snapshot::Number(2.0)]))
    );
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_arithmetic_and_strings() {
    let out = run("log 1 + 2 * 3\nlog \"a\" + \"b\"\nlog 7 % 3\nlog 0.1 + 0.2");
    assert_success(&out);
    assert_eq!(output(&out), vec!["7", "ab", "1", "0.3"]);
}

#[test]
fn test_mixed_addition_is_refused() {
    let out = run("log 1 + \"a\"");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeErrorOperandsMustBeTwoNumbersOrTwoStrings);
}

#[test]
fn test_comparison_requires_numbers() {
    let out = run("log \"a\" < 2");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeErrorOperandMustBeNumericValue);
}

#[test]
fn test_condition_must_be_boolean() {
    let out = run("if 1 do\n  log 1\nend");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeErrorOperandMustBeBooleanValue);

    let loose = LanguageFeatures {
        allow_truthiness: true,
        ..LanguageFeatures::default()
    };
    let out = run_with("if 1 do\n  log \"yes\"\nend", &loose);
    assert_success(&out);
    assert_eq!(output(&out), vec!["yes"]);
}

#[test]
fn test_equality_and_logic() {
    let out = run("log 1 is 1\nlog not (1 equals 2)\nlog true and false\nlog false or true");
    assert_success(&out);
    assert_eq!(output(&out), vec!["true", "true", "false", "true"]);
}

// ─────────────────────────────────────────────────────────────────────
// Collections
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_lists_are_one_based() {
    let out = run("set xs to [10, 20, 30]\nlog xs[1]\nlog xs[3]");
    assert_success(&out);
    assert_eq!(output(&out), vec!["10", "30"]);

    let out = run("set xs to [10]\nlog xs[0]");
    assert_eq!(error_type(&out), RuntimeErrorType::RangeErrorArrayIndexIsZeroBased);

    let out = run("set xs to [10]\nlog xs[2]");
    assert_eq!(error_type(&out), RuntimeErrorType::IndexOutOfRangeForArrayAccess);

    let out = run("set xs to [10]\nchange xs[4] to 1");
    assert_eq!(error_type(&out), RuntimeErrorType::IndexOutOfRangeForArrayModification);
}

#[test]
fn test_dictionaries() {
    let out = run("set d to {\"a\": 1}\nchange d[\"b\"] to 2\nlog d[\"b\"]");
    assert_success(&out);
    assert_eq!(output(&out), vec!["2"]);

    let out = run("set d to {\"a\": 1}\nlog d[\"z\"]");
    assert_eq!(error_type(&out), RuntimeErrorType::MissingDictionaryKeyInAccess);
    let err = out.frames.last().and_then(|f| f.error.as_ref());
    assert_eq!(err.and_then(|e| e.context.get("key")), Some("z"));
}

#[test]
fn test_nested_change() {
    let out = run("set grid to [[1, 2], [3, 4]]\nchange grid[2][1] to 9\nlog grid[2][1]");
    assert_success(&out);
    assert_eq!(output(&out), vec!["9"]);
}

#[test]
fn test_indexing_a_number_is_refused() {
    let out = run("set n to 5\nlog n[1]");
    assert_eq!(error_type(&out), RuntimeErrorType::InvalidIndexGetterTargetNotIndexable);
    let out = run("set n to 5\nchange n[1] to 2");
    assert_eq!(error_type(&out), RuntimeErrorType::InvalidChangeTargetNotModifiable);
}

#[test]
fn test_list_equality_is_refused() {
    let out = run("log [1] is [1]");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeErrorCannotCompareListObjects);
}

// ─────────────────────────────────────────────────────────────────────
// Loops
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_repeat_with_index() {
    let out = run("repeat 3 times indexed by i do\n  log i\nend");
    assert_success(&out);
    assert_eq!(output(&out), vec!["1", "2", "3"]);
}

#[test]
fn test_repeat_zero_times_records_one_frame() {
    let out = run("repeat 0 times do\n  log 1\nend");
    assert_success(&out);
    assert_eq!(out.frames.len(), 1);
    assert!(out.log_lines.is_empty());
}

#[test]
fn test_runaway_string_growth_is_refused() {
    let out = run("set s to \"x\"\nrepeat 20 times do\n  change s to s + s\nend");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeError);
}

#[test]
fn test_repeat_count_errors() {
    let out = run("repeat \"x\" times do\n  log 1\nend");
    assert_eq!(error_type(&out), RuntimeErrorType::RangeErrorRepeatCountMustBeNumericValue);
    let out = run("repeat -1 times do\n  log 1\nend");
    assert_eq!(error_type(&out), RuntimeErrorType::RangeErrorRepeatCountMustBeNonNegative);

    let capped = LanguageFeatures {
        max_iterations: 5,
        ..LanguageFeatures::default()
    };
    let out = run_with("repeat 6 times do\n  log 1\nend", &capped);
    assert_eq!(error_type(&out), RuntimeErrorType::RangeErrorRepeatCountTooHighForExecution);
}

#[test]
fn test_repeat_forever_hits_iteration_cap() {
    let capped = LanguageFeatures {
        max_iterations: 10,
        ..LanguageFeatures::default()
    };
    let out = run_with("repeat_forever do\n  set x to 1\nend", &capped);
    assert_eq!(error_type(&out), RuntimeErrorType::StateErrorMaxIterationsReachedInLoop);
}

#[test]
fn test_repeat_forever_with_break() {
    let source = "set n to 0\nrepeat_forever do\n  change n to n + 1\n  if n is 3 do\n    break\n  end\nend\nlog n";
    let out = run(source);
    assert_success(&out);
    assert_eq!(output(&out), vec!["3"]);
}

#[test]
fn test_for_each_over_list_string_and_dictionary() {
    let out = run("for each x in [1, 2] indexed by i do\n  log x + i\nend");
    assert_success(&out);
    assert_eq!(output(&out), vec!["2", "4"]);

    let out = run("for each c in \"ab\" do\n  log c\nend");
    assert_eq!(output(&out), vec!["a", "b"]);

    let out = run("for each key, value in {\"a\": 1, \"b\": 2} do\n  log key\n  log value\nend");
    assert_success(&out);
    assert_eq!(output(&out), vec!["a", "1", "b", "2"]);
}

#[test]
fn test_for_each_skips_continue() {
    let out = run("for each x in [1, 2, 3] do\n  if x is 2 do\n    next\n  end\n  log x\nend");
    assert_success(&out);
    assert_eq!(output(&out), vec!["1", "3"]);
}

#[test]
fn test_for_each_over_number_is_refused() {
    let out = run("for each x in 5 do\n  log x\nend");
    assert_eq!(error_type(&out), RuntimeErrorType::ForeachLoopTargetNotIterable);
}

#[test]
fn test_loop_variables_do_not_leak() {
    let out = run("repeat 1 times indexed by i do\n  set y to i\nend\nlog y");
    assert_eq!(error_type(&out), RuntimeErrorType::VariableNotDeclared);
}

// ─────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_function_call_and_return() {
    let out = run("function add with a, b do\n  return a + b\nend\nlog add(2, 3)");
    assert_success(&out);
    assert_eq!(output(&out), vec!["5"]);
}

#[test]
fn test_recursion() {
    let source = "function fact with n do\n  if n is 0 do\n    return 1\n  end\n  return n * fact(n - 1)\nend\nlog fact(5)";
    let out = run(source);
    assert_success(&out);
    assert_eq!(output(&out), vec!["120"]);
}

#[test]
fn test_lists_are_passed_by_value() {
    let source = "function poke with xs do\n  change xs[1] to 0\n  return xs\nend\nset a to [1, 2]\nset b to poke(a)\nlog a[1]\nlog b[1]";
    let out = run(source);
    assert_success(&out);
    assert_eq!(output(&out), vec!["1", "0"]);
}

#[test]
fn test_argument_count_errors() {
    let out = run("function f with a do\n  return a\nend\nlog f()");
    assert_eq!(error_type(&out), RuntimeErrorType::RangeErrorTooFewArgumentsForFunctionCall);
    let out = run("function f with a do\n  return a\nend\nlog f(1, 2)");
    assert_eq!(error_type(&out), RuntimeErrorType::RangeErrorTooManyArgumentsForFunctionCall);
}

#[test]
fn test_unknown_and_uncalled_functions() {
    let out = run("nope()");
    assert_eq!(error_type(&out), RuntimeErrorType::FunctionNotFoundInScope);

    let out = run("function f do\n  return 1\nend\nlog f");
    assert_eq!(error_type(&out), RuntimeErrorType::UnexpectedUncalledFunctionInExpression);

    let out = run("set x to 1\nx()");
    assert_eq!(error_type(&out), RuntimeErrorType::NonCallableTargetInvocationAttempt);
}

#[test]
fn test_duplicate_function_declaration() {
    let out = run("function f do\n  return 1\nend\nfunction f do\n  return 2\nend");
    assert_eq!(error_type(&out), RuntimeErrorType::DuplicateFunctionDeclarationInScope);
}

#[test]
fn test_storing_nothing_from_a_function() {
    let out = run("function f do\n  log 1\nend\nset x to f()");
    assert_eq!(error_type(&out), RuntimeErrorType::StateErrorCannotStoreNullValueFromFunction);
}

#[test]
fn test_infinite_recursion_is_caught() {
    let shallow = LanguageFeatures {
        max_call_depth: 20,
        ..LanguageFeatures::default()
    };
    let out = run_with("function f do\n  return f()\nend\nf()", &shallow);
    assert_eq!(error_type(&out), RuntimeErrorType::StateErrorInfiniteRecursionDetectedInFunction);
}

#[test]
fn test_return_outside_function() {
    let out = run("return 1");
    assert_eq!(error_type(&out), RuntimeErrorType::UnexpectedReturnStatementOutsideOfFunction);
}

#[test]
fn test_library_functions_respect_allow_list() {
    let out = run("log to_upper_case(\"hi\")\nlog length([1, 2, 3])");
    assert_success(&out);
    assert_eq!(output(&out), vec!["HI", "3"]);

    let restricted = LanguageFeatures {
        allowed_stdlib_functions: Some(vec!["length".to_string()]),
        ..LanguageFeatures::default()
    };
    let out = run_with("log to_upper_case(\"hi\")", &restricted);
    assert_eq!(error_type(&out), RuntimeErrorType::FunctionNotFoundInScope);
}

#[test]
fn test_push_returns_a_new_list() {
    let out = run("set xs to [1]\nset ys to push(xs, 2)\nlog length(xs)\nlog length(ys)");
    assert_success(&out);
    assert_eq!(output(&out), vec!["1", "2"]);
}

// ─────────────────────────────────────────────────────────────────────
// Function evaluation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_call_function_returns_value() {
    let source = "function double with n do\n  return n * 2\nend";
    let features = LanguageFeatures::default();
    let program = match parse_source(source, &features) {
        Ok(program) => program,
        Err(e) => panic!("unexpected syntax error: {e}"),
    };
    let options = EvalOptions::new(&features);
    let out = jikiscript::call_function(&program, source, &options, "double", &[Snapshot::Number(21.0)]);
    assert!(out.error.is_none(), "unexpected error: {:?}", out.error);
    assert_eq!(out.value, Some(Snapshot::Number(42.0)));

    let out = jikiscript::call_function(&program, source, &options, "missing", &[]);
    assert_eq!(
        out.error.map(|e| e.error_type),
        Some(RuntimeErrorType::FunctionNotFoundInScope)
    );
}

#[test]
fn test_runs_are_deterministic() {
    let source = "set total to 0\nfor each x in [1, 2, 3] do\n  change total to total + x\nend\nlog total";
    let first = run(source);
    for _ in 0..100 {
        assert_eq!(run(source), first);
    }
}
