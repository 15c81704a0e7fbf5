//! Python evaluator tests: assignment frames, Python's operator and
//! indexing rules, builtins and methods, and the shared guards.

use jiki_eval::{python, EvalOptions, RunOutput};
use jiki_parser::python::parse_source;
use jiki_types::{Language, LanguageFeatures, RuntimeErrorType, Snapshot, Translator};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn run_with(source: &str, features: &LanguageFeatures) -> RunOutput {
    let program = match parse_source(source, features) {
        Ok(program) => program,
        Err(e) => panic!("unexpected syntax error: {e}"),
    };
    let options = EvalOptions::new(features).with_translator(Translator::new(Language::System));
    python::run(&program, source, &options)
}

fn run(source: &str) -> RunOutput {
    run_with(source, &LanguageFeatures::default())
}

fn output(out: &RunOutput) -> Vec<&str> {
    out.log_lines.iter().map(|l| l.output.as_str()).collect()
}

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
// Assignment and frames
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment_frames() {
    let out = run("x = 1\nx += 2\nprint(x)\n");
    assert_success(&out);
    assert_eq!(out.frames.len(), 3);
    assert_eq!(out.frames[0].variables.get("x"), Some(&Snapshot::Number(1.0)));
    assert_eq!(out.frames[1].variables.get("x"), Some(&Snapshot::Number(3.0)));
    assert_eq!(output(&out), vec!["3"]);
}

#[test]
fn test_print_uses_python_spelling() {
    let out = run("print(True, None, [1, \"a\"])\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["True None [1, \"a\"]"]);
}

#[test]
fn test_undefined_name() {
    let out = run("print(missing)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::UndefinedVariable);
    let err = out.frames.last().and_then(|f| f.error.as_ref());
    assert_eq!(err.and_then(|e| e.context.get("name")), Some("missing"));
}

#[test]
fn test_pass_records_a_frame() {
    let out = run("pass\n");
    assert_success(&out);
    assert_eq!(out.frames.len(), 1);
}

#[test]
fn test_f_strings() {
    let out = run("n = 3\nprint(f\"{n} items\")\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["3 items"]);
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_division_and_modulo() {
    let out = run("print(10 // 3)\nprint(-7 % 3)\nprint(7 / 2)\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["3", "2", "3.5"]);
}

#[test]
fn test_division_by_zero() {
    let out = run("print(1 / 0)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::ZeroDivisionError);
}

#[test]
fn test_sequence_operators() {
    let out = run("print(\"ab\" * 2)\nprint([1] + [2])\nprint(2 in [1, 2])\nprint(\"z\" not in \"abc\")\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["abab", "[1, 2]", "True", "True"]);
}

#[test]
fn test_huge_repetition_is_refused() {
    let out = run("s = 'ab' * 100000000000\n");
    assert_eq!(error_type(&out), RuntimeErrorType::ValueError);

    let out = run("xs = [1] * 100000000000\n");
    assert_eq!(error_type(&out), RuntimeErrorType::ValueError);

    let out = run("xs = 100000000000 * [1]\n");
    assert_eq!(error_type(&out), RuntimeErrorType::ValueError);

    let out = run("s = 'x'\nwhile True:\n    s = s + s\n");
    assert_eq!(error_type(&out), RuntimeErrorType::ValueError);

    let out = run("print(len([] * 100000000000))\nprint(len('' * 100000000000))\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["0", "0"]);
}

#[test]
fn test_mixed_arithmetic_is_refused() {
    let out = run("print(\"a\" + 1)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeCoercionNotAllowed);

    let loose = LanguageFeatures {
        allow_type_coercion: true,
        ..LanguageFeatures::default()
    };
    let out = run_with("print(True + 1)\n", &loose);
    assert_success(&out);
    assert_eq!(output(&out), vec!["2"]);
}

#[test]
fn test_truthiness_guard() {
    let out = run("if 1:\n    print(1)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::TruthinessDisabled);

    let loose = LanguageFeatures {
        allow_truthiness: true,
        ..LanguageFeatures::default()
    };
    let out = run_with("if []:\n    print(1)\nelse:\n    print(2)\n", &loose);
    assert_success(&out);
    assert_eq!(output(&out), vec!["2"]);
}

#[test]
fn test_ordering_requires_compatible_types() {
    let out = run("print(\"a\" < \"b\")\nprint(1 < 2)\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["True", "True"]);
    let out = run("print(\"a\" < 1)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeError);
}

// ─────────────────────────────────────────────────────────────────────
// Collections
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_negative_indexes() {
    let out = run("xs = [1, 2, 3]\nprint(xs[-1])\nxs[-1] = 9\nprint(xs)\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["3", "[1, 2, 9]"]);
}

#[test]
fn test_index_and_key_errors() {
    let out = run("xs = [1]\nprint(xs[5])\n");
    assert_eq!(error_type(&out), RuntimeErrorType::IndexError);
    let out = run("d = {\"a\": 1}\nprint(d[\"z\"])\n");
    assert_eq!(error_type(&out), RuntimeErrorType::KeyError);
    let out = run("d = {\"a\": 1}\nd.pop(\"z\")\n");
    assert_eq!(error_type(&out), RuntimeErrorType::KeyError);
}

#[test]
fn test_list_and_dict_methods() {
    let out = run("xs = []\nxs.append(1)\nxs.append(2)\nprint(len(xs))\nd = {\"a\": 1}\nd[\"b\"] = 2\nprint(d.get(\"b\"))\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["2", "2"]);
}

#[test]
fn test_string_methods() {
    let out = run("s = \"  Hi  \"\nprint(s.strip().upper())\nprint(\",\".join([\"a\", \"b\"]))\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["HI", "a,b"]);
}

#[test]
fn test_unknown_attribute() {
    let out = run("\"abc\".nope()\n");
    assert_eq!(error_type(&out), RuntimeErrorType::AttributeError);
}

#[test]
fn test_stub_method() {
    let out = run("\"{}\".format(1)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::MethodNotYetImplemented);
}

// ─────────────────────────────────────────────────────────────────────
// Loops
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_for_over_range_and_collections() {
    let out = run("for i in range(3):\n    print(i)\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["0", "1", "2"]);

    let out = run("for c in \"ab\":\n    print(c)\n");
    assert_eq!(output(&out), vec!["a", "b"]);

    let out = run("for k in {\"x\": 1, \"y\": 2}:\n    print(k)\n");
    assert_eq!(output(&out), vec!["x", "y"]);

    let out = run("for x in 5:\n    print(x)\n");
    assert_eq!(error_type(&out), RuntimeErrorType::TypeError);
}

#[test]
fn test_while_with_break_and_continue() {
    let source = "i = 0\nwhile i < 5:\n    i += 1\n    if i == 2:\n        continue\n    if i == 4:\n        break\n    print(i)\n";
    let out = run(source);
    assert_success(&out);
    assert_eq!(output(&out), vec!["1", "3"]);
}

#[test]
fn test_iteration_guard() {
    let capped = LanguageFeatures {
        max_iterations: 10,
        ..LanguageFeatures::default()
    };
    let out = run_with("while True:\n    pass\n", &capped);
    assert_eq!(error_type(&out), RuntimeErrorType::MaxIterationsReached);
}

// ─────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_functions() {
    let source = "def total(xs):\n    t = 0\n    for x in xs:\n        t += x\n    return t\nprint(total([1, 2, 3]))\n";
    let out = run(source);
    assert_success(&out);
    assert_eq!(output(&out), vec!["6"]);
}

#[test]
fn test_function_without_return_gives_none() {
    let out = run("def f():\n    pass\nprint(f())\n");
    assert_success(&out);
    assert_eq!(output(&out), vec!["None"]);
}

#[test]
fn test_argument_count() {
    let out = run("def f(a):\n    return a\nf()\n");
    assert_eq!(error_type(&out), RuntimeErrorType::InvalidNumberOfArguments);
    let out = run("print(len())\n");
    assert_eq!(error_type(&out), RuntimeErrorType::InvalidNumberOfArguments);
}

#[test]
fn test_shadowing_guard() {
    let out = run("x = 1\ndef f():\n    x = 2\nf()\n");
    assert_eq!(error_type(&out), RuntimeErrorType::ShadowingDisabled);
}

#[test]
fn test_recursion_limit() {
    let shallow = LanguageFeatures {
        max_call_depth: 10,
        ..LanguageFeatures::default()
    };
    let out = run_with("def f(n):\n    return f(n + 1)\nf(0)\n", &shallow);
    assert_eq!(error_type(&out), RuntimeErrorType::MaxCallDepthExceeded);
}

#[test]
fn test_allowed_globals_hide_builtins() {
    let restricted = LanguageFeatures {
        allowed_globals: Some(vec!["print".to_string()]),
        ..LanguageFeatures::default()
    };
    let out = run_with("print(len([1]))\n", &restricted);
    assert_eq!(error_type(&out), RuntimeErrorType::VariableNotDeclared);
}

#[test]
fn test_call_function() {
    let source = "def double(n):\n    return n * 2\n";
    let features = LanguageFeatures::default();
    let program = match parse_source(source, &features) {
        Ok(program) => program,
        Err(e) => panic!("unexpected syntax error: {e}"),
    };
    let options = EvalOptions::new(&features);
    let out = python::call_function(&program, source, &options, "double", &[Snapshot::Number(4.0)]);
    assert!(out.error.is_none(), "unexpected error: {:?}", out.error);
    assert_eq!(out.value, Some(Snapshot::Number(8.0)));
}

#[test]
fn test_runs_are_deterministic() {
    let source = "xs = [3, 1, 2]\nxs.sort()\nfor x in xs:\n    print(x)\n";
    let first = run(source);
    assert_success(&first);
    for _ in 0..100 {
        assert_eq!(run(source), first);
    }
}
