//! Footgun guards seen from the public entry points: each guard fires by
//! default and steps aside when its feature flag is switched on.

use jiki_interpreters::{
    javascript, jikiscript, python, EvaluationContext, ExecutionResult, FrameStatus,
    LanguageFeatures, RuntimeErrorType, Snapshot, SyntaxErrorType,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn js(source: &str) -> ExecutionResult {
    javascript::interpret(source, &EvaluationContext::default())
}

fn js_with(source: &str, features: LanguageFeatures) -> ExecutionResult {
    javascript::interpret(source, &EvaluationContext::new(features))
}

fn runtime_error(result: &ExecutionResult) -> RuntimeErrorType {
    match result.runtime_error() {
        Some(err) => err.error_type,
        None => panic!("expected a runtime error, got {:?}", result.frames),
    }
}

/// Run `f` on a thread with a 2 MiB stack, the usual size for spawned
/// threads.
fn on_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap_or_else(|e| panic!("could not spawn: {e}"));
    handle.join().unwrap_or_else(|_| panic!("thread panicked"))
}

fn assert_success(result: &ExecutionResult) {
    assert!(result.error.is_none(), "unexpected syntax error: {:?}", result.error);
    if let Some(err) = result.runtime_error() {
        panic!("unexpected runtime error: {err}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Guards
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_boolean_addition() {
    let result = js("true + true");
    assert_eq!(result.frames.len(), 1);
    assert_eq!(result.frames[0].status, FrameStatus::Error);
    assert_eq!(runtime_error(&result), RuntimeErrorType::TypeCoercionNotAllowed);

    let result = js_with(
        "true + true",
        LanguageFeatures {
            allow_type_coercion: true,
            ..LanguageFeatures::default()
        },
    );
    assert_success(&result);
    assert_eq!(result.frames[0].status, FrameStatus::Success);
    assert_eq!(result.frames[0].value(), Some(&Snapshot::Number(2.0)));
}

#[test]
fn test_float_results_are_rounded() {
    let result = js("0.1 + 0.2");
    assert_success(&result);
    assert_eq!(result.frames[0].value(), Some(&Snapshot::Number(0.3)));
}

#[test]
fn test_infinite_loop_is_stopped() {
    let result = js("while (true) { let x = 1 }");
    assert_eq!(runtime_error(&result), RuntimeErrorType::MaxIterationsReached);
    assert!(result.frames.iter().rev().skip(1).all(|f| f.status == FrameStatus::Success));
}

#[test]
fn test_push_arity_and_native_mode() {
    let result = js("let arr = [1]\narr.push()");
    assert_eq!(runtime_error(&result), RuntimeErrorType::InvalidNumberOfArguments);

    let result = js_with(
        "let arr = [1]\narr.push()",
        LanguageFeatures {
            native_js_mode: true,
            ..LanguageFeatures::default()
        },
    );
    assert_success(&result);
    assert_eq!(result.frames.last().and_then(|f| f.value()), Some(&Snapshot::Number(1.0)));
}

#[test]
fn test_shadowing() {
    let source = "let x = 5\n{\n  let x = 10\n}";
    let result = js(source);
    assert_eq!(runtime_error(&result), RuntimeErrorType::ShadowingDisabled);
    assert_eq!(result.frames.len(), 2);

    let result = js_with(
        source,
        LanguageFeatures {
            allow_shadowing: true,
            ..LanguageFeatures::default()
        },
    );
    assert_success(&result);
    assert_eq!(result.frames.len(), 2);
    assert_eq!(result.frames[1].variables.get("x"), Some(&Snapshot::Number(10.0)));

    let result = js_with(
        "let x = 5\n{\n  let x = 10\n}\nconsole.log(x)",
        LanguageFeatures {
            allow_shadowing: true,
            ..LanguageFeatures::default()
        },
    );
    assert_eq!(result.log_lines[0].output, "5");
}

#[test]
fn test_unbounded_recursion() {
    let result = on_small_stack(|| js("function down(n) {\n  return down(n + 1)\n}\ndown(0)"));
    assert_eq!(runtime_error(&result), RuntimeErrorType::MaxCallDepthExceeded);

    let result = on_small_stack(|| {
        python::interpret(
            "def down(n):\n    return down(n + 1)\ndown(0)\n",
            &EvaluationContext::default(),
        )
    });
    assert_eq!(runtime_error(&result), RuntimeErrorType::MaxCallDepthExceeded);

    let result = on_small_stack(|| {
        jikiscript::interpret(
            "function down with n do\n  return down(n + 1)\nend\ndown(0)",
            &EvaluationContext::default(),
        )
    });
    assert_eq!(
        runtime_error(&result),
        RuntimeErrorType::StateErrorInfiniteRecursionDetectedInFunction
    );
}

#[test]
fn test_recursion_just_under_the_limit() {
    let depth = LanguageFeatures::default().max_call_depth - 5;
    let source = format!(
        "function count(n) {{\n  if (n === 0) {{\n    return 0\n  }}\n  return 1 + count(n - 1)\n}}\nconsole.log(count({depth}))"
    );
    let result = on_small_stack(move || js(&source));
    assert_success(&result);
    assert_eq!(result.log_lines[0].output, depth.to_string());
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let result = on_small_stack(|| {
        let source = format!("let x = {}1{}", "(".repeat(5000), ")".repeat(5000));
        js(&source)
    });
    assert!(result.frames.is_empty());
    assert_eq!(result.error.map(|e| e.error_type), Some(SyntaxErrorType::NestingTooDeep));

    let result = on_small_stack(|| {
        let source = format!("x = {}1{}\n", "(".repeat(5000), ")".repeat(5000));
        python::interpret(&source, &EvaluationContext::default())
    });
    assert_eq!(result.error.map(|e| e.error_type), Some(SyntaxErrorType::NestingTooDeep));

    let result = on_small_stack(|| {
        let source = format!("set x to {}1\n", "-".repeat(5000));
        jikiscript::interpret(&source, &EvaluationContext::default())
    });
    assert_eq!(result.error.map(|e| e.error_type), Some(SyntaxErrorType::NestingTooDeep));

    let result = js("let x = ((((1))))");
    assert_success(&result);
}

#[test]
fn test_strict_equality() {
    let result = js("1 == 1");
    assert_eq!(runtime_error(&result), RuntimeErrorType::StrictEqualityRequired);
    let result = js_with(
        "1 == 1",
        LanguageFeatures {
            enforce_strict_equality: false,
            ..LanguageFeatures::default()
        },
    );
    assert_success(&result);
}

#[test]
fn test_truthiness() {
    let result = js("let n = 0\nif (n) {\n  n = 1\n}");
    assert_eq!(runtime_error(&result), RuntimeErrorType::TruthinessDisabled);
}

// ══════════════════════════════════════════════════════════════════════════════
// Frame properties
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_error_frame_is_always_last() {
    let result = js("let a = 1\nlet b = a + \"x\"\nlet c = 2");
    let k = result
        .frames
        .iter()
        .position(|f| f.status == FrameStatus::Error)
        .unwrap_or_else(|| panic!("no error frame"));
    assert_eq!(result.frames.len(), k + 1);
    assert!(result.frames[..k].iter().all(|f| f.status == FrameStatus::Success));
}

#[test]
fn test_snapshots_do_not_change_later() {
    let result = js("let xs = [1]\nxs.push(2)\nxs[0] = 9");
    assert_success(&result);
    let list = |values: &[f64]| Snapshot::List(values.iter().map(|n| Snapshot::Number(*n)).collect());
    assert_eq!(result.frames[0].variables.get("xs"), Some(&list(&[1.0])));
    assert_eq!(result.frames[1].variables.get("xs"), Some(&list(&[1.0, 2.0])));
    assert_eq!(result.frames[2].variables.get("xs"), Some(&list(&[9.0, 2.0])));
}
