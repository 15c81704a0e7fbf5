//! End-to-end pipeline tests: source → parse → evaluate → frames, for all
//! three languages, plus the JSON shape hosts consume.

use jiki_interpreters::{
    javascript, jikiscript, python, Arity, EvaluationContext, ExecutionResult, ExternalFunction,
    FrameStatus, JikiObject, Language, LanguageFeatures, LogicError, RuntimeErrorType, Snapshot,
    SyntaxErrorType, Translator,
};

// ══════════════════════════════════════════════════════════════════════════════
// Sample programs
// ══════════════════════════════════════════════════════════════════════════════

const JIKISCRIPT_SCORES: &str = r#"function total with scores do
  set sum to 0
  for each score in scores do
    change sum to sum + score
  end
  return sum
end

set scores to [3, 4, 5]
log total(scores)
"#;

const JAVASCRIPT_SCORES: &str = r#"function total(scores) {
  let sum = 0
  for (const score of scores) {
    sum += score
  }
  return sum
}

let scores = [3, 4, 5]
console.log(total(scores))
"#;

const PYTHON_SCORES: &str = r#"def total(scores):
    result = 0
    for score in scores:
        result += score
    return result

scores = [3, 4, 5]
print(total(scores))
"#;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn system_context() -> EvaluationContext {
    EvaluationContext::default().with_translator(Translator::new(Language::System))
}

fn output(result: &ExecutionResult) -> Vec<&str> {
    result.log_lines.iter().map(|l| l.output.as_str()).collect()
}

fn assert_success(result: &ExecutionResult) {
    assert!(result.error.is_none(), "unexpected syntax error: {:?}", result.error);
    if let Some(err) = result.runtime_error() {
        panic!("unexpected runtime error: {err}");
    }
    assert!(result.success);
}

// ══════════════════════════════════════════════════════════════════════════════
// interpret
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_program_in_every_language() {
    let context = EvaluationContext::default();
    for result in [
        jikiscript::interpret(JIKISCRIPT_SCORES, &context),
        javascript::interpret(JAVASCRIPT_SCORES, &context),
        python::interpret(PYTHON_SCORES, &context),
    ] {
        assert_success(&result);
        assert_eq!(output(&result), vec!["12"]);
        assert!(!result.frames.is_empty());
    }
}

#[test]
fn test_frames_are_numbered_in_order() {
    let result = javascript::interpret(JAVASCRIPT_SCORES, &EvaluationContext::default());
    for (i, frame) in result.frames.iter().enumerate() {
        assert_eq!(frame.index, i);
        assert_eq!(frame.time, i as u64);
        assert_eq!(frame.status, FrameStatus::Success);
    }
}

#[test]
fn test_syntax_error_has_no_frames() {
    let cases = [
        jikiscript::interpret("set x", &EvaluationContext::default()),
        javascript::interpret("let = 5", &EvaluationContext::default()),
        python::interpret("def (:\n", &EvaluationContext::default()),
    ];
    for result in cases {
        assert!(result.error.is_some());
        assert!(result.frames.is_empty());
        assert!(!result.success);
    }
}

#[test]
fn test_excluded_and_unimplemented_tokens() {
    let context = EvaluationContext::default();
    let result = javascript::interpret("var x = 1", &context);
    assert_eq!(
        result.error.map(|e| e.error_type),
        Some(SyntaxErrorType::PermanentlyExcludedToken)
    );
    let result = javascript::interpret("switch (x) {}", &context);
    assert_eq!(
        result.error.map(|e| e.error_type),
        Some(SyntaxErrorType::UnimplementedToken)
    );
}

#[test]
fn test_allowed_nodes() {
    let context = EvaluationContext::new(LanguageFeatures {
        allowed_nodes: Some(vec!["VariableDeclaration".to_string()]),
        ..LanguageFeatures::default()
    });
    let result = javascript::interpret("while (true) {}", &context);
    assert_eq!(result.error.map(|e| e.error_type), Some(SyntaxErrorType::NodeNotAllowed));
}

#[test]
fn test_runtime_error_keeps_earlier_frames() {
    let result = javascript::interpret("let a = 1\nlet b = 2\nlet c = a + true\nlet d = 4", &EvaluationContext::default());
    assert!(result.error.is_none());
    assert!(!result.success);
    assert_eq!(result.frames.len(), 3);
    assert!(result.frames[..2].iter().all(|f| f.status == FrameStatus::Success));
    assert_eq!(result.frames[2].status, FrameStatus::Error);
    assert_eq!(
        result.runtime_error().map(|e| e.error_type),
        Some(RuntimeErrorType::TypeCoercionNotAllowed)
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// compile
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compile_only_parses() {
    let context = EvaluationContext::default();
    let ok = javascript::compile("let x = 1 + true", &context);
    assert!(ok.success);
    assert!(ok.error.is_none());

    let bad = python::compile("if x\n", &context);
    assert!(!bad.success);
    assert!(bad.error.is_some());

    assert!(jikiscript::compile(JIKISCRIPT_SCORES, &context).success);
}

// ══════════════════════════════════════════════════════════════════════════════
// evaluate_function
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_evaluate_function_in_every_language() {
    let context = EvaluationContext::default();
    let args = [Snapshot::List(vec![Snapshot::Number(1.0), Snapshot::Number(2.0)])];
    for evaluation in [
        jikiscript::evaluate_function(JIKISCRIPT_SCORES, &context, "total", &args),
        javascript::evaluate_function(JAVASCRIPT_SCORES, &context, "total", &args),
        python::evaluate_function(PYTHON_SCORES, &context, "total", &args),
    ] {
        assert!(evaluation.success, "unexpected error: {:?}", evaluation.error);
        assert_eq!(evaluation.value, Some(Snapshot::Number(3.0)));
        assert!(!evaluation.frames.is_empty());
        assert!(evaluation.log_lines.is_empty());
    }
}

#[test]
fn test_evaluate_function_reports_errors() {
    let context = EvaluationContext::default();
    let missing = javascript::evaluate_function(JAVASCRIPT_SCORES, &context, "nope", &[]);
    assert!(!missing.success);
    assert!(missing.value.is_none());
    assert!(missing.error.is_some());

    let syntax = python::evaluate_function("def f(:\n", &context, "f", &[]);
    assert!(!syntax.success);
    assert!(syntax.frames.is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// External functions
// ══════════════════════════════════════════════════════════════════════════════

fn move_forward() -> ExternalFunction {
    ExternalFunction::new("move", Arity::Exact(1), |ctx, args| match args.first() {
        Some(JikiObject::Number(n)) if *n > 0.0 => {
            ctx.log(format!("moved {n}"));
            Ok(JikiObject::Number(*n))
        }
        _ => Err(LogicError::new("You can only move forwards")),
    })
}

#[test]
fn test_external_functions() {
    let context = EvaluationContext::default().with_external(move_forward());
    let result = jikiscript::interpret("move(2)", &context);
    assert_success(&result);
    assert_eq!(output(&result), vec!["moved 2"]);

    let result = javascript::interpret("move(-1)", &context);
    assert_eq!(
        result.runtime_error().map(|e| e.error_type),
        Some(RuntimeErrorType::LogicErrorInExecution)
    );
    let message = result.runtime_error().map(|e| e.message.clone());
    assert!(message.is_some_and(|m| m.contains("You can only move forwards")));

    let result = python::interpret("move(1, 2)\n", &context);
    assert_eq!(
        result.runtime_error().map(|e| e.error_type),
        Some(RuntimeErrorType::InvalidNumberOfArguments)
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Translation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_system_messages() {
    let result = javascript::interpret("let x = y", &system_context());
    let err = result.runtime_error().map(|e| e.message.clone());
    assert_eq!(err.as_deref(), Some("VariableNotDeclared: name: y"));
}

#[test]
fn test_per_call_translator() {
    let english = javascript::interpret("let x = y", &EvaluationContext::default().with_translator(Translator::new(Language::En)));
    let dutch = javascript::interpret("let x = y", &EvaluationContext::default().with_translator(Translator::new(Language::Nl)));
    let en = english.runtime_error().map(|e| e.message.clone());
    let nl = dutch.runtime_error().map(|e| e.message.clone());
    assert!(en.is_some() && nl.is_some());
    assert_ne!(en, nl);
}

// ══════════════════════════════════════════════════════════════════════════════
// Serialization contract
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_execution_result_json_shape() {
    let result = javascript::interpret("let x = 0.1 + 0.2\nlet y = x + true", &system_context());
    let json = serde_json::to_value(&result).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(json["success"], false);
    assert!(json["error"].is_null());
    assert!(json["logLines"].is_array());
    let first = &json["frames"][0];
    assert_eq!(first["status"], "SUCCESS");
    assert_eq!(first["line"], 1);
    assert_eq!(first["code"], "let x = 0.1 + 0.2");
    assert_eq!(first["result"]["jikiObject"], 0.3);
    assert_eq!(first["variables"]["x"], 0.3);
    assert!(first["location"]["startLine"].is_number());
    let failed = &json["frames"][1];
    assert_eq!(failed["status"], "ERROR");
    assert_eq!(failed["error"]["type"], "TypeCoercionNotAllowed");
    assert_eq!(failed["error"]["context"]["operator"], "+");
}

#[test]
fn test_syntax_error_json_shape() {
    let result = javascript::interpret("var x = 1", &system_context());
    let json = serde_json::to_value(&result).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(json["frames"], serde_json::json!([]));
    assert_eq!(json["error"]["type"], "PermanentlyExcludedToken");
    assert!(json["error"]["location"].is_object());
}
