//! JikiScript entry points.

use crate::context::EvaluationContext;
use crate::pipeline::Frontend;
use jiki_types::ast::jikiscript::Stmt;
use jiki_types::{CompilationResult, ExecutionResult, FunctionEvaluation, Snapshot};

const FRONTEND: Frontend<Stmt> = Frontend {
    name: "jikiscript",
    parse: jiki_parser::jikiscript::parse_source,
    run: jiki_eval::jikiscript::run,
    call: jiki_eval::jikiscript::call_function,
};

/// Parse and run `source`, recording a frame per step.
///
/// A syntax error yields no frames; a runtime error ends the run with an
/// `ERROR` frame.
pub fn interpret(source: &str, context: &EvaluationContext) -> ExecutionResult {
    FRONTEND.interpret(source, context)
}

/// Parse `source` without running it.
pub fn compile(source: &str, context: &EvaluationContext) -> CompilationResult {
    FRONTEND.compile(source, context)
}

/// Run `source`'s declarations, then call `name` with `args`.
pub fn evaluate_function(
    source: &str,
    context: &EvaluationContext,
    name: &str,
    args: &[Snapshot],
) -> FunctionEvaluation {
    FRONTEND.evaluate_function(source, context, name, args)
}
