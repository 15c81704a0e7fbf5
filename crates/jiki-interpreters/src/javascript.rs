//! JavaScript entry points.

use crate::context::EvaluationContext;
use crate::pipeline::Frontend;
use jiki_types::ast::javascript::Stmt;
use jiki_types::{CompilationResult, ExecutionResult, FunctionEvaluation, Snapshot};

const FRONTEND: Frontend<Stmt> = Frontend {
    name: "javascript",
    parse: jiki_parser::javascript::parse_source,
    run: jiki_eval::javascript::run,
    call: jiki_eval::javascript::call_function,
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
