//! Source → parse → evaluate, shared by the three language modules.

use crate::context::EvaluationContext;
use jiki_eval::{CallOutput, EvalOptions, RunOutput};
use jiki_types::{
    CompilationResult, ExecutionResult, FunctionEvaluation, LanguageFeatures, Snapshot,
    SyntaxError,
};
use tracing::{debug, debug_span};

/// The pieces of one language's pipeline.
pub(crate) struct Frontend<S> {
    pub name: &'static str,
    pub parse: fn(&str, &LanguageFeatures) -> Result<Vec<S>, SyntaxError>,
    pub run: fn(&[S], &str, &EvalOptions<'_>) -> RunOutput,
    pub call: fn(&[S], &str, &EvalOptions<'_>, &str, &[Snapshot]) -> CallOutput,
}

impl<S> Frontend<S> {
    fn parse(&self, source: &str, context: &EvaluationContext) -> Result<Vec<S>, SyntaxError> {
        (self.parse)(source, &context.language_features).map_err(|err| {
            debug!(
                target: "jiki::interpreters",
                language = self.name,
                error = err.error_type.as_str(),
                "syntax error"
            );
            err.localize(&context.translator())
        })
    }

    pub fn interpret(&self, source: &str, context: &EvaluationContext) -> ExecutionResult {
        let _span = debug_span!(target: "jiki::interpreters", "interpret", language = self.name).entered();
        let program = match self.parse(source, context) {
            Ok(program) => program,
            Err(err) => return ExecutionResult::from_syntax_error(err),
        };
        let options = options(context);
        let RunOutput { frames, log_lines } = (self.run)(&program, source, &options);
        let result = ExecutionResult::from_frames(frames, log_lines);
        debug!(
            target: "jiki::interpreters",
            frames = result.frames.len(),
            success = result.success,
            "interpret done"
        );
        result
    }

    pub fn compile(&self, source: &str, context: &EvaluationContext) -> CompilationResult {
        match self.parse(source, context) {
            Ok(_) => CompilationResult {
                success: true,
                error: None,
            },
            Err(err) => CompilationResult {
                success: false,
                error: Some(err),
            },
        }
    }

    pub fn evaluate_function(
        &self,
        source: &str,
        context: &EvaluationContext,
        name: &str,
        args: &[Snapshot],
    ) -> FunctionEvaluation {
        let _span = debug_span!(
            target: "jiki::interpreters",
            "evaluate_function",
            language = self.name,
            function = name
        )
        .entered();
        let program = match self.parse(source, context) {
            Ok(program) => program,
            Err(err) => {
                return FunctionEvaluation {
                    value: None,
                    frames: Vec::new(),
                    log_lines: Vec::new(),
                    success: false,
                    error: Some(err.into()),
                }
            }
        };
        let options = options(context);
        let out = (self.call)(&program, source, &options, name, args);
        debug!(
            target: "jiki::interpreters",
            frames = out.frames.len(),
            success = out.error.is_none(),
            "function evaluated"
        );
        FunctionEvaluation {
            value: out.value,
            frames: out.frames,
            log_lines: out.log_lines,
            success: out.error.is_none(),
            error: out.error.map(Into::into),
        }
    }
}

fn options(context: &EvaluationContext) -> EvalOptions<'_> {
    EvalOptions::new(&context.language_features)
        .with_externals(&context.external_functions)
        .with_translator(context.translator())
}
