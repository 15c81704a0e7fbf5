//! Plumbing shared by the three evaluators: run options, outputs and the
//! native-call path every stdlib, builtin and external call goes through.

use crate::error::{EvalResult, StdlibError};
use crate::external::{CallContext, ExternalFunction};
use crate::recorder::Recorder;
use crate::stdlib::Method;
use crate::value::{Dialect, JikiObject};
use jiki_types::{
    Frame, LanguageFeatures, LogLine, RuntimeError, RuntimeErrorType, Snapshot, Span, Translator,
};

/// Everything one evaluation needs besides the program itself.
#[derive(Debug, Clone)]
pub struct EvalOptions<'a> {
    pub features: &'a LanguageFeatures,
    pub externals: &'a [ExternalFunction],
    pub translator: Translator,
}

impl<'a> EvalOptions<'a> {
    pub fn new(features: &'a LanguageFeatures) -> Self {
        Self {
            features,
            externals: &[],
            translator: Translator::active(),
        }
    }

    pub fn with_externals(mut self, externals: &'a [ExternalFunction]) -> Self {
        self.externals = externals;
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }
}

/// Frames and output of a whole-program run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub frames: Vec<Frame>,
    pub log_lines: Vec<LogLine>,
}

/// Result of calling one function after the program's declarations ran.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutput {
    pub value: Option<Snapshot>,
    pub frames: Vec<Frame>,
    pub log_lines: Vec<LogLine>,
    pub error: Option<RuntimeError>,
}

/// Run `f` on a fresh stack segment when the current one runs low.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn grow_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(128 * 1024, 4 * 1024 * 1024, f)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn grow_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Run a stdlib method or builtin: stub check, arity check, body, then
/// move any queued output into the log.
pub(crate) fn invoke_method(
    features: &LanguageFeatures,
    recorder: &mut Recorder<'_>,
    method: &'static Method,
    receiver: &JikiObject,
    args: &[JikiObject],
    span: Span,
) -> EvalResult<JikiObject> {
    let dialect = recorder.dialect();
    if method.stub {
        return Err(StdlibError::NotImplemented(method.name.to_string()).into_runtime(dialect, span));
    }
    if !relaxed_arity(features, dialect) {
        method
            .arity
            .check(method.name, args.len())
            .map_err(|e| e.into_runtime(dialect, span))?;
    }
    let mut ctx = CallContext::new(features);
    let result = (method.call)(&mut ctx, receiver, args);
    flush(&mut ctx, recorder);
    result.map_err(|e| e.into_runtime(dialect, span))
}

/// Run a host-supplied function. A `LogicError` becomes
/// `LogicErrorInExecution`.
pub(crate) fn invoke_external(
    features: &LanguageFeatures,
    recorder: &mut Recorder<'_>,
    external: &ExternalFunction,
    args: &[JikiObject],
    span: Span,
) -> EvalResult<JikiObject> {
    let dialect = recorder.dialect();
    if !relaxed_arity(features, dialect) {
        external
            .arity
            .check(&external.name, args.len())
            .map_err(|e| e.into_runtime(dialect, span))?;
    }
    let mut ctx = CallContext::new(features);
    let result = (external.func)(&mut ctx, args);
    flush(&mut ctx, recorder);
    result.map_err(|e| {
        RuntimeError::new(RuntimeErrorType::LogicErrorInExecution, span).with("message", e.message)
    })
}

fn relaxed_arity(features: &LanguageFeatures, dialect: Dialect) -> bool {
    dialect == Dialect::JavaScript && features.native_js_mode
}

fn flush(ctx: &mut CallContext<'_>, recorder: &mut Recorder<'_>) {
    for line in ctx.take_output() {
        recorder.log(line);
    }
}

/// `InvalidNumberOfArguments` for a user function or class constructor.
pub(crate) fn arity_error(name: &str, expected: usize, got: usize, span: Span) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::InvalidNumberOfArguments, span)
        .with("function", name)
        .with("expected", expected.to_string())
        .with("got", got.to_string())
}
