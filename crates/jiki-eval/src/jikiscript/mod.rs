//! JikiScript evaluator.
//!
//! Functions must be declared before they are called, lists and strings
//! index from 1, and values travel into functions by copy. Guard violations
//! are reported under JikiScript's own error names.

mod expr;
mod stmt;

use crate::error::{Completion, EvalResult};
use crate::guards::{self, LoopGuard, Violation};
use crate::recorder::{Description, Recorder};
use crate::runtime::{self, CallOutput, EvalOptions, RunOutput};
use crate::scope::Scope;
use crate::stdlib;
use crate::value::{Callable, Dialect, FunctionBody, JikiObject, UserFunction};
use jiki_types::ast::jikiscript::{FunctionDecl, Stmt, StmtKind};
use jiki_types::{
    Frame, LanguageFeatures, LogLine, RuntimeError, RuntimeErrorType, Snapshot, Span,
};
use std::rc::Rc;
use tracing::debug;

/// Execute a whole program.
pub fn run(program: &[Stmt], source: &str, options: &EvalOptions<'_>) -> RunOutput {
    debug!(target: "jiki::eval", language = "jikiscript", statements = program.len(), "execute start");
    let mut evaluator = Evaluator::new(source, options);
    if let Err(err) = evaluator.exec_stmts(program) {
        evaluator.record_error(err);
    }
    let (frames, log_lines) = evaluator.finish();
    debug!(target: "jiki::eval", language = "jikiscript", frames = frames.len(), "execute end");
    RunOutput { frames, log_lines }
}

/// Declare the program's functions, then call `name` with `args`.
pub fn call_function(
    program: &[Stmt],
    source: &str,
    options: &EvalOptions<'_>,
    name: &str,
    args: &[Snapshot],
) -> CallOutput {
    debug!(target: "jiki::eval", language = "jikiscript", function = name, "call start");
    let mut evaluator = Evaluator::new(source, options);
    let args = args.iter().map(JikiObject::from_snapshot).collect();
    let result = program
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Function(decl) => Some(decl),
            _ => None,
        })
        .try_for_each(|decl| evaluator.declare_function(decl))
        .and_then(|_| evaluator.call_named(name, args, Span::default()));
    let (value, error) = match result {
        Ok(value) => (Some(value.unwrap()), None),
        Err(err) => (None, Some(evaluator.record_error(err))),
    };
    let (frames, log_lines) = evaluator.finish();
    CallOutput {
        value,
        frames,
        log_lines,
        error,
    }
}

pub(crate) struct Evaluator<'a> {
    features: &'a LanguageFeatures,
    recorder: Recorder<'a>,
    loops: LoopGuard,
    globals: Rc<Scope>,
    scope: Rc<Scope>,
    call_depth: usize,
    loop_depth: usize,
}

impl<'a> Evaluator<'a> {
    fn new(source: &'a str, options: &EvalOptions<'a>) -> Self {
        let globals = Scope::global();
        for external in options.externals {
            globals.define(
                &external.name,
                JikiObject::function(Callable::External(Rc::new(external.clone()))),
                true,
            );
        }
        Self {
            features: options.features,
            recorder: Recorder::new(source, options.translator, Dialect::JikiScript),
            loops: LoopGuard::new(options.features),
            scope: Rc::clone(&globals),
            globals,
            call_depth: 0,
            loop_depth: 0,
        }
    }

    fn declare_function(&mut self, decl: &Rc<FunctionDecl>) -> EvalResult<()> {
        if self.scope.lookup(&decl.name.name).is_some() {
            return Err(RuntimeError::new(
                RuntimeErrorType::DuplicateFunctionDeclarationInScope,
                decl.name.span,
            )
            .with("name", &decl.name.name));
        }
        let function = UserFunction {
            body: FunctionBody::JikiScript(Rc::clone(decl)),
            closure: Rc::clone(&self.scope),
            this: None,
        };
        self.scope
            .define(&decl.name.name, JikiObject::function(Callable::User(function)), true);
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    /// Resolve `name` to a declared function, external or allowed library
    /// function and call it.
    fn call_named(&mut self, name: &str, args: Vec<JikiObject>, span: Span) -> EvalResult<JikiObject> {
        match self.scope.get(name) {
            Some(JikiObject::Function(callable)) => self.call(&callable, name, args, span),
            Some(_) => Err(RuntimeError::new(
                RuntimeErrorType::NonCallableTargetInvocationAttempt,
                span,
            )
            .with("name", name)),
            None => match self.library_function(name) {
                Some(method) => runtime::invoke_method(
                    self.features,
                    &mut self.recorder,
                    method,
                    &JikiObject::Null,
                    &args,
                    span,
                ),
                None => Err(
                    RuntimeError::new(RuntimeErrorType::FunctionNotFoundInScope, span)
                        .with("name", name),
                ),
            },
        }
    }

    /// A library function visible under `allowedStdlibFunctions`.
    fn library_function(&self, name: &str) -> Option<&'static stdlib::Method> {
        stdlib::jikiscript_builtin(name).filter(|_| self.features.is_stdlib_function_allowed(name))
    }

    fn call(
        &mut self,
        callable: &Callable,
        name: &str,
        args: Vec<JikiObject>,
        span: Span,
    ) -> EvalResult<JikiObject> {
        match callable {
            Callable::User(function) => {
                let FunctionBody::JikiScript(decl) = &function.body else {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::NonCallableTargetInvocationAttempt,
                        span,
                    )
                    .with("name", name));
                };
                let expected = decl.params.len();
                if args.len() != expected {
                    let ty = if args.len() < expected {
                        RuntimeErrorType::RangeErrorTooFewArgumentsForFunctionCall
                    } else {
                        RuntimeErrorType::RangeErrorTooManyArgumentsForFunctionCall
                    };
                    return Err(RuntimeError::new(ty, span)
                        .with("name", name)
                        .with("expected", expected.to_string())
                        .with("got", args.len().to_string()));
                }
                let args = args.iter().map(JikiObject::deep_clone).collect();
                self.invoke(decl, &function.closure, args, span)
            }
            Callable::External(external) => {
                runtime::invoke_external(self.features, &mut self.recorder, external, &args, span)
            }
            Callable::Builtin(method) | Callable::Stdlib { method, .. } => runtime::invoke_method(
                self.features,
                &mut self.recorder,
                method,
                &JikiObject::Null,
                &args,
                span,
            ),
            Callable::Class(_) => Err(RuntimeError::new(
                RuntimeErrorType::NonCallableTargetInvocationAttempt,
                span,
            )
            .with("name", name)),
        }
    }

    fn invoke(
        &mut self,
        decl: &Rc<FunctionDecl>,
        closure: &Rc<Scope>,
        args: Vec<JikiObject>,
        span: Span,
    ) -> EvalResult<JikiObject> {
        self.call_depth += 1;
        guards::check_call_depth(self.features, self.call_depth).map_err(|v| {
            v.retype(RuntimeErrorType::StateErrorInfiniteRecursionDetectedInFunction)
                .with("name", decl.name.name.clone())
                .into_error(span)
        })?;
        let scope = Scope::child(closure);
        for (param, arg) in decl.params.iter().zip(args) {
            scope.define(&param.name, arg, false);
        }
        let previous_scope = std::mem::replace(&mut self.scope, scope);
        let previous_loops = std::mem::replace(&mut self.loop_depth, 0);

        let completion = self.exec_stmts(&decl.body)?;

        self.scope = previous_scope;
        self.loop_depth = previous_loops;
        self.call_depth -= 1;
        Ok(match completion {
            Completion::Return(value) => value,
            _ => JikiObject::Null,
        })
    }

    // ══════════════════════════════════════════════════════════════════════
    // Recording
    // ══════════════════════════════════════════════════════════════════════

    fn record(&mut self, span: Span, result: Option<&JikiObject>, description: Description) {
        self.recorder.success(span, result, description, &self.scope);
    }

    fn record_error(&mut self, err: RuntimeError) -> RuntimeError {
        let localized = err.localize(self.recorder.translator());
        self.recorder.error(localized.clone(), &self.scope);
        localized
    }

    fn finish(self) -> (Vec<Frame>, Vec<LogLine>) {
        self.scope.clear();
        self.globals.clear();
        self.recorder.finish()
    }

    fn repr(&self, value: &JikiObject) -> String {
        self.recorder.repr(value)
    }
}

/// A shared guard violation under its JikiScript name.
fn violation(v: Violation, span: Span) -> RuntimeError {
    let ty = match v.error_type {
        RuntimeErrorType::VariableAlreadyDeclared => RuntimeErrorType::VariableAlreadyDeclaredInScope,
        RuntimeErrorType::TruthinessDisabled => RuntimeErrorType::TypeErrorOperandMustBeBooleanValue,
        RuntimeErrorType::MaxIterationsReached => RuntimeErrorType::StateErrorMaxIterationsReachedInLoop,
        other => other,
    };
    v.retype(ty).into_error(span)
}
