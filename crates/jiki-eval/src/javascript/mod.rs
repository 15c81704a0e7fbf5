//! Restricted JavaScript evaluator.
//!
//! Top-level function declarations are hoisted; everything else runs in
//! source order. Each observable step is recorded as a frame.

mod expr;
mod stmt;

use crate::error::{Completion, EvalResult};
use crate::guards::{self, LoopGuard};
use crate::recorder::{Description, Recorder};
use crate::runtime::{self, CallOutput, EvalOptions, RunOutput};
use crate::scope::Scope;
use crate::value::{Callable, ClassDef, Dialect, FunctionBody, JikiObject, UserFunction};
use jiki_types::ast::javascript::{ClassDecl, FunctionDecl, Stmt, StmtKind};
use jiki_types::{Frame, LanguageFeatures, LogLine, RuntimeError, RuntimeErrorType, Snapshot, Span};
use std::rc::Rc;
use tracing::debug;

/// Execute a whole program.
pub fn run(program: &[Stmt], source: &str, options: &EvalOptions<'_>) -> RunOutput {
    debug!(target: "jiki::eval", language = "javascript", statements = program.len(), "execute start");
    let mut evaluator = Evaluator::new(source, options);
    if let Err(err) = evaluator.execute_program(program) {
        evaluator.record_error(err);
    }
    let (frames, log_lines) = evaluator.finish();
    debug!(target: "jiki::eval", language = "javascript", frames = frames.len(), "execute end");
    RunOutput { frames, log_lines }
}

/// Run the program's declarations, then call `name` with `args`.
pub fn call_function(
    program: &[Stmt],
    source: &str,
    options: &EvalOptions<'_>,
    name: &str,
    args: &[Snapshot],
) -> CallOutput {
    debug!(target: "jiki::eval", language = "javascript", function = name, "call start");
    let mut evaluator = Evaluator::new(source, options);
    let args: Vec<JikiObject> = args.iter().map(JikiObject::from_snapshot).collect();
    let result = evaluator
        .declare(program)
        .and_then(|_| evaluator.call_by_name(name, args));
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
    /// Receiver of the running method, if any.
    this: Option<JikiObject>,
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
            recorder: Recorder::new(source, options.translator, Dialect::JavaScript),
            loops: LoopGuard::new(options.features),
            scope: Rc::clone(&globals),
            globals,
            this: None,
            call_depth: 0,
            loop_depth: 0,
        }
    }

    fn execute_program(&mut self, program: &[Stmt]) -> EvalResult<()> {
        self.hoist_functions(program)?;
        for stmt in program {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// Bind every top-level function before the first statement runs.
    fn hoist_functions(&mut self, program: &[Stmt]) -> EvalResult<()> {
        for stmt in program {
            if let StmtKind::Function(decl) = &stmt.kind {
                self.declare_function(decl)?;
            }
        }
        Ok(())
    }

    /// Functions and classes only; nothing is recorded.
    fn declare(&mut self, program: &[Stmt]) -> EvalResult<()> {
        self.hoist_functions(program)?;
        for stmt in program {
            if let StmtKind::Class(decl) = &stmt.kind {
                self.declare_class(decl)?;
            }
        }
        Ok(())
    }

    fn declare_function(&mut self, decl: &Rc<FunctionDecl>) -> EvalResult<()> {
        guards::check_declaration(self.features, &self.scope, &decl.name.name)
            .map_err(|v| v.into_error(decl.name.span))?;
        let function = UserFunction {
            body: FunctionBody::JavaScript(Rc::clone(decl)),
            closure: Rc::clone(&self.scope),
            this: None,
        };
        self.scope
            .define(&decl.name.name, JikiObject::function(Callable::User(function)), false);
        Ok(())
    }

    fn declare_class(&mut self, decl: &ClassDecl) -> EvalResult<()> {
        guards::check_declaration(self.features, &self.scope, &decl.name.name)
            .map_err(|v| v.into_error(decl.name.span))?;
        let class = ClassDef::from_decl(decl, Rc::clone(&self.scope));
        self.scope.define(
            &decl.name.name,
            JikiObject::function(Callable::Class(Rc::new(class))),
            true,
        );
        Ok(())
    }

    fn call_by_name(&mut self, name: &str, args: Vec<JikiObject>) -> EvalResult<JikiObject> {
        let span = Span::default();
        match self.globals.get(name) {
            Some(callee @ JikiObject::Function(_)) => self.call_value(&callee, args, span),
            _ => Err(RuntimeError::new(RuntimeErrorType::FunctionNotFound, span).with("name", name)),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    fn call_value(
        &mut self,
        callee: &JikiObject,
        args: Vec<JikiObject>,
        span: Span,
    ) -> EvalResult<JikiObject> {
        let JikiObject::Function(callable) = callee else {
            return Err(type_error(
                span,
                format!("{} is not a function", self.recorder.code(span)),
            ));
        };
        match callable.as_ref() {
            Callable::User(function) => {
                let FunctionBody::JavaScript(decl) = &function.body else {
                    return Err(type_error(span, "function belongs to another language"));
                };
                if decl.params.len() != args.len() {
                    return Err(runtime::arity_error(
                        &decl.name.name,
                        decl.params.len(),
                        args.len(),
                        span,
                    ));
                }
                self.invoke(decl, &function.closure, function.this.clone(), args, span)
            }
            Callable::Stdlib { receiver, method } => runtime::invoke_method(
                self.features,
                &mut self.recorder,
                method,
                receiver,
                &args,
                span,
            ),
            Callable::Builtin(method) => runtime::invoke_method(
                self.features,
                &mut self.recorder,
                method,
                &JikiObject::Undefined,
                &args,
                span,
            ),
            Callable::External(external) => {
                runtime::invoke_external(self.features, &mut self.recorder, external, &args, span)
            }
            Callable::Class(class) => Err(type_error(
                span,
                format!(
                    "Class constructor {} cannot be invoked without 'new'",
                    class.name
                ),
            )),
        }
    }

    /// Run a function body in a fresh scope enclosed by `closure`.
    fn invoke(
        &mut self,
        decl: &Rc<FunctionDecl>,
        closure: &Rc<Scope>,
        this: Option<JikiObject>,
        args: Vec<JikiObject>,
        span: Span,
    ) -> EvalResult<JikiObject> {
        self.call_depth += 1;
        guards::check_call_depth(self.features, self.call_depth).map_err(|v| v.into_error(span))?;
        let scope = Scope::child(closure);
        for (param, arg) in decl.params.iter().zip(args) {
            scope.define(&param.name, arg, false);
        }
        let previous_scope = std::mem::replace(&mut self.scope, scope);
        let previous_this = std::mem::replace(&mut self.this, this);
        let previous_loops = std::mem::replace(&mut self.loop_depth, 0);

        let completion = self.exec_stmts(&decl.body)?;

        self.scope = previous_scope;
        self.this = previous_this;
        self.loop_depth = previous_loops;
        self.call_depth -= 1;
        Ok(match completion {
            Completion::Return(value) => value,
            _ => JikiObject::Undefined,
        })
    }

    fn in_function(&self) -> bool {
        self.call_depth > 0
    }

    // ══════════════════════════════════════════════════════════════════════
    // Recording
    // ══════════════════════════════════════════════════════════════════════

    fn record(&mut self, span: Span, result: Option<&JikiObject>, description: Description) {
        self.recorder.success(span, result, description, &self.scope);
    }

    /// Record `err` as the final frame and return it localized.
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

fn type_error(span: Span, details: impl Into<String>) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::TypeError, span).with("details", details)
}
