//! Restricted Python evaluator.
//!
//! Python has function scopes only: `if`, `while` and `for` bodies run in
//! the enclosing scope, and a `for` target stays bound after the loop.

mod expr;

use crate::error::{Completion, EvalResult};
use crate::guards::{self, LoopGuard};
use crate::recorder::{Description, Recorder};
use crate::runtime::{self, CallOutput, EvalOptions, RunOutput};
use crate::scope::Scope;
use crate::stdlib::{resolve_index, python_type_name};
use crate::value::{Callable, Dialect, FunctionBody, JikiObject, UserFunction};
use jiki_types::ast::python::{Expr, ExprKind, FunctionDecl, Stmt, StmtKind};
use jiki_types::ast::{BinaryOp, Ident};
use jiki_types::{
    Frame, LanguageFeatures, LogLine, RuntimeError, RuntimeErrorType, Snapshot, Span,
};
use std::rc::Rc;
use tracing::debug;

/// Execute a whole program.
pub fn run(program: &[Stmt], source: &str, options: &EvalOptions<'_>) -> RunOutput {
    debug!(target: "jiki::eval", language = "python", statements = program.len(), "execute start");
    let mut evaluator = Evaluator::new(source, options);
    if let Err(err) = evaluator.exec_block(program) {
        evaluator.record_error(err);
    }
    let (frames, log_lines) = evaluator.finish();
    debug!(target: "jiki::eval", language = "python", frames = frames.len(), "execute end");
    RunOutput { frames, log_lines }
}

/// Define the program's functions, then call `name` with `args`.
pub fn call_function(
    program: &[Stmt],
    source: &str,
    options: &EvalOptions<'_>,
    name: &str,
    args: &[Snapshot],
) -> CallOutput {
    debug!(target: "jiki::eval", language = "python", function = name, "call start");
    let mut evaluator = Evaluator::new(source, options);
    for stmt in program {
        if let StmtKind::Function(decl) = &stmt.kind {
            evaluator.define_function(decl);
        }
    }
    let args = args.iter().map(JikiObject::from_snapshot).collect();
    let result = match evaluator.globals.get(name) {
        Some(callee @ JikiObject::Function(_)) => {
            evaluator.call_value(&callee, args, Span::default())
        }
        _ => Err(RuntimeError::new(RuntimeErrorType::FunctionNotFound, Span::default())
            .with("name", name)),
    };
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
    /// The running function's scope, or `globals` at module level.
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
                false,
            );
        }
        Self {
            features: options.features,
            recorder: Recorder::new(source, options.translator, Dialect::Python),
            loops: LoopGuard::new(options.features),
            scope: Rc::clone(&globals),
            globals,
            call_depth: 0,
            loop_depth: 0,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement execution
    // ══════════════════════════════════════════════════════════════════════

    fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Completion> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        match &stmt.kind {
            StmtKind::Assignment { target, op, value } => {
                self.exec_assignment(target, *op, value, stmt.span)
            }
            StmtKind::Expression(expr) => {
                let value = self.eval_expr(expr)?;
                let description = self.describe_expression(expr, &value);
                self.record(stmt.span, Some(&value), description);
                Ok(Completion::Normal)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let (value, passed) = self.eval_condition(condition)?;
                let key = if passed {
                    "describe.if_true"
                } else {
                    "describe.if_false"
                };
                self.record(condition.span, Some(&value), Description::new(key));
                match (passed, else_branch) {
                    (true, _) => self.exec_block(then_branch),
                    (false, Some(branch)) => self.exec_block(branch),
                    (false, None) => Ok(Completion::Normal),
                }
            }
            StmtKind::While { condition, body } => self.exec_while(condition, body, stmt.span),
            StmtKind::For {
                target,
                iterable,
                body,
            } => self.exec_for(target, iterable, body, stmt.span),
            StmtKind::Function(decl) => {
                self.define_function(decl);
                Ok(Completion::Normal)
            }
            StmtKind::Return(value) => {
                if self.call_depth == 0 {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::ReturnOutsideFunction,
                        stmt.span,
                    ));
                }
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => JikiObject::Null,
                };
                let description =
                    Description::new("describe.return").with("value", self.repr(&value));
                self.record(stmt.span, Some(&value), description);
                Ok(Completion::Return(value))
            }
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    return Err(RuntimeError::new(RuntimeErrorType::BreakOutsideLoop, stmt.span));
                }
                self.record(stmt.span, None, Description::new("describe.break"));
                Ok(Completion::Break)
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::ContinueOutsideLoop,
                        stmt.span,
                    ));
                }
                self.record(stmt.span, None, Description::new("describe.continue"));
                Ok(Completion::Continue)
            }
            StmtKind::Pass => {
                self.record(stmt.span, None, Description::new("describe.pass"));
                Ok(Completion::Normal)
            }
        }
    }

    fn define_function(&mut self, decl: &Rc<FunctionDecl>) {
        let function = UserFunction {
            body: FunctionBody::Python(Rc::clone(decl)),
            closure: Rc::clone(&self.scope),
            this: None,
        };
        self.scope
            .define(&decl.name.name, JikiObject::function(Callable::User(function)), false);
    }

    fn exec_assignment(
        &mut self,
        target: &Expr,
        op: Option<BinaryOp>,
        value: &Expr,
        span: Span,
    ) -> EvalResult<Completion> {
        let mut new = self.eval_expr(value)?;
        if let Some(op) = op {
            let current = self.eval_expr(target)?;
            new = self.binary(op, current, new, span)?;
        }
        let description = match &target.kind {
            ExprKind::Identifier(id) => {
                let declared = self.bind(id, new.clone())?;
                let key = if declared {
                    "describe.declaration"
                } else {
                    "describe.assignment"
                };
                Description::new(key)
                    .with("name", &id.name)
                    .with("value", self.repr(&new))
            }
            ExprKind::Subscript { object, index } => {
                let container = self.eval_expr(object)?;
                let key = self.eval_expr(index)?;
                self.set_item(&container, &key, new.clone(), index.span)?;
                Description::new("describe.element_assignment")
                    .with("name", self.recorder.code(object.span))
                    .with("key", self.repr(&key))
                    .with("value", self.repr(&new))
            }
            _ => {
                return Err(RuntimeError::new(RuntimeErrorType::TypeError, target.span)
                    .with("details", "cannot assign to expression"))
            }
        };
        self.record(span, Some(&new), description);
        Ok(Completion::Normal)
    }

    /// Bind `id` in the current function scope. Returns whether this
    /// introduced a new name.
    fn bind(&mut self, id: &Ident, value: JikiObject) -> EvalResult<bool> {
        if self.scope.has_local(&id.name) {
            self.scope.define(&id.name, value, false);
            return Ok(false);
        }
        guards::check_declaration(self.features, &self.scope, &id.name)
            .map_err(|v| v.into_error(id.span))?;
        self.scope.define(&id.name, value, false);
        Ok(true)
    }

    fn set_item(
        &mut self,
        container: &JikiObject,
        key: &JikiObject,
        value: JikiObject,
        span: Span,
    ) -> EvalResult<()> {
        match container {
            JikiObject::List(items) => {
                let index = expr::integer_index(key, "list", span)?;
                let mut items = items.borrow_mut();
                match resolve_index(index, items.len()) {
                    Some(i) => {
                        items[i] = value;
                        Ok(())
                    }
                    None => Err(RuntimeError::new(RuntimeErrorType::IndexError, span)
                        .with("index", index.to_string())
                        .with("length", items.len().to_string())),
                }
            }
            JikiObject::Dictionary(entries) => {
                let key = expr::dict_key(key, span)?;
                entries.borrow_mut().insert(key, value);
                Ok(())
            }
            other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
                "details",
                format!(
                    "'{}' object does not support item assignment",
                    python_type_name(other)
                ),
            )),
        }
    }

    fn describe_expression(&self, expr: &Expr, value: &JikiObject) -> Description {
        match &expr.kind {
            ExprKind::Call { callee, .. } if is_print(callee) => Description::new("describe.log")
                .with("value", self.recorder.last_log().unwrap_or_default()),
            ExprKind::Call { callee, .. } => Description::new("describe.call")
                .with("name", self.recorder.code(callee.span))
                .with("value", self.repr(value)),
            _ => Description::new("describe.expression").with("value", self.repr(value)),
        }
    }

    // ── Loops ─────────────────────────────────────────────────────────

    fn in_loop(
        &mut self,
        f: impl FnOnce(&mut Self) -> EvalResult<Completion>,
    ) -> EvalResult<Completion> {
        self.loop_depth += 1;
        let out = f(self)?;
        self.loop_depth -= 1;
        Ok(out)
    }

    fn exec_while(&mut self, condition: &Expr, body: &[Stmt], span: Span) -> EvalResult<Completion> {
        self.in_loop(|this| {
            loop {
                let (value, passed) = this.eval_condition(condition)?;
                let key = if passed {
                    "describe.loop_true"
                } else {
                    "describe.loop_false"
                };
                this.record(condition.span, Some(&value), Description::new(key));
                if !passed {
                    break;
                }
                this.loops.tick().map_err(|v| v.into_error(span))?;
                match this.exec_block(body)? {
                    Completion::Break => break,
                    Completion::Return(value) => return Ok(Completion::Return(value)),
                    Completion::Normal | Completion::Continue => {}
                }
            }
            Ok(Completion::Normal)
        })
    }

    fn exec_for(
        &mut self,
        target: &Ident,
        iterable: &Expr,
        body: &[Stmt],
        span: Span,
    ) -> EvalResult<Completion> {
        let source = self.eval_expr(iterable)?;
        let mut next: Box<dyn FnMut(usize) -> Option<JikiObject>> = match &source {
            JikiObject::List(items) => {
                let items = Rc::clone(items);
                Box::new(move |i| items.borrow().get(i).cloned())
            }
            JikiObject::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                Box::new(move |i| chars.get(i).map(|c| JikiObject::String(c.to_string())))
            }
            JikiObject::Dictionary(entries) => {
                let keys: Vec<String> = entries.borrow().keys().cloned().collect();
                Box::new(move |i| keys.get(i).cloned().map(JikiObject::String))
            }
            JikiObject::Iterator(state) => {
                let state = Rc::clone(state);
                Box::new(move |_| state.borrow_mut().next())
            }
            other => {
                return Err(RuntimeError::new(RuntimeErrorType::TypeError, iterable.span).with(
                    "details",
                    format!("'{}' object is not iterable", python_type_name(other)),
                ))
            }
        };
        let header = target.span.merge(iterable.span);
        self.in_loop(|this| {
            let mut index = 0;
            while let Some(item) = next(index) {
                index += 1;
                this.loops.tick().map_err(|v| v.into_error(span))?;
                this.bind(target, item.clone())?;
                let description = Description::new("describe.for_each_iteration")
                    .with("name", &target.name)
                    .with("value", this.repr(&item));
                this.record(header, Some(&item), description);
                match this.exec_block(body)? {
                    Completion::Break => break,
                    Completion::Return(value) => return Ok(Completion::Return(value)),
                    Completion::Normal | Completion::Continue => {}
                }
            }
            if index == 0 {
                this.record(header, None, Description::new("describe.for_each_empty"));
            }
            Ok(Completion::Normal)
        })
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
            return Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
                "details",
                format!("'{}' object is not callable", python_type_name(callee)),
            ));
        };
        match callable.as_ref() {
            Callable::User(function) => {
                let FunctionBody::Python(decl) = &function.body else {
                    return Err(RuntimeError::new(RuntimeErrorType::TypeError, span)
                        .with("details", "function belongs to another language"));
                };
                if decl.params.len() != args.len() {
                    return Err(runtime::arity_error(
                        &decl.name.name,
                        decl.params.len(),
                        args.len(),
                        span,
                    ));
                }
                self.invoke(decl, &function.closure, args, span)
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
                &JikiObject::Null,
                &args,
                span,
            ),
            Callable::External(external) => {
                runtime::invoke_external(self.features, &mut self.recorder, external, &args, span)
            }
            Callable::Class(class) => Err(RuntimeError::new(RuntimeErrorType::TypeError, span)
                .with("details", format!("'{}' is not callable", class.name))),
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
        guards::check_call_depth(self.features, self.call_depth).map_err(|v| v.into_error(span))?;
        let scope = Scope::child(closure);
        for (param, arg) in decl.params.iter().zip(args) {
            scope.define(&param.name, arg, false);
        }
        let previous_scope = std::mem::replace(&mut self.scope, scope);
        let previous_loops = std::mem::replace(&mut self.loop_depth, 0);

        let completion = self.exec_block(&decl.body)?;

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

fn is_print(callee: &Expr) -> bool {
    matches!(&callee.kind, ExprKind::Identifier(id) if id.name == "print")
}
