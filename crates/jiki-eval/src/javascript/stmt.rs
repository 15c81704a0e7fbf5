use super::{type_error, Evaluator};
use crate::error::{Completion, EvalResult};
use crate::guards;
use crate::recorder::Description;
use crate::scope::Scope;
use crate::value::JikiObject;
use jiki_types::ast::javascript::{DeclKind, Expr, ExprKind, Stmt, StmtKind};
use jiki_types::ast::Ident;
use jiki_types::{RuntimeError, RuntimeErrorType, Span};
use std::rc::Rc;

impl<'a> Evaluator<'a> {
    // ══════════════════════════════════════════════════════════════════════
    // Statement execution
    // ══════════════════════════════════════════════════════════════════════

    pub(super) fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Completion> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    pub(super) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        match &stmt.kind {
            StmtKind::VariableDeclaration { kind, name, init } => {
                self.exec_declaration(*kind, name, init.as_ref(), stmt.span)
            }
            StmtKind::Expression(expr) => self.exec_expression(expr, stmt.span),
            StmtKind::Block(body) => self.in_child_scope(|this| this.exec_stmts(body)),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.exec_if(condition, then_branch, else_branch.as_deref()),
            StmtKind::While { condition, body } => self.exec_while(condition, body, stmt.span),
            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => self.exec_for(
                init.as_deref(),
                condition.as_ref(),
                update.as_ref(),
                body,
                stmt.span,
            ),
            StmtKind::ForOf {
                name,
                iterable,
                body,
            } => self.exec_for_of(name, iterable, body, stmt.span),
            StmtKind::ForIn { name, object, body } => {
                self.exec_for_in(name, object, body, stmt.span)
            }
            StmtKind::Repeat { count, body } => self.exec_repeat(count.as_ref(), body, stmt.span),
            StmtKind::Function(decl) => {
                // Top-level functions were hoisted before the first statement.
                if !Rc::ptr_eq(&self.scope, &self.globals) {
                    self.declare_function(decl)?;
                }
                Ok(Completion::Normal)
            }
            StmtKind::Class(decl) => {
                self.declare_class(decl)?;
                Ok(Completion::Normal)
            }
            StmtKind::Return(value) => self.exec_return(value.as_ref(), stmt.span),
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
            StmtKind::Empty => Ok(Completion::Normal),
        }
    }

    /// Run `f` in a fresh block scope. On error the inner scope stays
    /// current so the error frame shows it.
    pub(super) fn in_child_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let child = Scope::child(&self.scope);
        let previous = std::mem::replace(&mut self.scope, child);
        let out = f(self)?;
        self.scope = previous;
        Ok(out)
    }

    fn in_loop(
        &mut self,
        f: impl FnOnce(&mut Self) -> EvalResult<Completion>,
    ) -> EvalResult<Completion> {
        self.loop_depth += 1;
        let out = f(self)?;
        self.loop_depth -= 1;
        Ok(out)
    }

    // ── Declarations ──────────────────────────────────────────────────

    fn exec_declaration(
        &mut self,
        kind: DeclKind,
        name: &Ident,
        init: Option<&Expr>,
        span: Span,
    ) -> EvalResult<Completion> {
        guards::check_declaration(self.features, &self.scope, &name.name)
            .map_err(|v| v.into_error(name.span))?;
        let value = match init {
            Some(expr) => self.eval_expr(expr)?,
            None => JikiObject::Undefined,
        };
        let constant = kind == DeclKind::Const;
        self.scope.define(&name.name, value.clone(), constant);
        let key = if constant {
            "describe.constant"
        } else {
            "describe.declaration"
        };
        let description = Description::new(key)
            .with("name", &name.name)
            .with("value", self.repr(&value));
        self.record(span, Some(&value), description);
        Ok(Completion::Normal)
    }

    // ── Expression statements ─────────────────────────────────────────

    fn exec_expression(&mut self, expr: &Expr, span: Span) -> EvalResult<Completion> {
        let value = self.eval_expr(expr)?;
        let description = self.describe_expression(expr, &value);
        self.record(span, Some(&value), description);
        Ok(Completion::Normal)
    }

    fn describe_expression(&self, expr: &Expr, value: &JikiObject) -> Description {
        match &expr.kind {
            ExprKind::Assignment { target, .. } => match &target.kind {
                ExprKind::Identifier(id) => Description::new("describe.assignment")
                    .with("name", &id.name)
                    .with("value", self.repr(value)),
                ExprKind::Index { object, index } => Description::new("describe.element_assignment")
                    .with("name", self.recorder.code(object.span))
                    .with("key", self.recorder.code(index.span))
                    .with("value", self.repr(value)),
                ExprKind::Member { property, .. } => Description::new("describe.property_assignment")
                    .with("property", &property.name)
                    .with("value", self.repr(value)),
                _ => Description::new("describe.expression").with("value", self.repr(value)),
            },
            ExprKind::Update { target, .. } => {
                let current = match &target.kind {
                    ExprKind::Identifier(id) => self.scope.get(&id.name),
                    _ => None,
                };
                Description::new("describe.update")
                    .with("name", self.recorder.code(target.span))
                    .with("value", self.repr(current.as_ref().unwrap_or(value)))
            }
            ExprKind::Call { callee, .. } if is_console_log(callee) => Description::new("describe.log")
                .with("value", self.recorder.last_log().unwrap_or_default()),
            ExprKind::Call { callee, .. } => Description::new("describe.call")
                .with("name", self.recorder.code(callee.span))
                .with("value", self.repr(value)),
            _ => Description::new("describe.expression").with("value", self.repr(value)),
        }
    }

    // ── Control flow ──────────────────────────────────────────────────

    fn exec_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> EvalResult<Completion> {
        let (value, passed) = self.eval_condition(condition)?;
        let key = if passed {
            "describe.if_true"
        } else {
            "describe.if_false"
        };
        self.record(condition.span, Some(&value), Description::new(key));
        match (passed, else_branch) {
            (true, _) => self.exec_stmt(then_branch),
            (false, Some(branch)) => self.exec_stmt(branch),
            (false, None) => Ok(Completion::Normal),
        }
    }

    /// Evaluate and record one loop-condition check.
    fn check_loop_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        let (value, passed) = self.eval_condition(condition)?;
        let key = if passed {
            "describe.loop_true"
        } else {
            "describe.loop_false"
        };
        self.record(condition.span, Some(&value), Description::new(key));
        Ok(passed)
    }

    fn exec_while(&mut self, condition: &Expr, body: &Stmt, span: Span) -> EvalResult<Completion> {
        self.in_loop(|this| {
            while this.check_loop_condition(condition)? {
                this.loops.tick().map_err(|v| v.into_error(span))?;
                match this.exec_stmt(body)? {
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
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
        span: Span,
    ) -> EvalResult<Completion> {
        self.in_child_scope(|this| {
            if let Some(init) = init {
                this.exec_stmt(init)?;
            }
            this.in_loop(|this| {
                loop {
                    if let Some(condition) = condition {
                        if !this.check_loop_condition(condition)? {
                            break;
                        }
                    }
                    this.loops.tick().map_err(|v| v.into_error(span))?;
                    match this.exec_stmt(body)? {
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                        Completion::Normal | Completion::Continue => {}
                    }
                    if let Some(update) = update {
                        let value = this.eval_expr(update)?;
                        let description = this.describe_expression(update, &value);
                        this.record(update.span, Some(&value), description);
                    }
                }
                Ok(Completion::Normal)
            })
        })
    }

    fn exec_for_of(
        &mut self,
        name: &Ident,
        iterable: &Expr,
        body: &Stmt,
        span: Span,
    ) -> EvalResult<Completion> {
        let target = self.eval_expr(iterable)?;
        let next: Box<dyn FnMut(usize) -> Option<JikiObject>> = match &target {
            JikiObject::List(items) => {
                let items = Rc::clone(items);
                Box::new(move |i| items.borrow().get(i).cloned())
            }
            JikiObject::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                Box::new(move |i| chars.get(i).map(|c| JikiObject::String(c.to_string())))
            }
            JikiObject::Iterator(state) => {
                let state = Rc::clone(state);
                Box::new(move |_| state.borrow_mut().next())
            }
            other => {
                return Err(
                    RuntimeError::new(RuntimeErrorType::ForOfLoopTargetNotIterable, iterable.span)
                        .with("type", other.type_name()),
                )
            }
        };
        self.exec_each(name, iterable.span, body, span, next)
    }

    fn exec_for_in(
        &mut self,
        name: &Ident,
        object: &Expr,
        body: &Stmt,
        span: Span,
    ) -> EvalResult<Completion> {
        let target = self.eval_expr(object)?;
        guards::check_in_operand(self.features, &JikiObject::string(""), &target)
            .map_err(|v| v.into_error(object.span))?;
        let keys: Vec<String> = match &target {
            JikiObject::Dictionary(entries) => entries.borrow().keys().cloned().collect(),
            JikiObject::Instance(instance) => instance.fields.borrow().keys().cloned().collect(),
            JikiObject::List(items) => (0..items.borrow().len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        };
        let next = Box::new(move |i: usize| keys.get(i).cloned().map(JikiObject::String));
        self.exec_each(name, object.span, body, span, next)
    }

    /// Shared body of `for...of` and `for...in`: one child scope and one
    /// frame per item.
    fn exec_each(
        &mut self,
        name: &Ident,
        source_span: Span,
        body: &Stmt,
        span: Span,
        mut next: Box<dyn FnMut(usize) -> Option<JikiObject>>,
    ) -> EvalResult<Completion> {
        let header = name.span.merge(source_span);
        self.in_loop(|this| {
            let mut index = 0;
            while let Some(item) = next(index) {
                index += 1;
                this.loops.tick().map_err(|v| v.into_error(span))?;
                let flow = this.in_child_scope(|this| {
                    guards::check_declaration(this.features, &this.scope, &name.name)
                        .map_err(|v| v.into_error(name.span))?;
                    this.scope.define(&name.name, item.clone(), false);
                    let description = Description::new("describe.for_each_iteration")
                        .with("name", &name.name)
                        .with("value", this.repr(&item));
                    this.record(header, Some(&item), description);
                    this.exec_stmt(body)
                })?;
                match flow {
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

    fn exec_repeat(
        &mut self,
        count: Option<&Expr>,
        body: &Stmt,
        span: Span,
    ) -> EvalResult<Completion> {
        let (limit, header) = match count {
            Some(expr) => {
                let value = self.eval_expr(expr)?;
                match value {
                    JikiObject::Number(n) if n >= 0.0 && n.fract() == 0.0 => (Some(n as u64), expr.span),
                    other => {
                        return Err(type_error(
                            expr.span,
                            format!(
                                "repeat needs a whole number of at least 0, not {}",
                                self.repr(&other)
                            ),
                        ))
                    }
                }
            }
            None => (None, span),
        };
        self.in_loop(|this| {
            if limit == Some(0) {
                this.record(header, None, Description::new("describe.repeat_empty"));
                return Ok(Completion::Normal);
            }
            let mut iteration = 0u64;
            while limit.map_or(true, |max| iteration < max) {
                this.loops.tick().map_err(|v| v.into_error(span))?;
                iteration += 1;
                let description = match limit {
                    Some(max) => Description::new("describe.repeat_iteration")
                        .with("iteration", iteration.to_string())
                        .with("count", max.to_string()),
                    None => Description::new("describe.repeat_forever")
                        .with("iteration", iteration.to_string()),
                };
                this.record(header, None, description);
                match this.exec_stmt(body)? {
                    Completion::Break => break,
                    Completion::Return(value) => return Ok(Completion::Return(value)),
                    Completion::Normal | Completion::Continue => {}
                }
            }
            Ok(Completion::Normal)
        })
    }

    fn exec_return(&mut self, value: Option<&Expr>, span: Span) -> EvalResult<Completion> {
        if !self.in_function() {
            return Err(RuntimeError::new(
                RuntimeErrorType::ReturnOutsideFunction,
                span,
            ));
        }
        match value {
            Some(expr) => {
                let value = self.eval_expr(expr)?;
                let description = Description::new("describe.return").with("value", self.repr(&value));
                self.record(span, Some(&value), description);
                Ok(Completion::Return(value))
            }
            None => {
                self.record(span, None, Description::new("describe.return_empty"));
                Ok(Completion::Return(JikiObject::Undefined))
            }
        }
    }
}

/// `console.log(..)`, which is described by what it printed.
fn is_console_log(callee: &Expr) -> bool {
    match &callee.kind {
        ExprKind::Member { object, property } => {
            property.name == "log"
                && matches!(&object.kind, ExprKind::Identifier(id) if id.name == "console")
        }
        _ => false,
    }
}
