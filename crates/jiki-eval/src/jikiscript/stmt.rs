use super::expr::{get_index, position};
use super::{violation, Evaluator};
use crate::error::{Completion, EvalResult};
use crate::guards;
use crate::recorder::Description;
use crate::scope::{AssignError, Scope};
use crate::value::{Dialect, JikiObject};
use jiki_types::ast::jikiscript::{Expr, ExprKind, Stmt, StmtKind};
use jiki_types::ast::Ident;
use jiki_types::{RuntimeError, RuntimeErrorType, Span};

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

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        match &stmt.kind {
            StmtKind::Set { name, value } => self.exec_set(name, value, stmt.span),
            StmtKind::Change {
                name,
                indexes,
                value,
            } => self.exec_change(name, indexes, value, stmt.span),
            StmtKind::Log(expr) => {
                let value = self.eval_expr(expr)?;
                let text = value.to_display(Dialect::JikiScript);
                self.recorder.log(text.clone());
                self.record(
                    stmt.span,
                    Some(&value),
                    Description::new("describe.log").with("value", text),
                );
                Ok(Completion::Normal)
            }
            StmtKind::Function(decl) => {
                self.declare_function(decl)?;
                Ok(Completion::Normal)
            }
            StmtKind::Return(value) => self.exec_return(value.as_ref(), stmt.span),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let passed = self.eval_condition(condition)?;
                let key = if passed {
                    "describe.if_true"
                } else {
                    "describe.if_false"
                };
                self.record(
                    condition.span,
                    Some(&JikiObject::Boolean(passed)),
                    Description::new(key),
                );
                match (passed, else_branch) {
                    (true, _) => self.exec_scoped(then_branch),
                    (false, Some(branch)) => self.exec_scoped(branch),
                    (false, None) => Ok(Completion::Normal),
                }
            }
            StmtKind::Repeat { count, index, body } => {
                self.exec_repeat(count, index.as_ref(), body, stmt.span)
            }
            StmtKind::RepeatForever { body } => self.exec_repeat_forever(body, stmt.span),
            StmtKind::ForEach {
                element,
                second,
                iterable,
                index,
                body,
            } => self.exec_for_each(
                element,
                second.as_ref(),
                iterable,
                index.as_ref(),
                body,
                stmt.span,
            ),
            StmtKind::Block(body) => self.exec_scoped(body),
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::UnexpectedBreakStatementOutsideOfLoop,
                        stmt.span,
                    ));
                }
                self.record(stmt.span, None, Description::new("describe.break"));
                Ok(Completion::Break)
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::UnexpectedContinueStatementOutsideOfLoop,
                        stmt.span,
                    ));
                }
                self.record(stmt.span, None, Description::new("describe.continue"));
                Ok(Completion::Continue)
            }
            StmtKind::Expression(expr) => {
                let value = self.eval_expr(expr)?;
                let name = match &expr.kind {
                    ExprKind::Call { name, .. } => name.name.as_str(),
                    _ => self.recorder.code(expr.span),
                };
                let description = Description::new("describe.call")
                    .with("name", name)
                    .with("value", self.repr(&value));
                self.record(stmt.span, Some(&value), description);
                Ok(Completion::Normal)
            }
        }
    }

    /// Run `body` in a child scope. On error the child stays current so
    /// the error frame shows its bindings.
    fn exec_scoped(&mut self, body: &[Stmt]) -> EvalResult<Completion> {
        self.with_scope(Scope::child(&self.scope), |this| this.exec_stmts(body))
    }

    fn with_scope<T>(
        &mut self,
        scope: std::rc::Rc<Scope>,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let previous = std::mem::replace(&mut self.scope, scope);
        let out = f(self)?;
        self.scope = previous;
        Ok(out)
    }

    // ── Variables ─────────────────────────────────────────────────────

    fn exec_set(&mut self, name: &Ident, value: &Expr, span: Span) -> EvalResult<Completion> {
        guards::check_declaration(self.features, &self.scope, &name.name)
            .map_err(|v| violation(v, name.span))?;
        let value = self.eval_storable(value)?;
        self.scope.define(&name.name, value.clone(), false);
        let description = Description::new("describe.declaration")
            .with("name", &name.name)
            .with("value", self.repr(&value));
        self.record(span, Some(&value), description);
        Ok(Completion::Normal)
    }

    fn exec_change(
        &mut self,
        name: &Ident,
        indexes: &[Expr],
        value: &Expr,
        span: Span,
    ) -> EvalResult<Completion> {
        let Some(current) = self.scope.get(&name.name) else {
            return Err(RuntimeError::new(RuntimeErrorType::VariableNotDeclared, name.span)
                .with("name", &name.name));
        };
        let Some((last, path)) = indexes.split_last() else {
            let value = self.eval_storable(value)?;
            self.scope
                .assign(&name.name, value.clone())
                .map_err(|e| match e {
                    AssignError::NotDeclared | AssignError::Constant => {
                        RuntimeError::new(RuntimeErrorType::VariableNotDeclared, name.span)
                            .with("name", &name.name)
                    }
                })?;
            let description = Description::new("describe.assignment")
                .with("name", &name.name)
                .with("value", self.repr(&value));
            self.record(span, Some(&value), description);
            return Ok(Completion::Normal);
        };

        let mut target = current;
        for index in path {
            let key = self.eval_expr(index)?;
            target = get_index(&target, &key, index.span)?;
        }
        let key = self.eval_expr(last)?;
        let value = self.eval_storable(value)?;
        self.set_index(&target, &key, value.clone(), last.span)?;
        let description = Description::new("describe.element_assignment")
            .with("name", &name.name)
            .with("key", self.repr(&key))
            .with("value", self.repr(&value));
        self.record(span, Some(&value), description);
        Ok(Completion::Normal)
    }

    /// A value about to be stored: a function call that produced nothing
    /// is refused.
    fn eval_storable(&mut self, expr: &Expr) -> EvalResult<JikiObject> {
        let value = self.eval_expr(expr)?;
        match (&expr.kind, &value) {
            (ExprKind::Call { name, .. }, JikiObject::Null | JikiObject::Undefined) => Err(
                RuntimeError::new(
                    RuntimeErrorType::StateErrorCannotStoreNullValueFromFunction,
                    expr.span,
                )
                .with("name", &name.name),
            ),
            _ => Ok(value),
        }
    }

    /// `change xs[i] to v` on a list (1-based) or dictionary.
    fn set_index(
        &mut self,
        target: &JikiObject,
        key: &JikiObject,
        value: JikiObject,
        span: Span,
    ) -> EvalResult<()> {
        match target {
            JikiObject::List(items) => {
                let index = position(key, span)?;
                let mut items = items.borrow_mut();
                if index > items.len() {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::IndexOutOfRangeForArrayModification,
                        span,
                    )
                    .with("index", index.to_string())
                    .with("length", items.len().to_string()));
                }
                items[index - 1] = value;
                Ok(())
            }
            JikiObject::Dictionary(entries) => {
                let JikiObject::String(k) = key else {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::TypeErrorOperandMustBeStringValue,
                        span,
                    )
                    .with("type", key.type_name()));
                };
                entries.borrow_mut().insert(k.clone(), value);
                Ok(())
            }
            other => Err(RuntimeError::new(
                RuntimeErrorType::InvalidChangeTargetNotModifiable,
                span,
            )
            .with("type", other.type_name())),
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

    /// One iteration's body in a fresh scope holding `bindings`.
    fn run_iteration(
        &mut self,
        bindings: Vec<(&Ident, JikiObject)>,
        header: Span,
        description: Description,
        body: &[Stmt],
    ) -> EvalResult<Completion> {
        self.with_scope(Scope::child(&self.scope), |this| {
            let mut shown = None;
            for (ident, value) in bindings {
                guards::check_declaration(this.features, &this.scope, &ident.name)
                    .map_err(|v| violation(v, ident.span))?;
                shown.get_or_insert_with(|| value.clone());
                this.scope.define(&ident.name, value, false);
            }
            this.record(header, shown.as_ref(), description);
            this.exec_stmts(body)
        })
    }

    fn exec_repeat(
        &mut self,
        count: &Expr,
        index: Option<&Ident>,
        body: &[Stmt],
        span: Span,
    ) -> EvalResult<Completion> {
        let value = self.eval_expr(count)?;
        let JikiObject::Number(n) = value else {
            return Err(RuntimeError::new(
                RuntimeErrorType::RangeErrorRepeatCountMustBeNumericValue,
                count.span,
            )
            .with("type", value.type_name()));
        };
        if n < 0.0 {
            return Err(RuntimeError::new(
                RuntimeErrorType::RangeErrorRepeatCountMustBeNonNegative,
                count.span,
            ));
        }
        let max = self.loops.max();
        if n > max as f64 {
            return Err(RuntimeError::new(
                RuntimeErrorType::RangeErrorRepeatCountTooHighForExecution,
                count.span,
            )
            .with("count", value.to_display(Dialect::JikiScript))
            .with("max", max.to_string()));
        }
        let total = n.floor() as u64;
        self.in_loop(|this| {
            if total == 0 {
                this.record(count.span, None, Description::new("describe.repeat_empty"));
                return Ok(Completion::Normal);
            }
            for iteration in 1..=total {
                this.loops.tick().map_err(|v| violation(v, span))?;
                let bindings = index
                    .map(|ident| (ident, JikiObject::Number(iteration as f64)))
                    .into_iter()
                    .collect();
                let description = Description::new("describe.repeat_iteration")
                    .with("iteration", iteration.to_string())
                    .with("count", total.to_string());
                match this.run_iteration(bindings, count.span, description, body)? {
                    Completion::Break => break,
                    Completion::Return(value) => return Ok(Completion::Return(value)),
                    Completion::Normal | Completion::Continue => {}
                }
            }
            Ok(Completion::Normal)
        })
    }

    /// Runs until `break`, `return` or the iteration guard.
    fn exec_repeat_forever(&mut self, body: &[Stmt], span: Span) -> EvalResult<Completion> {
        let header = Span::new(
            span.start_line,
            span.start_col,
            span.start_line,
            span.start_col + "repeat_forever".len() as u32,
            span.start,
            span.start + "repeat_forever".len(),
        );
        self.in_loop(|this| {
            let mut iteration = 0u64;
            loop {
                this.loops.tick().map_err(|v| violation(v, span))?;
                iteration += 1;
                let description = Description::new("describe.repeat_forever")
                    .with("iteration", iteration.to_string());
                match this.run_iteration(Vec::new(), header, description, body)? {
                    Completion::Break => break,
                    Completion::Return(value) => return Ok(Completion::Return(value)),
                    Completion::Normal | Completion::Continue => {}
                }
            }
            Ok(Completion::Normal)
        })
    }

    fn exec_for_each(
        &mut self,
        element: &Ident,
        second: Option<&Ident>,
        iterable: &Expr,
        index: Option<&Ident>,
        body: &[Stmt],
        span: Span,
    ) -> EvalResult<Completion> {
        let source = self.eval_expr(iterable)?;
        // Iterate a copy so the body cannot change what is being looped over.
        let items: Vec<(JikiObject, Option<JikiObject>)> = match &source {
            JikiObject::List(items) => items.borrow().iter().map(|v| (v.deep_clone(), None)).collect(),
            JikiObject::String(s) => s
                .chars()
                .map(|c| (JikiObject::String(c.to_string()), None))
                .collect(),
            JikiObject::Dictionary(entries) => entries
                .borrow()
                .iter()
                .map(|(k, v)| (JikiObject::string(k.clone()), Some(v.deep_clone())))
                .collect(),
            other => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::ForeachLoopTargetNotIterable,
                    iterable.span,
                )
                .with("type", other.type_name()))
            }
        };
        let header = element.span.merge(iterable.span);
        self.in_loop(|this| {
            if items.is_empty() {
                this.record(header, None, Description::new("describe.for_each_empty"));
                return Ok(Completion::Normal);
            }
            for (position, (item, paired)) in items.into_iter().enumerate() {
                this.loops.tick().map_err(|v| violation(v, span))?;
                let description = Description::new("describe.for_each_iteration")
                    .with("name", &element.name)
                    .with("value", this.repr(&item));
                let mut bindings = vec![(element, item)];
                if let (Some(ident), Some(value)) = (second, paired) {
                    bindings.push((ident, value));
                }
                if let Some(ident) = index {
                    bindings.push((ident, JikiObject::Number((position + 1) as f64)));
                }
                match this.run_iteration(bindings, header, description, body)? {
                    Completion::Break => break,
                    Completion::Return(value) => return Ok(Completion::Return(value)),
                    Completion::Normal | Completion::Continue => {}
                }
            }
            Ok(Completion::Normal)
        })
    }

    fn exec_return(&mut self, value: Option<&Expr>, span: Span) -> EvalResult<Completion> {
        if self.call_depth == 0 {
            return Err(RuntimeError::new(
                RuntimeErrorType::UnexpectedReturnStatementOutsideOfFunction,
                span,
            ));
        }
        match value {
            Some(expr) => {
                let value = self.eval_expr(expr)?;
                let description =
                    Description::new("describe.return").with("value", self.repr(&value));
                self.record(span, Some(&value), description);
                Ok(Completion::Return(value))
            }
            None => {
                self.record(span, None, Description::new("describe.return_empty"));
                Ok(Completion::Return(JikiObject::Null))
            }
        }
    }
}
