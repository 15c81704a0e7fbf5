use super::{type_error, Evaluator};
use crate::error::{EvalResult, StdlibError};
use crate::guards;
use crate::runtime;
use crate::scope::AssignError;
use crate::stdlib::{self, TypeTable};
use crate::value::{
    identical, Callable, Dialect, FunctionBody, Instance, JikiObject, UserFunction,
    MAX_SEQUENCE_LENGTH,
};
use indexmap::IndexMap;
use jiki_types::ast::javascript::{AssignOp, Expr, ExprKind, TemplatePart, UpdateOp};
use jiki_types::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use jiki_types::{RuntimeError, RuntimeErrorType, Span};
use std::cell::RefCell;
use std::rc::Rc;

impl<'a> Evaluator<'a> {
    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    pub(super) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<JikiObject> {
        runtime::grow_stack(|| self.eval_expr_kind(expr))
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult<JikiObject> {
        match &expr.kind {
            // ── Literals ──
            ExprKind::Number(n) => Ok(JikiObject::Number(*n)),
            ExprKind::String(s) => Ok(JikiObject::string(s.clone())),
            ExprKind::Boolean(b) => Ok(JikiObject::Boolean(*b)),
            ExprKind::Null => Ok(JikiObject::Null),
            ExprKind::Undefined => Ok(JikiObject::Undefined),
            ExprKind::Template(parts) => self.eval_template(parts),
            ExprKind::Array(items) => {
                let values = self.eval_args(items)?;
                Ok(JikiObject::list(values))
            }
            ExprKind::Dictionary(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let value = self.eval_expr(value)?;
                    map.insert(key.clone(), value);
                }
                Ok(JikiObject::dictionary(map))
            }

            // ── Names ──
            ExprKind::Identifier(id) => self.eval_identifier(id),
            ExprKind::This => self
                .this
                .clone()
                .ok_or_else(|| type_error(expr.span, "'this' can only be used inside a class")),

            // ── Operators ──
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right, expr.span),
            ExprKind::Logical { left, op, right } => self.eval_logical(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.span),
            ExprKind::Update { op, prefix, target } => {
                self.eval_update(*op, *prefix, target, expr.span)
            }
            ExprKind::Assignment { target, op, value } => {
                self.eval_assignment(target, *op, value, expr.span)
            }
            ExprKind::Grouping(inner) => self.eval_expr(inner),

            // ── Access & calls ──
            ExprKind::Member { object, property } => self.eval_member(object, property, expr.span),
            ExprKind::Index { object, index } => self.eval_index(object, index),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr.span),
            ExprKind::New { class, args } => self.eval_new(class, args, expr.span),
        }
    }

    /// A condition value plus its boolean reading, after the truthiness guard.
    pub(super) fn eval_condition(&mut self, expr: &Expr) -> EvalResult<(JikiObject, bool)> {
        let value = self.eval_expr(expr)?;
        guards::check_condition(self.features, &value).map_err(|v| v.into_error(expr.span))?;
        let passed = value.is_truthy();
        Ok((value, passed))
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<JikiObject>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    fn eval_template(&mut self, parts: &[TemplatePart]) -> EvalResult<JikiObject> {
        let mut out = String::new();
        for part in parts {
            match part {
                TemplatePart::Text(text) => out.push_str(text),
                TemplatePart::Expr(expr) => {
                    let value = self.eval_expr(expr)?;
                    out.push_str(&value.to_display(Dialect::JavaScript));
                }
            }
        }
        Ok(JikiObject::String(out))
    }

    fn eval_identifier(&self, id: &Ident) -> EvalResult<JikiObject> {
        self.scope.get(&id.name).ok_or_else(|| {
            RuntimeError::new(RuntimeErrorType::VariableNotDeclared, id.span).with("name", &id.name)
        })
    }

    // ── Operators ─────────────────────────────────────────────────────

    fn eval_binary(
        &mut self,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
        span: Span,
    ) -> EvalResult<JikiObject> {
        guards::check_equality_operator(self.features, op).map_err(|v| v.into_error(span))?;
        let l = self.eval_expr(left)?;
        let r = self.eval_expr(right)?;
        match op {
            BinaryOp::StrictEq => Ok(JikiObject::Boolean(identical(&l, &r))),
            BinaryOp::StrictNotEq => Ok(JikiObject::Boolean(!identical(&l, &r))),
            BinaryOp::Eq => Ok(JikiObject::Boolean(loose_eq(&l, &r))),
            BinaryOp::NotEq => Ok(JikiObject::Boolean(!loose_eq(&l, &r))),
            BinaryOp::In => {
                guards::check_in_operand(self.features, &l, &r).map_err(|v| v.into_error(span))?;
                Ok(JikiObject::Boolean(has_key(&r, &l)))
            }
            op if op.is_ordering() => self.compare(op, &l, &r, span),
            op if op.is_arithmetic() => self.arithmetic(op, l, r, span),
            op => Err(unsupported(op.as_str(), &l, span)),
        }
    }

    fn arithmetic(
        &self,
        op: BinaryOp,
        l: JikiObject,
        r: JikiObject,
        span: Span,
    ) -> EvalResult<JikiObject> {
        guards::check_arithmetic(self.features, op, &l, &r).map_err(|v| v.into_error(span))?;
        if op == BinaryOp::Add
            && (matches!(l, JikiObject::String(_)) || matches!(r, JikiObject::String(_)))
        {
            let joined = format!(
                "{}{}",
                l.to_display(Dialect::JavaScript),
                r.to_display(Dialect::JavaScript)
            );
            if joined.len() > MAX_SEQUENCE_LENGTH {
                return Err(StdlibError::too_long("string").into_runtime(Dialect::JavaScript, span));
            }
            return Ok(JikiObject::String(joined));
        }
        let (a, b) = (to_number(&l), to_number(&r));
        let n = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Mod => a % b,
            BinaryOp::Pow => a.powf(b),
            _ => return Err(unsupported(op.as_str(), &l, span)),
        };
        Ok(JikiObject::number(n))
    }

    fn compare(
        &self,
        op: BinaryOp,
        l: &JikiObject,
        r: &JikiObject,
        span: Span,
    ) -> EvalResult<JikiObject> {
        let (a, b) = match (l, r) {
            (JikiObject::Number(a), JikiObject::Number(b)) => (*a, *b),
            _ if self.features.allow_type_coercion => (to_number(l), to_number(r)),
            _ => {
                return Err(
                    RuntimeError::new(RuntimeErrorType::ComparisonRequiresNumber, span)
                        .with("operator", op.as_str())
                        .with("left", l.type_name())
                        .with("right", r.type_name()),
                )
            }
        };
        let result = match op {
            BinaryOp::Less => a < b,
            BinaryOp::LessEq => a <= b,
            BinaryOp::Greater => a > b,
            _ => a >= b,
        };
        Ok(JikiObject::Boolean(result))
    }

    /// `&&` and `||` yield an operand, not a boolean.
    fn eval_logical(&mut self, left: &Expr, op: LogicalOp, right: &Expr) -> EvalResult<JikiObject> {
        let (l, passed) = self.eval_condition(left)?;
        let short_circuit = match op {
            LogicalOp::And => !passed,
            LogicalOp::Or => passed,
        };
        if short_circuit {
            return Ok(l);
        }
        let (r, _) = self.eval_condition(right)?;
        Ok(r)
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> EvalResult<JikiObject> {
        if op == UnaryOp::Not {
            let (_, passed) = self.eval_condition(operand)?;
            return Ok(JikiObject::Boolean(!passed));
        }
        let value = self.eval_expr(operand)?;
        let n = match &value {
            JikiObject::Number(n) => *n,
            other if self.features.allow_type_coercion => to_number(other),
            other => return Err(unsupported(op.as_str(), other, span)),
        };
        Ok(JikiObject::number(if op == UnaryOp::Neg { -n } else { n }))
    }

    fn eval_update(
        &mut self,
        op: UpdateOp,
        prefix: bool,
        target: &Expr,
        span: Span,
    ) -> EvalResult<JikiObject> {
        let old = self.eval_expr(target)?;
        let Some(n) = old.as_number() else {
            return Err(unsupported(op.as_str(), &old, span));
        };
        let new = JikiObject::number(match op {
            UpdateOp::Increment => n + 1.0,
            UpdateOp::Decrement => n - 1.0,
        });
        self.assign_to(target, new.clone(), span)?;
        Ok(if prefix { new } else { old })
    }

    fn eval_assignment(
        &mut self,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
        span: Span,
    ) -> EvalResult<JikiObject> {
        let new = match op.binary_op() {
            Some(binary) => {
                let current = self.eval_expr(target)?;
                let rhs = self.eval_expr(value)?;
                self.arithmetic(binary, current, rhs, span)?
            }
            None => self.eval_expr(value)?,
        };
        self.assign_to(target, new.clone(), span)?;
        Ok(new)
    }

    fn assign_to(&mut self, target: &Expr, value: JikiObject, span: Span) -> EvalResult<()> {
        match &target.kind {
            ExprKind::Identifier(id) => self.scope.assign(&id.name, value).map_err(|e| {
                let ty = match e {
                    AssignError::NotDeclared => RuntimeErrorType::VariableNotDeclared,
                    AssignError::Constant => RuntimeErrorType::AssignmentToConstant,
                };
                RuntimeError::new(ty, id.span).with("name", &id.name)
            }),
            ExprKind::Member { object, property } => {
                let object = self.eval_expr(object)?;
                self.set_member(&object, property, value, span)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let key = self.eval_expr(index)?;
                self.set_index(&object, &key, value, index.span)
            }
            _ => Err(type_error(span, "invalid assignment target")),
        }
    }

    fn set_member(
        &mut self,
        object: &JikiObject,
        property: &Ident,
        value: JikiObject,
        span: Span,
    ) -> EvalResult<()> {
        match object {
            JikiObject::Instance(instance) => {
                if let Some(setter) = instance.class.setters.get(&property.name) {
                    let setter = Rc::clone(setter);
                    let closure = Rc::clone(&instance.class.closure);
                    self.invoke(&setter, &closure, Some(object.clone()), vec![value], span)?;
                } else {
                    instance.fields.borrow_mut().insert(property.name.clone(), value);
                }
                Ok(())
            }
            JikiObject::Dictionary(entries) => {
                entries.borrow_mut().insert(property.name.clone(), value);
                Ok(())
            }
            other => Err(property_not_found(other, &property.name, property.span)),
        }
    }

    fn set_index(
        &mut self,
        object: &JikiObject,
        key: &JikiObject,
        value: JikiObject,
        span: Span,
    ) -> EvalResult<()> {
        match object {
            JikiObject::List(items) => {
                let Some(n) = key.as_number().filter(|n| n.fract() == 0.0) else {
                    return Err(type_error(
                        span,
                        format!("array indexes must be whole numbers, not {}", self.repr(key)),
                    ));
                };
                // Writes past the end leave `undefined` holes, up to the
                // longest list a program may build.
                if n < 0.0 || n >= MAX_SEQUENCE_LENGTH as f64 {
                    return Err(RuntimeError::new(RuntimeErrorType::IndexOutOfRange, span)
                        .with("index", self.repr(key)));
                }
                let index = n as usize;
                let mut items = items.borrow_mut();
                match items.get_mut(index) {
                    Some(slot) => *slot = value,
                    None => {
                        items.resize(index, JikiObject::Undefined);
                        items.push(value);
                    }
                }
                Ok(())
            }
            JikiObject::Dictionary(entries) => {
                entries.borrow_mut().insert(property_key(key), value);
                Ok(())
            }
            JikiObject::Instance(instance) => {
                instance.fields.borrow_mut().insert(property_key(key), value);
                Ok(())
            }
            other => Err(type_error(
                span,
                format!(
                    "cannot set {} on a {}",
                    key.to_display(Dialect::JavaScript),
                    other.type_name()
                ),
            )),
        }
    }

    // ── Member access ─────────────────────────────────────────────────

    fn eval_member(&mut self, object: &Expr, property: &Ident, span: Span) -> EvalResult<JikiObject> {
        if let Some(table) = self.namespace(object)? {
            return namespace_member(table, property);
        }
        let target = self.eval_expr(object)?;
        self.get_member(&target, property, span)
    }

    /// `console` or `Math`, when `expr` names one that no binding hides.
    fn namespace(&self, expr: &Expr) -> EvalResult<Option<&'static TypeTable>> {
        let ExprKind::Identifier(id) = &expr.kind else {
            return Ok(None);
        };
        if self.scope.lookup(&id.name).is_some() {
            return Ok(None);
        }
        let Some(table) = stdlib::javascript_namespace(&id.name) else {
            return Ok(None);
        };
        guards::check_global(self.features, &id.name).map_err(|v| v.into_error(id.span))?;
        Ok(Some(table))
    }

    fn get_member(
        &mut self,
        object: &JikiObject,
        property: &Ident,
        span: Span,
    ) -> EvalResult<JikiObject> {
        let name = property.name.as_str();
        match object {
            JikiObject::Instance(instance) => {
                if let Some(getter) = instance.class.getters.get(name) {
                    let getter = Rc::clone(getter);
                    let closure = Rc::clone(&instance.class.closure);
                    return self.invoke(&getter, &closure, Some(object.clone()), Vec::new(), span);
                }
                if let Some(value) = instance.fields.borrow().get(name) {
                    return Ok(value.clone());
                }
                match instance.class.methods.get(name) {
                    Some(method) => Ok(JikiObject::function(Callable::User(UserFunction {
                        body: FunctionBody::JavaScript(Rc::clone(method)),
                        closure: Rc::clone(&instance.class.closure),
                        this: Some(object.clone()),
                    }))),
                    None => Err(property_not_found(object, name, property.span)),
                }
            }
            JikiObject::Dictionary(entries) => {
                Ok(entries.borrow().get(name).cloned().unwrap_or(JikiObject::Undefined))
            }
            _ => match stdlib::javascript_table(object) {
                Some(table) => self.stdlib_member(object, table, property),
                None => Err(property_not_found(object, name, property.span)),
            },
        }
    }

    fn stdlib_member(
        &self,
        object: &JikiObject,
        table: &'static TypeTable,
        property: &Ident,
    ) -> EvalResult<JikiObject> {
        let name = property.name.as_str();
        if let Some(prop) = table.property(name) {
            guards::check_stdlib_member(self.features, table.name, name, false)
                .map_err(|v| v.into_error(property.span))?;
            return Ok((prop.get)(object));
        }
        if let Some(method) = table.method(name) {
            guards::check_stdlib_member(self.features, table.name, name, true)
                .map_err(|v| v.into_error(property.span))?;
            return Ok(JikiObject::function(Callable::Stdlib {
                receiver: object.clone(),
                method,
            }));
        }
        Err(property_not_found(object, name, property.span))
    }

    /// Out-of-range reads yield `undefined`.
    fn eval_index(&mut self, object: &Expr, index: &Expr) -> EvalResult<JikiObject> {
        let target = self.eval_expr(object)?;
        let key = self.eval_expr(index)?;
        let position = key
            .as_number()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as usize);
        let value = match (&target, position) {
            (JikiObject::List(items), Some(i)) => items.borrow().get(i).cloned(),
            (JikiObject::String(s), Some(i)) => s.chars().nth(i).map(|c| JikiObject::String(c.into())),
            (JikiObject::Dictionary(entries), _) => entries.borrow().get(&property_key(&key)).cloned(),
            (JikiObject::Instance(instance), _) => {
                instance.fields.borrow().get(&property_key(&key)).cloned()
            }
            (JikiObject::Null | JikiObject::Undefined, _) => {
                return Err(type_error(
                    index.span,
                    format!(
                        "cannot read {} of {}",
                        key.to_display(Dialect::JavaScript),
                        target.type_name()
                    ),
                ))
            }
            _ => None,
        };
        Ok(value.unwrap_or(JikiObject::Undefined))
    }

    // ── Calls ─────────────────────────────────────────────────────────

    fn eval_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> EvalResult<JikiObject> {
        if let ExprKind::Identifier(id) = &callee.kind {
            if self.scope.lookup(&id.name).is_none() {
                return Err(RuntimeError::new(RuntimeErrorType::FunctionNotFound, id.span)
                    .with("name", &id.name));
            }
        }
        let function = self.eval_expr(callee)?;
        let args = self.eval_args(args)?;
        if !function.is_callable() {
            return Err(type_error(
                callee.span,
                format!("{} is not a function", self.recorder.code(callee.span)),
            ));
        }
        self.call_value(&function, args, span)
    }

    fn eval_new(&mut self, class: &Ident, args: &[Expr], span: Span) -> EvalResult<JikiObject> {
        let callable = match self.scope.get(&class.name) {
            Some(JikiObject::Function(callable)) => Some(callable),
            Some(_) => None,
            None => {
                return Err(RuntimeError::new(RuntimeErrorType::VariableNotDeclared, class.span)
                    .with("name", &class.name))
            }
        };
        let Some(Callable::Class(def)) = callable.as_deref() else {
            return Err(type_error(
                class.span,
                format!("{} is not a class", class.name),
            ));
        };
        let def = Rc::clone(def);
        let args = self.eval_args(args)?;
        let instance = JikiObject::Instance(Rc::new(Instance {
            class: Rc::clone(&def),
            fields: RefCell::new(IndexMap::new()),
        }));
        match &def.constructor {
            Some(constructor) => {
                if constructor.params.len() != args.len() {
                    return Err(runtime::arity_error(
                        &def.name,
                        constructor.params.len(),
                        args.len(),
                        span,
                    ));
                }
                self.invoke(constructor, &def.closure, Some(instance.clone()), args, span)?;
            }
            None if !args.is_empty() => {
                return Err(runtime::arity_error(&def.name, 0, args.len(), span));
            }
            None => {}
        }
        Ok(instance)
    }
}

fn namespace_member(table: &'static TypeTable, property: &Ident) -> EvalResult<JikiObject> {
    if let Some(prop) = table.property(&property.name) {
        return Ok((prop.get)(&JikiObject::Undefined));
    }
    match table.method(&property.name) {
        Some(method) => Ok(JikiObject::function(Callable::Builtin(method))),
        None => Err(RuntimeError::new(RuntimeErrorType::PropertyNotFound, property.span)
            .with("type", table.name)
            .with("property", &property.name)),
    }
}

fn property_not_found(object: &JikiObject, property: &str, span: Span) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::PropertyNotFound, span)
        .with("type", object.type_name())
        .with("property", property)
}

fn unsupported(operator: &str, operand: &JikiObject, span: Span) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::UnsupportedOperation, span)
        .with("operator", operator)
        .with("type", operand.type_name())
}

/// Dictionary keys are strings; numbers use their printed form.
fn property_key(key: &JikiObject) -> String {
    key.to_display(Dialect::JavaScript)
}

/// Whether `key in object` holds. Operands already passed the `in` guard.
fn has_key(object: &JikiObject, key: &JikiObject) -> bool {
    match object {
        JikiObject::List(items) => {
            let len = items.borrow().len();
            match key {
                JikiObject::Number(n) => *n >= 0.0 && n.fract() == 0.0 && (*n as usize) < len,
                JikiObject::String(s) => s.parse::<usize>().is_ok_and(|i| i < len),
                _ => false,
            }
        }
        JikiObject::Dictionary(entries) => entries.borrow().contains_key(&property_key(key)),
        JikiObject::Instance(instance) => {
            let name = property_key(key);
            instance.fields.borrow().contains_key(&name)
                || instance.class.getters.contains_key(&name)
                || instance.class.methods.contains_key(&name)
        }
        _ => false,
    }
}

/// JavaScript's `ToNumber` for the primitive types.
fn to_number(value: &JikiObject) -> f64 {
    match value {
        JikiObject::Number(n) => *n,
        JikiObject::Boolean(b) => f64::from(u8::from(*b)),
        JikiObject::Null => 0.0,
        JikiObject::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

/// `==` without the strict-equality guard: `null == undefined`, and
/// primitives of different types compare as numbers.
fn loose_eq(a: &JikiObject, b: &JikiObject) -> bool {
    match (a, b) {
        (JikiObject::Null | JikiObject::Undefined, JikiObject::Null | JikiObject::Undefined) => true,
        (JikiObject::Null | JikiObject::Undefined, _) | (_, JikiObject::Null | JikiObject::Undefined) => {
            false
        }
        (
            JikiObject::Number(_) | JikiObject::String(_) | JikiObject::Boolean(_),
            JikiObject::Number(_) | JikiObject::String(_) | JikiObject::Boolean(_),
        ) if std::mem::discriminant(a) != std::mem::discriminant(b) => to_number(a) == to_number(b),
        _ => identical(a, b),
    }
}
