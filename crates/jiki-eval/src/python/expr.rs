use super::Evaluator;
use crate::error::{EvalResult, StdlibError};
use crate::guards;
use crate::runtime;
use crate::stdlib::{self, python_type_name, resolve_index};
use crate::value::{
    repeated_length, structural_eq, Callable, Dialect, JikiObject, MAX_SEQUENCE_LENGTH,
};
use indexmap::IndexMap;
use jiki_types::ast::python::{Expr, ExprKind, FStringPart};
use jiki_types::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use jiki_types::{RuntimeError, RuntimeErrorType, Span};
use std::cmp::Ordering;

impl<'a> Evaluator<'a> {
    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    pub(super) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<JikiObject> {
        runtime::grow_stack(|| self.eval_expr_kind(expr))
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult<JikiObject> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(JikiObject::Number(*n)),
            ExprKind::String(s) => Ok(JikiObject::string(s.clone())),
            ExprKind::Boolean(b) => Ok(JikiObject::Boolean(*b)),
            ExprKind::None => Ok(JikiObject::Null),
            ExprKind::FString(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        FStringPart::Text(text) => out.push_str(text),
                        FStringPart::Expr(expr) => {
                            let value = self.eval_expr(expr)?;
                            out.push_str(&value.to_display(Dialect::Python));
                        }
                    }
                }
                Ok(JikiObject::String(out))
            }
            ExprKind::Identifier(id) => self.eval_identifier(id),
            ExprKind::List(items) => {
                let values = self.eval_args(items)?;
                Ok(JikiObject::list(values))
            }
            ExprKind::Dictionary(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let k = self.eval_expr(key)?;
                    let k = dict_key(&k, key.span)?;
                    let v = self.eval_expr(value)?;
                    map.insert(k, v);
                }
                Ok(JikiObject::dictionary(map))
            }
            ExprKind::Binary { left, op, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                self.binary(*op, l, r, expr.span)
            }
            ExprKind::Logical { left, op, right } => {
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
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.span),
            ExprKind::Call { callee, args } => {
                let function = self.eval_expr(callee)?;
                let args = self.eval_args(args)?;
                self.call_value(&function, args, expr.span)
            }
            ExprKind::Attribute { object, name } => {
                let target = self.eval_expr(object)?;
                self.attribute(&target, name)
            }
            ExprKind::Subscript { object, index } => {
                let target = self.eval_expr(object)?;
                let key = self.eval_expr(index)?;
                get_item(&target, &key, index.span)
            }
            ExprKind::Grouping(inner) => self.eval_expr(inner),
        }
    }

    pub(super) fn eval_condition(&mut self, expr: &Expr) -> EvalResult<(JikiObject, bool)> {
        let value = self.eval_expr(expr)?;
        guards::check_condition(self.features, &value).map_err(|v| v.into_error(expr.span))?;
        let passed = value.is_truthy();
        Ok((value, passed))
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<JikiObject>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Local and enclosing names first, then builtins.
    fn eval_identifier(&self, id: &Ident) -> EvalResult<JikiObject> {
        if let Some(value) = self.scope.get(&id.name) {
            return Ok(value);
        }
        if let Some(method) = stdlib::python_builtin(&id.name) {
            guards::check_global(self.features, &id.name).map_err(|v| v.into_error(id.span))?;
            return Ok(JikiObject::function(Callable::Builtin(method)));
        }
        Err(RuntimeError::new(RuntimeErrorType::UndefinedVariable, id.span).with("name", &id.name))
    }

    fn attribute(&self, target: &JikiObject, name: &Ident) -> EvalResult<JikiObject> {
        let attribute_error = || {
            RuntimeError::new(RuntimeErrorType::AttributeError, name.span)
                .with("type", python_type_name(target))
                .with("attribute", &name.name)
        };
        let table = stdlib::python_table(target).ok_or_else(attribute_error)?;
        let method = table.method(&name.name).ok_or_else(attribute_error)?;
        guards::check_stdlib_member(self.features, table.name, &name.name, true)
            .map_err(|v| v.into_error(name.span))?;
        Ok(JikiObject::function(Callable::Stdlib {
            receiver: target.clone(),
            method,
        }))
    }

    // ── Operators ─────────────────────────────────────────────────────

    pub(super) fn binary(
        &self,
        op: BinaryOp,
        l: JikiObject,
        r: JikiObject,
        span: Span,
    ) -> EvalResult<JikiObject> {
        match op {
            BinaryOp::Eq | BinaryOp::StrictEq => Ok(JikiObject::Boolean(structural_eq(&l, &r))),
            BinaryOp::NotEq | BinaryOp::StrictNotEq => {
                Ok(JikiObject::Boolean(!structural_eq(&l, &r)))
            }
            BinaryOp::In => contains(&r, &l, span).map(JikiObject::Boolean),
            BinaryOp::NotIn => contains(&r, &l, span).map(|found| JikiObject::Boolean(!found)),
            op if op.is_ordering() => {
                let ordering = compare(&l, &r, op, span)?;
                let result = match op {
                    BinaryOp::Less => ordering == Ordering::Less,
                    BinaryOp::LessEq => ordering != Ordering::Greater,
                    BinaryOp::Greater => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                };
                Ok(JikiObject::Boolean(result))
            }
            _ => self.arithmetic(op, l, r, span),
        }
    }

    fn arithmetic(
        &self,
        op: BinaryOp,
        l: JikiObject,
        r: JikiObject,
        span: Span,
    ) -> EvalResult<JikiObject> {
        match (op, &l, &r) {
            (_, JikiObject::Number(a), JikiObject::Number(b)) => numeric(op, *a, *b, span),
            (BinaryOp::Add, JikiObject::String(a), JikiObject::String(b)) => {
                within_limit(a.len() + b.len(), "string", span)?;
                Ok(JikiObject::String(format!("{a}{b}")))
            }
            (BinaryOp::Add, JikiObject::List(a), JikiObject::List(b)) => {
                let mut items = a.borrow().clone();
                within_limit(items.len() + b.borrow().len(), "list", span)?;
                items.extend(b.borrow().iter().cloned());
                Ok(JikiObject::list(items))
            }
            (BinaryOp::Mul, JikiObject::String(s), JikiObject::Number(n))
            | (BinaryOp::Mul, JikiObject::Number(n), JikiObject::String(s))
                if n.fract() == 0.0 =>
            {
                let count = n.max(0.0);
                repeated_length(s.len(), count).ok_or_else(|| too_long("string", span))?;
                Ok(JikiObject::String(s.repeat(count as usize)))
            }
            (BinaryOp::Mul, JikiObject::List(items), JikiObject::Number(n))
            | (BinaryOp::Mul, JikiObject::Number(n), JikiObject::List(items))
                if n.fract() == 0.0 =>
            {
                let items = items.borrow();
                let count = n.max(0.0);
                let len = repeated_length(items.len(), count).ok_or_else(|| too_long("list", span))?;
                let mut out = Vec::with_capacity(len);
                if !items.is_empty() {
                    for _ in 0..count as usize {
                        out.extend(items.iter().cloned());
                    }
                }
                Ok(JikiObject::list(out))
            }
            _ => {
                guards::check_arithmetic(self.features, op, &l, &r)
                    .map_err(|v| v.into_error(span))?;
                match (as_number(&l), as_number(&r)) {
                    (Some(a), Some(b)) => numeric(op, a, b, span),
                    _ => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
                        "details",
                        format!(
                            "unsupported operand type(s) for {}: '{}' and '{}'",
                            op.as_str(),
                            python_type_name(&l),
                            python_type_name(&r)
                        ),
                    )),
                }
            }
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> EvalResult<JikiObject> {
        if op == UnaryOp::Not {
            let (_, passed) = self.eval_condition(operand)?;
            return Ok(JikiObject::Boolean(!passed));
        }
        let value = self.eval_expr(operand)?;
        match value {
            JikiObject::Number(n) => Ok(JikiObject::number(if op == UnaryOp::Neg { -n } else { n })),
            other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
                "details",
                format!(
                    "bad operand type for unary {}: '{}'",
                    op.as_str(),
                    python_type_name(&other)
                ),
            )),
        }
    }
}

/// Booleans count as numbers once the coercion guard has passed.
fn as_number(value: &JikiObject) -> Option<f64> {
    match value {
        JikiObject::Number(n) => Some(*n),
        JikiObject::Boolean(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

fn numeric(op: BinaryOp, a: f64, b: f64, span: Span) -> EvalResult<JikiObject> {
    let divides = matches!(op, BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod);
    if divides && b == 0.0 {
        return Err(RuntimeError::new(RuntimeErrorType::ZeroDivisionError, span));
    }
    let n = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        // Floored: the result takes the sign of the divisor.
        BinaryOp::Mod => a - b * (a / b).floor(),
        BinaryOp::Pow => a.powf(b),
        other => {
            return Err(RuntimeError::new(RuntimeErrorType::TypeError, span)
                .with("details", format!("unsupported operator {}", other.as_str())))
        }
    };
    Ok(JikiObject::number(n))
}

fn compare(l: &JikiObject, r: &JikiObject, op: BinaryOp, span: Span) -> EvalResult<Ordering> {
    match (l, r) {
        (JikiObject::Number(a), JikiObject::Number(b)) => {
            Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal))
        }
        (JikiObject::String(a), JikiObject::String(b)) => Ok(a.cmp(b)),
        _ => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
            "details",
            format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.as_str(),
                python_type_name(l),
                python_type_name(r)
            ),
        )),
    }
}

/// `needle in haystack`.
fn contains(haystack: &JikiObject, needle: &JikiObject, span: Span) -> EvalResult<bool> {
    match haystack {
        JikiObject::List(items) => Ok(items.borrow().iter().any(|item| structural_eq(item, needle))),
        JikiObject::String(s) => match needle {
            JikiObject::String(sub) => Ok(s.contains(sub.as_str())),
            other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
                "details",
                format!(
                    "'in <string>' requires string as left operand, not {}",
                    python_type_name(other)
                ),
            )),
        },
        JikiObject::Dictionary(entries) => {
            let key = dict_key(needle, span)?;
            Ok(entries.borrow().contains_key(&key))
        }
        other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
            "details",
            format!("argument of type '{}' is not iterable", python_type_name(other)),
        )),
    }
}

fn too_long(what: &str, span: Span) -> RuntimeError {
    StdlibError::too_long(what).into_runtime(Dialect::Python, span)
}

fn within_limit(len: usize, what: &str, span: Span) -> EvalResult<()> {
    if len > MAX_SEQUENCE_LENGTH {
        return Err(too_long(what, span));
    }
    Ok(())
}

/// `object[key]` for lists, strings and dictionaries.
fn get_item(target: &JikiObject, key: &JikiObject, span: Span) -> EvalResult<JikiObject> {
    match target {
        JikiObject::List(items) => {
            let index = integer_index(key, "list", span)?;
            let items = items.borrow();
            resolve_index(index, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| index_error(index, items.len(), span))
        }
        JikiObject::String(s) => {
            let index = integer_index(key, "string", span)?;
            let chars: Vec<char> = s.chars().collect();
            resolve_index(index, chars.len())
                .map(|i| JikiObject::String(chars[i].to_string()))
                .ok_or_else(|| index_error(index, chars.len(), span))
        }
        JikiObject::Dictionary(entries) => {
            let k = dict_key(key, span)?;
            entries.borrow().get(&k).cloned().ok_or_else(|| {
                RuntimeError::new(RuntimeErrorType::KeyError, span)
                    .with("key", key.to_repr(Dialect::Python))
            })
        }
        other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
            "details",
            format!("'{}' object is not subscriptable", python_type_name(other)),
        )),
    }
}

fn index_error(index: i64, length: usize, span: Span) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::IndexError, span)
        .with("index", index.to_string())
        .with("length", length.to_string())
}

pub(super) fn integer_index(key: &JikiObject, container: &str, span: Span) -> EvalResult<i64> {
    match key {
        JikiObject::Number(n) if n.fract() == 0.0 && n.is_finite() => Ok(*n as i64),
        other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
            "details",
            format!(
                "{container} indices must be integers, not {}",
                python_type_name(other)
            ),
        )),
    }
}

/// Dictionary keys are stored as text; numbers use their printed form.
pub(super) fn dict_key(key: &JikiObject, span: Span) -> EvalResult<String> {
    match key {
        JikiObject::String(s) => Ok(s.clone()),
        JikiObject::Number(_) | JikiObject::Boolean(_) => Ok(key.to_display(Dialect::Python)),
        other => Err(RuntimeError::new(RuntimeErrorType::TypeError, span).with(
            "details",
            format!("unhashable type: '{}'", python_type_name(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floored_modulo_and_division() {
        let span = Span::default();
        let m = numeric(BinaryOp::Mod, -7.0, 3.0, span).unwrap();
        assert_eq!(m.as_number(), Some(2.0));
        let f = numeric(BinaryOp::FloorDiv, -7.0, 2.0, span).unwrap();
        assert_eq!(f.as_number(), Some(-4.0));
        let err = numeric(BinaryOp::Div, 1.0, 0.0, span).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::ZeroDivisionError);
    }

    #[test]
    fn test_get_item_negative_and_missing() {
        let span = Span::default();
        let list = JikiObject::list(vec![JikiObject::Number(1.0), JikiObject::Number(2.0)]);
        let last = get_item(&list, &JikiObject::Number(-1.0), span).unwrap();
        assert_eq!(last.as_number(), Some(2.0));
        let err = get_item(&list, &JikiObject::Number(5.0), span).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::IndexError);
        let dict = JikiObject::dictionary(IndexMap::new());
        let err = get_item(&dict, &JikiObject::string("a"), span).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::KeyError);
        assert_eq!(err.context.get("key"), Some("\"a\""));
    }

    #[test]
    fn test_contains() {
        let span = Span::default();
        let s = JikiObject::string("hello");
        assert!(contains(&s, &JikiObject::string("ell"), span).unwrap());
        assert!(contains(&JikiObject::Number(1.0), &s, span).is_err());
    }
}
