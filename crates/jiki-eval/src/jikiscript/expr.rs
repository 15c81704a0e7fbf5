use super::{violation, Evaluator};
use crate::error::{EvalResult, StdlibError};
use crate::guards;
use crate::runtime;
use crate::value::{structural_eq, Dialect, JikiObject, MAX_SEQUENCE_LENGTH};
use indexmap::IndexMap;
use jiki_types::ast::jikiscript::{Expr, ExprKind};
use jiki_types::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use jiki_types::{RuntimeError, RuntimeErrorType, Span};

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
            ExprKind::Number(n) => Ok(JikiObject::number(*n)),
            ExprKind::String(s) => Ok(JikiObject::string(s.clone())),
            ExprKind::Boolean(b) => Ok(JikiObject::Boolean(*b)),
            ExprKind::List(items) => {
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
            ExprKind::Variable(id) => self.eval_variable(id),

            // ── Operators ──
            ExprKind::Binary { left, op, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                binary(self.features.allow_type_coercion, *op, &l, &r, expr.span)
            }
            ExprKind::Logical { left, op, right } => {
                let passed = self.eval_condition(left)?;
                let short_circuit = match op {
                    LogicalOp::And => !passed,
                    LogicalOp::Or => passed,
                };
                if short_circuit {
                    return Ok(JikiObject::Boolean(passed));
                }
                let passed = self.eval_condition(right)?;
                Ok(JikiObject::Boolean(passed))
            }
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Not => {
                    let passed = self.eval_condition(operand)?;
                    Ok(JikiObject::Boolean(!passed))
                }
                UnaryOp::Neg | UnaryOp::Plus => {
                    let value = self.eval_expr(operand)?;
                    let n = numeric(&value, operand.span)?;
                    let n = if *op == UnaryOp::Neg { -n } else { n };
                    Ok(JikiObject::number(n))
                }
            },
            ExprKind::Grouping(inner) => self.eval_expr(inner),

            // ── Access ──
            ExprKind::Index { object, index } => {
                let target = self.eval_expr(object)?;
                let key = self.eval_expr(index)?;
                get_index(&target, &key, index.span)
            }
            ExprKind::Call { name, args } => {
                let args = self.eval_args(args)?;
                self.call_named(&name.name, args, expr.span)
            }
        }
    }

    /// A condition must be a boolean unless truthiness is switched on.
    pub(super) fn eval_condition(&mut self, expr: &Expr) -> EvalResult<bool> {
        let value = self.eval_expr(expr)?;
        guards::check_condition(self.features, &value).map_err(|v| violation(v, expr.span))?;
        Ok(value.is_truthy())
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<JikiObject>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Functions can only appear called; naming one without `()` is an error.
    fn eval_variable(&self, id: &Ident) -> EvalResult<JikiObject> {
        match self.scope.get(&id.name) {
            Some(JikiObject::Function(_)) => Err(uncalled(id)),
            Some(value) => Ok(value),
            None if self.library_function(&id.name).is_some() => Err(uncalled(id)),
            None => Err(RuntimeError::new(RuntimeErrorType::VariableNotDeclared, id.span)
                .with("name", &id.name)),
        }
    }
}

fn uncalled(id: &Ident) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::UnexpectedUncalledFunctionInExpression, id.span)
        .with("name", &id.name)
}

fn numeric(value: &JikiObject, span: Span) -> EvalResult<f64> {
    match value {
        JikiObject::Number(n) => Ok(*n),
        other => Err(
            RuntimeError::new(RuntimeErrorType::TypeErrorOperandMustBeNumericValue, span)
                .with("type", other.type_name()),
        ),
    }
}

fn binary(
    coercion: bool,
    op: BinaryOp,
    l: &JikiObject,
    r: &JikiObject,
    span: Span,
) -> EvalResult<JikiObject> {
    match op {
        BinaryOp::Eq | BinaryOp::StrictEq | BinaryOp::NotEq | BinaryOp::StrictNotEq => {
            if let (JikiObject::List(_), JikiObject::List(_)) = (l, r) {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeErrorCannotCompareListObjects,
                    span,
                ));
            }
            let equal = structural_eq(l, r);
            let negated = matches!(op, BinaryOp::NotEq | BinaryOp::StrictNotEq);
            Ok(JikiObject::Boolean(equal != negated))
        }
        BinaryOp::Add => match (l, r) {
            (JikiObject::Number(a), JikiObject::Number(b)) => Ok(JikiObject::number(a + b)),
            (JikiObject::String(a), JikiObject::String(b)) => {
                if a.len() + b.len() > MAX_SEQUENCE_LENGTH {
                    return Err(StdlibError::too_long("string").into_runtime(Dialect::JikiScript, span));
                }
                Ok(JikiObject::String(format!("{a}{b}")))
            }
            (JikiObject::String(_), _) | (_, JikiObject::String(_)) if coercion => {
                Ok(JikiObject::String(format!(
                    "{}{}",
                    l.to_display(Dialect::JikiScript),
                    r.to_display(Dialect::JikiScript)
                )))
            }
            _ => Err(RuntimeError::new(
                RuntimeErrorType::TypeErrorOperandsMustBeTwoNumbersOrTwoStrings,
                span,
            )
            .with("left", l.type_name())
            .with("right", r.type_name())),
        },
        BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
            let a = numeric(l, span)?;
            let b = numeric(r, span)?;
            Ok(JikiObject::Boolean(match op {
                BinaryOp::Less => a < b,
                BinaryOp::LessEq => a <= b,
                BinaryOp::Greater => a > b,
                _ => a >= b,
            }))
        }
        BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::FloorDiv
        | BinaryOp::Mod
        | BinaryOp::Pow => {
            let a = numeric(l, span)?;
            let b = numeric(r, span)?;
            let n = match op {
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::FloorDiv => (a / b).floor(),
                BinaryOp::Mod => a % b,
                _ => a.powf(b),
            };
            Ok(JikiObject::number(n))
        }
        BinaryOp::In | BinaryOp::NotIn => Err(RuntimeError::new(
            RuntimeErrorType::UnsupportedOperation,
            span,
        )
        .with("operator", op.as_str())
        .with("type", r.type_name())),
    }
}

// ── Indexing ─────────────────────────────────────────────────────────

/// Validate a 1-based list or string position.
pub(super) fn position(key: &JikiObject, span: Span) -> EvalResult<usize> {
    let n = numeric(key, span)?;
    if n.fract() != 0.0 {
        return Err(
            RuntimeError::new(RuntimeErrorType::TypeErrorOperandMustBeNumericValue, span)
                .with("type", "fraction"),
        );
    }
    if n < 1.0 {
        return Err(RuntimeError::new(
            RuntimeErrorType::RangeErrorArrayIndexIsZeroBased,
            span,
        ));
    }
    Ok(n as usize)
}

/// `target[key]`: 1-based for lists and strings, string keys for dictionaries.
pub(super) fn get_index(target: &JikiObject, key: &JikiObject, span: Span) -> EvalResult<JikiObject> {
    let out_of_range = |index: usize, length: usize| {
        RuntimeError::new(RuntimeErrorType::IndexOutOfRangeForArrayAccess, span)
            .with("index", index.to_string())
            .with("length", length.to_string())
    };
    match target {
        JikiObject::List(items) => {
            let index = position(key, span)?;
            let items = items.borrow();
            items
                .get(index - 1)
                .cloned()
                .ok_or_else(|| out_of_range(index, items.len()))
        }
        JikiObject::String(s) => {
            let index = position(key, span)?;
            s.chars()
                .nth(index - 1)
                .map(|c| JikiObject::String(c.to_string()))
                .ok_or_else(|| out_of_range(index, s.chars().count()))
        }
        JikiObject::Dictionary(entries) => {
            let JikiObject::String(k) = key else {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeErrorOperandMustBeStringValue,
                    span,
                )
                .with("type", key.type_name()));
            };
            entries.borrow().get(k).cloned().ok_or_else(|| {
                RuntimeError::new(RuntimeErrorType::MissingDictionaryKeyInAccess, span)
                    .with("key", k)
            })
        }
        other => Err(RuntimeError::new(
            RuntimeErrorType::InvalidIndexGetterTargetNotIndexable,
            span,
        )
        .with("type", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> JikiObject {
        JikiObject::Number(n)
    }

    fn err_type(result: EvalResult<JikiObject>) -> RuntimeErrorType {
        match result {
            Err(err) => err.error_type,
            Ok(value) => panic!("expected an error, got {value:?}"),
        }
    }

    #[test]
    fn test_positions_are_one_based() {
        let span = Span::default();
        assert_eq!(position(&num(1.0), span).map_err(|e| e.error_type), Ok(1));
        let err = position(&num(0.0), span).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::RangeErrorArrayIndexIsZeroBased);
        let err = position(&JikiObject::string("1"), span).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::TypeErrorOperandMustBeNumericValue);
    }

    #[test]
    fn test_get_index() {
        let span = Span::default();
        let list = JikiObject::list(vec![num(10.0), num(20.0)]);
        assert!(matches!(get_index(&list, &num(2.0), span), Ok(JikiObject::Number(n)) if n == 20.0));
        let err = get_index(&list, &num(3.0), span).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::IndexOutOfRangeForArrayAccess);
        assert_eq!(err.context.get("length"), Some("2"));

        let word = JikiObject::string("abc");
        assert!(matches!(get_index(&word, &num(1.0), span), Ok(JikiObject::String(s)) if s == "a"));

        let mut map = IndexMap::new();
        map.insert("a".to_string(), num(1.0));
        let dict = JikiObject::dictionary(map);
        assert_eq!(
            err_type(get_index(&dict, &JikiObject::string("b"), span)),
            RuntimeErrorType::MissingDictionaryKeyInAccess
        );
        assert_eq!(
            err_type(get_index(&num(1.0), &num(1.0), span)),
            RuntimeErrorType::InvalidIndexGetterTargetNotIndexable
        );
    }

    #[test]
    fn test_binary_operators() {
        let span = Span::default();
        let sum = binary(false, BinaryOp::Add, &num(1.0), &num(2.0), span);
        assert!(matches!(sum, Ok(JikiObject::Number(n)) if n == 3.0));
        let joined = binary(false, BinaryOp::Add, &JikiObject::string("a"), &JikiObject::string("b"), span);
        assert!(matches!(joined, Ok(JikiObject::String(s)) if s == "ab"));
        assert_eq!(
            err_type(binary(false, BinaryOp::Add, &num(1.0), &JikiObject::string("b"), span)),
            RuntimeErrorType::TypeErrorOperandsMustBeTwoNumbersOrTwoStrings
        );
        let coerced = binary(true, BinaryOp::Add, &num(1.0), &JikiObject::string("b"), span);
        assert!(matches!(coerced, Ok(JikiObject::String(s)) if s == "1b"));
        assert_eq!(
            err_type(binary(false, BinaryOp::Less, &JikiObject::Boolean(true), &num(2.0), span)),
            RuntimeErrorType::TypeErrorOperandMustBeNumericValue
        );
        let lists = JikiObject::list(vec![]);
        assert_eq!(
            err_type(binary(false, BinaryOp::Eq, &lists, &lists, span)),
            RuntimeErrorType::TypeErrorCannotCompareListObjects
        );
        let ne = binary(false, BinaryOp::NotEq, &num(1.0), &num(2.0), span);
        assert!(matches!(ne, Ok(JikiObject::Boolean(true))));
    }
}
