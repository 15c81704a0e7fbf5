//! Footgun guards.
//!
//! Each guard is a predicate over the run's [`LanguageFeatures`] and the
//! values involved. A failed guard yields a [`Violation`]; the evaluator
//! attaches a span and records it as the run's error frame.

use crate::scope::Scope;
use crate::value::JikiObject;
use jiki_types::ast::BinaryOp;
use jiki_types::{LanguageFeatures, RuntimeError, RuntimeErrorType, Span};
use tracing::warn;

/// A guard that refused an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub error_type: RuntimeErrorType,
    context: Vec<(&'static str, String)>,
}

pub type GuardResult = Result<(), Violation>;

impl Violation {
    fn new(error_type: RuntimeErrorType) -> Self {
        warn!(target: "jiki::eval", guard = error_type.as_str(), "guard refused operation");
        Self {
            error_type,
            context: Vec::new(),
        }
    }

    pub(crate) fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Report under a different catalog entry, keeping the context.
    pub fn retype(mut self, error_type: RuntimeErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    pub fn into_error(self, span: Span) -> RuntimeError {
        self.context
            .into_iter()
            .fold(RuntimeError::new(self.error_type, span), |err, (k, v)| {
                err.with(k, v)
            })
    }
}

/// Mixed-type arithmetic or concatenation.
///
/// `+` accepts two numbers or two strings; the other arithmetic operators
/// accept only numbers.
pub fn check_arithmetic(
    features: &LanguageFeatures,
    op: BinaryOp,
    left: &JikiObject,
    right: &JikiObject,
) -> GuardResult {
    if features.allow_type_coercion {
        return Ok(());
    }
    let ok = match (left, right) {
        (JikiObject::Number(_), JikiObject::Number(_)) => true,
        (JikiObject::String(_), JikiObject::String(_)) => op == BinaryOp::Add,
        _ => false,
    };
    if ok {
        return Ok(());
    }
    Err(Violation::new(RuntimeErrorType::TypeCoercionNotAllowed)
        .with("operator", op.as_str())
        .with("left", left.type_name())
        .with("right", right.type_name()))
}

/// A non-boolean used where a condition is expected.
pub fn check_condition(features: &LanguageFeatures, value: &JikiObject) -> GuardResult {
    if features.allow_truthiness || matches!(value, JikiObject::Boolean(_)) {
        return Ok(());
    }
    Err(Violation::new(RuntimeErrorType::TruthinessDisabled).with("type", value.type_name()))
}

/// Loose `==`/`!=` while strict equality is enforced.
pub fn check_equality_operator(features: &LanguageFeatures, op: BinaryOp) -> GuardResult {
    let suggestion = match op {
        BinaryOp::Eq => "===",
        BinaryOp::NotEq => "!==",
        _ => return Ok(()),
    };
    if !features.enforce_strict_equality {
        return Ok(());
    }
    Err(Violation::new(RuntimeErrorType::StrictEqualityRequired)
        .with("operator", op.as_str())
        .with("suggestion", suggestion))
}

/// Introducing `name` into `scope`.
pub fn check_declaration(features: &LanguageFeatures, scope: &Scope, name: &str) -> GuardResult {
    if scope.has_local(name) {
        return Err(Violation::new(RuntimeErrorType::VariableAlreadyDeclared).with("name", name));
    }
    if !features.allow_shadowing && scope.has_enclosing(name) {
        return Err(Violation::new(RuntimeErrorType::ShadowingDisabled).with("name", name));
    }
    Ok(())
}

/// A builtin global outside `allowedGlobals`.
pub fn check_global(features: &LanguageFeatures, name: &str) -> GuardResult {
    if features.is_global_allowed(name) {
        return Ok(());
    }
    Err(Violation::new(RuntimeErrorType::VariableNotDeclared).with("name", name))
}

/// Operands of JavaScript's `key in object`.
pub fn check_in_operand(
    features: &LanguageFeatures,
    key: &JikiObject,
    object: &JikiObject,
) -> GuardResult {
    match object {
        JikiObject::List(_) if features.allow_in_with_arrays => Ok(()),
        JikiObject::List(_) => Err(Violation::new(RuntimeErrorType::InWithArrayNotAllowed)),
        JikiObject::Dictionary(_) | JikiObject::Instance(_) => match key {
            JikiObject::String(_) => Ok(()),
            other => Err(Violation::new(RuntimeErrorType::InOperatorRequiresStringKey)
                .with("type", other.type_name())),
        },
        other => Err(Violation::new(RuntimeErrorType::InOperatorRequiresObject)
            .with("type", other.type_name())),
    }
}

/// A stdlib member outside `allowedStdlib`.
pub fn check_stdlib_member(
    features: &LanguageFeatures,
    type_name: &str,
    member: &str,
    is_method: bool,
) -> GuardResult {
    if features.is_stdlib_member_allowed(type_name, member, is_method) {
        return Ok(());
    }
    Err(Violation::new(RuntimeErrorType::MethodNotYetAvailable).with("method", member))
}

/// Nested user-function calls beyond `maxCallDepth`.
pub fn check_call_depth(features: &LanguageFeatures, depth: usize) -> GuardResult {
    if depth <= features.max_call_depth {
        return Ok(());
    }
    Err(Violation::new(RuntimeErrorType::MaxCallDepthExceeded)
        .with("max", features.max_call_depth.to_string()))
}

/// Counts loop iterations across the whole run.
#[derive(Debug, Clone)]
pub struct LoopGuard {
    iterations: u64,
    max: u64,
}

impl LoopGuard {
    pub fn new(features: &LanguageFeatures) -> Self {
        Self {
            iterations: 0,
            max: features.max_iterations,
        }
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Count one iteration.
    pub fn tick(&mut self) -> GuardResult {
        self.iterations += 1;
        if self.iterations <= self.max {
            return Ok(());
        }
        Err(Violation::new(RuntimeErrorType::MaxIterationsReached).with("max", self.max.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> LanguageFeatures {
        LanguageFeatures::default()
    }

    #[test]
    fn test_arithmetic_guard() {
        let f = defaults();
        let n = JikiObject::Number(1.0);
        let s = JikiObject::string("a");
        let b = JikiObject::Boolean(true);
        assert!(check_arithmetic(&f, BinaryOp::Add, &n, &n).is_ok());
        assert!(check_arithmetic(&f, BinaryOp::Add, &s, &s).is_ok());
        assert!(check_arithmetic(&f, BinaryOp::Sub, &s, &s).is_err());
        let err = check_arithmetic(&f, BinaryOp::Add, &b, &b).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::TypeCoercionNotAllowed);
        let err = err.into_error(Span::default());
        assert_eq!(err.context.get("left"), Some("boolean"));
        let loose = LanguageFeatures {
            allow_type_coercion: true,
            ..defaults()
        };
        assert!(check_arithmetic(&loose, BinaryOp::Add, &b, &s).is_ok());
    }

    #[test]
    fn test_condition_guard() {
        let f = defaults();
        assert!(check_condition(&f, &JikiObject::Boolean(false)).is_ok());
        let err = check_condition(&f, &JikiObject::Number(0.0)).unwrap_err();
        assert_eq!(err.error_type, RuntimeErrorType::TruthinessDisabled);
        let loose = LanguageFeatures {
            allow_truthiness: true,
            ..defaults()
        };
        assert!(check_condition(&loose, &JikiObject::Number(0.0)).is_ok());
    }

    #[test]
    fn test_equality_guard() {
        let f = defaults();
        assert!(check_equality_operator(&f, BinaryOp::StrictEq).is_ok());
        let err = check_equality_operator(&f, BinaryOp::NotEq)
            .unwrap_err()
            .into_error(Span::default());
        assert_eq!(err.context.get("suggestion"), Some("!=="));
        let loose = LanguageFeatures {
            enforce_strict_equality: false,
            ..defaults()
        };
        assert!(check_equality_operator(&loose, BinaryOp::Eq).is_ok());
    }

    #[test]
    fn test_declaration_guard() {
        let f = defaults();
        let global = Scope::global();
        global.define("x", JikiObject::Number(1.0), false);
        let inner = Scope::child(&global);
        assert_eq!(
            check_declaration(&f, &global, "x").unwrap_err().error_type,
            RuntimeErrorType::VariableAlreadyDeclared
        );
        assert_eq!(
            check_declaration(&f, &inner, "x").unwrap_err().error_type,
            RuntimeErrorType::ShadowingDisabled
        );
        assert!(check_declaration(&f, &inner, "y").is_ok());
        let loose = LanguageFeatures {
            allow_shadowing: true,
            ..defaults()
        };
        assert!(check_declaration(&loose, &inner, "x").is_ok());
    }

    #[test]
    fn test_in_operand_guard() {
        let f = defaults();
        let key = JikiObject::string("a");
        let list = JikiObject::list(Vec::new());
        let dict = JikiObject::dictionary(Default::default());
        assert_eq!(
            check_in_operand(&f, &key, &list).unwrap_err().error_type,
            RuntimeErrorType::InWithArrayNotAllowed
        );
        assert!(check_in_operand(&f, &key, &dict).is_ok());
        assert_eq!(
            check_in_operand(&f, &JikiObject::Number(1.0), &dict)
                .unwrap_err()
                .error_type,
            RuntimeErrorType::InOperatorRequiresStringKey
        );
        assert_eq!(
            check_in_operand(&f, &key, &JikiObject::Number(1.0))
                .unwrap_err()
                .error_type,
            RuntimeErrorType::InOperatorRequiresObject
        );
    }

    #[test]
    fn test_loop_guard_counts_whole_run() {
        let f = LanguageFeatures {
            max_iterations: 3,
            ..defaults()
        };
        let mut guard = LoopGuard::new(&f);
        for _ in 0..3 {
            assert!(guard.tick().is_ok());
        }
        let err = guard.tick().unwrap_err().into_error(Span::default());
        assert_eq!(err.error_type, RuntimeErrorType::MaxIterationsReached);
        assert_eq!(err.context.get("max"), Some("3"));
    }

    #[test]
    fn test_call_depth_and_globals() {
        let f = LanguageFeatures {
            max_call_depth: 2,
            allowed_globals: Some(vec!["console".into()]),
            ..defaults()
        };
        assert!(check_call_depth(&f, 2).is_ok());
        assert!(check_call_depth(&f, 3).is_err());
        assert!(check_global(&f, "console").is_ok());
        assert_eq!(
            check_global(&f, "Math").unwrap_err().error_type,
            RuntimeErrorType::VariableNotDeclared
        );
    }
}
