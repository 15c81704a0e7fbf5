//! Standard library dispatch tables.
//!
//! Each built-in type owns a [`TypeTable`] of properties and methods. A
//! method declares its [`Arity`]; the evaluator validates it before the
//! body runs, so bodies may index `args` up to the declared minimum.

mod javascript_array;
mod javascript_globals;
mod javascript_string;
mod jikiscript_builtins;
mod python_builtins;
mod python_dict;
mod python_list;
mod python_str;

use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{JikiObject, ListRef};

pub use python_builtins::python_type_name;

/// How many arguments a callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, got: usize) -> bool {
        match self {
            Arity::Exact(n) => got == n,
            Arity::Range(min, max) => (min..=max).contains(&got),
            Arity::AtLeast(min) => got >= min,
        }
    }

    pub fn min(self) -> usize {
        match self {
            Arity::Exact(n) | Arity::Range(n, _) | Arity::AtLeast(n) => n,
        }
    }

    pub fn describe(self) -> String {
        match self {
            Arity::Exact(n) => n.to_string(),
            Arity::Range(min, max) => format!("between {min} and {max}"),
            Arity::AtLeast(min) => format!("at least {min}"),
        }
    }

    pub fn check(self, function: &str, got: usize) -> Result<(), StdlibError> {
        if self.accepts(got) {
            return Ok(());
        }
        Err(StdlibError::Arity {
            function: function.to_string(),
            expected: self,
            got,
        })
    }
}

pub type MethodFn =
    fn(&mut CallContext<'_>, &JikiObject, &[JikiObject]) -> Result<JikiObject, StdlibError>;

pub type PropertyFn = fn(&JikiObject) -> JikiObject;

/// A callable member. Stubs resolve as values but refuse to run.
#[derive(Debug)]
pub struct Method {
    pub name: &'static str,
    pub arity: Arity,
    pub stub: bool,
    pub call: MethodFn,
}

impl Method {
    const fn new(name: &'static str, arity: Arity, call: MethodFn) -> Self {
        Self {
            name,
            arity,
            stub: false,
            call,
        }
    }

    const fn stub(name: &'static str) -> Self {
        Self {
            name,
            arity: Arity::AtLeast(0),
            stub: true,
            call: not_implemented,
        }
    }
}

#[derive(Debug)]
pub struct Property {
    pub name: &'static str,
    pub get: PropertyFn,
}

/// Members of one built-in type, keyed by the name used in `allowedStdlib`.
#[derive(Debug)]
pub struct TypeTable {
    pub name: &'static str,
    pub properties: &'static [Property],
    pub methods: &'static [Method],
}

impl TypeTable {
    pub fn property(&'static self, name: &str) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&'static self, name: &str) -> Option<&'static Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

fn not_implemented(
    _: &mut CallContext<'_>,
    _: &JikiObject,
    _: &[JikiObject],
) -> Result<JikiObject, StdlibError> {
    Err(StdlibError::NotImplemented("method".into()))
}

// ── Lookup ──────────────────────────────────────────────────────────

/// The JavaScript table for a value's type.
pub fn javascript_table(value: &JikiObject) -> Option<&'static TypeTable> {
    match value {
        JikiObject::List(_) => Some(&javascript_array::ARRAY),
        JikiObject::String(_) => Some(&javascript_string::STRING),
        _ => None,
    }
}

/// `console`, `Math`.
pub fn javascript_namespace(name: &str) -> Option<&'static TypeTable> {
    javascript_globals::NAMESPACES
        .iter()
        .copied()
        .find(|ns| ns.name == name)
}

/// The Python table for a value's type.
pub fn python_table(value: &JikiObject) -> Option<&'static TypeTable> {
    match value {
        JikiObject::List(_) => Some(&python_list::LIST),
        JikiObject::String(_) => Some(&python_str::STR),
        JikiObject::Dictionary(_) => Some(&python_dict::DICT),
        _ => None,
    }
}

pub fn python_builtin(name: &str) -> Option<&'static Method> {
    python_builtins::BUILTINS.iter().find(|m| m.name == name)
}

pub fn jikiscript_builtin(name: &str) -> Option<&'static Method> {
    jikiscript_builtins::BUILTINS.iter().find(|m| m.name == name)
}

// ── Argument helpers ────────────────────────────────────────────────

/// The `i`th argument, or `undefined` when missing.
pub(crate) fn arg(args: &[JikiObject], i: usize) -> JikiObject {
    args.get(i).cloned().unwrap_or(JikiObject::Undefined)
}

pub(crate) fn number_arg(function: &str, args: &[JikiObject], i: usize) -> Result<f64, StdlibError> {
    match args.get(i) {
        Some(JikiObject::Number(n)) => Ok(*n),
        other => Err(StdlibError::type_error(format!(
            "{function}() expects a number, got {}",
            other.map_or("nothing", JikiObject::type_name)
        ))),
    }
}

/// A whole-number argument; fractions are rejected.
pub(crate) fn integer_arg(function: &str, args: &[JikiObject], i: usize) -> Result<i64, StdlibError> {
    let n = number_arg(function, args, i)?;
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(StdlibError::type_error(format!(
            "{function}() expects an integer, got {n}"
        )));
    }
    Ok(n as i64)
}

/// A position argument for JavaScript members such as `at`.
///
/// Under `nativeJSMode` this converts like the host does: missing,
/// `undefined`, `null` and `NaN` become 0, fractions truncate toward zero
/// and booleans count as 0 or 1. Otherwise only whole numbers pass.
pub(crate) fn position_arg(
    ctx: &CallContext<'_>,
    function: &str,
    args: &[JikiObject],
    i: usize,
) -> Result<i64, StdlibError> {
    if !ctx.features().native_js_mode {
        return integer_arg(function, args, i);
    }
    match args.get(i) {
        None | Some(JikiObject::Undefined) | Some(JikiObject::Null) => Ok(0),
        Some(JikiObject::Boolean(b)) => Ok(i64::from(*b)),
        Some(JikiObject::Number(n)) if n.is_nan() => Ok(0),
        // `as` saturates infinities to the i64 bounds.
        Some(JikiObject::Number(n)) => Ok(n.trunc() as i64),
        _ => integer_arg(function, args, i),
    }
}

/// An optional integer, defaulting when the argument is missing or undefined.
pub(crate) fn optional_integer(
    function: &str,
    args: &[JikiObject],
    i: usize,
    default: i64,
) -> Result<i64, StdlibError> {
    match args.get(i) {
        None | Some(JikiObject::Undefined) => Ok(default),
        Some(_) => integer_arg(function, args, i),
    }
}

pub(crate) fn string_arg(function: &str, args: &[JikiObject], i: usize) -> Result<String, StdlibError> {
    match args.get(i) {
        Some(JikiObject::String(s)) => Ok(s.clone()),
        other => Err(StdlibError::type_error(format!(
            "{function}() expects a string, got {}",
            other.map_or("nothing", JikiObject::type_name)
        ))),
    }
}

pub(crate) fn receiver_list(receiver: &JikiObject) -> Result<ListRef, StdlibError> {
    match receiver {
        JikiObject::List(items) => Ok(items.clone()),
        other => Err(StdlibError::type_error(format!(
            "expected a list, got {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn receiver_str(receiver: &JikiObject) -> Result<&str, StdlibError> {
    receiver.as_str().ok_or_else(|| {
        StdlibError::type_error(format!("expected a string, got {}", receiver.type_name()))
    })
}

/// Resolve a possibly negative index against `len`. Negative values count
/// from the end; the result is `None` when it falls outside `0..len`.
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { len + index } else { index };
    (0..len).contains(&resolved).then_some(resolved as usize)
}

/// Clamp a slice bound: negative counts from the end, then into `0..=len`.
pub(crate) fn clamp_bound(index: i64, len: usize) -> usize {
    let len_i = len as i64;
    let resolved = if index < 0 { len_i + index } else { index };
    resolved.clamp(0, len_i) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert!(Arity::Exact(1).accepts(1));
        assert!(!Arity::Exact(1).accepts(0));
        assert!(Arity::Range(1, 2).accepts(2));
        assert!(!Arity::Range(1, 2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(5));
        assert_eq!(Arity::Range(0, 2).describe(), "between 0 and 2");
        let err = Arity::Exact(2).check("pow", 1).unwrap_err();
        assert!(matches!(err, StdlibError::Arity { got: 1, .. }));
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(clamp_bound(-1, 3), 2);
        assert_eq!(clamp_bound(10, 3), 3);
        assert_eq!(clamp_bound(-10, 3), 0);
    }

    #[test]
    fn test_position_arg_follows_native_mode() {
        let strict = jiki_types::LanguageFeatures::default();
        let native = jiki_types::LanguageFeatures {
            native_js_mode: true,
            ..jiki_types::LanguageFeatures::default()
        };
        let strict_ctx = CallContext::new(&strict);
        let native_ctx = CallContext::new(&native);
        assert!(position_arg(&strict_ctx, "at", &[], 0).is_err());
        assert!(position_arg(&strict_ctx, "at", &[JikiObject::Number(1.5)], 0).is_err());
        assert_eq!(position_arg(&native_ctx, "at", &[], 0), Ok(0));
        assert_eq!(position_arg(&native_ctx, "at", &[JikiObject::Number(1.7)], 0), Ok(1));
        assert_eq!(position_arg(&native_ctx, "at", &[JikiObject::Number(-1.7)], 0), Ok(-1));
        assert_eq!(position_arg(&native_ctx, "at", &[JikiObject::Number(f64::NAN)], 0), Ok(0));
        assert_eq!(position_arg(&native_ctx, "at", &[JikiObject::Boolean(true)], 0), Ok(1));
    }

    #[test]
    fn test_table_lookup() {
        let list = JikiObject::list(Vec::new());
        let table = javascript_table(&list).unwrap();
        assert_eq!(table.name, "array");
        assert!(table.method("push").is_some());
        assert!(table.method("map").unwrap().stub);
        assert!(table.property("length").is_some());
        assert!(javascript_table(&JikiObject::Number(1.0)).is_none());
        assert!(javascript_namespace("Math").is_some());
        assert_eq!(python_table(&JikiObject::string("")).unwrap().name, "str");
        assert!(python_builtin("len").is_some());
        assert!(jikiscript_builtin("concatenate").is_some());
    }
}
