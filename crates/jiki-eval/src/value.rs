//! Runtime values shared by the three evaluators.

use crate::external::ExternalFunction;
use crate::scope::Scope;
use crate::stdlib::Method;
use indexmap::IndexMap;
use jiki_types::ast::{javascript as js, jikiscript as jiki, python as py};
use jiki_types::Snapshot;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type ListRef = Rc<RefCell<Vec<JikiObject>>>;
pub type DictRef = Rc<RefCell<IndexMap<String, JikiObject>>>;

/// Which front-end a value is being rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JikiScript,
    JavaScript,
    Python,
}

impl Dialect {
    pub fn name(self) -> &'static str {
        match self {
            Dialect::JikiScript => "jikiscript",
            Dialect::JavaScript => "javascript",
            Dialect::Python => "python",
        }
    }
}

/// A value produced by interpreted code.
///
/// Lists and dictionaries are shared: cloning a `JikiObject` aliases them.
#[derive(Debug, Clone)]
pub enum JikiObject {
    Number(f64),
    String(String),
    Boolean(bool),
    List(ListRef),
    Dictionary(DictRef),
    Function(Rc<Callable>),
    Instance(Rc<Instance>),
    Iterator(Rc<RefCell<IteratorState>>),
    Undefined,
    Null,
}

impl JikiObject {
    /// A number rounded to five decimal places.
    pub fn number(n: f64) -> Self {
        JikiObject::Number(round_number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        JikiObject::String(s.into())
    }

    pub fn list(items: Vec<JikiObject>) -> Self {
        JikiObject::List(Rc::new(RefCell::new(items)))
    }

    pub fn dictionary(entries: IndexMap<String, JikiObject>) -> Self {
        JikiObject::Dictionary(Rc::new(RefCell::new(entries)))
    }

    pub fn function(callable: Callable) -> Self {
        JikiObject::Function(Rc::new(callable))
    }

    pub fn iterator(state: IteratorState) -> Self {
        JikiObject::Iterator(Rc::new(RefCell::new(state)))
    }

    /// Stable discriminator used in error contexts.
    pub fn type_name(&self) -> &'static str {
        match self {
            JikiObject::Number(_) => "number",
            JikiObject::String(_) => "string",
            JikiObject::Boolean(_) => "boolean",
            JikiObject::List(_) => "list",
            JikiObject::Dictionary(_) => "dictionary",
            JikiObject::Function(_) => "function",
            JikiObject::Instance(_) => "instance",
            JikiObject::Iterator(_) => "iterator",
            JikiObject::Undefined => "undefined",
            JikiObject::Null => "null",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            JikiObject::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JikiObject::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JikiObject::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, JikiObject::Function(_))
    }

    /// Host-language truthiness, used only when `allowTruthiness` is on.
    pub fn is_truthy(&self) -> bool {
        match self {
            JikiObject::Boolean(b) => *b,
            JikiObject::Number(n) => *n != 0.0 && !n.is_nan(),
            JikiObject::String(s) => !s.is_empty(),
            JikiObject::List(items) => !items.borrow().is_empty(),
            JikiObject::Dictionary(entries) => !entries.borrow().is_empty(),
            JikiObject::Undefined | JikiObject::Null => false,
            JikiObject::Function(_) | JikiObject::Instance(_) | JikiObject::Iterator(_) => true,
        }
    }

    /// Deep-copy into plain data with no shared references.
    pub fn unwrap(&self) -> Snapshot {
        self.snapshot_with(&mut Vec::new())
    }

    fn snapshot_with(&self, seen: &mut Vec<usize>) -> Snapshot {
        match self {
            JikiObject::Number(n) => Snapshot::Number(*n),
            JikiObject::String(s) => Snapshot::String(s.clone()),
            JikiObject::Boolean(b) => Snapshot::Boolean(*b),
            JikiObject::Undefined => Snapshot::Undefined,
            JikiObject::Null => Snapshot::Null,
            JikiObject::List(items) => {
                let addr = Rc::as_ptr(items) as usize;
                if seen.contains(&addr) {
                    return Snapshot::String("[Circular]".into());
                }
                seen.push(addr);
                let out = items.borrow().iter().map(|v| v.snapshot_with(seen)).collect();
                seen.pop();
                Snapshot::List(out)
            }
            JikiObject::Dictionary(entries) => {
                let addr = Rc::as_ptr(entries) as usize;
                if seen.contains(&addr) {
                    return Snapshot::String("[Circular]".into());
                }
                seen.push(addr);
                let out = entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.snapshot_with(seen)))
                    .collect();
                seen.pop();
                Snapshot::Dictionary(out)
            }
            JikiObject::Instance(instance) => {
                let addr = Rc::as_ptr(instance) as usize;
                if seen.contains(&addr) {
                    return Snapshot::String("[Circular]".into());
                }
                seen.push(addr);
                let fields = instance
                    .fields
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.snapshot_with(seen)))
                    .collect();
                seen.pop();
                Snapshot::Instance {
                    class: instance.class.name.clone(),
                    fields,
                }
            }
            JikiObject::Function(callable) => Snapshot::Function {
                function: callable.name(),
            },
            JikiObject::Iterator(state) => Snapshot::Iterator {
                iterator: state.borrow().describe(),
            },
        }
    }

    /// Rebuild a live value from plain data.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        match snapshot {
            Snapshot::Number(n) => JikiObject::Number(*n),
            Snapshot::String(s) => JikiObject::String(s.clone()),
            Snapshot::Boolean(b) => JikiObject::Boolean(*b),
            Snapshot::List(items) => JikiObject::list(items.iter().map(Self::from_snapshot).collect()),
            Snapshot::Dictionary(entries) | Snapshot::Instance { fields: entries, .. } => {
                JikiObject::dictionary(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), Self::from_snapshot(v)))
                        .collect(),
                )
            }
            Snapshot::Function { function } => JikiObject::String(function.clone()),
            Snapshot::Iterator { iterator } => JikiObject::String(iterator.clone()),
            Snapshot::Null => JikiObject::Null,
            Snapshot::Undefined => JikiObject::Undefined,
        }
    }

    /// A copy whose lists and dictionaries share nothing with `self`.
    pub fn deep_clone(&self) -> Self {
        match self {
            JikiObject::List(items) => {
                JikiObject::list(items.borrow().iter().map(JikiObject::deep_clone).collect())
            }
            JikiObject::Dictionary(entries) => JikiObject::dictionary(
                entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Text as written by `log`/`console.log`/`print`: strings unquoted.
    pub fn to_display(&self, dialect: Dialect) -> String {
        match self {
            JikiObject::String(s) => s.clone(),
            other => other.to_repr(dialect),
        }
    }

    /// Text as shown in descriptions and containers: strings quoted.
    pub fn to_repr(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_repr(dialect, &mut out, &mut Vec::new());
        out
    }

    fn write_repr(&self, dialect: Dialect, out: &mut String, seen: &mut Vec<usize>) {
        match self {
            JikiObject::Number(n) => out.push_str(&format_number(*n)),
            JikiObject::String(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            JikiObject::Boolean(b) => out.push_str(match (dialect, b) {
                (Dialect::Python, true) => "True",
                (Dialect::Python, false) => "False",
                (_, true) => "true",
                (_, false) => "false",
            }),
            JikiObject::Null => out.push_str(match dialect {
                Dialect::Python => "None",
                _ => "null",
            }),
            JikiObject::Undefined => out.push_str("undefined"),
            JikiObject::List(items) => {
                let addr = Rc::as_ptr(items) as usize;
                if seen.contains(&addr) {
                    out.push_str("[...]");
                    return;
                }
                seen.push(addr);
                out.push('[');
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_repr(dialect, out, seen);
                }
                out.push(']');
                seen.pop();
            }
            JikiObject::Dictionary(entries) => {
                let addr = Rc::as_ptr(entries) as usize;
                if seen.contains(&addr) {
                    out.push_str("{...}");
                    return;
                }
                seen.push(addr);
                write_entries(dialect, entries.borrow().iter(), out, seen);
                seen.pop();
            }
            JikiObject::Instance(instance) => {
                let addr = Rc::as_ptr(instance) as usize;
                if seen.contains(&addr) {
                    out.push_str("{...}");
                    return;
                }
                seen.push(addr);
                out.push_str(&instance.class.name);
                out.push(' ');
                write_entries(dialect, instance.fields.borrow().iter(), out, seen);
                seen.pop();
            }
            JikiObject::Function(callable) => {
                out.push_str("<function ");
                out.push_str(&callable.name());
                out.push('>');
            }
            JikiObject::Iterator(state) => out.push_str(&state.borrow().describe()),
        }
    }
}

fn write_entries<'a>(
    dialect: Dialect,
    entries: impl Iterator<Item = (&'a String, &'a JikiObject)>,
    out: &mut String,
    seen: &mut Vec<usize>,
) {
    out.push('{');
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('"');
        out.push_str(key);
        out.push_str("\": ");
        value.write_repr(dialect, out, seen);
    }
    out.push('}');
}

/// Round to five decimal places so `0.1 + 0.2` reads as `0.3`.
pub fn round_number(n: f64) -> f64 {
    if !n.is_finite() || n.abs() >= 1e15 {
        return n;
    }
    let rounded = (n * 1e5).round() / 1e5;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.into()
    } else {
        format!("{n}")
    }
}

/// Longest string (in bytes) or list any operation may build.
pub const MAX_SEQUENCE_LENGTH: usize = 100_000;

/// Length of `count` copies of a `unit`-long sequence, or `None` when the
/// result would exceed [`MAX_SEQUENCE_LENGTH`].
///
/// `count` is a whole, non-negative number as written in the program.
pub fn repeated_length(unit: usize, count: f64) -> Option<usize> {
    if count.is_nan() || count < 0.0 {
        return None;
    }
    if unit == 0 || count == 0.0 {
        return Some(0);
    }
    if count > MAX_SEQUENCE_LENGTH as f64 {
        return None;
    }
    unit.checked_mul(count as usize)
        .filter(|len| *len <= MAX_SEQUENCE_LENGTH)
}

/// Structural equality: numbers, strings and booleans by value, lists and
/// dictionaries element-wise, everything else by identity.
pub fn structural_eq(a: &JikiObject, b: &JikiObject) -> bool {
    match (a, b) {
        (JikiObject::Number(x), JikiObject::Number(y)) => x == y,
        (JikiObject::String(x), JikiObject::String(y)) => x == y,
        (JikiObject::Boolean(x), JikiObject::Boolean(y)) => x == y,
        (JikiObject::Null, JikiObject::Null) | (JikiObject::Undefined, JikiObject::Undefined) => {
            true
        }
        (JikiObject::List(x), JikiObject::List(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| structural_eq(a, b))
        }
        (JikiObject::Dictionary(x), JikiObject::Dictionary(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| structural_eq(v, other)))
        }
        _ => identical(a, b),
    }
}

/// Identity for reference values, value equality for primitives.
pub fn identical(a: &JikiObject, b: &JikiObject) -> bool {
    match (a, b) {
        (JikiObject::Number(x), JikiObject::Number(y)) => x == y,
        (JikiObject::String(x), JikiObject::String(y)) => x == y,
        (JikiObject::Boolean(x), JikiObject::Boolean(y)) => x == y,
        (JikiObject::Null, JikiObject::Null) | (JikiObject::Undefined, JikiObject::Undefined) => {
            true
        }
        (JikiObject::List(x), JikiObject::List(y)) => Rc::ptr_eq(x, y),
        (JikiObject::Dictionary(x), JikiObject::Dictionary(y)) => Rc::ptr_eq(x, y),
        (JikiObject::Function(x), JikiObject::Function(y)) => Rc::ptr_eq(x, y),
        (JikiObject::Instance(x), JikiObject::Instance(y)) => Rc::ptr_eq(x, y),
        (JikiObject::Iterator(x), JikiObject::Iterator(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────
// Callables
// ─────────────────────────────────────────────────────────────────────

/// Anything interpreted code can call.
#[derive(Debug)]
pub enum Callable {
    /// A function declared in the program.
    User(UserFunction),
    /// A stdlib method bound to its receiver.
    Stdlib {
        receiver: JikiObject,
        method: &'static Method,
    },
    /// A global stdlib function (`print`, `Math.abs`, `concatenate`).
    Builtin(&'static Method),
    /// A host function supplied through the evaluation context.
    External(Rc<ExternalFunction>),
    /// A JavaScript class, invoked through `new`.
    Class(Rc<ClassDef>),
}

impl Callable {
    pub fn name(&self) -> String {
        match self {
            Callable::User(f) => f.name().to_string(),
            Callable::Stdlib { method, .. } | Callable::Builtin(method) => method.name.to_string(),
            Callable::External(f) => f.name.clone(),
            Callable::Class(class) => class.name.clone(),
        }
    }
}

/// The declaration a user function runs.
#[derive(Clone)]
pub enum FunctionBody {
    JikiScript(Rc<jiki::FunctionDecl>),
    JavaScript(Rc<js::FunctionDecl>),
    Python(Rc<py::FunctionDecl>),
}

pub struct UserFunction {
    pub body: FunctionBody,
    pub closure: Rc<Scope>,
    /// Receiver for class methods, getters and setters.
    pub this: Option<JikiObject>,
}

impl UserFunction {
    pub fn name(&self) -> &str {
        match &self.body {
            FunctionBody::JikiScript(decl) => &decl.name.name,
            FunctionBody::JavaScript(decl) => &decl.name.name,
            FunctionBody::Python(decl) => &decl.name.name,
        }
    }

    pub fn arity(&self) -> usize {
        match &self.body {
            FunctionBody::JikiScript(decl) => decl.params.len(),
            FunctionBody::JavaScript(decl) => decl.params.len(),
            FunctionBody::Python(decl) => decl.params.len(),
        }
    }
}

impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction")
            .field("name", &self.name())
            .field("closure", &"<scope>")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Classes & Instances
// ─────────────────────────────────────────────────────────────────────

/// Dispatch tables for one JavaScript class, built once per declaration.
pub struct ClassDef {
    pub name: String,
    pub constructor: Option<Rc<js::FunctionDecl>>,
    pub methods: IndexMap<String, Rc<js::FunctionDecl>>,
    pub getters: IndexMap<String, Rc<js::FunctionDecl>>,
    pub setters: IndexMap<String, Rc<js::FunctionDecl>>,
    pub closure: Rc<Scope>,
}

impl ClassDef {
    pub fn from_decl(decl: &js::ClassDecl, closure: Rc<Scope>) -> Self {
        let table = |decls: &[Rc<js::FunctionDecl>]| {
            decls
                .iter()
                .map(|d| (d.name.name.clone(), Rc::clone(d)))
                .collect::<IndexMap<_, _>>()
        };
        Self {
            name: decl.name.name.clone(),
            constructor: decl.constructor.clone(),
            methods: table(&decl.methods),
            getters: table(&decl.getters),
            setters: table(&decl.setters),
            closure,
        }
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<ClassDef>,
    pub fields: RefCell<IndexMap<String, JikiObject>>,
}

// ─────────────────────────────────────────────────────────────────────
// Iterators
// ─────────────────────────────────────────────────────────────────────

/// Python `range(..)` or JavaScript `array.values()`.
#[derive(Debug, Clone)]
pub enum IteratorState {
    Range { next: f64, stop: f64, step: f64 },
    Values { items: Vec<JikiObject>, position: usize },
}

impl IteratorState {
    pub fn range(start: f64, stop: f64, step: f64) -> Self {
        IteratorState::Range {
            next: start,
            stop,
            step,
        }
    }

    fn describe(&self) -> String {
        match self {
            IteratorState::Range { next, stop, step } => format!(
                "range({}, {}, {})",
                format_number(*next),
                format_number(*stop),
                format_number(*step)
            ),
            IteratorState::Values { .. } => "Array Iterator".into(),
        }
    }
}

impl Iterator for IteratorState {
    type Item = JikiObject;

    fn next(&mut self) -> Option<JikiObject> {
        match self {
            IteratorState::Range { next, stop, step } => {
                let done = if *step > 0.0 { *next >= *stop } else { *next <= *stop };
                if done || *step == 0.0 {
                    return None;
                }
                let value = *next;
                *next += *step;
                Some(JikiObject::Number(value))
            }
            IteratorState::Values { items, position } => {
                let item = items.get(*position).cloned();
                *position += 1;
                item
            }
        }
    }
}
