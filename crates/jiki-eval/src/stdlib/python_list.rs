//! Python `list` methods.

use super::{
    arg, integer_arg, optional_integer, python_type_name, receiver_list, resolve_index, Arity,
    Method, TypeTable,
};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{structural_eq, Dialect, JikiObject};
use std::cmp::Ordering;

type Ret = Result<JikiObject, StdlibError>;

pub static LIST: TypeTable = TypeTable {
    name: "list",
    properties: &[],
    methods: &[
        Method::new("append", Arity::Exact(1), append),
        Method::new("pop", Arity::Range(0, 1), pop),
        Method::new("insert", Arity::Exact(2), insert),
        Method::new("remove", Arity::Exact(1), remove),
        Method::new("extend", Arity::Exact(1), extend),
        Method::new("clear", Arity::Exact(0), clear),
        Method::new("index", Arity::Exact(1), index),
        Method::new("count", Arity::Exact(1), count),
        Method::new("copy", Arity::Exact(0), copy),
        Method::new("reverse", Arity::Exact(0), reverse),
        Method::new("sort", Arity::Exact(0), sort),
        Method::new("__len__", Arity::Exact(0), dunder_len),
    ],
};

fn append(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    receiver_list(receiver)?.borrow_mut().push(arg(args, 0));
    Ok(JikiObject::Null)
}

fn pop(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let index = optional_integer("pop", args, 0, -1)?;
    let mut items = list.borrow_mut();
    match resolve_index(index, items.len()) {
        Some(i) => Ok(items.remove(i)),
        None => Err(StdlibError::Index {
            index: index.to_string(),
            length: items.len(),
        }),
    }
}

/// Out-of-range positions clamp to the ends.
fn insert(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let mut items = list.borrow_mut();
    let index = super::clamp_bound(integer_arg("insert", args, 0)?, items.len());
    items.insert(index, arg(args, 1));
    Ok(JikiObject::Null)
}

fn remove(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let needle = arg(args, 0);
    let mut items = list.borrow_mut();
    match items.iter().position(|item| structural_eq(item, &needle)) {
        Some(i) => {
            items.remove(i);
            Ok(JikiObject::Null)
        }
        None => Err(StdlibError::Value("list.remove(x): x not in list".into())),
    }
}

fn extend(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let extra: Vec<JikiObject> = match arg(args, 0) {
        JikiObject::List(other) => other.borrow().clone(),
        JikiObject::String(s) => s.chars().map(|c| JikiObject::String(c.into())).collect(),
        other => {
            return Err(StdlibError::type_error(format!(
                "'{}' object is not iterable",
                python_type_name(&other)
            )))
        }
    };
    list.borrow_mut().extend(extra);
    Ok(JikiObject::Null)
}

fn clear(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    receiver_list(receiver)?.borrow_mut().clear();
    Ok(JikiObject::Null)
}

fn index(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let needle = arg(args, 0);
    let found = list
        .borrow()
        .iter()
        .position(|item| structural_eq(item, &needle));
    found
        .map(|i| JikiObject::Number(i as f64))
        .ok_or_else(|| {
            StdlibError::Value(format!("{} is not in list", needle.to_repr(Dialect::Python)))
        })
}

fn count(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let needle = arg(args, 0);
    let n = list
        .borrow()
        .iter()
        .filter(|item| structural_eq(item, &needle))
        .count();
    Ok(JikiObject::Number(n as f64))
}

fn copy(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::list(receiver_list(receiver)?.borrow().clone()))
}

fn reverse(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    receiver_list(receiver)?.borrow_mut().reverse();
    Ok(JikiObject::Null)
}

/// Orders a homogeneous list of numbers or strings.
pub(super) fn compare(a: &JikiObject, b: &JikiObject) -> Result<Ordering, StdlibError> {
    match (a, b) {
        (JikiObject::Number(x), JikiObject::Number(y)) => {
            Ok(x.partial_cmp(y).unwrap_or(Ordering::Equal))
        }
        (JikiObject::String(x), JikiObject::String(y)) => Ok(x.cmp(y)),
        _ => Err(StdlibError::type_error(format!(
            "'<' not supported between instances of '{}' and '{}'",
            python_type_name(a),
            python_type_name(b)
        ))),
    }
}

fn sort(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let mut items = list.borrow_mut();
    for pair in items.windows(2) {
        compare(&pair[0], &pair[1])?;
    }
    items.sort_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal));
    Ok(JikiObject::Null)
}

fn dunder_len(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::Number(receiver_list(receiver)?.borrow().len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_types::LanguageFeatures;

    fn call(name: &str, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        (LIST.method(name).unwrap().call)(&mut ctx, receiver, args)
    }

    fn numbers(values: &[f64]) -> JikiObject {
        JikiObject::list(values.iter().map(|n| JikiObject::Number(*n)).collect())
    }

    #[test]
    fn test_append_returns_none() {
        let list = numbers(&[1.0]);
        let out = call("append", &list, &[JikiObject::Number(2.0)]).unwrap();
        assert!(matches!(out, JikiObject::Null));
        assert_eq!(list.to_repr(Dialect::Python), "[1, 2]");
    }

    #[test]
    fn test_pop_defaults_to_last() {
        let list = numbers(&[1.0, 2.0, 3.0]);
        assert_eq!(call("pop", &list, &[]).unwrap().as_number(), Some(3.0));
        assert_eq!(
            call("pop", &list, &[JikiObject::Number(0.0)]).unwrap().as_number(),
            Some(1.0)
        );
        assert!(matches!(
            call("pop", &numbers(&[]), &[]),
            Err(StdlibError::Index { .. })
        ));
    }

    #[test]
    fn test_remove_and_index_raise_value_error() {
        let list = numbers(&[1.0]);
        assert!(matches!(
            call("remove", &list, &[JikiObject::Number(5.0)]),
            Err(StdlibError::Value(_))
        ));
        assert!(matches!(
            call("index", &list, &[JikiObject::Number(5.0)]),
            Err(StdlibError::Value(_))
        ));
    }

    #[test]
    fn test_sort_rejects_mixed_types() {
        let list = numbers(&[3.0, 1.0, 2.0]);
        call("sort", &list, &[]).unwrap();
        assert_eq!(list.to_repr(Dialect::Python), "[1, 2, 3]");
        let mixed = JikiObject::list(vec![JikiObject::Number(1.0), JikiObject::string("a")]);
        assert!(matches!(call("sort", &mixed, &[]), Err(StdlibError::Type(_))));
    }
}
