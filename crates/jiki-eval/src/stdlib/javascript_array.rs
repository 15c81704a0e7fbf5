//! `Array.prototype` members.

use super::{
    arg, clamp_bound, optional_integer, position_arg, receiver_list, resolve_index, Arity, Method,
    Property, TypeTable,
};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{identical, Dialect, IteratorState, JikiObject};

type Ret = Result<JikiObject, StdlibError>;

pub static ARRAY: TypeTable = TypeTable {
    name: "array",
    properties: &[Property {
        name: "length",
        get: length,
    }],
    methods: &[
        Method::new("at", Arity::Exact(1), at),
        Method::new("push", Arity::AtLeast(1), push),
        Method::new("pop", Arity::Exact(0), pop),
        Method::new("shift", Arity::Exact(0), shift),
        Method::new("unshift", Arity::AtLeast(1), unshift),
        Method::new("slice", Arity::Range(0, 2), slice),
        Method::new("concat", Arity::AtLeast(0), concat),
        Method::new("join", Arity::Range(0, 1), join),
        Method::new("toString", Arity::Exact(0), to_string),
        Method::new("includes", Arity::Range(1, 2), includes),
        Method::new("indexOf", Arity::Range(1, 2), index_of),
        Method::new("lastIndexOf", Arity::Range(1, 2), last_index_of),
        Method::new("reverse", Arity::Exact(0), reverse),
        Method::new("sort", Arity::Exact(0), sort),
        Method::new("fill", Arity::Range(1, 3), fill),
        Method::new("values", Arity::Exact(0), values),
        Method::stub("forEach"),
        Method::stub("map"),
        Method::stub("filter"),
        Method::stub("reduce"),
        Method::stub("find"),
        Method::stub("findIndex"),
        Method::stub("every"),
        Method::stub("some"),
        Method::stub("splice"),
    ],
};

fn length(receiver: &JikiObject) -> JikiObject {
    match receiver {
        JikiObject::List(items) => JikiObject::Number(items.borrow().len() as f64),
        _ => JikiObject::Undefined,
    }
}

fn at(ctx: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let index = position_arg(ctx, "at", args, 0)?;
    let items = list.borrow();
    Ok(resolve_index(index, items.len())
        .map(|i| items[i].clone())
        .unwrap_or(JikiObject::Undefined))
}

fn push(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let mut items = list.borrow_mut();
    items.extend(args.iter().cloned());
    Ok(JikiObject::Number(items.len() as f64))
}

fn pop(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let popped = list.borrow_mut().pop();
    Ok(popped.unwrap_or(JikiObject::Undefined))
}

fn shift(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let mut items = list.borrow_mut();
    if items.is_empty() {
        return Ok(JikiObject::Undefined);
    }
    Ok(items.remove(0))
}

fn unshift(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let mut items = list.borrow_mut();
    items.splice(0..0, args.iter().cloned());
    Ok(JikiObject::Number(items.len() as f64))
}

fn slice(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let items = list.borrow();
    let len = items.len();
    let start = clamp_bound(optional_integer("slice", args, 0, 0)?, len);
    let end = clamp_bound(optional_integer("slice", args, 1, len as i64)?, len);
    let out = if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    Ok(JikiObject::list(out))
}

fn concat(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let mut out = receiver_list(receiver)?.borrow().clone();
    for value in args {
        match value {
            JikiObject::List(other) => out.extend(other.borrow().iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    Ok(JikiObject::list(out))
}

fn joined(receiver: &JikiObject, separator: &str) -> Result<String, StdlibError> {
    let list = receiver_list(receiver)?;
    let parts: Vec<String> = list
        .borrow()
        .iter()
        .map(|item| match item {
            JikiObject::Undefined | JikiObject::Null => String::new(),
            other => other.to_display(Dialect::JavaScript),
        })
        .collect();
    Ok(parts.join(separator))
}

fn join(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let separator = match arg(args, 0) {
        JikiObject::Undefined => ",".to_string(),
        JikiObject::String(s) => s,
        other => {
            return Err(StdlibError::type_error(format!(
                "join() separator must be a string, got {}",
                other.type_name()
            )))
        }
    };
    Ok(JikiObject::String(joined(receiver, &separator)?))
}

fn to_string(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(joined(receiver, ",")?))
}

/// `NaN` finds `NaN`, unlike `indexOf`.
fn same_value_zero(a: &JikiObject, b: &JikiObject) -> bool {
    match (a, b) {
        (JikiObject::Number(x), JikiObject::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => identical(a, b),
    }
}

fn from_index(function: &str, args: &[JikiObject], len: usize) -> Result<usize, StdlibError> {
    Ok(clamp_bound(optional_integer(function, args, 1, 0)?, len))
}

fn includes(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let items = list.borrow();
    let start = from_index("includes", args, items.len())?;
    let needle = arg(args, 0);
    Ok(JikiObject::Boolean(
        items[start..].iter().any(|item| same_value_zero(item, &needle)),
    ))
}

fn index_of(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let items = list.borrow();
    let start = from_index("indexOf", args, items.len())?;
    let needle = arg(args, 0);
    let found = items[start..]
        .iter()
        .position(|item| identical(item, &needle))
        .map_or(-1.0, |i| (i + start) as f64);
    Ok(JikiObject::Number(found))
}

fn last_index_of(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let items = list.borrow();
    let len = items.len() as i64;
    let from = optional_integer("lastIndexOf", args, 1, len - 1)?;
    let from = if from < 0 { len + from } else { from.min(len - 1) };
    let needle = arg(args, 0);
    let found = (0..=from)
        .rev()
        .find(|i| identical(&items[*i as usize], &needle))
        .map_or(-1.0, |i| i as f64);
    Ok(JikiObject::Number(found))
}

fn reverse(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    receiver_list(receiver)?.borrow_mut().reverse();
    Ok(receiver.clone())
}

/// Default ordering compares string forms; `undefined` sorts last.
fn sort(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    list.borrow_mut().sort_by(|a, b| match (a, b) {
        (JikiObject::Undefined, JikiObject::Undefined) => std::cmp::Ordering::Equal,
        (JikiObject::Undefined, _) => std::cmp::Ordering::Greater,
        (_, JikiObject::Undefined) => std::cmp::Ordering::Less,
        _ => a
            .to_display(Dialect::JavaScript)
            .cmp(&b.to_display(Dialect::JavaScript)),
    });
    Ok(receiver.clone())
}

fn fill(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let list = receiver_list(receiver)?;
    let mut items = list.borrow_mut();
    let len = items.len();
    let start = clamp_bound(optional_integer("fill", args, 1, 0)?, len);
    let end = clamp_bound(optional_integer("fill", args, 2, len as i64)?, len);
    let value = arg(args, 0);
    for item in items.iter_mut().take(end).skip(start) {
        *item = value.clone();
    }
    Ok(receiver.clone())
}

fn values(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let items = receiver_list(receiver)?.borrow().clone();
    Ok(JikiObject::iterator(IteratorState::Values { items, position: 0 }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_types::LanguageFeatures;

    fn numbers(values: &[f64]) -> JikiObject {
        JikiObject::list(values.iter().map(|n| JikiObject::Number(*n)).collect())
    }

    fn call(name: &str, receiver: &JikiObject, args: &[JikiObject]) -> JikiObject {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let method = ARRAY.method(name).unwrap();
        (method.call)(&mut ctx, receiver, args).unwrap()
    }

    #[test]
    fn test_push_and_pop_mutate_receiver() {
        let list = numbers(&[1.0]);
        let len = call("push", &list, &[JikiObject::Number(2.0), JikiObject::Number(3.0)]);
        assert_eq!(len.as_number(), Some(3.0));
        assert_eq!(call("pop", &list, &[]).as_number(), Some(3.0));
        assert_eq!((ARRAY.properties[0].get)(&list).as_number(), Some(2.0));
        assert!(matches!(call("pop", &numbers(&[]), &[]), JikiObject::Undefined));
    }

    #[test]
    fn test_at_resolves_negative_index() {
        let list = numbers(&[1.0, 2.0, 3.0]);
        assert_eq!(call("at", &list, &[JikiObject::Number(-1.0)]).as_number(), Some(3.0));
        assert!(matches!(
            call("at", &list, &[JikiObject::Number(5.0)]),
            JikiObject::Undefined
        ));
    }

    #[test]
    fn test_slice_and_join() {
        let list = numbers(&[1.0, 2.0, 3.0, 4.0]);
        let sliced = call("slice", &list, &[JikiObject::Number(1.0), JikiObject::Number(-1.0)]);
        assert_eq!(sliced.to_repr(Dialect::JavaScript), "[2, 3]");
        let joined = call("join", &list, &[JikiObject::string("-")]);
        assert_eq!(joined.as_str(), Some("1-2-3-4"));
        assert_eq!(call("toString", &list, &[]).as_str(), Some("1,2,3,4"));
    }

    #[test]
    fn test_join_rejects_non_string_separator() {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let method = ARRAY.method("join").unwrap();
        let err = (method.call)(&mut ctx, &numbers(&[1.0, 2.0]), &[JikiObject::Number(1.0)]).unwrap_err();
        assert!(matches!(err, StdlibError::Type(_)));
        assert_eq!(call("join", &numbers(&[1.0, 2.0]), &[]).as_str(), Some("1,2"));
    }

    #[test]
    fn test_search_methods() {
        let list = numbers(&[1.0, 2.0, 1.0]);
        let one = JikiObject::Number(1.0);
        assert_eq!(call("indexOf", &list, &[one.clone()]).as_number(), Some(0.0));
        assert_eq!(call("lastIndexOf", &list, &[one.clone()]).as_number(), Some(2.0));
        assert_eq!(
            call("indexOf", &list, &[JikiObject::Number(9.0)]).as_number(),
            Some(-1.0)
        );
        assert_eq!(call("includes", &list, &[one]).as_bool(), Some(true));
    }

    #[test]
    fn test_sort_compares_strings() {
        let list = numbers(&[10.0, 9.0, 1.0]);
        call("sort", &list, &[]);
        assert_eq!(list.to_repr(Dialect::JavaScript), "[1, 10, 9]");
    }
}
