//! Python `dict` methods.

use super::{arg, python_type_name, Arity, Method, TypeTable};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{DictRef, JikiObject};

type Ret = Result<JikiObject, StdlibError>;

pub static DICT: TypeTable = TypeTable {
    name: "dict",
    properties: &[],
    methods: &[
        Method::new("keys", Arity::Exact(0), keys),
        Method::new("values", Arity::Exact(0), values),
        Method::new("items", Arity::Exact(0), items),
        Method::new("get", Arity::Range(1, 2), get),
        Method::new("pop", Arity::Range(1, 2), pop),
        Method::new("clear", Arity::Exact(0), clear),
        Method::new("__len__", Arity::Exact(0), dunder_len),
    ],
};

fn receiver_dict(receiver: &JikiObject) -> Result<DictRef, StdlibError> {
    match receiver {
        JikiObject::Dictionary(entries) => Ok(entries.clone()),
        other => Err(StdlibError::type_error(format!(
            "expected a dict, got {}",
            python_type_name(other)
        ))),
    }
}

fn key_arg(args: &[JikiObject]) -> Result<String, StdlibError> {
    match arg(args, 0) {
        JikiObject::String(key) => Ok(key),
        other => Err(StdlibError::type_error(format!(
            "dictionary keys must be str, not {}",
            python_type_name(&other)
        ))),
    }
}

fn keys(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let entries = receiver_dict(receiver)?;
    let keys = entries
        .borrow()
        .keys()
        .map(|k| JikiObject::String(k.clone()))
        .collect();
    Ok(JikiObject::list(keys))
}

fn values(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let entries = receiver_dict(receiver)?;
    let values = entries.borrow().values().cloned().collect();
    Ok(JikiObject::list(values))
}

/// `[key, value]` pairs, unpackable in `for k, v in d.items()`.
fn items(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let entries = receiver_dict(receiver)?;
    let pairs = entries
        .borrow()
        .iter()
        .map(|(k, v)| JikiObject::list(vec![JikiObject::String(k.clone()), v.clone()]))
        .collect();
    Ok(JikiObject::list(pairs))
}

fn get(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let entries = receiver_dict(receiver)?;
    let key = key_arg(args)?;
    let found = entries.borrow().get(&key).cloned();
    Ok(found.unwrap_or_else(|| match arg(args, 1) {
        JikiObject::Undefined => JikiObject::Null,
        default => default,
    }))
}

fn pop(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let entries = receiver_dict(receiver)?;
    let key = key_arg(args)?;
    let removed = entries.borrow_mut().shift_remove(&key);
    match (removed, args.get(1)) {
        (Some(value), _) => Ok(value),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Err(StdlibError::Key(key)),
    }
}

fn clear(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    receiver_dict(receiver)?.borrow_mut().clear();
    Ok(JikiObject::Null)
}

fn dunder_len(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::Number(receiver_dict(receiver)?.borrow().len() as f64))
}
