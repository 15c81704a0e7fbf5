//! Python `str` methods.

use super::{arg, python_type_name, receiver_str, string_arg, Arity, Method, TypeTable};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::JikiObject;

type Ret = Result<JikiObject, StdlibError>;

pub static STR: TypeTable = TypeTable {
    name: "str",
    properties: &[],
    methods: &[
        Method::new("upper", Arity::Exact(0), upper),
        Method::new("lower", Arity::Exact(0), lower),
        Method::new("capitalize", Arity::Exact(0), capitalize),
        Method::new("strip", Arity::Range(0, 1), strip),
        Method::new("split", Arity::Range(0, 1), split),
        Method::new("join", Arity::Exact(1), join),
        Method::new("startswith", Arity::Exact(1), startswith),
        Method::new("endswith", Arity::Exact(1), endswith),
        Method::new("find", Arity::Exact(1), find),
        Method::new("replace", Arity::Exact(2), replace),
        Method::new("count", Arity::Exact(1), count),
        Method::new("isdigit", Arity::Exact(0), isdigit),
        Method::new("__len__", Arity::Exact(0), dunder_len),
        Method::stub("format"),
    ],
};

fn upper(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(receiver_str(receiver)?.to_uppercase()))
}

fn lower(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(receiver_str(receiver)?.to_lowercase()))
}

fn capitalize(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let mut chars = text.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    };
    Ok(JikiObject::String(out))
}

fn strip(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let out = match arg(args, 0) {
        JikiObject::Undefined | JikiObject::Null => text.trim().to_string(),
        JikiObject::String(set) => text.trim_matches(|c: char| set.contains(c)).to_string(),
        other => {
            return Err(StdlibError::type_error(format!(
                "strip arg must be None or str, not {}",
                python_type_name(&other)
            )))
        }
    };
    Ok(JikiObject::String(out))
}

fn split(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let parts: Vec<JikiObject> = match arg(args, 0) {
        JikiObject::Undefined | JikiObject::Null => text
            .split_whitespace()
            .map(|s| JikiObject::String(s.into()))
            .collect(),
        JikiObject::String(sep) if sep.is_empty() => {
            return Err(StdlibError::Value("empty separator".into()))
        }
        JikiObject::String(sep) => text
            .split(sep.as_str())
            .map(|s| JikiObject::String(s.into()))
            .collect(),
        other => {
            return Err(StdlibError::type_error(format!(
                "must be str or None, not {}",
                python_type_name(&other)
            )))
        }
    };
    Ok(JikiObject::list(parts))
}

fn join(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let separator = receiver_str(receiver)?;
    let items = match arg(args, 0) {
        JikiObject::List(items) => items.borrow().clone(),
        other => {
            return Err(StdlibError::type_error(format!(
                "can only join an iterable, not {}",
                python_type_name(&other)
            )))
        }
    };
    let mut parts = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            JikiObject::String(s) => parts.push(s.clone()),
            other => {
                return Err(StdlibError::type_error(format!(
                    "sequence item {i}: expected str instance, {} found",
                    python_type_name(other)
                )))
            }
        }
    }
    Ok(JikiObject::String(parts.join(separator)))
}

fn startswith(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let prefix = string_arg("startswith", args, 0)?;
    Ok(JikiObject::Boolean(receiver_str(receiver)?.starts_with(&prefix)))
}

fn endswith(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let suffix = string_arg("endswith", args, 0)?;
    Ok(JikiObject::Boolean(receiver_str(receiver)?.ends_with(&suffix)))
}

/// Character index of the first match, or -1.
fn find(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let needle = string_arg("find", args, 0)?;
    let found = text
        .find(&needle)
        .map_or(-1.0, |byte| text[..byte].chars().count() as f64);
    Ok(JikiObject::Number(found))
}

fn replace(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let old = string_arg("replace", args, 0)?;
    let new = string_arg("replace", args, 1)?;
    Ok(JikiObject::String(receiver_str(receiver)?.replace(&old, &new)))
}

fn count(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let needle = string_arg("count", args, 0)?;
    let n = if needle.is_empty() {
        text.chars().count() + 1
    } else {
        text.matches(needle.as_str()).count()
    };
    Ok(JikiObject::Number(n as f64))
}

fn isdigit(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    Ok(JikiObject::Boolean(
        !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()),
    ))
}

fn dunder_len(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::Number(receiver_str(receiver)?.chars().count() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Dialect;
    use jiki_types::LanguageFeatures;

    fn call(name: &str, receiver: &str, args: &[JikiObject]) -> Ret {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        (STR.method(name).unwrap().call)(&mut ctx, &JikiObject::string(receiver), args)
    }

    #[test]
    fn test_split_on_whitespace_by_default() {
        let parts = call("split", "  a  b ", &[]).unwrap();
        assert_eq!(parts.to_repr(Dialect::Python), "[\"a\", \"b\"]");
        assert!(matches!(
            call("split", "ab", &[JikiObject::string("")]),
            Err(StdlibError::Value(_))
        ));
    }

    #[test]
    fn test_join_requires_strings() {
        let items = JikiObject::list(vec![JikiObject::string("a"), JikiObject::string("b")]);
        assert_eq!(call("join", "-", &[items]).unwrap().as_str(), Some("a-b"));
        let mixed = JikiObject::list(vec![JikiObject::Number(1.0)]);
        assert!(matches!(call("join", "-", &[mixed]), Err(StdlibError::Type(_))));
    }

    #[test]
    fn test_find_count_capitalize() {
        assert_eq!(
            call("find", "hello", &[JikiObject::string("l")]).unwrap().as_number(),
            Some(2.0)
        );
        assert_eq!(
            call("count", "banana", &[JikiObject::string("an")]).unwrap().as_number(),
            Some(2.0)
        );
        assert_eq!(call("capitalize", "hELLO", &[]).unwrap().as_str(), Some("Hello"));
    }
}
