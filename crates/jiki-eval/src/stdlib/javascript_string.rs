//! `String.prototype` members. Indices count characters.

use super::{
    arg, clamp_bound, integer_arg, optional_integer, position_arg, receiver_str, string_arg, Arity, Method,
    Property, TypeTable,
};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{repeated_length, Dialect, JikiObject};

type Ret = Result<JikiObject, StdlibError>;

pub static STRING: TypeTable = TypeTable {
    name: "string",
    properties: &[Property {
        name: "length",
        get: length,
    }],
    methods: &[
        Method::new("at", Arity::Exact(1), at),
        Method::new("charAt", Arity::Range(0, 1), char_at),
        Method::new("toUpperCase", Arity::Exact(0), to_upper_case),
        Method::new("toLowerCase", Arity::Exact(0), to_lower_case),
        Method::new("trim", Arity::Exact(0), trim),
        Method::new("includes", Arity::Range(1, 2), includes),
        Method::new("indexOf", Arity::Range(1, 2), index_of),
        Method::new("startsWith", Arity::Range(1, 2), starts_with),
        Method::new("endsWith", Arity::Range(1, 2), ends_with),
        Method::new("slice", Arity::Range(0, 2), slice),
        Method::new("split", Arity::Range(0, 2), split),
        Method::new("repeat", Arity::Exact(1), repeat),
        Method::new("replace", Arity::Exact(2), replace),
        Method::new("concat", Arity::AtLeast(0), concat),
        Method::new("toString", Arity::Exact(0), to_string),
        Method::stub("padStart"),
        Method::stub("padEnd"),
        Method::stub("match"),
        Method::stub("search"),
        Method::stub("replaceAll"),
        Method::stub("localeCompare"),
    ],
};

fn chars(receiver: &JikiObject) -> Result<Vec<char>, StdlibError> {
    Ok(receiver_str(receiver)?.chars().collect())
}

fn length(receiver: &JikiObject) -> JikiObject {
    match receiver {
        JikiObject::String(s) => JikiObject::Number(s.chars().count() as f64),
        _ => JikiObject::Undefined,
    }
}

fn at(ctx: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let chars = chars(receiver)?;
    let index = position_arg(ctx, "at", args, 0)?;
    Ok(super::resolve_index(index, chars.len())
        .map(|i| JikiObject::String(chars[i].to_string()))
        .unwrap_or(JikiObject::Undefined))
}

fn char_at(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let chars = chars(receiver)?;
    let index = optional_integer("charAt", args, 0, 0)?;
    let found = usize::try_from(index)
        .ok()
        .and_then(|i| chars.get(i))
        .map(char::to_string)
        .unwrap_or_default();
    Ok(JikiObject::String(found))
}

fn to_upper_case(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(receiver_str(receiver)?.to_uppercase()))
}

fn to_lower_case(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(receiver_str(receiver)?.to_lowercase()))
}

fn trim(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(receiver_str(receiver)?.trim().to_string()))
}

/// Character offset of `needle` at or after `from`.
fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

fn includes(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let haystack = chars(receiver)?;
    let needle: Vec<char> = string_arg("includes", args, 0)?.chars().collect();
    let from = clamp_bound(optional_integer("includes", args, 1, 0)?.max(0), haystack.len());
    Ok(JikiObject::Boolean(find_from(&haystack, &needle, from).is_some()))
}

fn index_of(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let haystack = chars(receiver)?;
    let needle: Vec<char> = string_arg("indexOf", args, 0)?.chars().collect();
    let from = clamp_bound(optional_integer("indexOf", args, 1, 0)?.max(0), haystack.len());
    Ok(JikiObject::Number(
        find_from(&haystack, &needle, from).map_or(-1.0, |i| i as f64),
    ))
}

fn starts_with(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let haystack = chars(receiver)?;
    let needle: Vec<char> = string_arg("startsWith", args, 0)?.chars().collect();
    let from = clamp_bound(optional_integer("startsWith", args, 1, 0)?.max(0), haystack.len());
    Ok(JikiObject::Boolean(haystack[from..].starts_with(&needle)))
}

fn ends_with(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let haystack = chars(receiver)?;
    let needle: Vec<char> = string_arg("endsWith", args, 0)?.chars().collect();
    let len = haystack.len();
    let end = clamp_bound(optional_integer("endsWith", args, 1, len as i64)?.max(0), len);
    Ok(JikiObject::Boolean(haystack[..end].ends_with(&needle)))
}

fn slice(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let chars = chars(receiver)?;
    let len = chars.len();
    let start = clamp_bound(optional_integer("slice", args, 0, 0)?, len);
    let end = clamp_bound(optional_integer("slice", args, 1, len as i64)?, len);
    let out: String = if start < end {
        chars[start..end].iter().collect()
    } else {
        String::new()
    };
    Ok(JikiObject::String(out))
}

fn split(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let parts: Vec<String> = match arg(args, 0) {
        JikiObject::Undefined => vec![text.to_string()],
        JikiObject::String(sep) if sep.is_empty() => text.chars().map(String::from).collect(),
        JikiObject::String(sep) => text.split(sep.as_str()).map(String::from).collect(),
        other => {
            return Err(StdlibError::type_error(format!(
                "split() expects a string separator, got {}",
                other.type_name()
            )))
        }
    };
    let limit = optional_integer("split", args, 1, i64::MAX)?.max(0) as usize;
    Ok(JikiObject::list(
        parts.into_iter().take(limit).map(JikiObject::String).collect(),
    ))
}

fn repeat(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let count = integer_arg("repeat", args, 0)?;
    let count = usize::try_from(count)
        .map_err(|_| StdlibError::Range(format!("Invalid count value: {count}")))?;
    if repeated_length(text.len(), count as f64).is_none() {
        return Err(StdlibError::too_long("string"));
    }
    Ok(JikiObject::String(text.repeat(count)))
}

/// Replaces the first occurrence only.
fn replace(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = receiver_str(receiver)?;
    let pattern = string_arg("replace", args, 0)?;
    let replacement = string_arg("replace", args, 1)?;
    Ok(JikiObject::String(text.replacen(&pattern, &replacement, 1)))
}

fn concat(_: &mut CallContext<'_>, receiver: &JikiObject, args: &[JikiObject]) -> Ret {
    let mut out = receiver_str(receiver)?.to_string();
    for value in args {
        out.push_str(&value.to_display(Dialect::JavaScript));
    }
    Ok(JikiObject::String(out))
}

fn to_string(_: &mut CallContext<'_>, receiver: &JikiObject, _: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(receiver_str(receiver)?.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_types::LanguageFeatures;

    fn call(name: &str, receiver: &str, args: &[JikiObject]) -> Result<JikiObject, StdlibError> {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let method = STRING.method(name).unwrap();
        (method.call)(&mut ctx, &JikiObject::string(receiver), args)
    }

    fn text(value: Result<JikiObject, StdlibError>) -> String {
        value.unwrap().as_str().unwrap().to_string()
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(text(call("toUpperCase", "abc", &[])), "ABC");
        assert_eq!(text(call("trim", "  a b ", &[])), "a b");
    }

    #[test]
    fn test_index_of_counts_characters() {
        let found = call("indexOf", "héllo", &[JikiObject::string("l")]).unwrap();
        assert_eq!(found.as_number(), Some(2.0));
        let missing = call("indexOf", "abc", &[JikiObject::string("z")]).unwrap();
        assert_eq!(missing.as_number(), Some(-1.0));
    }

    #[test]
    fn test_split_variants() {
        let parts = call("split", "a,b,c", &[JikiObject::string(",")]).unwrap();
        assert_eq!(parts.to_repr(Dialect::JavaScript), "[\"a\", \"b\", \"c\"]");
        let chars = call("split", "ab", &[JikiObject::string("")]).unwrap();
        assert_eq!(chars.to_repr(Dialect::JavaScript), "[\"a\", \"b\"]");
        let whole = call("split", "ab", &[]).unwrap();
        assert_eq!(whole.to_repr(Dialect::JavaScript), "[\"ab\"]");
    }

    #[test]
    fn test_repeat_refuses_huge_counts() {
        assert!(matches!(
            call("repeat", "abc", &[JikiObject::Number(1e12)]),
            Err(StdlibError::Range(_))
        ));
        assert!(matches!(
            call("repeat", "abc", &[JikiObject::Number(-1.0)]),
            Err(StdlibError::Range(_))
        ));
        assert_eq!(text(call("repeat", "", &[JikiObject::Number(1e12)])), "");
    }

    #[test]
    fn test_slice_replace_repeat() {
        assert_eq!(text(call("slice", "hello", &[JikiObject::Number(-3.0)])), "llo");
        assert_eq!(
            text(call(
                "replace",
                "aXbX",
                &[JikiObject::string("X"), JikiObject::string("-")]
            )),
            "a-bX"
        );
        assert_eq!(text(call("repeat", "ab", &[JikiObject::Number(2.0)])), "abab");
    }
}
