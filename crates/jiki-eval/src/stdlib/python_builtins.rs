//! Python builtin functions.

use super::{arg, integer_arg, number_arg, Arity, Method};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{Dialect, IteratorState, JikiObject};

type Ret = Result<JikiObject, StdlibError>;

pub static BUILTINS: &[Method] = &[
    Method::new("print", Arity::AtLeast(0), print),
    Method::new("len", Arity::Exact(1), len),
    Method::new("range", Arity::Range(1, 3), range),
    Method::new("str", Arity::Range(0, 1), to_str),
    Method::new("abs", Arity::Exact(1), abs),
    Method::new("min", Arity::AtLeast(1), min),
    Method::new("max", Arity::AtLeast(1), max),
];

/// The name Python reports for a value's type.
pub fn python_type_name(value: &JikiObject) -> &'static str {
    match value {
        JikiObject::Number(n) if n.fract() == 0.0 && n.is_finite() => "int",
        JikiObject::Number(_) => "float",
        JikiObject::String(_) => "str",
        JikiObject::Boolean(_) => "bool",
        JikiObject::List(_) => "list",
        JikiObject::Dictionary(_) => "dict",
        JikiObject::Null | JikiObject::Undefined => "NoneType",
        JikiObject::Function(_) => "function",
        JikiObject::Instance(_) => "object",
        JikiObject::Iterator(_) => "range",
    }
}

fn print(ctx: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let line = args
        .iter()
        .map(|v| v.to_display(Dialect::Python))
        .collect::<Vec<_>>()
        .join(" ");
    ctx.log(line);
    Ok(JikiObject::Null)
}

fn len(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let n = match &arg(args, 0) {
        JikiObject::String(s) => s.chars().count(),
        JikiObject::List(items) => items.borrow().len(),
        JikiObject::Dictionary(entries) => entries.borrow().len(),
        other => {
            return Err(StdlibError::type_error(format!(
                "object of type '{}' has no len()",
                python_type_name(other)
            )))
        }
    };
    Ok(JikiObject::Number(n as f64))
}

/// `range(stop)`, `range(start, stop)`, `range(start, stop, step)`.
fn range(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let mut bounds = Vec::with_capacity(args.len());
    for (i, value) in args.iter().enumerate() {
        let n = integer_arg("range", args, i).map_err(|_| {
            StdlibError::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                python_type_name(value)
            ))
        })?;
        bounds.push(n as f64);
    }
    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0.0, *stop, 1.0),
        [start, stop] => (*start, *stop, 1.0),
        [start, stop, step] => (*start, *stop, *step),
        _ => (0.0, 0.0, 1.0),
    };
    if step == 0.0 {
        return Err(StdlibError::Value("range() arg 3 must not be zero".into()));
    }
    Ok(JikiObject::iterator(IteratorState::range(start, stop, step)))
}

fn to_str(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let text = match args.first() {
        Some(value) => value.to_display(Dialect::Python),
        None => String::new(),
    };
    Ok(JikiObject::String(text))
}

fn abs(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    number_arg("abs", args, 0).map(|n| JikiObject::Number(n.abs())).map_err(|_| {
        StdlibError::type_error(format!(
            "bad operand type for abs(): '{}'",
            python_type_name(&arg(args, 0))
        ))
    })
}

/// A single list argument is searched; several arguments are compared directly.
fn extreme(name: &str, args: &[JikiObject], want: std::cmp::Ordering) -> Ret {
    let candidates = match args {
        [JikiObject::List(items)] => items.borrow().clone(),
        [JikiObject::String(s)] => s.chars().map(|c| JikiObject::String(c.into())).collect(),
        [single] => {
            return Err(StdlibError::type_error(format!(
                "'{}' object is not iterable",
                python_type_name(single)
            )))
        }
        _ => args.to_vec(),
    };
    let mut iter = candidates.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(StdlibError::Value(format!("{name}() arg is an empty sequence")));
    };
    for candidate in iter {
        if super::python_list::compare(&candidate, &best)? == want {
            best = candidate;
        }
    }
    Ok(best)
}

fn min(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    extreme("min", args, std::cmp::Ordering::Less)
}

fn max(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    extreme("max", args, std::cmp::Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_types::LanguageFeatures;

    fn call(name: &str, args: &[JikiObject]) -> Ret {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let method = BUILTINS.iter().find(|m| m.name == name).unwrap();
        (method.call)(&mut ctx, &JikiObject::Undefined, args)
    }

    #[test]
    fn test_len_by_type() {
        assert_eq!(call("len", &[JikiObject::string("héllo")]).unwrap().as_number(), Some(5.0));
        let err = call("len", &[JikiObject::Number(5.0)]).unwrap_err();
        assert_eq!(
            err,
            StdlibError::Type("object of type 'int' has no len()".into())
        );
    }

    #[test]
    fn test_range_forms() {
        let collect = |args: &[f64]| -> Vec<f64> {
            let args: Vec<_> = args.iter().map(|n| JikiObject::Number(*n)).collect();
            match call("range", &args).unwrap() {
                JikiObject::Iterator(state) => state
                    .borrow()
                    .clone()
                    .filter_map(|v| v.as_number())
                    .collect(),
                other => panic!("expected iterator, got {other:?}"),
            }
        };
        assert_eq!(collect(&[3.0]), vec![0.0, 1.0, 2.0]);
        assert_eq!(collect(&[1.0, 4.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(collect(&[5.0, 0.0, -2.0]), vec![5.0, 3.0, 1.0]);
        assert!(matches!(
            call("range", &[JikiObject::Number(0.0), JikiObject::Number(1.0), JikiObject::Number(0.0)]),
            Err(StdlibError::Value(_))
        ));
        assert!(call("range", &[JikiObject::Number(1.5)]).is_err());
    }

    #[test]
    fn test_min_max() {
        let list = JikiObject::list(vec![JikiObject::Number(3.0), JikiObject::Number(1.0)]);
        assert_eq!(call("min", &[list.clone()]).unwrap().as_number(), Some(1.0));
        assert_eq!(call("max", &[list]).unwrap().as_number(), Some(3.0));
        assert_eq!(
            call("max", &[JikiObject::Number(2.0), JikiObject::Number(9.0)]).unwrap().as_number(),
            Some(9.0)
        );
        assert!(matches!(
            call("min", &[JikiObject::list(Vec::new())]),
            Err(StdlibError::Value(_))
        ));
    }

    #[test]
    fn test_print_and_str() {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let print = BUILTINS.iter().find(|m| m.name == "print").unwrap();
        let args = [JikiObject::Boolean(true), JikiObject::Null];
        (print.call)(&mut ctx, &JikiObject::Undefined, &args).unwrap();
        assert_eq!(ctx.take_output(), vec!["True None".to_string()]);
        assert_eq!(call("str", &[JikiObject::Number(4.0)]).unwrap().as_str(), Some("4"));
    }
}
