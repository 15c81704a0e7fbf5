//! JikiScript library functions, exposed subject to `allowedStdlibFunctions`.

use super::{arg, Arity, Method};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{Dialect, JikiObject};

type Ret = Result<JikiObject, StdlibError>;

pub static BUILTINS: &[Method] = &[
    Method::new("concatenate", Arity::AtLeast(1), concatenate),
    Method::new("to_upper_case", Arity::Exact(1), to_upper_case),
    Method::new("to_lower_case", Arity::Exact(1), to_lower_case),
    Method::new("number_to_string", Arity::Exact(1), number_to_string),
    Method::new("push", Arity::Exact(2), push),
    Method::new("length", Arity::Exact(1), length),
];

fn string_at(function: &str, args: &[JikiObject], i: usize) -> Result<String, StdlibError> {
    match arg(args, i) {
        JikiObject::String(s) => Ok(s),
        other => Err(StdlibError::type_error(format!(
            "{function} expects a string as input {}, not a {}",
            i + 1,
            other.type_name()
        ))),
    }
}

fn concatenate(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let mut out = String::new();
    for i in 0..args.len() {
        out.push_str(&string_at("concatenate", args, i)?);
    }
    Ok(JikiObject::String(out))
}

fn to_upper_case(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(string_at("to_upper_case", args, 0)?.to_uppercase()))
}

fn to_lower_case(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    Ok(JikiObject::String(string_at("to_lower_case", args, 0)?.to_lowercase()))
}

fn number_to_string(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    match arg(args, 0) {
        number @ JikiObject::Number(_) => Ok(JikiObject::String(number.to_display(Dialect::JikiScript))),
        other => Err(StdlibError::type_error(format!(
            "number_to_string expects a number, not a {}",
            other.type_name()
        ))),
    }
}

/// Lists travel by value, so the extended list is returned, not mutated.
fn push(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    match arg(args, 0) {
        JikiObject::List(items) => {
            let mut out = items.borrow().clone();
            out.push(arg(args, 1));
            Ok(JikiObject::list(out))
        }
        other => Err(StdlibError::type_error(format!(
            "push expects a list, not a {}",
            other.type_name()
        ))),
    }
}

fn length(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let n = match arg(args, 0) {
        JikiObject::String(s) => s.chars().count(),
        JikiObject::List(items) => items.borrow().len(),
        JikiObject::Dictionary(entries) => entries.borrow().len(),
        other => {
            return Err(StdlibError::type_error(format!(
                "length expects a list, string or dictionary, not a {}",
                other.type_name()
            )))
        }
    };
    Ok(JikiObject::Number(n as f64))
}
