//! The `console` and `Math` namespaces.

use super::{number_arg, Arity, Method, Property, TypeTable};
use crate::error::StdlibError;
use crate::external::CallContext;
use crate::value::{Dialect, JikiObject};

type Ret = Result<JikiObject, StdlibError>;

pub static CONSOLE: TypeTable = TypeTable {
    name: "console",
    properties: &[],
    methods: &[Method::new("log", Arity::AtLeast(0), log)],
};

pub static MATH: TypeTable = TypeTable {
    name: "Math",
    properties: &[Property { name: "PI", get: pi }],
    methods: &[
        Method::new("abs", Arity::Exact(1), abs),
        Method::new("round", Arity::Exact(1), round),
        Method::new("floor", Arity::Exact(1), floor),
        Method::new("ceil", Arity::Exact(1), ceil),
        Method::new("sqrt", Arity::Exact(1), sqrt),
        Method::new("pow", Arity::Exact(2), pow),
        Method::new("min", Arity::AtLeast(0), min),
        Method::new("max", Arity::AtLeast(0), max),
        Method::stub("random"),
    ],
};

pub static NAMESPACES: &[&TypeTable] = &[&CONSOLE, &MATH];

fn log(ctx: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let line = args
        .iter()
        .map(|v| v.to_display(Dialect::JavaScript))
        .collect::<Vec<_>>()
        .join(" ");
    ctx.log(line);
    Ok(JikiObject::Undefined)
}

fn pi(_: &JikiObject) -> JikiObject {
    JikiObject::Number(std::f64::consts::PI)
}

fn unary(name: &str, args: &[JikiObject], f: fn(f64) -> f64) -> Ret {
    Ok(JikiObject::number(f(number_arg(name, args, 0)?)))
}

fn abs(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    unary("abs", args, f64::abs)
}

/// Halves round towards positive infinity.
fn round(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    unary("round", args, |n| (n + 0.5).floor())
}

fn floor(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    unary("floor", args, f64::floor)
}

fn ceil(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    unary("ceil", args, f64::ceil)
}

fn sqrt(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    unary("sqrt", args, f64::sqrt)
}

fn pow(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    let base = number_arg("pow", args, 0)?;
    let exponent = number_arg("pow", args, 1)?;
    Ok(JikiObject::number(base.powf(exponent)))
}

fn fold(name: &str, args: &[JikiObject], init: f64, pick: fn(f64, f64) -> f64) -> Ret {
    let mut acc = init;
    for i in 0..args.len() {
        let n = number_arg(name, args, i)?;
        if n.is_nan() {
            return Ok(JikiObject::Number(f64::NAN));
        }
        acc = pick(acc, n);
    }
    Ok(JikiObject::Number(acc))
}

fn min(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    fold("min", args, f64::INFINITY, f64::min)
}

fn max(_: &mut CallContext<'_>, _: &JikiObject, args: &[JikiObject]) -> Ret {
    fold("max", args, f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_types::LanguageFeatures;

    #[test]
    fn test_console_log_queues_output() {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let method = CONSOLE.method("log").unwrap();
        let args = [JikiObject::string("a"), JikiObject::Number(1.0)];
        (method.call)(&mut ctx, &JikiObject::Undefined, &args).unwrap();
        assert_eq!(ctx.take_output(), vec!["a 1".to_string()]);
    }

    #[test]
    fn test_math_functions() {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let call = |ctx: &mut CallContext<'_>, name: &str, args: &[f64]| {
            let args: Vec<_> = args.iter().map(|n| JikiObject::Number(*n)).collect();
            let method = MATH.method(name).unwrap();
            (method.call)(ctx, &JikiObject::Undefined, &args)
                .unwrap()
                .as_number()
                .unwrap()
        };
        assert_eq!(call(&mut ctx, "round", &[2.5]), 3.0);
        assert_eq!(call(&mut ctx, "round", &[-2.5]), -2.0);
        assert_eq!(call(&mut ctx, "max", &[1.0, 7.0, 3.0]), 7.0);
        assert_eq!(call(&mut ctx, "min", &[]), f64::INFINITY);
        assert_eq!(call(&mut ctx, "pow", &[2.0, 10.0]), 1024.0);
        assert_eq!((MATH.properties[0].get)(&JikiObject::Undefined).as_number(), Some(std::f64::consts::PI));
    }

    #[test]
    fn test_math_rejects_non_numbers() {
        let features = LanguageFeatures::default();
        let mut ctx = CallContext::new(&features);
        let method = MATH.method("abs").unwrap();
        let err = (method.call)(&mut ctx, &JikiObject::Undefined, &[JikiObject::string("1")]);
        assert!(matches!(err, Err(StdlibError::Type(_))));
    }
}
