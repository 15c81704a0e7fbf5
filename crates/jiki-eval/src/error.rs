//! Evaluation results, completion signals and stdlib errors.

use crate::stdlib::Arity;
use crate::value::{Dialect, JikiObject};
use jiki_types::{RuntimeError, RuntimeErrorType, Span};

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished. `return`/`break`/`continue` travel as values,
/// never as errors.
#[derive(Debug, Clone)]
pub enum Completion {
    Normal,
    Return(JikiObject),
    Break,
    Continue,
}

/// A failure raised inside a stdlib method or builtin.
///
/// Carries no location; the evaluator attaches the call site's span when
/// converting it with [`StdlibError::into_runtime`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StdlibError {
    #[error("{function}() expects {} arguments but got {got}", expected.describe())]
    Arity {
        function: String,
        expected: Arity,
        got: usize,
    },
    #[error("type error: {0}")]
    Type(String),
    #[error("value error: {0}")]
    Value(String),
    #[error("range error: {0}")]
    Range(String),
    #[error("index {index} is out of range for length {length}")]
    Index { index: String, length: usize },
    #[error("key '{0}' not found")]
    Key(String),
    #[error("'{0}' is not implemented yet")]
    NotImplemented(String),
}

impl StdlibError {
    pub fn type_error(details: impl Into<String>) -> Self {
        StdlibError::Type(details.into())
    }

    /// A result longer than [`MAX_SEQUENCE_LENGTH`](crate::MAX_SEQUENCE_LENGTH).
    pub fn too_long(what: &str) -> Self {
        StdlibError::Range(format!(
            "the resulting {what} would be longer than {} elements",
            crate::MAX_SEQUENCE_LENGTH
        ))
    }

    /// The runtime error a front-end reports for this failure.
    pub fn into_runtime(self, dialect: Dialect, span: Span) -> RuntimeError {
        match self {
            StdlibError::Arity {
                function,
                expected,
                got,
            } => {
                let ty = match dialect {
                    Dialect::JikiScript if got < expected.min() => {
                        RuntimeErrorType::RangeErrorTooFewArgumentsForFunctionCall
                    }
                    Dialect::JikiScript => RuntimeErrorType::RangeErrorTooManyArgumentsForFunctionCall,
                    _ => RuntimeErrorType::InvalidNumberOfArguments,
                };
                let key = match dialect {
                    Dialect::JikiScript => "name",
                    _ => "function",
                };
                RuntimeError::new(ty, span)
                    .with(key, function)
                    .with("expected", expected.describe())
                    .with("got", got.to_string())
            }
            StdlibError::Type(details) => {
                RuntimeError::new(RuntimeErrorType::TypeError, span).with("details", details)
            }
            StdlibError::Value(details) => {
                let ty = match dialect {
                    Dialect::Python => RuntimeErrorType::ValueError,
                    _ => RuntimeErrorType::TypeError,
                };
                RuntimeError::new(ty, span).with("details", details)
            }
            StdlibError::Range(details) => {
                let ty = match dialect {
                    Dialect::Python => RuntimeErrorType::ValueError,
                    Dialect::JavaScript => RuntimeErrorType::RangeError,
                    Dialect::JikiScript => RuntimeErrorType::TypeError,
                };
                RuntimeError::new(ty, span).with("details", details)
            }
            StdlibError::Index { index, length } => {
                let ty = match dialect {
                    Dialect::Python => RuntimeErrorType::IndexError,
                    Dialect::JavaScript => RuntimeErrorType::IndexOutOfRange,
                    Dialect::JikiScript => RuntimeErrorType::IndexOutOfRangeForArrayAccess,
                };
                RuntimeError::new(ty, span)
                    .with("index", index)
                    .with("length", length.to_string())
            }
            StdlibError::Key(key) => match dialect {
                Dialect::Python => {
                    RuntimeError::new(RuntimeErrorType::KeyError, span).with("key", key)
                }
                _ => RuntimeError::new(RuntimeErrorType::TypeError, span)
                    .with("details", format!("key '{key}' not found")),
            },
            StdlibError::NotImplemented(method) => {
                RuntimeError::new(RuntimeErrorType::MethodNotYetImplemented, span)
                    .with("method", method)
            }
        }
    }
}
