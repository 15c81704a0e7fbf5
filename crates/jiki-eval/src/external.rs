//! Host-supplied functions and the context every native call receives.

use crate::stdlib::Arity;
use crate::value::JikiObject;
use jiki_types::LanguageFeatures;
use std::fmt;
use std::rc::Rc;

/// An exercise-defined failure raised by an external function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LogicError {
    pub message: String,
}

impl LogicError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What a native function can see and do while it runs.
pub struct CallContext<'a> {
    features: &'a LanguageFeatures,
    output: Vec<String>,
}

impl<'a> CallContext<'a> {
    pub fn new(features: &'a LanguageFeatures) -> Self {
        Self {
            features,
            output: Vec::new(),
        }
    }

    pub fn features(&self) -> &LanguageFeatures {
        self.features
    }

    /// Queue a line of program output.
    pub fn log(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub(crate) fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

pub type ExternalFn = dyn Fn(&mut CallContext<'_>, &[JikiObject]) -> Result<JikiObject, LogicError>;

/// A function the surrounding exercise exposes to student code.
#[derive(Clone)]
pub struct ExternalFunction {
    pub name: String,
    pub arity: Arity,
    pub func: Rc<ExternalFn>,
}

impl ExternalFunction {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        func: impl Fn(&mut CallContext<'_>, &[JikiObject]) -> Result<JikiObject, LogicError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Rc::new(func),
        }
    }
}

impl fmt::Debug for ExternalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}
