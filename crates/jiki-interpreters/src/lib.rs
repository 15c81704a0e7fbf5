//! Jiki interpreters: source text in, execution frames out.
//!
//! ```text
//! Source → Scanner → Parser (+ allowedNodes) → Evaluator (+ guards) → Frames
//! ```
//!
//! Each language module exposes the same three operations:
//!
//! - `interpret` runs a whole program and returns every recorded frame.
//! - `compile` only parses, reporting the first syntax error.
//! - `evaluate_function` runs the declarations, then calls one function.
//!
//! ```no_run
//! use jiki_interpreters::{javascript, EvaluationContext};
//!
//! let result = javascript::interpret("let x = 1 + 2", &EvaluationContext::default());
//! assert!(result.success);
//! ```

mod context;
mod pipeline;
pub mod javascript;
pub mod jikiscript;
pub mod logging;
pub mod python;

pub use context::EvaluationContext;
pub use jiki_eval::{
    Arity, CallContext as ExternalCallContext, ExternalFunction, JikiObject, LogicError,
};
pub use jiki_types::{
    change_language, CompilationResult, ExecutionError, ExecutionResult, Frame, FrameStatus,
    FunctionEvaluation, Language, LanguageFeatures, LogLine, RuntimeError, RuntimeErrorType,
    Snapshot, SyntaxError, SyntaxErrorType, Translator, TranslatorError,
};
