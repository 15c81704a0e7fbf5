//! Shared types for the Jiki interpreters.
//!
//! This crate defines the per-language AST node types, source spans, the
//! syntax/runtime error catalogs, language feature configuration, frame
//! and result types, and the message translator used by every stage.

mod error;
mod features;
mod frame;
mod span;
pub mod ast;
pub mod translator;

pub use error::{
    system_message, ErrorContext, ExecutionError, RuntimeError, RuntimeErrorType, SyntaxError,
    SyntaxErrorType,
};
pub use features::{
    ConfigError, LanguageFeatures, StdlibAllowList, DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_ITERATIONS,
};
pub use frame::{
    CompilationResult, ExecutionResult, Frame, FrameResult, FrameStatus, FunctionEvaluation,
    LogLine, Snapshot,
};
pub use span::{SourceFile, Span};
pub use translator::{change_language, Language, Translator, TranslatorError};

/// Result type used by the scanners and parsers.
pub type Result<T> = std::result::Result<T, SyntaxError>;
