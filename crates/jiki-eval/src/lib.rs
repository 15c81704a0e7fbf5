//! Jiki tree-walking evaluators.
//!
//! Runs a parsed JikiScript, JavaScript or Python program statement by
//! statement. Every step is recorded as a [`Frame`](jiki_types::Frame)
//! holding a deep snapshot of the visible variables, so a learner can
//! scrub back and forth through the run. Footgun guards refuse the
//! constructs a [`LanguageFeatures`](jiki_types::LanguageFeatures) turns off.

mod error;
mod external;
mod guards;
mod recorder;
mod runtime;
mod scope;
mod value;
pub mod javascript;
pub mod jikiscript;
pub mod python;
pub mod stdlib;

pub use error::{Completion, EvalResult, StdlibError};
pub use external::{CallContext, ExternalFn, ExternalFunction, LogicError};
pub use guards::{GuardResult, LoopGuard, Violation};
pub use recorder::{Description, Recorder};
pub use runtime::{CallOutput, EvalOptions, RunOutput};
pub use scope::{AssignError, Binding, Scope};
pub use stdlib::Arity;
pub use value::{
    format_number, identical, repeated_length, round_number, structural_eq, Callable, Dialect,
    JikiObject, MAX_SEQUENCE_LENGTH,
};
