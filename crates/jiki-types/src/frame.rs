//! Execution trace types: snapshots, frames, and run results.

use crate::error::{ExecutionError, RuntimeError, SyntaxError};
use crate::span::Span;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Plain, deep-copied data with no shared references.
///
/// Serialized as the closest JSON shape: numbers, strings, booleans,
/// arrays, objects, and `null` for both `Null` and `Undefined`. JSON has
/// no non-finite numbers, so those go out as the strings `"Infinity"`,
/// `"-Infinity"` and `"NaN"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Number(#[serde(serialize_with = "serialize_number")] f64),
    String(String),
    Boolean(bool),
    List(Vec<Snapshot>),
    Dictionary(IndexMap<String, Snapshot>),
    Instance {
        class: String,
        fields: IndexMap<String, Snapshot>,
    },
    Function {
        function: String,
    },
    Iterator {
        iterator: String,
    },
    Null,
    Undefined,
}

impl Snapshot {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Snapshot::Number(n) => Some(*n),
            _ => None,
        }
    }
}

fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_finite() {
        serializer.serialize_f64(*n)
    } else if n.is_nan() {
        serializer.serialize_str("NaN")
    } else if n.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    pub jiki_object: Snapshot,
}

/// One recorded step of execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub index: usize,
    pub line: u32,
    pub code: String,
    pub status: FrameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FrameResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RuntimeError>,
    pub variables: BTreeMap<String, Snapshot>,
    pub description: String,
    pub time: u64,
    pub location: Span,
}

impl Frame {
    /// The value this step produced, if any.
    pub fn value(&self) -> Option<&Snapshot> {
        self.result.as_ref().map(|r| &r.jiki_object)
    }

    pub fn is_error(&self) -> bool {
        self.status == FrameStatus::Error
    }
}

/// A line written by `console.log`, `print` or `log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub time: u64,
    pub output: String,
}

/// Outcome of one `interpret` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub frames: Vec<Frame>,
    /// Set only for parse-time failures, in which case `frames` is empty.
    pub error: Option<SyntaxError>,
    pub success: bool,
    pub log_lines: Vec<LogLine>,
}

impl ExecutionResult {
    pub fn from_syntax_error(error: SyntaxError) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(error),
            success: false,
            log_lines: Vec::new(),
        }
    }

    pub fn from_frames(frames: Vec<Frame>, log_lines: Vec<LogLine>) -> Self {
        let success = !frames.iter().any(Frame::is_error);
        Self {
            frames,
            error: None,
            success,
            log_lines,
        }
    }

    /// The runtime error carried by the final frame, if execution failed.
    pub fn runtime_error(&self) -> Option<&RuntimeError> {
        self.frames.last().and_then(|f| f.error.as_ref())
    }
}

/// Outcome of a parse-only `compile` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationResult {
    pub success: bool,
    pub error: Option<SyntaxError>,
}

/// Outcome of calling one named function after running a program's
/// declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvaluation {
    pub value: Option<Snapshot>,
    pub frames: Vec<Frame>,
    pub log_lines: Vec<LogLine>,
    pub success: bool,
    pub error: Option<ExecutionError>,
}
