//! Frame recording.
//!
//! Every observable step appends one [`Frame`] carrying a deep snapshot of
//! the visible variables. Frames are never touched once pushed.

use crate::scope::Scope;
use crate::value::{Dialect, JikiObject};
use jiki_types::{
    ErrorContext, Frame, FrameResult, FrameStatus, LogLine, RuntimeError, Span, Translator,
};
use tracing::trace;

/// A translation key plus the values its template needs.
#[derive(Debug, Clone)]
pub struct Description {
    pub key: &'static str,
    pub context: ErrorContext,
}

impl Description {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            context: ErrorContext::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key, value);
        self
    }
}

pub struct Recorder<'s> {
    source: &'s str,
    translator: Translator,
    dialect: Dialect,
    frames: Vec<Frame>,
    log_lines: Vec<LogLine>,
    time: u64,
}

impl<'s> Recorder<'s> {
    pub fn new(source: &'s str, translator: Translator, dialect: Dialect) -> Self {
        Self {
            source,
            translator,
            dialect,
            frames: Vec::new(),
            log_lines: Vec::new(),
            time: 0,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Render a value the way descriptions show it.
    pub fn repr(&self, value: &JikiObject) -> String {
        value.to_repr(self.dialect)
    }

    /// Append a `SUCCESS` frame.
    pub fn success(
        &mut self,
        span: Span,
        result: Option<&JikiObject>,
        description: Description,
        scope: &Scope,
    ) {
        let text = self.translator.translate(description.key, &description.context);
        let result = result.map(|value| FrameResult {
            jiki_object: value.unwrap(),
        });
        self.push(span, FrameStatus::Success, result, None, text, scope);
    }

    /// Append the run's final `ERROR` frame.
    pub fn error(&mut self, error: RuntimeError, scope: &Scope) {
        let error = error.localize(&self.translator);
        let context: ErrorContext = [("message", error.message.as_str())].into_iter().collect();
        let text = self.translator.translate("describe.error", &context);
        let span = error.location;
        self.push(span, FrameStatus::Error, None, Some(error), text, scope);
    }

    /// Record a line of program output at the current time.
    pub fn log(&mut self, output: String) {
        self.log_lines.push(LogLine {
            time: self.time,
            output,
        });
    }

    /// Source text under `span`.
    pub fn code(&self, span: Span) -> &'s str {
        self.source.get(span.start..span.end).unwrap_or_default()
    }

    /// The most recent line of program output.
    pub fn last_log(&self) -> Option<&str> {
        self.log_lines.last().map(|line| line.output.as_str())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn finish(self) -> (Vec<Frame>, Vec<LogLine>) {
        (self.frames, self.log_lines)
    }

    fn push(
        &mut self,
        span: Span,
        status: FrameStatus,
        result: Option<FrameResult>,
        error: Option<RuntimeError>,
        description: String,
        scope: &Scope,
    ) {
        let code = self.code(span).to_string();
        let frame = Frame {
            index: self.frames.len(),
            line: span.start_line,
            code,
            status,
            result,
            error,
            variables: scope.snapshot(),
            description,
            time: self.time,
            location: span,
        };
        trace!(
            target: "jiki::eval",
            index = frame.index,
            line = frame.line,
            status = ?frame.status,
            "frame recorded"
        );
        self.frames.push(frame);
        self.time += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_types::{Language, RuntimeErrorType, Snapshot};

    fn span(start: usize, end: usize) -> Span {
        Span::new(1, start as u32 + 1, 1, end as u32 + 1, start, end)
    }

    #[test]
    fn test_frames_carry_code_time_and_variables() {
        let source = "let x = 1;";
        let scope = Scope::global();
        scope.define("x", JikiObject::Number(1.0), false);
        let mut recorder = Recorder::new(source, Translator::new(Language::En), Dialect::JavaScript);
        recorder.success(
            span(0, 9),
            Some(&JikiObject::Number(1.0)),
            Description::new("describe.declaration")
                .with("name", "x")
                .with("value", "1"),
            &scope,
        );
        recorder.log("hello".into());
        recorder.success(span(4, 5), None, Description::new("describe.pass"), &scope);
        let (frames, logs) = recorder.finish();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].code, "let x = 1");
        assert_eq!(frames[0].time, 0);
        assert_eq!(frames[1].time, 1);
        assert_eq!(frames[1].index, 1);
        assert_eq!(frames[0].variables.get("x"), Some(&Snapshot::Number(1.0)));
        assert_eq!(
            frames[0].description,
            "Declared the variable x with the value 1."
        );
        assert_eq!(logs[0].time, 1);
    }

    #[test]
    fn test_error_frame_is_localized() {
        let scope = Scope::global();
        let mut recorder = Recorder::new("x", Translator::new(Language::System), Dialect::Python);
        let error = RuntimeError::new(RuntimeErrorType::UndefinedVariable, span(0, 1)).with("name", "x");
        recorder.error(error, &scope);
        let (frames, _) = recorder.finish();
        assert_eq!(frames[0].status, FrameStatus::Error);
        let error = frames[0].error.as_ref().unwrap();
        assert_eq!(error.message, "UndefinedVariable: name: x");
        assert!(frames[0].result.is_none());
    }
}
