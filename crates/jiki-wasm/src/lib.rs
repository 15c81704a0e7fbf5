//! Jiki interpreters as a WASM module for browser environments.
//!
//! This crate exposes the three interpreters via `wasm-bindgen`, suitable
//! for running in a browser Web Worker. Everything goes in and out as JSON.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { interpret } from 'jiki-wasm';
//!
//! await init();
//!
//! const result = interpret("javascript", "let x = 1 + 2", '{"language": "en"}');
//! console.log(JSON.parse(result));
//! // { frames: [...], error: null, success: true, logLines: [] }
//! ```
//!
//! The context JSON is optional (an empty string means defaults):
//!
//! ```json
//! { "languageFeatures": { "allowTruthiness": true }, "language": "nl" }
//! ```

use jiki_interpreters::{javascript, jikiscript, python, EvaluationContext};
use jiki_types::{
    CompilationResult, ExecutionResult, FunctionEvaluation, Language, LanguageFeatures, Snapshot,
    Translator,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Which front-end a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceLanguage {
    JikiScript,
    JavaScript,
    Python,
}

impl SourceLanguage {
    fn parse(name: &str) -> Result<Self, String> {
        match name {
            "jikiscript" => Ok(Self::JikiScript),
            "javascript" => Ok(Self::JavaScript),
            "python" => Ok(Self::Python),
            other => Err(format!("unknown language '{other}'")),
        }
    }
}

/// The host-side context object, as JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HostContext {
    language_features: LanguageFeatures,
    external_functions: Vec<String>,
    language: Option<String>,
}

/// Envelope for failures that happen before any interpreter runs.
#[derive(Debug, Serialize)]
struct HostError {
    success: bool,
    frames: [(); 0],
    error: HostErrorDetail,
}

#[derive(Debug, Serialize)]
struct HostErrorDetail {
    #[serde(rename = "type")]
    error_type: &'static str,
    message: String,
}

fn host_error(message: impl Into<String>) -> String {
    let envelope = HostError {
        success: false,
        frames: [],
        error: HostErrorDetail {
            error_type: "HostError",
            message: message.into(),
        },
    };
    to_json(&envelope)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"frames":[],"error":{{"type":"HostError","message":"Serialization error: {}"}}}}"#,
            e
        )
    })
}

fn context(json: &str) -> Result<EvaluationContext, String> {
    if json.trim().is_empty() {
        return Ok(EvaluationContext::default());
    }
    let host: HostContext =
        serde_json::from_str(json).map_err(|e| format!("invalid context: {e}"))?;
    if !host.external_functions.is_empty() {
        return Err(format!(
            "external functions cannot cross the JSON boundary: {}",
            host.external_functions.join(", ")
        ));
    }
    let mut context = EvaluationContext::new(host.language_features);
    if let Some(code) = host.language {
        let language =
            Language::from_code(&code).ok_or_else(|| format!("unknown language code '{code}'"))?;
        context = context.with_translator(Translator::new(language));
    }
    Ok(context)
}

fn run_interpret(language: &str, source: &str, context_json: &str) -> Result<ExecutionResult, String> {
    let language = SourceLanguage::parse(language)?;
    let context = context(context_json)?;
    Ok(match language {
        SourceLanguage::JikiScript => jikiscript::interpret(source, &context),
        SourceLanguage::JavaScript => javascript::interpret(source, &context),
        SourceLanguage::Python => python::interpret(source, &context),
    })
}

/// Run a whole program.
///
/// Returns a JSON string containing an `ExecutionResult`:
/// ```json
/// { "frames": [...], "error": null, "success": true, "logLines": [...] }
/// ```
///
/// A syntax error gives `frames: []` and a non-null `error`. A runtime
/// error is the last frame, with status `ERROR`.
#[wasm_bindgen]
pub fn interpret(language: &str, source: &str, context_json: &str) -> String {
    match run_interpret(language, source, context_json) {
        Ok(result) => to_json(&result),
        Err(message) => host_error(message),
    }
}

/// Same as [`interpret`], but hands back a plain JS object instead of a
/// JSON string.
#[wasm_bindgen(js_name = interpretObject)]
pub fn interpret_object(language: &str, source: &str, context_json: &str) -> Result<JsValue, JsError> {
    let result = run_interpret(language, source, context_json).map_err(|m| JsError::new(&m))?;
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    result
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Parse only.
///
/// Returns `{ "success": true, "error": null }` or the first syntax error.
#[wasm_bindgen]
pub fn compile(language: &str, source: &str, context_json: &str) -> String {
    let compiled = SourceLanguage::parse(language).and_then(|language| {
        let context = context(context_json)?;
        Ok::<CompilationResult, String>(match language {
            SourceLanguage::JikiScript => jikiscript::compile(source, &context),
            SourceLanguage::JavaScript => javascript::compile(source, &context),
            SourceLanguage::Python => python::compile(source, &context),
        })
    });
    match compiled {
        Ok(result) => to_json(&result),
        Err(message) => host_error(message),
    }
}

/// Run the program's declarations, then call `name` with `args_json`
/// (a JSON array of plain values).
#[wasm_bindgen(js_name = evaluateFunction)]
pub fn evaluate_function(
    language: &str,
    source: &str,
    context_json: &str,
    name: &str,
    args_json: &str,
) -> String {
    let evaluated = SourceLanguage::parse(language).and_then(|language| {
        let context = context(context_json)?;
        let args: Vec<Snapshot> = if args_json.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(args_json).map_err(|e| format!("invalid arguments: {e}"))?
        };
        Ok::<FunctionEvaluation, String>(match language {
            SourceLanguage::JikiScript => jikiscript::evaluate_function(source, &context, name, &args),
            SourceLanguage::JavaScript => javascript::evaluate_function(source, &context, name, &args),
            SourceLanguage::Python => python::evaluate_function(source, &context, name, &args),
        })
    });
    match evaluated {
        Ok(result) => to_json(&result),
        Err(message) => host_error(message),
    }
}

/// Switch the default message catalog (`"en"`, `"nl"` or `"system"`).
#[wasm_bindgen(js_name = changeLanguage)]
pub fn change_language(code: &str) -> Result<(), JsError> {
    jiki_interpreters::change_language(code).map_err(|e| JsError::new(&e.to_string()))
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
