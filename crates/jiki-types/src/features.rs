//! Per-run language configuration.
//!
//! [`LanguageFeatures`] maps directly from the exercise JSON (camelCase
//! names, every field defaulted). It is read-only for the whole run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default ceiling on total loop iterations per run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000;

/// Default ceiling on nested user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 250;

/// Allowed members of one stdlib type (e.g. `"array"` or `"string"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdlibAllowList {
    pub properties: Vec<String>,
    pub methods: Vec<String>,
}

/// Footgun switches and resource limits for one interpreter run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageFeatures {
    pub allow_type_coercion: bool,
    pub allow_truthiness: bool,
    pub allow_shadowing: bool,
    pub enforce_strict_equality: bool,
    pub allow_in_with_arrays: bool,
    /// `None` allows every global.
    pub allowed_globals: Option<Vec<String>>,
    #[serde(rename = "nativeJSMode")]
    pub native_js_mode: bool,
    #[serde(alias = "maxTotalLoopIterations")]
    pub max_iterations: u64,
    pub max_call_depth: usize,
    /// Keyed by stdlib type name; `None` allows every member.
    pub allowed_stdlib: Option<BTreeMap<String, StdlibAllowList>>,
    pub allowed_stdlib_functions: Option<Vec<String>>,
    /// Node kind names the parser accepts; `None` accepts all.
    pub allowed_nodes: Option<Vec<String>>,
    pub require_variable_instantiation: bool,
    pub require_semicolons: bool,
}

impl Default for LanguageFeatures {
    fn default() -> Self {
        Self {
            allow_type_coercion: false,
            allow_truthiness: false,
            allow_shadowing: false,
            enforce_strict_equality: true,
            allow_in_with_arrays: false,
            allowed_globals: None,
            native_js_mode: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            allowed_stdlib: None,
            allowed_stdlib_functions: None,
            allowed_nodes: None,
            require_variable_instantiation: true,
            require_semicolons: false,
        }
    }
}

/// Malformed configuration input.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid language features: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl LanguageFeatures {
    /// Parse features from exercise JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_global_allowed(&self, name: &str) -> bool {
        match &self.allowed_globals {
            Some(list) => list.iter().any(|g| g == name),
            None => true,
        }
    }

    pub fn is_node_allowed(&self, node: &str) -> bool {
        match &self.allowed_nodes {
            Some(list) => list.iter().any(|n| n == node),
            None => true,
        }
    }

    pub fn is_stdlib_function_allowed(&self, name: &str) -> bool {
        match &self.allowed_stdlib_functions {
            Some(list) => list.iter().any(|f| f == name),
            None => true,
        }
    }

    /// Whether `member` of stdlib type `type_name` may be used.
    ///
    /// A type missing from a configured allow-list exposes nothing.
    pub fn is_stdlib_member_allowed(&self, type_name: &str, member: &str, is_method: bool) -> bool {
        let Some(allowed) = &self.allowed_stdlib else {
            return true;
        };
        let Some(entry) = allowed.get(type_name) else {
            return false;
        };
        let names = if is_method {
            &entry.methods
        } else {
            &entry.properties
        };
        names.iter().any(|n| n == member)
    }
}
