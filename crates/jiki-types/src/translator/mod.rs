//! Message translation for error messages and frame descriptions.
//!
//! Keys are dotted paths (`error.runtime.TypeError`, `describe.declaration`).
//! Templates fill `{{name}}` placeholders from an [`ErrorContext`]. Lookup
//! falls back to English, then to the key itself. The `system` language
//! renders `Name: key: value: ...` from the key's last segment instead.

mod en;
mod nl;

use crate::error::{system_message, ErrorContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

static ACTIVE_LANGUAGE: RwLock<Language> = RwLock::new(Language::En);

/// A supported message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
    System,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "nl" => Some(Language::Nl),
            "system" => Some(Language::System),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Nl => "nl",
            Language::System => "system",
        }
    }

    fn catalog(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::En => en::CATALOG,
            Language::Nl => nl::CATALOG,
            Language::System => &[],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslatorError {
    #[error("unknown language '{0}' (expected one of: en, nl, system)")]
    UnknownLanguage(String),
}

/// Swap the process-wide default catalog.
pub fn change_language(code: &str) -> Result<(), TranslatorError> {
    let language =
        Language::from_code(code).ok_or_else(|| TranslatorError::UnknownLanguage(code.into()))?;
    match ACTIVE_LANGUAGE.write() {
        Ok(mut guard) => *guard = language,
        Err(poisoned) => *poisoned.into_inner() = language,
    }
    Ok(())
}

/// The process-wide default language.
pub fn current_language() -> Language {
    match ACTIVE_LANGUAGE.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Renders keys against one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// A translator bound to the current process-wide default.
    pub fn active() -> Self {
        Self::new(current_language())
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn translate(&self, key: &str, context: &ErrorContext) -> String {
        if self.language == Language::System {
            let name = key.rsplit('.').next().unwrap_or(key);
            return system_message(name, context);
        }
        let template = lookup(self.language, key).or_else(|| lookup(Language::En, key));
        match template {
            Some(template) => interpolate(template, context),
            None => key.to_string(),
        }
    }

    /// Whether this translator's catalog (or English) has `key`.
    pub fn has_key(&self, key: &str) -> bool {
        lookup(self.language, key).is_some() || lookup(Language::En, key).is_some()
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    language
        .catalog()
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Fill `{{name}}` placeholders. Unknown names are left as written.
fn interpolate(template: &str, context: &ErrorContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let name = after[..close].trim();
                match context.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(&after[..close]);
                        out.push_str("}}");
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
