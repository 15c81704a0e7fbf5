//! Per-call configuration shared by the three front-ends.

use jiki_eval::ExternalFunction;
use jiki_types::{ConfigError, LanguageFeatures, Translator};

/// What an exercise passes alongside the learner's source.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    pub language_features: LanguageFeatures,
    pub external_functions: Vec<ExternalFunction>,
    /// Message catalog for this call. `None` uses the process-wide default
    /// set by [`change_language`](jiki_types::change_language).
    pub translator: Option<Translator>,
}

impl EvaluationContext {
    pub fn new(language_features: LanguageFeatures) -> Self {
        Self {
            language_features,
            ..Self::default()
        }
    }

    /// Build a context from exercise JSON for `languageFeatures`.
    pub fn from_features_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(LanguageFeatures::from_json(json)?))
    }

    pub fn with_external(mut self, function: ExternalFunction) -> Self {
        self.external_functions.push(function);
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub(crate) fn translator(&self) -> Translator {
        self.translator.unwrap_or_else(Translator::active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiki_eval::{Arity, JikiObject};
    use jiki_types::Language;

    #[test]
    fn test_from_features_json() {
        let context = EvaluationContext::from_features_json(r#"{"allowTruthiness": true}"#)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(context.language_features.allow_truthiness);
        assert!(EvaluationContext::from_features_json("{").is_err());
    }

    #[test]
    fn test_builders() {
        let context = EvaluationContext::default()
            .with_external(ExternalFunction::new("noop", Arity::Exact(0), |_, _| {
                Ok(JikiObject::Null)
            }))
            .with_translator(Translator::new(Language::Nl));
        assert_eq!(context.external_functions.len(), 1);
        assert_eq!(context.translator().language(), Language::Nl);
    }
}
