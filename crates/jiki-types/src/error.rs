//! Error catalogs and the syntax/runtime error structs shared by all
//! three languages.
//!
//! Every error carries a closed `type` drawn from [`SyntaxErrorType`] or
//! [`RuntimeErrorType`], a [`Span`], and an ordered [`ErrorContext`] of
//! `key → value` pairs. The human-readable `message` is rendered from the
//! context by a [`Translator`]; until then it holds the machine-readable
//! `system` form.

use crate::span::Span;
use crate::translator::Translator;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Declares a closed error catalog whose serde form is the flat variant name.
macro_rules! error_catalog {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// The flat string name used in JSON and translation keys.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),*
                }
            }

            /// Look a variant up by its flat string name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                $name::from_name(&name).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown error type '{name}'"))
                })
            }
        }
    };
}

error_catalog! {
    /// Parse-time failures raised by the scanners and parsers.
    SyntaxErrorType {
        // ── Shared scanner errors ──
        UnknownCharacter,
        PermanentlyExcludedToken,
        UnimplementedToken,
        NodeNotAllowed,
        NestingTooDeep,

        // ── JikiScript ──
        UnknownCharacterInSource,
        MissingDoubleQuoteToTerminateStringLiteral,
        MalformedNumberStartingWithZero,
        MalformedNumberEndingWithDecimalPoint,
        MalformedNumberWithMultipleDecimalPoints,
        MalformedNumberContainingAlphabetCharacters,
        MissingDoToStartFunctionBody,
        MissingWithBeforeParametersInFunction,
        MissingCommaBetweenFunctionParameters,
        UnexpectedTokenAfterParametersInFunction,
        MissingFunctionNameInDeclaration,
        MissingParameterNameInFunctionDeclaration,
        DuplicateParameterNameInFunctionDeclaration,
        InvalidNestedFunctionDeclaration,
        MissingDoToStartIfBody,
        MissingDoToStartElseBody,
        MissingDoToStartBlock,
        MissingDoAfterRepeatStatementCondition,
        MissingTimesInRepeatStatement,
        MissingEndAfterBlockStatement,
        MissingToAfterVariableNameToInitializeValue,
        MissingToAfterVariableNameToChangeValue,
        MissingVariableNameInDeclaration,
        MissingEachAfterForKeyword,
        MissingElementNameAfterForeachKeyword,
        MissingSecondElementNameAfterForeachKeyword,
        MissingInAfterElementNameInForeach,
        MissingByAfterIndexedKeyword,
        MissingIndexNameAfterIndexedByKeywords,
        MissingIfConditionAfterIfKeyword,
        UnexpectedElseWithoutMatchingIf,
        MissingEndOfLine,
        PointlessStatementWithNoEffect,
        PotentialMissingParenthesesForFunctionCall,
        InvalidFunctionNameExpression,
        MissingRightBracketAfterListElements,
        MissingRightBracketAfterFieldNameOrIndex,
        MissingCommaBetweenListElements,
        MissingRightBraceAfterDictionaryElements,
        MissingCommaBetweenDictionaryElements,
        MissingColonAfterDictionaryKey,
        MissingStringAsKeyInDictionary,
        UnexpectedEqualsForAssignmentUseSetInstead,
        UnexpectedEqualsForEqualityUseIsInstead,
        UnexpectedChainedEqualityExpression,
        MiscapitalizedKeywordInStatement,
        UnexpectedKeywordInExpression,
        MissingExpressionInStatement,
        UnexpectedTokenInStatement,

        // ── Shared by JikiScript and JavaScript ──
        MissingRightParenthesisAfterExpression,
        MissingRightParenthesisAfterFunctionCall,

        // ── JavaScript ──
        MissingDoubleQuoteToTerminateString,
        MissingBacktickToTerminateTemplateLiteral,
        MissingRightBraceInTemplateLiteral,
        UnterminatedBlockComment,
        MissingRightBraceAfterBlock,
        MissingInitializerInConstDeclaration,
        MissingInitializerInVariableDeclaration,
        ConstInForLoopInit,
        NestedFunctionDeclaration,
        DuplicateParameterName,
        MissingFunctionName,
        MissingParameterName,
        MissingLeftParenthesisAfterFunctionName,
        MissingRightParenthesisAfterParameters,
        MissingLeftBraceBeforeFunctionBody,
        MissingLeftParenthesisAfterIf,
        MissingRightParenthesisAfterIfCondition,
        MissingLeftParenAfterRepeat,
        MissingRightParenAfterRepeatCount,
        MissingRightBracketInArray,
        MissingRightBracketInMemberAccess,
        MissingRightBraceInDictionary,
        MissingColonInDictionary,
        InvalidDictionaryKey,
        DuplicateDictionaryKey,
        TrailingCommaInArray,
        TrailingCommaInDictionary,
        InvalidAssignmentTargetExpression,
        MissingSemicolon,
        MissingExpression,
        MissingVariableName,
        MissingPropertyName,
        UnexpectedRightBrace,
        MissingClassName,
        MissingLeftBraceAfterClassName,
        MissingRightBraceAfterClassBody,
        MissingMethodName,
        MissingOfOrInInForLoop,

        // ── Python ──
        IndentationError,
        UnterminatedString,
        MissingRightBraceInFString,
        MissingColon,
        MissingIndent,
        MissingDedent,
        MissingIdentifier,
        MissingIn,
        MissingColonAfterFunctionSignature,
        MissingRightParen,
        MissingRightBracket,
        MissingRightBrace,
        MissingAttributeName,
        InvalidAssignmentTarget,
        MissingNewline,
    }
}

error_catalog! {
    /// Failures raised while executing a parsed program.
    RuntimeErrorType {
        // ── Guards shared by JavaScript and Python ──
        TypeCoercionNotAllowed,
        TruthinessDisabled,
        StrictEqualityRequired,
        ShadowingDisabled,
        VariableAlreadyDeclared,
        VariableNotDeclared,
        InWithArrayNotAllowed,
        InOperatorRequiresObject,
        InOperatorRequiresStringKey,
        MaxIterationsReached,
        MaxCallDepthExceeded,

        // ── Stdlib dispatch ──
        MethodNotYetAvailable,
        MethodNotYetImplemented,
        PropertyNotFound,
        InvalidNumberOfArguments,
        TypeError,

        // ── JavaScript ──
        IndexOutOfRange,
        RangeError,
        AssignmentToConstant,
        ComparisonRequiresNumber,
        ReturnOutsideFunction,
        BreakOutsideLoop,
        ContinueOutsideLoop,
        FunctionNotFound,
        ForOfLoopTargetNotIterable,
        UnsupportedOperation,
        LogicErrorInExecution,

        // ── Python ──
        UndefinedVariable,
        AttributeError,
        IndexError,
        KeyError,
        ValueError,
        ZeroDivisionError,

        // ── JikiScript ──
        VariableAlreadyDeclaredInScope,
        DuplicateFunctionDeclarationInScope,
        FunctionNotFoundInScope,
        NonCallableTargetInvocationAttempt,
        UnexpectedUncalledFunctionInExpression,
        TypeErrorOperandMustBeNumericValue,
        TypeErrorOperandMustBeBooleanValue,
        TypeErrorOperandMustBeStringValue,
        TypeErrorOperandsMustBeTwoNumbersOrTwoStrings,
        TypeErrorCannotCompareListObjects,
        RangeErrorArrayIndexIsZeroBased,
        IndexOutOfRangeForArrayAccess,
        IndexOutOfRangeForArrayModification,
        MissingDictionaryKeyInAccess,
        InvalidIndexGetterTargetNotIndexable,
        InvalidChangeTargetNotModifiable,
        ForeachLoopTargetNotIterable,
        RangeErrorTooFewArgumentsForFunctionCall,
        RangeErrorTooManyArgumentsForFunctionCall,
        RangeErrorRepeatCountMustBeNumericValue,
        RangeErrorRepeatCountMustBeNonNegative,
        RangeErrorRepeatCountTooHighForExecution,
        StateErrorMaxIterationsReachedInLoop,
        StateErrorInfiniteRecursionDetectedInFunction,
        StateErrorCannotStoreNullValueFromFunction,
        UnexpectedReturnStatementOutsideOfFunction,
        UnexpectedBreakStatementOutsideOfLoop,
        UnexpectedContinueStatementOutsideOfLoop,
    }
}

// ─────────────────────────────────────────────────────────────────────
// ErrorContext
// ─────────────────────────────────────────────────────────────────────

/// Ordered `key → value` pairs used to interpolate error messages.
///
/// Serialized as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext(Vec<(String, String)>);

impl ErrorContext {
    /// An empty context.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace `key`, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Look up the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = ErrorContext::new();
        for (k, v) in iter {
            context.insert(k, v);
        }
        context
    }
}

impl Serialize for ErrorContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Render the machine-readable form `Type: key: value: key: value`.
pub fn system_message(error_type: &str, context: &ErrorContext) -> String {
    let mut out = error_type.to_string();
    for (k, v) in context.iter() {
        out.push_str(": ");
        out.push_str(k);
        out.push_str(": ");
        out.push_str(v);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────
// SyntaxError / RuntimeError
// ─────────────────────────────────────────────────────────────────────

/// A parse-time failure. Aborts the run before any frame is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxError {
    #[serde(rename = "type")]
    pub error_type: SyntaxErrorType,
    pub message: String,
    pub location: Span,
    pub context: ErrorContext,
}

/// A failure raised during execution. Recorded as the final `ERROR` frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeError {
    #[serde(rename = "type")]
    pub error_type: RuntimeErrorType,
    pub message: String,
    pub location: Span,
    pub context: ErrorContext,
}

macro_rules! impl_frontend_error {
    ($name:ident, $ty:ident, $prefix:literal) => {
        impl $name {
            /// Create a new error with an empty context.
            pub fn new(error_type: $ty, location: Span) -> Self {
                Self {
                    error_type,
                    message: error_type.as_str().to_string(),
                    location,
                    context: ErrorContext::new(),
                }
            }

            /// Attach one context entry.
            pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.context.insert(key, value);
                self.message = system_message(self.error_type.as_str(), &self.context);
                self
            }

            /// The translation key for this error's type.
            pub fn translation_key(&self) -> String {
                format!(concat!($prefix, "{}"), self.error_type.as_str())
            }

            /// Re-render `message` through `translator`.
            pub fn localize(mut self, translator: &Translator) -> Self {
                self.message = translator.translate(&self.translation_key(), &self.context);
                self
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} at {}: {}", self.error_type, self.location, self.message)
            }
        }

        impl std::error::Error for $name {}
    };
}

impl_frontend_error!(SyntaxError, SyntaxErrorType, "error.syntax.");
impl_frontend_error!(RuntimeError, RuntimeErrorType, "error.runtime.");

/// Either tier of error, for results that can end in both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionError {
    Syntax(SyntaxError),
    Runtime(RuntimeError),
}

impl From<SyntaxError> for ExecutionError {
    fn from(err: SyntaxError) -> Self {
        ExecutionError::Syntax(err)
    }
}

impl From<RuntimeError> for ExecutionError {
    fn from(err: RuntimeError) -> Self {
        ExecutionError::Runtime(err)
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Syntax(err) => err.fmt(f),
            ExecutionError::Runtime(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ExecutionError {}
