//! JikiScript parser.
//!
//! Statements are line-oriented: every statement ends with an end-of-line
//! token, and blocks open with `do` and close with `end`.

mod expr;
mod stmt;

use jiki_lexer::jikiscript::{self, JikiToken};
use jiki_types::ast::jikiscript::Stmt;
use jiki_types::{LanguageFeatures, SyntaxError};

use crate::parser::Parser;

/// Parse a JikiScript token stream into statements.
pub fn parse(tokens: Vec<JikiToken>, features: &LanguageFeatures) -> Result<Vec<Stmt>, SyntaxError> {
    let mut parser = Parser::new(tokens, features);
    let program = parser.parse_program()?;
    tracing::debug!(target: "jiki::parser", language = "jikiscript", statements = program.len(), "parsed");
    Ok(program)
}

/// Scan and parse JikiScript source.
pub fn parse_source(source: &str, features: &LanguageFeatures) -> Result<Vec<Stmt>, SyntaxError> {
    parse(jikiscript::scan(source)?, features)
}
