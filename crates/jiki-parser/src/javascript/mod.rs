//! Restricted JavaScript parser.
//!
//! Newlines arrive as end-of-line tokens so statements can end without a
//! `;`. `requireSemicolons` makes the `;` mandatory.

mod expr;
mod stmt;

use jiki_lexer::javascript::{self, JsToken};
use jiki_types::ast::javascript::Stmt;
use jiki_types::{LanguageFeatures, SyntaxError};

use crate::parser::Parser;

/// Parse a JavaScript token stream into statements.
pub fn parse(tokens: Vec<JsToken>, features: &LanguageFeatures) -> Result<Vec<Stmt>, SyntaxError> {
    let mut parser = Parser::new(tokens, features);
    let program = parser.parse_program()?;
    tracing::debug!(target: "jiki::parser", language = "javascript", statements = program.len(), "parsed");
    Ok(program)
}

/// Scan and parse JavaScript source.
pub fn parse_source(source: &str, features: &LanguageFeatures) -> Result<Vec<Stmt>, SyntaxError> {
    parse(javascript::scan(source)?, features)
}
