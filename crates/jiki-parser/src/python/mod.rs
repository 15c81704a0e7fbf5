//! Restricted Python parser.
//!
//! Blocks come from the scanner's layout tokens: `:` NEWLINE INDENT
//! statements DEDENT.

mod expr;
mod stmt;

use jiki_lexer::python::{self, PyToken};
use jiki_types::ast::python::Stmt;
use jiki_types::{LanguageFeatures, SyntaxError};

use crate::parser::Parser;

/// Parse a Python token stream into statements.
pub fn parse(tokens: Vec<PyToken>, features: &LanguageFeatures) -> Result<Vec<Stmt>, SyntaxError> {
    let mut parser = Parser::new(tokens, features);
    let program = parser.parse_program()?;
    tracing::debug!(target: "jiki::parser", language = "python", statements = program.len(), "parsed");
    Ok(program)
}

/// Scan and parse Python source.
pub fn parse_source(source: &str, features: &LanguageFeatures) -> Result<Vec<Stmt>, SyntaxError> {
    parse(python::scan(source)?, features)
}
