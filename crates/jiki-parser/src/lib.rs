//! Jiki parsers: convert a language's token stream into its AST.
//!
//! One recursive-descent [`Parser`] core is shared by the three
//! front-ends; each module exposes `parse` (tokens in) and `parse_source`
//! (source in).

mod parser;

pub mod javascript;
pub mod jikiscript;
pub mod python;

pub use parser::Parser;
