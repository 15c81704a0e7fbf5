//! Jiki scanners: one per language, all producing [`token::Token`]s over
//! a language-specific kind enum.

pub mod cursor;
pub mod javascript;
pub mod jikiscript;
pub mod python;
pub mod token;

pub use token::Token;
