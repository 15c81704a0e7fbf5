//! Scanner tests for all three front-ends.
//!
//! Covers: keywords, operators, literals, comments, significant newlines,
//! template literals and f-strings, Python indentation, excluded and
//! unimplemented lexemes, error spans, and the 100-iteration determinism
//! test.

use jiki_lexer::{javascript, jikiscript, python};
use jiki_types::SyntaxErrorType;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Scan JikiScript and return the token kinds (excluding final Eof).
fn jiki_kinds(source: &str) -> Vec<jikiscript::TokenKind> {
    jikiscript::scan(source)
        .unwrap_or_else(|e| panic!("scan failed: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != jikiscript::TokenKind::Eof)
        .collect()
}

fn js_kinds(source: &str) -> Vec<javascript::TokenKind> {
    javascript::scan(source)
        .unwrap_or_else(|e| panic!("scan failed: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != javascript::TokenKind::Eof)
        .collect()
}

fn py_kinds(source: &str) -> Vec<python::TokenKind> {
    python::scan(source)
        .unwrap_or_else(|e| panic!("scan failed: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != python::TokenKind::Eof)
        .collect()
}

fn jiki_error(source: &str) -> SyntaxErrorType {
    match jikiscript::scan(source) {
        Ok(tokens) => panic!("expected an error, got {} tokens", tokens.len()),
        Err(e) => e.error_type,
    }
}

fn js_error(source: &str) -> SyntaxErrorType {
    match javascript::scan(source) {
        Ok(tokens) => panic!("expected an error, got {} tokens", tokens.len()),
        Err(e) => e.error_type,
    }
}

fn py_error(source: &str) -> SyntaxErrorType {
    match python::scan(source) {
        Ok(tokens) => panic!("expected an error, got {} tokens", tokens.len()),
        Err(e) => e.error_type,
    }
}

// ─────────────────────────────────────────────────────────────────────
// JikiScript
// ─────────────────────────────────────────────────────────────────────

mod jiki {
    use super::*;
    use jiki_lexer::jikiscript::TokenKind as K;

    #[test]
    fn test_set_statement() {
        assert_eq!(
            jiki_kinds("set x to 5"),
            vec![K::Set, K::Identifier("x".into()), K::To, K::Number(5.0), K::Eol]
        );
    }

    #[test]
    fn test_keywords() {
        let pairs = [
            ("change", K::Change),
            ("function", K::Function),
            ("with", K::With),
            ("do", K::Do),
            ("end", K::End),
            ("repeat", K::Repeat),
            ("repeat_forever", K::RepeatForever),
            ("times", K::Times),
            ("indexed", K::Indexed),
            ("equals", K::Equals),
            ("is", K::Is),
        ];
        for (src, expected) in pairs {
            assert_eq!(jiki_kinds(src), vec![expected, K::Eol], "keyword '{src}'");
        }
    }

    #[test]
    fn test_blank_lines_collapse_into_one_eol() {
        let kinds = jiki_kinds("\n\nlog 1\n\n\nlog 2\n");
        assert_eq!(
            kinds,
            vec![K::Log, K::Number(1.0), K::Eol, K::Log, K::Number(2.0), K::Eol]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(jiki_kinds("log 1 // shown\n"), vec![K::Log, K::Number(1.0), K::Eol]);
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            jiki_kinds("a >= b != c"),
            vec![
                K::Identifier("a".into()),
                K::GreaterEqual,
                K::Identifier("b".into()),
                K::BangEqual,
                K::Identifier("c".into()),
                K::Eol
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(jiki_kinds(r#""a\"b""#), vec![K::String("a\"b".into()), K::Eol]);
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(jiki_error("set x to 01"), SyntaxErrorType::MalformedNumberStartingWithZero);
        assert_eq!(jiki_error("set x to 1."), SyntaxErrorType::MalformedNumberEndingWithDecimalPoint);
        assert_eq!(
            jiki_error("set x to 1.2.3"),
            SyntaxErrorType::MalformedNumberWithMultipleDecimalPoints
        );
        assert_eq!(
            jiki_error("set x to 12abc"),
            SyntaxErrorType::MalformedNumberContainingAlphabetCharacters
        );
    }

    #[test]
    fn test_zero_and_decimals_are_valid() {
        assert_eq!(jiki_kinds("0 0.5 10.25"), vec![
            K::Number(0.0),
            K::Number(0.5),
            K::Number(10.25),
            K::Eol
        ]);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            jiki_error("log \"hello"),
            SyntaxErrorType::MissingDoubleQuoteToTerminateStringLiteral
        );
    }

    #[test]
    fn test_unknown_character_carries_context() {
        let err = jikiscript::scan("log 1 @").unwrap_err();
        assert_eq!(err.error_type, SyntaxErrorType::UnknownCharacterInSource);
        assert_eq!(err.context.get("character"), Some("@"));
        assert_eq!(err.location.start_col, 7);
    }

    #[test]
    fn test_token_spans() {
        let tokens = jikiscript::scan("set name to \"Jiki\"\nlog name").unwrap();
        let string = &tokens[3];
        assert_eq!(string.lexeme, "\"Jiki\"");
        assert_eq!((string.span.start_line, string.span.start_col), (1, 13));
        assert_eq!(string.span.end_col, 18);
        let log = &tokens[5];
        assert_eq!(log.kind, K::Log);
        assert_eq!(log.span.start_line, 2);
    }
}

// ─────────────────────────────────────────────────────────────────────
// JavaScript
// ─────────────────────────────────────────────────────────────────────

mod js {
    use super::*;
    use jiki_lexer::javascript::{TemplateChunk, TokenKind as K};

    #[test]
    fn test_variable_declaration() {
        assert_eq!(
            js_kinds("let x = 5;"),
            vec![K::Let, K::Identifier("x".into()), K::Equal, K::Number(5.0), K::Semicolon]
        );
    }

    #[test]
    fn test_equality_operators_are_greedy() {
        assert_eq!(
            js_kinds("a === b !== c == d"),
            vec![
                K::Identifier("a".into()),
                K::EqualEqualEqual,
                K::Identifier("b".into()),
                K::BangEqualEqual,
                K::Identifier("c".into()),
                K::EqualEqual,
                K::Identifier("d".into()),
            ]
        );
    }

    #[test]
    fn test_update_and_compound_operators() {
        assert_eq!(
            js_kinds("i++ j-- k += 1"),
            vec![
                K::Identifier("i".into()),
                K::PlusPlus,
                K::Identifier("j".into()),
                K::MinusMinus,
                K::Identifier("k".into()),
                K::PlusEqual,
                K::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            js_kinds("0x1F 0b101 0o17 1.5e2 .5"),
            vec![
                K::Number(31.0),
                K::Number(5.0),
                K::Number(15.0),
                K::Number(150.0),
                K::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_newlines_become_single_eol() {
        assert_eq!(
            js_kinds("a\n\n\nb"),
            vec![K::Identifier("a".into()), K::Eol, K::Identifier("b".into())]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(js_kinds("/* block\n comment */ x // line"), vec![K::Identifier("x".into())]);
        assert_eq!(js_error("/* never closed"), SyntaxErrorType::UnterminatedBlockComment);
    }

    #[test]
    fn test_template_literal_with_interpolation() {
        let kinds = js_kinds("`sum: ${a + 1}!`");
        assert_eq!(kinds.len(), 1);
        let K::Template(chunks) = &kinds[0] else {
            panic!("expected a template, got {:?}", kinds[0]);
        };
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], TemplateChunk::Text("sum: ".into()));
        let TemplateChunk::Interpolation(inner) = &chunks[1] else {
            panic!("expected an interpolation");
        };
        let inner: Vec<_> = inner.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            inner,
            vec![K::Identifier("a".into()), K::Plus, K::Number(1.0), K::Eof]
        );
        assert_eq!(chunks[2], TemplateChunk::Text("!".into()));
    }

    #[test]
    fn test_template_interpolation_with_nested_braces() {
        let kinds = js_kinds("`${ {\"a\": 1}[\"a\"] }`");
        let K::Template(chunks) = &kinds[0] else {
            panic!("expected a template");
        };
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_template_errors() {
        assert_eq!(js_error("`open"), SyntaxErrorType::MissingBacktickToTerminateTemplateLiteral);
        assert_eq!(js_error("`${a"), SyntaxErrorType::MissingRightBraceInTemplateLiteral);
    }

    #[test]
    fn test_excluded_and_unimplemented_words() {
        assert_eq!(js_error("var x = 1"), SyntaxErrorType::PermanentlyExcludedToken);
        assert_eq!(js_error("switch (x) {}"), SyntaxErrorType::UnimplementedToken);
        let err = javascript::scan("typeof x").unwrap_err();
        assert_eq!(err.context.get("lexeme"), Some("typeof"));
    }

    #[test]
    fn test_excluded_operators() {
        assert_eq!(js_error("a & b"), SyntaxErrorType::PermanentlyExcludedToken);
        assert_eq!(js_error("a << 2"), SyntaxErrorType::PermanentlyExcludedToken);
        assert_eq!(js_error("a ? b : c"), SyntaxErrorType::UnimplementedToken);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(js_error("'abc"), SyntaxErrorType::MissingDoubleQuoteToTerminateString);
    }

    #[test]
    fn test_identifier_with_trailing_letters_on_number() {
        assert_eq!(js_error("12px"), SyntaxErrorType::UnknownCharacter);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Python
// ─────────────────────────────────────────────────────────────────────

mod py {
    use super::*;
    use jiki_lexer::python::{FStringChunk, TokenKind as K};

    #[test]
    fn test_assignment_line() {
        assert_eq!(
            py_kinds("x = 5"),
            vec![K::Identifier("x".into()), K::Equal, K::Number(5.0), K::Newline]
        );
    }

    #[test]
    fn test_indent_and_dedent() {
        let source = "if x:\n    y = 1\nz = 2\n";
        assert_eq!(
            py_kinds(source),
            vec![
                K::If,
                K::Identifier("x".into()),
                K::Colon,
                K::Newline,
                K::Indent,
                K::Identifier("y".into()),
                K::Equal,
                K::Number(1.0),
                K::Newline,
                K::Dedent,
                K::Identifier("z".into()),
                K::Equal,
                K::Number(2.0),
                K::Newline,
            ]
        );
    }

    #[test]
    fn test_dedents_closed_at_end_of_file() {
        let kinds = py_kinds("def f():\n    if x:\n        return 1");
        let tail: Vec<_> = kinds.iter().rev().take(3).cloned().collect();
        assert_eq!(tail, vec![K::Dedent, K::Dedent, K::Newline]);
    }

    #[test]
    fn test_double_dedent_in_one_step() {
        let kinds = py_kinds("while a:\n    while b:\n        pass\nx = 1\n");
        let dedents = kinds.iter().filter(|k| **k == K::Dedent).count();
        assert_eq!(dedents, 2);
    }

    #[test]
    fn test_blank_and_comment_lines_are_ignored() {
        let kinds = py_kinds("x = 1\n\n    # indented comment\n\ny = 2\n");
        assert!(!kinds.contains(&K::Indent));
        assert_eq!(kinds.iter().filter(|k| **k == K::Newline).count(), 2);
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        let kinds = py_kinds("x = [\n    1,\n    2\n]\n");
        assert_eq!(kinds.iter().filter(|k| **k == K::Newline).count(), 1);
        assert!(!kinds.contains(&K::Indent));
    }

    #[test]
    fn test_indentation_errors() {
        assert_eq!(py_error("if x:\n  y = 1\n"), SyntaxErrorType::IndentationError);
        assert_eq!(py_error("if x:\n\ty = 1\n"), SyntaxErrorType::IndentationError);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            py_kinds("a ** b // c"),
            vec![
                K::Identifier("a".into()),
                K::StarStar,
                K::Identifier("b".into()),
                K::SlashSlash,
                K::Identifier("c".into()),
                K::Newline,
            ]
        );
        assert_eq!(
            py_kinds("a += 1"),
            vec![K::Identifier("a".into()), K::PlusEqual, K::Number(1.0), K::Newline]
        );
    }

    #[test]
    fn test_literal_keywords() {
        assert_eq!(py_kinds("True False None"), vec![K::True, K::False, K::None, K::Newline]);
    }

    #[test]
    fn test_single_and_double_quoted_strings() {
        assert_eq!(
            py_kinds("'a' \"b\""),
            vec![K::String("a".into()), K::String("b".into()), K::Newline]
        );
        assert_eq!(py_error("x = 'abc"), SyntaxErrorType::UnterminatedString);
    }

    #[test]
    fn test_fstring_chunks() {
        let kinds = py_kinds("f\"n={n + 1} {{ok}}\"");
        let K::FString(chunks) = &kinds[0] else {
            panic!("expected an f-string, got {:?}", kinds[0]);
        };
        assert_eq!(chunks[0], FStringChunk::Text("n=".into()));
        let FStringChunk::Interpolation(inner) = &chunks[1] else {
            panic!("expected an interpolation");
        };
        let inner: Vec<_> = inner.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            inner,
            vec![K::Identifier("n".into()), K::Plus, K::Number(1.0), K::Eof]
        );
        assert_eq!(chunks[2], FStringChunk::Text(" {ok}".into()));
    }

    #[test]
    fn test_fstring_missing_brace() {
        assert_eq!(py_error("f\"{x\n"), SyntaxErrorType::MissingRightBraceInFString);
    }

    #[test]
    fn test_excluded_and_unimplemented_words() {
        assert_eq!(py_error("lambda x: x"), SyntaxErrorType::PermanentlyExcludedToken);
        assert_eq!(py_error("global x"), SyntaxErrorType::PermanentlyExcludedToken);
        assert_eq!(py_error("import math"), SyntaxErrorType::UnimplementedToken);
        assert_eq!(py_error("x = 1; y = 2"), SyntaxErrorType::PermanentlyExcludedToken);
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(py_kinds("1_000"), vec![K::Number(1000.0), K::Newline]);
        assert_eq!(py_kinds("1e3"), vec![K::Number(1000.0), K::Newline]);
        assert_eq!(py_kinds("1e+2"), vec![K::Number(100.0), K::Newline]);
        assert_eq!(py_kinds("2.5E-2"), vec![K::Number(0.025), K::Newline]);
        assert_eq!(
            py_kinds("x = 3e2 * 2"),
            vec![K::Identifier("x".into()), K::Equal, K::Number(300.0), K::Star, K::Number(2.0), K::Newline]
        );
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        assert_eq!(py_error("x = 1e"), SyntaxErrorType::UnknownCharacter);
        assert_eq!(py_error("x = 2e-"), SyntaxErrorType::UnknownCharacter);
        assert_eq!(py_error("x = 12px"), SyntaxErrorType::UnknownCharacter);
        let err = python::scan("x = 1e").unwrap_err();
        assert_eq!(err.context.get("character"), Some("1e"));
    }

    #[test]
    fn test_unknown_character() {
        let err = python::scan("x = 1 $").unwrap_err();
        assert_eq!(err.error_type, SyntaxErrorType::UnknownCharacter);
        assert_eq!(err.context.get("character"), Some("$"));
    }
}

// ─────────────────────────────────────────────────────────────────────
// 100-iteration determinism test
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_lexer_determinism_100_iterations() {
    let jiki = "function add with a, b do\n  return a + b\nend\nlog add(1, 2)\n";
    let js = "let total = 0;\nfor (let i = 0; i < 3; i++) {\n  total += `${i}`.length;\n}\n";
    let py = "def f(n):\n    return f\"{n}\"\nfor x in [1, 2]:\n    print(f(x))\n";

    let first = (
        format!("{:?}", jikiscript::scan(jiki).unwrap()),
        format!("{:?}", javascript::scan(js).unwrap()),
        format!("{:?}", python::scan(py).unwrap()),
    );
    for i in 0..100 {
        let again = (
            format!("{:?}", jikiscript::scan(jiki).unwrap()),
            format!("{:?}", javascript::scan(js).unwrap()),
            format!("{:?}", python::scan(py).unwrap()),
        );
        assert_eq!(first, again, "Determinism failure at iteration {i}");
    }
}
