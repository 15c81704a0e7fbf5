//! JavaScript parser tests: statements, precedence, semicolon rules,
//! node allow-lists and error classification.

use jiki_parser::javascript::parse_source;
use jiki_types::ast::javascript::{AssignOp, DeclKind, ExprKind, Stmt, StmtKind, TemplatePart};
use jiki_types::ast::BinaryOp;
use jiki_types::{LanguageFeatures, SyntaxErrorType};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse_with(source: &str, features: &LanguageFeatures) -> Vec<Stmt> {
    match parse_source(source, features) {
        Ok(program) => program,
        Err(e) => panic!("unexpected syntax error: {e}"),
    }
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    parse_with(source, &LanguageFeatures::default())
}

fn parse_err_with(source: &str, features: &LanguageFeatures) -> SyntaxErrorType {
    match parse_source(source, features) {
        Ok(program) => panic!("expected a syntax error, got {program:?}"),
        Err(e) => e.error_type,
    }
}

fn parse_err(source: &str) -> SyntaxErrorType {
    parse_err_with(source, &LanguageFeatures::default())
}

/// The expression of a single expression statement.
fn expr_of(source: &str) -> ExprKind {
    let mut program = parse_ok(source);
    assert_eq!(program.len(), 1, "expected one statement in {source:?}");
    match program.remove(0).kind {
        StmtKind::Expression(expr) => expr.kind,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_let_and_const() {
    let program = parse_ok("let x = 1;\nconst y = 2");
    assert!(matches!(
        program[0].kind,
        StmtKind::VariableDeclaration { kind: DeclKind::Let, .. }
    ));
    assert!(matches!(
        program[1].kind,
        StmtKind::VariableDeclaration { kind: DeclKind::Const, .. }
    ));
}

#[test]
fn test_let_without_initializer_needs_opt_in() {
    assert_eq!(parse_err("let x"), SyntaxErrorType::MissingInitializerInVariableDeclaration);
    let relaxed = LanguageFeatures {
        require_variable_instantiation: false,
        ..LanguageFeatures::default()
    };
    let program = parse_with("let x", &relaxed);
    assert!(matches!(program[0].kind, StmtKind::VariableDeclaration { init: None, .. }));
}

#[test]
fn test_if_else_with_blocks() {
    let program = parse_ok("if (x > 1) {\n  y = 1\n} else {\n  y = 2\n}");
    match &program[0].kind {
        StmtKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(matches!(then_branch.kind, StmtKind::Block(_)));
            assert!(else_branch.is_some());
        }
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn test_for_loop_forms() {
    let program = parse_ok(
        "for (let i = 0; i < 3; i++) {}\nfor (const x of xs) {}\nfor (let k in obj) {}\nfor (;;) { break }",
    );
    assert!(matches!(program[0].kind, StmtKind::For { init: Some(_), .. }));
    assert!(matches!(program[1].kind, StmtKind::ForOf { .. }));
    assert!(matches!(program[2].kind, StmtKind::ForIn { .. }));
    assert!(matches!(
        program[3].kind,
        StmtKind::For {
            init: None,
            condition: None,
            update: None,
            ..
        }
    ));
}

#[test]
fn test_repeat_with_and_without_count() {
    let program = parse_ok("repeat (3) { x++ }\nrepeat () { break }");
    assert!(matches!(program[0].kind, StmtKind::Repeat { count: Some(_), .. }));
    assert!(matches!(program[1].kind, StmtKind::Repeat { count: None, .. }));
}

#[test]
fn test_function_declaration() {
    let program = parse_ok("function add(a, b) {\n  return a + b\n}");
    match &program[0].kind {
        StmtKind::Function(decl) => {
            assert_eq!(decl.name.name, "add");
            assert_eq!(decl.params.len(), 2);
            assert!(matches!(decl.body[0].kind, StmtKind::Return(Some(_))));
        }
        other => panic!("expected Function, got {other:?}"),
    }
}

#[test]
fn test_class_members() {
    let source = "class Counter {\n  constructor(n) { this.n = n }\n  inc() { this.n++ }\n  get value() { return this.n }\n  set value(v) { this.n = v }\n}";
    match &parse_ok(source)[0].kind {
        StmtKind::Class(class) => {
            assert_eq!(class.name.name, "Counter");
            assert!(class.constructor.is_some());
            assert_eq!(class.methods.len(), 1);
            assert_eq!(class.getters[0].name.name, "value");
            assert_eq!(class.setters[0].params.len(), 1);
        }
        other => panic!("expected Class, got {other:?}"),
    }
}

#[test]
fn test_empty_statement_and_return_without_value() {
    let program = parse_ok(";\nfunction f() { return }");
    assert_eq!(program[0].kind, StmtKind::Empty);
    match &program[1].kind {
        StmtKind::Function(decl) => assert_eq!(decl.body[0].kind, StmtKind::Return(None)),
        other => panic!("expected Function, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_exponent_is_right_associative() {
    match expr_of("2 ** 3 ** 2") {
        ExprKind::Binary { op, right, .. } => {
            assert_eq!(op, BinaryOp::Pow);
            assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Pow, .. }));
        }
        other => panic!("expected Binary, got {other:?}"),
    }
}

#[test]
fn test_assignment_is_right_associative_with_compound_ops() {
    match expr_of("a = b += 1") {
        ExprKind::Assignment { op, value, .. } => {
            assert_eq!(op, AssignOp::Assign);
            assert!(matches!(value.kind, ExprKind::Assignment { op: AssignOp::Add, .. }));
        }
        other => panic!("expected Assignment, got {other:?}"),
    }
}

#[test]
fn test_strict_and_loose_equality_parse() {
    assert!(matches!(expr_of("a === b"), ExprKind::Binary { op: BinaryOp::StrictEq, .. }));
    assert!(matches!(expr_of("a != b"), ExprKind::Binary { op: BinaryOp::NotEq, .. }));
    assert!(matches!(expr_of("\"k\" in obj"), ExprKind::Binary { op: BinaryOp::In, .. }));
}

#[test]
fn test_member_call_chain() {
    match expr_of("console.log(arr.length, arr[0])") {
        ExprKind::Call { callee, args } => {
            assert!(matches!(callee.kind, ExprKind::Member { .. }));
            assert_eq!(args.len(), 2);
            assert!(matches!(args[1].kind, ExprKind::Index { .. }));
        }
        other => panic!("expected Call, got {other:?}"),
    }
}

#[test]
fn test_keyword_as_property_name() {
    match expr_of("obj.new") {
        ExprKind::Member { property, .. } => assert_eq!(property.name, "new"),
        other => panic!("expected Member, got {other:?}"),
    }
}

#[test]
fn test_update_expressions() {
    assert!(matches!(expr_of("i++"), ExprKind::Update { prefix: false, .. }));
    assert!(matches!(expr_of("--i"), ExprKind::Update { prefix: true, .. }));
}

#[test]
fn test_template_literal_parts() {
    match expr_of("`a${x + 1}b`") {
        ExprKind::Template(parts) => {
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], TemplatePart::Text("a".into()));
            assert!(matches!(parts[1], TemplatePart::Expr(_)));
        }
        other => panic!("expected Template, got {other:?}"),
    }
}

#[test]
fn test_object_and_array_literals() {
    match expr_of("x = { a: 1, \"b\": [1, 2], 3: null }") {
        ExprKind::Assignment { value, .. } => match value.kind {
            ExprKind::Dictionary(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["a", "b", "3"]);
            }
            other => panic!("expected Dictionary, got {other:?}"),
        },
        other => panic!("expected Assignment, got {other:?}"),
    }
}

#[test]
fn test_new_expression() {
    match expr_of("new Counter(1)") {
        ExprKind::New { class, args } => {
            assert_eq!(class.name, "Counter");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected New, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Semicolons
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_newline_terminates_statement() {
    assert_eq!(parse_ok("let a = 1\nlet b = 2").len(), 2);
    assert_eq!(parse_err("let a = 1 let b = 2"), SyntaxErrorType::MissingSemicolon);
}

#[test]
fn test_require_semicolons() {
    let strict = LanguageFeatures {
        require_semicolons: true,
        ..LanguageFeatures::default()
    };
    assert_eq!(parse_err_with("let a = 1\nlet b = 2;", &strict), SyntaxErrorType::MissingSemicolon);
    assert_eq!(parse_with("let a = 1;\nlet b = 2;", &strict).len(), 2);
}

// ─────────────────────────────────────────────────────────────────────
// Error classification
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_declaration_errors() {
    assert_eq!(parse_err("const x"), SyntaxErrorType::MissingInitializerInConstDeclaration);
    assert_eq!(parse_err("let = 5"), SyntaxErrorType::MissingVariableName);
    assert_eq!(parse_err("for (const i = 0; i < 1; i++) {}"), SyntaxErrorType::ConstInForLoopInit);
    assert_eq!(parse_err("for (let x from xs) {}"), SyntaxErrorType::MissingOfOrInInForLoop);
}

#[test]
fn test_function_errors() {
    assert_eq!(parse_err("function () {}"), SyntaxErrorType::MissingFunctionName);
    assert_eq!(parse_err("function f {}"), SyntaxErrorType::MissingLeftParenthesisAfterFunctionName);
    assert_eq!(parse_err("function f(a, 1) {}"), SyntaxErrorType::MissingParameterName);
    assert_eq!(parse_err("function f(a, a) {}"), SyntaxErrorType::DuplicateParameterName);
    assert_eq!(parse_err("function f(a {}"), SyntaxErrorType::MissingRightParenthesisAfterParameters);
    assert_eq!(parse_err("function f(a) return a"), SyntaxErrorType::MissingLeftBraceBeforeFunctionBody);
    assert_eq!(
        parse_err("function f() {\n  function g() {}\n}"),
        SyntaxErrorType::NestedFunctionDeclaration
    );
}

#[test]
fn test_control_flow_errors() {
    assert_eq!(parse_err("if x > 1 {}"), SyntaxErrorType::MissingLeftParenthesisAfterIf);
    assert_eq!(parse_err("if (x > 1 {}"), SyntaxErrorType::MissingRightParenthesisAfterIfCondition);
    assert_eq!(parse_err("repeat 3 {}"), SyntaxErrorType::MissingLeftParenAfterRepeat);
    assert_eq!(parse_err("repeat (3 {}"), SyntaxErrorType::MissingRightParenAfterRepeatCount);
    assert_eq!(parse_err("{ let a = 1"), SyntaxErrorType::MissingRightBraceAfterBlock);
    assert_eq!(parse_err("}"), SyntaxErrorType::UnexpectedRightBrace);
}

#[test]
fn test_expression_errors() {
    assert_eq!(parse_err("1 = 2"), SyntaxErrorType::InvalidAssignmentTargetExpression);
    assert_eq!(parse_err("5++"), SyntaxErrorType::InvalidAssignmentTargetExpression);
    assert_eq!(parse_err("let x = (1 + 2"), SyntaxErrorType::MissingRightParenthesisAfterExpression);
    assert_eq!(parse_err("f(1, 2"), SyntaxErrorType::MissingRightParenthesisAfterFunctionCall);
    assert_eq!(parse_err("a[0"), SyntaxErrorType::MissingRightBracketInMemberAccess);
    assert_eq!(parse_err("a."), SyntaxErrorType::MissingPropertyName);
    assert_eq!(parse_err("let x = *"), SyntaxErrorType::MissingExpression);
}

#[test]
fn test_collection_errors() {
    assert_eq!(parse_err("let a = [1, 2,]"), SyntaxErrorType::TrailingCommaInArray);
    assert_eq!(parse_err("let a = [1, 2"), SyntaxErrorType::MissingRightBracketInArray);
    assert_eq!(parse_err("let o = { a: 1, }"), SyntaxErrorType::TrailingCommaInDictionary);
    assert_eq!(parse_err("let o = { a 1 }"), SyntaxErrorType::MissingColonInDictionary);
    assert_eq!(parse_err("let o = { [a]: 1 }"), SyntaxErrorType::InvalidDictionaryKey);
    assert_eq!(parse_err("let o = { a: 1"), SyntaxErrorType::MissingRightBraceInDictionary);

    let err = parse_source("let o = { a: 1, a: 2 }", &LanguageFeatures::default()).unwrap_err();
    assert_eq!(err.error_type, SyntaxErrorType::DuplicateDictionaryKey);
    assert_eq!(err.context.get("key"), Some("a"));
}

#[test]
fn test_class_errors() {
    assert_eq!(parse_err("class {}"), SyntaxErrorType::MissingClassName);
    assert_eq!(parse_err("class A ()"), SyntaxErrorType::MissingLeftBraceAfterClassName);
    assert_eq!(parse_err("class A {\n  constructor() {}\n"), SyntaxErrorType::MissingRightBraceAfterClassBody);
    assert_eq!(parse_err("class A { 5() {} }"), SyntaxErrorType::MissingMethodName);
}

// ─────────────────────────────────────────────────────────────────────
// Allowed nodes
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_node_not_allowed() {
    let features = LanguageFeatures {
        allowed_nodes: Some(vec![
            "VariableDeclaration".into(),
            "LiteralExpression".into(),
        ]),
        ..LanguageFeatures::default()
    };
    assert_eq!(parse_with("let x = 1", &features).len(), 1);

    let err = parse_source("break", &features).unwrap_err();
    assert_eq!(err.error_type, SyntaxErrorType::NodeNotAllowed);
    assert_eq!(err.context.get("nodeType"), Some("BreakStatement"));
    assert_eq!(err.context.get("friendlyName"), Some("Break statements"));

    let err = parse_source("let y = 1 + 2", &features).unwrap_err();
    assert_eq!(err.context.get("nodeType"), Some("BinaryExpression"));
}

#[test]
fn test_parser_determinism_100_iterations() {
    let source = "let xs = [1, 2, 3]\nfor (const x of xs) {\n  console.log(`${x}`)\n}";
    let first = parse_ok(source);
    for i in 0..100 {
        assert_eq!(first, parse_ok(source), "Determinism failure at iteration {i}");
    }
}
