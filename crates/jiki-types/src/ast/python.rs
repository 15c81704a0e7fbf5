//! Restricted Python syntax tree.

use super::{BinaryOp, Ident, LogicalOp, UnaryOp};
use crate::Span;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `target = value` or `target op= value`; target is a name or subscript.
    Assignment {
        target: Expr,
        op: Option<BinaryOp>,
        value: Expr,
    },
    Expression(Expr),
    /// `elif` nests a single `If` in `else_branch`.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    /// `for target in iterable:`
    For {
        target: Ident,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    Function(Rc<FunctionDecl>),
    Return(Option<Expr>),
    Break,
    Continue,
    Pass,
}

impl StmtKind {
    /// Node kind name matched against `allowedNodes`.
    pub fn node_type(&self) -> &'static str {
        match self {
            StmtKind::Assignment { .. } => "AssignmentStatement",
            StmtKind::Expression(_) => "ExpressionStatement",
            StmtKind::If { .. } => "IfStatement",
            StmtKind::While { .. } => "WhileStatement",
            StmtKind::For { .. } => "ForInStatement",
            StmtKind::Function(_) => "FunctionDeclaration",
            StmtKind::Return(_) => "ReturnStatement",
            StmtKind::Break => "BreakStatement",
            StmtKind::Continue => "ContinueStatement",
            StmtKind::Pass => "PassStatement",
        }
    }
}

/// `def name(params):` followed by an indented body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FStringPart {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    String(String),
    FString(Vec<FStringPart>),
    Boolean(bool),
    None,
    Identifier(Ident),
    List(Vec<Expr>),
    Dictionary(Vec<(Expr, Expr)>),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.name`
    Attribute {
        object: Box<Expr>,
        name: Ident,
    },
    /// `object[index]`
    Subscript {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Grouping(Box<Expr>),
}

impl ExprKind {
    /// Node kind name matched against `allowedNodes`.
    pub fn node_type(&self) -> &'static str {
        match self {
            ExprKind::Number(_)
            | ExprKind::String(_)
            | ExprKind::Boolean(_)
            | ExprKind::None => "LiteralExpression",
            ExprKind::FString(_) => "FStringExpression",
            ExprKind::Identifier(_) => "IdentifierExpression",
            ExprKind::List(_) => "ListExpression",
            ExprKind::Dictionary(_) => "DictionaryExpression",
            ExprKind::Binary { .. } | ExprKind::Logical { .. } => "BinaryExpression",
            ExprKind::Unary { .. } => "UnaryExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::Attribute { .. } => "AttributeExpression",
            ExprKind::Subscript { .. } => "SubscriptExpression",
            ExprKind::Grouping(_) => "GroupingExpression",
        }
    }
}

/// Human-readable plural for a node kind, used in `NodeNotAllowed`.
pub fn friendly_node_name(node_type: &str) -> &str {
    match node_type {
        "LiteralExpression" => "Literals",
        "FStringExpression" => "F-strings",
        "IdentifierExpression" => "Identifiers",
        "ListExpression" => "Lists",
        "DictionaryExpression" => "Dictionaries",
        "BinaryExpression" => "Binary expressions",
        "UnaryExpression" => "Unary expressions",
        "CallExpression" => "Function calls",
        "AttributeExpression" => "Attribute access",
        "SubscriptExpression" => "Subscripts",
        "GroupingExpression" => "Grouping expressions",
        "AssignmentStatement" => "Assignments",
        "ExpressionStatement" => "Expression statements",
        "IfStatement" => "If statements",
        "WhileStatement" => "While loops",
        "ForInStatement" => "For loops",
        "FunctionDeclaration" => "Function declarations",
        "ReturnStatement" => "Return statements",
        "BreakStatement" => "Break statements",
        "ContinueStatement" => "Continue statements",
        "PassStatement" => "Pass statements",
        other => other,
    }
}
