//! JikiScript syntax tree.

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
    /// `set name to value`
    Set { name: Ident, value: Expr },
    /// `change name[i][j] to value`
    Change {
        name: Ident,
        indexes: Vec<Expr>,
        value: Expr,
    },
    /// `log value`
    Log(Expr),
    /// `function name with a, b do ... end`
    Function(Rc<FunctionDecl>),
    /// `return [value]`
    Return(Option<Expr>),
    /// `if cond do ... [else ...] end`; `else if` nests a single `If`.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    /// `repeat n times [indexed by i] do ... end`
    Repeat {
        count: Expr,
        index: Option<Ident>,
        body: Vec<Stmt>,
    },
    /// `repeat_forever do ... end`
    RepeatForever { body: Vec<Stmt> },
    /// `for each x[, y] in e [indexed by i] do ... end`
    ForEach {
        element: Ident,
        second: Option<Ident>,
        iterable: Expr,
        index: Option<Ident>,
        body: Vec<Stmt>,
    },
    /// `do ... end`
    Block(Vec<Stmt>),
    Break,
    /// `continue` / `next`
    Continue,
    /// A bare function call.
    Expression(Expr),
}

/// `function name with params do body end`
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
pub enum ExprKind {
    Number(f64),
    String(String),
    Boolean(bool),
    Variable(Ident),
    List(Vec<Expr>),
    /// Keys are string literals, in source order.
    Dictionary(Vec<(String, Expr)>),
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
    Grouping(Box<Expr>),
    /// `object[index]`, 1-based for lists and strings.
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `name(args)`
    Call { name: Ident, args: Vec<Expr> },
}
