//! Restricted JavaScript syntax tree.

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    VariableDeclaration {
        kind: DeclKind,
        name: Ident,
        init: Option<Expr>,
    },
    Expression(Expr),
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    /// C-style `for (init; condition; update) body`
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `for (let x of iterable) body`
    ForOf {
        name: Ident,
        iterable: Expr,
        body: Box<Stmt>,
    },
    /// `for (let k in object) body`
    ForIn {
        name: Ident,
        object: Expr,
        body: Box<Stmt>,
    },
    /// `repeat (count) body`; no count means "until the loop guard fires".
    Repeat {
        count: Option<Expr>,
        body: Box<Stmt>,
    },
    Function(Rc<FunctionDecl>),
    Class(Rc<ClassDecl>),
    Return(Option<Expr>),
    Break,
    Continue,
    /// A lone `;`
    Empty,
}

impl StmtKind {
    /// Node kind name matched against `allowedNodes`.
    pub fn node_type(&self) -> &'static str {
        match self {
            StmtKind::VariableDeclaration { .. } => "VariableDeclaration",
            StmtKind::Expression(_) => "ExpressionStatement",
            StmtKind::Block(_) => "BlockStatement",
            StmtKind::If { .. } => "IfStatement",
            StmtKind::While { .. } => "WhileStatement",
            StmtKind::For { .. } => "ForStatement",
            StmtKind::ForOf { .. } => "ForOfStatement",
            StmtKind::ForIn { .. } => "ForInStatement",
            StmtKind::Repeat { .. } => "RepeatStatement",
            StmtKind::Function(_) => "FunctionDeclaration",
            StmtKind::Class(_) => "ClassDeclaration",
            StmtKind::Return(_) => "ReturnStatement",
            StmtKind::Break => "BreakStatement",
            StmtKind::Continue => "ContinueStatement",
            StmtKind::Empty => "EmptyStatement",
        }
    }
}

/// `function name(params) { body }`, also used for class members.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `class Name { constructor(..) {..} method(..) {..} get p() {..} set p(v) {..} }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub constructor: Option<Rc<FunctionDecl>>,
    pub methods: Vec<Rc<FunctionDecl>>,
    pub getters: Vec<Rc<FunctionDecl>>,
    pub setters: Vec<Rc<FunctionDecl>>,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        }
    }

    /// The arithmetic a compound assignment performs.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
    Identifier(Ident),
    This,
    Template(Vec<TemplatePart>),
    Array(Vec<Expr>),
    /// Keys in source order.
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
    /// `++x`, `x--`
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
    },
    /// Target is an `Identifier`, `Member` or `Index`.
    Assignment {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
    /// `object.property`
    Member {
        object: Box<Expr>,
        property: Ident,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `new Class(args)`
    New { class: Ident, args: Vec<Expr> },
    Grouping(Box<Expr>),
}

impl ExprKind {
    /// Node kind name matched against `allowedNodes`.
    pub fn node_type(&self) -> &'static str {
        match self {
            ExprKind::Number(_)
            | ExprKind::String(_)
            | ExprKind::Boolean(_)
            | ExprKind::Null
            | ExprKind::Undefined => "LiteralExpression",
            ExprKind::Identifier(_) => "IdentifierExpression",
            ExprKind::This => "ThisExpression",
            ExprKind::Template(_) => "TemplateLiteralExpression",
            ExprKind::Array(_) => "ArrayExpression",
            ExprKind::Dictionary(_) => "DictionaryExpression",
            ExprKind::Binary { .. } | ExprKind::Logical { .. } => "BinaryExpression",
            ExprKind::Unary { .. } => "UnaryExpression",
            ExprKind::Update { .. } => "UpdateExpression",
            ExprKind::Assignment { .. } => "AssignmentExpression",
            ExprKind::Member { .. } | ExprKind::Index { .. } => "MemberExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::New { .. } => "NewExpression",
            ExprKind::Grouping(_) => "GroupingExpression",
        }
    }
}

/// Human-readable plural for a node kind, used in `NodeNotAllowed`.
pub fn friendly_node_name(node_type: &str) -> &str {
    match node_type {
        "LiteralExpression" => "Literals",
        "BinaryExpression" => "Binary expressions",
        "UnaryExpression" => "Unary expressions",
        "GroupingExpression" => "Grouping expressions",
        "IdentifierExpression" => "Identifiers",
        "AssignmentExpression" => "Assignments",
        "UpdateExpression" => "Update expressions",
        "TemplateLiteralExpression" => "Template literals",
        "ArrayExpression" => "Arrays",
        "MemberExpression" => "Member access",
        "DictionaryExpression" => "Objects",
        "CallExpression" => "Function calls",
        "NewExpression" => "Instantiations",
        "ThisExpression" => "'this' expressions",
        "ExpressionStatement" => "Expression statements",
        "VariableDeclaration" => "Variable declarations",
        "BlockStatement" => "Block statements",
        "IfStatement" => "If statements",
        "ForStatement" => "For loops",
        "ForOfStatement" => "For...of loops",
        "ForInStatement" => "For...in loops",
        "RepeatStatement" => "Repeat loops",
        "WhileStatement" => "While loops",
        "BreakStatement" => "Break statements",
        "ContinueStatement" => "Continue statements",
        "ReturnStatement" => "Return statements",
        "FunctionDeclaration" => "Function declarations",
        "ClassDeclaration" => "Class declarations",
        other => other,
    }
}
