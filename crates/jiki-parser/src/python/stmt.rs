//! Python statement parsing.

use jiki_lexer::python::TokenKind;
use jiki_types::ast::python::{friendly_node_name, ExprKind, FunctionDecl, Stmt, StmtKind};
use jiki_types::ast::{BinaryOp, Ident};
use jiki_types::{SyntaxError, SyntaxErrorType as E};
use std::rc::Rc;

use crate::parser::Parser;

type ParseResult<T> = Result<T, SyntaxError>;

impl Parser<'_, TokenKind> {
    // ══════════════════════════════════════════════════════════════════════════
    // Program & Blocks
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_program(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_end() {
                return Ok(statements);
            }
            if self.check(&TokenKind::Indent) {
                return Err(self
                    .error_at_current(E::IndentationError)
                    .with("details", "unexpected indent"));
            }
            statements.push(self.nested(Self::parse_statement)?);
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&TokenKind::Newline) {}
    }

    fn expect_newline(&mut self) -> ParseResult<()> {
        if self.eat(&TokenKind::Newline) || self.at_end() {
            return Ok(());
        }
        Err(self.unexpected_token(E::MissingNewline))
    }

    /// `: NEWLINE INDENT statements DEDENT`
    fn parse_block(&mut self, missing_colon: E) -> ParseResult<Vec<Stmt>> {
        self.expect(&TokenKind::Colon, missing_colon)?;
        self.expect(&TokenKind::Newline, E::MissingNewline)?;
        self.expect(&TokenKind::Indent, E::MissingIndent)?;
        self.block_depth += 1;
        let result = self.parse_block_statements();
        self.block_depth -= 1;
        result
    }

    fn parse_block_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if self.eat(&TokenKind::Dedent) {
                return Ok(body);
            }
            if self.at_end() {
                return Err(self.error_at_current(E::MissingDedent));
            }
            body.push(self.nested(Self::parse_statement)?);
        }
    }

    pub(crate) fn parse_name(&mut self, error_type: E) -> ParseResult<Ident> {
        if let TokenKind::Identifier(name) = self.peek_kind().clone() {
            let span = self.advance().span;
            return Ok(Ident::new(name, span));
        }
        Err(self.error_at_current(error_type))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let stmt = match self.peek_kind() {
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                let start = self.advance().span;
                let condition = self.parse_expression()?;
                let body = self.parse_block(E::MissingColon)?;
                let span = start.merge(self.previous_span());
                Stmt::new(StmtKind::While { condition, body }, span)
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Def => self.parse_def()?,
            TokenKind::Return => {
                let start = self.advance().span;
                let value = match self.peek_kind() {
                    TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => None,
                    _ => Some(self.parse_expression()?),
                };
                let span = match &value {
                    Some(v) => start.merge(v.span),
                    None => start,
                };
                self.expect_newline()?;
                Stmt::new(StmtKind::Return(value), span)
            }
            TokenKind::Break | TokenKind::Continue | TokenKind::Pass => {
                let token = self.advance();
                let kind = match token.kind {
                    TokenKind::Break => StmtKind::Break,
                    TokenKind::Continue => StmtKind::Continue,
                    _ => StmtKind::Pass,
                };
                self.expect_newline()?;
                Stmt::new(kind, token.span)
            }
            _ => self.parse_simple_statement()?,
        };
        let node_type = stmt.kind.node_type();
        self.check_node_allowed(node_type, friendly_node_name(node_type), stmt.span)?;
        Ok(stmt)
    }

    /// An expression statement, or an assignment when `=` or an augmented
    /// operator follows a name or subscript.
    fn parse_simple_statement(&mut self) -> ParseResult<Stmt> {
        let target = self.parse_expression()?;
        let op = match self.peek_kind() {
            TokenKind::Equal => None,
            TokenKind::PlusEqual => Some(BinaryOp::Add),
            TokenKind::MinusEqual => Some(BinaryOp::Sub),
            TokenKind::StarEqual => Some(BinaryOp::Mul),
            TokenKind::SlashEqual => Some(BinaryOp::Div),
            _ => {
                self.expect_newline()?;
                let span = target.span;
                return Ok(Stmt::new(StmtKind::Expression(target), span));
            }
        };
        if !matches!(target.kind, ExprKind::Identifier(_) | ExprKind::Subscript { .. }) {
            return Err(SyntaxError::new(E::InvalidAssignmentTarget, target.span));
        }
        self.advance();
        let value = self.parse_expression()?;
        let span = target.span.merge(value.span);
        self.expect_newline()?;
        Ok(Stmt::new(StmtKind::Assignment { target, op, value }, span))
    }

    /// `if`/`elif` share this; `elif` nests a single `If` in the else branch.
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block(E::MissingColon)?;
        let else_branch = match self.peek_kind() {
            TokenKind::Elif => Some(vec![self.parse_if()?]),
            TokenKind::Else => {
                self.advance();
                Some(self.parse_block(E::MissingColon)?)
            }
            _ => None,
        };
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let target = self.parse_name(E::MissingIdentifier)?;
        self.expect(&TokenKind::In, E::MissingIn)?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block(E::MissingColon)?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::For {
                target,
                iterable,
                body,
            },
            span,
        ))
    }

    fn parse_def(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let name = self.parse_name(E::MissingFunctionName)?;
        self.expect(&TokenKind::LeftParen, E::MissingLeftParenthesisAfterFunctionName)?;

        let mut params: Vec<Ident> = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                let param = self.parse_name(E::MissingParameterName)?;
                if params.iter().any(|p| p.name == param.name) {
                    return Err(SyntaxError::new(E::DuplicateParameterName, param.span)
                        .with("name", param.name));
                }
                params.push(param);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterParameters)?;

        let body = self.parse_block(E::MissingColonAfterFunctionSignature)?;
        let span = start.merge(self.previous_span());
        let decl = FunctionDecl {
            name,
            params,
            body,
            span,
        };
        Ok(Stmt::new(StmtKind::Function(Rc::new(decl)), span))
    }
}
