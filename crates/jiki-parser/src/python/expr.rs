//! Python expression parsing.
//!
//! Precedence (lowest → highest): `or`, `and`, `not`, comparisons
//! (`== != < <= > >= in`, `not in`), `+ -`, `* / // %`, unary `-`,
//! `**` (right-assoc), postfix call / `.attr` / `[index]`.

use jiki_lexer::python::{FStringChunk, TokenKind};
use jiki_types::ast::python::{friendly_node_name, Expr, ExprKind, FStringPart};
use jiki_types::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use jiki_types::{Span, SyntaxError, SyntaxErrorType as E};

use crate::parser::Parser;

type ParseResult<T> = Result<T, SyntaxError>;

impl Parser<'_, TokenKind> {
    fn node(&self, kind: ExprKind, span: Span) -> ParseResult<Expr> {
        let node_type = kind.node_type();
        self.check_node_allowed(node_type, friendly_node_name(node_type), span)?;
        Ok(Expr::new(kind, span))
    }

    fn binary(&self, left: Expr, op: BinaryOp, right: Expr) -> ParseResult<Expr> {
        let span = left.span.merge(right.span);
        self.node(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    fn logical(&self, left: Expr, op: LogicalOp, right: Expr) -> ParseResult<Expr> {
        let span = left.span.merge(right.span);
        self.node(
            ExprKind::Logical {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    fn unary(&self, op: UnaryOp, start: Span, operand: Expr) -> ParseResult<Expr> {
        let span = start.merge(operand.span);
        self.node(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_or)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = self.logical(left, LogicalOp::Or, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_not()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_not()?;
            left = self.logical(left, LogicalOp::And, right)?;
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if !self.check(&TokenKind::Not) {
            return self.parse_comparison();
        }
        let start = self.advance().span;
        let operand = self.parse_not()?;
        self.unary(UnaryOp::Not, start, operand)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::NotEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEq,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEq,
                TokenKind::In => BinaryOp::In,
                TokenKind::Not if self.look_ahead(1) == &TokenKind::In => {
                    self.advance();
                    BinaryOp::NotIn
                }
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = self.binary(left, op, right)?;
        }
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_factor()?;
            left = self.binary(left, op, right)?;
        }
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::SlashSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right)?;
        }
    }

    /// `-x`; binds looser than `**`, so `-2 ** 2` is `-(2 ** 2)`.
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if !self.check(&TokenKind::Minus) {
            return self.parse_power();
        }
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        self.unary(UnaryOp::Neg, start, operand)
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_postfix()?;
        if !self.eat(&TokenKind::StarStar) {
            return Ok(base);
        }
        let exponent = self.nested(Self::parse_unary)?;
        self.binary(base, BinaryOp::Pow, exponent)
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let end = self
                        .expect(&TokenKind::RightBracket, E::MissingRightBracket)?
                        .span;
                    let span = expr.span.merge(end);
                    expr = self.node(
                        ExprKind::Subscript {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    )?;
                }
                TokenKind::LeftParen => {
                    self.advance();
                    expr = self.finish_call(expr)?;
                }
                TokenKind::Dot => {
                    self.advance();
                    let name = self.parse_name(E::MissingAttributeName)?;
                    let span = expr.span.merge(name.span);
                    expr = self.node(
                        ExprKind::Attribute {
                            object: Box::new(expr),
                            name,
                        },
                        span,
                    )?;
                }
                _ => return Ok(expr),
            }
        }
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Eof) {
                    break;
                }
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) || self.check(&TokenKind::RightParen) {
                    break;
                }
            }
        }
        if !self.check(&TokenKind::RightParen) {
            let function = match &callee.kind {
                ExprKind::Identifier(ident) => ident.name.clone(),
                ExprKind::Attribute { name, .. } => name.name.clone(),
                _ => "function".to_string(),
            };
            return Err(self
                .error_at_current(E::MissingRightParenthesisAfterFunctionCall)
                .with("function", function));
        }
        let end = self.advance().span;
        let span = callee.span.merge(end);
        self.node(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        )
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::Number(n) => ExprKind::Number(n),
            TokenKind::String(s) => ExprKind::String(s),
            TokenKind::True => ExprKind::Boolean(true),
            TokenKind::False => ExprKind::Boolean(false),
            TokenKind::None => ExprKind::None,
            TokenKind::Identifier(name) => ExprKind::Identifier(Ident::new(name, token.span)),
            TokenKind::FString(chunks) => {
                self.advance();
                let parts = self.parse_fstring_parts(chunks)?;
                return self.node(ExprKind::FString(parts), token.span);
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let end = self.expect(&TokenKind::RightParen, E::MissingRightParen)?.span;
                return self.node(ExprKind::Grouping(Box::new(inner)), token.span.merge(end));
            }
            TokenKind::LeftBracket => return self.parse_list(),
            TokenKind::LeftBrace => return self.parse_dict(),
            _ => return Err(self.error_at_current(E::MissingExpression)),
        };
        self.advance();
        self.node(kind, token.span)
    }

    fn parse_fstring_parts(&self, chunks: Vec<FStringChunk>) -> ParseResult<Vec<FStringPart>> {
        chunks
            .into_iter()
            .map(|chunk| match chunk {
                FStringChunk::Text(text) => Ok(FStringPart::Text(text)),
                FStringChunk::Interpolation(tokens) => {
                    let mut inner = Parser::new(tokens, self.features);
                    inner.parse_expression().map(FStringPart::Expr)
                }
            })
            .collect()
    }

    /// `[a, b]`; a trailing comma is allowed.
    fn parse_list(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RightBracket) && !self.at_end() {
            elements.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self
            .expect(&TokenKind::RightBracket, E::MissingRightBracket)?
            .span;
        self.node(ExprKind::List(elements), start.merge(end))
    }

    /// `{key: value, ...}`; keys are arbitrary expressions.
    fn parse_dict(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_end() {
            let key = self.parse_expression()?;
            self.expect(&TokenKind::Colon, E::MissingColon)?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RightBrace, E::MissingRightBrace)?.span;
        self.node(ExprKind::Dictionary(entries), start.merge(end))
    }
}
