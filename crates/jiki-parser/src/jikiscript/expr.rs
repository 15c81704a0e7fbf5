//! JikiScript expression parsing.
//!
//! Precedence (lowest → highest):
//! 7. `or`
//! 6. `and`
//! 5. `is`, `equals`, `==`, `!=` (no chaining)
//! 4. `>`, `>=`, `<`, `<=`
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `not`, `!`, `-`; postfix `[index]`, `(args)`

use jiki_lexer::jikiscript::TokenKind;
use jiki_types::ast::jikiscript::{Expr, ExprKind};
use jiki_types::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use jiki_types::{SyntaxError, SyntaxErrorType as E};

use crate::parser::Parser;

type ParseResult<T> = Result<T, SyntaxError>;

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn logical(left: Expr, op: LogicalOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

impl Parser<'_, TokenKind> {
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
            left = logical(left, LogicalOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_equality()?;
            left = logical(left, LogicalOp::And, right);
        }
        Ok(left)
    }

    /// Equality does not chain: `a is b is c` is an error, and a lone `=`
    /// is reported as a mistaken comparison.
    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let left = self.parse_comparison()?;
        let Some(op) = self.match_equality_op() else {
            if self.check(&TokenKind::Equal) {
                return Err(self.error_at_current(E::UnexpectedEqualsForEqualityUseIsInstead));
            }
            return Ok(left);
        };
        self.advance();
        let right = self.parse_comparison()?;
        if self.match_equality_op().is_some() || self.check(&TokenKind::Equal) {
            return Err(self.error_at_current(E::UnexpectedChainedEqualityExpression));
        }
        Ok(binary(left, op, right))
    }

    fn match_equality_op(&self) -> Option<BinaryOp> {
        match self.peek_kind() {
            TokenKind::Is | TokenKind::Equals | TokenKind::EqualEqual => Some(BinaryOp::Eq),
            TokenKind::BangEqual => Some(BinaryOp::NotEq),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Not | TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::LeftBracket) {
                let index = self.parse_expression()?;
                let end = self
                    .expect(&TokenKind::RightBracket, E::MissingRightBracketAfterFieldNameOrIndex)?
                    .span;
                let span = expr.span.merge(end);
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.eat(&TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else {
                return Ok(expr);
            }
        }
    }

    /// Arguments after `(`; only a plain function name can be called.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let callee_span = callee.span;
        let ExprKind::Variable(name) = callee.kind else {
            return Err(SyntaxError::new(E::InvalidFunctionNameExpression, callee_span));
        };

        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if matches!(self.peek_kind(), TokenKind::Eol | TokenKind::Eof) {
                    break;
                }
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.check(&TokenKind::RightParen) {
            return Err(self
                .error_at_current(E::MissingRightParenthesisAfterFunctionCall)
                .with("function", name.name.clone()));
        }
        let end = self.advance().span;
        Ok(Expr::new(ExprKind::Call { name, args }, callee_span.merge(end)))
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
            TokenKind::Identifier(name) => ExprKind::Variable(Ident::new(name, token.span)),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let end = self
                    .expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterExpression)?
                    .span;
                return Ok(Expr::new(ExprKind::Grouping(Box::new(inner)), token.span.merge(end)));
            }
            TokenKind::LeftBracket => return self.parse_list(),
            TokenKind::LeftBrace => return self.parse_dictionary(),
            TokenKind::Eol | TokenKind::Eof => {
                return Err(self.error_at_current(E::MissingExpressionInStatement))
            }
            ref other if other.is_keyword() => {
                return Err(self.unexpected_token(E::UnexpectedKeywordInExpression))
            }
            _ => return Err(self.unexpected_token(E::UnexpectedTokenInStatement)),
        };
        self.advance();
        Ok(Expr::new(kind, token.span))
    }

    /// Skip end-of-lines only if `closing` follows them.
    fn skip_eols_before(&mut self, closing: &TokenKind) -> bool {
        let mark = self.checkpoint();
        self.skip_eols();
        if self.check(closing) {
            true
        } else {
            self.rewind(mark);
            false
        }
    }

    /// `[a, b, c]`, which may span lines.
    fn parse_list(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut elements = Vec::new();
        loop {
            self.skip_eols();
            if self.check(&TokenKind::RightBracket) {
                break;
            }
            elements.push(self.parse_expression()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            if self.skip_eols_before(&TokenKind::RightBracket) {
                break;
            }
            let error_type = if matches!(self.peek_kind(), TokenKind::Eol | TokenKind::Eof) {
                E::MissingRightBracketAfterListElements
            } else {
                E::MissingCommaBetweenListElements
            };
            return Err(self.error_at_current(error_type));
        }
        let end = self.advance().span;
        Ok(Expr::new(ExprKind::List(elements), start.merge(end)))
    }

    /// `{"key": value, ...}` with string keys.
    fn parse_dictionary(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut entries = Vec::new();
        loop {
            self.skip_eols();
            if self.check(&TokenKind::RightBrace) {
                break;
            }
            let TokenKind::String(key) = self.peek_kind().clone() else {
                return Err(self.error_at_current(E::MissingStringAsKeyInDictionary));
            };
            self.advance();
            if !self.eat(&TokenKind::Colon) {
                return Err(self.error_at_current(E::MissingColonAfterDictionaryKey));
            }
            entries.push((key, self.parse_expression()?));
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            if self.skip_eols_before(&TokenKind::RightBrace) {
                break;
            }
            let error_type = if matches!(self.peek_kind(), TokenKind::Eol | TokenKind::Eof) {
                E::MissingRightBraceAfterDictionaryElements
            } else {
                E::MissingCommaBetweenDictionaryElements
            };
            return Err(self.error_at_current(error_type));
        }
        let end = self.advance().span;
        Ok(Expr::new(ExprKind::Dictionary(entries), start.merge(end)))
    }
}
