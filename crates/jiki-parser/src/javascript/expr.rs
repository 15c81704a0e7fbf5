//! JavaScript expression parsing.
//!
//! Precedence (lowest → highest):
//! 9. assignment `= += -= *= /= %=` (right-assoc)
//! 8. `||`
//! 7. `&&`
//! 6. `== != === !==`
//! 5. `< <= > >= in`
//! 4. `+ -`
//! 3. `* / %`
//! 2. `**` (right-assoc)
//! 1. unary `! - + ++ --`; postfix call, `.name`, `[index]`, `++ --`

use jiki_lexer::javascript::{TemplateChunk, TokenKind};
use jiki_types::ast::javascript::{
    friendly_node_name, AssignOp, Expr, ExprKind, TemplatePart, UpdateOp,
};
use jiki_types::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use jiki_types::{Span, SyntaxError, SyntaxErrorType as E};

use crate::parser::Parser;

type ParseResult<T> = Result<T, SyntaxError>;

fn is_assignable(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Identifier(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
    )
}

/// The name shown when a call is malformed.
fn callee_name(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Identifier(ident) => ident.name.clone(),
        ExprKind::Member { property, .. } => property.name.clone(),
        _ => "function".to_string(),
    }
}

/// Object keys written as numbers use their JavaScript string form.
fn number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl Parser<'_, TokenKind> {
    /// Build a node, rejecting kinds missing from `allowedNodes`.
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

    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_assignment)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let target = self.parse_or()?;
        let op = match self.peek_kind() {
            TokenKind::Equal => AssignOp::Assign,
            TokenKind::PlusEqual => AssignOp::Add,
            TokenKind::MinusEqual => AssignOp::Sub,
            TokenKind::StarEqual => AssignOp::Mul,
            TokenKind::SlashEqual => AssignOp::Div,
            TokenKind::PercentEqual => AssignOp::Mod,
            _ => return Ok(target),
        };
        if !is_assignable(&target) {
            return Err(SyntaxError::new(E::InvalidAssignmentTargetExpression, target.span));
        }
        self.advance();
        let value = self.parse_assignment()?;
        let span = target.span.merge(value.span);
        self.node(
            ExprKind::Assignment {
                target: Box::new(target),
                op,
                value: Box::new(value),
            },
            span,
        )
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = self.logical(left, LogicalOp::Or, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = self.logical(left, LogicalOp::And, right)?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::NotEq,
                TokenKind::EqualEqualEqual => BinaryOp::StrictEq,
                TokenKind::BangEqualEqual => BinaryOp::StrictNotEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_relational()?;
            left = self.binary(left, op, right)?;
        }
    }

    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEq,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEq,
                TokenKind::In => BinaryOp::In,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(left, op, right)?;
        }
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(left, op, right)?;
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_exponent()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_exponent()?;
            left = self.binary(left, op, right)?;
        }
    }

    fn parse_exponent(&mut self) -> ParseResult<Expr> {
        let base = self.parse_unary()?;
        if !self.eat(&TokenKind::StarStar) {
            return Ok(base);
        }
        let exponent = self.nested(Self::parse_exponent)?;
        self.binary(base, BinaryOp::Pow, exponent)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let update = match self.peek_kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            let start = self.advance().span;
            let target = self.nested(Self::parse_unary)?;
            if !is_assignable(&target) {
                return Err(SyntaxError::new(E::InvalidAssignmentTargetExpression, target.span));
            }
            let span = start.merge(target.span);
            return self.node(
                ExprKind::Update {
                    op,
                    prefix: true,
                    target: Box::new(target),
                },
                span,
            );
        }

        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(operand.span);
        self.node(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LeftParen => {
                    self.advance();
                    expr = self.finish_call(expr)?;
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let end = self
                        .expect(&TokenKind::RightBracket, E::MissingRightBracketInMemberAccess)?
                        .span;
                    let span = expr.span.merge(end);
                    expr = self.node(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    )?;
                }
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_property_name()?;
                    let span = expr.span.merge(property.span);
                    expr = self.node(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                        },
                        span,
                    )?;
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    if !is_assignable(&expr) {
                        return Err(SyntaxError::new(
                            E::InvalidAssignmentTargetExpression,
                            expr.span,
                        ));
                    }
                    let token = self.advance();
                    let op = if token.kind == TokenKind::PlusPlus {
                        UpdateOp::Increment
                    } else {
                        UpdateOp::Decrement
                    };
                    let span = expr.span.merge(token.span);
                    expr = self.node(
                        ExprKind::Update {
                            op,
                            prefix: false,
                            target: Box::new(expr),
                        },
                        span,
                    )?;
                }
                _ => return Ok(expr),
            }
        }
    }

    /// The name after `.`; keywords are valid property names.
    fn parse_property_name(&mut self) -> ParseResult<Ident> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Ident::new(name, token.span))
            }
            _ if TokenKind::keyword(&token.lexeme).is_some() => {
                self.advance();
                Ok(Ident::new(token.lexeme, token.span))
            }
            TokenKind::Number(_) | TokenKind::String(_) => {
                Err(self.unexpected_token(E::InvalidDictionaryKey))
            }
            _ => Err(self.error_at_current(E::MissingPropertyName)),
        }
    }

    fn parse_arguments(&mut self, callee: &str) -> ParseResult<(Vec<Expr>, Span)> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if matches!(
                    self.peek_kind(),
                    TokenKind::Eol | TokenKind::Semicolon | TokenKind::Eof
                ) {
                    break;
                }
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                self.skip_eols();
            }
        }
        if !self.check(&TokenKind::RightParen) {
            return Err(self
                .error_at_current(E::MissingRightParenthesisAfterFunctionCall)
                .with("function", callee));
        }
        let end = self.advance().span;
        Ok((args, end))
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let (args, end) = self.parse_arguments(&callee_name(&callee))?;
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
            TokenKind::Null => ExprKind::Null,
            TokenKind::Undefined => ExprKind::Undefined,
            TokenKind::This => ExprKind::This,
            TokenKind::Identifier(name) => ExprKind::Identifier(Ident::new(name, token.span)),
            TokenKind::Template(chunks) => {
                self.advance();
                let parts = self.parse_template_parts(chunks)?;
                return self.node(ExprKind::Template(parts), token.span);
            }
            TokenKind::New => return self.parse_new(),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let end = self
                    .expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterExpression)?
                    .span;
                return self.node(ExprKind::Grouping(Box::new(inner)), token.span.merge(end));
            }
            TokenKind::LeftBracket => return self.parse_array(),
            TokenKind::LeftBrace => return self.parse_object(),
            _ => return Err(self.error_at_current(E::MissingExpression)),
        };
        self.advance();
        self.node(kind, token.span)
    }

    /// Each `${...}` was scanned into its own token list; parse each one
    /// as a standalone expression.
    fn parse_template_parts(&self, chunks: Vec<TemplateChunk>) -> ParseResult<Vec<TemplatePart>> {
        chunks
            .into_iter()
            .map(|chunk| match chunk {
                TemplateChunk::Text(text) => Ok(TemplatePart::Text(text)),
                TemplateChunk::Interpolation(tokens) => {
                    let mut inner = Parser::new(tokens, self.features);
                    inner.parse_expression().map(TemplatePart::Expr)
                }
            })
            .collect()
    }

    /// `new Name(args)`; the argument list may be omitted.
    fn parse_new(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let class = self.parse_identifier(E::MissingClassName)?;
        let (args, end) = if self.eat(&TokenKind::LeftParen) {
            self.parse_arguments(&class.name)?
        } else {
            (Vec::new(), class.span)
        };
        self.node(ExprKind::New { class, args }, start.merge(end))
    }

    /// `[a, b, c]`; trailing commas are rejected.
    fn parse_array(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut elements = Vec::new();
        self.skip_eols();
        if self.check(&TokenKind::Comma) {
            return Err(self.error_at_current(E::TrailingCommaInArray));
        }
        while !self.check(&TokenKind::RightBracket) && !self.at_end() {
            elements.push(self.parse_expression()?);
            self.skip_eols();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_eols();
            if self.check(&TokenKind::RightBracket) || self.check(&TokenKind::Comma) {
                return Err(SyntaxError::new(E::TrailingCommaInArray, self.previous_span()));
            }
        }
        let end = self
            .expect(&TokenKind::RightBracket, E::MissingRightBracketInArray)?
            .span;
        self.node(ExprKind::Array(elements), start.merge(end))
    }

    /// `{ key: value, ... }` with identifier, string or number keys.
    fn parse_object(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut entries: Vec<(String, Expr)> = Vec::new();
        self.skip_eols();
        if self.check(&TokenKind::Comma) {
            return Err(self.error_at_current(E::TrailingCommaInDictionary));
        }
        while !self.check(&TokenKind::RightBrace) && !self.at_end() {
            let key_token = self.peek().clone();
            let key = match key_token.kind {
                TokenKind::Identifier(name) => name,
                TokenKind::String(s) => s,
                TokenKind::Number(n) => number_key(n),
                _ if TokenKind::keyword(&key_token.lexeme).is_some() => key_token.lexeme,
                _ => return Err(self.unexpected_token(E::InvalidDictionaryKey)),
            };
            self.advance();
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(SyntaxError::new(E::DuplicateDictionaryKey, key_token.span)
                    .with("key", key));
            }
            self.skip_eols();
            self.expect(&TokenKind::Colon, E::MissingColonInDictionary)?;
            self.skip_eols();
            let value = self.parse_expression()?;
            entries.push((key, value));

            self.skip_eols();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_eols();
            if self.check(&TokenKind::RightBrace) || self.check(&TokenKind::Comma) {
                return Err(SyntaxError::new(E::TrailingCommaInDictionary, self.previous_span()));
            }
        }
        let end = self
            .expect(&TokenKind::RightBrace, E::MissingRightBraceInDictionary)?
            .span;
        self.node(ExprKind::Dictionary(entries), start.merge(end))
    }
}
