//! JavaScript statement parsing: declarations, control flow, functions
//! and classes.

use jiki_lexer::javascript::TokenKind;
use jiki_types::ast::javascript::{
    friendly_node_name, ClassDecl, DeclKind, FunctionDecl, Stmt, StmtKind,
};
use jiki_types::ast::Ident;
use jiki_types::{Span, SyntaxError, SyntaxErrorType as E};
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
            self.skip_eols();
            if self.at_end() {
                return Ok(statements);
            }
            if self.check(&TokenKind::RightBrace) {
                return Err(self.unexpected_token(E::UnexpectedRightBrace));
            }
            statements.push(self.nested(Self::parse_statement)?);
        }
    }

    pub(crate) fn skip_eols(&mut self) {
        while self.eat(&TokenKind::Eol) {}
    }

    /// Statements after an already-consumed `{`, through the closing `}`.
    fn parse_block_contents(&mut self) -> ParseResult<Vec<Stmt>> {
        self.block_depth += 1;
        let result = self.parse_block_statements();
        self.block_depth -= 1;
        result
    }

    fn parse_block_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            self.skip_eols();
            if self.eat(&TokenKind::RightBrace) {
                return Ok(statements);
            }
            if self.at_end() {
                return Err(self.error_at_current(E::MissingRightBraceAfterBlock));
            }
            statements.push(self.nested(Self::parse_statement)?);
        }
    }

    /// The body of `if`/`while`/`for`/`repeat`: any single statement,
    /// usually a block.
    fn parse_body(&mut self) -> ParseResult<Box<Stmt>> {
        self.skip_eols();
        self.block_depth += 1;
        let result = self.nested(Self::parse_statement);
        self.block_depth -= 1;
        result.map(Box::new)
    }

    /// Accept a statement terminator.
    ///
    /// `;` always ends a statement. Otherwise a newline, `}`, `)` or end of
    /// input does, unless `requireSemicolons` is set.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        if self.features.require_semicolons {
            if self.at_end() {
                return Ok(());
            }
            return Err(SyntaxError::new(E::MissingSemicolon, self.previous_span()));
        }
        match self.peek_kind() {
            TokenKind::Eol | TokenKind::Eof | TokenKind::RightBrace | TokenKind::RightParen => Ok(()),
            _ => Err(SyntaxError::new(E::MissingSemicolon, self.previous_span())),
        }
    }

    pub(crate) fn parse_identifier(&mut self, error_type: E) -> ParseResult<Ident> {
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
            TokenKind::Function => self.parse_function_declaration()?,
            TokenKind::Class => self.parse_class()?,
            TokenKind::Let | TokenKind::Const => {
                let stmt = self.parse_variable_declaration()?;
                self.consume_semicolon()?;
                stmt
            }
            TokenKind::LeftBrace => {
                let start = self.advance().span;
                let body = self.parse_block_contents()?;
                Stmt::new(StmtKind::Block(body), start.merge(self.previous_span()))
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Repeat => self.parse_repeat()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Break | TokenKind::Continue => {
                let token = self.advance();
                let kind = if token.kind == TokenKind::Break {
                    StmtKind::Break
                } else {
                    StmtKind::Continue
                };
                self.consume_semicolon()?;
                Stmt::new(kind, token.span)
            }
            TokenKind::Semicolon => Stmt::new(StmtKind::Empty, self.advance().span),
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                let span = expr.span;
                Stmt::new(StmtKind::Expression(expr), span)
            }
        };
        let node_type = stmt.kind.node_type();
        self.check_node_allowed(node_type, friendly_node_name(node_type), stmt.span)?;
        Ok(stmt)
    }

    /// `let x = e` / `const x = e`, without the terminator.
    fn parse_variable_declaration(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let kind = if keyword.kind == TokenKind::Const {
            DeclKind::Const
        } else {
            DeclKind::Let
        };
        let name = self.parse_identifier(E::MissingVariableName)?;

        let init = if self.eat(&TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            match kind {
                DeclKind::Const => {
                    return Err(self
                        .error_at_current(E::MissingInitializerInConstDeclaration)
                        .with("name", name.name))
                }
                DeclKind::Let if self.features.require_variable_instantiation => {
                    return Err(self
                        .error_at_current(E::MissingInitializerInVariableDeclaration)
                        .with("name", name.name))
                }
                DeclKind::Let => None,
            }
        };
        let span = keyword.span.merge(self.previous_span());
        Ok(Stmt::new(StmtKind::VariableDeclaration { kind, name, init }, span))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        self.expect(&TokenKind::LeftParen, E::MissingLeftParenthesisAfterIf)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterIfCondition)?;
        let then_branch = self.parse_body()?;

        let mark = self.checkpoint();
        self.skip_eols();
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.parse_body()?)
        } else {
            self.rewind(mark);
            None
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

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        self.expect(&TokenKind::LeftParen, E::MissingLeftParenthesisAfterIf)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterExpression)?;
        let body = self.parse_body()?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    /// `for (let x of e)`, `for (let k in e)` or C-style
    /// `for (init; condition; update)`.
    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        self.expect(&TokenKind::LeftParen, E::MissingLeftParenthesisAfterIf)?;

        let declares = matches!(self.peek_kind(), TokenKind::Let | TokenKind::Const)
            && matches!(self.look_ahead(1), TokenKind::Identifier(_));
        if declares {
            match self.look_ahead(2) {
                TokenKind::Of | TokenKind::In => return self.parse_for_iteration(start),
                TokenKind::Equal | TokenKind::Semicolon => {}
                _ => {
                    self.advance();
                    self.advance();
                    return Err(self.error_at_current(E::MissingOfOrInInForLoop));
                }
            }
        }

        let init = if self.eat(&TokenKind::Semicolon) {
            None
        } else if self.check(&TokenKind::Let) {
            let decl = self.parse_variable_declaration()?;
            self.expect(&TokenKind::Semicolon, E::MissingSemicolon)?;
            Some(Box::new(decl))
        } else if self.check(&TokenKind::Const) {
            return Err(self.error_at_current(E::ConstInForLoopInit));
        } else {
            let expr = self.parse_expression()?;
            self.expect(&TokenKind::Semicolon, E::MissingSemicolon)?;
            let span = expr.span;
            Some(Box::new(Stmt::new(StmtKind::Expression(expr), span)))
        };

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, E::MissingSemicolon)?;

        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterExpression)?;

        let body = self.parse_body()?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::For {
                init,
                condition,
                update,
                body,
            },
            span,
        ))
    }

    fn parse_for_iteration(&mut self, start: Span) -> ParseResult<Stmt> {
        self.advance();
        let name = self.parse_identifier(E::MissingVariableName)?;
        let is_of = self.advance().kind == TokenKind::Of;
        let target = self.parse_expression()?;
        self.expect(&TokenKind::RightParen, E::MissingRightParenthesisAfterExpression)?;
        let body = self.parse_body()?;
        let span = start.merge(self.previous_span());
        let kind = if is_of {
            StmtKind::ForOf {
                name,
                iterable: target,
                body,
            }
        } else {
            StmtKind::ForIn {
                name,
                object: target,
                body,
            }
        };
        Ok(Stmt::new(kind, span))
    }

    /// `repeat (count) body`; an empty count repeats until the loop guard.
    fn parse_repeat(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        self.expect(&TokenKind::LeftParen, E::MissingLeftParenAfterRepeat)?;
        let count = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RightParen, E::MissingRightParenAfterRepeatCount)?;
        let body = self.parse_body()?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(StmtKind::Repeat { count, body }, span))
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let value = match self.peek_kind() {
            TokenKind::Semicolon | TokenKind::Eol | TokenKind::Eof | TokenKind::RightBrace => None,
            _ => Some(self.parse_expression()?),
        };
        let span = match &value {
            Some(v) => start.merge(v.span),
            None => start,
        };
        self.consume_semicolon()?;
        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Functions & Classes
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_function_declaration(&mut self) -> ParseResult<Stmt> {
        if self.block_depth > 0 {
            return Err(self.error_at_current(E::NestedFunctionDeclaration));
        }
        let start = self.advance().span;
        let name = self.parse_identifier(E::MissingFunctionName)?;
        let decl = self.parse_function_rest(name, start)?;
        let span = decl.span;
        Ok(Stmt::new(StmtKind::Function(Rc::new(decl)), span))
    }

    /// `(params) { body }` after a function or method name.
    fn parse_function_rest(&mut self, name: Ident, start: Span) -> ParseResult<FunctionDecl> {
        self.expect(&TokenKind::LeftParen, E::MissingLeftParenthesisAfterFunctionName)?;
        let params = self.parse_parameters()?;
        self.skip_eols();
        self.expect(&TokenKind::LeftBrace, E::MissingLeftBraceBeforeFunctionBody)?;
        let body = self.parse_block_contents()?;
        Ok(FunctionDecl {
            name,
            params,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    fn parse_parameters(&mut self) -> ParseResult<Vec<Ident>> {
        let mut params: Vec<Ident> = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                let param = self.parse_identifier(E::MissingParameterName)?;
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
        Ok(params)
    }

    /// `class Name { constructor() {} method() {} get p() {} set p(v) {} }`
    fn parse_class(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let name = self.parse_identifier(E::MissingClassName)?;
        self.skip_eols();
        self.expect(&TokenKind::LeftBrace, E::MissingLeftBraceAfterClassName)?;

        let mut class = ClassDecl {
            name,
            constructor: None,
            methods: Vec::new(),
            getters: Vec::new(),
            setters: Vec::new(),
            span: start,
        };
        loop {
            self.skip_eols();
            if self.eat(&TokenKind::RightBrace) {
                break;
            }
            if self.at_end() {
                return Err(self.error_at_current(E::MissingRightBraceAfterClassBody));
            }
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }

            let accessor = match (self.peek_kind(), self.look_ahead(1)) {
                (TokenKind::Identifier(word), TokenKind::Identifier(_))
                    if word == "get" || word == "set" =>
                {
                    Some(word.clone())
                }
                _ => None,
            };
            if accessor.is_some() {
                self.advance();
            }

            let member = self.parse_identifier(E::MissingMethodName)?;
            let member_start = member.span;
            let is_constructor = member.name == "constructor";
            let decl = Rc::new(self.parse_function_rest(member, member_start)?);
            match accessor.as_deref() {
                Some("get") => class.getters.push(decl),
                Some(_) => class.setters.push(decl),
                None if is_constructor => class.constructor = Some(decl),
                None => class.methods.push(decl),
            }
        }
        class.span = start.merge(self.previous_span());
        let span = class.span;
        Ok(Stmt::new(StmtKind::Class(Rc::new(class)), span))
    }
}
