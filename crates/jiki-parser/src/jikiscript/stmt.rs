//! JikiScript statement parsing.

use jiki_lexer::jikiscript::{TokenKind, KEYWORDS};
use jiki_types::ast::jikiscript::{ExprKind, FunctionDecl, Stmt, StmtKind};
use jiki_types::ast::Ident;
use jiki_types::{SyntaxError, SyntaxErrorType as E};
use std::rc::Rc;

use crate::parser::Parser;

type ParseResult<T> = Result<T, SyntaxError>;

impl Parser<'_, TokenKind> {
    // ══════════════════════════════════════════════════════════════════════════
    // Program & Blocks
    // ══════════════════════════════════════════════════════════════════════════

    /// `program := { statement EOL }`
    pub(crate) fn parse_program(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            self.skip_eols();
            if self.at_end() {
                return Ok(statements);
            }
            let stmt = self.nested(Self::parse_statement)?;
            self.expect_end_of_line()?;
            statements.push(stmt);
        }
    }

    pub(crate) fn skip_eols(&mut self) {
        while self.eat(&TokenKind::Eol) {}
    }

    fn expect_end_of_line(&mut self) -> ParseResult<()> {
        if self.eat(&TokenKind::Eol) || self.at_end() {
            return Ok(());
        }
        Err(self
            .error_at_current(E::MissingEndOfLine)
            .with("previous", self.previous().lexeme.clone()))
    }

    /// Parse the statements after `do` up to (not including) one of
    /// `terminators`.
    fn parse_block_body(&mut self, terminators: &[TokenKind]) -> ParseResult<Vec<Stmt>> {
        self.expect_end_of_line()?;
        self.block_depth += 1;
        let result = self.parse_block_statements(terminators);
        self.block_depth -= 1;
        result
    }

    fn parse_block_statements(&mut self, terminators: &[TokenKind]) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            self.skip_eols();
            if self.at_end() {
                return Err(self.error_at_current(E::MissingEndAfterBlockStatement));
            }
            if terminators.contains(self.peek_kind()) {
                return Ok(statements);
            }
            let stmt = self.nested(Self::parse_statement)?;
            self.expect_end_of_line()?;
            statements.push(stmt);
        }
    }

    fn expect_end(&mut self) -> ParseResult<()> {
        self.expect(&TokenKind::End, E::MissingEndAfterBlockStatement)?;
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind().clone() {
            TokenKind::Set => self.parse_set(),
            TokenKind::Change => self.parse_change(),
            TokenKind::Log => {
                let start = self.advance().span;
                let value = self.parse_expression()?;
                let span = start.merge(value.span);
                Ok(Stmt::new(StmtKind::Log(value), span))
            }
            TokenKind::Function => self.parse_function(),
            TokenKind::Return => {
                let start = self.advance().span;
                if self.check(&TokenKind::Eol) || self.at_end() {
                    return Ok(Stmt::new(StmtKind::Return(None), start));
                }
                let value = self.parse_expression()?;
                let span = start.merge(value.span);
                Ok(Stmt::new(StmtKind::Return(Some(value)), span))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::Else => Err(self.error_at_current(E::UnexpectedElseWithoutMatchingIf)),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::RepeatForever => self.parse_repeat_forever(),
            TokenKind::For => self.parse_for_each(),
            TokenKind::Do => {
                let start = self.advance().span;
                let body = self.parse_block_body(&[TokenKind::End])?;
                self.expect_end()?;
                Ok(Stmt::new(StmtKind::Block(body), start.merge(self.previous_span())))
            }
            TokenKind::Break => Ok(Stmt::new(StmtKind::Break, self.advance().span)),
            TokenKind::Continue | TokenKind::Next => {
                Ok(Stmt::new(StmtKind::Continue, self.advance().span))
            }
            TokenKind::Identifier(name) => {
                let lowered = name.to_lowercase();
                if lowered != name && KEYWORDS.iter().any(|(word, _)| *word == lowered) {
                    return Err(self
                        .error_at_current(E::MiscapitalizedKeywordInStatement)
                        .with("suggestion", lowered));
                }
                if self.look_ahead(1) == &TokenKind::Equal {
                    return Err(self.error_at_current(E::UnexpectedEqualsForAssignmentUseSetInstead));
                }
                self.parse_expression_statement()
            }
            kind if kind.is_keyword() && !matches!(kind, TokenKind::True | TokenKind::False | TokenKind::Not) => {
                Err(self.unexpected_token(E::UnexpectedTokenInStatement))
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Only a function call stands on its own as a statement.
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        match &expr.kind {
            ExprKind::Call { .. } => {
                let span = expr.span;
                Ok(Stmt::new(StmtKind::Expression(expr), span))
            }
            ExprKind::Variable(ident) => Err(SyntaxError::new(
                E::PotentialMissingParenthesesForFunctionCall,
                expr.span,
            )
            .with("name", ident.name.clone())),
            _ => Err(SyntaxError::new(E::PointlessStatementWithNoEffect, expr.span)),
        }
    }

    fn expect_variable_name(&mut self) -> ParseResult<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => Ok(Ident::new(name, self.advance().span)),
            _ => Err(self.error_at_current(E::MissingVariableNameInDeclaration)),
        }
    }

    /// `set name to value`
    fn parse_set(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let name = self.expect_variable_name()?;
        if !self.eat(&TokenKind::To) {
            return Err(self.error_at_current(E::MissingToAfterVariableNameToInitializeValue));
        }
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        Ok(Stmt::new(StmtKind::Set { name, value }, span))
    }

    /// `change name[i]... to value`
    fn parse_change(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let name = self.expect_variable_name()?;
        let mut indexes = Vec::new();
        while self.eat(&TokenKind::LeftBracket) {
            indexes.push(self.parse_expression()?);
            self.expect(&TokenKind::RightBracket, E::MissingRightBracketAfterFieldNameOrIndex)?;
        }
        if !self.eat(&TokenKind::To) {
            return Err(self.error_at_current(E::MissingToAfterVariableNameToChangeValue));
        }
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        Ok(Stmt::new(StmtKind::Change { name, indexes, value }, span))
    }

    /// `function name [with a, b] do EOL block end`
    fn parse_function(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        if self.block_depth > 0 {
            return Err(SyntaxError::new(E::InvalidNestedFunctionDeclaration, start));
        }
        let name = match self.peek_kind().clone() {
            TokenKind::Identifier(name) => Ident::new(name, self.advance().span),
            _ => return Err(self.error_at_current(E::MissingFunctionNameInDeclaration)),
        };

        let mut params: Vec<Ident> = Vec::new();
        if self.eat(&TokenKind::With) {
            loop {
                let TokenKind::Identifier(param) = self.peek_kind().clone() else {
                    return Err(self.error_at_current(E::MissingParameterNameInFunctionDeclaration));
                };
                let span = self.advance().span;
                if params.iter().any(|p| p.name == param) {
                    return Err(SyntaxError::new(E::DuplicateParameterNameInFunctionDeclaration, span)
                        .with("name", param));
                }
                params.push(Ident::new(param, span));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        if !self.eat(&TokenKind::Do) {
            let error_type = match self.peek_kind() {
                TokenKind::Eol | TokenKind::Eof => E::MissingDoToStartFunctionBody,
                TokenKind::Identifier(_) if params.is_empty() => E::MissingWithBeforeParametersInFunction,
                TokenKind::Identifier(_) => E::MissingCommaBetweenFunctionParameters,
                _ => E::UnexpectedTokenAfterParametersInFunction,
            };
            return Err(self.unexpected_token(error_type));
        }

        let body = self.parse_block_body(&[TokenKind::End])?;
        self.expect_end()?;
        let span = start.merge(self.previous_span());
        let decl = FunctionDecl {
            name,
            params,
            body,
            span,
        };
        Ok(Stmt::new(StmtKind::Function(Rc::new(decl)), span))
    }

    /// `if cond do ... [else if ... | else do ...] end`
    ///
    /// An `else if` chain shares the final `end` of its innermost branch.
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        if matches!(self.peek_kind(), TokenKind::Eol | TokenKind::Eof | TokenKind::Do) {
            return Err(self.error_at_current(E::MissingIfConditionAfterIfKeyword));
        }
        let condition = self.parse_expression()?;
        if !self.eat(&TokenKind::Do) {
            return Err(self.error_at_current(E::MissingDoToStartIfBody));
        }
        let then_branch = self.parse_block_body(&[TokenKind::End, TokenKind::Else])?;

        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(vec![self.parse_if()?])
            } else {
                if !self.eat(&TokenKind::Do) {
                    return Err(self.error_at_current(E::MissingDoToStartElseBody));
                }
                let body = self.parse_block_body(&[TokenKind::End])?;
                self.expect_end()?;
                Some(body)
            }
        } else {
            self.expect_end()?;
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

    /// `[indexed by NAME]`
    fn parse_indexed_by(&mut self) -> ParseResult<Option<Ident>> {
        if !self.eat(&TokenKind::Indexed) {
            return Ok(None);
        }
        if !self.eat(&TokenKind::By) {
            return Err(self.error_at_current(E::MissingByAfterIndexedKeyword));
        }
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => Ok(Some(Ident::new(name, self.advance().span))),
            _ => Err(self.error_at_current(E::MissingIndexNameAfterIndexedByKeywords)),
        }
    }

    /// `repeat n times [indexed by i] do EOL block end`
    fn parse_repeat(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        let count = self.parse_expression()?;
        if !self.eat(&TokenKind::Times) {
            return Err(self.error_at_current(E::MissingTimesInRepeatStatement));
        }
        let index = self.parse_indexed_by()?;
        if !self.eat(&TokenKind::Do) {
            return Err(self.error_at_current(E::MissingDoAfterRepeatStatementCondition));
        }
        let body = self.parse_block_body(&[TokenKind::End])?;
        self.expect_end()?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(StmtKind::Repeat { count, index, body }, span))
    }

    fn parse_repeat_forever(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        if !self.eat(&TokenKind::Do) {
            return Err(self.error_at_current(E::MissingDoToStartBlock));
        }
        let body = self.parse_block_body(&[TokenKind::End])?;
        self.expect_end()?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(StmtKind::RepeatForever { body }, span))
    }

    /// `for each x[, y] in e [indexed by i] do EOL block end`
    fn parse_for_each(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;
        if !self.eat(&TokenKind::Each) {
            return Err(self.error_at_current(E::MissingEachAfterForKeyword));
        }
        let element = match self.peek_kind().clone() {
            TokenKind::Identifier(name) => Ident::new(name, self.advance().span),
            _ => return Err(self.error_at_current(E::MissingElementNameAfterForeachKeyword)),
        };
        let second = if self.eat(&TokenKind::Comma) {
            match self.peek_kind().clone() {
                TokenKind::Identifier(name) => Some(Ident::new(name, self.advance().span)),
                _ => return Err(self.error_at_current(E::MissingSecondElementNameAfterForeachKeyword)),
            }
        } else {
            None
        };
        if !self.eat(&TokenKind::In) {
            return Err(self.error_at_current(E::MissingInAfterElementNameInForeach));
        }
        let iterable = self.parse_expression()?;
        let index = self.parse_indexed_by()?;
        if !self.eat(&TokenKind::Do) {
            return Err(self.error_at_current(E::MissingDoToStartBlock));
        }
        let body = self.parse_block_body(&[TokenKind::End])?;
        self.expect_end()?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::ForEach {
                element,
                second,
                iterable,
                index,
                body,
            },
            span,
        ))
    }
}
