mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use crate::lexer::{Span, Token, TokenKind, TokenValue};
use compact_str::CompactString;
pub use error::{ParserError, ParserErrorKind};
use expression::{BinaryOperator, Expression, ExpressionKind, NumericLiteral};
use statement::{
    AssignmentStatement, CallStatement, Declaration, EntryPoint, FunctionDecl, PrintStatement,
    Program, Statement,
};

/// Deepest expression nesting the parser accepts. Every `(`, every `+` and
/// every call argument list opens one level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive descent parser with a single token of lookahead.
pub struct Parser<'tok> {
    tokens: &'tok [Token],
    position: usize,
    eof: Token,
    depth: usize,
}

impl<'tok> Parser<'tok> {
    pub fn new(tokens: &'tok [Token]) -> Self {
        // Token slices built by hand may lack the terminator, so keep one around.
        let eof = match tokens.last() {
            Some(last) if last.kind == TokenKind::Eof => last.clone(),
            Some(last) => Token {
                kind: TokenKind::Eof,
                value: TokenValue::Text(CompactString::default()),
                span: Span {
                    start: last.span.end(),
                    length: 0,
                },
                line: last.line,
                column: last.column.saturating_add(last.span.length),
            },
            None => Token {
                kind: TokenKind::Eof,
                value: TokenValue::Text(CompactString::default()),
                span: Span::default(),
                line: 1,
                column: 1,
            },
        };
        Self {
            tokens,
            position: 0,
            eof,
            depth: 0,
        }
    }

    fn peek(&self) -> &'_ Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn next_token(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.peek();
        if next_token.kind == expected {
            Ok(self.next_token())
        } else if next_token.kind == TokenKind::Eof {
            Err(ParserError::at(
                next_token,
                ParserErrorKind::UnexpectedEof {
                    expected: expected.to_string(),
                },
            ))
        } else {
            Err(ParserError::at(
                next_token,
                ParserErrorKind::UnexpectedToken {
                    actual: next_token.kind,
                    expected,
                },
            ))
        }
    }

    fn eat_if(&mut self, next: TokenKind) -> Option<Token> {
        if self.check(next) {
            Some(self.next_token())
        } else {
            None
        }
    }

    fn expect_ident(&mut self) -> Result<(CompactString, Token), ParserError> {
        let token = self.expect(TokenKind::Ident)?;
        let name = token.text().map(CompactString::from).unwrap_or_default();
        Ok((name, token))
    }
}

// Parse program/declarations
impl<'tok> Parser<'tok> {
    pub fn parse(&mut self) -> Result<Program, ParserError> {
        let mut declarations = Vec::new();

        loop {
            let first = self.peek();
            match first.kind {
                TokenKind::KeywordFunc => {
                    declarations.push(Declaration::Function(self.parse_function_declaration()?));
                }
                TokenKind::KeywordEnter => {
                    declarations.push(Declaration::Entry(self.parse_entry_point()?));
                }
                TokenKind::Eof => break,
                kind => {
                    return Err(ParserError::at(
                        first,
                        ParserErrorKind::InvalidDeclaration(kind),
                    ))
                }
            }
        }

        Ok(Program { declarations })
    }

    fn parse_function_declaration(&mut self) -> Result<FunctionDecl, ParserError> {
        let func = self.expect(TokenKind::KeywordFunc)?;
        self.expect(TokenKind::Colon)?;
        let (name, _) = self.expect_ident()?;

        let mut parameters = Vec::new();
        if self.eat_if(TokenKind::LeftParenthesis).is_some() {
            if !self.check(TokenKind::RightParenthesis) {
                parameters.push(self.expect_ident()?.0);
                while self.eat_if(TokenKind::Comma).is_some() {
                    parameters.push(self.expect_ident()?.0);
                }
            }
            self.expect(TokenKind::RightParenthesis)?;
        }

        let (body, closing) = self.parse_block()?;
        Ok(FunctionDecl {
            name,
            parameters,
            body,
            span: func.span.merge(&closing),
            line: func.line,
        })
    }

    fn parse_entry_point(&mut self) -> Result<EntryPoint, ParserError> {
        let enter = self.expect(TokenKind::KeywordEnter)?;
        let (body, closing) = self.parse_block()?;
        Ok(EntryPoint {
            body,
            span: enter.span.merge(&closing),
            line: enter.line,
        })
    }

    /// Parses `{ statement* }`, returning the statements and the closing brace span.
    fn parse_block(&mut self) -> Result<(Vec<Statement>, Span), ParserError> {
        self.expect(TokenKind::LeftBrace)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            statements.push(self.parse_statement()?);
        }
        let closing = self.expect(TokenKind::RightBrace)?;
        Ok((statements, closing.span))
    }
}

// Parse statements
impl<'tok> Parser<'tok> {
    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let first = self.peek();
        match first.kind {
            TokenKind::KeywordPrint => self.parse_print_statement(false),
            TokenKind::KeywordPrintln => self.parse_print_statement(true),
            TokenKind::KeywordCall => self.parse_call_statement(),
            TokenKind::KeywordAssign => self.parse_assignment_statement(),
            TokenKind::Ident => self.parse_bare_assignment(),
            // Reserved words without a grammar rule yet.
            TokenKind::KeywordIf
            | TokenKind::KeywordElse
            | TokenKind::KeywordWhile
            | TokenKind::KeywordFor
            | TokenKind::KeywordReturn => Err(ParserError::at(
                first,
                ParserErrorKind::UnsupportedStatement(first.kind),
            )),
            TokenKind::Eof => Err(ParserError::at(
                first,
                ParserErrorKind::UnexpectedEof {
                    expected: "statement".into(),
                },
            )),
            kind => Err(ParserError::at(
                first,
                ParserErrorKind::InvalidStatement(kind),
            )),
        }
    }

    fn parse_print_statement(&mut self, newline: bool) -> Result<Statement, ParserError> {
        let keyword = self.next_token();

        let expr = if self.eat_if(TokenKind::LeftParenthesis).is_some() {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RightParenthesis)?;
            expr
        } else {
            self.parse_expression()?
        };
        let semicolon = self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Print(PrintStatement {
            expr,
            newline,
            span: keyword.span.merge(&semicolon.span),
            line: keyword.line,
        }))
    }

    fn parse_call_statement(&mut self) -> Result<Statement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordCall)?;
        let (name, _) = self.expect_ident()?;

        let arguments = if self.eat_if(TokenKind::LeftParenthesis).is_some() {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let semicolon = self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Call(CallStatement {
            name,
            arguments,
            span: keyword.span.merge(&semicolon.span),
            line: keyword.line,
        }))
    }

    fn parse_assignment_statement(&mut self) -> Result<Statement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordAssign)?;
        let (name, _) = self.expect_ident()?;
        self.finish_assignment(name, keyword)
    }

    fn parse_bare_assignment(&mut self) -> Result<Statement, ParserError> {
        let (name, token) = self.expect_ident()?;
        self.finish_assignment(name, token)
    }

    fn finish_assignment(
        &mut self,
        name: CompactString,
        first: Token,
    ) -> Result<Statement, ParserError> {
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;
        let semicolon = self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Assignment(AssignmentStatement {
            name,
            value,
            span: first.span.merge(&semicolon.span),
            line: first.line,
        }))
    }

    /// Parses the argument list after an already consumed `(`, including the closing `)`.
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ParserError> {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParenthesis) {
            arguments.push(self.parse_expression()?);
            while self.eat_if(TokenKind::Comma).is_some() {
                arguments.push(self.parse_expression()?);
            }
        }
        self.expect(TokenKind::RightParenthesis)?;
        Ok(arguments)
    }
}

// Parse expressions
impl<'tok> Parser<'tok> {
    /// Only `+` continues an expression and its right operand recurses into the
    /// full rule, so `a + b + c` groups as `a + (b + c)`. The other operator
    /// tokens are lexed but never reach the tree from here.
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParserError::at(
                self.peek(),
                ParserErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
            ));
        }

        self.depth += 1;
        let expr = self.parse_addition();
        self.depth -= 1;
        expr
    }

    fn parse_addition(&mut self) -> Result<Expression, ParserError> {
        let lhs = self.parse_primary()?;

        if self.eat_if(TokenKind::Plus).is_some() {
            let rhs = self.parse_expression()?;
            return Ok(Expression::binary(BinaryOperator::Add, lhs, rhs));
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParserError> {
        let token = self.peek();

        match (token.kind, &token.value) {
            (TokenKind::LeftParenthesis, _) => {
                self.next_token();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParenthesis)?;
                Ok(inner)
            }
            (TokenKind::StringLiteral, TokenValue::Text(value)) => {
                let kind = ExpressionKind::StringLiteral(value.clone());
                let token = self.next_token();
                Ok(Expression::new(kind, token.span, token.line))
            }
            (TokenKind::IntegerLiteral, TokenValue::Integer(value)) => {
                let kind = ExpressionKind::NumericLiteral(NumericLiteral::Integer(*value));
                let token = self.next_token();
                Ok(Expression::new(kind, token.span, token.line))
            }
            (TokenKind::FloatLiteral, TokenValue::Float(value)) => {
                let kind = ExpressionKind::NumericLiteral(NumericLiteral::Float(*value));
                let token = self.next_token();
                Ok(Expression::new(kind, token.span, token.line))
            }
            (TokenKind::Ident, TokenValue::Text(name)) => {
                let name = name.clone();
                let token = self.next_token();

                if self.eat_if(TokenKind::LeftParenthesis).is_some() {
                    let arguments = self.parse_arguments()?;
                    let end = self
                        .tokens
                        .get(self.position.saturating_sub(1))
                        .map(|t| t.span)
                        .unwrap_or(token.span);
                    return Ok(Expression::new(
                        ExpressionKind::Call { name, arguments },
                        token.span.merge(&end),
                        token.line,
                    ));
                }

                Ok(Expression::new(
                    ExpressionKind::Identifier(name),
                    token.span,
                    token.line,
                ))
            }
            (TokenKind::Eof, _) => Err(ParserError::at(
                token,
                ParserErrorKind::UnexpectedEof {
                    expected: "expression".into(),
                },
            )),
            (kind, _) => Err(ParserError::at(token, ParserErrorKind::NonExpression(kind))),
        }
    }
}
