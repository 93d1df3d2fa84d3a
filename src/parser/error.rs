use crate::lexer::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got {actual}")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected an expression but got {0}")]
    NonExpression(TokenKind),
    #[error("Expected a statement but got {0}")]
    InvalidStatement(TokenKind),
    #[error("Expected `func` or `enter` but got {0}")]
    InvalidDeclaration(TokenKind),
    #[error("The `{0}` statement is not supported")]
    UnsupportedStatement(TokenKind),
    #[error("Expected {expected} but reached the end of input")]
    UnexpectedEof { expected: String },
    #[error("Expression nests deeper than {0} levels")]
    NestingTooDeep(usize),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl ParserError {
    pub fn at(token: &Token, kind: ParserErrorKind) -> Self {
        Self {
            kind,
            span: token.span,
            line: token.line,
            column: token.column,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonExpression(_) => "PA002",
            ParserErrorKind::InvalidStatement(_) => "PA003",
            ParserErrorKind::InvalidDeclaration(_) => "PA004",
            ParserErrorKind::UnsupportedStatement(_) => "PA005",
            ParserErrorKind::UnexpectedEof { .. } => "PA006",
            ParserErrorKind::NestingTooDeep(_) => "PA007",
        }
    }
}
