use super::token::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unrecognized character: '{0}'")]
    Unrecognized(char),
    #[error("Unterminated string literal")]
    UnclosedString,
    #[error("Numeric literal {0} does not fit in a 64-bit integer")]
    NumberOutOfRange(String),
    #[error("Source offsets past 4 GiB cannot be addressed")]
    SourceTooLarge,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            LexicalErrorKind::Unrecognized(_) => "LX001",
            LexicalErrorKind::UnclosedString => "LX002",
            LexicalErrorKind::NumberOutOfRange(_) => "LX003",
            LexicalErrorKind::SourceTooLarge => "LX004",
        }
    }
}
