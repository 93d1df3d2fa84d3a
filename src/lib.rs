pub mod interpreter;
pub mod lexer;
pub mod parser;

use interpreter::{error::RuntimeError, SystemContext, TreeWalkInterpreter};
use lexer::{Lexer, LexicalError, Token};
use parser::{statement::Program, Parser, ParserError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HolyError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Scans `source` into a token sequence terminated by an end-of-input token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    Lexer::new(source).tokenize()
}

pub fn parse(tokens: &[Token]) -> Result<Program, ParserError> {
    Parser::new(tokens).parse()
}

/// Runs `program` on a fresh interpreter and hands the interpreter back so
/// the caller can inspect what the program left behind.
pub fn interpret<C: SystemContext>(
    program: &Program,
    context: C,
) -> Result<TreeWalkInterpreter<C>, RuntimeError> {
    let mut interpreter = TreeWalkInterpreter::new(context);
    interpreter.interpret(program)?;
    Ok(interpreter)
}

/// Tokenizes, parses and evaluates `source` in one go.
pub fn run<C: SystemContext>(source: &str, context: C) -> Result<TreeWalkInterpreter<C>, HolyError> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    Ok(interpret(&program, context)?)
}
