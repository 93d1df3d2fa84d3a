use compact_str::CompactString;
use thiserror::Error;

use super::value::Value;
use crate::lexer::Span;

/// The error classes a host sees: undefined names, misused built-ins and bad values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NameError,
    TypeError,
    ValueError,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::NameError => write!(f, "NameError"),
            ErrorCategory::TypeError => write!(f, "TypeError"),
            ErrorCategory::ValueError => write!(f, "ValueError"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Variable '{0}' not defined")]
    UndefinedVariable(CompactString),
    #[error("Function '{0}' not defined")]
    UndefinedFunction(CompactString),
    #[error("{name}() takes {expected} but {actual} given")]
    InvalidArgumentCount {
        name: &'static str,
        expected: &'static str,
        actual: usize,
    },
    #[error("Unsupported operand types: {} and {}", .0.type_name(), .1.type_name())]
    NonNumerics(Value, Value),
    #[error("Unknown operator: {0}")]
    UnknownOperator(&'static str),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow")]
    IntegerOverflow,
    #[error("Invalid argument to {name}(): {value}")]
    InvalidArgument { name: &'static str, value: Value },
    #[error("Maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("Maximum expression depth of {0} exceeded")]
    EvaluationTooDeep(usize),
}

impl RuntimeErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuntimeErrorKind::UndefinedVariable(_) | RuntimeErrorKind::UndefinedFunction(_) => {
                ErrorCategory::NameError
            }
            RuntimeErrorKind::InvalidArgumentCount { .. } | RuntimeErrorKind::NonNumerics(..) => {
                ErrorCategory::TypeError
            }
            RuntimeErrorKind::UnknownOperator(_)
            | RuntimeErrorKind::DivisionByZero
            | RuntimeErrorKind::IntegerOverflow
            | RuntimeErrorKind::InvalidArgument { .. }
            | RuntimeErrorKind::CallDepthExceeded(_)
            | RuntimeErrorKind::EvaluationTooDeep(_) => ErrorCategory::ValueError,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{}: {kind} at line {line}", .kind.category())]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
    pub line: u32,
}

impl RuntimeError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::UndefinedVariable(_) => "RT001",
            RuntimeErrorKind::UndefinedFunction(_) => "RT002",
            RuntimeErrorKind::InvalidArgumentCount { .. } => "RT003",
            RuntimeErrorKind::NonNumerics(..) => "RT004",
            RuntimeErrorKind::UnknownOperator(_) => "RT005",
            RuntimeErrorKind::DivisionByZero => "RT006",
            RuntimeErrorKind::IntegerOverflow => "RT007",
            RuntimeErrorKind::InvalidArgument { .. } => "RT008",
            RuntimeErrorKind::CallDepthExceeded(_) => "RT009",
            RuntimeErrorKind::EvaluationTooDeep(_) => "RT010",
        }
    }
}
