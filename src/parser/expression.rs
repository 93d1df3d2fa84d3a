use crate::lexer::Span;
use compact_str::CompactString;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    EqualEqual,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericLiteral {
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Binary {
        operator: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Call {
        name: CompactString,
        arguments: Vec<Expression>,
    },
    Identifier(CompactString),
    StringLiteral(CompactString),
    NumericLiteral(NumericLiteral),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
    pub line: u32,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }

    pub fn binary(operator: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        let span = lhs.span.merge(&rhs.span);
        let line = lhs.line;
        Self {
            kind: ExpressionKind::Binary {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
            line,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self.kind {
            ExpressionKind::Binary { .. } => "BinaryExpression",
            ExpressionKind::Call { .. } => "FunctionCall",
            ExpressionKind::Identifier(_) => "Identifier",
            ExpressionKind::StringLiteral(_) => "StringLiteral",
            ExpressionKind::NumericLiteral(_) => "NumericLiteral",
        }
    }
}
