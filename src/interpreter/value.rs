use compact_str::{format_compact, CompactString};

use super::error::RuntimeErrorKind;
use crate::parser::expression::NumericLiteral;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(CompactString),
    /// Result of statements and built-ins that produce nothing.
    Nil,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Nil => write!(f, "nil"),
        }
    }
}

impl From<NumericLiteral> for Value {
    fn from(value: NumericLiteral) -> Self {
        match value {
            NumericLiteral::Integer(v) => Value::Integer(v),
            NumericLiteral::Float(v) => Value::Float(v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Nil => "nil",
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl Value {
    // Arithmetic + string concatenation
    pub fn add(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs
                .checked_add(*rhs)
                .map(Value::Integer)
                .ok_or(RuntimeErrorKind::IntegerOverflow),
            (lhs, rhs) if lhs.is_string() || rhs.is_string() => {
                Ok(Value::String(format_compact!("{lhs}{rhs}")))
            }
            (lhs, rhs) => match (lhs.as_float(), rhs.as_float()) {
                (Some(lhs), Some(rhs)) => Ok(Value::Float(lhs + rhs)),
                _ => Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone())),
            },
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs
                .checked_sub(*rhs)
                .map(Value::Integer)
                .ok_or(RuntimeErrorKind::IntegerOverflow),
            (lhs, rhs) => match (lhs.as_float(), rhs.as_float()) {
                (Some(lhs), Some(rhs)) => Ok(Value::Float(lhs - rhs)),
                _ => Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone())),
            },
        }
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs
                .checked_mul(*rhs)
                .map(Value::Integer)
                .ok_or(RuntimeErrorKind::IntegerOverflow),
            (lhs, rhs) => match (lhs.as_float(), rhs.as_float()) {
                (Some(lhs), Some(rhs)) => Ok(Value::Float(lhs * rhs)),
                _ => Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone())),
            },
        }
    }

    /// True division: the quotient is always a float.
    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self.as_float(), other.as_float()) {
            (Some(_), Some(rhs)) if rhs == 0.0 => Err(RuntimeErrorKind::DivisionByZero),
            (Some(lhs), Some(rhs)) => Ok(Value::Float(lhs / rhs)),
            _ => Err(RuntimeErrorKind::NonNumerics(self.clone(), other.clone())),
        }
    }
}
