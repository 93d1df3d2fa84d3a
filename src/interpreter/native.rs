use std::time::Duration;

use super::{error::RuntimeErrorKind, value::Value, SystemContext};

/// Host provided calls, intercepted before user function lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeFunction {
    Print,
    Println,
    Sleep,
    Exit,
}

/// What the interpreter should do after a native call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeOutcome {
    Value(Value),
    Exit(i32),
}

impl NativeFunction {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "println" => Some(Self::Println),
            "sleep" => Some(Self::Sleep),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Println => "println",
            Self::Sleep => "sleep",
            Self::Exit => "exit",
        }
    }

    pub fn call<C: SystemContext>(
        &self,
        arguments: &[Value],
        context: &mut C,
    ) -> Result<NativeOutcome, RuntimeErrorKind> {
        match self {
            Self::Print => {
                context.write(&join_arguments(arguments));
                Ok(NativeOutcome::Value(Value::Nil))
            }
            Self::Println => {
                context.writeln(&join_arguments(arguments));
                Ok(NativeOutcome::Value(Value::Nil))
            }
            Self::Sleep => {
                let [seconds] = arguments else {
                    return Err(RuntimeErrorKind::InvalidArgumentCount {
                        name: self.get_name(),
                        expected: "exactly 1 argument",
                        actual: arguments.len(),
                    });
                };
                context.sleep(self.coerce_duration(seconds)?);
                Ok(NativeOutcome::Value(Value::Nil))
            }
            Self::Exit => match arguments {
                [] => Ok(NativeOutcome::Exit(0)),
                [code] => Ok(NativeOutcome::Exit(self.coerce_exit_code(code)?)),
                _ => Err(RuntimeErrorKind::InvalidArgumentCount {
                    name: self.get_name(),
                    expected: "at most 1 argument",
                    actual: arguments.len(),
                }),
            },
        }
    }

    fn invalid(&self, value: &Value) -> RuntimeErrorKind {
        RuntimeErrorKind::InvalidArgument {
            name: self.get_name(),
            value: value.clone(),
        }
    }

    fn coerce_duration(&self, value: &Value) -> Result<Duration, RuntimeErrorKind> {
        let seconds = match value {
            Value::String(text) => text.trim().parse::<f64>().ok(),
            v => v.as_float(),
        }
        .ok_or_else(|| self.invalid(value))?;
        Duration::try_from_secs_f64(seconds).map_err(|_| self.invalid(value))
    }

    fn coerce_exit_code(&self, value: &Value) -> Result<i32, RuntimeErrorKind> {
        let code = match value {
            Value::Integer(v) => i32::try_from(*v).ok(),
            Value::Float(v) if v.is_finite() => i32::try_from(v.trunc() as i64).ok(),
            Value::String(text) => text.trim().parse::<i32>().ok(),
            _ => None,
        };
        code.ok_or_else(|| self.invalid(value))
    }
}

fn join_arguments(arguments: &[Value]) -> String {
    arguments
        .iter()
        .map(|argument| argument.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
