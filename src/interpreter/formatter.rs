use super::error::{RuntimeError, RuntimeErrorKind};
use super::value::Value;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &Value) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value:?}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicFormatter;

impl BasicFormatter {
    fn format_verbose(value: &Value) -> String {
        match value {
            Value::Integer(v) => format!("Integer({v})"),
            Value::Float(v) => format!("Float({v:?})"),
            Value::String(v) => format!("String({v:?})"),
            Value::Nil => "Nil".into(),
        }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!("[line {}] {}: {}", error.line, error.category(), error.kind)
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let range = error.span.range();
        let label = match &error.kind {
            RuntimeErrorKind::UndefinedVariable(name) => {
                format!("{} has not been assigned yet", name.fg(Color::BrightRed))
            }
            RuntimeErrorKind::UndefinedFunction(name) => {
                format!("No function named {} was declared", name.fg(Color::BrightRed))
            }
            RuntimeErrorKind::InvalidArgumentCount {
                name,
                expected,
                actual,
            } => format!(
                "{name}() takes {} but got {}",
                expected.fg(Color::BrightCyan),
                actual.fg(Color::BrightRed)
            ),
            RuntimeErrorKind::NonNumerics(lhs, rhs) => format!(
                "One or both of {} and {} is not numeric",
                BasicFormatter::format_verbose(lhs).fg(Color::BrightRed),
                BasicFormatter::format_verbose(rhs).fg(Color::BrightRed),
            ),
            RuntimeErrorKind::UnknownOperator(operator) => {
                format!("{} cannot be evaluated", operator.fg(Color::BrightRed))
            }
            RuntimeErrorKind::DivisionByZero => "The divisor evaluates to zero".into(),
            RuntimeErrorKind::IntegerOverflow => "Result does not fit in 64 bits".into(),
            RuntimeErrorKind::InvalidArgument { name, value } => format!(
                "{} is not a valid argument to {name}()",
                BasicFormatter::format_verbose(value).fg(Color::BrightRed)
            ),
            RuntimeErrorKind::CallDepthExceeded(limit) => {
                format!("Calls nest deeper than {limit} here")
            }
            RuntimeErrorKind::EvaluationTooDeep(limit) => {
                format!("Expressions nest deeper than {limit} here")
            }
        };

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_code(error.code())
            .with_message(format!("{}: {}", error.category(), error.kind))
            .with_label(
                Label::new((path, range))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
