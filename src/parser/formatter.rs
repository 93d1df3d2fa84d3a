use super::{
    expression::{Expression, ExpressionKind, NumericLiteral},
    statement::{Declaration, Program, Statement},
    ParserError, ParserErrorKind,
};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{fmt::Write, path::Path};

const WRITE_FMT_MSG: &str = "Encountered an error while attempting to write format string to buffer.";
const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
}

pub struct DebugProgramFormatter;

impl ProgramFormatter for DebugProgramFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }
}

/// Lisp style dump of the tree, one declaration or statement per line.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    pub fn format_expression(expr: &Expression) -> String {
        match &expr.kind {
            ExpressionKind::NumericLiteral(NumericLiteral::Integer(v)) => format!("{v}"),
            ExpressionKind::NumericLiteral(NumericLiteral::Float(v)) => format!("{v:?}"),
            ExpressionKind::StringLiteral(v) => format!("{v:?}"),
            ExpressionKind::Identifier(name) => format!("{name}"),
            ExpressionKind::Binary { operator, lhs, rhs } => format!(
                "({operator} {} {})",
                Self::format_expression(lhs),
                Self::format_expression(rhs)
            ),
            ExpressionKind::Call { name, arguments } => {
                let mut buffer = format!("({name}");
                for argument in arguments.iter() {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_expression(argument));
                }
                buffer.push(')');
                buffer
            }
        }
    }

    pub fn format_statement(statement: &Statement) -> String {
        match statement {
            Statement::Print(stmt) => {
                let keyword = if stmt.newline { "println" } else { "print" };
                format!("({keyword} {})", Self::format_expression(&stmt.expr))
            }
            Statement::Call(stmt) => {
                let mut buffer = format!("(call {}", stmt.name);
                for argument in stmt.arguments.iter() {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_expression(argument));
                }
                buffer.push(')');
                buffer
            }
            Statement::Assignment(stmt) => {
                format!(
                    "(assign {} {})",
                    stmt.name,
                    Self::format_expression(&stmt.value)
                )
            }
        }
    }

    fn format_body(buffer: &mut String, body: &[Statement]) {
        for statement in body.iter() {
            buffer
                .write_fmt(format_args!("\n    {}", Self::format_statement(statement)))
                .expect(WRITE_FMT_MSG);
        }
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format(&self, program: &Program) -> String {
        let mut buffer = String::from("(program");
        for decl in program.declarations.iter() {
            match decl {
                Declaration::Function(function) => {
                    buffer
                        .write_fmt(format_args!(
                            "\n  (func {} ({})",
                            function.name,
                            function.parameters.join(" ")
                        ))
                        .expect(WRITE_FMT_MSG);
                    Self::format_body(&mut buffer, &function.body);
                }
                Declaration::Entry(entry) => {
                    buffer.push_str("\n  (enter");
                    Self::format_body(&mut buffer, &entry.body);
                }
            }
            buffer.push(')');
        }
        buffer.push(')');
        buffer
    }
}

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugParserFormatter;

impl ParserFormatter for DebugParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicParserFormatter;

impl ParserFormatter for BasicParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!(
            "[line {}, column {}] Error: {}",
            error.line, error.column, error.kind
        )
    }
}

pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let range = error.span.range();
        let (message, label) = match &error.kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => (
                "Expected a different token",
                format!("Expected {expected} but got {actual}"),
            ),
            ParserErrorKind::NonExpression(kind) => (
                "Expected a valid expression",
                format!("{kind} cannot start an expression"),
            ),
            ParserErrorKind::InvalidStatement(kind) => (
                "Expected a statement",
                format!("{kind} cannot start a statement"),
            ),
            ParserErrorKind::InvalidDeclaration(kind) => (
                "Expected a function declaration or an entry block",
                format!("{kind} is not allowed at the top level"),
            ),
            ParserErrorKind::UnsupportedStatement(kind) => (
                "Statement is not supported",
                format!("{kind} is reserved but has no grammar rule"),
            ),
            ParserErrorKind::UnexpectedEof { expected } => (
                "Unexpected end of input",
                format!("Input ends here while expecting {expected}"),
            ),
            ParserErrorKind::NestingTooDeep(limit) => (
                "Expression is nested too deeply",
                format!("Nesting passes {limit} levels here"),
            ),
        };

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_code(error.code())
            .with_message(message)
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
