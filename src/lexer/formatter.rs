use super::{LexicalError, LexicalErrorKind, Token, TokenKind, TokenValue};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_error(&self, error: &LexicalError) -> String;
}

/// One token per line: position, kind, lexeme and literal value.
pub struct BasicFormatter<'src> {
    text: &'src str,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let lexeme = self.text.get(token.span.range()).unwrap_or_default();
        let literal = match (token.kind, &token.value) {
            (TokenKind::IntegerLiteral, TokenValue::Integer(v)) => format!("{v}"),
            (TokenKind::FloatLiteral, TokenValue::Float(v)) => format!("{v:?}"),
            (TokenKind::StringLiteral, TokenValue::Text(v)) => format!("{v:?}"),
            _ => "null".into(),
        };
        format!(
            "[{}:{}] {} {lexeme} {literal}",
            token.line, token.column, token.kind
        )
    }

    fn format_error(&self, error: &LexicalError) -> String {
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("[line {}] Error: Unexpected character: {c}", error.line)
            }
            LexicalErrorKind::UnclosedString => {
                format!("[line {}] Error: Unterminated string.", error.line)
            }
            LexicalErrorKind::NumberOutOfRange(ref lexeme) => {
                format!("[line {}] Error: Number out of range: {lexeme}", error.line)
            }
            LexicalErrorKind::SourceTooLarge => {
                format!("[line {}] Error: Source too large.", error.line)
            }
        }
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

pub struct PrettyFormatter<'src> {
    basic: BasicFormatter<'src>,
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self {
            basic: BasicFormatter::new(text),
            text,
            path,
        }
    }
}

impl<'src> TokenFormatter for PrettyFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        self.basic.format(token)
    }

    fn format_error(&self, error: &LexicalError) -> String {
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let range = error.span.range();
        let (message, label) = match error.kind {
            LexicalErrorKind::Unrecognized(c) => (
                "Encountered an unrecognized character".to_string(),
                format!("'{c}' is not part of the language"),
            ),
            LexicalErrorKind::UnclosedString => (
                "Unterminated string literal".to_string(),
                "String starts here but is never closed".to_string(),
            ),
            LexicalErrorKind::NumberOutOfRange(ref lexeme) => (
                "Numeric literal is too large".to_string(),
                format!("{lexeme} does not fit in a 64-bit integer"),
            ),
            LexicalErrorKind::SourceTooLarge => (
                "Source text is too large".to_string(),
                "Offsets from here on exceed 32 bits".to_string(),
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
