mod cursor;
mod error;
pub mod formatter;
mod token;

use compact_str::CompactString;
use cursor::{Cursor, SourceChar};
pub use error::{LexicalError, LexicalErrorKind};
pub use token::{Span, Token, TokenKind, TokenValue, KEYWORD_HASHMAP};

/// Single pass scanner over Holy-D source text.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; [`Lexer::tokenize`]
/// drains the scanner into a fully materialized sequence ending in
/// [`TokenKind::Eof`].
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            finished: false,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexicalError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

impl<'src> Lexer<'src> {
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.next_char();
                }
                Some('/') if self.cursor.peek_second() == Some('/') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                _ => return,
            }
        }
    }

    /// Span from `start` up to the cursor. Offsets past `u32::MAX` are rejected.
    fn span_from(&self, start: usize, line: u32, column: u32) -> Result<Span, LexicalError> {
        Span::try_new(start, self.cursor.offset()).ok_or(LexicalError {
            kind: LexicalErrorKind::SourceTooLarge,
            span: Span::default(),
            line,
            column,
        })
    }

    fn make_token(
        &self,
        start: SourceChar,
        kind: TokenKind,
        value: TokenValue,
    ) -> Result<Token, LexicalError> {
        Ok(Token {
            kind,
            value,
            span: self.span_from(start.offset, start.line, start.column)?,
            line: start.line,
            column: start.column,
        })
    }

    fn make_error(&self, start: SourceChar, kind: LexicalErrorKind) -> LexicalError {
        match self.span_from(start.offset, start.line, start.column) {
            Ok(span) => LexicalError {
                kind,
                span,
                line: start.line,
                column: start.column,
            },
            Err(too_large) => too_large,
        }
    }

    fn symbol(&self, start: SourceChar, kind: TokenKind) -> Result<Token, LexicalError> {
        let lexeme = &self.source[start.offset..self.cursor.offset()];
        self.make_token(start, kind, TokenValue::Text(lexeme.into()))
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.skip_trivia();

        let Some(start) = self.cursor.next_char() else {
            self.finished = true;
            let (line, column) = (self.cursor.line(), self.cursor.column());
            return Ok(Token {
                kind: TokenKind::Eof,
                value: TokenValue::Text(CompactString::default()),
                span: self.span_from(self.source.len(), line, column)?,
                line,
                column,
            });
        };

        match start.value {
            // Delimiters
            '(' => self.symbol(start, TokenKind::LeftParenthesis),
            ')' => self.symbol(start, TokenKind::RightParenthesis),
            '{' => self.symbol(start, TokenKind::LeftBrace),
            '}' => self.symbol(start, TokenKind::RightBrace),
            ':' => self.symbol(start, TokenKind::Colon),
            ',' => self.symbol(start, TokenKind::Comma),
            ';' => self.symbol(start, TokenKind::Semicolon),
            // Operators
            '+' => self.symbol(start, TokenKind::Plus),
            '-' => self.symbol(start, TokenKind::Minus),
            '*' => self.symbol(start, TokenKind::Star),
            // Comments were already skipped so this is always division
            '/' => self.symbol(start, TokenKind::Slash),
            '=' => {
                let kind = if self.cursor.eat_if('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.symbol(start, kind)
            }
            '<' => {
                let kind = if self.cursor.eat_if('=') {
                    TokenKind::LessThanEqual
                } else {
                    TokenKind::LessThan
                };
                self.symbol(start, kind)
            }
            '>' => {
                let kind = if self.cursor.eat_if('=') {
                    TokenKind::GreaterThanEqual
                } else {
                    TokenKind::GreaterThan
                };
                self.symbol(start, kind)
            }
            '!' if self.cursor.eat_if('=') => self.symbol(start, TokenKind::BangEqual),
            '"' => self.lex_string(start),
            'a'..='z' | 'A'..='Z' | '_' => self.lex_ident_or_keyword(start),
            '0'..='9' => self.lex_number(start),
            c => Err(self.make_error(start, LexicalErrorKind::Unrecognized(c))),
        }
    }

    fn lex_ident_or_keyword(&mut self, start: SourceChar) -> Result<Token, LexicalError> {
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let lexeme = &self.source[start.offset..self.cursor.offset()];
        let kind = KEYWORD_HASHMAP
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Ident);
        self.make_token(start, kind, TokenValue::Text(lexeme.into()))
    }

    fn lex_number(&mut self, start: SourceChar) -> Result<Token, LexicalError> {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        // Only a dot followed by a digit continues the literal.
        let is_float = self.cursor.peek() == Some('.')
            && self.cursor.peek_second().is_some_and(|c| c.is_ascii_digit());
        if is_float {
            self.cursor.next_char();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let lexeme = &self.source[start.offset..self.cursor.offset()];
        if is_float {
            // A run of digits with a single interior dot always parses.
            let value: f64 = lexeme.parse().unwrap_or(f64::INFINITY);
            self.make_token(start, TokenKind::FloatLiteral, TokenValue::Float(value))
        } else {
            match lexeme.parse::<i64>() {
                Ok(value) => {
                    self.make_token(start, TokenKind::IntegerLiteral, TokenValue::Integer(value))
                }
                Err(_) => Err(self.make_error(
                    start,
                    LexicalErrorKind::NumberOutOfRange(lexeme.into()),
                )),
            }
        }
    }

    fn lex_string(&mut self, start: SourceChar) -> Result<Token, LexicalError> {
        let mut contents = CompactString::default();
        loop {
            let Some(current) = self.cursor.next_char() else {
                return Err(self.make_error(start, LexicalErrorKind::UnclosedString));
            };
            match current.value {
                '"' => break,
                '\\' => {
                    let Some(escaped) = self.cursor.next_char() else {
                        return Err(self.make_error(start, LexicalErrorKind::UnclosedString));
                    };
                    match escaped.value {
                        'n' => contents.push('\n'),
                        't' => contents.push('\t'),
                        other => contents.push(other),
                    }
                }
                c => contents.push(c),
            }
        }
        self.make_token(start, TokenKind::StringLiteral, TokenValue::Text(contents))
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token_or_error = self.next_token();
        if token_or_error.is_err() {
            self.finished = true;
        }
        Some(token_or_error)
    }
}

