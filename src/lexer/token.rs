use compact_str::CompactString;
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("func", TokenKind::KeywordFunc);
    map.insert("enter", TokenKind::KeywordEnter);
    map.insert("call", TokenKind::KeywordCall);
    map.insert("print", TokenKind::KeywordPrint);
    map.insert("println", TokenKind::KeywordPrintln);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("while", TokenKind::KeywordWhile);
    map.insert("for", TokenKind::KeywordFor);
    map.insert("return", TokenKind::KeywordReturn);
    map.insert("assign", TokenKind::KeywordAssign);
    map
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: u32,
    /// The length of the token in bytes.
    pub length: u32,
}

impl Span {
    /// Fails when either offset does not fit in 32 bits.
    pub fn try_new(start: usize, end: usize) -> Option<Self> {
        let start = u32::try_from(start).ok()?;
        let end = u32::try_from(end).ok()?;
        Some(Self {
            start,
            length: end.saturating_sub(start),
        })
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    pub fn merge(&self, other: &Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span {
            start,
            length: end - start,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Delimiters
    Colon,
    Comma,
    Semicolon,
    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    EqualEqual,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,

    // Literals
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Ident,

    // Keywords
    KeywordFunc,
    KeywordEnter,
    KeywordCall,
    KeywordPrint,
    KeywordPrintln,
    KeywordIf,
    KeywordElse,
    KeywordWhile,
    KeywordFor,
    KeywordReturn,
    KeywordAssign,

    // End of file.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LPAREN"),
            TokenKind::RightParenthesis => write!(f, "RPAREN"),
            TokenKind::LeftBrace => write!(f, "LBRACE"),
            TokenKind::RightBrace => write!(f, "RBRACE"),
            TokenKind::Colon => write!(f, "COLON"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Star => write!(f, "MULTIPLY"),
            TokenKind::Slash => write!(f, "DIVIDE"),
            TokenKind::Equal => write!(f, "ASSIGN"),
            TokenKind::EqualEqual => write!(f, "EQUALS"),
            TokenKind::BangEqual => write!(f, "NOT_EQUALS"),
            TokenKind::LessThan => write!(f, "LT"),
            TokenKind::LessThanEqual => write!(f, "LTE"),
            TokenKind::GreaterThan => write!(f, "GT"),
            TokenKind::GreaterThanEqual => write!(f, "GTE"),
            TokenKind::IntegerLiteral => write!(f, "NUMBER"),
            TokenKind::FloatLiteral => write!(f, "FLOAT"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordFunc => write!(f, "FUNC"),
            TokenKind::KeywordEnter => write!(f, "ENTER"),
            TokenKind::KeywordCall => write!(f, "CALL"),
            TokenKind::KeywordPrint => write!(f, "PRINT"),
            TokenKind::KeywordPrintln => write!(f, "PRINTLN"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordWhile => write!(f, "WHILE"),
            TokenKind::KeywordFor => write!(f, "FOR"),
            TokenKind::KeywordReturn => write!(f, "RETURN"),
            TokenKind::KeywordAssign => write!(f, "KW_ASSIGN"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// The literal payload of a token.
///
/// Identifiers, keywords, operators and delimiters carry their text. String
/// literals carry their decoded contents (escapes already translated).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Text(CompactString),
    Integer(i64),
    Float(f64),
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Text(v) => write!(f, "{v}"),
            TokenValue::Integer(v) => write!(f, "{v}"),
            TokenValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
}

impl Token {
    pub fn text(&self) -> Option<&str> {
        match self.value {
            TokenValue::Text(ref text) => Some(text),
            _ => None,
        }
    }

    /// Whether two tokens agree on everything but their position.
    pub fn same_lexeme(&self, other: &Token) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}
