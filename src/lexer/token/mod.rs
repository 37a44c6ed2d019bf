mod span;

use compact_str::CompactString;
pub use span::{SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("fn", TokenKind::KeywordFn);
    map.insert("let", TokenKind::KeywordLet);
    map.insert("true", TokenKind::KeywordTrue);
    map.insert("false", TokenKind::KeywordFalse);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("return", TokenKind::KeywordReturn);
    map
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.into(),
            length: (end - start).into(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.into()..self.end().into()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Literals
    Ident,
    IntegerLiteral,
    StringLiteral,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Star,
    Slash,
    LessThan,
    GreaterThan,
    EqualEqual,
    BangEqual,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    LeftParenthesis,
    RightParenthesis,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // Keywords
    KeywordFn,
    KeywordLet,
    KeywordTrue,
    KeywordFalse,
    KeywordIf,
    KeywordElse,
    KeywordReturn,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Illegal => write!(f, "ILLEGAL"),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Ident => write!(f, "IDENT"),
            TokenKind::IntegerLiteral => write!(f, "INT"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Assign => write!(f, "ASSIGN"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Bang => write!(f, "BANG"),
            TokenKind::Star => write!(f, "ASTERISK"),
            TokenKind::Slash => write!(f, "SLASH"),
            TokenKind::LessThan => write!(f, "LT"),
            TokenKind::GreaterThan => write!(f, "GT"),
            TokenKind::EqualEqual => write!(f, "EQ"),
            TokenKind::BangEqual => write!(f, "NOT_EQ"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::Colon => write!(f, "COLON"),
            TokenKind::LeftParenthesis => write!(f, "LPAREN"),
            TokenKind::RightParenthesis => write!(f, "RPAREN"),
            TokenKind::LeftBracket => write!(f, "LBRACKET"),
            TokenKind::RightBracket => write!(f, "RBRACKET"),
            TokenKind::LeftBrace => write!(f, "LBRACE"),
            TokenKind::RightBrace => write!(f, "RBRACE"),
            TokenKind::KeywordFn => write!(f, "FUNCTION"),
            TokenKind::KeywordLet => write!(f, "LET"),
            TokenKind::KeywordTrue => write!(f, "TRUE"),
            TokenKind::KeywordFalse => write!(f, "FALSE"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordReturn => write!(f, "RETURN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. String literals exclude their quotes.
    pub literal: CompactString,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<CompactString>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }
}
