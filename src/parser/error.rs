use crate::lexer::{Span, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

fn describe_actual(actual: &Option<TokenKind>) -> String {
    match actual {
        Some(kind) => kind.to_string(),
        None => "nothing".into(),
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected next token to be {expected} but was {}", describe_actual(.actual))]
    UnexpectedToken {
        expected: TokenKind,
        actual: Option<TokenKind>,
    },
    #[error("No prefix parse function for {0} found")]
    NonExpression(TokenKind),
    #[error("Could not parse {0} as integer")]
    InvalidInteger(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PE001",
            ParserErrorKind::NonExpression(_) => "PE002",
            ParserErrorKind::InvalidInteger(_) => "PE003",
        }
    }
}
