use super::ValueType;
use crate::{lexer::Span, parser::ParserError, string::IdentName};
use compact_str::CompactString;
use thiserror::Error;

fn describe_parse_errors(errors: &[ParserError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: ValueType,
    },
    #[error("Unknown operator: {0}")]
    UnknownOperator(CompactString),
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(IdentName),
    #[error("Incorrect number of arguments: expected {expected}, got {actual}")]
    IncorrectNumberOfArgs { expected: usize, actual: usize },
    #[error("Parse error: {}", describe_parse_errors(.0))]
    ParseError(Vec<ParserError>),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::TypeMismatch { .. } => "RT001",
            RuntimeErrorKind::UnknownOperator(_) => "RT002",
            RuntimeErrorKind::UnknownIdentifier(_) => "RT003",
            RuntimeErrorKind::IncorrectNumberOfArgs { .. } => "RT004",
            RuntimeErrorKind::ParseError(_) => "RT005",
        }
    }
}
