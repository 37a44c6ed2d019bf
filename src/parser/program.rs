use super::{error::ParserError, statement::Statement};

/// The root of a parse: every statement that parsed, plus every error met on the way.
///
/// A program with errors is a terminal parse failure and is never evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
    errors: Vec<ParserError>,
}

impl Program {
    pub fn new(statements: Vec<Statement>, errors: Vec<ParserError>) -> Self {
        Self { statements, errors }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
