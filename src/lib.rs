pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod string;
pub mod value;

use parser::{Parser, Program};

/// Parses a whole source text, returning the program together with its error messages in the
/// order they were found.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let program = Parser::new(source).parse();
    let messages = program.error_messages();
    (program, messages)
}
