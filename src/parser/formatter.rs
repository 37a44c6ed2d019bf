use super::{
    expression::{Expression, ExpressionAtomKind, ExpressionNode, FunctionLiteral},
    statement::{BlockStatement, Statement},
    ParserError, ParserErrorKind, Program,
};
use crate::lexer::LineBreaks;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt::{self, Display, Write};
use std::path::Path;

const WRITE_FMT_MSG: &str = "Encountered an error while attempting to write format string to buffer.";
const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

fn write_separated<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            ExpressionNode::Atom(atom) => match atom {
                ExpressionAtomKind::Integer(v) => write!(f, "{v}"),
                ExpressionAtomKind::Bool(v) => write!(f, "{v}"),
                ExpressionAtomKind::Identifier(name) => write!(f, "{name}"),
                ExpressionAtomKind::StringLiteral(v) => write!(f, "\"{v}\""),
            },
            ExpressionNode::Array { elements } => {
                write!(f, "[")?;
                write_separated(f, elements)?;
                write!(f, "]")
            }
            ExpressionNode::Map { pairs } => {
                write!(f, "{{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            ExpressionNode::Prefix { operator, rhs } => write!(f, "({operator}{rhs})"),
            ExpressionNode::Infix { operator, lhs, rhs } => write!(f, "({lhs} {operator} {rhs})"),
            ExpressionNode::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            ExpressionNode::Function(function) => write!(f, "{function}"),
            ExpressionNode::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                write_separated(f, arguments)?;
                write!(f, ")")
            }
            ExpressionNode::Index { collection, index } => write!(f, "({collection}[{index}])"),
        }
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        write_separated(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        for (index, statement) in self.body.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{statement}")?;
        }
        write!(f, " }}")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(stmt) => write!(f, "let {} = {}", stmt.name, stmt.value),
            Statement::Return(stmt) => match stmt.value {
                Some(ref value) => write!(f, "return {value}"),
                None => write!(f, "return"),
            },
            Statement::Expression(stmt) => write!(f, "{}", stmt.expr),
            Statement::Block(block) => write!(f, "{block}"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, statement) in self.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
    fn format_error(&self, error: &ParserError) -> String;

    /// Formats every error of the program, one per line.
    fn format_errors(&self, program: &Program) -> String {
        let mut buffer = String::new();
        for error in program.errors() {
            buffer.push_str(&self.format_error(error));
            if !buffer.ends_with('\n') {
                buffer.push('\n');
            }
        }
        buffer
    }
}

pub struct DebugFormatter;

impl ProgramFormatter for DebugFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ProgramFormatter for BasicFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        let mut buffer = String::new();
        buffer
            .write_fmt(format_args!("[line {line}] {error}"))
            .expect(WRITE_FMT_MSG);
        buffer
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

impl<'src> ProgramFormatter for PrettyFormatter<'src> {
    fn format(&self, program: &Program) -> String {
        format!("{program}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        let path = &self.path.to_string_lossy();
        let range = error.span.range();
        let label = match &error.kind {
            ParserErrorKind::UnexpectedToken { expected, .. } => format!("Expected {expected} here"),
            ParserErrorKind::NonExpression(kind) => format!("{kind} can not start an expression"),
            ParserErrorKind::InvalidInteger(_) => "Does not fit in a 64-bit integer".into(),
        };
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_code(error.code())
            .with_message(error.to_string())
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
