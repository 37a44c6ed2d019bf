use super::error::{RuntimeError, RuntimeErrorKind};
use super::Value;
use crate::lexer::LineBreaks;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &Value) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value:?}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!("{error:?}")
    }
}

/// Renders values the way the REPL prints them and errors as `[line N] ERROR: message`.
pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        let line_breaks = LineBreaks::new(text);
        Self { line_breaks }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] ERROR: {error}")
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

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let path = &self.path.to_string_lossy();
        let span = error.span;
        let mut output = std::io::Cursor::new(Vec::new());
        let report = Report::build(ReportKind::Error, (path, span.range())).with_code(error.code());
        let report = match &error.kind {
            RuntimeErrorKind::TypeMismatch { expected, actual } => report
                .with_message("Operand has the wrong type")
                .with_label(
                    Label::new((path, span.range()))
                        .with_message(format!(
                            "Expected {} but got {}",
                            expected.fg(Color::BrightCyan),
                            actual.fg(Color::BrightRed),
                        ))
                        .with_color(Color::BrightRed),
                ),
            RuntimeErrorKind::UnknownOperator(description) => report
                .with_message("Operator is not defined for these operands")
                .with_label(
                    Label::new((path, span.range()))
                        .with_message(format!("{} is not supported", description.fg(Color::BrightRed)))
                        .with_color(Color::BrightRed),
                ),
            RuntimeErrorKind::UnknownIdentifier(name) => report
                .with_message("Attempted to access a name that has not been defined")
                .with_label(
                    Label::new((path, span.range()))
                        .with_message(format!("{} has not been defined.", name.fg(Color::BrightRed)))
                        .with_color(Color::BrightRed),
                ),
            RuntimeErrorKind::IncorrectNumberOfArgs { expected, actual } => report
                .with_message("Attempted to call a function with the wrong number of arguments")
                .with_label(
                    Label::new((path, span.range()))
                        .with_message(format!(
                            "Function takes {} arguments but got {} instead.",
                            expected.fg(Color::BrightCyan),
                            actual.fg(Color::BrightRed),
                        ))
                        .with_color(Color::BrightRed),
                ),
            RuntimeErrorKind::ParseError(errors) => {
                errors.iter().fold(report.with_message("Program failed to parse"), |report, e| {
                    report.with_label(
                        Label::new((path, e.span.range()))
                            .with_message(e.to_string())
                            .with_color(Color::BrightRed),
                    )
                })
            }
        };
        report
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
