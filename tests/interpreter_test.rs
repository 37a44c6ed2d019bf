use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use monkey::{
    interpreter::{context::BufferedContext, TreeWalkInterpreter},
    value::{
        error::RuntimeErrorKind,
        formatter::{BasicFormatter, ValueFormatter},
        Value,
    },
};

struct TestCase {
    name: String,
    source: String,
    expected: String,
}

impl TestCase {
    pub fn check(&self) {
        let (program, _) = monkey::parse(&self.source);
        let value_formatter = BasicFormatter::new(&self.source);
        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
        let result = interpreter.run(&program);
        let mut actual = interpreter.into_context().into_data();
        match result {
            Ok(value) => actual.push_str(&value_formatter.format(&value)),
            Err(e) => actual.push_str(&value_formatter.format_error(&e)),
        }
        assert_eq!(
            actual.trim_end(),
            self.expected.trim_end(),
            "Failed test {}.",
            self.name,
        );
    }
}

fn session_line(interpreter: &mut TreeWalkInterpreter<BufferedContext>, line: &str) -> String {
    let (program, _) = monkey::parse(line);
    match interpreter.run(&program) {
        Ok(value) => value.to_string(),
        Err(e) => format!("ERROR: {e}"),
    }
}

#[test]
fn test_bindings_persist_across_inputs() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    assert_eq!(session_line(&mut interpreter, "let x = 5;"), "5");
    assert_eq!(session_line(&mut interpreter, "x;"), "5");
    assert_eq!(session_line(&mut interpreter, "let x = 5;"), "5");
    assert_eq!(session_line(&mut interpreter, "x;"), "5");
    assert_eq!(session_line(&mut interpreter, "x * 2"), "10");
}

#[test]
fn test_functions_persist_across_inputs() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    session_line(&mut interpreter, "let newAdder = fn(x) { fn(y) { x + y } };");
    session_line(&mut interpreter, "let addTwo = newAdder(2);");
    assert_eq!(session_line(&mut interpreter, "addTwo(3)"), "5");
    assert_eq!(session_line(&mut interpreter, "addTwo(40)"), "42");
}

#[test]
fn test_errors_keep_the_session() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    session_line(&mut interpreter, "let a = 1;");
    assert_eq!(
        session_line(&mut interpreter, "let b = a + true;"),
        "ERROR: Type mismatch: expected INTEGER, got BOOLEAN"
    );
    assert_eq!(
        session_line(&mut interpreter, "b"),
        "ERROR: Unknown identifier: b"
    );
    assert_eq!(session_line(&mut interpreter, "a"), "1");
}

#[test]
fn test_rejected_input_changes_nothing() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    let (program, errors) = monkey::parse("let a = 1; let b 2;");
    assert_eq!(errors.len(), 1);
    let Err(error) = interpreter.run(&program) else {
        panic!("Expected a parse error.");
    };
    assert!(matches!(error.kind, RuntimeErrorKind::ParseError(_)));
    assert!(interpreter.get_environment().access("a").is_none());
}

#[test]
fn test_session_output() {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    session_line(&mut interpreter, "puts(\"first\")");
    session_line(&mut interpreter, "let name = \"second\";");
    session_line(&mut interpreter, "puts(name, [name])");
    assert_eq!(
        interpreter.get_context().get_data(),
        "first\nsecond\n[\"second\"]\n"
    );
}

#[test]
fn test_environment_is_global() {
    let interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    assert!(interpreter.get_environment().is_global());
    interpreter
        .get_environment()
        .declare("answer".into(), Value::Integer(42));
    let mut interpreter = interpreter;
    assert_eq!(session_line(&mut interpreter, "answer"), "42");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/in");
    let output_dir = Path::new("./test_data/interpreter/out");
    test_engine(input_dir, output_dir)
}

fn test_engine(input_dir: &Path, output_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "monkey" {
            continue;
        }

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path, output_dir)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one interpreter test case failed.");

    Ok(())
}

fn parse_test_case(input_path: &Path, output_dir: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    );

    let source = read_to_string(input_path).context("Failed to open input test data file")?;
    let expected = read_to_string(output_dir.join(test_name.with_extension("txt")))
        .context("Failed to open output test data file")?;

    Ok(TestCase {
        name: test_name.to_string_lossy().into_owned(),
        source,
        expected,
    })
}
