use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use monkey::interpreter::{context::StdioContext, TreeWalkInterpreter};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const EXIT_PARSE_FAILURE: u8 = 65;
const EXIT_RUNTIME_FAILURE: u8 = 70;
const PROMPT: &str = ">> ";

#[derive(Debug, Parser)]
#[clap(name = "monkey", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: MonkeyCommand,
}

#[derive(Debug, Subcommand)]
pub enum MonkeyCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: ProgramFormat,
    },
    Run {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "pretty")]
        format: ReportFormat,
    },
    Repl,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Basic,
    Pretty,
}

fn main() -> ExitCode {
    monkey_main().expect("Encountered an error!")
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn monkey_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    init_tracing();
    let args = CLArgs::parse();
    let code = match args.routine {
        MonkeyCommand::Tokenize { path, format } => {
            tracing::info!(?path, "tokenizing");
            let src = read_to_string(path)?;
            if tokenize(&src, &format) {
                0
            } else {
                EXIT_PARSE_FAILURE
            }
        }
        MonkeyCommand::Parse { path, format } => {
            tracing::info!(?path, "parsing");
            let src = read_to_string(path)?;
            if parse(&src, &format) {
                0
            } else {
                EXIT_PARSE_FAILURE
            }
        }
        MonkeyCommand::Run { path, format } => {
            tracing::info!(?path, "running");
            let src = read_to_string(&path)?;
            run(&src, &path, &format)
        }
        MonkeyCommand::Repl => repl()?,
    };
    Ok(ExitCode::from(code))
}

fn tokenize(src: &str, format: &TokenFormat) -> bool {
    use monkey::lexer::formatter::{
        BasicFormatter, DebugFormatter, LineFormatter, ToFormatter, TokenFormatter,
    };
    use monkey::lexer::{Lexer, TokenKind};

    let scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&scanner)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&scanner)),
        TokenFormat::Line => Box::new(ToFormatter::<LineFormatter>::create_formatter(&scanner)),
    };
    let mut succeeded = true;
    for token in scanner {
        println!("{}", formatter.format(&token));
        if token.kind == TokenKind::Illegal {
            succeeded = false;
        }
    }
    succeeded
}

fn parse(src: &str, format: &ProgramFormat) -> bool {
    use monkey::parser::formatter::{BasicFormatter, DebugFormatter, ProgramFormatter};

    let formatter: Box<dyn ProgramFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugFormatter),
        ProgramFormat::Basic => Box::new(BasicFormatter::new(src)),
    };
    let (program, _) = monkey::parse(src);
    if program.has_errors() {
        eprint!("{}", formatter.format_errors(&program));
        return false;
    }
    println!("{}", formatter.format(&program));
    true
}

fn run(src: &str, path: &Path, format: &ReportFormat) -> u8 {
    use monkey::parser::formatter::{self as parser_formatter, ProgramFormatter};
    use monkey::value::formatter::{self as value_formatter, ValueFormatter};

    let parse_report: Box<dyn ProgramFormatter + '_>;
    let runtime_report: Box<dyn ValueFormatter + '_>;
    match format {
        ReportFormat::Basic => {
            parse_report = Box::new(parser_formatter::BasicFormatter::new(src));
            runtime_report = Box::new(value_formatter::BasicFormatter::new(src));
        }
        ReportFormat::Pretty => {
            parse_report = Box::new(parser_formatter::PrettyFormatter::new(src, path));
            runtime_report = Box::new(value_formatter::PrettyFormatter::new(src, path));
        }
    }

    let (program, _) = monkey::parse(src);
    if program.has_errors() {
        eprint!("{}", parse_report.format_errors(&program));
        return EXIT_PARSE_FAILURE;
    }
    let mut interpreter = TreeWalkInterpreter::new(StdioContext);
    match interpreter.run(&program) {
        Ok(_) => 0,
        Err(error) => {
            eprintln!("{}", runtime_report.format_error(&error));
            EXIT_RUNTIME_FAILURE
        }
    }
}

/// Reads one line at a time and evaluates it against a session that lives until `exit` or the
/// end of input.
fn repl() -> Result<u8> {
    use monkey::value::formatter::{BasicFormatter, ValueFormatter};

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut interpreter = TreeWalkInterpreter::new(StdioContext);
    let mut line = String::new();
    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end();
        if input == "exit" {
            break;
        }

        let (program, errors) = monkey::parse(input);
        if !errors.is_empty() {
            for error in errors {
                println!("\t{error}");
            }
            continue;
        }
        let formatter = BasicFormatter::new(input);
        match interpreter.run(&program) {
            Ok(value) => println!("{}", formatter.format(&value)),
            Err(error) => println!("{}", formatter.format_error(&error)),
        }
    }
    Ok(0)
}
