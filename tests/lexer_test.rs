use color_eyre::eyre::{Context, Result};
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use monkey::lexer::{
    formatter::{BasicFormatter, LineFormatter, ToFormatter, TokenFormatter},
    scan, Lexer, Token, TokenKind,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let scanner = Lexer::new(input);
    let formatter: BasicFormatter = scanner.create_formatter();
    let mut buffer = String::new();
    for token in scanner {
        buffer.push_str(&formatter.format(&token));
        buffer.push('\n');
    }

    assert_eq!(
        buffer.trim_end(),
        expected.trim_end(),
        "Failed the test {test_name}"
    );
}

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input).map(|token| token.kind).collect()
}

#[test]
fn smoke_test() {
    check("", "EOF", "smoke");
}

#[test]
fn test_let_statement_tokens() {
    let tokens: Vec<Token> = Lexer::new("let x = 5 + 10;").collect();
    let expected = [
        (TokenKind::KeywordLet, "let"),
        (TokenKind::Ident, "x"),
        (TokenKind::Assign, "="),
        (TokenKind::IntegerLiteral, "5"),
        (TokenKind::Plus, "+"),
        (TokenKind::IntegerLiteral, "10"),
        (TokenKind::Semicolon, ";"),
        (TokenKind::Eof, ""),
    ];
    assert_eq!(tokens.len(), expected.len());
    for (token, (kind, literal)) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
        assert_eq!(token.literal, literal);
    }
}

#[test]
fn test_two_character_operators() {
    assert_eq!(
        kinds("== != = ! =="),
        vec![
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Assign,
            TokenKind::Bang,
            TokenKind::EqualEqual,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("=!"),
        vec![TokenKind::Assign, TokenKind::Bang, TokenKind::Eof]
    );
}

#[test]
fn test_identifiers_stop_at_digits() {
    let tokens: Vec<Token> = Lexer::new("x1").collect();
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].literal, "x");
    assert_eq!(tokens[1].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[1].literal, "1");
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(
        kinds("fn Fn LET let"),
        vec![
            TokenKind::KeywordFn,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::KeywordLet,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_literal_excludes_quotes() {
    let tokens: Vec<Token> = Lexer::new("\"hello world\" \"\"").collect();
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].literal, "hello world");
    assert_eq!(tokens[0].span.range(), 0..13);
    assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[1].literal, "");
}

#[test]
fn test_unknown_character_is_illegal() {
    let tokens: Vec<Token> = Lexer::new("5 $ é").collect();
    assert_eq!(tokens[1].kind, TokenKind::Illegal);
    assert_eq!(tokens[1].literal, "$");
    // Non-ASCII letters are identifier characters.
    assert_eq!(tokens[2].kind, TokenKind::Ident);
    assert_eq!(tokens[2].literal, "é");
}

#[test]
fn test_scan_at_end_is_stable() {
    let source = "let   ";
    let (token, offset) = scan(source, 3);
    assert_eq!(token.kind, TokenKind::Eof);
    assert_eq!(offset, source.len());
    let (again, next_offset) = scan(source, offset);
    assert_eq!(again, token);
    assert_eq!(next_offset, offset);
    // Offsets past the end behave like the end.
    assert_eq!(scan(source, 100).0.kind, TokenKind::Eof);
}

#[test]
fn test_lexer_stops_after_eof() {
    let mut scanner = Lexer::new("1");
    assert!(scanner.next_token().is_some());
    assert!(scanner.has_more());
    assert_eq!(
        scanner.next_token().map(|token| token.kind),
        Some(TokenKind::Eof)
    );
    assert!(!scanner.has_more());
    assert_eq!(scanner.next_token(), None);
}

#[test]
fn test_line_formatter() {
    let source = "let a = 1;\nlet b = 2;";
    let scanner = Lexer::new(source);
    let formatter: LineFormatter = scanner.create_formatter();
    let lines: Vec<String> = scanner.map(|token| formatter.format(&token)).collect();
    assert_eq!(lines[0], "[line 1] LET let");
    assert_eq!(lines[5], "[line 2] LET let");
    assert_eq!(lines.last().map(String::as_str), Some("[line 2] EOF"));
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/lexer/in");
    let output_dir = Path::new("./test_data/lexer/out");

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

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one lexer test case failed.");

    Ok(())
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just(",".to_string()),
        Just(":".to_string()),
        Just(";".to_string()),
        Just("-".to_string()),
        Just("+".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("!".to_string()),
        Just("!=".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
    ]
}

fn integer_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,18}".prop_map(|s| s)
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z_]*".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("fn".to_string()),
        Just("let".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("if".to_string()),
        Just("else".to_string()),
        Just("return".to_string()),
    ]
}

fn token_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            integer_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens(input in token_sequence_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let tokens: Vec<Token> = Lexer::new(&input).collect();
        prop_assert_eq!(tokens.len(), expected_num_tokens);
        for token in &tokens {
            prop_assert_ne!(token.kind, TokenKind::Illegal);
        }
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn integer_literals_keep_their_text(input in integer_literal_strategy()) {
        let tokens: Vec<Token> = Lexer::new(&input).collect();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
        prop_assert_eq!(tokens[0].literal.as_str(), input.as_str());
    }

    #[test]
    fn scanning_is_deterministic(input in token_sequence_strategy(), offset in 0usize..200) {
        let input = input.join(" ");
        // Only char boundaries are meaningful resume points.
        let offset = (0..=offset.min(input.len()))
            .rev()
            .find(|index| input.is_char_boundary(*index))
            .unwrap_or(0);
        prop_assert_eq!(scan(&input, offset), scan(&input, offset));
    }
}
