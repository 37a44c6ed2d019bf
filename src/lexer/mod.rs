pub mod formatter;
mod token;

use std::{ops::Range, rc::Rc};
pub use token::{Span, SpanIndex, SpanLength, Token, TokenKind, KEYWORD_HASHMAP};

#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<SpanIndex>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let line_breaks = if !text.is_empty() {
            let mut line_breaks = Vec::new();
            let mut cursor: SpanIndex = 0.into();
            for (offset, byte) in text.bytes().enumerate() {
                let offset = (offset + 1).into();
                if byte == b'\n' {
                    line_breaks.push(cursor..offset);
                    cursor = offset;
                }
            }
            if !text.ends_with('\n') {
                line_breaks.push(cursor..(text.len() + 1).into());
            }
            line_breaks
        } else {
            vec![0.into()..1.into()]
        };
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        (self.line_breaks.len() + 1) as u32
    }

    pub fn get_line(&self, offset: SpanIndex) -> u32 {
        self.line_breaks
            .binary_search_by(|r| {
                if offset < r.start {
                    std::cmp::Ordering::Greater
                } else if offset >= r.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|v| (v + 1) as u32)
            .unwrap_or(self.get_max_line())
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Scans the token that starts at or after `offset` and returns it together with the offset
/// to resume scanning from.
///
/// Scanning is stateless: the same `(source, offset)` pair always produces the same result.
/// At the end of the input the canonical `Eof` token is returned and the offset stays put.
/// An offset past the end of `source` (or inside a multi-byte character) is treated as the end.
pub fn scan(source: &str, offset: usize) -> (Token, usize) {
    let rest = source.get(offset..).unwrap_or("");
    let start = offset.min(source.len()) + (rest.len() - rest.trim_start().len());
    let mut chars = rest.trim_start().chars();

    let Some(c) = chars.next() else {
        let end = start;
        return (Token::new(TokenKind::Eof, "", Span::new(start, end)), end);
    };
    let lookahead = chars.next();

    let emit = |kind: TokenKind, end: usize| {
        let token = Token::new(kind, &source[start..end], Span::new(start, end));
        (token, end)
    };
    let just = |kind: TokenKind| emit(kind, start + c.len_utf8());
    let take_while = |predicate: fn(char) -> bool| {
        source[start..]
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map(|(index, _)| start + index)
            .unwrap_or(source.len())
    };

    match c {
        // Single character tokens
        ';' => just(TokenKind::Semicolon),
        ',' => just(TokenKind::Comma),
        ':' => just(TokenKind::Colon),
        '(' => just(TokenKind::LeftParenthesis),
        ')' => just(TokenKind::RightParenthesis),
        '[' => just(TokenKind::LeftBracket),
        ']' => just(TokenKind::RightBracket),
        '{' => just(TokenKind::LeftBrace),
        '}' => just(TokenKind::RightBrace),
        '+' => just(TokenKind::Plus),
        '-' => just(TokenKind::Minus),
        '*' => just(TokenKind::Star),
        '/' => just(TokenKind::Slash),
        '<' => just(TokenKind::LessThan),
        '>' => just(TokenKind::GreaterThan),
        // One character lookahead
        '=' => match lookahead {
            Some('=') => emit(TokenKind::EqualEqual, start + 2),
            _ => just(TokenKind::Assign),
        },
        '!' => match lookahead {
            Some('=') => emit(TokenKind::BangEqual, start + 2),
            _ => just(TokenKind::Bang),
        },
        // String literal, no escapes. Unterminated strings run to the end of the input.
        '"' => {
            let content_start = start + 1;
            let (content_end, end) = match source[content_start..].find('"') {
                Some(index) => (content_start + index, content_start + index + 1),
                None => (source.len(), source.len()),
            };
            let token = Token::new(
                TokenKind::StringLiteral,
                &source[content_start..content_end],
                Span::new(start, end),
            );
            (token, end)
        }
        // Identifier/keyword token
        c if is_identifier_char(c) => {
            let end = take_while(is_identifier_char);
            let lexeme = &source[start..end];
            let kind = KEYWORD_HASHMAP
                .get(lexeme)
                .copied()
                .unwrap_or(TokenKind::Ident);
            emit(kind, end)
        }
        c if is_digit(c) => emit(TokenKind::IntegerLiteral, take_while(is_digit)),
        _ => just(TokenKind::Illegal),
    }
}

/// Iterates over the tokens of a source text.
///
/// The final item is always a single `Eof` token; only after it has been produced does the
/// iterator report that no tokens remain.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            finished: false,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        LineBreaks::new(self.source)
    }

    /// Whether the lexer still has tokens to hand out, the `Eof` sentinel included.
    pub fn has_more(&self) -> bool {
        !self.finished
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let (token, offset) = scan(self.source, self.offset);
        self.offset = offset;
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
