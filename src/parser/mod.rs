pub mod error;
pub mod expression;
pub mod formatter;
pub mod program;
pub mod statement;

use crate::{
    lexer::{Lexer, Span, Token, TokenKind},
    string::Ident,
};
pub use error::{ParserError, ParserErrorKind};
use expression::{
    Expression, ExpressionAtomKind, ExpressionNode, FunctionLiteral, InfixOperator,
    PostfixOperator, PrefixOperator,
};
pub use program::Program;
use statement::{BlockStatement, ExpressionStatement, LetStatement, ReturnStatement, Statement};
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
enum Operator {
    Infix(InfixOperator),
    Postfix(PostfixOperator),
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Token>,
    /// Braces consumed but not yet closed.
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next_token();
        }
        self.lookahead.as_ref()
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        match token.kind {
            TokenKind::LeftBrace => self.depth += 1,
            TokenKind::RightBrace => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Some(token)
    }

    fn end_of_input(&self) -> Span {
        let end = self.lexer.get_source().len();
        Span::new(end, end)
    }

    /// Builds an error for the upcoming token without consuming it.
    fn unexpected(&mut self, expected: TokenKind) -> ParserError {
        let fallback = self.end_of_input();
        let (actual, span) = match self.peek() {
            Some(token) => (Some(token.kind), token.span),
            None => (None, fallback),
        };
        ParserError {
            kind: ParserErrorKind::UnexpectedToken { expected, actual },
            span,
        }
    }

    /// Consumes the upcoming token if it is of the expected kind. A mismatch is left unconsumed.
    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        if self.peek_kind() != Some(expected) {
            return Err(self.unexpected(expected));
        }
        self.next_token().ok_or_else(|| self.unexpected(expected))
    }

    fn eat_if(&mut self, next: TokenKind) -> Option<Token> {
        if self.peek_kind() == Some(next) {
            self.next_token()
        } else {
            None
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParserError> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: token.literal.as_str().into(),
            span: token.span,
        })
    }
}

// Pratt parser for expressions
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        self.parse_expression_pratt(0)
    }

    fn peek_operator(&mut self) -> Option<Operator> {
        let operator = match self.peek_kind()? {
            TokenKind::Plus => Operator::Infix(InfixOperator::Add),
            TokenKind::Minus => Operator::Infix(InfixOperator::Subtract),
            TokenKind::Star => Operator::Infix(InfixOperator::Multiply),
            TokenKind::Slash => Operator::Infix(InfixOperator::Divide),
            TokenKind::LessThan => Operator::Infix(InfixOperator::LessThan),
            TokenKind::GreaterThan => Operator::Infix(InfixOperator::GreaterThan),
            TokenKind::EqualEqual => Operator::Infix(InfixOperator::EqualEqual),
            TokenKind::BangEqual => Operator::Infix(InfixOperator::BangEqual),
            TokenKind::LeftParenthesis => Operator::Postfix(PostfixOperator::Call),
            TokenKind::LeftBracket => Operator::Postfix(PostfixOperator::Index),
            _ => return None,
        };
        Some(operator)
    }

    /// Dispatches on the prefix rule of the upcoming token. A token without a prefix rule is
    /// reported and left unconsumed.
    fn expect_left_expression(&mut self) -> Result<Expression, ParserError> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.unexpected(TokenKind::Eof));
        };

        let has_prefix_rule = matches!(
            kind,
            TokenKind::Ident
                | TokenKind::IntegerLiteral
                | TokenKind::StringLiteral
                | TokenKind::KeywordTrue
                | TokenKind::KeywordFalse
                | TokenKind::Bang
                | TokenKind::Minus
                | TokenKind::LeftParenthesis
                | TokenKind::KeywordIf
                | TokenKind::KeywordFn
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
        );
        if !has_prefix_rule {
            let span = self.peek().map(|t| t.span).unwrap_or(self.end_of_input());
            return Err(ParserError {
                kind: ParserErrorKind::NonExpression(kind),
                span,
            });
        }
        let Some(token) = self.next_token() else {
            return Err(self.unexpected(kind));
        };

        let node = match token.kind {
            TokenKind::IntegerLiteral => {
                let value = token.literal.parse::<i64>().map_err(|_| ParserError {
                    kind: ParserErrorKind::InvalidInteger(token.literal.clone()),
                    span: token.span,
                })?;
                ExpressionNode::Atom(ExpressionAtomKind::Integer(value))
            }
            TokenKind::Ident => {
                ExpressionNode::Atom(ExpressionAtomKind::Identifier(token.literal.as_str().into()))
            }
            TokenKind::StringLiteral => {
                ExpressionNode::Atom(ExpressionAtomKind::StringLiteral(token.literal.clone()))
            }
            TokenKind::KeywordTrue => ExpressionNode::Atom(ExpressionAtomKind::Bool(true)),
            TokenKind::KeywordFalse => ExpressionNode::Atom(ExpressionAtomKind::Bool(false)),
            // Prefix operators
            TokenKind::Bang | TokenKind::Minus => {
                let operator = if token.kind == TokenKind::Bang {
                    PrefixOperator::Bang
                } else {
                    PrefixOperator::Minus
                };
                let rbp = operator.get_binding_power();
                let rhs = self.parse_expression_pratt(rbp)?;
                ExpressionNode::Prefix {
                    operator,
                    rhs: Box::new(rhs),
                }
            }
            // Bracketed expression
            TokenKind::LeftParenthesis => {
                let inner = self.parse_expression_pratt(0)?;
                self.expect(TokenKind::RightParenthesis)?;
                return Ok(inner);
            }
            TokenKind::KeywordIf => self.parse_if_expression()?,
            TokenKind::KeywordFn => self.parse_function_literal()?,
            TokenKind::LeftBracket => ExpressionNode::Array {
                elements: self.parse_expression_list(TokenKind::RightBracket)?,
            },
            TokenKind::LeftBrace => self.parse_map_literal()?,
            _ => unreachable!("Checked for a prefix rule above."),
        };
        Ok(Expression::new(node, token))
    }

    fn parse_expression_pratt(&mut self, min_bp: u8) -> Result<Expression, ParserError> {
        let mut lhs = self.expect_left_expression()?;

        while let Some(operator) = self.peek_operator() {
            match operator {
                Operator::Infix(operator) => {
                    let (lbp, rbp) = operator.get_binding_power();
                    if lbp < min_bp {
                        break;
                    }
                    let Some(token) = self.next_token() else {
                        break;
                    };
                    let rhs = self.parse_expression_pratt(rbp)?;
                    lhs = Expression::new(
                        ExpressionNode::Infix {
                            operator,
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                        },
                        token,
                    );
                }
                Operator::Postfix(operator) => {
                    if operator.get_binding_power() < min_bp {
                        break;
                    }
                    let Some(token) = self.next_token() else {
                        break;
                    };
                    let node = match operator {
                        PostfixOperator::Call => ExpressionNode::Call {
                            callee: Box::new(lhs),
                            arguments: self.parse_expression_list(TokenKind::RightParenthesis)?,
                        },
                        PostfixOperator::Index => {
                            let index = self.parse_expression_pratt(0)?;
                            self.expect(TokenKind::RightBracket)?;
                            ExpressionNode::Index {
                                collection: Box::new(lhs),
                                index: Box::new(index),
                            }
                        }
                    };
                    lhs = Expression::new(node, token);
                }
            }
        }
        Ok(lhs)
    }

    /// Parses comma separated expressions up to and including `end`. The opening delimiter
    /// has already been consumed.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expression>, ParserError> {
        let mut elements = Vec::new();
        if self.eat_if(end).is_some() {
            return Ok(elements);
        }
        loop {
            elements.push(self.parse_expression_pratt(0)?);
            if self.eat_if(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(end)?;
        Ok(elements)
    }

    fn parse_map_literal(&mut self) -> Result<ExpressionNode, ParserError> {
        let mut pairs = Vec::new();
        if self.eat_if(TokenKind::RightBrace).is_some() {
            return Ok(ExpressionNode::Map { pairs });
        }
        loop {
            let key = self.parse_expression_pratt(0)?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expression_pratt(0)?;
            pairs.push((key, value));
            if self.eat_if(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(ExpressionNode::Map { pairs })
    }

    fn parse_if_expression(&mut self) -> Result<ExpressionNode, ParserError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.parse_expression_pratt(0)?;
        self.expect(TokenKind::RightParenthesis)?;
        let consequence = self.parse_block()?;
        let alternative = match self.eat_if(TokenKind::KeywordElse) {
            Some(_) => Some(self.parse_block()?),
            None => None,
        };
        Ok(ExpressionNode::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Result<ExpressionNode, ParserError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let mut parameters = Vec::new();
        if self.eat_if(TokenKind::RightParenthesis).is_none() {
            loop {
                parameters.push(self.expect_ident()?);
                if self.eat_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RightParenthesis)?;
        }
        let body = self.parse_block()?;
        Ok(ExpressionNode::Function(Rc::new(FunctionLiteral {
            parameters,
            body,
        })))
    }

    /// Parses `{ statements }`. The block also ends at the end of the input.
    fn parse_block(&mut self) -> Result<BlockStatement, ParserError> {
        let token = self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::RightBrace) => {
                    let _ = self.next_token();
                    break;
                }
                Some(TokenKind::Eof) | None => break,
                Some(_) => body.push(self.parse_statement()?),
            }
        }
        Ok(BlockStatement { token, body })
    }
}

// Parse program/statements
impl<'src> Parser<'src> {
    /// Parses statements until the end of the input, collecting every error on the way.
    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while let Some(kind) = self.peek_kind() {
            if kind == TokenKind::Eof {
                break;
            }
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    tracing::debug!(%error, "parse error, skipping to the next statement");
                    errors.push(error);
                    self.synchronize();
                }
            }
        }

        Program::new(statements, errors)
    }

    /// Abandons the top-level statement the error happened in. Skips past the next `;` outside
    /// of any braces, or past the `}` that closes the outermost open brace together with a `;`
    /// right after it. Stops early at the end of the input.
    fn synchronize(&mut self) {
        loop {
            let Some(kind) = self.peek_kind() else {
                return;
            };
            if kind == TokenKind::Eof {
                return;
            }
            let _ = self.next_token();
            match kind {
                TokenKind::Semicolon if self.depth == 0 => return,
                TokenKind::RightBrace if self.depth == 0 => {
                    let _ = self.eat_if(TokenKind::Semicolon);
                    return;
                }
                _ => {}
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        match self.peek_kind() {
            Some(TokenKind::KeywordLet) => self.parse_let_statement().map(Statement::Let),
            Some(TokenKind::KeywordReturn) => self.parse_return_statement().map(Statement::Return),
            _ => self
                .parse_expression_statement()
                .map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Result<LetStatement, ParserError> {
        let token = self.expect(TokenKind::KeywordLet)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        let _ = self.eat_if(TokenKind::Semicolon);
        Ok(LetStatement { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Result<ReturnStatement, ParserError> {
        let token = self.expect(TokenKind::KeywordReturn)?;
        let value = match self.peek_kind() {
            Some(TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof) | None => None,
            Some(_) => Some(self.parse_expression()?),
        };
        let _ = self.eat_if(TokenKind::Semicolon);
        Ok(ReturnStatement { token, value })
    }

    fn parse_expression_statement(&mut self) -> Result<ExpressionStatement, ParserError> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.unexpected(TokenKind::Eof)),
        };
        let expr = self.parse_expression()?;
        let _ = self.eat_if(TokenKind::Semicolon);
        Ok(ExpressionStatement { token, expr })
    }
}
