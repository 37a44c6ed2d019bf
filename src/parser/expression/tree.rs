use super::{InfixOperator, PrefixOperator};
use crate::{
    lexer::{Span, Token},
    parser::statement::BlockStatement,
    string::{Ident, IdentName},
};
use compact_str::CompactString;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionAtomKind {
    Integer(i64),
    Bool(bool),
    Identifier(IdentName),
    StringLiteral(CompactString),
}

/// Parameters and body of a `fn` literal. Shared with every function value created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Ident>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Atom(ExpressionAtomKind),
    Array {
        elements: Vec<Expression>,
    },
    Map {
        pairs: Vec<(Expression, Expression)>,
    },
    Prefix {
        operator: PrefixOperator,
        rhs: Box<Expression>,
    },
    Infix {
        operator: InfixOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function(Rc<FunctionLiteral>),
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        collection: Box<Expression>,
        index: Box<Expression>,
    },
}

/// An expression together with the token it was parsed from.
///
/// Operator nodes keep the operator token, literals keep their own token and compound
/// literals keep their opening delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub node: ExpressionNode,
    pub token: Token,
}

impl Expression {
    pub fn new(node: ExpressionNode, token: Token) -> Self {
        Self { node, token }
    }

    pub fn get_span(&self) -> Span {
        self.token.span
    }
}
