mod operator;
mod tree;

pub use operator::{InfixOperator, PostfixOperator, PrefixOperator};
pub use tree::{Expression, ExpressionAtomKind, ExpressionNode, FunctionLiteral};
