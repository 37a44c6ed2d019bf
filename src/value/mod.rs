pub mod error;
pub mod formatter;

use crate::{
    environment::Environment,
    interpreter::SystemContext,
    parser::expression::{FunctionLiteral, InfixOperator, PrefixOperator},
};
use compact_str::{format_compact, CompactString};
use error::RuntimeErrorKind;
use std::{collections::BTreeMap, rc::Rc};

pub const TRUE: Value = Value::Bool(true);
pub const FALSE: Value = Value::Bool(false);
pub const NULL: Value = Value::Null;

pub trait NativeFunction: std::fmt::Debug + Send + Sync {
    fn get_name(&self) -> &'static str;
    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind>;
}

/// A user function: the literal it was created from and the environment it was defined in.
#[derive(Clone)]
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub closure: Environment,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The closure may contain this very function.
        f.debug_struct("Function")
            .field("literal", &self.literal)
            .finish_non_exhaustive()
    }
}

/// Runtime type tags, used for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Boolean,
    String,
    Array,
    Map,
    Function,
    Builtin,
    Null,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Integer => "INTEGER",
            ValueType::Boolean => "BOOLEAN",
            ValueType::String => "STRING",
            ValueType::Array => "ARRAY",
            ValueType::Map => "MAP",
            ValueType::Function => "FUNCTION",
            ValueType::Builtin => "BUILTIN",
            ValueType::Null => "NULL",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The values usable as map keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashKey {
    Integer(i64),
    Bool(bool),
    String(CompactString),
}

/// Runtime values. Arrays and maps are never mutated in place; operations that change them
/// build a new value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Bool(bool),
    String(CompactString),
    Array(Rc<Vec<Value>>),
    Map(Rc<BTreeMap<HashKey, Value>>),
    Function(Rc<Function>),
    NativeFunction(&'static dyn NativeFunction),
    Null,
}

impl Value {
    pub fn get_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Bool(_) => ValueType::Boolean,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Map,
            Value::Function(_) => ValueType::Function,
            Value::NativeFunction(_) => ValueType::Builtin,
            Value::Null => ValueType::Null,
        }
    }

    pub fn from_bool(value: bool) -> Value {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(elements))
    }

    pub fn to_hash_key(&self) -> Result<HashKey, RuntimeErrorKind> {
        match self {
            Value::Integer(v) => Ok(HashKey::Integer(*v)),
            Value::Bool(v) => Ok(HashKey::Bool(*v)),
            Value::String(v) => Ok(HashKey::String(v.clone())),
            v => Err(RuntimeErrorKind::TypeMismatch {
                expected: "INTEGER, BOOLEAN or STRING",
                actual: v.get_type(),
            }),
        }
    }
}

// Prefix operators
impl Value {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false) | Value::Null)
    }

    pub fn logical_not(&self) -> Value {
        Value::from_bool(!self.is_truthy())
    }

    pub fn numeric_negate(&self) -> Result<Value, RuntimeErrorKind> {
        match self {
            Value::Integer(v) => Ok(Value::Integer(v.wrapping_neg())),
            v => Err(RuntimeErrorKind::UnknownOperator(format_compact!(
                "{}{}",
                PrefixOperator::Minus,
                v.get_type()
            ))),
        }
    }

    pub fn prefix(&self, operator: PrefixOperator) -> Result<Value, RuntimeErrorKind> {
        match operator {
            PrefixOperator::Bang => Ok(self.logical_not()),
            PrefixOperator::Minus => self.numeric_negate(),
        }
    }
}

// Infix operators
impl Value {
    /// Applies an infix operator.
    ///
    /// Integers support arithmetic and comparison, strings support concatenation only.
    /// Operands with different tags are a type mismatch, and any other pair of values only
    /// supports `==` and `!=`.
    pub fn infix(&self, operator: InfixOperator, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => integer_infix(*lhs, operator, *rhs),
            (Value::String(lhs), Value::String(rhs)) => match operator {
                InfixOperator::Add => Ok(Value::String(format_compact!("{lhs}{rhs}"))),
                _ => Err(unknown_infix(self, operator, other)),
            },
            (lhs, rhs) if lhs.get_type() != rhs.get_type() => Err(RuntimeErrorKind::TypeMismatch {
                expected: lhs.get_type().name(),
                actual: rhs.get_type(),
            }),
            (lhs, rhs) => match operator {
                InfixOperator::EqualEqual => Ok(Value::from_bool(lhs.is_equal(rhs))),
                InfixOperator::BangEqual => Ok(Value::from_bool(!lhs.is_equal(rhs))),
                _ => Err(unknown_infix(self, operator, other)),
            },
        }
    }

    /// Value equality. Functions are equal only to themselves.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs == rhs,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::Null, Value::Null) => true,
            (Value::Array(lhs), Value::Array(rhs)) => {
                lhs.len() == rhs.len() && lhs.iter().zip(rhs.iter()).all(|(l, r)| l.is_equal(r))
            }
            (Value::Map(lhs), Value::Map(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs
                        .iter()
                        .zip(rhs.iter())
                        .all(|((lk, lv), (rk, rv))| lk == rk && lv.is_equal(rv))
            }
            (Value::Function(lhs), Value::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Value::NativeFunction(lhs), Value::NativeFunction(rhs)) => {
                lhs.get_name() == rhs.get_name()
            }
            _ => false,
        }
    }
}

fn unknown_infix(lhs: &Value, operator: InfixOperator, rhs: &Value) -> RuntimeErrorKind {
    RuntimeErrorKind::UnknownOperator(format_compact!(
        "{} {} {}",
        lhs.get_type(),
        operator,
        rhs.get_type()
    ))
}

fn integer_infix(lhs: i64, operator: InfixOperator, rhs: i64) -> Result<Value, RuntimeErrorKind> {
    let value = match operator {
        InfixOperator::Add => Value::Integer(lhs.wrapping_add(rhs)),
        InfixOperator::Subtract => Value::Integer(lhs.wrapping_sub(rhs)),
        InfixOperator::Multiply => Value::Integer(lhs.wrapping_mul(rhs)),
        InfixOperator::Divide => {
            if rhs == 0 {
                return Err(RuntimeErrorKind::UnknownOperator(format_compact!(
                    "{lhs} / 0 (division by zero)"
                )));
            }
            Value::Integer(lhs.wrapping_div(rhs))
        }
        InfixOperator::LessThan => Value::from_bool(lhs < rhs),
        InfixOperator::GreaterThan => Value::from_bool(lhs > rhs),
        InfixOperator::EqualEqual => Value::from_bool(lhs == rhs),
        InfixOperator::BangEqual => Value::from_bool(lhs != rhs),
    };
    Ok(value)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write_nested(f, element)?;
                }
                write!(f, "]")
            }
            Value::Map(pairs) => {
                write!(f, "{{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: ")?;
                    write_nested(f, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => write!(f, "{}", function.literal),
            Value::NativeFunction(_) => write!(f, "builtin function"),
        }
    }
}

impl std::fmt::Display for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashKey::Integer(v) => write!(f, "{v}"),
            HashKey::Bool(v) => write!(f, "{v}"),
            HashKey::String(v) => write!(f, "\"{v}\""),
        }
    }
}

/// Strings inside collections are quoted.
fn write_nested(f: &mut std::fmt::Formatter<'_>, value: &Value) -> std::fmt::Result {
    match value {
        Value::String(v) => write!(f, "\"{v}\""),
        v => write!(f, "{v}"),
    }
}
