use crate::interpreter::SystemContext;
use crate::value::{error::RuntimeErrorKind, NativeFunction, Value, NULL};

static NATIVE_FUNCTIONS: [&'static dyn NativeFunction; 6] = [
    &NativeLen,
    &NativeFirst,
    &NativeLast,
    &NativeRest,
    &NativePush,
    &NativePuts,
];

/// Finds the built-in function with the given name.
pub fn lookup(name: &str) -> Option<&'static dyn NativeFunction> {
    NATIVE_FUNCTIONS
        .iter()
        .find(|function| function.get_name() == name)
        .copied()
}

fn check_arity(arguments: &[Value], expected: usize) -> Result<(), RuntimeErrorKind> {
    if arguments.len() != expected {
        return Err(RuntimeErrorKind::IncorrectNumberOfArgs {
            expected,
            actual: arguments.len(),
        });
    }
    Ok(())
}

fn expect_array(value: &Value) -> Result<&[Value], RuntimeErrorKind> {
    match value {
        Value::Array(elements) => Ok(elements.as_slice()),
        v => Err(RuntimeErrorKind::TypeMismatch {
            expected: "ARRAY",
            actual: v.get_type(),
        }),
    }
}

#[derive(Debug)]
pub struct NativeLen;

impl NativeFunction for NativeLen {
    fn get_name(&self) -> &'static str {
        "len"
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        check_arity(arguments, 1)?;
        let length = match &arguments[0] {
            Value::String(v) => v.chars().count(),
            Value::Array(elements) => elements.len(),
            v => {
                return Err(RuntimeErrorKind::TypeMismatch {
                    expected: "STRING or ARRAY",
                    actual: v.get_type(),
                })
            }
        };
        Ok(Value::Integer(length as i64))
    }
}

#[derive(Debug)]
pub struct NativeFirst;

impl NativeFunction for NativeFirst {
    fn get_name(&self) -> &'static str {
        "first"
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        check_arity(arguments, 1)?;
        let elements = expect_array(&arguments[0])?;
        Ok(elements.first().cloned().unwrap_or(NULL))
    }
}

#[derive(Debug)]
pub struct NativeLast;

impl NativeFunction for NativeLast {
    fn get_name(&self) -> &'static str {
        "last"
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        check_arity(arguments, 1)?;
        let elements = expect_array(&arguments[0])?;
        Ok(elements.last().cloned().unwrap_or(NULL))
    }
}

/// Everything but the first element, as a new array. Null for an empty array.
#[derive(Debug)]
pub struct NativeRest;

impl NativeFunction for NativeRest {
    fn get_name(&self) -> &'static str {
        "rest"
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        check_arity(arguments, 1)?;
        match expect_array(&arguments[0])? {
            [] => Ok(NULL),
            [_, rest @ ..] => Ok(Value::array(rest.to_vec())),
        }
    }
}

/// Appends to a copy of the array. The argument is left untouched.
#[derive(Debug)]
pub struct NativePush;

impl NativeFunction for NativePush {
    fn get_name(&self) -> &'static str {
        "push"
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        check_arity(arguments, 2)?;
        let elements = expect_array(&arguments[0])?;
        let mut pushed = Vec::with_capacity(elements.len() + 1);
        pushed.extend_from_slice(elements);
        pushed.push(arguments[1].clone());
        Ok(Value::array(pushed))
    }
}

#[derive(Debug)]
pub struct NativePuts;

impl NativeFunction for NativePuts {
    fn get_name(&self) -> &'static str {
        "puts"
    }

    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        for argument in arguments {
            context.writeln(&argument.to_string());
        }
        Ok(NULL)
    }
}
