use super::SystemContext;
use crate::environment::{native, Environment};
use crate::lexer::Span;
use crate::parser::{
    expression::{Expression, ExpressionAtomKind, ExpressionNode},
    statement::{BlockStatement, Statement},
    Program,
};
use crate::value::error::{RuntimeError, RuntimeErrorKind};
use crate::value::{Function, Value, NULL};
use std::{collections::BTreeMap, rc::Rc};

/// Anything that stops evaluation of a statement sequence early.
///
/// `Return` only travels as far as the nearest function call or the program root.
#[derive(Debug)]
enum Interrupt {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

fn fail(kind: RuntimeErrorKind, span: Span) -> Interrupt {
    Interrupt::Error(RuntimeError::new(kind, span))
}

/// Unwraps a return at the top level into the value it carries.
fn finish(result: Result<Value, Interrupt>) -> Result<Value, RuntimeError> {
    match result {
        Ok(value) | Err(Interrupt::Return(value)) => Ok(value),
        Err(Interrupt::Error(error)) => Err(error),
    }
}

/// Evaluates a program against an environment owned by the caller.
pub fn evaluate<C: SystemContext>(
    program: &Program,
    environment: &Environment,
    context: &mut C,
) -> Result<Value, RuntimeError> {
    TreeWalkEvaluator.evaluate_program(program, environment, context)
}

/// An evaluation session. Bindings made by one program are visible to the next.
pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: Environment,
    context: C,
    evaluator: TreeWalkEvaluator,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            environment: Environment::new(),
            context,
            evaluator: TreeWalkEvaluator,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        tracing::debug!(statements = program.statements().len(), "evaluating program");
        let result = self
            .evaluator
            .evaluate_program(program, &self.environment, &mut self.context);
        if let Err(ref error) = result {
            tracing::debug!(%error, code = error.code(), "program failed");
        }
        result
    }

    pub fn get_environment(&self) -> &Environment {
        &self.environment
    }

    pub fn get_context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalkEvaluator;

impl TreeWalkEvaluator {
    /// Runs every statement of the program in order. The value of the last statement is the
    /// value of the program.
    ///
    /// A program that failed to parse is rejected as a whole before any statement runs.
    pub fn evaluate_program<C: SystemContext>(
        &self,
        program: &Program,
        environment: &Environment,
        context: &mut C,
    ) -> Result<Value, RuntimeError> {
        if let Some(first) = program.errors().first() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ParseError(program.errors().to_vec()),
                first.span,
            ));
        }
        finish(self.interpret_statements(program.statements(), environment, context))
    }

    pub fn evaluate_expression<C: SystemContext>(
        &self,
        expr: &Expression,
        environment: &Environment,
        context: &mut C,
    ) -> Result<Value, RuntimeError> {
        finish(self.evaluate(expr, environment, context))
    }
}

// Statement interpreter
impl TreeWalkEvaluator {
    fn interpret_statements<C: SystemContext>(
        &self,
        statements: &[Statement],
        environment: &Environment,
        context: &mut C,
    ) -> Result<Value, Interrupt> {
        let mut result = NULL;
        for statement in statements {
            result = self.interpret_statement(statement, environment, context)?;
        }
        Ok(result)
    }

    fn interpret_statement<C: SystemContext>(
        &self,
        statement: &Statement,
        environment: &Environment,
        context: &mut C,
    ) -> Result<Value, Interrupt> {
        match statement {
            Statement::Let(stmt) => {
                let value = self.evaluate(&stmt.value, environment, context)?;
                environment.declare(stmt.name.name.clone(), value.clone());
                Ok(value)
            }
            Statement::Return(stmt) => {
                let value = match stmt.value {
                    Some(ref expr) => self.evaluate(expr, environment, context)?,
                    None => NULL,
                };
                Err(Interrupt::Return(value))
            }
            Statement::Expression(stmt) => self.evaluate(&stmt.expr, environment, context),
            Statement::Block(block) => self.interpret_block(block, environment, context),
        }
    }

    /// Blocks share the frame they appear in. Only function calls open a new one.
    fn interpret_block<C: SystemContext>(
        &self,
        block: &BlockStatement,
        environment: &Environment,
        context: &mut C,
    ) -> Result<Value, Interrupt> {
        self.interpret_statements(&block.body, environment, context)
    }
}

// Expression evaluator
impl TreeWalkEvaluator {
    fn evaluate<C: SystemContext>(
        &self,
        expr: &Expression,
        environment: &Environment,
        context: &mut C,
    ) -> Result<Value, Interrupt> {
        let span = expr.get_span();
        match &expr.node {
            ExpressionNode::Atom(atom) => self.evaluate_atom(atom, span, environment),
            ExpressionNode::Prefix { operator, rhs } => {
                let rhs = self.evaluate(rhs, environment, context)?;
                rhs.prefix(*operator).map_err(|kind| fail(kind, span))
            }
            ExpressionNode::Infix { operator, lhs, rhs } => {
                let lhs = self.evaluate(lhs, environment, context)?;
                let rhs = self.evaluate(rhs, environment, context)?;
                lhs.infix(*operator, &rhs).map_err(|kind| fail(kind, span))
            }
            ExpressionNode::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.evaluate(condition, environment, context)?;
                if condition.is_truthy() {
                    self.interpret_block(consequence, environment, context)
                } else if let Some(alternative) = alternative {
                    self.interpret_block(alternative, environment, context)
                } else {
                    Ok(NULL)
                }
            }
            ExpressionNode::Function(literal) => Ok(Value::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                closure: environment.clone(),
            }))),
            ExpressionNode::Array { elements } => {
                let elements = self.evaluate_list(elements, environment, context)?;
                Ok(Value::array(elements))
            }
            ExpressionNode::Map { pairs } => {
                let mut map = BTreeMap::new();
                for (key_expr, value_expr) in pairs {
                    let key = self
                        .evaluate(key_expr, environment, context)?
                        .to_hash_key()
                        .map_err(|kind| fail(kind, key_expr.get_span()))?;
                    let value = self.evaluate(value_expr, environment, context)?;
                    map.insert(key, value);
                }
                Ok(Value::Map(Rc::new(map)))
            }
            ExpressionNode::Call { callee, arguments } => {
                let function = self.evaluate(callee, environment, context)?;
                let arguments = self.evaluate_list(arguments, environment, context)?;
                self.apply_function(&function, arguments, span, context)
            }
            ExpressionNode::Index { collection, index } => {
                let collection = self.evaluate(collection, environment, context)?;
                let index = self.evaluate(index, environment, context)?;
                self.evaluate_index(&collection, &index, span)
            }
        }
    }

    fn evaluate_atom(
        &self,
        atom: &ExpressionAtomKind,
        span: Span,
        environment: &Environment,
    ) -> Result<Value, Interrupt> {
        match atom {
            ExpressionAtomKind::Integer(v) => Ok(Value::Integer(*v)),
            ExpressionAtomKind::Bool(v) => Ok(Value::from_bool(*v)),
            ExpressionAtomKind::StringLiteral(v) => Ok(Value::String(v.clone())),
            ExpressionAtomKind::Identifier(name) => environment
                .access(name)
                .or_else(|| native::lookup(name).map(Value::NativeFunction))
                .ok_or_else(|| fail(RuntimeErrorKind::UnknownIdentifier(name.clone()), span)),
        }
    }

    /// Evaluates left to right, stopping at the first failure.
    fn evaluate_list<C: SystemContext>(
        &self,
        exprs: &[Expression],
        environment: &Environment,
        context: &mut C,
    ) -> Result<Vec<Value>, Interrupt> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            values.push(self.evaluate(expr, environment, context)?);
        }
        Ok(values)
    }

    fn evaluate_index(
        &self,
        collection: &Value,
        index: &Value,
        span: Span,
    ) -> Result<Value, Interrupt> {
        match (collection, index) {
            (Value::Array(elements), Value::Integer(index)) => Ok(usize::try_from(*index)
                .ok()
                .and_then(|index| elements.get(index))
                .cloned()
                .unwrap_or(NULL)),
            (Value::Array(_), index) => Err(fail(
                RuntimeErrorKind::TypeMismatch {
                    expected: "INTEGER",
                    actual: index.get_type(),
                },
                span,
            )),
            (Value::Map(pairs), key) => {
                let key = key.to_hash_key().map_err(|kind| fail(kind, span))?;
                Ok(pairs.get(&key).cloned().unwrap_or(NULL))
            }
            (collection, _) => Err(fail(
                RuntimeErrorKind::TypeMismatch {
                    expected: "ARRAY or MAP",
                    actual: collection.get_type(),
                },
                span,
            )),
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(arguments = arguments.len()))]
    fn apply_function<C: SystemContext>(
        &self,
        function: &Value,
        arguments: Vec<Value>,
        span: Span,
        context: &mut C,
    ) -> Result<Value, Interrupt> {
        match function {
            Value::NativeFunction(native) => {
                tracing::trace!(name = native.get_name(), "calling builtin");
                native
                    .call(&arguments, context)
                    .map_err(|kind| fail(kind, span))
            }
            Value::Function(function) => {
                let parameters = &function.literal.parameters;
                if parameters.len() != arguments.len() {
                    return Err(fail(
                        RuntimeErrorKind::IncorrectNumberOfArgs {
                            expected: parameters.len(),
                            actual: arguments.len(),
                        },
                        span,
                    ));
                }
                let scope = function.closure.new_scope();
                for (parameter, argument) in parameters.iter().zip(arguments) {
                    scope.declare(parameter.name.clone(), argument);
                }
                match self.interpret_block(&function.literal.body, &scope, context) {
                    Err(Interrupt::Return(value)) => Ok(value),
                    result => result,
                }
            }
            v => Err(fail(
                RuntimeErrorKind::TypeMismatch {
                    expected: "FUNCTION",
                    actual: v.get_type(),
                },
                span,
            )),
        }
    }
}
