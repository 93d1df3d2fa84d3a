use std::collections::HashMap;
use std::rc::Rc;

use compact_str::CompactString;

use super::environment::Environment;
use super::error::{RuntimeError, RuntimeErrorKind};
use super::native::{NativeFunction, NativeOutcome};
use super::value::Value;
use super::SystemContext;
use crate::lexer::Span;
use crate::parser::{
    expression::{BinaryOperator, Expression, ExpressionKind},
    statement::{FunctionDecl, Program, Statement},
};

/// Deepest chain of nested user function calls before giving up.
pub const MAX_CALL_DEPTH: usize = 200;

/// Deepest expression evaluation, counted across calls.
pub const MAX_EVALUATION_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterPhase {
    CollectingDeclarations,
    Executing,
}

/// Why execution stopped early.
#[derive(Debug)]
enum Interrupt {
    Error(RuntimeError),
    Exit(i32),
}

impl From<RuntimeError> for Interrupt {
    fn from(value: RuntimeError) -> Self {
        Self::Error(value)
    }
}

fn runtime_error(kind: RuntimeErrorKind, span: Span, line: u32) -> Interrupt {
    Interrupt::Error(RuntimeError { kind, span, line })
}

pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: Environment,
    functions: HashMap<CompactString, Rc<FunctionDecl>>,
    context: C,
    phase: InterpreterPhase,
    last_value: Option<Value>,
    exit_code: Option<i32>,
    evaluation_depth: usize,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            environment: Environment::new(),
            functions: HashMap::new(),
            context,
            phase: InterpreterPhase::CollectingDeclarations,
            last_value: None,
            exit_code: None,
            evaluation_depth: 0,
        }
    }

    /// Registers every function of `program` and then runs its entry blocks in order.
    ///
    /// Bindings and functions from earlier calls stay visible, which is what
    /// lets a REPL feed one fragment at a time.
    pub fn interpret(&mut self, program: &Program) -> Result<&Environment, RuntimeError> {
        if self.exit_code.is_some() {
            return Ok(&self.environment);
        }

        self.phase = InterpreterPhase::CollectingDeclarations;
        for function in program.functions() {
            // Later declarations win.
            self.functions
                .insert(function.name.clone(), Rc::new(function.clone()));
        }

        self.phase = InterpreterPhase::Executing;
        for entry in program.entry_points() {
            match self.execute_block(&entry.body) {
                Ok(value) => self.last_value = Some(value),
                Err(Interrupt::Exit(code)) => {
                    self.exit_code = Some(code);
                    break;
                }
                Err(Interrupt::Error(error)) => return Err(error),
            }
        }

        Ok(&self.environment)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn phase(&self) -> InterpreterPhase {
        self.phase
    }

    /// Value of the last statement of the most recently completed entry block.
    pub fn last_value(&self) -> Option<&Value> {
        self.last_value.as_ref()
    }

    /// Set once the program has called `exit`.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name).map(Rc::as_ref)
    }
}

// Statement interpreter
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn execute_block(&mut self, statements: &[Statement]) -> Result<Value, Interrupt> {
        let mut result = Value::Nil;
        for statement in statements.iter() {
            result = self.execute_statement(statement)?;
        }
        Ok(result)
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<Value, Interrupt> {
        match statement {
            Statement::Print(stmt) => {
                let value = self.evaluate(&stmt.expr)?;
                let text = value.to_string();
                if stmt.newline {
                    self.context.writeln(&text);
                } else {
                    self.context.write(&text);
                }
                Ok(Value::Nil)
            }
            Statement::Assignment(stmt) => {
                let value = self.evaluate(&stmt.value)?;
                self.environment.assign(&stmt.name, value.clone());
                Ok(value)
            }
            Statement::Call(stmt) => {
                self.call_function(&stmt.name, &stmt.arguments, stmt.span, stmt.line)
            }
        }
    }

    fn call_function(
        &mut self,
        name: &str,
        arguments: &[Expression],
        span: Span,
        line: u32,
    ) -> Result<Value, Interrupt> {
        if let Some(native) = NativeFunction::lookup(name) {
            let mut values = Vec::with_capacity(arguments.len());
            for argument in arguments.iter() {
                values.push(self.evaluate(argument)?);
            }
            return match native
                .call(&values, &mut self.context)
                .map_err(|kind| runtime_error(kind, span, line))?
            {
                NativeOutcome::Value(value) => Ok(value),
                NativeOutcome::Exit(code) => {
                    self.context.exit(code);
                    Err(Interrupt::Exit(code))
                }
            };
        }

        let Some(function) = self.functions.get(name).cloned() else {
            return Err(runtime_error(
                RuntimeErrorKind::UndefinedFunction(name.into()),
                span,
                line,
            ));
        };

        if self.environment.depth() >= MAX_CALL_DEPTH {
            return Err(runtime_error(
                RuntimeErrorKind::CallDepthExceeded(MAX_CALL_DEPTH),
                span,
                line,
            ));
        }

        // Arguments are only evaluated when there is something to bind them to.
        // Counts are not checked: extra arguments are dropped and missing ones
        // leave their parameter unbound.
        let mut values = Vec::new();
        if !arguments.is_empty() && !function.parameters.is_empty() {
            for argument in arguments.iter() {
                values.push(self.evaluate(argument)?);
            }
        }

        self.environment.push_call_frame();
        for (parameter, value) in function.parameters.iter().zip(values) {
            self.environment.assign(parameter, value);
        }
        let result = self.execute_block(&function.body);
        self.environment.pop_call_frame();

        result
    }
}

// Expression evaluator
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn evaluate(&mut self, expr: &Expression) -> Result<Value, Interrupt> {
        if self.evaluation_depth >= MAX_EVALUATION_DEPTH {
            return Err(runtime_error(
                RuntimeErrorKind::EvaluationTooDeep(MAX_EVALUATION_DEPTH),
                expr.span,
                expr.line,
            ));
        }

        self.evaluation_depth += 1;
        let value = self.evaluate_kind(expr);
        self.evaluation_depth -= 1;
        value
    }

    fn evaluate_kind(&mut self, expr: &Expression) -> Result<Value, Interrupt> {
        match &expr.kind {
            ExpressionKind::NumericLiteral(literal) => Ok(Value::from(*literal)),
            ExpressionKind::StringLiteral(text) => Ok(Value::String(text.clone())),
            ExpressionKind::Identifier(name) => match self.environment.access(name) {
                Some(value) => Ok(value.clone()),
                None => Err(runtime_error(
                    RuntimeErrorKind::UndefinedVariable(name.clone()),
                    expr.span,
                    expr.line,
                )),
            },
            ExpressionKind::Binary { operator, lhs, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                let result = match operator {
                    BinaryOperator::Add => lhs.add(&rhs),
                    BinaryOperator::Subtract => lhs.subtract(&rhs),
                    BinaryOperator::Multiply => lhs.multiply(&rhs),
                    BinaryOperator::Divide => lhs.divide(&rhs),
                    operator => Err(RuntimeErrorKind::UnknownOperator(operator.symbol())),
                };
                result.map_err(|kind| runtime_error(kind, expr.span, expr.line))
            }
            ExpressionKind::Call { name, arguments } => {
                self.call_function(name, arguments, expr.span, expr.line)
            }
        }
    }
}
