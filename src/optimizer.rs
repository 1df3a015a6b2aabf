//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The optimizer rewrites an analyzed program into an equivalent program
//! that is cheaper to run. Children are optimized before their parent
//! inspects them. Statements may disappear entirely, in which case the
//! surrounding sequence is spliced.

use crate::resolved::*;
use crate::typer::Typed;

use enumset::{EnumSet, EnumSetType};
use log::{debug, trace};
use serde::Deserialize;

#[derive(Debug, EnumSetType, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Pass
{
	Folding,
	Reduction,
	DeadCode,
	Unrolling,
}

pub const DEFAULT_MAX_UNROLL_ITERATIONS: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct Options
{
	pub passes: EnumSet<Pass>,
	pub max_unroll_iterations: usize,
}

impl Default for Options
{
	fn default() -> Options
	{
		Options {
			passes: EnumSet::all(),
			max_unroll_iterations: DEFAULT_MAX_UNROLL_ITERATIONS,
		}
	}
}

pub fn optimize(program: Program, options: &Options) -> Program
{
	debug!("optimizing with passes {:?}", options.passes);
	let optimizer = Optimizer { options };
	let statements = program.statements.optimize(&optimizer);
	Program {
		statements,
		entities: program.entities,
	}
}

struct Optimizer<'a>
{
	options: &'a Options,
}

impl<'a> Optimizer<'a>
{
	fn is_enabled(&self, pass: Pass) -> bool
	{
		self.options.passes.contains(pass)
	}
}

trait Optimizable
{
	type Item;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item;
}

impl Optimizable for Vec<Statement>
{
	type Item = Vec<Statement>;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		self.into_iter().flat_map(|x| x.optimize(optimizer)).collect()
	}
}

impl Optimizable for Statement
{
	type Item = Option<Statement>;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		match self
		{
			Statement::Print { argument } =>
			{
				let argument = argument.optimize(optimizer);
				Some(Statement::Print { argument })
			}
			Statement::Declaration(declaration) =>
			{
				let declaration = declaration.optimize(optimizer);
				Some(Statement::Declaration(declaration))
			}
			Statement::Assignment(AssignmentStatement { target, source }) =>
			{
				let source = source.optimize(optimizer);
				match source
				{
					Expression::Variable { variable, .. }
						if variable == target
							&& optimizer.is_enabled(Pass::DeadCode) =>
					{
						trace!("removed self-assignment to {:?}", target);
						None
					}
					source =>
					{
						let assignment = AssignmentStatement { target, source };
						Some(Statement::Assignment(assignment))
					}
				}
			}
			Statement::If {
				test,
				consequence,
				alternate,
			} =>
			{
				let test = test.optimize(optimizer);
				let consequence = consequence.optimize(optimizer);
				let alternate = match alternate
				{
					Some(Alternate::If(statement)) => statement
						.optimize(optimizer)
						.map(|x| Alternate::If(Box::new(x))),
					Some(Alternate::Block(block)) =>
					{
						Some(Alternate::Block(block.optimize(optimizer)))
					}
					None => None,
				};
				Some(Statement::If {
					test,
					consequence,
					alternate,
				})
			}
			Statement::While { test, body } =>
			{
				let test = test.optimize(optimizer);
				if test == Expression::Boolean(false)
					&& optimizer.is_enabled(Pass::DeadCode)
				{
					trace!("removed while false");
					return None;
				}
				let body = body.optimize(optimizer);
				Some(Statement::While { test, body })
			}
			Statement::For {
				declaration,
				test,
				increment,
				body,
				is_unrolled,
			} =>
			{
				let declaration = declaration.optimize(optimizer);
				let test = test.optimize(optimizer);
				let increment = increment.optimize(optimizer);
				let body = body.optimize(optimizer);
				let unrolled = if optimizer.is_enabled(Pass::Unrolling)
					&& !is_unrolled
				{
					unroll(&declaration, &test, &increment, &body, optimizer)
				}
				else
				{
					None
				};
				match unrolled
				{
					Some(body) => Some(Statement::For {
						declaration,
						test,
						increment,
						body,
						is_unrolled: true,
					}),
					None => Some(Statement::For {
						declaration,
						test,
						increment,
						body,
						is_unrolled,
					}),
				}
			}
			Statement::Loop {
				iterator,
				collection,
				body,
			} =>
			{
				let collection = collection.optimize(optimizer);
				if let Expression::StringLiteral(chars) = &collection
				{
					if chars.is_empty() && optimizer.is_enabled(Pass::DeadCode)
					{
						trace!("removed loop over empty string");
						return None;
					}
				}
				let body = body.optimize(optimizer);
				Some(Statement::Loop {
					iterator,
					collection,
					body,
				})
			}
			Statement::Function { function, body } =>
			{
				let body = body.optimize(optimizer);
				Some(Statement::Function { function, body })
			}
			Statement::Call(call) =>
			{
				Some(Statement::Call(call.optimize(optimizer)))
			}
			Statement::Break => Some(Statement::Break),
			Statement::Return(value) =>
			{
				Some(Statement::Return(value.optimize(optimizer)))
			}
			Statement::ShortReturn => Some(Statement::ShortReturn),
		}
	}
}

impl Optimizable for VariableDeclaration
{
	type Item = VariableDeclaration;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		VariableDeclaration {
			variable: self.variable,
			initializer: self.initializer.optimize(optimizer),
		}
	}
}

impl Optimizable for AssignmentStatement
{
	type Item = AssignmentStatement;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		AssignmentStatement {
			target: self.target,
			source: self.source.optimize(optimizer),
		}
	}
}

impl Optimizable for Call
{
	type Item = Call;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		Call {
			function: self.function,
			arguments: self.arguments.optimize(optimizer),
		}
	}
}

impl Optimizable for Vec<Expression>
{
	type Item = Vec<Expression>;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		self.into_iter().map(|x| x.optimize(optimizer)).collect()
	}
}

impl Optimizable for Expression
{
	type Item = Expression;

	fn optimize(self, optimizer: &Optimizer) -> Self::Item
	{
		match self
		{
			Expression::Binary {
				op,
				left,
				right,
				value_type,
			} =>
			{
				let left = left.optimize(optimizer);
				let right = right.optimize(optimizer);
				if optimizer.is_enabled(Pass::Folding)
				{
					let folded = fold_binary(op, &left, &right, &value_type);
					if let Some(folded) = folded
					{
						return folded;
					}
				}
				if optimizer.is_enabled(Pass::Reduction)
				{
					reduce_binary(op, left, right, value_type)
				}
				else
				{
					Expression::Binary {
						op,
						left: Box::new(left),
						right: Box::new(right),
						value_type,
					}
				}
			}
			Expression::Unary {
				op,
				operand,
				value_type,
			} =>
			{
				let operand = operand.optimize(optimizer);
				match (op, operand)
				{
					(UnaryOp::Negative, Expression::Number { value, .. })
						if optimizer.is_enabled(Pass::Folding) =>
					{
						Expression::Number {
							value: -value,
							value_type,
						}
					}
					(UnaryOp::Not, Expression::Boolean(value))
						if optimizer.is_enabled(Pass::Folding) =>
					{
						Expression::Boolean(!value)
					}
					(op, operand) => Expression::Unary {
						op,
						operand: Box::new(operand),
						value_type,
					},
				}
			}
			Expression::Conditional {
				consequent,
				test,
				alternate,
				value_type,
			} => Expression::Conditional {
				consequent: Box::new(consequent.optimize(optimizer)),
				test: Box::new(test.optimize(optimizer)),
				alternate: Box::new(alternate.optimize(optimizer)),
				value_type,
			},
			Expression::Array {
				elements,
				value_type,
			} => Expression::Array {
				elements: elements.optimize(optimizer),
				value_type,
			},
			Expression::ArrayCall {
				array,
				index,
				value_type,
			} => Expression::ArrayCall {
				array: Box::new(array.optimize(optimizer)),
				index: Box::new(index.optimize(optimizer)),
				value_type,
			},
			Expression::Call { call, value_type } => Expression::Call {
				call: call.optimize(optimizer),
				value_type,
			},
			Expression::Number { .. } => self,
			Expression::Boolean(_) => self,
			Expression::StringLiteral(_) => self,
			Expression::Variable { .. } => self,
		}
	}
}

fn fold_binary(
	op: BinaryOp,
	left: &Expression,
	right: &Expression,
	value_type: &ValueType,
) -> Option<Expression>
{
	match (left, right)
	{
		(
			Expression::Number { value: a, .. },
			Expression::Number { value: b, .. },
		) =>
		{
			if let Some(result) = fold_comparison(op, *a, *b)
			{
				Some(Expression::Boolean(result))
			}
			else
			{
				let value = fold_arithmetic(op, *a, *b)?;
				Some(Expression::Number {
					value,
					value_type: folded_type(value, value_type),
				})
			}
		}
		(Expression::Boolean(a), Expression::Boolean(b)) => match op
		{
			BinaryOp::And => Some(Expression::Boolean(*a && *b)),
			BinaryOp::Or => Some(Expression::Boolean(*a || *b)),
			_ => None,
		},
		_ => None,
	}
}

fn fold_arithmetic(op: BinaryOp, a: f64, b: f64) -> Option<f64>
{
	match op
	{
		BinaryOp::Add => Some(a + b),
		BinaryOp::Subtract => Some(a - b),
		BinaryOp::Multiply => Some(a * b),
		BinaryOp::Divide => Some(a / b),
		BinaryOp::Modulo => Some(a % b),
		BinaryOp::Power => Some(a.powf(b)),
		_ => None,
	}
}

fn fold_comparison(op: BinaryOp, a: f64, b: f64) -> Option<bool>
{
	match op
	{
		BinaryOp::Less => Some(a < b),
		BinaryOp::LessEqual => Some(a <= b),
		BinaryOp::Equals => Some(a == b),
		BinaryOp::DoesNotEqual => Some(a != b),
		BinaryOp::GreaterEqual => Some(a >= b),
		BinaryOp::Greater => Some(a > b),
		_ => None,
	}
}

/// Integer division can produce a fraction.
fn folded_type(value: f64, value_type: &ValueType) -> ValueType
{
	match value_type
	{
		ValueType::Int if value.fract() != 0.0 => ValueType::Float,
		_ => value_type.clone(),
	}
}

fn reduce_binary(
	op: BinaryOp,
	left: Expression,
	right: Expression,
	value_type: ValueType,
) -> Expression
{
	match op
	{
		BinaryOp::Add if right.is_number(0.0) => left,
		BinaryOp::Add if left.is_number(0.0) => right,
		BinaryOp::Subtract if right.is_number(0.0) => left,
		BinaryOp::Subtract if left.is_number(0.0) => Expression::Unary {
			op: UnaryOp::Negative,
			operand: Box::new(right),
			value_type,
		},
		BinaryOp::Multiply if right.is_number(1.0) => left,
		BinaryOp::Multiply if left.is_number(1.0) => right,
		BinaryOp::Multiply if right.is_number(0.0) || left.is_number(0.0) =>
		{
			Expression::Number {
				value: 0.0,
				value_type,
			}
		}
		BinaryOp::Divide if right.is_number(1.0) => left,
		BinaryOp::Divide if left.is_number(0.0) => Expression::Number {
			value: 0.0,
			value_type,
		},
		BinaryOp::Power if left.is_number(1.0) || right.is_number(0.0) =>
		{
			Expression::Number {
				value: 1.0,
				value_type,
			}
		}
		BinaryOp::Or if right == Expression::Boolean(false) => left,
		BinaryOp::Or if left == Expression::Boolean(false) => right,
		_ => Expression::Binary {
			op,
			left: Box::new(left),
			right: Box::new(right),
			value_type,
		},
	}
}

/// Flatten a counted loop of the form
/// `for pencil i = a; stop i < b fastfwd i = i + d;` into its iterations.
fn unroll(
	declaration: &VariableDeclaration,
	test: &Expression,
	increment: &AssignmentStatement,
	body: &[Statement],
	optimizer: &Optimizer,
) -> Option<Vec<Statement>>
{
	let variable = declaration.variable;
	let init = declaration.initializer.as_number()?;
	let bound = match test
	{
		Expression::Binary {
			op: BinaryOp::Less,
			left,
			right,
			..
		} if is_variable(left, variable) => right.as_number()?,
		_ => return None,
	};
	let delta = match &increment.source
	{
		Expression::Binary {
			op: BinaryOp::Add,
			left,
			right,
			..
		} if increment.target == variable && is_variable(left, variable) =>
		{
			right.as_number()?
		}
		_ => return None,
	};
	if !(delta > 0.0)
	{
		return None;
	}
	if !body.iter().all(|x| is_unrollable(x, variable, false))
	{
		return None;
	}

	// The values the loop variable takes, accumulated one increment at a time.
	let max_iterations = optimizer.options.max_unroll_iterations;
	let mut values = Vec::new();
	let mut current = init;
	while current < bound
	{
		if values.len() >= max_iterations
		{
			trace!(
				"not unrolling a loop of more than {} iterations",
				max_iterations
			);
			return None;
		}
		values.push(current);
		current += delta;
	}

	debug!("unrolling loop over {:?} {} times", variable, values.len());
	let value_type = declaration.initializer.value_type();
	let mut unrolled = Vec::new();
	for value in values
	{
		let value = Expression::Number {
			value,
			value_type: value_type.clone(),
		};
		unrolled.push(Statement::Assignment(AssignmentStatement {
			target: variable,
			source: value.clone(),
		}));
		for statement in body
		{
			match statement
			{
				Statement::Assignment(AssignmentStatement { target, source }) =>
				{
					let assignment = AssignmentStatement {
						target: *target,
						source: substitute(source.clone(), variable, &value),
					};
					let statement = Statement::Assignment(assignment);
					unrolled.extend(statement.optimize(optimizer));
				}
				statement => unrolled.push(statement.clone()),
			}
		}
	}
	Some(unrolled)
}

fn is_variable(expression: &Expression, id: VariableId) -> bool
{
	match expression
	{
		Expression::Variable { variable, .. } => *variable == id,
		_ => false,
	}
}

/// Whether the statement can be repeated in a flat sequence with the loop
/// variable assigned explicitly before every repetition.
fn is_unrollable(
	statement: &Statement,
	variable: VariableId,
	is_in_nested_loop: bool,
) -> bool
{
	let all = |statements: &[Statement], is_in_nested_loop: bool| {
		statements
			.iter()
			.all(|x| is_unrollable(x, variable, is_in_nested_loop))
	};
	match statement
	{
		Statement::Print { .. } => true,
		Statement::Call(_) => true,
		Statement::Assignment(assignment) => assignment.target != variable,
		Statement::If {
			consequence,
			alternate,
			..
		} =>
		{
			all(consequence, is_in_nested_loop)
				&& match alternate
				{
					Some(Alternate::If(statement)) =>
					{
						is_unrollable(statement, variable, is_in_nested_loop)
					}
					Some(Alternate::Block(block)) => all(block, is_in_nested_loop),
					None => true,
				}
		}
		Statement::While { body, .. } => all(body, true),
		Statement::Loop { body, .. } => all(body, true),
		Statement::Break => is_in_nested_loop,
		Statement::Declaration(_) => false,
		Statement::For { .. } => false,
		Statement::Function { .. } => false,
		Statement::Return(_) => false,
		Statement::ShortReturn => false,
	}
}

fn substitute(
	expression: Expression,
	id: VariableId,
	value: &Expression,
) -> Expression
{
	let substitute_boxed =
		|x: Box<Expression>| Box::new(substitute(*x, id, value));
	match expression
	{
		Expression::Variable { variable, .. } if variable == id => value.clone(),
		Expression::Binary {
			op,
			left,
			right,
			value_type,
		} => Expression::Binary {
			op,
			left: substitute_boxed(left),
			right: substitute_boxed(right),
			value_type,
		},
		Expression::Unary {
			op,
			operand,
			value_type,
		} => Expression::Unary {
			op,
			operand: substitute_boxed(operand),
			value_type,
		},
		Expression::Conditional {
			consequent,
			test,
			alternate,
			value_type,
		} => Expression::Conditional {
			consequent: substitute_boxed(consequent),
			test: substitute_boxed(test),
			alternate: substitute_boxed(alternate),
			value_type,
		},
		Expression::Array {
			elements,
			value_type,
		} => Expression::Array {
			elements: elements
				.into_iter()
				.map(|x| substitute(x, id, value))
				.collect(),
			value_type,
		},
		Expression::ArrayCall {
			array,
			index,
			value_type,
		} => Expression::ArrayCall {
			array: substitute_boxed(array),
			index: substitute_boxed(index),
			value_type,
		},
		Expression::Call { call, value_type } => Expression::Call {
			call: Call {
				function: call.function,
				arguments: call
					.arguments
					.into_iter()
					.map(|x| substitute(x, id, value))
					.collect(),
			},
			value_type,
		},
		expression => expression,
	}
}
