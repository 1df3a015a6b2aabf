//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The analyzer turns the parse tree into the typed AST. It resolves every
//! name against the scope chain, creates the entities, annotates each
//! expression with its type and validates break and return statements.

use crate::common;
use crate::error::Error;
use crate::resolved::*;
use crate::scoper::Scopes;
use crate::typer;
use crate::typer::Typed;

use log::{debug, trace};

pub fn analyze(program: common::Program) -> Result<Program, Error>
{
	let mut analyzer = Analyzer::default();
	let statements = program.statements.analyze(&mut analyzer)?;
	debug!("analyzed {} top-level statements", statements.len());
	Ok(Program {
		statements,
		entities: analyzer.entities,
	})
}

#[derive(Default)]
struct Analyzer
{
	scopes: Scopes,
	entities: Entities,
}

impl Analyzer
{
	/// Parameters are untyped, so inside function bodies types are derived
	/// but violations are not reported.
	fn check(&self, result: Result<(), Error>) -> Result<(), Error>
	{
		if self.scopes.is_in_function()
		{
			Ok(())
		}
		else
		{
			result
		}
	}

	fn declare_variable(
		&mut self,
		identifier: common::Identifier,
		value_type: ValueType,
	) -> Result<VariableId, Error>
	{
		let id = self.entities.add_variable(Variable {
			name: identifier.name.clone(),
			value_type,
			location: identifier.location.clone(),
		});
		self.scopes.declare(&identifier, Entity::Variable(id))?;
		trace!("declared variable '{}' as {:?}", identifier.name, id);
		Ok(id)
	}

	fn resolve_variable(
		&self,
		identifier: &common::Identifier,
	) -> Result<VariableId, Error>
	{
		match self.scopes.resolve(identifier)?
		{
			Entity::Variable(id) => Ok(id),
			Entity::Function(id) => Err(Error::NotAVariable {
				name: identifier.name.clone(),
				location: identifier.location.clone(),
				location_of_declaration: self.entities[id].location.clone(),
			}),
		}
	}

	fn resolve_function(
		&self,
		identifier: &common::Identifier,
	) -> Result<FunctionId, Error>
	{
		match self.scopes.resolve(identifier)?
		{
			Entity::Function(id) => Ok(id),
			Entity::Variable(id) => Err(Error::NotAFunction {
				name: identifier.name.clone(),
				location: identifier.location.clone(),
				location_of_declaration: self.entities[id].location.clone(),
			}),
		}
	}
}

trait Analyzable
{
	type Item;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>;
}

impl Analyzable for Vec<common::Statement>
{
	type Item = Vec<Statement>;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		self.into_iter().map(|x| x.analyze(analyzer)).collect()
	}
}

impl Analyzable for common::Statement
{
	type Item = Statement;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		match self
		{
			common::Statement::Print { argument, .. } =>
			{
				let argument = argument.analyze(analyzer)?;
				Ok(Statement::Print { argument })
			}
			common::Statement::Declaration(declaration) =>
			{
				let declaration = declaration.analyze(analyzer)?;
				Ok(Statement::Declaration(declaration))
			}
			common::Statement::Assignment(assignment) =>
			{
				let assignment = assignment.analyze(analyzer)?;
				Ok(Statement::Assignment(assignment))
			}
			common::Statement::If {
				test,
				consequence,
				alternate,
				..
			} =>
			{
				let test_location = test.location().clone();
				let test = test.analyze(analyzer)?;
				analyzer.check(typer::expect_boolean(
					&test.value_type(),
					&test_location,
				))?;
				analyzer.scopes.push_block();
				let consequence = consequence.analyze(analyzer)?;
				analyzer.scopes.pop();
				let alternate = match alternate
				{
					Some(common::Else::If(statement)) =>
					{
						let statement = statement.analyze(analyzer)?;
						Some(Alternate::If(Box::new(statement)))
					}
					Some(common::Else::Block(block)) =>
					{
						analyzer.scopes.push_block();
						let block = block.analyze(analyzer)?;
						analyzer.scopes.pop();
						Some(Alternate::Block(block))
					}
					None => None,
				};
				Ok(Statement::If {
					test,
					consequence,
					alternate,
				})
			}
			common::Statement::While { test, body, .. } =>
			{
				let test_location = test.location().clone();
				let test = test.analyze(analyzer)?;
				analyzer.check(typer::expect_boolean(
					&test.value_type(),
					&test_location,
				))?;
				analyzer.scopes.push_loop();
				let body = body.analyze(analyzer)?;
				analyzer.scopes.pop();
				Ok(Statement::While { test, body })
			}
			common::Statement::For {
				declaration,
				test,
				increment,
				body,
				..
			} =>
			{
				// The loop variable is scoped to the loop.
				analyzer.scopes.push_loop();
				let declaration = declaration.analyze(analyzer)?;
				let test_location = test.location().clone();
				let test = test.analyze(analyzer)?;
				analyzer.check(typer::expect_boolean(
					&test.value_type(),
					&test_location,
				))?;
				let increment = increment.analyze(analyzer)?;
				let body = body.analyze(analyzer)?;
				analyzer.scopes.pop();
				Ok(Statement::For {
					declaration,
					test,
					increment,
					body,
					is_unrolled: false,
				})
			}
			common::Statement::Loop {
				collection,
				iterator,
				body,
				..
			} =>
			{
				let collection_location = collection.location().clone();
				let collection = collection.analyze(analyzer)?;
				let iterator_type = match typer::iterator_type(
					&collection.value_type(),
					&collection_location,
				)
				{
					Ok(value_type) => value_type,
					Err(error) =>
					{
						analyzer.check(Err(error))?;
						ValueType::Any
					}
				};
				analyzer.scopes.push_loop();
				let iterator =
					analyzer.declare_variable(iterator, iterator_type)?;
				let body = body.analyze(analyzer)?;
				analyzer.scopes.pop();
				Ok(Statement::Loop {
					iterator,
					collection,
					body,
				})
			}
			common::Statement::Function {
				name,
				parameters,
				body,
				..
			} =>
			{
				let function = analyzer.entities.add_function(Function {
					name: name.name.clone(),
					parameters: Vec::new(),
					location: name.location.clone(),
				});
				// Declare before the body so that the function can recurse.
				analyzer.scopes.declare(&name, Entity::Function(function))?;
				debug!("declared function '{}' as {:?}", name.name, function);

				analyzer.scopes.push_function(function);
				let parameters: Result<Vec<VariableId>, Error> = parameters
					.into_iter()
					.map(|x| analyzer.declare_variable(x, ValueType::Any))
					.collect();
				analyzer.entities.set_parameters(function, parameters?);
				let body = body.analyze(analyzer)?;
				analyzer.scopes.pop();
				Ok(Statement::Function { function, body })
			}
			common::Statement::Call(call) =>
			{
				let call = call.analyze(analyzer)?;
				Ok(Statement::Call(call))
			}
			common::Statement::Break { location } =>
			{
				if analyzer.scopes.is_in_loop()
				{
					Ok(Statement::Break)
				}
				else
				{
					Err(Error::NotInLoop { location })
				}
			}
			common::Statement::Return { value, location } =>
			{
				if !analyzer.scopes.is_in_function()
				{
					return Err(Error::NotInFunction { location });
				}
				let value = value.analyze(analyzer)?;
				Ok(Statement::Return(value))
			}
			common::Statement::ShortReturn { location } =>
			{
				if analyzer.scopes.is_in_function()
				{
					Ok(Statement::ShortReturn)
				}
				else
				{
					Err(Error::NotInFunction { location })
				}
			}
		}
	}
}

impl Analyzable for common::Declaration
{
	type Item = VariableDeclaration;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		// The initializer cannot refer to the variable being declared.
		let initializer = self.initializer.analyze(analyzer)?;
		let value_type = initializer.value_type();
		let variable = analyzer.declare_variable(self.name, value_type)?;
		Ok(VariableDeclaration {
			variable,
			initializer,
		})
	}
}

impl Analyzable for common::Assignment
{
	type Item = AssignmentStatement;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		let target = analyzer.resolve_variable(&self.target)?;
		let source_location = self.source.location().clone();
		let source = self.source.analyze(analyzer)?;
		let expected = analyzer.entities[target].value_type.clone();
		analyzer.check(typer::expect_type(
			&expected,
			&source.value_type(),
			&source_location,
		))?;
		Ok(AssignmentStatement { target, source })
	}
}

impl Analyzable for common::Call
{
	type Item = Call;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		let function = analyzer.resolve_function(&self.name)?;
		let arguments = self.arguments.analyze(analyzer)?;

		let expected = analyzer.entities[function].parameters.len();
		if arguments.len() != expected
		{
			return Err(Error::ArityMismatch {
				name: self.name.name,
				expected,
				found: arguments.len(),
				location: self.location,
				location_of_declaration: analyzer.entities[function]
					.location
					.clone(),
			});
		}

		Ok(Call {
			function,
			arguments,
		})
	}
}

impl Analyzable for Vec<common::Expression>
{
	type Item = Vec<Expression>;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		self.into_iter().map(|x| x.analyze(analyzer)).collect()
	}
}

impl Analyzable for common::Expression
{
	type Item = Expression;

	fn analyze(self, analyzer: &mut Analyzer) -> Result<Self::Item, Error>
	{
		match self
		{
			common::Expression::Binary {
				op, left, right, ..
			} =>
			{
				let left_location = left.location().clone();
				let right_location = right.location().clone();
				let left = left.analyze(analyzer)?;
				let right = right.analyze(analyzer)?;
				let left_type = left.value_type();
				let right_type = right.value_type();
				analyzer.check(typer::check_binary(
					op,
					(&left_type, &left_location),
					(&right_type, &right_location),
				))?;
				let value_type = typer::binary_type(op, &left_type, &right_type);
				Ok(Expression::Binary {
					op,
					left: Box::new(left),
					right: Box::new(right),
					value_type,
				})
			}
			common::Expression::Unary { op, operand, .. } =>
			{
				let operand_location = operand.location().clone();
				let operand = operand.analyze(analyzer)?;
				let operand_type = operand.value_type();
				analyzer.check(typer::check_unary(
					op,
					&operand_type,
					&operand_location,
				))?;
				Ok(Expression::Unary {
					op,
					operand: Box::new(operand),
					value_type: typer::unary_type(op, &operand_type),
				})
			}
			common::Expression::Conditional {
				consequent,
				test,
				alternate,
				..
			} =>
			{
				let consequent = consequent.analyze(analyzer)?;
				let test_location = test.location().clone();
				let test = test.analyze(analyzer)?;
				analyzer.check(typer::expect_boolean(
					&test.value_type(),
					&test_location,
				))?;
				let alternate = alternate.analyze(analyzer)?;
				let value_type = consequent.value_type();
				Ok(Expression::Conditional {
					consequent: Box::new(consequent),
					test: Box::new(test),
					alternate: Box::new(alternate),
					value_type,
				})
			}
			common::Expression::Number {
				value,
				is_fractional,
				..
			} =>
			{
				let value_type = if is_fractional
				{
					ValueType::Float
				}
				else
				{
					ValueType::Int
				};
				Ok(Expression::Number { value, value_type })
			}
			common::Expression::Boolean { value, .. } =>
			{
				Ok(Expression::Boolean(value))
			}
			common::Expression::StringLiteral { chars, .. } =>
			{
				Ok(Expression::StringLiteral(chars))
			}
			common::Expression::Variable(identifier) =>
			{
				let variable = analyzer.resolve_variable(&identifier)?;
				let value_type = analyzer.entities[variable].value_type.clone();
				Ok(Expression::Variable {
					variable,
					value_type,
				})
			}
			common::Expression::Array { elements, .. } =>
			{
				let locations: Vec<Location> =
					elements.iter().map(|x| x.location().clone()).collect();
				let elements = elements.analyze(analyzer)?;
				let element_type = match elements.first()
				{
					Some(first) => first.value_type(),
					None => ValueType::Any,
				};
				for (element, location) in elements.iter().zip(locations.iter())
				{
					analyzer.check(typer::expect_type(
						&element_type,
						&element.value_type(),
						location,
					))?;
				}
				Ok(Expression::Array {
					elements,
					value_type: ValueType::array_of(element_type),
				})
			}
			common::Expression::ArrayCall { array, index, .. } =>
			{
				let array_location = array.location().clone();
				let index_location = index.location().clone();
				let array = array.analyze(analyzer)?;
				let index = index.analyze(analyzer)?;
				let array_type = array.value_type();
				analyzer.check(typer::check_array_access(
					(&array_type, &array_location),
					(&index.value_type(), &index_location),
				))?;
				Ok(Expression::ArrayCall {
					array: Box::new(array),
					index: Box::new(index),
					value_type: typer::element_type(&array_type),
				})
			}
			common::Expression::Call(call) =>
			{
				let call = call.analyze(analyzer)?;
				// Functions do not declare a return type.
				Ok(Expression::Call {
					call,
					value_type: ValueType::Any,
				})
			}
		}
	}
}
