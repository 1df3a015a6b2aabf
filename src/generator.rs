//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The generation stage turns the optimized AST into JavaScript.

use crate::resolved::*;

use std::collections::HashMap;

pub fn generate(program: &Program) -> String
{
	let mut generator = Generator {
		lines: Vec::new(),
		names: HashMap::new(),
		entities: &program.entities,
	};
	for statement in &program.statements
	{
		statement.generate(&mut generator);
	}
	generator.lines.join("\n")
}

struct Generator<'a>
{
	lines: Vec<String>,
	names: HashMap<Entity, String>,
	entities: &'a Entities,
}

impl<'a> Generator<'a>
{
	fn emit(&mut self, line: String)
	{
		self.lines.push(line);
	}

	/// Every entity gets a unique name on first encounter, so that two
	/// variables with the same source name never clash.
	fn name(&mut self, entity: Entity) -> String
	{
		if let Some(name) = self.names.get(&entity)
		{
			return name.clone();
		}
		let name = format!(
			"{}_{}",
			self.entities.name_of(entity),
			self.names.len() + 1
		);
		self.names.insert(entity, name.clone());
		name
	}

	fn variable(&mut self, id: VariableId) -> String
	{
		self.name(Entity::Variable(id))
	}

	fn function(&mut self, id: FunctionId) -> String
	{
		self.name(Entity::Function(id))
	}

	fn block(&mut self, statements: &[Statement])
	{
		for statement in statements
		{
			statement.generate(self);
		}
	}

	fn call(&mut self, call: &Call) -> String
	{
		let callee = self.function(call.function);
		let arguments = self.list(&call.arguments);
		format!("{}({})", callee, arguments)
	}

	fn list(&mut self, expressions: &[Expression]) -> String
	{
		let parts: Vec<String> =
			expressions.iter().map(|x| self.top_level(x)).collect();
		parts.join(",")
	}

	/// A conditional is only parenthesized when it is nested.
	fn top_level(&mut self, expression: &Expression) -> String
	{
		match expression
		{
			Expression::Conditional {
				consequent,
				test,
				alternate,
				..
			} => self.conditional(consequent, test, alternate),
			_ => self.expression(expression),
		}
	}

	fn conditional(
		&mut self,
		consequent: &Expression,
		test: &Expression,
		alternate: &Expression,
	) -> String
	{
		let test = self.expression(test);
		let consequent = self.expression(consequent);
		let alternate = self.expression(alternate);
		format!("{} ? {} : {}", test, consequent, alternate)
	}

	fn expression(&mut self, expression: &Expression) -> String
	{
		match expression
		{
			Expression::Binary {
				op, left, right, ..
			} =>
			{
				let left_text = match (op, left.as_number())
				{
					// JavaScript forbids a unary minus directly before `**`.
					(BinaryOp::Power, Some(x)) if x < 0.0 =>
					{
						format!("({})", format_number(x))
					}
					_ => self.expression(left),
				};
				let right_text = self.expression(right);
				format!("({} {} {})", left_text, translate(*op), right_text)
			}
			Expression::Unary { op, operand, .. } =>
			{
				let operand = self.expression(operand);
				format!("({}{})", op.symbol(), operand)
			}
			Expression::Conditional {
				consequent,
				test,
				alternate,
				..
			} =>
			{
				let text = self.conditional(consequent, test, alternate);
				format!("({})", text)
			}
			Expression::Number { value, .. } => format_number(*value),
			Expression::Boolean(value) => value.to_string(),
			Expression::StringLiteral(chars) =>
			{
				format!("\"{}\"", chars.replace('\\', "\\\\"))
			}
			Expression::Variable { variable, .. } => self.variable(*variable),
			Expression::Array { elements, .. } =>
			{
				format!("[{}]", self.list(elements))
			}
			Expression::ArrayCall { array, index, .. } =>
			{
				let array = self.expression(array);
				let index = self.top_level(index);
				format!("{}[{}]", array, index)
			}
			Expression::Call { call, .. } => self.call(call),
		}
	}
}

trait Generatable
{
	fn generate(&self, generator: &mut Generator);
}

impl Generatable for Statement
{
	fn generate(&self, generator: &mut Generator)
	{
		match self
		{
			Statement::Print { argument } =>
			{
				let argument = generator.top_level(argument);
				generator.emit(format!("console.log({});", argument));
			}
			Statement::Declaration(declaration) =>
			{
				declaration.generate(generator);
			}
			Statement::Assignment(assignment) =>
			{
				assignment.generate(generator);
			}
			Statement::If {
				test,
				consequence,
				alternate,
			} =>
			{
				let test = generator.expression(test);
				generator.emit(format!("if ({}) {{", test));
				generator.block(consequence);
				match alternate
				{
					Some(Alternate::If(statement)) =>
					{
						generator.emit("} else".to_string());
						statement.generate(generator);
					}
					Some(Alternate::Block(block)) =>
					{
						generator.emit("} else {".to_string());
						generator.block(block);
						generator.emit("}".to_string());
					}
					None => generator.emit("}".to_string()),
				}
			}
			Statement::While { test, body } =>
			{
				let test = generator.expression(test);
				generator.emit(format!("while ({}) {{", test));
				generator.block(body);
				generator.emit("}".to_string());
			}
			Statement::For {
				declaration,
				test,
				increment,
				body,
				is_unrolled,
			} =>
			{
				declaration.generate(generator);
				if *is_unrolled
				{
					generator.block(body);
				}
				else
				{
					let test = generator.expression(test);
					generator.emit(format!("while ({}) {{", test));
					generator.block(body);
					increment.generate(generator);
					generator.emit("}".to_string());
				}
			}
			Statement::Loop {
				iterator,
				collection,
				body,
			} =>
			{
				let iterator = generator.variable(*iterator);
				let collection = generator.expression(collection);
				generator.emit(format!(
					"for (const {} of {}) {{",
					iterator, collection
				));
				generator.block(body);
				generator.emit("}".to_string());
			}
			Statement::Function { function, body } =>
			{
				let name = generator.function(*function);
				let entities = generator.entities;
				let parameters: Vec<String> = entities[*function]
					.parameters
					.iter()
					.map(|x| generator.variable(*x))
					.collect();
				generator.emit(format!(
					"function {}({}) {{",
					name,
					parameters.join(", ")
				));
				generator.block(body);
				generator.emit("}".to_string());
			}
			Statement::Call(call) =>
			{
				let call = generator.call(call);
				generator.emit(format!("{};", call));
			}
			Statement::Break => generator.emit("break;".to_string()),
			Statement::Return(value) =>
			{
				let value = generator.top_level(value);
				generator.emit(format!("return {};", value));
			}
			Statement::ShortReturn => generator.emit("return;".to_string()),
		}
	}
}

impl Generatable for VariableDeclaration
{
	fn generate(&self, generator: &mut Generator)
	{
		let name = generator.variable(self.variable);
		let initializer = generator.top_level(&self.initializer);
		generator.emit(format!("let {} = {};", name, initializer));
	}
}

impl Generatable for AssignmentStatement
{
	fn generate(&self, generator: &mut Generator)
	{
		let target = generator.variable(self.target);
		let source = generator.top_level(&self.source);
		generator.emit(format!("{} = {};", target, source));
	}
}

fn translate(op: BinaryOp) -> &'static str
{
	match op
	{
		BinaryOp::Equals => "===",
		BinaryOp::DoesNotEqual => "!==",
		BinaryOp::And => "&&",
		BinaryOp::Or => "||",
		op => op.symbol(),
	}
}

/// Format a number the way JavaScript prints it.
pub fn format_number(value: f64) -> String
{
	if value.is_nan()
	{
		"NaN".to_string()
	}
	else if value.is_infinite()
	{
		if value > 0.0
		{
			"Infinity".to_string()
		}
		else
		{
			"-Infinity".to_string()
		}
	}
	else if value == 0.0
	{
		"0".to_string()
	}
	else if value.abs() >= 1e21 || value.abs() < 1e-6
	{
		let text = format!("{:e}", value);
		match text.split_once('e')
		{
			Some((mantissa, exponent)) if !exponent.starts_with('-') =>
			{
				format!("{}e+{}", mantissa, exponent)
			}
			_ => text,
		}
	}
	else if value.fract() == 0.0
	{
		format!("{:.0}", value)
	}
	else
	{
		format!("{}", value)
	}
}
