//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Render a resolved program as a numbered node graph, one node per line.
//! Nodes are numbered in pre-order. Entities are listed where they are first
//! encountered and referred to by number afterwards.

use crate::generator::format_number;
use crate::resolved::*;

use std::collections::HashMap;

pub fn graph(program: &Program) -> String
{
	let mut grapher = Grapher {
		lines: Vec::new(),
		next_id: 1,
		entity_ids: HashMap::new(),
		entities: &program.entities,
	};
	grapher.add_node("Program", |grapher| {
		let statements = grapher.statements(&program.statements);
		vec![("statements", statements)]
	});
	grapher.lines.sort_by_key(|(id, _)| *id);
	let lines: Vec<String> =
		grapher.lines.into_iter().map(|(_, line)| line).collect();
	lines.join("\n")
}

type Fields = Vec<(&'static str, String)>;

struct Grapher<'a>
{
	lines: Vec<(usize, String)>,
	next_id: usize,
	entity_ids: HashMap<Entity, usize>,
	entities: &'a Entities,
}

impl<'a> Grapher<'a>
{
	fn add_node(
		&mut self,
		tag: &str,
		fields: impl FnOnce(&mut Self) -> Fields,
	) -> String
	{
		let id = self.next_id;
		self.next_id += 1;
		let fields = fields(self);
		let properties: Vec<String> = fields
			.into_iter()
			.map(|(key, value)| format!("{}={}", key, value))
			.collect();
		let line = format!("{:>4} | {} {}", id, tag, properties.join(" "));
		self.lines.push((id, line.trim_end().to_string()));
		format!("#{}", id)
	}

	fn entity(&mut self, entity: Entity) -> String
	{
		if let Some(id) = self.entity_ids.get(&entity)
		{
			return format!("#{}", id);
		}
		self.entity_ids.insert(entity, self.next_id);
		let entities = self.entities;
		match entity
		{
			Entity::Variable(id) =>
			{
				let variable = &entities[id];
				self.add_node("Variable", |_| {
					vec![
						("name", format!("'{}'", variable.name)),
						("type", variable.value_type.to_string()),
					]
				})
			}
			Entity::Function(id) =>
			{
				let function = &entities[id];
				self.add_node("Function", |grapher| {
					let parameters: Vec<String> = function
						.parameters
						.iter()
						.map(|x| grapher.entity(Entity::Variable(*x)))
						.collect();
					vec![
						("name", format!("'{}'", function.name)),
						("parameters", format!("[{}]", parameters.join(","))),
					]
				})
			}
		}
	}

	fn statements(&mut self, statements: &[Statement]) -> String
	{
		let views: Vec<String> =
			statements.iter().map(|x| self.statement(x)).collect();
		format!("[{}]", views.join(","))
	}

	fn expressions(&mut self, expressions: &[Expression]) -> String
	{
		let views: Vec<String> =
			expressions.iter().map(|x| self.expression(x)).collect();
		format!("[{}]", views.join(","))
	}

	fn declaration(&mut self, declaration: &VariableDeclaration) -> String
	{
		self.add_node("VariableDeclaration", |grapher| {
			vec![
				(
					"variable",
					grapher.entity(Entity::Variable(declaration.variable)),
				),
				("initializer", grapher.expression(&declaration.initializer)),
			]
		})
	}

	fn assignment(&mut self, assignment: &AssignmentStatement) -> String
	{
		self.add_node("AssignmentStatement", |grapher| {
			vec![
				("target", grapher.entity(Entity::Variable(assignment.target))),
				("source", grapher.expression(&assignment.source)),
			]
		})
	}

	fn call(&mut self, call: &Call, value_type: Option<&ValueType>) -> String
	{
		self.add_node("Call", |grapher| {
			let mut fields = vec![
				("callee", grapher.entity(Entity::Function(call.function))),
				("arguments", grapher.expressions(&call.arguments)),
			];
			if let Some(value_type) = value_type
			{
				fields.push(("type", value_type.to_string()));
			}
			fields
		})
	}

	fn statement(&mut self, statement: &Statement) -> String
	{
		match statement
		{
			Statement::Print { argument } =>
			{
				self.add_node("PrintStatement", |grapher| {
					vec![("argument", grapher.expression(argument))]
				})
			}
			Statement::Declaration(declaration) => self.declaration(declaration),
			Statement::Assignment(assignment) => self.assignment(assignment),
			Statement::If {
				test,
				consequence,
				alternate,
			} => self.add_node("IfStatement", |grapher| {
				let mut fields = vec![
					("test", grapher.expression(test)),
					("consequence", grapher.statements(consequence)),
				];
				match alternate
				{
					Some(Alternate::If(statement)) =>
					{
						fields.push(("alternate", grapher.statement(statement)));
					}
					Some(Alternate::Block(block)) =>
					{
						fields.push(("alternate", grapher.statements(block)));
					}
					None => (),
				}
				fields
			}),
			Statement::While { test, body } =>
			{
				self.add_node("WhileStatement", |grapher| {
					vec![
						("test", grapher.expression(test)),
						("body", grapher.statements(body)),
					]
				})
			}
			Statement::For {
				declaration,
				test,
				increment,
				body,
				is_unrolled,
			} => self.add_node("ForStatement", |grapher| {
				vec![
					("declaration", grapher.declaration(declaration)),
					("test", grapher.expression(test)),
					("increment", grapher.assignment(increment)),
					("body", grapher.statements(body)),
					("unrolled", is_unrolled.to_string()),
				]
			}),
			Statement::Loop {
				iterator,
				collection,
				body,
			} => self.add_node("LoopStatement", |grapher| {
				vec![
					("iterator", grapher.entity(Entity::Variable(*iterator))),
					("collection", grapher.expression(collection)),
					("body", grapher.statements(body)),
				]
			}),
			Statement::Function { function, body } =>
			{
				self.add_node("FunctionDeclaration", |grapher| {
					vec![
						("function", grapher.entity(Entity::Function(*function))),
						("body", grapher.statements(body)),
					]
				})
			}
			Statement::Call(call) => self.call(call, None),
			Statement::Break => self.add_node("BreakStatement", |_| Vec::new()),
			Statement::Return(value) =>
			{
				self.add_node("ReturnStatement", |grapher| {
					vec![("expression", grapher.expression(value))]
				})
			}
			Statement::ShortReturn =>
			{
				self.add_node("ShortReturnStatement", |_| Vec::new())
			}
		}
	}

	fn expression(&mut self, expression: &Expression) -> String
	{
		match expression
		{
			Expression::Binary {
				op,
				left,
				right,
				value_type,
			} => self.add_node("BinaryExpression", |grapher| {
				vec![
					("op", format!("'{}'", op.symbol())),
					("left", grapher.expression(left)),
					("right", grapher.expression(right)),
					("type", value_type.to_string()),
				]
			}),
			Expression::Unary {
				op,
				operand,
				value_type,
			} => self.add_node("UnaryExpression", |grapher| {
				vec![
					("op", format!("'{}'", op.symbol())),
					("operand", grapher.expression(operand)),
					("type", value_type.to_string()),
				]
			}),
			Expression::Conditional {
				consequent,
				test,
				alternate,
				value_type,
			} => self.add_node("Conditional", |grapher| {
				vec![
					("consequent", grapher.expression(consequent)),
					("test", grapher.expression(test)),
					("alternate", grapher.expression(alternate)),
					("type", value_type.to_string()),
				]
			}),
			Expression::Number { value, .. } => format_number(*value),
			Expression::Boolean(value) => value.to_string(),
			Expression::StringLiteral(chars) => format!("'{}'", chars),
			Expression::Variable { variable, .. } =>
			{
				self.entity(Entity::Variable(*variable))
			}
			Expression::Array {
				elements,
				value_type,
			} => self.add_node("ArrayExpression", |grapher| {
				vec![
					("elements", grapher.expressions(elements)),
					("type", value_type.to_string()),
				]
			}),
			Expression::ArrayCall {
				array,
				index,
				value_type,
			} => self.add_node("ArrayCall", |grapher| {
				vec![
					("array", grapher.expression(array)),
					("index", grapher.expression(index)),
					("type", value_type.to_string()),
				]
			}),
			Expression::Call { call, value_type } =>
			{
				self.call(call, Some(value_type))
			}
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::analyzer::analyze;
	use crate::lexer::lex;
	use crate::parser::parse;

	use pretty_assertions::assert_eq;

	fn graph_source(source: &str) -> String
	{
		let tokens = lex(source, "test.sq");
		let program = parse(tokens, "test.sq").unwrap();
		let program = analyze(program).unwrap();
		graph(&program)
	}

	#[test]
	fn graph_print_statement()
	{
		assert_eq!(
			graph_source("speak 0;"),
			"   1 | Program statements=[#2]\n   2 | PrintStatement argument=0"
		);
	}

	#[test]
	fn list_entities_once()
	{
		let expected = [
			"   1 | Program statements=[#2,#4]",
			"   2 | VariableDeclaration variable=#3 initializer=0",
			"   3 | Variable name='x' type=int",
			"   4 | AssignmentStatement target=#3 source=#5",
			"   5 | BinaryExpression op='+' left=#3 right=1 type=int",
		]
		.join("\n");
		assert_eq!(graph_source("pencil x = 0; x = x + 1;"), expected);
	}
}
