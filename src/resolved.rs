//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The typed AST shared by the optimizer and the generator. Variables and
//! functions live in an arena owned by the program and are referred to by
//! index from every declaration and use site.

pub use crate::common::{BinaryOp, UnaryOp};
pub use crate::lexer::Location;
pub use crate::value_type::ValueType;

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Program
{
	pub statements: Vec<Statement>,
	pub entities: Entities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity
{
	Variable(VariableId),
	Function(FunctionId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable
{
	pub name: String,
	pub value_type: ValueType,
	pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function
{
	pub name: String,
	pub parameters: Vec<VariableId>,
	pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities
{
	variables: Vec<Variable>,
	functions: Vec<Function>,
}

impl Entities
{
	pub fn add_variable(&mut self, variable: Variable) -> VariableId
	{
		self.variables.push(variable);
		VariableId(self.variables.len() - 1)
	}

	pub fn add_function(&mut self, function: Function) -> FunctionId
	{
		self.functions.push(function);
		FunctionId(self.functions.len() - 1)
	}

	pub fn set_parameters(
		&mut self,
		function: FunctionId,
		parameters: Vec<VariableId>,
	)
	{
		self.functions[function.0].parameters = parameters;
	}

	pub fn name_of(&self, entity: Entity) -> &str
	{
		match entity
		{
			Entity::Variable(id) => &self[id].name,
			Entity::Function(id) => &self[id].name,
		}
	}
}

impl std::ops::Index<VariableId> for Entities
{
	type Output = Variable;

	fn index(&self, id: VariableId) -> &Variable
	{
		&self.variables[id.0]
	}
}

impl std::ops::Index<FunctionId> for Entities
{
	type Output = Function;

	fn index(&self, id: FunctionId) -> &Function
	{
		&self.functions[id.0]
	}
}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Statement
{
	Print
	{
		argument: Expression,
	},
	Declaration(VariableDeclaration),
	Assignment(AssignmentStatement),
	If
	{
		test: Expression,
		consequence: Vec<Statement>,
		alternate: Option<Alternate>,
	},
	While
	{
		test: Expression,
		body: Vec<Statement>,
	},
	For
	{
		declaration: VariableDeclaration,
		test: Expression,
		increment: AssignmentStatement,
		body: Vec<Statement>,
		is_unrolled: bool,
	},
	Loop
	{
		iterator: VariableId,
		collection: Expression,
		body: Vec<Statement>,
	},
	Function
	{
		function: FunctionId,
		body: Vec<Statement>,
	},
	Call(Call),
	Break,
	Return(Expression),
	ShortReturn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration
{
	pub variable: VariableId,
	pub initializer: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement
{
	pub target: VariableId,
	pub source: Expression,
}

/// Either a chained `else if` or a plain `else` block.
#[derive(Debug, Clone, PartialEq)]
pub enum Alternate
{
	If(Box<Statement>),
	Block(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call
{
	pub function: FunctionId,
	pub arguments: Vec<Expression>,
}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Expression
{
	Binary
	{
		op: BinaryOp,
		left: Box<Expression>,
		right: Box<Expression>,
		value_type: ValueType,
	},
	Unary
	{
		op: UnaryOp,
		operand: Box<Expression>,
		value_type: ValueType,
	},
	Conditional
	{
		consequent: Box<Expression>,
		test: Box<Expression>,
		alternate: Box<Expression>,
		value_type: ValueType,
	},
	Number
	{
		value: f64,
		value_type: ValueType,
	},
	Boolean(bool),
	StringLiteral(String),
	Variable
	{
		variable: VariableId,
		value_type: ValueType,
	},
	Array
	{
		elements: Vec<Expression>,
		value_type: ValueType,
	},
	ArrayCall
	{
		array: Box<Expression>,
		index: Box<Expression>,
		value_type: ValueType,
	},
	Call
	{
		call: Call,
		value_type: ValueType,
	},
}

impl Expression
{
	pub fn as_number(&self) -> Option<f64>
	{
		match self
		{
			Expression::Number { value, .. } => Some(*value),
			_ => None,
		}
	}

	pub fn is_number(&self, x: f64) -> bool
	{
		self.as_number() == Some(x)
	}
}
