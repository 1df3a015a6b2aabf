//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The parse tree, as delivered by the parser. Every node has a location
//! and identifiers are still plain names.

pub use crate::lexer::Location;

#[derive(Debug, Clone)]
pub struct Program
{
	pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub enum Statement
{
	Print
	{
		argument: Expression,
		location: Location,
	},
	Declaration(Declaration),
	Assignment(Assignment),
	If
	{
		test: Expression,
		consequence: Vec<Statement>,
		alternate: Option<Else>,
		location: Location,
	},
	While
	{
		test: Expression,
		body: Vec<Statement>,
		location: Location,
	},
	For
	{
		declaration: Declaration,
		test: Expression,
		increment: Assignment,
		body: Vec<Statement>,
		location: Location,
	},
	Loop
	{
		collection: Expression,
		iterator: Identifier,
		body: Vec<Statement>,
		location: Location,
	},
	Function
	{
		name: Identifier,
		parameters: Vec<Identifier>,
		body: Vec<Statement>,
		location: Location,
	},
	Call(Call),
	Break
	{
		location: Location,
	},
	Return
	{
		value: Expression,
		location: Location,
	},
	ShortReturn
	{
		location: Location,
	},
}

impl Statement
{
	pub fn location(&self) -> &Location
	{
		match self
		{
			Statement::Print { location, .. } => location,
			Statement::Declaration(declaration) => &declaration.location,
			Statement::Assignment(assignment) => &assignment.location,
			Statement::If { location, .. } => location,
			Statement::While { location, .. } => location,
			Statement::For { location, .. } => location,
			Statement::Loop { location, .. } => location,
			Statement::Function { location, .. } => location,
			Statement::Call(call) => &call.location,
			Statement::Break { location } => location,
			Statement::Return { location, .. } => location,
			Statement::ShortReturn { location } => location,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Declaration
{
	pub name: Identifier,
	pub initializer: Expression,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub struct Assignment
{
	pub target: Identifier,
	pub source: Expression,
	pub location: Location,
}

/// The alternate of a long if statement.
#[derive(Debug, Clone)]
pub enum Else
{
	If(Box<Statement>),
	Block(Vec<Statement>),
}

#[derive(Debug, Clone)]
pub struct Call
{
	pub name: Identifier,
	pub arguments: Vec<Expression>,
	pub location: Location,
}

#[derive(Debug, Clone)]
pub enum Expression
{
	Binary
	{
		op: BinaryOp,
		left: Box<Expression>,
		right: Box<Expression>,
		location: Location,
	},
	Unary
	{
		op: UnaryOp,
		operand: Box<Expression>,
		location: Location,
	},
	Conditional
	{
		consequent: Box<Expression>,
		test: Box<Expression>,
		alternate: Box<Expression>,
		location: Location,
	},
	Number
	{
		value: f64,
		is_fractional: bool,
		location: Location,
	},
	Boolean
	{
		value: bool,
		location: Location,
	},
	StringLiteral
	{
		chars: String,
		location: Location,
	},
	Variable(Identifier),
	Array
	{
		elements: Vec<Expression>,
		location: Location,
	},
	ArrayCall
	{
		array: Box<Expression>,
		index: Box<Expression>,
		location: Location,
	},
	Call(Call),
}

impl Expression
{
	pub fn location(&self) -> &Location
	{
		match self
		{
			Expression::Binary { location, .. } => location,
			Expression::Unary { location, .. } => location,
			Expression::Conditional { location, .. } => location,
			Expression::Number { location, .. } => location,
			Expression::Boolean { location, .. } => location,
			Expression::StringLiteral { location, .. } => location,
			Expression::Variable(identifier) => &identifier.location,
			Expression::Array { location, .. } => location,
			Expression::ArrayCall { location, .. } => location,
			Expression::Call(call) => &call.location,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp
{
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	Power,
	Less,
	LessEqual,
	Equals,
	DoesNotEqual,
	GreaterEqual,
	Greater,
	And,
	Or,
}

impl BinaryOp
{
	pub fn symbol(&self) -> &'static str
	{
		match self
		{
			BinaryOp::Add => "+",
			BinaryOp::Subtract => "-",
			BinaryOp::Multiply => "*",
			BinaryOp::Divide => "/",
			BinaryOp::Modulo => "%",
			BinaryOp::Power => "**",
			BinaryOp::Less => "<",
			BinaryOp::LessEqual => "<=",
			BinaryOp::Equals => "==",
			BinaryOp::DoesNotEqual => "!=",
			BinaryOp::GreaterEqual => ">=",
			BinaryOp::Greater => ">",
			BinaryOp::And => "and",
			BinaryOp::Or => "or",
		}
	}

	pub fn is_relational(&self) -> bool
	{
		match self
		{
			BinaryOp::Less
			| BinaryOp::LessEqual
			| BinaryOp::Equals
			| BinaryOp::DoesNotEqual
			| BinaryOp::GreaterEqual
			| BinaryOp::Greater => true,
			_ => false,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp
{
	Not,
	Negative,
}

impl UnaryOp
{
	pub fn symbol(&self) -> &'static str
	{
		match self
		{
			UnaryOp::Not => "!",
			UnaryOp::Negative => "-",
		}
	}
}

#[derive(Debug, Clone)]
pub struct Identifier
{
	pub name: String,
	pub location: Location,
}
