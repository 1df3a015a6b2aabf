//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The parser takes lexed tokens and builds the parse tree.

use crate::common::*;
use crate::error::Error;
use crate::lexer::{LexedToken, Token};

use std::collections::VecDeque;

pub fn parse(
	tokens: Vec<LexedToken>,
	source_filename: &str,
) -> Result<Program, Error>
{
	let mut statements = Vec::new();

	let mut tokens = Tokens::new(tokens, source_filename);
	while !tokens.is_empty()
	{
		let statement = parse_statement(&mut tokens)?;
		statements.push(statement);
	}

	Ok(Program { statements })
}

struct Tokens
{
	tokens: VecDeque<LexedToken>,
	last_location: Location,
	reserved_token: Option<Token>,
}

impl Tokens
{
	fn new(tokens: Vec<LexedToken>, source_filename: &str) -> Tokens
	{
		let last_location = match tokens.first()
		{
			Some(LexedToken {
				result: _,
				location,
			}) => location.clone(),
			None => Location {
				source_filename: source_filename.to_string(),
				span: 0..0,
				line_number: 1,
				line_offset: 1,
			},
		};
		Tokens {
			tokens: VecDeque::from(tokens),
			last_location,
			reserved_token: None,
		}
	}

	fn is_empty(&self) -> bool
	{
		self.tokens.is_empty()
	}

	fn pop_front(&mut self) -> Option<LexedToken>
	{
		let popped = self.tokens.pop_front();
		if let Some(LexedToken {
			result: _,
			location,
		}) = &popped
		{
			self.last_location = location.clone();
		}
		popped
	}

	fn start_location_span(&self) -> Option<Location>
	{
		match self.tokens.front()
		{
			Some(LexedToken {
				result: _,
				location,
			}) => Some(location.clone()),
			None => None,
		}
	}

	fn location_of_span(&self, start: Option<Location>) -> Location
	{
		match start
		{
			Some(location) => location.combined_with(&self.last_location),
			None => self.last_location.clone(),
		}
	}

	/// Hide the given token from lookahead until the reservation is dropped,
	/// or lift any existing reservation when given `None`.
	fn with_reservation(&mut self, token: Option<Token>) -> TokenReservation<'_>
	{
		let previous = std::mem::replace(&mut self.reserved_token, token);
		TokenReservation {
			tokens: self,
			previous,
		}
	}
}

struct TokenReservation<'a>
{
	tokens: &'a mut Tokens,
	previous: Option<Token>,
}

impl<'a> AsMut<Tokens> for TokenReservation<'a>
{
	fn as_mut(&mut self) -> &mut Tokens
	{
		self.tokens
	}
}

impl<'a> Drop for TokenReservation<'a>
{
	fn drop(&mut self)
	{
		self.tokens.reserved_token = self.previous.take();
	}
}

fn peek(tokens: &mut Tokens) -> Option<&Token>
{
	peek_nth(0, tokens)
}

fn peek_second(tokens: &mut Tokens) -> Option<&Token>
{
	peek_nth(1, tokens)
}

fn peek_nth(n: usize, tokens: &mut Tokens) -> Option<&Token>
{
	match tokens.tokens.get(n)
	{
		Some(LexedToken {
			result: Ok(token),
			location: _,
		}) => match &tokens.reserved_token
		{
			Some(x) if x == token => None,
			Some(_) => Some(token),
			None => Some(token),
		},
		Some(LexedToken {
			result: Err(_),
			location: _,
		}) => None,
		None => None,
	}
}

fn consume(
	expected_token: Token,
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<(), Error>
{
	match tokens.pop_front()
	{
		Some(LexedToken {
			result: Ok(token),
			location: _,
		}) if token == expected_token => Ok(()),
		Some(LexedToken {
			result: Ok(_),
			location,
		}) => Err(Error::UnexpectedToken {
			expectation: expectation.to_string(),
			location,
		}),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			expectation: expectation.to_string(),
			location,
		}),
		None => Err(Error::UnexpectedEndOfFile {
			expectation: expectation.to_string(),
			last_location: tokens.last_location.clone(),
		}),
	}
}

fn extract_identifier(
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<Identifier, Error>
{
	match extract(expectation, tokens)?
	{
		(Token::Identifier(name), location) => Ok(Identifier { name, location }),
		(_, location) => Err(Error::UnexpectedToken {
			expectation: expectation.to_string(),
			location,
		}),
	}
}

fn extract(
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<(Token, Location), Error>
{
	match tokens.pop_front()
	{
		Some(LexedToken {
			result: Ok(token),
			location,
		}) => Ok((token, location)),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			expectation: expectation.to_string(),
			location,
		}),
		None => Err(Error::UnexpectedEndOfFile {
			expectation: expectation.to_string(),
			last_location: tokens.last_location.clone(),
		}),
	}
}

fn can_start_expression(token: &Token) -> bool
{
	match token
	{
		Token::Numeral(_) => true,
		Token::StringLiteral(_) => true,
		Token::Bool(_) => true,
		Token::Identifier(_) => true,
		Token::ParenLeft => true,
		Token::BracketLeft => true,
		Token::Minus => true,
		Token::Exclamation => true,
		_ => false,
	}
}

fn parse_statement(tokens: &mut Tokens) -> Result<Statement, Error>
{
	let start = tokens.start_location_span();
	match peek(tokens)
	{
		Some(Token::Speak) =>
		{
			tokens.pop_front();
			let argument = parse_expression(tokens)?;
			consume(Token::Semicolon, "expected semicolon", tokens)?;
			let location = tokens.location_of_span(start);
			Ok(Statement::Print { argument, location })
		}
		Some(Token::Pencil) =>
		{
			let declaration = parse_declaration(tokens)?;
			Ok(Statement::Declaration(declaration))
		}
		Some(Token::If) => parse_if_statement(tokens),
		Some(Token::While) =>
		{
			tokens.pop_front();
			let test = parse_test(tokens)?;
			consume(Token::Colon, "expected colon", tokens)?;
			let body = parse_body(tokens)?;
			consume(Token::Stop, "expected 'stop'", tokens)?;
			let location = tokens.location_of_span(start);
			Ok(Statement::While {
				test,
				body,
				location,
			})
		}
		Some(Token::For) =>
		{
			tokens.pop_front();
			let declaration = parse_declaration(tokens)?;
			consume(Token::Stop, "expected 'stop'", tokens)?;
			let test = parse_expression(tokens)?;
			consume(Token::Fastfwd, "expected 'fastfwd'", tokens)?;
			let increment = parse_assignment(tokens)?;
			let body = parse_body(tokens)?;
			consume(Token::Stop, "expected 'stop'", tokens)?;
			let location = tokens.location_of_span(start);
			Ok(Statement::For {
				declaration,
				test,
				increment,
				body,
				location,
			})
		}
		Some(Token::Function) =>
		{
			tokens.pop_front();
			let name = extract_identifier("expected function name", tokens)?;
			let mut parameters = Vec::new();
			if let Some(Token::Identifier(_)) = peek(tokens)
			{
				loop
				{
					let parameter =
						extract_identifier("expected parameter name", tokens)?;
					parameters.push(parameter);

					if let Some(Token::Comma) = peek(tokens)
					{
						tokens.pop_front();
					}
					else
					{
						break;
					}
				}
			}
			consume(Token::Colon, "expected colon", tokens)?;
			let body = parse_body(tokens)?;
			consume(Token::Stop, "expected 'stop'", tokens)?;
			let location = tokens.location_of_span(start);
			Ok(Statement::Function {
				name,
				parameters,
				body,
				location,
			})
		}
		Some(Token::Break) =>
		{
			tokens.pop_front();
			consume(Token::Semicolon, "expected semicolon", tokens)?;
			let location = tokens.location_of_span(start);
			Ok(Statement::Break { location })
		}
		Some(Token::Return) =>
		{
			tokens.pop_front();
			if let Some(Token::Semicolon) = peek(tokens)
			{
				tokens.pop_front();
				let location = tokens.location_of_span(start);
				return Ok(Statement::ShortReturn { location });
			}
			let value = parse_expression(tokens)?;
			consume(Token::Semicolon, "expected semicolon", tokens)?;
			let location = tokens.location_of_span(start);
			Ok(Statement::Return { value, location })
		}
		Some(Token::Identifier(_)) => match peek_second(tokens)
		{
			Some(Token::Assignment) =>
			{
				let assignment = parse_assignment(tokens)?;
				Ok(Statement::Assignment(assignment))
			}
			Some(Token::Colon) =>
			{
				let call = parse_call(tokens)?;
				consume(Token::Semicolon, "expected semicolon", tokens)?;
				Ok(Statement::Call(call))
			}
			_ => parse_loop_statement(tokens),
		},
		Some(token) if can_start_expression(token) =>
		{
			parse_loop_statement(tokens)
		}
		_ =>
		{
			let (_, location) = extract("expected statement", tokens)?;
			Err(Error::UnexpectedToken {
				expectation: "expected statement".to_string(),
				location,
			})
		}
	}
}

fn parse_body(tokens: &mut Tokens) -> Result<Vec<Statement>, Error>
{
	let mut statements = Vec::new();
	loop
	{
		if tokens.is_empty()
		{
			break;
		}
		if let Some(Token::Stop) | Some(Token::Else) = peek(tokens)
		{
			break;
		}

		let statement = parse_statement(tokens)?;
		statements.push(statement);
	}
	Ok(statements)
}

fn parse_test(tokens: &mut Tokens) -> Result<Expression, Error>
{
	// The colon after the test opens the body, so it must not be taken as
	// the start of a call expression.
	let mut tokens = tokens.with_reservation(Some(Token::Colon));
	parse_expression(tokens.as_mut())
}

fn parse_if_statement(tokens: &mut Tokens) -> Result<Statement, Error>
{
	let start = tokens.start_location_span();
	consume(Token::If, "expected 'if'", tokens)?;
	let test = parse_test(tokens)?;
	consume(Token::Colon, "expected colon", tokens)?;
	let consequence = parse_body(tokens)?;

	let alternate = if let Some(Token::Else) = peek(tokens)
	{
		tokens.pop_front();
		if let Some(Token::If) = peek(tokens)
		{
			// An else-if chain shares the closing 'stop' of its last link.
			let statement = parse_if_statement(tokens)?;
			Some(Else::If(Box::new(statement)))
		}
		else
		{
			let block = parse_body(tokens)?;
			consume(Token::Stop, "expected 'stop'", tokens)?;
			Some(Else::Block(block))
		}
	}
	else
	{
		consume(Token::Stop, "expected 'stop' or 'else'", tokens)?;
		None
	};

	let location = tokens.location_of_span(start);
	Ok(Statement::If {
		test,
		consequence,
		alternate,
		location,
	})
}

fn parse_loop_statement(tokens: &mut Tokens) -> Result<Statement, Error>
{
	let start = tokens.start_location_span();
	let collection = parse_postfix_expression(tokens)?;
	consume(Token::Dot, "expected statement", tokens)?;
	consume(Token::Loop, "expected 'loop'", tokens)?;
	let iterator = extract_identifier("expected iterator name", tokens)?;
	consume(Token::Colon, "expected colon", tokens)?;
	let body = parse_body(tokens)?;
	consume(Token::Stop, "expected 'stop'", tokens)?;
	let location = tokens.location_of_span(start);
	Ok(Statement::Loop {
		collection,
		iterator,
		body,
		location,
	})
}

fn parse_declaration(tokens: &mut Tokens) -> Result<Declaration, Error>
{
	let start = tokens.start_location_span();
	consume(Token::Pencil, "expected 'pencil'", tokens)?;
	let name = extract_identifier("expected variable name", tokens)?;
	consume(Token::Assignment, "expected assignment", tokens)?;
	let initializer = parse_expression(tokens)?;
	consume(Token::Semicolon, "expected semicolon", tokens)?;
	let location = tokens.location_of_span(start);
	Ok(Declaration {
		name,
		initializer,
		location,
	})
}

fn parse_assignment(tokens: &mut Tokens) -> Result<Assignment, Error>
{
	let start = tokens.start_location_span();
	let target = extract_identifier("expected variable name", tokens)?;
	consume(Token::Assignment, "expected assignment", tokens)?;
	let source = parse_expression(tokens)?;
	consume(Token::Semicolon, "expected semicolon", tokens)?;
	let location = tokens.location_of_span(start);
	Ok(Assignment {
		target,
		source,
		location,
	})
}

fn parse_call(tokens: &mut Tokens) -> Result<Call, Error>
{
	let start = tokens.start_location_span();
	let name = extract_identifier("expected function name", tokens)?;
	consume(Token::Colon, "expected colon", tokens)?;

	let mut arguments = Vec::new();
	if peek(tokens).map_or(false, can_start_expression)
	{
		loop
		{
			let argument = parse_expression(tokens)?;
			arguments.push(argument);

			if let Some(Token::Comma) = peek(tokens)
			{
				tokens.pop_front();
			}
			else
			{
				break;
			}
		}
	}

	let location = tokens.location_of_span(start);
	Ok(Call {
		name,
		arguments,
		location,
	})
}

fn parse_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let consequent = parse_or_expression(tokens)?;
	if let Some(Token::If) = peek(tokens)
	{
		tokens.pop_front();
		let test = parse_or_expression(tokens)?;
		consume(Token::Otherwise, "expected 'otherwise'", tokens)?;
		let alternate = parse_expression(tokens)?;
		let location = consequent.location().combined_with(alternate.location());
		Ok(Expression::Conditional {
			consequent: Box::new(consequent),
			test: Box::new(test),
			alternate: Box::new(alternate),
			location,
		})
	}
	else
	{
		Ok(consequent)
	}
}

fn parse_or_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let mut expression = parse_and_expression(tokens)?;
	while let Some(Token::Or) = peek(tokens)
	{
		tokens.pop_front();
		let right = parse_and_expression(tokens)?;
		expression = make_binary(BinaryOp::Or, expression, right);
	}
	Ok(expression)
}

fn parse_and_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let mut expression = parse_relational_expression(tokens)?;
	while let Some(Token::And) = peek(tokens)
	{
		tokens.pop_front();
		let right = parse_relational_expression(tokens)?;
		expression = make_binary(BinaryOp::And, expression, right);
	}
	Ok(expression)
}

fn parse_relational_expression(
	tokens: &mut Tokens,
) -> Result<Expression, Error>
{
	let left = parse_addition(tokens)?;
	let op = match peek(tokens)
	{
		Some(Token::AngleLeft) => BinaryOp::Less,
		Some(Token::LessEqual) => BinaryOp::LessEqual,
		Some(Token::Equals) => BinaryOp::Equals,
		Some(Token::DoesNotEqual) => BinaryOp::DoesNotEqual,
		Some(Token::GreaterEqual) => BinaryOp::GreaterEqual,
		Some(Token::AngleRight) => BinaryOp::Greater,
		_ => return Ok(left),
	};
	tokens.pop_front();
	let right = parse_addition(tokens)?;
	Ok(make_binary(op, left, right))
}

fn parse_addition(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let mut expression = parse_multiplication(tokens)?;
	loop
	{
		let op = match peek(tokens)
		{
			Some(Token::Plus) => BinaryOp::Add,
			Some(Token::Minus) => BinaryOp::Subtract,
			_ => return Ok(expression),
		};
		tokens.pop_front();
		let right = parse_multiplication(tokens)?;
		expression = make_binary(op, expression, right);
	}
}

fn parse_multiplication(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let mut expression = parse_unary_expression(tokens)?;
	loop
	{
		let op = match peek(tokens)
		{
			Some(Token::Times) => BinaryOp::Multiply,
			Some(Token::Divide) => BinaryOp::Divide,
			Some(Token::Modulo) => BinaryOp::Modulo,
			_ => return Ok(expression),
		};
		tokens.pop_front();
		let right = parse_unary_expression(tokens)?;
		expression = make_binary(op, expression, right);
	}
}

fn make_binary(op: BinaryOp, left: Expression, right: Expression)
	-> Expression
{
	let location = left.location().combined_with(right.location());
	Expression::Binary {
		op,
		left: Box::new(left),
		right: Box::new(right),
		location,
	}
}

fn parse_unary_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let op = match peek(tokens)
	{
		Some(Token::Minus) => UnaryOp::Negative,
		Some(Token::Exclamation) => UnaryOp::Not,
		_ => return parse_power_expression(tokens),
	};
	let start = tokens.start_location_span();
	tokens.pop_front();
	let operand = parse_unary_expression(tokens)?;
	let location = tokens.location_of_span(start);
	Ok(Expression::Unary {
		op,
		operand: Box::new(operand),
		location,
	})
}

fn parse_power_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	let base = parse_postfix_expression(tokens)?;
	if let Some(Token::Power) = peek(tokens)
	{
		tokens.pop_front();
		// Exponentiation is right-associative.
		let exponent = parse_unary_expression(tokens)?;
		Ok(make_binary(BinaryOp::Power, base, exponent))
	}
	else
	{
		Ok(base)
	}
}

fn parse_postfix_expression(tokens: &mut Tokens)
	-> Result<Expression, Error>
{
	let mut expression = parse_primary_expression(tokens)?;
	while let Some(Token::BracketLeft) = peek(tokens)
	{
		tokens.pop_front();
		let index = {
			let mut tokens = tokens.with_reservation(None);
			parse_expression(tokens.as_mut())?
		};
		consume(Token::BracketRight, "expected right bracket", tokens)?;
		let location = expression.location().combined_with(&tokens.last_location);
		expression = Expression::ArrayCall {
			array: Box::new(expression),
			index: Box::new(index),
			location,
		};
	}
	Ok(expression)
}

fn parse_primary_expression(tokens: &mut Tokens) -> Result<Expression, Error>
{
	if let (Some(Token::Identifier(_)), Some(Token::Colon)) =
		(peek(tokens).cloned(), peek_second(tokens))
	{
		let call = parse_call(tokens)?;
		return Ok(Expression::Call(call));
	}

	let (token, location) = extract("expected expression", tokens)?;
	match token
	{
		Token::Numeral(literal) => match literal.parse::<f64>()
		{
			Ok(value) => Ok(Expression::Number {
				value,
				is_fractional: literal.contains('.'),
				location,
			}),
			Err(_) => Err(Error::UnexpectedToken {
				expectation: "expected number".to_string(),
				location,
			}),
		},
		Token::StringLiteral(chars) =>
		{
			Ok(Expression::StringLiteral { chars, location })
		}
		Token::Bool(value) => Ok(Expression::Boolean { value, location }),
		Token::Identifier(name) =>
		{
			Ok(Expression::Variable(Identifier { name, location }))
		}
		Token::ParenLeft =>
		{
			let expression = {
				let mut tokens = tokens.with_reservation(None);
				parse_expression(tokens.as_mut())?
			};
			consume(Token::ParenRight, "expected right parenthesis", tokens)?;
			Ok(expression)
		}
		Token::BracketLeft =>
		{
			let mut tokens = tokens.with_reservation(None);
			parse_rest_of_brackets(location, tokens.as_mut())
		}
		_ => Err(Error::UnexpectedToken {
			expectation: "expected expression".to_string(),
			location,
		}),
	}
}

/// A bracketed single expression is grouping. Arrays need a comma unless
/// they are empty.
fn parse_rest_of_brackets(
	start: Location,
	tokens: &mut Tokens,
) -> Result<Expression, Error>
{
	if let Some(Token::BracketRight) = peek(tokens)
	{
		tokens.pop_front();
		let location = start.combined_with(&tokens.last_location);
		return Ok(Expression::Array {
			elements: Vec::new(),
			location,
		});
	}

	let first = parse_expression(tokens)?;
	if let Some(Token::Comma) = peek(tokens)
	{
		let mut elements = vec![first];
		while let Some(Token::Comma) = peek(tokens)
		{
			tokens.pop_front();
			match peek(tokens)
			{
				Some(Token::BracketRight) => break,
				_ => elements.push(parse_expression(tokens)?),
			}
		}
		consume(Token::BracketRight, "expected right bracket", tokens)?;
		let location = start.combined_with(&tokens.last_location);
		Ok(Expression::Array { elements, location })
	}
	else
	{
		consume(Token::BracketRight, "expected right bracket", tokens)?;
		Ok(first)
	}
}
