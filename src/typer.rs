//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Typing rules for operators, tests and collections. Each rule comes in
//! two halves: one that derives the result type, which always succeeds, and
//! one that checks the operands, which function bodies skip.

use crate::error::Error;
use crate::lexer::Location;
use crate::resolved::{BinaryOp, Expression, UnaryOp};
use crate::value_type::ValueType;

pub trait Typed
{
	fn value_type(&self) -> ValueType;
}

impl Typed for Expression
{
	fn value_type(&self) -> ValueType
	{
		match self
		{
			Expression::Binary { value_type, .. } => value_type.clone(),
			Expression::Unary { value_type, .. } => value_type.clone(),
			Expression::Conditional { value_type, .. } => value_type.clone(),
			Expression::Number { value_type, .. } => value_type.clone(),
			Expression::Boolean(_) => ValueType::Boolean,
			Expression::StringLiteral(_) => ValueType::String,
			Expression::Variable { value_type, .. } => value_type.clone(),
			Expression::Array { value_type, .. } => value_type.clone(),
			Expression::ArrayCall { value_type, .. } => value_type.clone(),
			Expression::Call { value_type, .. } => value_type.clone(),
		}
	}
}

pub fn expect_boolean(found: &ValueType, location: &Location)
	-> Result<(), Error>
{
	if found.is_boolean()
	{
		Ok(())
	}
	else
	{
		Err(Error::ExpectedBoolean {
			found: found.clone(),
			location: location.clone(),
		})
	}
}

pub fn expect_number(found: &ValueType, location: &Location)
	-> Result<(), Error>
{
	if found.is_numeric()
	{
		Ok(())
	}
	else
	{
		Err(Error::ExpectedNumber {
			found: found.clone(),
			location: location.clone(),
		})
	}
}

pub fn expect_number_or_string(
	found: &ValueType,
	location: &Location,
) -> Result<(), Error>
{
	if found.is_numeric_or_string()
	{
		Ok(())
	}
	else
	{
		Err(Error::ExpectedNumberOrString {
			found: found.clone(),
			location: location.clone(),
		})
	}
}

pub fn expect_type(
	expected: &ValueType,
	found: &ValueType,
	location: &Location,
) -> Result<(), Error>
{
	if expected.accepts(found)
	{
		Ok(())
	}
	else
	{
		Err(Error::TypeMismatch {
			expected: expected.clone(),
			found: found.clone(),
			location: location.clone(),
		})
	}
}

pub fn unary_type(op: UnaryOp, operand: &ValueType) -> ValueType
{
	match op
	{
		UnaryOp::Not => ValueType::Boolean,
		UnaryOp::Negative => operand.clone(),
	}
}

pub fn check_unary(
	op: UnaryOp,
	operand: &ValueType,
	location: &Location,
) -> Result<(), Error>
{
	match op
	{
		UnaryOp::Not => expect_boolean(operand, location),
		UnaryOp::Negative => expect_number(operand, location),
	}
}

pub fn binary_type(op: BinaryOp, left: &ValueType, right: &ValueType)
	-> ValueType
{
	match op
	{
		BinaryOp::And | BinaryOp::Or => ValueType::Boolean,
		op if op.is_relational() => ValueType::Boolean,
		_ => left.clone().unified_with(right.clone()),
	}
}

pub fn check_binary(
	op: BinaryOp,
	left: (&ValueType, &Location),
	right: (&ValueType, &Location),
) -> Result<(), Error>
{
	let (left_type, left_location) = left;
	let (right_type, right_location) = right;
	match op
	{
		BinaryOp::And | BinaryOp::Or =>
		{
			expect_boolean(left_type, left_location)?;
			expect_boolean(right_type, right_location)
		}
		op if op.is_relational() =>
		{
			expect_type(left_type, right_type, right_location)
		}
		BinaryOp::Add =>
		{
			expect_number_or_string(left_type, left_location)?;
			expect_number_or_string(right_type, right_location)?;
			expect_type(left_type, right_type, right_location)
		}
		_ =>
		{
			expect_number(left_type, left_location)?;
			expect_number(right_type, right_location)?;
			expect_type(left_type, right_type, right_location)
		}
	}
}

/// The type of the iteration variable when looping over a collection.
pub fn iterator_type(
	collection: &ValueType,
	location: &Location,
) -> Result<ValueType, Error>
{
	match collection
	{
		ValueType::Int => Ok(ValueType::Int),
		ValueType::String => Ok(ValueType::String),
		ValueType::Array { element_type } => Ok(element_type.as_ref().clone()),
		ValueType::Any => Ok(ValueType::Any),
		_ => Err(Error::NotIterable {
			found: collection.clone(),
			location: location.clone(),
		}),
	}
}

pub fn element_type(array: &ValueType) -> ValueType
{
	match array
	{
		ValueType::Array { element_type } => element_type.as_ref().clone(),
		_ => ValueType::Any,
	}
}

pub fn check_array_access(
	array: (&ValueType, &Location),
	index: (&ValueType, &Location),
) -> Result<(), Error>
{
	let (array_type, array_location) = array;
	let (index_type, index_location) = index;
	match array_type
	{
		ValueType::Array { .. } | ValueType::Any => (),
		_ =>
		{
			return Err(Error::NotAnArray {
				found: array_type.clone(),
				location: array_location.clone(),
			});
		}
	}
	expect_type(&ValueType::Int, index_type, index_location)
}

#[cfg(test)]
mod tests
{
	use super::*;

	fn location() -> Location
	{
		Location {
			source_filename: "test.sq".to_string(),
			span: 0..1,
			line_number: 1,
			line_offset: 1,
		}
	}

	#[test]
	fn relational_operators_yield_booleans()
	{
		let here = location();
		for op in [BinaryOp::Less, BinaryOp::Equals, BinaryOp::GreaterEqual]
		{
			assert_eq!(
				check_binary(op, (&ValueType::Float, &here), (&ValueType::Float, &here)),
				Ok(())
			);
			assert_eq!(
				binary_type(op, &ValueType::Float, &ValueType::Float),
				ValueType::Boolean
			);
		}
		let error = check_binary(
			BinaryOp::Less,
			(&ValueType::Int, &here),
			(&ValueType::String, &here),
		)
		.unwrap_err();
		assert_eq!(error.code(), 500);
	}

	#[test]
	fn addition_accepts_strings_but_subtraction_does_not()
	{
		let here = location();
		let strings = (&ValueType::String, &here);
		assert_eq!(check_binary(BinaryOp::Add, strings, strings), Ok(()));
		let error =
			check_binary(BinaryOp::Subtract, strings, strings).unwrap_err();
		assert_eq!(error.code(), 502);
		let error = check_binary(
			BinaryOp::Add,
			(&ValueType::Boolean, &here),
			strings,
		)
		.unwrap_err();
		assert_eq!(error.code(), 503);
	}

	#[test]
	fn arithmetic_requires_the_same_numeric_type()
	{
		let here = location();
		let error = check_binary(
			BinaryOp::Multiply,
			(&ValueType::Int, &here),
			(&ValueType::Float, &here),
		)
		.unwrap_err();
		assert_eq!(error.code(), 500);
		assert_eq!(
			binary_type(BinaryOp::Power, &ValueType::Any, &ValueType::Int),
			ValueType::Int
		);
	}

	#[test]
	fn logical_operators_require_booleans()
	{
		let here = location();
		let error = check_binary(
			BinaryOp::And,
			(&ValueType::Boolean, &here),
			(&ValueType::Int, &here),
		)
		.unwrap_err();
		assert_eq!(error.code(), 501);
		assert_eq!(check_unary(UnaryOp::Not, &ValueType::Boolean, &here), Ok(()));
		assert!(check_unary(UnaryOp::Negative, &ValueType::Boolean, &here)
			.is_err());
	}

	#[test]
	fn iterate_over_ints_strings_and_arrays()
	{
		let here = location();
		assert_eq!(iterator_type(&ValueType::Int, &here), Ok(ValueType::Int));
		assert_eq!(
			iterator_type(&ValueType::String, &here),
			Ok(ValueType::String)
		);
		assert_eq!(
			iterator_type(&ValueType::array_of(ValueType::Float), &here),
			Ok(ValueType::Float)
		);
		let error = iterator_type(&ValueType::Boolean, &here).unwrap_err();
		assert_eq!(error.code(), 504);
	}
}
