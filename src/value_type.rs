//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType
{
	Boolean,
	Int,
	Float,
	String,
	Void,
	Any,
	Array
	{
		element_type: Box<ValueType>,
	},
}

impl ValueType
{
	pub fn array_of(element_type: ValueType) -> ValueType
	{
		ValueType::Array {
			element_type: Box::new(element_type),
		}
	}

	pub fn is_numeric(&self) -> bool
	{
		match self
		{
			ValueType::Int => true,
			ValueType::Float => true,
			ValueType::Any => true,
			ValueType::Boolean => false,
			ValueType::String => false,
			ValueType::Void => false,
			ValueType::Array { .. } => false,
		}
	}

	pub fn is_numeric_or_string(&self) -> bool
	{
		self.is_numeric() || self == &ValueType::String
	}

	pub fn is_boolean(&self) -> bool
	{
		match self
		{
			ValueType::Boolean => true,
			ValueType::Any => true,
			_ => false,
		}
	}

	/// Whether a value of the other type can be used where this type is
	/// expected. Values of unknown type (parameters and call results) are
	/// accepted everywhere and accept everything.
	pub fn accepts(&self, other: &ValueType) -> bool
	{
		match (self, other)
		{
			(ValueType::Any, _) => true,
			(_, ValueType::Any) => true,
			(
				ValueType::Array { element_type: a },
				ValueType::Array { element_type: b },
			) => a.accepts(b),
			(a, b) => a == b,
		}
	}

	/// Pick the more specific of two accepted types.
	pub fn unified_with(self, other: ValueType) -> ValueType
	{
		match self
		{
			ValueType::Any => other,
			_ => self,
		}
	}
}

impl std::fmt::Display for ValueType
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		match self
		{
			ValueType::Boolean => write!(f, "boolean"),
			ValueType::Int => write!(f, "int"),
			ValueType::Float => write!(f, "float"),
			ValueType::String => write!(f, "string"),
			ValueType::Void => write!(f, "void"),
			ValueType::Any => write!(f, "any"),
			ValueType::Array { element_type } => write!(f, "[{}]", element_type),
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn arrays_are_equal_by_element_type()
	{
		assert_eq!(
			ValueType::array_of(ValueType::Int),
			ValueType::array_of(ValueType::Int)
		);
		assert_ne!(
			ValueType::array_of(ValueType::Int),
			ValueType::array_of(ValueType::Float)
		);
		assert_ne!(
			ValueType::array_of(ValueType::array_of(ValueType::Int)),
			ValueType::array_of(ValueType::Int)
		);
	}

	#[test]
	fn any_is_accepted_both_ways()
	{
		assert!(ValueType::Int.accepts(&ValueType::Any));
		assert!(ValueType::Any.accepts(&ValueType::String));
		assert!(ValueType::array_of(ValueType::Int)
			.accepts(&ValueType::array_of(ValueType::Any)));
		assert!(!ValueType::Int.accepts(&ValueType::Float));
		assert_ne!(ValueType::Int, ValueType::Any);
	}

	#[test]
	fn show_types()
	{
		let nested = ValueType::array_of(ValueType::array_of(ValueType::Boolean));
		assert_eq!(nested.to_string(), "[[boolean]]");
		assert_eq!(ValueType::Float.to_string(), "float");
	}
}
