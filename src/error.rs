//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

pub use crate::lexer;
pub use crate::lexer::Location;
pub use crate::value_type::ValueType;

use ariadne::{Fmt, Report, ReportKind};

type Span = (String, std::ops::Range<usize>);

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Error
{
	UnexpectedEndOfFile
	{
		last_location: Location,
		expectation: String,
	},
	Lexical
	{
		error: lexer::Error,
		location: Location,
		expectation: String,
	},
	UnexpectedToken
	{
		location: Location,
		expectation: String,
	},
	AlreadyDeclared
	{
		name: String,
		location: Location,
		previous: Location,
	},
	NotDeclared
	{
		name: String, location: Location
	},
	NotAFunction
	{
		name: String,
		location: Location,
		location_of_declaration: Location,
	},
	NotAVariable
	{
		name: String,
		location: Location,
		location_of_declaration: Location,
	},
	TypeMismatch
	{
		expected: ValueType,
		found: ValueType,
		location: Location,
	},
	ExpectedBoolean
	{
		found: ValueType, location: Location
	},
	ExpectedNumber
	{
		found: ValueType, location: Location
	},
	ExpectedNumberOrString
	{
		found: ValueType, location: Location
	},
	NotIterable
	{
		found: ValueType, location: Location
	},
	NotAnArray
	{
		found: ValueType, location: Location
	},
	ArityMismatch
	{
		name: String,
		expected: usize,
		found: usize,
		location: Location,
		location_of_declaration: Location,
	},
	NotInLoop
	{
		location: Location
	},
	NotInFunction
	{
		location: Location
	},
	UnknownOutputKind
	{
		kind: String
	},
}

impl Error
{
	pub fn code(&self) -> u16
	{
		match self
		{
			Error::Lexical {
				error: lexer::Error::UnexpectedCharacter(_),
				..
			} => 110,
			Error::Lexical {
				error: lexer::Error::MissingClosingQuote,
				..
			} => 111,
			Error::UnexpectedEndOfFile { .. } => 300,
			Error::UnexpectedToken { .. } => 301,
			Error::AlreadyDeclared { .. } => 400,
			Error::NotDeclared { .. } => 401,
			Error::NotAFunction { .. } => 402,
			Error::NotAVariable { .. } => 403,
			Error::TypeMismatch { .. } => 500,
			Error::ExpectedBoolean { .. } => 501,
			Error::ExpectedNumber { .. } => 502,
			Error::ExpectedNumberOrString { .. } => 503,
			Error::NotIterable { .. } => 504,
			Error::NotAnArray { .. } => 505,
			Error::ArityMismatch { .. } => 510,
			Error::NotInLoop { .. } => 600,
			Error::NotInFunction { .. } => 601,
			Error::UnknownOutputKind { .. } => 900,
		}
	}

	pub fn location(&self) -> Option<&Location>
	{
		match self
		{
			Error::UnexpectedEndOfFile { last_location, .. } =>
			{
				Some(last_location)
			}
			Error::Lexical { location, .. } => Some(location),
			Error::UnexpectedToken { location, .. } => Some(location),
			Error::AlreadyDeclared { location, .. } => Some(location),
			Error::NotDeclared { location, .. } => Some(location),
			Error::NotAFunction { location, .. } => Some(location),
			Error::NotAVariable { location, .. } => Some(location),
			Error::TypeMismatch { location, .. } => Some(location),
			Error::ExpectedBoolean { location, .. } => Some(location),
			Error::ExpectedNumber { location, .. } => Some(location),
			Error::ExpectedNumberOrString { location, .. } => Some(location),
			Error::NotIterable { location, .. } => Some(location),
			Error::NotAnArray { location, .. } => Some(location),
			Error::ArityMismatch { location, .. } => Some(location),
			Error::NotInLoop { location } => Some(location),
			Error::NotInFunction { location } => Some(location),
			Error::UnknownOutputKind { .. } => None,
		}
	}

	pub fn message(&self) -> String
	{
		match self
		{
			Error::UnexpectedEndOfFile { expectation, .. } =>
			{
				format!("Unexpected end of file, {}", expectation)
			}
			Error::Lexical {
				error, expectation, ..
			} => format!("Unexpected input ({}), {}", error, expectation),
			Error::UnexpectedToken { expectation, .. } =>
			{
				format!("Unexpected token, {}", expectation)
			}
			Error::AlreadyDeclared { name, .. } =>
			{
				format!("{} has already been declared", name)
			}
			Error::NotDeclared { name, .. } =>
			{
				format!("{} has not been declared", name)
			}
			Error::NotAFunction { name, .. } =>
			{
				format!("{} is not a function", name)
			}
			Error::NotAVariable { name, .. } =>
			{
				format!("{} is not a variable", name)
			}
			Error::TypeMismatch {
				expected, found, ..
			} => format!("Type mismatch, expected {}, found {}", expected, found),
			Error::ExpectedBoolean { found, .. } =>
			{
				format!("Expected a boolean, found {}", found)
			}
			Error::ExpectedNumber { found, .. } =>
			{
				format!("Expected a number, found {}", found)
			}
			Error::ExpectedNumberOrString { found, .. } =>
			{
				format!("Expected a number or string, found {}", found)
			}
			Error::NotIterable { found, .. } =>
			{
				format!("Cannot loop over a value of type {}", found)
			}
			Error::NotAnArray { found, .. } =>
			{
				format!("Cannot index into a value of type {}", found)
			}
			Error::ArityMismatch {
				expected, found, ..
			} => format!("Expected {} arg(s), found {}", expected, found),
			Error::NotInLoop { .. } =>
			{
				"Break can only appear in a loop".to_string()
			}
			Error::NotInFunction { .. } =>
			{
				"Return can only appear in a function".to_string()
			}
			Error::UnknownOutputKind { kind } =>
			{
				format!("Unknown output type '{}'", kind)
			}
		}
	}

	pub fn build_report(&self, config: ariadne::Config) -> Report<'_, Span>
	{
		let mut colors = ariadne::ColorGenerator::new();
		let a = colors.next();
		let b = colors.next();

		match self
		{
			Error::UnexpectedEndOfFile {
				expectation,
				last_location,
			} => Report::build(
				ReportKind::Error,
				&last_location.source_filename,
				last_location.span.start,
			)
			.with_config(config)
			.with_message("Unexpected end of file")
			.with_label(
				last_location
					.label_after_end()
					.with_message(expectation)
					.with_order(1)
					.with_color(a),
			)
			.with_label(
				last_location
					.label()
					.with_message("Expected more after this.")
					.with_order(2)
					.with_color(b),
			)
			.finish(),

			Error::Lexical {
				error,
				expectation,
				location,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_config(config)
			.with_message(match error
			{
				lexer::Error::UnexpectedCharacter(_) => "Unexpected character",
				lexer::Error::MissingClosingQuote => "Missing closing quote",
			})
			.with_label(
				location
					.label()
					.with_message(expectation)
					.with_color(a),
			)
			.finish(),

			Error::AlreadyDeclared {
				name,
				location,
				previous,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_config(config)
			.with_message("Duplicate declaration")
			.with_label(
				location
					.label()
					.with_message(format!(
						"'{}' is already declared in this scope.",
						name.fg(a)
					))
					.with_color(a),
			)
			.with_label(
				previous
					.label()
					.with_message("Previously declared here.")
					.with_color(b),
			)
			.finish(),

			Error::NotAFunction {
				name,
				location,
				location_of_declaration,
			}
			| Error::NotAVariable {
				name,
				location,
				location_of_declaration,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_config(config)
			.with_message("Invalid reference")
			.with_label(
				location
					.label()
					.with_message(self.message())
					.with_color(a),
			)
			.with_label(
				location_of_declaration
					.label()
					.with_message(format!("'{}' declared here.", name.fg(b)))
					.with_color(b),
			)
			.finish(),

			Error::ArityMismatch {
				name,
				location,
				location_of_declaration,
				..
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_config(config)
			.with_message("Argument count mismatch")
			.with_label(
				location
					.label()
					.with_message(self.message())
					.with_color(a),
			)
			.with_label(
				location_of_declaration
					.label()
					.with_message(format!(
						"Function '{}' declared here.",
						name.fg(b)
					))
					.with_color(b),
			)
			.finish(),

			Error::TypeMismatch {
				expected,
				found,
				location,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_config(config)
			.with_message("Mismatched types")
			.with_label(
				location
					.label()
					.with_message(format!(
						"Expected {}, found {}.",
						show_type(expected).fg(b),
						show_type(found).fg(a)
					))
					.with_color(a),
			)
			.finish(),

			Error::UnknownOutputKind { .. } =>
			{
				Report::build(ReportKind::Error, String::new(), 0)
					.with_config(config)
					.with_message(self.message())
					.finish()
			}

			error => match error.location()
			{
				Some(location) => Report::build(
					ReportKind::Error,
					&location.source_filename,
					location.span.start,
				)
				.with_config(config)
				.with_message(title(error))
				.with_label(
					location
						.label()
						.with_message(error.message())
						.with_color(a),
				)
				.finish(),
				None => Report::build(ReportKind::Error, String::new(), 0)
					.with_config(config)
					.with_message(error.message())
					.finish(),
			},
		}
	}
}

fn title(error: &Error) -> &'static str
{
	match error
	{
		Error::UnexpectedToken { .. } => "Unexpected token",
		Error::NotDeclared { .. } => "Undefined reference",
		Error::ExpectedBoolean { .. } => "Expected boolean",
		Error::ExpectedNumber { .. } => "Expected number",
		Error::ExpectedNumberOrString { .. } => "Expected number or string",
		Error::NotIterable { .. } => "Not iterable",
		Error::NotAnArray { .. } => "Not an array",
		Error::NotInLoop { .. } => "Misplaced break statement",
		Error::NotInFunction { .. } => "Misplaced return statement",
		_ => "Compilation failed",
	}
}

fn show_type(value_type: &ValueType) -> String
{
	format!("`{}`", value_type)
}

impl std::fmt::Display for Error
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		match self
		{
			Error::UnexpectedEndOfFile { last_location, .. } =>
			{
				let after_end = Location {
					line_offset: last_location.line_offset
						+ last_location.span.len(),
					..last_location.clone()
				};
				write!(f, "{}: {}", after_end.format(), self.message())
			}
			_ => self.fmt_at_location(f),
		}
	}
}

impl Error
{
	fn fmt_at_location(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		match self.location()
		{
			Some(location) =>
			{
				write!(f, "{}: {}", location.format(), self.message())
			}
			None => write!(f, "{}", self.message()),
		}
	}
}

impl std::error::Error for Error {}
