//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The lexer turns source text into a list of tokens, each annotated with
//! the location it was found at.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token
{
	// Single-character tokens.
	ParenLeft,
	ParenRight,
	BracketLeft,
	BracketRight,
	Comma,
	Colon,
	Semicolon,
	Dot,
	Plus,
	Minus,
	Times,
	Divide,
	Modulo,
	Assignment,
	Exclamation,
	AngleLeft,
	AngleRight,

	// Double-character tokens.
	Power,
	Equals,
	DoesNotEqual,
	LessEqual,
	GreaterEqual,

	// Keywords.
	Speak,
	Pencil,
	If,
	Else,
	Stop,
	While,
	For,
	Fastfwd,
	Loop,
	Function,
	Return,
	Break,
	And,
	Or,
	Otherwise,

	// Literals.
	Identifier(String),
	Numeral(String),
	StringLiteral(String),
	Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{
	UnexpectedCharacter(char),
	MissingClosingQuote,
}

impl std::fmt::Display for Error
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		match self
		{
			Error::UnexpectedCharacter(x) =>
			{
				write!(f, "unexpected character {:?}", x)
			}
			Error::MissingClosingQuote => write!(f, "missing closing quote"),
		}
	}
}

#[derive(Debug, Clone)]
pub struct LexedToken
{
	pub result: Result<Token, Error>,
	pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location
{
	pub source_filename: String,
	pub span: std::ops::Range<usize>,
	pub line_number: usize,
	pub line_offset: usize,
}

impl Location
{
	pub fn format(&self) -> String
	{
		format!("Line {}, col {}", self.line_number, self.line_offset)
	}

	pub fn label(&self) -> ariadne::Label<(String, std::ops::Range<usize>)>
	{
		ariadne::Label::new((self.source_filename.clone(), self.span.clone()))
	}

	pub fn label_after_end(
		&self,
	) -> ariadne::Label<(String, std::ops::Range<usize>)>
	{
		let end = self.span.end;
		ariadne::Label::new((self.source_filename.clone(), end..end + 1))
	}

	/// Extend this location up to and including the other location.
	pub fn combined_with(&self, other: &Location) -> Location
	{
		let start = std::cmp::min(self.span.start, other.span.start);
		let end = std::cmp::max(self.span.end, other.span.end);
		Location {
			span: start..end,
			..self.clone()
		}
	}
}

pub fn lex(source: &str, source_filename: &str) -> Vec<LexedToken>
{
	let chars: Vec<char> = source.chars().collect();
	let mut tokens = Vec::new();
	let mut line_number = 1;
	let mut last_line_start_offset = 0;
	let mut offset = 0;

	while offset < chars.len()
	{
		let x = chars[offset];
		let start = offset;
		let line_offset = start - last_line_start_offset + 1;
		offset += 1;

		let peek = chars.get(offset).copied();
		let result = match x
		{
			'(' => Ok(Token::ParenLeft),
			')' => Ok(Token::ParenRight),
			'[' => Ok(Token::BracketLeft),
			']' => Ok(Token::BracketRight),
			',' => Ok(Token::Comma),
			':' => Ok(Token::Colon),
			';' => Ok(Token::Semicolon),
			'.' => Ok(Token::Dot),
			'+' => Ok(Token::Plus),
			'-' => Ok(Token::Minus),
			'%' => Ok(Token::Modulo),
			'*' => match peek
			{
				Some('*') =>
				{
					offset += 1;
					Ok(Token::Power)
				}
				_ => Ok(Token::Times),
			},
			'=' => match peek
			{
				Some('=') =>
				{
					offset += 1;
					Ok(Token::Equals)
				}
				_ => Ok(Token::Assignment),
			},
			'!' => match peek
			{
				Some('=') =>
				{
					offset += 1;
					Ok(Token::DoesNotEqual)
				}
				_ => Ok(Token::Exclamation),
			},
			'<' => match peek
			{
				Some('=') =>
				{
					offset += 1;
					Ok(Token::LessEqual)
				}
				_ => Ok(Token::AngleLeft),
			},
			'>' => match peek
			{
				Some('=') =>
				{
					offset += 1;
					Ok(Token::GreaterEqual)
				}
				_ => Ok(Token::AngleRight),
			},
			'/' => match peek
			{
				Some('/') =>
				{
					while offset < chars.len() && chars[offset] != '\n'
					{
						offset += 1;
					}
					continue;
				}
				_ => Ok(Token::Divide),
			},
			'"' =>
			{
				let mut literal = String::new();
				let mut is_closed = false;
				while offset < chars.len()
				{
					let y = chars[offset];
					offset += 1;
					match y
					{
						'"' =>
						{
							is_closed = true;
							break;
						}
						'\n' =>
						{
							offset -= 1;
							break;
						}
						_ => literal.push(y),
					}
				}
				if is_closed
				{
					Ok(Token::StringLiteral(literal))
				}
				else
				{
					Err(Error::MissingClosingQuote)
				}
			}
			'0'..='9' =>
			{
				let mut literal = x.to_string();
				while offset < chars.len() && chars[offset].is_ascii_digit()
				{
					literal.push(chars[offset]);
					offset += 1;
				}
				// A dot that is not followed by a digit belongs to `.loop`.
				let is_fractional = chars.get(offset) == Some(&'.')
					&& chars.get(offset + 1).map_or(false, char::is_ascii_digit);
				if is_fractional
				{
					literal.push('.');
					offset += 1;
					while offset < chars.len() && chars[offset].is_ascii_digit()
					{
						literal.push(chars[offset]);
						offset += 1;
					}
				}
				Ok(Token::Numeral(literal))
			}
			x if is_identifier_start(x) =>
			{
				let mut identifier = x.to_string();
				while offset < chars.len()
					&& is_identifier_continuation(chars[offset])
				{
					identifier.push(chars[offset]);
					offset += 1;
				}
				Ok(keyword_or_identifier(identifier))
			}
			' ' | '\t' | '\r' => continue,
			'\n' =>
			{
				line_number += 1;
				last_line_start_offset = offset;
				continue;
			}
			x => Err(Error::UnexpectedCharacter(x)),
		};

		let location = Location {
			source_filename: source_filename.to_string(),
			span: start..offset,
			line_number,
			line_offset,
		};
		tokens.push(LexedToken { result, location });
	}
	tokens
}

fn keyword_or_identifier(identifier: String) -> Token
{
	match identifier.as_str()
	{
		"speak" => Token::Speak,
		"pencil" => Token::Pencil,
		"if" => Token::If,
		"else" => Token::Else,
		"stop" => Token::Stop,
		"while" => Token::While,
		"for" => Token::For,
		"fastfwd" => Token::Fastfwd,
		"loop" => Token::Loop,
		"f" => Token::Function,
		"return" => Token::Return,
		"break" => Token::Break,
		"and" => Token::And,
		"or" => Token::Or,
		"otherwise" => Token::Otherwise,
		"true" => Token::Bool(true),
		"false" => Token::Bool(false),
		_ => Token::Identifier(identifier),
	}
}

fn is_identifier_start(x: char) -> bool
{
	x.is_alphabetic() || x == '_'
}

fn is_identifier_continuation(x: char) -> bool
{
	x.is_alphanumeric() || x == '_'
}
