//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Squishi compiles a small imperative language to JavaScript. The stages
//! run in order: lexing, parsing, analysis, optimization and generation.

pub mod analyzer;
pub mod common;
pub mod error;
pub mod generator;
pub mod grapher;
pub mod lexer;
pub mod optimizer;
pub mod parser;
pub mod resolved;
pub mod scoper;
pub mod stdout;
pub mod typer;
pub mod value_type;

pub use error::Error;

use serde::Deserialize;

/// What the compiler should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind
{
	/// The node graph of the analyzed program.
	Analyzed,
	/// The node graph of the optimized program.
	Optimized,
	/// JavaScript source text.
	Js,
}

impl std::str::FromStr for OutputKind
{
	type Err = Error;

	fn from_str(kind: &str) -> Result<OutputKind, Error>
	{
		serde_plain::from_str(kind).map_err(|_| Error::UnknownOutputKind {
			kind: kind.to_string(),
		})
	}
}

/// A finished compilation stage, handed to the observer of [`compile_with`].
#[derive(Debug, Clone, Copy)]
pub enum Stage<'a>
{
	Lexed(&'a [lexer::LexedToken]),
	Parsed(&'a common::Program),
	Analyzed(&'a resolved::Program),
	Optimized(&'a resolved::Program),
	Generated(&'a str),
}

/// Compile source text to the requested output. The output kind is checked
/// before any source is read.
pub fn compile(
	source: &str,
	source_filename: &str,
	kind: &str,
	options: &optimizer::Options,
) -> Result<String, Error>
{
	compile_with(source, source_filename, kind, options, |_| Ok(()))
}

/// Like [`compile`], but calls `observe` after every stage that runs.
pub fn compile_with<E, F>(
	source: &str,
	source_filename: &str,
	kind: &str,
	options: &optimizer::Options,
	mut observe: F,
) -> Result<String, E>
where
	E: From<Error>,
	F: FnMut(Stage<'_>) -> Result<(), E>,
{
	let kind: OutputKind = kind.parse()?;
	let tokens = lexer::lex(source, source_filename);
	observe(Stage::Lexed(&tokens))?;
	let program = parser::parse(tokens, source_filename)?;
	observe(Stage::Parsed(&program))?;
	let program = analyzer::analyze(program)?;
	observe(Stage::Analyzed(&program))?;
	if kind == OutputKind::Analyzed
	{
		return Ok(grapher::graph(&program));
	}
	let program = optimizer::optimize(program, options);
	observe(Stage::Optimized(&program))?;
	if kind == OutputKind::Optimized
	{
		return Ok(grapher::graph(&program));
	}
	let js = generator::generate(&program);
	observe(Stage::Generated(&js))?;
	Ok(js)
}
