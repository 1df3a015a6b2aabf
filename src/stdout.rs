//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The command line interface prints colored dumps of every stage when run
//! with the _verbose_ flag, and renders compiler errors as reports.

use crate::common;
use crate::error;
use crate::grapher;
use crate::lexer;
use crate::resolved;

use serde::Deserialize;
use std::io::Write;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Default, Clone, Deserialize, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub struct Options
{
	/// Show every intermediate stage
	#[clap(short, long)]
	pub verbose: bool,

	/// When to use ANSI colors in error messages and intermediate output
	#[clap(long, value_name("WHEN"))]
	#[clap(value_enum, default_value_t=ColorChoice::Auto)]
	pub color: ColorChoice,

	/// Which character set to use to draw the arrows in error messages
	#[clap(long, value_name("CHARSET"))]
	#[clap(value_enum, default_value_t=CharSet::Unicode)]
	pub arrows: CharSet,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice
{
	#[default]
	Auto,
	Always,
	Never,
}

impl From<ColorChoice> for termcolor::ColorChoice
{
	fn from(choice: ColorChoice) -> termcolor::ColorChoice
	{
		match choice
		{
			ColorChoice::Auto => termcolor::ColorChoice::Auto,
			ColorChoice::Always => termcolor::ColorChoice::Always,
			ColorChoice::Never => termcolor::ColorChoice::Never,
		}
	}
}

#[derive(Debug, Default, Clone, Copy, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CharSet
{
	#[default]
	Unicode,
	Ascii,
}

impl From<CharSet> for ariadne::CharSet
{
	fn from(choice: CharSet) -> ariadne::CharSet
	{
		match choice
		{
			CharSet::Unicode => ariadne::CharSet::Unicode,
			CharSet::Ascii => ariadne::CharSet::Ascii,
		}
	}
}

pub struct StdOut
{
	stdout: StandardStream,
	is_verbose: bool,
	report_config: ariadne::Config,
}

impl StdOut
{
	pub fn new(options: &Options) -> StdOut
	{
		let stdout = StandardStream::stdout(options.color.into());
		let with_color = match options.color
		{
			ColorChoice::Auto => stdout.supports_color(),
			ColorChoice::Always => true,
			ColorChoice::Never => false,
		};
		let report_config = ariadne::Config::default()
			.with_color(with_color)
			.with_char_set(options.arrows.into());
		StdOut {
			stdout,
			is_verbose: options.verbose,
			report_config,
		}
	}

	pub fn header(
		&mut self,
		preamble: &str,
		filename: &str,
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.stdout.set_color(&ColorSpec::new())?;
			writeln!(self.stdout, "{} {}...", preamble, filename)?;
		}
		Ok(())
	}

	pub fn dump_tokens(
		&mut self,
		tokens: &[lexer::LexedToken],
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.set_dimmed()?;
			for token in tokens
			{
				match &token.result
				{
					Ok(token) => write!(self.stdout, "{:?}   ", token)?,
					Err(_) => write!(self.stdout, "ERROR   ")?,
				}
			}
			writeln!(self.stdout)?;
			writeln!(self.stdout)?;
		}
		Ok(())
	}

	pub fn dump_parsed(
		&mut self,
		program: &common::Program,
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.set_dimmed()?;
			writeln!(self.stdout, "{:?}", program.statements)?;
			writeln!(self.stdout)?;
		}
		Ok(())
	}

	pub fn dump_resolved(
		&mut self,
		program: &resolved::Program,
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.set_dimmed()?;
			writeln!(self.stdout, "{}", grapher::graph(program))?;
			writeln!(self.stdout)?;
		}
		Ok(())
	}

	pub fn dump_text(&mut self, text: &str) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.set_dimmed()?;
			writeln!(self.stdout, "{}", text)?;
			writeln!(self.stdout)?;
		}
		Ok(())
	}

	pub fn show_error(
		&mut self,
		error: &error::Error,
		mut source_cache: impl ariadne::Cache<String>,
	) -> Result<(), std::io::Error>
	{
		let colorspec_error = ColorSpec::new()
			.set_fg(Some(Color::Red))
			.set_bold(true)
			.to_owned();
		self.stdout.set_color(&colorspec_error)?;
		writeln!(self.stdout)?;
		let report = error.build_report(self.report_config);
		report.eprint(&mut source_cache)?;
		self.stdout.reset()?;
		Ok(())
	}

	/// Print the final output undecorated, so that it can be piped.
	pub fn output(&mut self, text: &str) -> Result<(), std::io::Error>
	{
		self.stdout.reset()?;
		writeln!(self.stdout, "{}", text)?;
		Ok(())
	}

	pub fn done(&mut self) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			let colorspec_success =
				ColorSpec::new().set_fg(Some(Color::Green)).to_owned();
			self.stdout.set_color(&colorspec_success)?;
			writeln!(self.stdout, "Done.")?;
		}
		self.stdout.reset()?;
		Ok(())
	}

	fn set_dimmed(&mut self) -> Result<(), std::io::Error>
	{
		let colorspec_dump = ColorSpec::new().set_dimmed(true).to_owned();
		self.stdout.set_color(&colorspec_dump)
	}
}
