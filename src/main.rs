//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use squishi::optimizer;
use squishi::optimizer::Pass;
use squishi::stdout;
use squishi::Stage;

use anyhow::Context;
use clap::Parser;
use enumset::EnumSet;
use serde::Deserialize;

#[derive(Debug, clap::Parser)]
#[clap(version, about)]
struct Cli
{
	/// The Squishi source file to compile
	#[clap(value_parser)]
	filepath: std::path::PathBuf,

	/// What to produce: 'analyzed', 'optimized' or 'js' (default: 'js')
	#[clap(long, value_name("KIND"))]
	output: Option<String>,

	/// Write the output to this file instead of stdout
	#[clap(short)]
	output_filepath: Option<std::path::PathBuf>,

	/// Never unroll a loop that runs more than this many times
	#[clap(long, value_name("N"))]
	max_unroll: Option<usize>,

	/// Skip one or more optimizer passes
	#[clap(long, value_enum, num_args(1..))]
	disable: Vec<Pass>,

	/// Load additional options from a TOML file
	#[clap(long)]
	config: Option<std::path::PathBuf>,

	#[clap(flatten)]
	stdout: stdout::Options,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config
{
	output: Option<String>,
	max_unroll: Option<usize>,
	disable: Vec<Pass>,
}

fn main() -> Result<(), anyhow::Error>
{
	#[cfg(feature = "logging")]
	env_logger::init();

	let cli = Cli::parse();
	let config: Config = if let Some(filename) = &cli.config
	{
		let raw = std::fs::read_to_string(filename).with_context(|| {
			format!("failed to read '{}'", filename.to_string_lossy())
		})?;
		toml::from_str(&raw).with_context(|| {
			format!("failed to parse '{}'", filename.to_string_lossy())
		})?
	}
	else
	{
		Config::default()
	};

	let kind = cli.output.or(config.output).unwrap_or("js".to_string());
	let disabled: EnumSet<Pass> =
		cli.disable.into_iter().chain(config.disable).collect();
	let options = optimizer::Options {
		passes: EnumSet::all() - disabled,
		max_unroll_iterations: cli
			.max_unroll
			.or(config.max_unroll)
			.unwrap_or(optimizer::DEFAULT_MAX_UNROLL_ITERATIONS),
	};

	let mut stdout = stdout::StdOut::new(&cli.stdout);
	let filename = cli.filepath.to_string_lossy().to_string();
	let source = std::fs::read_to_string(&cli.filepath)
		.with_context(|| format!("failed to read '{}'", filename))?;

	let result = squishi::compile_with(
		&source,
		&filename,
		&kind,
		&options,
		|stage| dump(&mut stdout, stage, &filename),
	);
	match result
	{
		Ok(output) =>
		{
			if let Some(output_filepath) = &cli.output_filepath
			{
				stdout.header("Writing to", &output_filepath.to_string_lossy())?;
				std::fs::write(output_filepath, output)?;
			}
			else
			{
				stdout.output(&output)?;
			}
			stdout.done()?;
			Ok(())
		}
		Err(error) =>
		{
			if let Some(error) = error.downcast_ref::<squishi::Error>()
			{
				let sources = ariadne::sources(vec![(filename, source)]);
				stdout.show_error(error, sources)?;
			}
			Err(error.context("compilation failed"))
		}
	}
}

fn dump(
	stdout: &mut stdout::StdOut,
	stage: Stage<'_>,
	filename: &str,
) -> Result<(), anyhow::Error>
{
	match stage
	{
		Stage::Lexed(tokens) =>
		{
			stdout.header("Lexed", filename)?;
			stdout.dump_tokens(tokens)?;
		}
		Stage::Parsed(program) =>
		{
			stdout.header("Parsed", filename)?;
			stdout.dump_parsed(program)?;
		}
		Stage::Analyzed(program) =>
		{
			stdout.header("Analyzed", filename)?;
			stdout.dump_resolved(program)?;
		}
		Stage::Optimized(program) =>
		{
			stdout.header("Optimized", filename)?;
			stdout.dump_resolved(program)?;
		}
		Stage::Generated(js) =>
		{
			stdout.header("Generated", filename)?;
			stdout.dump_text(js)?;
		}
	}
	Ok(())
}
