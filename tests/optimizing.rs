//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use squishi::optimizer::{Options, Pass};
use squishi::resolved::*;
use squishi::*;

use anyhow::anyhow;
use enumset::EnumSet;
use pretty_assertions::assert_eq;

fn analyze_source(source: &str) -> Program
{
	let tokens = lexer::lex(source, "test.sq");
	let program = parser::parse(tokens, "test.sq").unwrap();
	analyzer::analyze(program).unwrap()
}

fn optimize_source(source: &str, options: &Options) -> Program
{
	optimizer::optimize(analyze_source(source), options)
}

fn generate_with(source: &str, options: &Options) -> String
{
	generator::generate(&optimize_source(source, options))
}

fn generate_source(source: &str) -> String
{
	generate_with(source, &Options::default())
}

#[test]
fn fold_arithmetic_and_comparisons()
{
	let cases = [
		("3 * 7", "21"),
		("2 ** 3", "8"),
		("10 / 4", "2.5"),
		("7 % 3", "1"),
		("1 - 5", "-4"),
		("1.5 + 2.5", "4"),
		("2 + 3 * 4", "14"),
		("4 > 3", "true"),
		("3 <= 2", "false"),
		("2 == 2", "true"),
		("2 != 2", "false"),
		("1 < 2", "true"),
		("2 >= 3", "false"),
		("true and false", "false"),
		("false or true", "true"),
		("-(5)", "-5"),
		("!true", "false"),
	];
	for (expression, expected) in cases
	{
		let source = format!("pencil x = {};", expression);
		assert_eq!(
			generate_source(&source),
			format!("let x_1 = {};", expected),
			"when folding {}",
			expression
		);
	}
}

#[test]
fn fold_integer_division_into_float() -> Result<(), anyhow::Error>
{
	let program = optimize_source("pencil x = 10 / 4;", &Options::default());
	match &program.statements[0]
	{
		Statement::Declaration(VariableDeclaration {
			initializer: Expression::Number { value, value_type },
			..
		}) =>
		{
			assert_eq!(*value, 2.5);
			assert_eq!(*value_type, ValueType::Float);
			Ok(())
		}
		statement => Err(anyhow!("unexpected {:?}", statement)),
	}
}

#[test]
fn reduce_arithmetic_identities()
{
	let cases = [
		("a + 0", "a_1"),
		("0 + a", "a_1"),
		("a - 0", "a_1"),
		("0 - a", "(-a_1)"),
		("a * 1", "a_1"),
		("1 * a", "a_1"),
		("a * 0", "0"),
		("0 * a", "0"),
		("a / 1", "a_1"),
		("0 / a", "0"),
		("1 ** a", "1"),
		("a ** 0", "1"),
		("a * 2", "(a_1 * 2)"),
	];
	for (expression, expected) in cases
	{
		let source = format!("pencil a = 5; pencil x = {};", expression);
		assert_eq!(
			generate_source(&source),
			format!("let a_1 = 5;\nlet x_2 = {};", expected),
			"when reducing {}",
			expression
		);
	}
}

#[test]
fn reduce_or_false()
{
	let source = "pencil b = true; pencil x = b or false; pencil y = false or b;";
	assert_eq!(
		generate_source(source),
		"let b_1 = true;\nlet x_2 = b_1;\nlet y_3 = b_1;"
	);
}

#[test]
fn remove_while_false()
{
	assert_eq!(
		generate_source("while false: speak 1; stop speak 2;"),
		"console.log(2);"
	);
	assert_eq!(
		generate_source("while 1 > 2: speak 1; stop speak 2;"),
		"console.log(2);"
	);
}

#[test]
fn remove_loop_over_empty_string()
{
	assert_eq!(
		generate_source("\"\".loop c: speak c; stop speak 1;"),
		"console.log(1);"
	);
}

#[test]
fn remove_self_assignments()
{
	assert_eq!(
		generate_source("pencil x = 1; x = x; x = x + 0; x = 1 * x;"),
		"let x_1 = 1;"
	);
}

#[test]
fn keep_dead_branches()
{
	assert_eq!(
		generate_source("if false: speak 1; stop"),
		"if (false) {\nconsole.log(1);\n}"
	);
}

#[test]
fn unroll_counted_loop() -> Result<(), anyhow::Error>
{
	let source = std::fs::read_to_string("tests/samples/valid/unrolling.sq")?;
	let program = optimize_source(&source, &Options::default());
	match &program.statements[1]
	{
		Statement::For {
			body, is_unrolled, ..
		} =>
		{
			assert!(is_unrolled);
			assert_eq!(body.len(), 6);
		}
		statement => return Err(anyhow!("unexpected {:?}", statement)),
	}
	let expected = [
		"let x_1 = 0;",
		"let z_2 = 0;",
		"z_2 = 0;",
		"x_1 = (x_1 + 1);",
		"z_2 = 1;",
		"x_1 = (x_1 + 1);",
		"z_2 = 2;",
		"x_1 = (x_1 + 1);",
	]
	.join("\n");
	assert_eq!(generator::generate(&program), expected);
	Ok(())
}

#[test]
fn substitute_loop_variable_when_unrolling()
{
	let source = "pencil x = 0;
		for pencil i = 0; stop i < 2 fastfwd i = i + 1;
			x = x + i;
		stop";
	let expected = [
		"let x_1 = 0;",
		"let i_2 = 0;",
		"i_2 = 0;",
		"i_2 = 1;",
		"x_1 = (x_1 + 1);",
	]
	.join("\n");
	assert_eq!(generate_source(source), expected);
}

#[test]
fn unroll_with_larger_steps()
{
	let source = "for pencil i = 1; stop i < 6 fastfwd i = i + 2; speak i; stop";
	let expected = [
		"let i_1 = 1;",
		"i_1 = 1;",
		"console.log(i_1);",
		"i_1 = 3;",
		"console.log(i_1);",
		"i_1 = 5;",
		"console.log(i_1);",
	]
	.join("\n");
	assert_eq!(generate_source(source), expected);
}

#[test]
fn unroll_fractional_steps_as_the_loop_accumulates_them()
{
	let source =
		"for pencil z = 0.0; stop z < 1.0 fastfwd z = z + 0.1; speak z; stop";
	let mut expected = vec!["let z_1 = 0;".to_string()];
	let mut z: f64 = 0.0;
	while z < 1.0
	{
		expected.push(format!("z_1 = {};", generator::format_number(z)));
		expected.push("console.log(z_1);".to_string());
		z += 0.1;
	}
	assert_eq!(expected.len(), 1 + 2 * 11);
	assert_eq!(expected[7], "z_1 = 0.30000000000000004;");
	assert_eq!(expected[21], "z_1 = 0.9999999999999999;");
	assert_eq!(generate_source(source), expected.join("\n"));

	let options = Options {
		passes: EnumSet::all() - Pass::Unrolling,
		..Options::default()
	};
	let expected = [
		"let z_1 = 0;",
		"while ((z_1 < 1)) {",
		"console.log(z_1);",
		"z_1 = (z_1 + 0.1);",
		"}",
	];
	assert_eq!(generate_with(source, &options), expected.join("\n"));
}

#[test]
fn unroll_loop_that_never_runs()
{
	let source = "for pencil i = 5; stop i < 2 fastfwd i = i + 1; speak i; stop";
	assert_eq!(generate_source(source), "let i_1 = 5;");
}

#[test]
fn do_not_unroll_beyond_the_maximum()
{
	let source = std::fs::read_to_string("tests/samples/valid/unrolling.sq")
		.unwrap();
	let options = Options {
		max_unroll_iterations: 2,
		..Options::default()
	};
	let expected = [
		"let x_1 = 0;",
		"let z_2 = 0;",
		"while ((z_2 < 3)) {",
		"x_1 = (x_1 + 1);",
		"z_2 = (z_2 + 1);",
		"}",
	]
	.join("\n");
	assert_eq!(generate_with(&source, &options), expected);
}

#[test]
fn do_not_unroll_declarations_or_breaks()
{
	for body in ["pencil y = i;", "break;", "i = i + 1;"]
	{
		let source = format!(
			"for pencil i = 0; stop i < 3 fastfwd i = i + 1; {} stop",
			body
		);
		let program = optimize_source(&source, &Options::default());
		match &program.statements[0]
		{
			Statement::For { is_unrolled, .. } =>
			{
				assert!(!is_unrolled, "unrolled {}", body)
			}
			statement => panic!("unexpected {:?}", statement),
		}
	}
}

#[test]
fn do_not_unroll_other_loop_shapes()
{
	let source = std::fs::read_to_string("tests/samples/valid/for_statement.sq")
		.unwrap();
	let expected = [
		"let x_1 = 0;",
		"let z_2 = 4;",
		"while ((z_2 > 3)) {",
		"x_1 = (x_1 + z_2);",
		"console.log(\"hey\");",
		"z_2 = (z_2 - 1);",
		"}",
	]
	.join("\n");
	assert_eq!(generate_source(&source), expected);
}

#[test]
fn skip_disabled_passes()
{
	let source = "pencil x = 3 * 7; x = x;";
	let options = Options {
		passes: EnumSet::empty(),
		..Options::default()
	};
	assert_eq!(generate_with(source, &options), "let x_1 = (3 * 7);\nx_1 = x_1;");

	let options = Options {
		passes: EnumSet::all() - Pass::DeadCode,
		..Options::default()
	};
	assert_eq!(generate_with(source, &options), "let x_1 = 21;\nx_1 = x_1;");

	let unrolling = std::fs::read_to_string("tests/samples/valid/unrolling.sq")
		.unwrap();
	let options = Options {
		passes: EnumSet::all() - Pass::Unrolling,
		..Options::default()
	};
	assert!(generate_with(&unrolling, &options).contains("while ((z_2 < 3))"));
}

#[test]
fn optimize_idempotently() -> Result<(), anyhow::Error>
{
	let options = Options::default();
	for entry in std::fs::read_dir("tests/samples/valid")?
	{
		let path = entry?.path();
		let source = std::fs::read_to_string(&path)?;
		let once = optimize_source(&source, &options);
		let twice = optimizer::optimize(once.clone(), &options);
		assert_eq!(once, twice, "in {:?}", path);
	}
	Ok(())
}

#[test]
fn keep_irreducible_programs_unchanged()
{
	let source = "pencil a = 5; pencil b = a * 2; speak a + b;";
	let program = analyze_source(source);
	let optimized = optimizer::optimize(program.clone(), &Options::default());
	assert_eq!(optimized, program);
}
