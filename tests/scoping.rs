//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use squishi::resolved::*;
use squishi::*;

use anyhow::anyhow;
use pretty_assertions::assert_eq;

fn analyze(filename: &str) -> Result<Program, Error>
{
	let source = std::fs::read_to_string(filename).unwrap();
	let tokens = lexer::lex(&source, filename);
	let program = parser::parse(tokens, filename)?;
	analyzer::analyze(program)
}

fn analyze_to_fail(code: u16, filename: &str) -> Result<(), anyhow::Error>
{
	match analyze(filename)
	{
		Ok(_) => Err(anyhow!("broken test")),
		Err(error) =>
		{
			assert_eq!(error.code(), code, "unexpected {:?}", error);
			Ok(())
		}
	}
}

#[test]
fn fail_to_scope_duplicate_declaration() -> Result<(), anyhow::Error>
{
	analyze_to_fail(400, "tests/samples/invalid/duplicate_declaration.sq")
}

#[test]
fn fail_to_scope_undeclared_variable() -> Result<(), anyhow::Error>
{
	analyze_to_fail(401, "tests/samples/invalid/undeclared_variable.sq")
}

#[test]
fn fail_to_scope_leaking_loop_variable() -> Result<(), anyhow::Error>
{
	analyze_to_fail(401, "tests/samples/invalid/leaking_loop_variable.sq")
}

#[test]
fn fail_to_scope_leaking_branch_variable() -> Result<(), anyhow::Error>
{
	analyze_to_fail(401, "tests/samples/invalid/leaking_branch_variable.sq")
}

#[test]
fn fail_to_scope_leaking_if_variable() -> Result<(), anyhow::Error>
{
	analyze_to_fail(401, "tests/samples/invalid/leaking_if_variable.sq")
}

#[test]
fn fail_to_scope_leaking_else_variable() -> Result<(), anyhow::Error>
{
	analyze_to_fail(401, "tests/samples/invalid/leaking_else_variable.sq")
}

#[test]
fn fail_to_scope_initializer_referring_to_itself() -> Result<(), anyhow::Error>
{
	analyze_to_fail(
		401,
		"tests/samples/invalid/initializer_refers_to_itself.sq",
	)
}

#[test]
fn fail_to_scope_variable_as_function() -> Result<(), anyhow::Error>
{
	analyze_to_fail(402, "tests/samples/invalid/variable_as_function.sq")
}

#[test]
fn fail_to_scope_function_as_variable() -> Result<(), anyhow::Error>
{
	analyze_to_fail(403, "tests/samples/invalid/function_as_variable.sq")
}

#[test]
fn fail_to_scope_assignment_to_function() -> Result<(), anyhow::Error>
{
	analyze_to_fail(403, "tests/samples/invalid/assign_to_function.sq")
}

#[test]
fn fail_to_scope_break_outside_loop() -> Result<(), anyhow::Error>
{
	analyze_to_fail(600, "tests/samples/invalid/break_outside_loop.sq")
}

#[test]
fn fail_to_scope_break_in_function_in_loop() -> Result<(), anyhow::Error>
{
	analyze_to_fail(600, "tests/samples/invalid/break_in_function.sq")
}

#[test]
fn fail_to_scope_return_outside_function() -> Result<(), anyhow::Error>
{
	analyze_to_fail(601, "tests/samples/invalid/return_outside_function.sq")
}

#[test]
fn fail_to_scope_short_return_outside_function() -> Result<(), anyhow::Error>
{
	analyze_to_fail(
		601,
		"tests/samples/invalid/short_return_outside_function.sq",
	)
}

#[test]
fn report_location_of_duplicate_declaration()
{
	let error = analyze("tests/samples/invalid/duplicate_declaration.sq")
		.unwrap_err();
	assert_eq!(
		error.to_string(),
		"Line 2, col 8: x has already been declared"
	);
}

#[test]
fn shadow_in_inner_scope() -> Result<(), anyhow::Error>
{
	let program = analyze("tests/samples/valid/shadowing.sq")?;
	let (outer, inner) = match &program.statements[..]
	{
		[Statement::Declaration(outer), Statement::While { body, .. }, Statement::Assignment(assignment)] =>
		{
			assert_eq!(assignment.target, outer.variable);
			match &body[0]
			{
				Statement::Declaration(inner) => (outer.variable, inner.variable),
				statement => return Err(anyhow!("unexpected {:?}", statement)),
			}
		}
		statements => return Err(anyhow!("unexpected {:?}", statements)),
	};
	assert!(outer != inner);
	assert_eq!(program.entities[outer].name, "x");
	assert_eq!(program.entities[inner].name, "x");
	assert_eq!(program.entities[outer].value_type, ValueType::Int);
	assert_eq!(program.entities[inner].value_type, ValueType::String);
	Ok(())
}

#[test]
fn allow_recursion() -> Result<(), anyhow::Error>
{
	let program = analyze("tests/samples/valid/recursion.sq")?;
	match &program.statements[..]
	{
		[Statement::Function { function, body }, Statement::Call(call)] =>
		{
			assert_eq!(call.function, *function);
			assert_eq!(program.entities[*function].parameters.len(), 1);
			match &body[2]
			{
				Statement::Call(inner) => assert_eq!(inner.function, *function),
				statement => return Err(anyhow!("unexpected {:?}", statement)),
			}
			Ok(())
		}
		statements => Err(anyhow!("unexpected {:?}", statements)),
	}
}

#[test]
fn use_the_same_entity_at_every_use_site() -> Result<(), anyhow::Error>
{
	let program = analyze("tests/samples/valid/very_small.sq")?;
	match &program.statements[..]
	{
		[Statement::Declaration(declaration), Statement::Assignment(assignment)] =>
		{
			assert_eq!(assignment.target, declaration.variable);
			match &assignment.source
			{
				Expression::Variable { variable, .. } =>
				{
					assert_eq!(*variable, declaration.variable);
				}
				expression => return Err(anyhow!("unexpected {:?}", expression)),
			}
			Ok(())
		}
		statements => Err(anyhow!("unexpected {:?}", statements)),
	}
}
