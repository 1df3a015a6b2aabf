//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use squishi::optimizer::Options;

use pretty_assertions::assert_eq;

fn compile_js(source: &str) -> String
{
	squishi::compile(source, "test.sq", "js", &Options::default()).unwrap()
}

fn compile_sample(filename: &str) -> String
{
	let source = std::fs::read_to_string(filename).unwrap();
	squishi::compile(&source, filename, "js", &Options::default()).unwrap()
}

#[test]
fn generate_very_small()
{
	assert_eq!(compile_sample("tests/samples/valid/very_small.sq"), "let x_1 = 21;");
}

#[test]
fn generate_loop_over_number()
{
	let expected = ["for (const item_1 of 10) {", "console.log(item_1);", "}"];
	assert_eq!(
		compile_sample("tests/samples/valid/loopi.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_while_and_if()
{
	let expected = [
		"while (true) {",
		"if (true) {",
		"break;",
		"} else {",
		"break;",
		"}",
		"}",
	];
	assert_eq!(
		compile_sample("tests/samples/valid/while_and_if.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_string()
{
	assert_eq!(
		compile_js("pencil word = \"heyyy\";"),
		"let word_1 = \"heyyy\";"
	);
}

#[test]
fn generate_else_if_chain()
{
	let expected = [
		"if (true) {",
		"console.log(\"hi\");",
		"}",
		"let x_1 = 4;",
		"if ((x_1 !== 4)) {",
		"console.log(x_1);",
		"} else",
		"if ((x_1 !== 5)) {",
		"console.log(\"NO!\");",
		"}",
	];
	assert_eq!(
		compile_sample("tests/samples/valid/more_ifs.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_function_and_call()
{
	let expected = [
		"function coolFunction_1(x_2, y_3) {",
		"let z_4 = (x_2 + y_3);",
		"if ((z_4 > 7)) {",
		"return;",
		"} else {",
		"return z_4;",
		"}",
		"}",
		"coolFunction_1(4,7);",
	];
	assert_eq!(
		compile_sample("tests/samples/valid/function_and_call.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_array()
{
	let expected = ["let anArray_1 = [2,5,9];", "let z_2 = anArray_1[2];"];
	assert_eq!(
		compile_sample("tests/samples/valid/array.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_conditional()
{
	let expected = ["let x_1 = 4;", "let z_2 = (x_1 > 2) ? 7 : 9;"];
	assert_eq!(
		compile_sample("tests/samples/valid/conditional.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_nested_conditional()
{
	let source = "pencil b = true; speak 1 + (2 if b otherwise 3);";
	let expected = ["let b_1 = true;", "console.log((1 + (b_1 ? 2 : 3)));"];
	assert_eq!(compile_js(source), expected.join("\n"));
}

#[test]
fn generate_loop_over_array()
{
	let expected = [
		"let anArray_1 = [2,5,9];",
		"for (const item_2 of anArray_1) {",
		"console.log(item_2);",
		"}",
	];
	assert_eq!(
		compile_sample("tests/samples/valid/loopi_array.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_logical_and_unary_operators()
{
	let source = "pencil a = true; pencil b = !a and a or a; pencil c = 4; speak -c;";
	let expected = [
		"let a_1 = true;",
		"let b_2 = (((!a_1) && a_1) || a_1);",
		"let c_3 = 4;",
		"console.log((-c_3));",
	];
	assert_eq!(compile_js(source), expected.join("\n"));
}

#[test]
fn generate_parenthesized_negative_base()
{
	let source = "pencil a = 2; speak (-3) ** a;";
	let expected = ["let a_1 = 2;", "console.log(((-3) ** a_1));"];
	assert_eq!(compile_js(source), expected.join("\n"));
}

#[test]
fn generate_recursion()
{
	let expected = [
		"function countdown_1(n_2) {",
		"if ((n_2 === 0)) {",
		"return;",
		"}",
		"console.log(n_2);",
		"countdown_1((n_2 - 1));",
		"}",
		"countdown_1(3);",
	];
	assert_eq!(
		compile_sample("tests/samples/valid/recursion.sq"),
		expected.join("\n")
	);
}

#[test]
fn generate_deterministically()
{
	for entry in std::fs::read_dir("tests/samples/valid").unwrap()
	{
		let path = entry.unwrap().path();
		let filename = path.to_string_lossy().to_string();
		assert_eq!(compile_sample(&filename), compile_sample(&filename));
	}
}

#[test]
fn generate_distinct_names_for_shadowed_variables()
{
	let expected = [
		"let x_1 = 1;",
		"while ((x_1 < 3)) {",
		"let x_2 = \"inner\";",
		"console.log(x_2);",
		"break;",
		"}",
		"x_1 = (x_1 + 1);",
	];
	assert_eq!(
		compile_sample("tests/samples/valid/shadowing.sq"),
		expected.join("\n")
	);
}

#[test]
fn avoid_collisions_with_suffixed_source_names()
{
	let source = "pencil x = 1; pencil x_1 = 2; speak x + x_1;";
	let expected = [
		"let x_1 = 1;",
		"let x_1_2 = 2;",
		"console.log((x_1 + x_1_2));",
	];
	assert_eq!(compile_js(source), expected.join("\n"));
}

#[test]
fn generate_declarations_inside_branches()
{
	let source = "pencil y = 0;
		while true:
			if y > 2:
				pencil y = 1;
				speak y;
				break;
			else
				pencil z = y;
				speak z;
			stop
			y = y + 1;
		stop";
	let expected = [
		"let y_1 = 0;",
		"while (true) {",
		"if ((y_1 > 2)) {",
		"let y_2 = 1;",
		"console.log(y_2);",
		"break;",
		"} else {",
		"let z_3 = y_1;",
		"console.log(z_3);",
		"}",
		"y_1 = (y_1 + 1);",
		"}",
	];
	assert_eq!(compile_js(source), expected.join("\n"));
}
