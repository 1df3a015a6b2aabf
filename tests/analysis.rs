//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use squishi::*;

use pretty_assertions::assert_eq;

fn compile_analyzed(filename: &str) -> Result<String, Error>
{
	let source = std::fs::read_to_string(filename).unwrap();
	let options = optimizer::Options::default();
	squishi::compile(&source, filename, "analyzed", &options)
}

#[test]
fn analyze_every_valid_sample() -> Result<(), anyhow::Error>
{
	for entry in std::fs::read_dir("tests/samples/valid")?
	{
		let path = entry?.path();
		let filename = path.to_string_lossy().to_string();
		let graph = compile_analyzed(&filename)
			.map_err(|error| anyhow::anyhow!("{}: {}", filename, error))?;
		assert!(graph.starts_with("   1 | Program statements=["));
	}
	Ok(())
}

#[test]
fn graph_function_and_call()
{
	let graph =
		compile_analyzed("tests/samples/valid/function_and_call.sq").unwrap();
	let expected = [
		"   1 | Program statements=[#2,#13]",
		"   2 | FunctionDeclaration function=#3 body=[#6,#9]",
		"   3 | Function name='coolFunction' parameters=[#4,#5]",
		"   4 | Variable name='x' type=any",
		"   5 | Variable name='y' type=any",
		"   6 | VariableDeclaration variable=#7 initializer=#8",
		"   7 | Variable name='z' type=any",
		"   8 | BinaryExpression op='+' left=#4 right=#5 type=any",
		"   9 | IfStatement test=#10 consequence=[#11] alternate=[#12]",
		"  10 | BinaryExpression op='>' left=#7 right=7 type=boolean",
		"  11 | ShortReturnStatement",
		"  12 | ReturnStatement expression=#7",
		"  13 | Call callee=#3 arguments=[4,7]",
	]
	.join("\n");
	assert_eq!(graph, expected);
}

#[test]
fn graph_loop_over_array()
{
	let graph =
		compile_analyzed("tests/samples/valid/loopi_array.sq").unwrap();
	let expected = [
		"   1 | Program statements=[#2,#5]",
		"   2 | VariableDeclaration variable=#3 initializer=#4",
		"   3 | Variable name='anArray' type=[int]",
		"   4 | ArrayExpression elements=[2,5,9] type=[int]",
		"   5 | LoopStatement iterator=#6 collection=#3 body=[#7]",
		"   6 | Variable name='item' type=int",
		"   7 | PrintStatement argument=#6",
	]
	.join("\n");
	assert_eq!(graph, expected);
}

#[test]
fn graph_else_if_chain()
{
	let graph = compile_analyzed("tests/samples/valid/more_ifs.sq").unwrap();
	let expected = [
		"   1 | Program statements=[#2,#5,#7]",
		"   2 | IfStatement test=#3 consequence=[#4]",
		"   3 | BinaryExpression op='>' left=4 right=3 type=boolean",
		"   4 | PrintStatement argument='hi'",
		"   5 | VariableDeclaration variable=#6 initializer=4",
		"   6 | Variable name='x' type=int",
		"   7 | IfStatement test=#8 consequence=[#9] alternate=#10",
		"   8 | BinaryExpression op='!=' left=#6 right=4 type=boolean",
		"   9 | PrintStatement argument=#6",
		"  10 | IfStatement test=#11 consequence=[#12]",
		"  11 | BinaryExpression op='!=' left=#6 right=5 type=boolean",
		"  12 | PrintStatement argument='NO!'",
	]
	.join("\n");
	assert_eq!(graph, expected);
}

#[test]
fn analysis_keeps_constant_expressions()
{
	let graph = compile_analyzed("tests/samples/valid/very_small.sq").unwrap();
	let expected = [
		"   1 | Program statements=[#2,#5]",
		"   2 | VariableDeclaration variable=#3 initializer=#4",
		"   3 | Variable name='x' type=int",
		"   4 | BinaryExpression op='*' left=3 right=7 type=int",
		"   5 | AssignmentStatement target=#3 source=#3",
	]
	.join("\n");
	assert_eq!(graph, expected);
}
