//
// Part of squishi
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The scope chain used during analysis. Each context maps source names to
//! the entities they were declared as.

use crate::common::Identifier;
use crate::error::Error;
use crate::lexer::Location;
use crate::resolved::{Entity, FunctionId};

use std::collections::HashMap;

#[derive(Debug, Default)]
struct Context
{
	declarations: HashMap<String, (Entity, Location)>,
	is_loop: bool,
	function: Option<FunctionId>,
}

#[derive(Debug)]
pub struct Scopes
{
	contexts: Vec<Context>,
}

impl Default for Scopes
{
	fn default() -> Scopes
	{
		Scopes {
			contexts: vec![Context::default()],
		}
	}
}

impl Scopes
{
	/// Enter a function body. Loops outside the function do not enclose it.
	pub fn push_function(&mut self, function: FunctionId)
	{
		self.contexts.push(Context {
			declarations: HashMap::new(),
			is_loop: false,
			function: Some(function),
		});
	}

	pub fn push_loop(&mut self)
	{
		let function = self.enclosing_function();
		self.contexts.push(Context {
			declarations: HashMap::new(),
			is_loop: true,
			function,
		});
	}

	/// Enter a branch of an `if`, which stays in the same loop and function.
	pub fn push_block(&mut self)
	{
		let is_loop = self.is_in_loop();
		let function = self.enclosing_function();
		self.contexts.push(Context {
			declarations: HashMap::new(),
			is_loop,
			function,
		});
	}

	pub fn pop(&mut self)
	{
		if self.contexts.len() > 1
		{
			self.contexts.pop();
		}
	}

	pub fn declare(
		&mut self,
		identifier: &Identifier,
		entity: Entity,
	) -> Result<(), Error>
	{
		let current = match self.contexts.last_mut()
		{
			Some(context) => context,
			None => unreachable!(),
		};
		if let Some((_, previous)) = current.declarations.get(&identifier.name)
		{
			return Err(Error::AlreadyDeclared {
				name: identifier.name.clone(),
				location: identifier.location.clone(),
				previous: previous.clone(),
			});
		}
		current.declarations.insert(
			identifier.name.clone(),
			(entity, identifier.location.clone()),
		);
		Ok(())
	}

	pub fn resolve(&self, identifier: &Identifier) -> Result<Entity, Error>
	{
		self.contexts
			.iter()
			.rev()
			.find_map(|context| context.declarations.get(&identifier.name))
			.map(|(entity, _)| *entity)
			.ok_or_else(|| Error::NotDeclared {
				name: identifier.name.clone(),
				location: identifier.location.clone(),
			})
	}

	pub fn is_in_loop(&self) -> bool
	{
		self.contexts.last().map_or(false, |context| context.is_loop)
	}

	pub fn enclosing_function(&self) -> Option<FunctionId>
	{
		self.contexts.last().and_then(|context| context.function)
	}

	pub fn is_in_function(&self) -> bool
	{
		self.enclosing_function().is_some()
	}
}
