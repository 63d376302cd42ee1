use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::{CommandContext, ParsedArgument};
use crate::error::{CommandFailure, DispatchError};
use crate::reader::StringReader;

/// Whether a source may see and use a node.
pub type Requirement<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Callback run when input ends on a node.
pub type Command<S> = Arc<dyn for<'a> Fn(&CommandContext<'a, S>) -> Result<i32, CommandFailure> + Send + Sync>;

/// Completion candidates for an argument node, in display order.
pub type SuggestionProvider<S> = Arc<dyn for<'a> Fn(&CommandContext<'a, S>) -> Vec<String> + Send + Sync>;

/// How an argument node consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
	/// One space-delimited word.
	Word,
	/// A word or a quoted phrase.
	String,
	/// Everything up to the end of the input.
	Greedy,
	/// An integer within `min..=max`.
	Integer { min: i64, max: i64 },
}

impl ArgumentType {
	pub const fn integer(min: i64, max: i64) -> Self {
		Self::Integer { min, max }
	}

	fn parse(self, name: &str, reader: &mut StringReader<'_>) -> Result<ParsedArgument, DispatchError> {
		let cursor = reader.cursor();
		let invalid = |reason: String| DispatchError::InvalidArgument {
			name: name.to_string(),
			reason,
			cursor,
		};
		match self {
			Self::Word => {
				let word = reader.read_unquoted();
				if word.is_empty() {
					return Err(invalid("expected a word".into()));
				}
				Ok(ParsedArgument::String(word.to_string()))
			}
			Self::String => match reader.read_string() {
				Some(s) if !s.is_empty() || reader.cursor() > cursor => Ok(ParsedArgument::String(s)),
				Some(_) => Err(invalid("expected a string".into())),
				None => Err(invalid("unterminated quoted string".into())),
			},
			Self::Greedy => Ok(ParsedArgument::String(reader.read_remaining().to_string())),
			Self::Integer { min, max } => {
				let raw = reader.read_unquoted();
				let value: i64 = raw.parse().map_err(|_| invalid(format!("expected an integer, found {raw:?}")))?;
				if value < min || value > max {
					return Err(invalid(format!("integer must be between {min} and {max}, found {value}")));
				}
				Ok(ParsedArgument::Integer(value))
			}
		}
	}
}

/// Literal text or a named argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Root,
	Literal(String),
	Argument { name: String, ty: ArgumentType },
}

/// A built node of the command tree.
pub struct CommandNode<S> {
	kind: NodeKind,
	requirement: Option<Requirement<S>>,
	command: Option<Command<S>>,
	suggestions: Option<SuggestionProvider<S>>,
	children: Vec<CommandNode<S>>,
}

impl<S> CommandNode<S> {
	pub(crate) fn root() -> Self {
		Self {
			kind: NodeKind::Root,
			requirement: None,
			command: None,
			suggestions: None,
			children: Vec::new(),
		}
	}

	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	/// Literal text or argument name.
	pub fn name(&self) -> &str {
		match &self.kind {
			NodeKind::Root => "",
			NodeKind::Literal(name) | NodeKind::Argument { name, .. } => name,
		}
	}

	pub fn children(&self) -> &[CommandNode<S>] {
		&self.children
	}

	pub fn child(&self, name: &str) -> Option<&CommandNode<S>> {
		self.children.iter().find(|c| c.name() == name)
	}

	pub fn command(&self) -> Option<&Command<S>> {
		self.command.as_ref()
	}

	pub fn can_use(&self, source: &S) -> bool {
		self.requirement.as_ref().is_none_or(|requirement| requirement(source))
	}

	pub(crate) fn suggestions(&self) -> Option<&SuggestionProvider<S>> {
		self.suggestions.as_ref()
	}

	pub(crate) fn is_root(&self) -> bool {
		self.kind == NodeKind::Root
	}

	/// Adds `child`, merging it into an existing node of the same kind.
	///
	/// On merge the existing requirement is kept, a new command replaces the
	/// old one and grandchildren merge recursively.
	pub fn add_child(&mut self, child: CommandNode<S>) {
		match self.children.iter_mut().find(|existing| existing.kind == child.kind) {
			Some(existing) => {
				if child.command.is_some() {
					existing.command = child.command;
				}
				if existing.suggestions.is_none() {
					existing.suggestions = child.suggestions;
				}
				for grandchild in child.children {
					existing.add_child(grandchild);
				}
			}
			None => self.children.push(child),
		}
	}

	/// Children worth trying at the reader position: literals matching the
	/// next word exactly, or all argument nodes if no literal matches.
	pub(crate) fn relevant_children(&self, reader: &StringReader<'_>) -> Vec<&CommandNode<S>> {
		let word = {
			let rest = reader.remaining();
			&rest[..rest.find(' ').unwrap_or(rest.len())]
		};
		let literals: Vec<_> = self
			.children
			.iter()
			.filter(|c| matches!(&c.kind, NodeKind::Literal(name) if name == word))
			.collect();
		if !literals.is_empty() {
			return literals;
		}
		self.children.iter().filter(|c| matches!(c.kind, NodeKind::Argument { .. })).collect()
	}

	/// Consumes this node's token, recording argument values.
	pub(crate) fn parse_token(&self, reader: &mut StringReader<'_>, arguments: &mut HashMap<String, ParsedArgument>) -> Result<(), DispatchError> {
		match &self.kind {
			NodeKind::Root => Ok(()),
			NodeKind::Literal(name) => {
				let cursor = reader.cursor();
				if reader.read_unquoted() == name {
					Ok(())
				} else {
					Err(DispatchError::UnknownCommand { cursor })
				}
			}
			NodeKind::Argument { name, ty } => {
				let value = ty.parse(name, reader)?;
				arguments.insert(name.clone(), value);
				Ok(())
			}
		}
	}
}

impl<S> Clone for CommandNode<S> {
	fn clone(&self) -> Self {
		Self {
			kind: self.kind.clone(),
			requirement: self.requirement.clone(),
			command: self.command.clone(),
			suggestions: self.suggestions.clone(),
			children: self.children.clone(),
		}
	}
}

impl<S> fmt::Debug for CommandNode<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandNode")
			.field("kind", &self.kind)
			.field("executable", &self.command.is_some())
			.field("children", &self.children)
			.finish()
	}
}

/// Builder for a literal or argument node and its subtree.
pub struct NodeBuilder<S> {
	node: CommandNode<S>,
}

impl<S> Clone for NodeBuilder<S> {
	fn clone(&self) -> Self {
		Self { node: self.node.clone() }
	}
}

/// Starts a literal node matching `name` exactly.
pub fn literal<S>(name: impl Into<String>) -> NodeBuilder<S> {
	NodeBuilder {
		node: CommandNode {
			kind: NodeKind::Literal(name.into()),
			..CommandNode::root()
		},
	}
}

/// Starts an argument node.
pub fn argument<S>(name: impl Into<String>, ty: ArgumentType) -> NodeBuilder<S> {
	NodeBuilder {
		node: CommandNode {
			kind: NodeKind::Argument { name: name.into(), ty },
			..CommandNode::root()
		},
	}
}

impl<S> NodeBuilder<S> {
	pub fn requires(self, requirement: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
		self.requirement(Arc::new(requirement))
	}

	pub fn requirement(mut self, requirement: Requirement<S>) -> Self {
		self.node.requirement = Some(requirement);
		self
	}

	pub fn executes(self, command: impl for<'a> Fn(&CommandContext<'a, S>) -> Result<i32, CommandFailure> + Send + Sync + 'static) -> Self {
		self.command(Arc::new(command))
	}

	pub fn command(mut self, command: Command<S>) -> Self {
		self.node.command = Some(command);
		self
	}

	pub fn suggests(self, provider: impl for<'a> Fn(&CommandContext<'a, S>) -> Vec<String> + Send + Sync + 'static) -> Self {
		self.suggestion_provider(Arc::new(provider))
	}

	pub fn suggestion_provider(mut self, provider: SuggestionProvider<S>) -> Self {
		self.node.suggestions = Some(provider);
		self
	}

	pub fn then(mut self, child: NodeBuilder<S>) -> Self {
		self.node.add_child(child.build());
		self
	}

	pub fn name(&self) -> &str {
		self.node.name()
	}

	pub fn build(self) -> CommandNode<S> {
		self.node
	}
}

impl<S> fmt::Debug for NodeBuilder<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("NodeBuilder").field(&self.node).finish()
	}
}
