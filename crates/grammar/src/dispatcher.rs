use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::context::{CommandContext, ParsedArgument};
use crate::error::DispatchError;
use crate::node::{CommandNode, NodeBuilder, NodeKind};
use crate::reader::StringReader;

/// Result of walking the tree over an input line.
struct Parsed<'n, S> {
	node: &'n CommandNode<S>,
	arguments: HashMap<String, ParsedArgument>,
}

/// Root of a command tree; parses input lines and runs the matched command.
pub struct Dispatcher<S> {
	root: CommandNode<S>,
}

impl<S> Default for Dispatcher<S> {
	fn default() -> Self {
		Self { root: CommandNode::root() }
	}
}

impl<S> Dispatcher<S> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a top-level literal, merging with an existing one of the
	/// same name.
	pub fn register(&mut self, command: NodeBuilder<S>) {
		self.root.add_child(command.build());
	}

	pub fn root(&self) -> &CommandNode<S> {
		&self.root
	}

	/// Parses `input` as `source` and runs the command it ends on.
	///
	/// # Errors
	///
	/// Parse errors, [`DispatchError::IncompleteCommand`] if the matched node
	/// has no command, or [`DispatchError::Execution`] if the command failed.
	pub fn execute(&self, input: &str, source: &S) -> Result<i32, DispatchError> {
		let parsed = self.parse(input, source)?;
		let Some(command) = parsed.node.command() else {
			return Err(DispatchError::IncompleteCommand);
		};
		let context = CommandContext::new(source, input, parsed.arguments);
		let result = command(&context).map_err(DispatchError::from);
		if let Err(error) = &result {
			trace!(%input, %error, "command failed");
		}
		result
	}

	/// Completion candidates for the last, possibly partial, word of `input`.
	pub fn suggest(&self, input: &str, source: &S) -> Vec<String> {
		let split = input.rfind(' ').map_or(0, |i| i + 1);
		let (prefix, partial) = input.split_at(split);
		let Ok(parsed) = self.parse(prefix.trim_end(), source) else {
			return Vec::new();
		};
		let context = CommandContext::new(source, input, parsed.arguments);
		let partial_lower = partial.to_lowercase();

		let mut out = Vec::new();
		for child in parsed.node.children() {
			if !child.can_use(source) {
				continue;
			}
			match child.kind() {
				NodeKind::Literal(name) => {
					if name.starts_with(partial) {
						out.push(name.clone());
					}
				}
				NodeKind::Argument { .. } => {
					if let Some(provider) = child.suggestions() {
						out.extend(provider(&context).into_iter().filter(|s| s.to_lowercase().starts_with(&partial_lower)));
					}
				}
				NodeKind::Root => {}
			}
		}
		out
	}

	fn parse<'n>(&'n self, input: &str, source: &S) -> Result<Parsed<'n, S>, DispatchError> {
		walk(&self.root, StringReader::new(input), source, HashMap::new())
	}
}

impl<S> fmt::Debug for Dispatcher<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher").field("root", &self.root).finish()
	}
}

/// Depth-first walk with backtracking across sibling branches.
///
/// `reader` sits just after `node`'s own token. Succeeds once the whole input
/// is consumed; trailing spaces are ignored.
fn walk<'n, S>(
	node: &'n CommandNode<S>,
	mut reader: StringReader<'_>,
	source: &S,
	arguments: HashMap<String, ParsedArgument>,
) -> Result<Parsed<'n, S>, DispatchError> {
	if !node.is_root() && reader.can_read() {
		if reader.peek() != Some(' ') {
			return Err(DispatchError::UnknownArgument { cursor: reader.cursor() });
		}
		reader.skip();
	}
	if reader.remaining().trim().is_empty() {
		return Ok(Parsed { node, arguments });
	}

	let start = reader.cursor();
	let mut best: Option<DispatchError> = None;
	for child in node.relevant_children(&reader) {
		if !child.can_use(source) {
			continue;
		}
		let mut branch = reader.clone();
		let mut branch_args = arguments.clone();
		let attempt = child
			.parse_token(&mut branch, &mut branch_args)
			.and_then(|()| walk(child, branch, source, branch_args));
		match attempt {
			Ok(parsed) => return Ok(parsed),
			Err(error) => {
				if best.as_ref().is_none_or(|b| error.cursor() >= b.cursor()) {
					best = Some(error);
				}
			}
		}
	}

	Err(best.unwrap_or(if node.is_root() {
		DispatchError::UnknownCommand { cursor: start }
	} else {
		DispatchError::UnknownArgument { cursor: start }
	}))
}
