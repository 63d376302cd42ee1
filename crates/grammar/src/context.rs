use std::collections::HashMap;

/// Value parsed for an argument node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedArgument {
	String(String),
	Integer(i64),
}

/// What a command callback or suggestion provider sees: the source, the
/// input line and the arguments parsed so far.
#[derive(Debug)]
pub struct CommandContext<'a, S> {
	source: &'a S,
	input: &'a str,
	arguments: HashMap<String, ParsedArgument>,
}

impl<'a, S> CommandContext<'a, S> {
	pub(crate) fn new(source: &'a S, input: &'a str, arguments: HashMap<String, ParsedArgument>) -> Self {
		Self { source, input, arguments }
	}

	pub fn source(&self) -> &'a S {
		self.source
	}

	pub fn input(&self) -> &'a str {
		self.input
	}

	pub fn has(&self, name: &str) -> bool {
		self.arguments.contains_key(name)
	}

	/// Raw text of a string argument, `None` if absent or not a string.
	pub fn get_string(&self, name: &str) -> Option<&str> {
		match self.arguments.get(name)? {
			ParsedArgument::String(s) => Some(s),
			ParsedArgument::Integer(_) => None,
		}
	}

	pub fn get_integer(&self, name: &str) -> Option<i64> {
		match self.arguments.get(name)? {
			ParsedArgument::Integer(n) => Some(*n),
			ParsedArgument::String(_) => None,
		}
	}
}
