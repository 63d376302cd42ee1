//! Command modules: named groups of handlers and nested modules.
//!
//! [`CommandModule::build`] compiles a module into one gated literal per name
//! and alias. Beneath each literal sit a `help [page]` subcommand, every
//! child's subtrees, and a command on the literal itself that shows the first
//! help page.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use herald_grammar::{ArgumentType, Command, CommandContext, NodeBuilder, Requirement, argument, literal};
use tracing::debug;

use crate::error::BuildError;
use crate::handler::{Handler, Pipeline};
use crate::help::{HelpEntry, HelpPage, Usage};
use crate::message::{MessageFunction, SourcePredicate};
use crate::root::Shared;
use crate::source::{CommandSource, SenderKinds, SourceMapper};

enum Child<W> {
	Module(CommandModule<W>),
	Handler(Handler<W>),
}

/// A child with its handler compiled.
enum Compiled<'a, W> {
	Module(&'a CommandModule<W>),
	Handler(&'a Handler<W>, Arc<Pipeline<W>>),
}

/// A named command grouping handlers and nested modules.
///
/// Created by [`crate::CommandRoot::module`] and configured in place:
///
/// ```rust,no_run
/// use herald_command::{CommandRoot, CommandSource, Handler};
///
/// # fn declare<W: CommandSource + 'static>(root: &CommandRoot, print: Handler<W>, die: Handler<W>) {
/// let mut module = root.module::<W>("mycommand");
/// module
/// 	.aliases(["my"])
/// 	.executes([print])
/// 	.child("child", |child| {
/// 		child.permission("test.child").executes([die]);
/// 	});
/// # }
/// ```
pub struct CommandModule<W> {
	shared: Arc<Shared>,
	name: String,
	help_name: Option<String>,
	aliases: Vec<String>,
	permission: Option<String>,
	predicate: SourcePredicate<W>,
	description: Option<MessageFunction<W>>,
	senders: SenderKinds,
	children: Vec<Child<W>>,
}

impl<W: CommandSource + 'static> CommandModule<W> {
	pub(crate) fn new(shared: Arc<Shared>, name: String) -> Self {
		Self {
			shared,
			name,
			help_name: None,
			aliases: Vec::new(),
			permission: None,
			predicate: Arc::new(|_| true),
			description: None,
			senders: SenderKinds::default(),
			children: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn aliases<I>(&mut self, aliases: I) -> &mut Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.aliases = aliases.into_iter().map(Into::into).collect();
		self
	}

	/// Permission required to use the module. `help` additionally requires
	/// `<permission>.help`.
	pub fn permission(&mut self, permission: impl Into<String>) -> &mut Self {
		self.permission = Some(permission.into());
		self
	}

	/// Requires `predicate` on top of the current condition.
	pub fn and_predicate(&mut self, predicate: impl Fn(&W) -> bool + Send + Sync + 'static) -> &mut Self {
		let old = self.predicate.clone();
		self.predicate = Arc::new(move |source| old(source) && predicate(source));
		self
	}

	/// Accepts sources matching either the current condition or `predicate`.
	pub fn or_predicate(&mut self, predicate: impl Fn(&W) -> bool + Send + Sync + 'static) -> &mut Self {
		let old = self.predicate.clone();
		self.predicate = Arc::new(move |source| old(source) || predicate(source));
		self
	}

	pub fn senders(&mut self, senders: SenderKinds) -> &mut Self {
		self.senders = senders;
		self
	}

	pub fn description(&mut self, description: impl Into<MessageFunction<W>>) -> &mut Self {
		self.description = Some(description.into());
		self
	}

	/// Name shown before child names in help, `/<help name> <child>`.
	/// Defaults to the module name.
	pub fn help_name(&mut self, help_name: impl Into<String>) -> &mut Self {
		self.help_name = Some(help_name.into());
		self
	}

	fn display_name(&self) -> &str {
		self.help_name.as_deref().unwrap_or(&self.name)
	}

	/// Adds a nested module named `name`, configured by `configure`.
	pub fn child(&mut self, name: impl Into<String>, configure: impl FnOnce(&mut CommandModule<W>)) -> &mut Self {
		let name = name.into();
		let mut child = CommandModule::new(self.shared.clone(), name.clone());
		child.help_name(format!("{} {name}", self.display_name()));
		configure(&mut child);
		self.children.push(Child::Module(child));
		self
	}

	/// Adds leaf commands.
	pub fn executes(&mut self, handlers: impl IntoIterator<Item = Handler<W>>) -> &mut Self {
		self.children.extend(handlers.into_iter().map(Child::Handler));
		self
	}

	/// Number of help pages: one per six children.
	pub fn max_page(&self) -> usize {
		crate::help::max_page(self.children.len())
	}

	/// Sends help page `page` to `source`. Pages outside `1..=max_page` are
	/// clamped.
	///
	/// # Errors
	///
	/// Any [`BuildError`] of the module's handlers.
	pub fn show_help(&self, page: i64, source: &W) -> Result<(), BuildError> {
		self.help_page(&self.compile()?).show(page, source);
		Ok(())
	}

	/// Compiles the module into one literal per name and alias.
	///
	/// `mapper` turns grammar sources into command sources; a source it maps
	/// to `None` fails every requirement of the tree.
	///
	/// # Errors
	///
	/// The first [`BuildError`] of any handler in the tree, or
	/// [`BuildError::DuplicateChild`] if two children of a module share a
	/// name or alias or a child is named `help`.
	pub fn build<S: 'static>(&self, mapper: impl Fn(&S) -> Option<W> + Send + Sync + 'static) -> Result<Vec<NodeBuilder<S>>, BuildError> {
		self.build_with(&(Arc::new(mapper) as SourceMapper<S, W>))
	}

	fn build_with<S: 'static>(&self, mapper: &SourceMapper<S, W>) -> Result<Vec<NodeBuilder<S>>, BuildError> {
		let compiled = self.compile()?;
		let mut subtrees = Vec::new();
		for child in &compiled {
			match child {
				Compiled::Module(module) => subtrees.extend(module.build_with(mapper)?),
				Compiled::Handler(_, pipeline) => subtrees.extend(pipeline.nodes(mapper)),
			}
		}

		let page = Arc::new(self.help_page(&compiled));
		let last_page = i64::try_from(page.max_page().max(1)).unwrap_or(i64::MAX);
		let gate = self.gate(mapper, "");
		let help_gate = self.gate(mapper, ".help");

		let help = literal("help")
			.requirement(help_gate)
			.command(help_command(&page, mapper, 1))
			.then(argument("page", ArgumentType::integer(1, last_page)).command(help_command(&page, mapper, 1)));

		let roots: Vec<NodeBuilder<S>> = std::iter::once(&self.name)
			.chain(&self.aliases)
			.map(|name| {
				let mut node = literal(name.as_str())
					.requirement(gate.clone())
					.command(help_command(&page, mapper, 0))
					.then(help.clone());
				for subtree in &subtrees {
					node = node.then(subtree.clone());
				}
				node
			})
			.collect();
		debug!(module = %self.name, roots = roots.len(), children = compiled.len(), "command module built");
		Ok(roots)
	}

	fn compile(&self) -> Result<Vec<Compiled<'_, W>>, BuildError> {
		let mut compiled = Vec::with_capacity(self.children.len());
		let mut taken = HashSet::from(["help"]);
		for child in &self.children {
			let (name, aliases) = match child {
				Child::Module(module) => (module.name.as_str(), module.aliases.as_slice()),
				Child::Handler(handler) => (handler.name(), handler.alias_names()),
			};
			for name in std::iter::once(name).chain(aliases.iter().map(String::as_str)) {
				if !taken.insert(name) {
					return Err(BuildError::DuplicateChild {
						module: self.name.clone(),
						name: name.to_string(),
					});
				}
			}
			compiled.push(match child {
				Child::Module(module) => Compiled::Module(module),
				Child::Handler(handler) => Compiled::Handler(handler, Arc::new(Pipeline::compile(handler, self.shared.clone())?)),
			});
		}
		Ok(compiled)
	}

	fn help_page(&self, compiled: &[Compiled<'_, W>]) -> HelpPage<W> {
		let entries = compiled
			.iter()
			.map(|child| match child {
				Compiled::Module(module) => module.help_entry(),
				Compiled::Handler(handler, pipeline) => HelpEntry {
					name: handler.name().to_string(),
					aliases: handler.alias_names().to_vec(),
					permission: handler.permission_node().map(str::to_string),
					description: handler.description().clone(),
					usage: Usage::Labels(pipeline.usage()),
				},
			})
			.collect();
		HelpPage::new(self.display_name().to_string(), entries, self.shared.clone())
	}

	fn help_entry(&self) -> HelpEntry<W> {
		let names = self
			.children
			.iter()
			.map(|child| match child {
				Child::Module(module) => module.name.clone(),
				Child::Handler(handler) => handler.name().to_string(),
			})
			.collect();
		HelpEntry {
			name: self.name.clone(),
			aliases: self.aliases.clone(),
			permission: self.permission.clone(),
			description: self
				.description
				.clone()
				.unwrap_or_else(|| MessageFunction::new(self.shared.messages.unknown_description.clone())),
			usage: Usage::Children(names),
		}
	}

	/// Mapped source exists, passes the predicate, holds the permission (with
	/// `suffix` appended) and has an allowed type.
	fn gate<S: 'static>(&self, mapper: &SourceMapper<S, W>, suffix: &str) -> Requirement<S> {
		let mapper = mapper.clone();
		let predicate = self.predicate.clone();
		let permission = self.permission.as_ref().map(|p| format!("{p}{suffix}"));
		let senders = self.senders;
		Arc::new(move |source: &S| {
			mapper(source).is_some_and(|source| {
				predicate(&source) && permission.as_deref().is_none_or(|p| source.has_permission(p)) && senders.allows(source.sender_type())
			})
		})
	}
}

impl<W> fmt::Debug for CommandModule<W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandModule")
			.field("name", &self.name)
			.field("aliases", &self.aliases)
			.field("permission", &self.permission)
			.field("senders", &self.senders)
			.field("children", &self.children.len())
			.finish_non_exhaustive()
	}
}

/// Shows the page given by the `page` argument, or `default` without one.
fn help_command<S: 'static, W: CommandSource + 'static>(page: &Arc<HelpPage<W>>, mapper: &SourceMapper<S, W>, default: i64) -> Command<S> {
	let page = page.clone();
	let mapper = mapper.clone();
	Arc::new(move |ctx: &CommandContext<'_, S>| {
		if let Some(source) = mapper(ctx.source()) {
			page.show(ctx.get_integer("page").unwrap_or(default), &source);
		}
		Ok(0)
	})
}
