//! Leaf commands.
//!
//! A [`Handler`] records what a command needs: its names, gate and an
//! ordered list of parameters. Building a module compiles each handler into a
//! [`Pipeline`], which resolves serializers, checks parameter positions and
//! produces the grammar chain `name arg1 .. argN` for the name and each alias.
//!
//! Every node of the chain runs the same invocation. A missing required
//! argument therefore answers with the parameter's null message instead of
//! a generic grammar error, and an optional last parameter gets its shorter
//! path for free.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use herald_grammar::{ArgumentType, Command, CommandContext, CommandFailure, NodeBuilder, Requirement, argument, literal};
use herald_locale::MessageKey;
use herald_text::Text;
use tracing::debug;

use crate::error::BuildError;
use crate::message::MessageFunction;
use crate::root::Shared;
use crate::serializer::{ArgValue, Serializer};
use crate::source::{CommandSource, SenderKinds, SourceMapper};

/// Body of a handler. Errors are passed to the root's exception handlers.
pub type HandlerBody<W> = Arc<dyn for<'a> Fn(&Arguments<'a, W>) -> anyhow::Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
	Source,
	Typed {
		type_id: TypeId,
		type_name: &'static str,
		nullable: bool,
		optional: bool,
		variadic: bool,
	},
}

#[derive(Debug, Clone)]
struct Param {
	name: String,
	kind: ParamKind,
}

/// Declaration of one leaf command.
///
/// ```rust
/// use herald_command::{CommandSource, Handler};
/// # fn declare<W: CommandSource>(description: herald_locale::MessageKey) -> Handler<W> {
/// Handler::<W>::new("echo", description)
/// 	.permission("demo.echo")
/// 	.source()
/// 	.param::<String>("name")
/// 	.optional_variadic::<String>("note")
/// 	.executes(|args| {
/// 		let name = args.get::<String>("name").map_or("", String::as_str);
/// 		let note = args.get::<String>("note").map_or("", String::as_str);
/// 		args.source().audience().send_message(format!("{name}: {note}").into());
/// 		Ok(())
/// 	})
/// # }
/// ```
pub struct Handler<W> {
	name: String,
	aliases: Vec<String>,
	permission: Option<String>,
	senders: SenderKinds,
	description: MessageFunction<W>,
	params: Vec<Param>,
	body: Option<HandlerBody<W>>,
}

impl<W> Handler<W> {
	pub fn new(name: impl Into<String>, description: impl Into<MessageFunction<W>>) -> Self {
		Self {
			name: name.into(),
			aliases: Vec::new(),
			permission: None,
			senders: SenderKinds::default(),
			description: description.into(),
			params: Vec::new(),
			body: None,
		}
	}

	pub fn aliases<I>(mut self, aliases: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.aliases.extend(aliases.into_iter().map(Into::into));
		self
	}

	pub fn permission(mut self, permission: impl Into<String>) -> Self {
		self.permission = Some(permission.into());
		self
	}

	/// Restricts the sender types allowed to run this command.
	pub fn senders(mut self, senders: SenderKinds) -> Self {
		self.senders = senders;
		self
	}

	/// Adds a parameter bound to the invoking source.
	pub fn source(mut self) -> Self {
		self.params.push(Param {
			name: "source".into(),
			kind: ParamKind::Source,
		});
		self
	}

	/// Adds a required parameter of type `T`.
	pub fn param<T: Any>(self, name: impl Into<String>) -> Self {
		self.typed::<T>(name.into(), false, false, false)
	}

	/// Adds a required parameter that resolves to `None` instead of
	/// rejecting the invocation when its token does not parse. A missing
	/// token is still rejected.
	pub fn nullable_param<T: Any>(self, name: impl Into<String>) -> Self {
		self.typed::<T>(name.into(), true, false, false)
	}

	/// Adds a parameter that may be left out. Must be the last parameter.
	pub fn optional<T: Any>(self, name: impl Into<String>) -> Self {
		self.typed::<T>(name.into(), false, true, false)
	}

	/// Adds a parameter taking the rest of the input. Must be the last
	/// parameter.
	pub fn variadic<T: Any>(self, name: impl Into<String>) -> Self {
		self.typed::<T>(name.into(), false, false, true)
	}

	/// Adds a parameter taking the rest of the input, if any. Must be the
	/// last parameter.
	pub fn optional_variadic<T: Any>(self, name: impl Into<String>) -> Self {
		self.typed::<T>(name.into(), false, true, true)
	}

	fn typed<T: Any>(mut self, name: String, nullable: bool, optional: bool, variadic: bool) -> Self {
		self.params.push(Param {
			name,
			kind: ParamKind::Typed {
				type_id: TypeId::of::<T>(),
				type_name: type_name::<T>(),
				nullable,
				optional,
				variadic,
			},
		});
		self
	}

	pub fn executes(mut self, body: impl for<'a> Fn(&Arguments<'a, W>) -> anyhow::Result<()> + Send + Sync + 'static) -> Self {
		self.body = Some(Arc::new(body));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn alias_names(&self) -> &[String] {
		&self.aliases
	}

	pub(crate) fn permission_node(&self) -> Option<&str> {
		self.permission.as_deref()
	}

	pub(crate) fn description(&self) -> &MessageFunction<W> {
		&self.description
	}
}

impl<W> fmt::Debug for Handler<W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handler")
			.field("name", &self.name)
			.field("aliases", &self.aliases)
			.field("permission", &self.permission)
			.field("senders", &self.senders)
			.field("params", &self.params)
			.finish_non_exhaustive()
	}
}

enum Resolved {
	Source,
	Value(Option<ArgValue>),
}

/// Values handed to a handler body, positionally matching its parameters.
pub struct Arguments<'a, W> {
	source: &'a W,
	names: Vec<&'a str>,
	values: Vec<Resolved>,
}

impl<'a, W> Arguments<'a, W> {
	pub fn source(&self) -> &'a W {
		self.source
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Whether the parameter at `index` is bound to the source.
	pub fn is_source(&self, index: usize) -> bool {
		matches!(self.values.get(index), Some(Resolved::Source))
	}

	/// Value of the parameter at `index`; `None` if it was left out, failed
	/// a nullable parse, is the source slot, or is not a `T`.
	pub fn at<T: Any>(&self, index: usize) -> Option<&T> {
		match self.values.get(index)? {
			Resolved::Value(Some(value)) => (**value).downcast_ref::<T>(),
			Resolved::Value(None) | Resolved::Source => None,
		}
	}

	/// Value of the parameter called `name`. See [`Self::at`].
	pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
		self.at(self.names.iter().position(|n| *n == name)?)
	}
}

impl<W> fmt::Debug for Arguments<'_, W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let present: Vec<_> = self
			.names
			.iter()
			.zip(&self.values)
			.map(|(name, value)| (*name, matches!(value, Resolved::Value(Some(_)))))
			.collect();
		f.debug_struct("Arguments").field("present", &present).finish_non_exhaustive()
	}
}

struct TypedSlot {
	name: String,
	serializer: Arc<Serializer>,
	nullable: bool,
	optional: bool,
	variadic: bool,
}

enum Slot {
	Source(String),
	Typed(TypedSlot),
}

impl Slot {
	fn name(&self) -> &str {
		match self {
			Slot::Source(name) => name,
			Slot::Typed(typed) => &typed.name,
		}
	}
}

/// A usage label of a compiled handler: the label message plus the
/// serializer whose suggestions the label's hover lists.
pub(crate) struct UsageLabel {
	pub(crate) label: MessageKey,
	pub(crate) serializer: Arc<Serializer>,
}

/// A handler with its serializers resolved, ready to emit grammar nodes.
pub(crate) struct Pipeline<W> {
	name: String,
	aliases: Vec<String>,
	permission: Option<String>,
	senders: SenderKinds,
	slots: Vec<Slot>,
	body: HandlerBody<W>,
	shared: Arc<Shared>,
}

impl<W: CommandSource + 'static> Pipeline<W> {
	/// Validates `handler` and resolves a serializer for each typed parameter.
	///
	/// # Errors
	///
	/// [`BuildError::MissingBody`], [`BuildError::DuplicateParameter`],
	/// [`BuildError::InvalidPosition`] for an optional or variadic parameter
	/// that is not last, and [`BuildError::SerializerNotFound`].
	pub(crate) fn compile(handler: &Handler<W>, shared: Arc<Shared>) -> Result<Self, BuildError> {
		let Some(body) = handler.body.clone() else {
			return Err(BuildError::MissingBody { handler: handler.name.clone() });
		};
		let last = handler.params.len().saturating_sub(1);
		let mut slots = Vec::with_capacity(handler.params.len());
		for (index, param) in handler.params.iter().enumerate() {
			let ParamKind::Typed {
				type_id,
				type_name,
				nullable,
				optional,
				variadic,
			} = param.kind
			else {
				slots.push(Slot::Source(param.name.clone()));
				continue;
			};
			if slots.iter().any(|slot| matches!(slot, Slot::Typed(typed) if typed.name == param.name)) {
				return Err(BuildError::DuplicateParameter {
					handler: handler.name.clone(),
					parameter: param.name.clone(),
				});
			}
			if (optional || variadic) && index < last {
				return Err(BuildError::InvalidPosition {
					handler: handler.name.clone(),
					parameter: param.name.clone(),
				});
			}
			let serializer = shared.serializers.find_by_id(type_id).ok_or_else(|| BuildError::SerializerNotFound {
				handler: handler.name.clone(),
				parameter: param.name.clone(),
				type_name,
			})?;
			slots.push(Slot::Typed(TypedSlot {
				name: param.name.clone(),
				serializer,
				nullable,
				optional,
				variadic,
			}));
		}
		Ok(Self {
			name: handler.name.clone(),
			aliases: handler.aliases.clone(),
			permission: handler.permission.clone(),
			senders: handler.senders,
			slots,
			body,
			shared,
		})
	}

	/// Labels shown in help: the optional label for an optional parameter,
	/// the required label otherwise. Source parameters have none.
	pub(crate) fn usage(&self) -> Vec<UsageLabel> {
		self.slots
			.iter()
			.filter_map(|slot| match slot {
				Slot::Source(_) => None,
				Slot::Typed(typed) => Some(UsageLabel {
					label: if typed.optional {
						typed.serializer.optional_label().clone()
					} else {
						typed.serializer.required_label().clone()
					},
					serializer: typed.serializer.clone(),
				}),
			})
			.collect()
	}

	/// Emits one gated literal chain for the name and each alias.
	pub(crate) fn nodes<S: 'static>(self: &Arc<Self>, mapper: &SourceMapper<S, W>) -> Vec<NodeBuilder<S>> {
		let command = self.command(mapper);
		let gate = self.gate(mapper);
		std::iter::once(&self.name)
			.chain(&self.aliases)
			.map(|name| {
				let node = literal(name.as_str()).requirement(gate.clone()).command(command.clone());
				match self.arguments(mapper, &command) {
					Some(chain) => node.then(chain),
					None => node,
				}
			})
			.collect()
	}

	/// Mapped source exists, holds the permission and has an allowed type.
	fn gate<S: 'static>(&self, mapper: &SourceMapper<S, W>) -> Requirement<S> {
		let mapper = mapper.clone();
		let permission = self.permission.clone();
		let senders = self.senders;
		Arc::new(move |source: &S| {
			mapper(source).is_some_and(|source| {
				permission.as_deref().is_none_or(|p| source.has_permission(p)) && senders.allows(source.sender_type())
			})
		})
	}

	fn command<S: 'static>(self: &Arc<Self>, mapper: &SourceMapper<S, W>) -> Command<S> {
		let pipeline = self.clone();
		let mapper = mapper.clone();
		Arc::new(move |ctx: &CommandContext<'_, S>| match mapper(ctx.source()) {
			Some(source) => pipeline.run(ctx, &source),
			None => Ok(0),
		})
	}

	/// Argument nodes for the typed parameters, nested first to last.
	fn arguments<S: 'static>(&self, mapper: &SourceMapper<S, W>, command: &Command<S>) -> Option<NodeBuilder<S>> {
		let mut chain: Option<NodeBuilder<S>> = None;
		for slot in self.slots.iter().rev() {
			let Slot::Typed(typed) = slot else {
				continue;
			};
			let ty = if typed.variadic { ArgumentType::Greedy } else { ArgumentType::String };
			let serializer = typed.serializer.clone();
			let mapper = mapper.clone();
			let node = argument(typed.name.as_str(), ty)
				.suggests(move |ctx| mapper(ctx.source()).map(|source| serializer.suggest(&source)).unwrap_or_default())
				.command(command.clone());
			chain = Some(match chain {
				Some(child) => node.then(child),
				None => node,
			});
		}
		chain
	}

	/// Parses every slot and runs the body.
	///
	/// A missing token for a required slot, or a token that does not parse
	/// for a slot that is not nullable, sends that slot's null message and
	/// skips the body.
	fn run<S>(&self, ctx: &CommandContext<'_, S>, source: &W) -> Result<i32, CommandFailure> {
		let mut values = Vec::with_capacity(self.slots.len());
		for slot in &self.slots {
			let typed = match slot {
				Slot::Source(_) => {
					values.push(Resolved::Source);
					continue;
				}
				Slot::Typed(typed) => typed,
			};
			let value = match ctx.get_string(&typed.name) {
				None if typed.optional => None,
				None => {
					self.reject(source, typed, "");
					return Ok(0);
				}
				Some(raw) => match typed.serializer.parse(source, raw) {
					Some(value) => Some(value),
					None if typed.nullable => None,
					None => {
						self.reject(source, typed, raw);
						return Ok(0);
					}
				},
			};
			values.push(Resolved::Value(value));
		}

		let arguments = Arguments {
			source,
			names: self.slots.iter().map(Slot::name).collect(),
			values,
		};
		match (self.body)(&arguments) {
			Ok(()) => Ok(1),
			Err(error) => {
				debug!(command = %self.name, error = %format!("{error:#}"), "command body failed");
				self.shared.report(&error);
				Err(CommandFailure(format!("{error:#}")))
			}
		}
	}

	fn reject(&self, source: &W, slot: &TypedSlot, raw: &str) {
		debug!(command = %self.name, parameter = %slot.name, raw, "argument rejected");
		let message = self.shared.find(source, slot.serializer.null_message());
		let message = message.replace_with(&mut |name| (name == "value").then(|| Text::new(raw)));
		source.audience().send_message(message);
	}
}
