//! Typed parameter parsing.
//!
//! A [`Serializer`] turns the raw token of one command parameter into a value
//! of a concrete type and knows how to present that parameter in help pages.
//! [`SerializerRegistry`] picks one per parameter type by exact [`TypeId`].

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use herald_locale::{MessageCatalog, MessageKey};
use herald_text::{Color, Text};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::CommandSource;

/// Key of the null message used by serializers that do not declare one.
pub const NULL_OBJECT_KEY: &str = "internal.null.object";

/// A parsed parameter value.
pub type ArgValue = Box<dyn Any + Send + Sync>;

type ParseFn = Arc<dyn Fn(&dyn CommandSource, &str) -> Option<ArgValue> + Send + Sync>;
type SuggestFn = Arc<dyn Fn(&dyn CommandSource) -> Vec<String> + Send + Sync>;

/// Parser, suggestions and help labels for one parameter type.
pub struct Serializer {
	name: String,
	type_id: TypeId,
	type_name: &'static str,
	parse: ParseFn,
	suggest: SuggestFn,
	required: MessageKey,
	optional: MessageKey,
	null_message: MessageKey,
}

impl Serializer {
	/// Starts a serializer for `T` named `name`.
	///
	/// `parse` returns `None` for tokens that do not denote a value; the
	/// invocation then answers with the null message instead of running.
	pub fn builder<T: Any + Send + Sync>(name: impl Into<String>, parse: impl Fn(&dyn CommandSource, &str) -> Option<T> + Send + Sync + 'static) -> SerializerBuilder {
		SerializerBuilder {
			name: name.into(),
			type_id: TypeId::of::<T>(),
			type_name: type_name::<T>(),
			parse: Arc::new(move |source, raw| parse(source, raw).map(|value| Box::new(value) as ArgValue)),
			suggest: None,
			null_message: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn parse(&self, source: &dyn CommandSource, raw: &str) -> Option<ArgValue> {
		(self.parse)(source, raw)
	}

	pub fn suggest(&self, source: &dyn CommandSource) -> Vec<String> {
		(self.suggest)(source)
	}

	/// Help label for a required parameter, `(name)` by default.
	pub fn required_label(&self) -> &MessageKey {
		&self.required
	}

	/// Help label for an optional parameter, `[name]` by default.
	pub fn optional_label(&self) -> &MessageKey {
		&self.optional
	}

	/// Sent when a token fails to parse; `[value]` is the raw token.
	pub fn null_message(&self) -> &MessageKey {
		&self.null_message
	}
}

impl fmt::Debug for Serializer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Serializer")
			.field("name", &self.name)
			.field("type", &self.type_name)
			.field("null_message", &self.null_message.key())
			.finish_non_exhaustive()
	}
}

/// Builder returned by [`Serializer::builder`].
pub struct SerializerBuilder {
	name: String,
	type_id: TypeId,
	type_name: &'static str,
	parse: ParseFn,
	suggest: Option<SuggestFn>,
	null_message: Option<MessageKey>,
}

impl SerializerBuilder {
	pub fn suggests(mut self, suggest: impl Fn(&dyn CommandSource) -> Vec<String> + Send + Sync + 'static) -> Self {
		self.suggest = Some(Arc::new(suggest));
		self
	}

	pub fn null_message(mut self, message: MessageKey) -> Self {
		self.null_message = Some(message);
		self
	}

	/// Declares the label messages in `catalog` and finishes the serializer.
	///
	/// Labels are keyed by name only, so a serializer replacing another one
	/// of the same name shares its labels.
	pub fn build(self, catalog: &MessageCatalog) -> Serializer {
		let name = self.name;
		let required = catalog.declare_or_get(format!("internal.type.{name}.required"), || Text::new(format!("({name})")).color(Color::Red));
		let optional = catalog.declare_or_get(format!("internal.type.{name}.optional"), || Text::new(format!("[{name}]")).color(Color::DarkAqua));
		let null_message = self.null_message.unwrap_or_else(|| catalog.declare_or_get(NULL_OBJECT_KEY, || Text::new("null.")));
		Serializer {
			name,
			type_id: self.type_id,
			type_name: self.type_name,
			parse: self.parse,
			suggest: self.suggest.unwrap_or_else(|| Arc::new(|_| Vec::new())),
			required,
			optional,
			null_message,
		}
	}
}

/// Serializers keyed by the exact type they produce, in registration order.
#[derive(Default)]
pub struct SerializerRegistry {
	serializers: RwLock<IndexMap<TypeId, Arc<Serializer>>>,
}

impl SerializerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry holding the built-in serializers for strings, numbers,
	/// `char` and `bool`.
	pub fn with_builtins(catalog: &MessageCatalog) -> Self {
		let registry = Self::new();
		for serializer in builtins(catalog) {
			registry.register(serializer);
		}
		registry
	}

	/// Registers `serializer` for its type, returning the one it replaces.
	pub fn register(&self, serializer: Serializer) -> Option<Arc<Serializer>> {
		self.serializers.write().insert(serializer.type_id, Arc::new(serializer))
	}

	pub fn find<T: Any>(&self) -> Option<Arc<Serializer>> {
		self.find_by_id(TypeId::of::<T>())
	}

	pub fn find_by_id(&self, type_id: TypeId) -> Option<Arc<Serializer>> {
		self.serializers.read().get(&type_id).cloned()
	}

	/// Names of all registered serializers in registration order.
	pub fn names(&self) -> Vec<String> {
		self.serializers.read().values().map(|s| s.name.clone()).collect()
	}

	pub fn len(&self) -> usize {
		self.serializers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.serializers.read().is_empty()
	}
}

impl fmt::Debug for SerializerRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerializerRegistry").field("names", &self.names()).finish()
	}
}

fn suggestions(values: &'static [&'static str]) -> impl Fn(&dyn CommandSource) -> Vec<String> + Send + Sync + 'static {
	move |_| values.iter().map(|s| (*s).to_string()).collect()
}

fn number<T: std::str::FromStr + Any + Send + Sync>(name: &str, samples: &'static [&'static str], catalog: &MessageCatalog) -> Serializer {
	Serializer::builder(name, |_, raw| raw.parse::<T>().ok())
		.suggests(suggestions(samples))
		.build(catalog)
}

fn builtins(catalog: &MessageCatalog) -> Vec<Serializer> {
	const INTEGERS: &[&str] = &["0", "1", "2"];
	const FLOATS: &[&str] = &["0.0", "1.0", "2.0"];
	vec![
		Serializer::builder("string", |_, raw| (raw != "null").then(|| raw.to_string()))
			.suggests(suggestions(&["string"]))
			.build(catalog),
		number::<i32>("integer", INTEGERS, catalog),
		number::<f64>("double", FLOATS, catalog),
		number::<f32>("float", FLOATS, catalog),
		number::<i64>("long", INTEGERS, catalog),
		number::<i16>("short", INTEGERS, catalog),
		number::<i8>("byte", INTEGERS, catalog),
		Serializer::builder("character", |_, raw| {
			let mut chars = raw.chars();
			match (chars.next(), chars.next()) {
				(Some(c), None) => Some(c),
				_ => None,
			}
		})
		.suggests(suggestions(&["A", "B", "C"]))
		.build(catalog),
		Serializer::builder("boolean", |_, raw| match raw.to_ascii_lowercase().as_str() {
			"true" => Some(true),
			"false" => Some(false),
			_ => None,
		})
		.suggests(suggestions(&["true", "false"]))
		.build(catalog),
	]
}

#[cfg(test)]
mod tests;
