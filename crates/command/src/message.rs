use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use herald_locale::{MessageCatalog, MessageKey};
use herald_text::{Color, Modifier, Text};

use crate::CommandSource;
use crate::root::Shared;

/// Predicate over a mapped command source.
pub type SourcePredicate<W> = Arc<dyn Fn(&W) -> bool + Send + Sync>;

/// A message chosen per source: the first conditional message whose
/// predicate holds, else the default.
pub struct MessageFunction<W> {
	default: MessageKey,
	conditional: Vec<(SourcePredicate<W>, MessageKey)>,
}

impl<W> MessageFunction<W> {
	pub fn new(default: MessageKey) -> Self {
		Self {
			default,
			conditional: Vec::new(),
		}
	}

	/// Adds a message used when `predicate` holds. Checked in insertion order.
	pub fn conditional(mut self, predicate: impl Fn(&W) -> bool + Send + Sync + 'static, message: MessageKey) -> Self {
		self.conditional.push((Arc::new(predicate), message));
		self
	}

	pub fn default_message(&self) -> &MessageKey {
		&self.default
	}

	pub fn find(&self, source: &W) -> &MessageKey {
		self.conditional
			.iter()
			.find(|(predicate, _)| predicate(source))
			.map_or(&self.default, |(_, message)| message)
	}
}

impl<W> Clone for MessageFunction<W> {
	fn clone(&self) -> Self {
		Self {
			default: self.default.clone(),
			conditional: self.conditional.clone(),
		}
	}
}

impl<W> From<MessageKey> for MessageFunction<W> {
	fn from(default: MessageKey) -> Self {
		Self::new(default)
	}
}

impl<W> fmt::Debug for MessageFunction<W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageFunction")
			.field("default", &self.default.key())
			.field("conditional", &self.conditional.iter().map(|(_, m)| m.key()).collect::<Vec<_>>())
			.finish()
	}
}

/// Severity of a sent message, selecting its prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SendLevel {
	#[default]
	Info,
	Warn,
	Error,
}

/// Messages prepended to help lines and sent messages, one per level.
#[derive(Debug, Clone)]
pub struct Prefix {
	pub info: MessageKey,
	pub warn: MessageKey,
	pub error: MessageKey,
}

impl Prefix {
	/// Declares the default ` [!] ` prefixes (`internal.info`, `internal.warn`,
	/// `internal.error`) in `catalog`.
	pub fn defaults(catalog: &MessageCatalog) -> Self {
		let bang = |color: Color| move || Text::new(" [!] ").color(color).decorate(Modifier::BOLD);
		Self {
			info: catalog.declare_or_get("internal.info", bang(Color::Green)),
			warn: catalog.declare_or_get("internal.warn", bang(Color::Yellow)),
			error: catalog.declare_or_get("internal.error", bang(Color::Red)),
		}
	}

	pub fn get(&self, level: SendLevel) -> &MessageKey {
		match level {
			SendLevel::Info => &self.info,
			SendLevel::Warn => &self.warn,
			SendLevel::Error => &self.error,
		}
	}
}

/// Sends one message, localized and prefixed, to command sources.
///
/// Created by [`crate::CommandRoot::register_key`].
#[derive(Clone)]
pub struct MessageSender {
	shared: Arc<Shared>,
	message: MessageKey,
}

impl MessageSender {
	pub(crate) fn new(shared: Arc<Shared>, message: MessageKey) -> Self {
		Self { shared, message }
	}

	pub fn message(&self) -> &MessageKey {
		&self.message
	}

	/// Sends the message at `level`, replacing `[name]` placeholders from
	/// `values`. Placeholders missing from `values` render as the bare name.
	///
	/// Nothing is sent if the resolved message serializes to an empty string,
	/// which lets lang files disable a message.
	pub fn send(&self, level: SendLevel, source: &dyn CommandSource, values: &HashMap<String, Text>) {
		let message = self.shared.find(source, &self.message);
		if self.shared.registry.format().serialize(&message).is_empty() {
			return;
		}
		let line = Text::empty()
			.append(self.shared.prefix_text(source, level))
			.append(message.replace_placeholders(values));
		source.audience().send_message(line);
	}

	pub fn send_info(&self, source: &dyn CommandSource, values: &HashMap<String, Text>) {
		self.send(SendLevel::Info, source, values);
	}

	/// Sends the message at info level without placeholder values.
	pub fn notify(&self, source: &dyn CommandSource) {
		self.send_info(source, &HashMap::new());
	}
}

impl fmt::Debug for MessageSender {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("MessageSender").field(&self.message.key()).finish()
	}
}
