//! Declared message keys.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use herald_text::Text;
use parking_lot::RwLock;

use crate::CatalogError;

struct KeyInner {
	key: String,
	default_text: Text,
}

/// A translatable message: a unique key plus the text used when no lang
/// file overrides it.
///
/// Only [`MessageCatalog::declare`] creates keys. Equality, ordering and
/// hashing use the key string alone.
#[derive(Clone)]
pub struct MessageKey(Arc<KeyInner>);

impl MessageKey {
	pub fn key(&self) -> &str {
		&self.0.key
	}

	pub fn default_text(&self) -> &Text {
		&self.0.default_text
	}
}

impl fmt::Debug for MessageKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageKey").field("key", &self.0.key).finish()
	}
}

impl PartialEq for MessageKey {
	fn eq(&self, other: &Self) -> bool {
		self.key() == other.key()
	}
}

impl Eq for MessageKey {}

impl Hash for MessageKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key().hash(state);
	}
}

impl PartialOrd for MessageKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for MessageKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key().cmp(other.key())
	}
}

/// Append-only set of declared messages.
///
/// Each [`crate::LangDirectory`] seeds generated lang files from
/// [`MessageCatalog::all_declared`], so every message a program can print
/// should be declared here before the first reload.
#[derive(Default)]
pub struct MessageCatalog {
	keys: RwLock<BTreeMap<String, MessageKey>>,
}

impl MessageCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a new message.
	///
	/// # Errors
	///
	/// [`CatalogError::DuplicateKey`] if `key` is already declared.
	pub fn declare(&self, key: impl Into<String>, default_text: Text) -> Result<MessageKey, CatalogError> {
		let key = key.into();
		let mut keys = self.keys.write();
		if keys.contains_key(&key) {
			return Err(CatalogError::DuplicateKey(key));
		}
		let message = MessageKey(Arc::new(KeyInner {
			key: key.clone(),
			default_text,
		}));
		keys.insert(key, message.clone());
		Ok(message)
	}

	/// Returns the message declared under `key`, declaring it with
	/// `default_text` first if needed.
	///
	/// Meant for keys whose default text is derived from the key itself, such
	/// as built-in labels shared by several owners of one catalog.
	pub fn declare_or_get(&self, key: impl Into<String>, default_text: impl FnOnce() -> Text) -> MessageKey {
		let key = key.into();
		let mut keys = self.keys.write();
		keys.entry(key)
			.or_insert_with_key(|key| {
				MessageKey(Arc::new(KeyInner {
					key: key.clone(),
					default_text: default_text(),
				}))
			})
			.clone()
	}

	pub fn get(&self, key: &str) -> Option<MessageKey> {
		self.keys.read().get(key).cloned()
	}

	/// Snapshot of every declared message, sorted by key.
	pub fn all_declared(&self) -> Vec<MessageKey> {
		self.keys.read().values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.keys.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.read().is_empty()
	}
}

impl fmt::Debug for MessageCatalog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageCatalog").field("len", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn duplicate_key_is_rejected() {
		let catalog = MessageCatalog::new();
		catalog.declare("test.print", Text::new("Hello")).expect("first declaration");
		let err = catalog.declare("test.print", Text::new("Other")).expect_err("duplicate must fail");
		assert_eq!(err, CatalogError::DuplicateKey("test.print".into()));
		assert_eq!(catalog.len(), 1);
		assert_eq!(catalog.get("test.print").map(|k| k.default_text().to_plain()), Some("Hello".to_string()));
	}

	#[test]
	fn catalogs_are_isolated() {
		let a = MessageCatalog::new();
		let b = MessageCatalog::new();
		a.declare("shared", Text::new("a")).expect("declare in a");
		b.declare("shared", Text::new("b")).expect("declare in b");
	}

	#[test]
	fn all_declared_is_sorted_snapshot() {
		let catalog = MessageCatalog::new();
		for key in ["b.second", "a.first", "c.third"] {
			catalog.declare(key, Text::new(key)).expect("declare");
		}
		let snapshot = catalog.all_declared();
		catalog.declare("0.late", Text::empty()).expect("declare after snapshot");
		let keys: Vec<_> = snapshot.iter().map(MessageKey::key).collect();
		assert_eq!(keys, ["a.first", "b.second", "c.third"]);
	}

	#[test]
	fn declare_or_get_keeps_first_text() {
		let catalog = MessageCatalog::new();
		let first = catalog.declare_or_get("internal.info", || Text::new(" [!] "));
		let second = catalog.declare_or_get("internal.info", || Text::new("ignored"));
		assert_eq!(first, second);
		assert_eq!(second.default_text().to_plain(), " [!] ");
		assert!(catalog.declare("internal.info", Text::empty()).is_err());
	}

	#[test]
	fn keys_compare_by_name() {
		let catalog = MessageCatalog::new();
		let key = catalog.declare("x", Text::new("1")).expect("declare");
		assert_eq!(catalog.get("x"), Some(key));
	}
}
