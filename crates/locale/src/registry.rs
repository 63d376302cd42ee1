//! Per-locale message overrides.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use herald_text::{Text, TextFormat};
use serde_json::Value;

use crate::{Locale, LocaleError, MessageKey};

type LocaleTable = HashMap<Locale, Arc<HashMap<String, Text>>>;

/// Locale → key → text overlay over the declared defaults.
///
/// Lookups read an atomically published snapshot and never block. While a
/// reload is clearing and refilling the table a lookup may observe either
/// state; the worst case is a default text shown for one request.
pub struct MessageRegistry {
	locales: ArcSwap<LocaleTable>,
	format: Arc<dyn TextFormat>,
}

impl MessageRegistry {
	/// Creates an empty registry parsing values with `format`.
	pub fn new(format: Arc<dyn TextFormat>) -> Self {
		Self {
			locales: ArcSwap::from_pointee(HashMap::new()),
			format,
		}
	}

	pub fn format(&self) -> &Arc<dyn TextFormat> {
		&self.format
	}

	/// Registers a parsed lang document for `locale`.
	///
	/// Only the first document registered for a locale since the last
	/// [`MessageRegistry::clear`] is kept; later calls return `Ok(false)`.
	///
	/// # Errors
	///
	/// - [`LocaleError::NotObject`] if `document` is not a JSON object.
	/// - [`LocaleError::NotScalar`] if any value is an object, array or null.
	pub fn register(&self, locale: &Locale, document: &Value) -> Result<bool, LocaleError> {
		if self.contains(locale) {
			return Ok(false);
		}
		let Value::Object(entries) = document else {
			return Err(LocaleError::NotObject { locale: locale.clone() });
		};

		let mut messages = HashMap::with_capacity(entries.len());
		for (key, value) in entries {
			let raw = match value {
				Value::String(s) => s.clone(),
				Value::Number(n) => n.to_string(),
				Value::Bool(b) => b.to_string(),
				Value::Null | Value::Array(_) | Value::Object(_) => {
					return Err(LocaleError::NotScalar {
						key: key.clone(),
						locale: locale.clone(),
					});
				}
			};
			messages.insert(key.clone(), self.format.deserialize(&raw));
		}

		let messages = Arc::new(messages);
		let previous = self.locales.rcu(|current| {
			let mut next = LocaleTable::clone(current);
			next.entry(locale.clone()).or_insert_with(|| messages.clone());
			next
		});
		Ok(!previous.contains_key(locale))
	}

	/// Drops every registered locale.
	pub fn clear(&self) {
		self.locales.store(Arc::new(HashMap::new()));
	}

	pub fn contains(&self, locale: &Locale) -> bool {
		self.locales.load().contains_key(locale)
	}

	/// Registered locales, sorted.
	pub fn locales(&self) -> Vec<Locale> {
		let mut locales: Vec<_> = self.locales.load().keys().cloned().collect();
		locales.sort();
		locales
	}

	/// Resolves `message` for `locale`, falling back to its default text.
	pub fn find(&self, locale: &Locale, message: &MessageKey) -> Text {
		self.locales
			.load()
			.get(locale)
			.and_then(|messages| messages.get(message.key()))
			.cloned()
			.unwrap_or_else(|| message.default_text().clone())
	}
}

impl fmt::Debug for MessageRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageRegistry").field("locales", &self.locales()).finish()
	}
}
