use std::io;
use std::path::PathBuf;

use crate::Locale;

/// Errors raised while declaring messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
	/// Two messages were declared with the same key.
	#[error("message key already declared: {0}")]
	DuplicateKey(String),
}

/// Errors raised while reading or registering one lang document.
///
/// These are recoverable: a reload logs them and moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
	#[error("unable to read lang file {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("malformed json in {}: {source}", path.display())]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("lang document for {locale} is not a json object")]
	NotObject { locale: Locale },
	#[error("the key {key} in {locale} is not a json primitive")]
	NotScalar { key: String, locale: Locale },
	#[error("cannot derive a locale from file name {0:?}")]
	InvalidFileName(String),
}

/// Errors that abort a whole reload cycle.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
	#[error("unable to list lang directory {}: {source}", path.display())]
	ReadDir {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}
