//! Lang directory loading and reloading.
//!
//! # Reload cycle
//!
//! [`LangDirectory::reload`] is single-flight: a call made while another
//! cycle runs returns [`ReloadState::InProgress`] at once instead of queuing.
//! Errors are handled on two levels. A broken file (bad JSON, non-scalar
//! value, unreadable) is logged and skipped; only a failure to list the
//! directory aborts the cycle with [`ReloadState::Failure`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{ExceptionHandlers, Locale, LocaleError, MessageCatalog, MessageRegistry, ReloadError};

/// Predicate consulted before every info/warn line; `true` mutes the log.
pub type SilentLog = Arc<dyn Fn() -> bool + Send + Sync>;

/// Outcome of one [`LangDirectory::reload`] call.
#[derive(Debug)]
pub enum ReloadState {
	/// Another reload was already running; nothing was done.
	InProgress,
	/// The cycle finished. Individual files may still have been skipped.
	Success { elapsed: Duration },
	/// The cycle aborted.
	Failure(ReloadError),
}

/// Resets the reloading flag even if the cycle unwinds.
struct ReloadGuard<'a>(&'a AtomicBool);

impl Drop for ReloadGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

/// A directory of lang files feeding a [`MessageRegistry`].
pub struct LangDirectory {
	dir: PathBuf,
	catalog: Arc<MessageCatalog>,
	registry: Arc<MessageRegistry>,
	handlers: ExceptionHandlers,
	silent: Option<SilentLog>,
	reloading: AtomicBool,
}

impl LangDirectory {
	pub fn new(dir: impl Into<PathBuf>, catalog: Arc<MessageCatalog>, registry: Arc<MessageRegistry>, handlers: ExceptionHandlers) -> Self {
		Self {
			dir: dir.into(),
			catalog,
			registry,
			handlers,
			silent: None,
			reloading: AtomicBool::new(false),
		}
	}

	/// Installs a predicate that mutes this directory's log output.
	pub fn with_silent_log(mut self, silent: SilentLog) -> Self {
		self.silent = Some(silent);
		self
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn registry(&self) -> &Arc<MessageRegistry> {
		&self.registry
	}

	pub fn is_reloading(&self) -> bool {
		self.reloading.load(Ordering::Acquire)
	}

	fn logging(&self) -> bool {
		self.silent.as_ref().is_none_or(|silent| !silent())
	}

	/// Clears the registry and loads every lang file in the directory.
	pub fn reload(&self) -> ReloadState {
		if self.reloading.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
			return ReloadState::InProgress;
		}
		let _guard = ReloadGuard(&self.reloading);
		let started = Instant::now();

		if let Err(error) = fs::create_dir_all(&self.dir)
			&& self.logging()
		{
			warn!(path = %self.dir.display(), %error, "unable to create lang directory");
		}

		match self.load_all() {
			Ok(()) => ReloadState::Success { elapsed: started.elapsed() },
			Err(error) => ReloadState::Failure(error),
		}
	}

	fn load_all(&self) -> Result<(), ReloadError> {
		let entries = fs::read_dir(&self.dir).map_err(|source| ReloadError::ReadDir {
			path: self.dir.clone(),
			source,
		})?;
		let mut paths: Vec<PathBuf> = entries.filter_map(|entry| entry.ok().map(|e| e.path())).collect();
		paths.sort();

		self.registry.clear();
		for path in paths {
			if path.extension().and_then(|e| e.to_str()) != Some("json") {
				if self.logging() {
					warn!(path = %path.display(), "not a json file, skipped");
				}
				continue;
			}
			match self.load_file(&path) {
				Ok(Some(locale)) => {
					if self.logging() {
						info!(%locale, path = %path.display(), "lang file loaded");
					}
				}
				Ok(None) => {}
				Err(error) => {
					if self.logging() {
						warn!(path = %path.display(), error = %error_chain(&error), "unable to read lang file");
					}
				}
			}
		}
		Ok(())
	}

	/// Loads one file; `Ok(None)` means its locale was already registered.
	fn load_file(&self, path: &Path) -> Result<Option<Locale>, LocaleError> {
		let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
		let locale = Locale::from_file_stem(stem)?;
		let document = read_document(path)?;
		Ok(self.registry.register(&locale, &document)?.then_some(locale))
	}

	/// Writes a lang file for `locale` holding every declared message.
	///
	/// Returns `false` without touching anything if `locale` is already
	/// loaded, or if an existing file for it cannot be parsed. Declared keys
	/// overwrite stale values in an existing file; unrelated entries are kept.
	/// A failed write is reported to the exception handlers and the document
	/// is still registered in memory.
	pub fn generate_default_lang(&self, locale: &Locale) -> bool {
		if self.registry.contains(locale) {
			return false;
		}
		let path = self.dir.join(locale.file_name());
		let mut document = if path.exists() {
			match read_document(&path) {
				Ok(Value::Object(map)) => map,
				Ok(_) => {
					self.handlers.handle(&LocaleError::NotObject { locale: locale.clone() }.into());
					return false;
				}
				Err(error) => {
					self.handlers.handle(&anyhow::Error::new(error).context(format!("unable to read lang file {}", path.display())));
					return false;
				}
			}
		} else {
			Map::new()
		};

		let format = self.registry.format();
		for message in self.catalog.all_declared() {
			document.insert(message.key().to_string(), Value::String(format.serialize(message.default_text())));
		}
		let document = Value::Object(document);

		if let Err(error) = write_document(&self.dir, &path, &document) {
			self.handlers.handle(&error.context(format!("unable to create lang file {}", path.display())));
		}
		if let Err(error) = self.registry.register(locale, &document) {
			self.handlers.handle(&error.into());
		}
		true
	}
}

impl fmt::Debug for LangDirectory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LangDirectory")
			.field("dir", &self.dir)
			.field("reloading", &self.is_reloading())
			.finish_non_exhaustive()
	}
}

fn read_document(path: &Path) -> Result<Value, LocaleError> {
	let content = fs::read_to_string(path).map_err(|source| LocaleError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_str(&content).map_err(|source| LocaleError::Json {
		path: path.to_path_buf(),
		source,
	})
}

fn write_document(dir: &Path, path: &Path, document: &Value) -> anyhow::Result<()> {
	use serde::Serialize;

	fs::create_dir_all(dir)?;
	let mut out = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
	document.serialize(&mut serializer)?;
	fs::write(path, out)?;
	Ok(())
}

/// Renders an error and its sources on one line.
fn error_chain(error: &dyn std::error::Error) -> String {
	let mut out = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		let cause_text = cause.to_string();
		if !out.contains(&cause_text) {
			out.push_str(": ");
			out.push_str(&cause_text);
		}
		source = cause.source();
	}
	out
}
