use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use herald_locale::{CatalogError, ExceptionHandlers, LangDirectory, Locale, MessageCatalog, MessageKey, MessageRegistry, ReloadState, SilentLog};
use herald_text::{Markup, Text, TextFormat};
use tracing::debug;

use crate::error::RootError;
use crate::help::HelpMessages;
use crate::message::{MessageSender, Prefix, SendLevel};
use crate::module::CommandModule;
use crate::serializer::{Serializer, SerializerRegistry};
use crate::source::CommandSource;

/// State shared by a root and every module, handler and sender it creates.
pub(crate) struct Shared {
	pub(crate) catalog: Arc<MessageCatalog>,
	pub(crate) registry: Arc<MessageRegistry>,
	pub(crate) lang: LangDirectory,
	pub(crate) serializers: SerializerRegistry,
	pub(crate) handlers: ExceptionHandlers,
	pub(crate) prefix: Prefix,
	pub(crate) messages: HelpMessages,
}

impl Shared {
	pub(crate) fn find(&self, source: &dyn CommandSource, message: &MessageKey) -> Text {
		self.registry.find(&source.locale(), message)
	}

	pub(crate) fn prefix_text(&self, source: &dyn CommandSource, level: SendLevel) -> Text {
		self.find(source, self.prefix.get(level))
	}

	pub(crate) fn report(&self, error: &anyhow::Error) {
		self.handlers.handle(error);
	}
}

/// Entry point: owns the message catalog, the localized overlay, the lang
/// directory and the serializers, and creates command modules.
///
/// ```rust,no_run
/// use herald_command::CommandRoot;
///
/// let root = CommandRoot::builder("lang").build()?;
/// root.reload();
/// # Ok::<(), herald_command::RootError>(())
/// ```
#[derive(Clone)]
pub struct CommandRoot {
	shared: Arc<Shared>,
}

impl CommandRoot {
	pub fn builder(lang_dir: impl Into<PathBuf>) -> CommandRootBuilder {
		CommandRootBuilder {
			lang_dir: lang_dir.into(),
			catalog: None,
			format: None,
			prefix: None,
			silent_log: None,
		}
	}

	/// Creates a top-level command module named `name`.
	pub fn module<W: CommandSource + 'static>(&self, name: impl Into<String>) -> CommandModule<W> {
		CommandModule::new(self.shared.clone(), name.into())
	}

	pub fn catalog(&self) -> &Arc<MessageCatalog> {
		&self.shared.catalog
	}

	pub fn registry(&self) -> &Arc<MessageRegistry> {
		&self.shared.registry
	}

	pub fn serializers(&self) -> &SerializerRegistry {
		&self.shared.serializers
	}

	pub fn format(&self) -> &Arc<dyn TextFormat> {
		self.shared.registry.format()
	}

	pub fn prefix(&self) -> &Prefix {
		&self.shared.prefix
	}

	/// Registers `serializer`, replacing any earlier one for the same type.
	///
	/// Only modules built afterwards see the change.
	pub fn add_serializer(&self, serializer: Serializer) -> &Self {
		if let Some(previous) = self.shared.serializers.register(serializer) {
			debug!(replaced = previous.name(), "serializer overridden");
		}
		self
	}

	/// Declares a message in this root's catalog.
	pub fn declare(&self, key: impl Into<String>, default_text: Text) -> Result<MessageKey, CatalogError> {
		self.shared.catalog.declare(key, default_text)
	}

	/// Declares a message whose default text is given in the root's format.
	pub fn declare_markup(&self, key: impl Into<String>, default_text: &str) -> Result<MessageKey, CatalogError> {
		self.declare(key, self.format().deserialize(default_text))
	}

	/// Adds an exception handler; handlers run in registration order.
	pub fn exception_handler(&self, handler: impl Fn(&anyhow::Error) + Send + Sync + 'static) -> &Self {
		self.shared.handlers.add(handler);
		self
	}

	/// Reloads every lang file. See [`LangDirectory::reload`].
	pub fn reload(&self) -> ReloadState {
		self.shared.lang.reload()
	}

	pub fn is_reloading(&self) -> bool {
		self.shared.lang.is_reloading()
	}

	/// Writes and loads a lang file for `locale` holding every declared
	/// message. See [`LangDirectory::generate_default_lang`].
	pub fn generate_default_lang(&self, locale: &Locale) -> bool {
		self.shared.lang.generate_default_lang(locale)
	}

	pub fn lang_dir(&self) -> &LangDirectory {
		&self.shared.lang
	}

	/// Resolves `message` in the source's locale.
	pub fn find(&self, source: &dyn CommandSource, message: &MessageKey) -> Text {
		self.shared.find(source, message)
	}

	pub fn prefix_text(&self, source: &dyn CommandSource, level: SendLevel) -> Text {
		self.shared.prefix_text(source, level)
	}

	/// Creates a sender delivering `message` to command sources.
	pub fn register_key(&self, message: MessageKey) -> MessageSender {
		MessageSender::new(self.shared.clone(), message)
	}
}

impl fmt::Debug for CommandRoot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandRoot")
			.field("lang", &self.shared.lang)
			.field("catalog", &self.shared.catalog)
			.field("serializers", &self.shared.serializers)
			.finish_non_exhaustive()
	}
}

/// Builder returned by [`CommandRoot::builder`].
pub struct CommandRootBuilder {
	lang_dir: PathBuf,
	catalog: Option<Arc<MessageCatalog>>,
	format: Option<Arc<dyn TextFormat>>,
	prefix: Option<Prefix>,
	silent_log: Option<SilentLog>,
}

impl CommandRootBuilder {
	/// Uses an existing catalog instead of a fresh one.
	pub fn catalog(mut self, catalog: Arc<MessageCatalog>) -> Self {
		self.catalog = Some(catalog);
		self
	}

	/// Format of lang file values. Defaults to [`Markup`].
	pub fn format(mut self, format: Arc<dyn TextFormat>) -> Self {
		self.format = Some(format);
		self
	}

	/// Replaces the default ` [!] ` prefixes. The keys must come from the
	/// catalog given to [`Self::catalog`].
	pub fn prefix(mut self, prefix: Prefix) -> Self {
		self.prefix = Some(prefix);
		self
	}

	/// Mutes lang directory logging while `silent` returns `true`.
	pub fn silent_log(mut self, silent: impl Fn() -> bool + Send + Sync + 'static) -> Self {
		self.silent_log = Some(Arc::new(silent));
		self
	}

	/// Builds the root, declaring its internal messages and registering the
	/// built-in serializers. Lang files are not loaded until
	/// [`CommandRoot::reload`].
	///
	/// # Errors
	///
	/// [`RootError::NotDirectory`] if the lang directory path is a file.
	pub fn build(self) -> Result<CommandRoot, RootError> {
		if self.lang_dir.is_file() {
			return Err(RootError::NotDirectory(self.lang_dir));
		}
		let catalog = self.catalog.unwrap_or_default();
		let format = self.format.unwrap_or_else(|| Arc::new(Markup));
		let registry = Arc::new(MessageRegistry::new(format));
		let handlers = ExceptionHandlers::default();

		let prefix = self.prefix.unwrap_or_else(|| Prefix::defaults(&catalog));
		let messages = HelpMessages::declare(&catalog);
		let serializers = SerializerRegistry::with_builtins(&catalog);

		let mut lang = LangDirectory::new(self.lang_dir, catalog.clone(), registry.clone(), handlers.clone());
		if let Some(silent) = self.silent_log {
			lang = lang.with_silent_log(silent);
		}
		debug!(dir = %lang.dir().display(), messages = catalog.len(), "command root ready");

		Ok(CommandRoot {
			shared: Arc::new(Shared {
				catalog,
				registry,
				lang,
				serializers,
				handlers,
				prefix,
				messages,
			}),
		})
	}
}

impl fmt::Debug for CommandRootBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandRootBuilder").field("lang_dir", &self.lang_dir).finish_non_exhaustive()
	}
}
