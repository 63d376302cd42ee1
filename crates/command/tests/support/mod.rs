//! Shared fixtures for command integration tests.

use std::sync::Arc;

use herald_command::{Audience, CommandModule, CommandRoot, CommandSource, SenderType};
use herald_grammar::Dispatcher;
use herald_locale::Locale;
use herald_text::Text;
use parking_lot::Mutex;
use tempfile::TempDir;

/// A command source that records what it is sent.
#[derive(Clone)]
pub struct Player {
	inbox: Arc<Mutex<Vec<Text>>>,
	permissions: Vec<String>,
	sender: SenderType,
	locale: Locale,
}

impl Player {
	/// A player holding exactly `permissions`.
	pub fn with_permissions(permissions: &[&str]) -> Self {
		Self {
			inbox: Arc::default(),
			permissions: permissions.iter().map(|p| (*p).to_string()).collect(),
			sender: SenderType::Player,
			locale: Locale::with_region("en", "US"),
		}
	}

	/// A console source holding every permission.
	pub fn console() -> Self {
		Self {
			sender: SenderType::Console,
			..Self::with_permissions(&["*"])
		}
	}

	#[allow(dead_code, reason = "test helper used by individual test files")]
	pub fn in_locale(mut self, locale: Locale) -> Self {
		self.locale = locale;
		self
	}

	/// Plain text of every received message, draining the inbox.
	pub fn take_lines(&self) -> Vec<String> {
		self.inbox.lock().drain(..).map(|text| text.to_plain()).collect()
	}

	#[allow(dead_code, reason = "test helper used by individual test files")]
	pub fn take_messages(&self) -> Vec<Text> {
		self.inbox.lock().drain(..).collect()
	}
}

impl Audience for Player {
	fn send_message(&self, text: Text) {
		self.inbox.lock().push(text);
	}
}

impl CommandSource for Player {
	fn audience(&self) -> &dyn Audience {
		self
	}

	fn locale(&self) -> Locale {
		self.locale.clone()
	}

	fn has_permission(&self, permission: &str) -> bool {
		self.permissions.iter().any(|p| p == "*" || p == permission)
	}

	fn sender_type(&self) -> SenderType {
		self.sender
	}
}

/// Grammar source: `None` stands for a caller the mapper cannot map.
pub type Caller = Option<Player>;

/// Root over a fresh `lang` directory inside a temp dir.
pub fn root() -> (TempDir, CommandRoot) {
	let dir = tempfile::tempdir().expect("create temp dir");
	let root = CommandRoot::builder(dir.path().join("lang")).build().expect("build root");
	(dir, root)
}

/// Builds `module` and registers it on a new dispatcher.
pub fn dispatcher(module: &CommandModule<Player>) -> Dispatcher<Caller> {
	let mut dispatcher = Dispatcher::new();
	for node in module.build(|caller: &Caller| caller.clone()).expect("module builds") {
		dispatcher.register(node);
	}
	dispatcher
}
