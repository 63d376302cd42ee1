use std::sync::Arc;

use herald_locale::Locale;
use herald_text::Text;
use parking_lot::Mutex;

use crate::{Audience, CommandSource, SenderType};

/// Source recording every message it receives.
#[derive(Clone)]
pub(crate) struct TestSource {
	inbox: Arc<Mutex<Vec<Text>>>,
	sender: SenderType,
}

impl TestSource {
	pub(crate) fn console() -> Self {
		Self {
			inbox: Arc::default(),
			sender: SenderType::Console,
		}
	}
}

impl Audience for TestSource {
	fn send_message(&self, text: Text) {
		self.inbox.lock().push(text);
	}
}

impl CommandSource for TestSource {
	fn audience(&self) -> &dyn Audience {
		self
	}

	fn locale(&self) -> Locale {
		Locale::with_region("en", "US")
	}

	fn has_permission(&self, _permission: &str) -> bool {
		true
	}

	fn sender_type(&self) -> SenderType {
		self.sender
	}
}
