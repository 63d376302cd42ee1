use std::sync::Arc;

use bitflags::bitflags;
use herald_locale::Locale;
use herald_text::Text;

/// Receiver of rendered messages.
pub trait Audience {
	fn send_message(&self, text: Text);
}

/// Who runs a command, as seen by command modules and handlers.
///
/// Grammar sources are mapped to this through the mapper given to
/// [`crate::CommandModule::build`].
pub trait CommandSource {
	fn audience(&self) -> &dyn Audience;

	/// Locale used to resolve messages sent to this source.
	fn locale(&self) -> Locale;

	fn has_permission(&self, permission: &str) -> bool;

	fn sender_type(&self) -> SenderType;
}

/// Maps a grammar source to a command source; `None` fails every gate.
pub type SourceMapper<S, W> = Arc<dyn Fn(&S) -> Option<W> + Send + Sync>;

/// Kind of a command source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenderType {
	Player,
	Console,
}

bitflags! {
	/// Set of sender types allowed to run a command.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct SenderKinds: u8 {
		const PLAYER = 1 << 0;
		const CONSOLE = 1 << 1;
	}
}

impl SenderKinds {
	pub fn allows(self, sender: SenderType) -> bool {
		self.contains(sender.into())
	}
}

impl Default for SenderKinds {
	fn default() -> Self {
		Self::all()
	}
}

impl From<SenderType> for SenderKinds {
	fn from(sender: SenderType) -> Self {
		match sender {
			SenderType::Player => Self::PLAYER,
			SenderType::Console => Self::CONSOLE,
		}
	}
}
