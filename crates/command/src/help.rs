//! Paginated help pages of command modules.

use std::sync::Arc;

use herald_locale::{MessageCatalog, MessageKey};
use herald_text::{ClickAction, Color, Text};

use crate::handler::UsageLabel;
use crate::message::{MessageFunction, SendLevel};
use crate::root::Shared;
use crate::source::CommandSource;

/// Entries per help page, and items per usage hover.
pub(crate) const PAGE_SIZE: usize = 6;

/// Built-in messages used on help pages.
pub(crate) struct HelpMessages {
	pub(crate) required_argument: MessageKey,
	pub(crate) optional_argument: MessageKey,
	pub(crate) children: MessageKey,
	pub(crate) aliases: MessageKey,
	pub(crate) permissions: MessageKey,
	pub(crate) click_message: MessageKey,
	pub(crate) unknown_description: MessageKey,
}

impl HelpMessages {
	pub(crate) fn declare(catalog: &MessageCatalog) -> Self {
		let legend = |label: &'static str, color: Color, meaning: &'static str| {
			move || {
				Text::new("    ")
					.append(Text::new(label).color(color))
					.append(Text::new(" - ").color(Color::Gray))
					.append(Text::new(meaning).color(Color::White))
			}
		};
		Self {
			required_argument: catalog.declare_or_get("internal.required_argument", legend("(value)", Color::Red, "Required")),
			optional_argument: catalog.declare_or_get("internal.optional_argument", legend("[value]", Color::DarkAqua, "Optional")),
			children: catalog.declare_or_get("internal.type.children", || Text::new("<children>").color(Color::Green)),
			aliases: catalog.declare_or_get("internal.aliases", || Text::new("Aliases:").color(Color::DarkAqua)),
			permissions: catalog.declare_or_get("internal.permissions", || Text::new("Permissions:").color(Color::DarkAqua)),
			click_message: catalog.declare_or_get("internal.click_message", || Text::new("Click to suggest command.")),
			unknown_description: catalog.declare_or_get("internal.unknown_command", || Text::new("Unknown description.")),
		}
	}
}

/// Number of help pages for `entries` children.
pub(crate) fn max_page(entries: usize) -> usize {
	entries.div_ceil(PAGE_SIZE)
}

pub(crate) enum Usage {
	/// Parameter labels of a handler.
	Labels(Vec<UsageLabel>),
	/// Child names of a module.
	Children(Vec<String>),
}

/// One listed child of a module.
pub(crate) struct HelpEntry<W> {
	pub(crate) name: String,
	pub(crate) aliases: Vec<String>,
	pub(crate) permission: Option<String>,
	pub(crate) description: MessageFunction<W>,
	pub(crate) usage: Usage,
}

/// Snapshot of a module's children taken when it is built.
pub(crate) struct HelpPage<W> {
	help_name: String,
	entries: Vec<HelpEntry<W>>,
	shared: Arc<Shared>,
}

impl<W: CommandSource> HelpPage<W> {
	pub(crate) fn new(help_name: String, entries: Vec<HelpEntry<W>>, shared: Arc<Shared>) -> Self {
		Self { help_name, entries, shared }
	}

	pub(crate) fn max_page(&self) -> usize {
		max_page(self.entries.len())
	}

	/// Sends page `page`, clamped into the valid range, to `source`.
	pub(crate) fn show(&self, page: i64, source: &W) {
		let audience = source.audience();
		let info = self.shared.prefix_text(source, SendLevel::Info);
		let last = self.max_page().max(1);
		let page = usize::try_from(page).unwrap_or(0).clamp(1, last);
		let line = |text: Text| Text::empty().append(info.clone()).append(text);

		audience.send_message(line(Text::new(format!("----------< {page} / {last} >----------")).color(Color::Gray)));
		audience.send_message(info.clone());
		audience.send_message(line(self.find(source, &self.shared.messages.required_argument)));
		audience.send_message(line(self.find(source, &self.shared.messages.optional_argument)));
		audience.send_message(info.clone());
		for entry in self.entries.iter().skip((page - 1) * PAGE_SIZE).take(PAGE_SIZE) {
			audience.send_message(line(self.entry_line(entry, source)));
		}
		audience.send_message(info.clone());
		audience.send_message(line(Text::new("-".repeat(30)).color(Color::Gray)));
	}

	fn find(&self, source: &W, message: &MessageKey) -> Text {
		self.shared.find(source, message)
	}

	/// `/help-name child [usage] - description`, suggesting the command on
	/// click.
	fn entry_line(&self, entry: &HelpEntry<W>, source: &W) -> Text {
		let command = format!("/{} {}", self.help_name, entry.name);
		let mut text = Text::empty().append(Text::new(command.clone()).color(Color::Gold).hover(self.entry_hover(entry, source)));
		if let Some(usage) = self.usage(&entry.usage, source) {
			text = text.append(Text::space()).append(usage);
		}
		text.append(Text::new(" - ").color(Color::Gray))
			.append(self.find(source, entry.description.find(source)))
			.click(ClickAction::SuggestCommand(command))
	}

	fn entry_hover(&self, entry: &HelpEntry<W>, source: &W) -> Text {
		let messages = &self.shared.messages;
		let mut hover = Text::empty();
		let mut sections = 0;
		if !entry.aliases.is_empty() {
			hover = hover
				.append(self.find(source, &messages.aliases))
				.append(Text::newline())
				.append(entry.aliases.join(", "));
			sections += 1;
		}
		if let Some(permission) = &entry.permission {
			if sections > 0 {
				hover = hover.append(Text::newline()).append(Text::newline());
			}
			hover = hover
				.append(self.find(source, &messages.permissions))
				.append(Text::newline())
				.append(permission.as_str());
			sections += 1;
		}
		if sections > 0 {
			hover = hover.append(Text::newline()).append(Text::newline());
		}
		hover.append(self.find(source, &messages.click_message))
	}

	fn usage(&self, usage: &Usage, source: &W) -> Option<Text> {
		match usage {
			Usage::Labels(labels) if labels.is_empty() => None,
			Usage::Labels(labels) => {
				let mut text = Text::empty();
				for (index, label) in labels.iter().enumerate() {
					if index > 0 {
						text = text.append(Text::space());
					}
					let hover = Text::new(truncated(label.serializer.suggest(source)));
					text = text.append(self.find(source, &label.label).hover(hover));
				}
				Some(text)
			}
			Usage::Children(names) => {
				let hover = Text::new(truncated(names.clone()));
				Some(self.find(source, &self.shared.messages.children).hover(hover))
			}
		}
	}
}

/// Joins `items` one per line, keeping the first six and counting the rest.
fn truncated(items: Vec<String>) -> String {
	if items.len() <= PAGE_SIZE {
		return items.join("\n");
	}
	let hidden = items.len() - PAGE_SIZE;
	format!("{}\n+{hidden}", items[..PAGE_SIZE].join("\n"))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn pages_hold_six_entries() {
		assert_eq!(max_page(0), 0);
		assert_eq!(max_page(6), 1);
		assert_eq!(max_page(7), 2);
		assert_eq!(max_page(13), 3);
	}

	#[test]
	fn long_lists_are_truncated() {
		let items: Vec<String> = (1..=8).map(|i| i.to_string()).collect();
		assert_eq!(truncated(items), "1\n2\n3\n4\n5\n6\n+2");
		assert_eq!(truncated(vec!["a".into(), "b".into()]), "a\nb");
	}
}
