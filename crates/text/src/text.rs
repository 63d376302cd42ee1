use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::style::{Color, Modifier, Style};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([a-zA-Z]+)\]").expect("placeholder pattern is valid"));

/// Action performed when a text node is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClickAction {
	/// Puts the given command into the receiver's input line.
	SuggestCommand(String),
	/// Runs the given command as the receiver.
	RunCommand(String),
	/// Opens a URL.
	OpenUrl(String),
}

/// A node of rich text.
///
/// Children render after the node's own content and inherit its style unless
/// they override it.
///
/// ```rust
/// use herald_text::{Color, Text};
///
/// let usage = Text::new("    ")
/// 	.append(Text::new("(value)").color(Color::Red))
/// 	.append(Text::new(" - ").color(Color::Gray))
/// 	.append("Required");
/// assert_eq!(usage.to_plain(), "    (value) - Required");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
	content: String,
	style: Style,
	hover: Option<Box<Text>>,
	click: Option<ClickAction>,
	children: Vec<Text>,
}

impl Text {
	/// Creates an unstyled node with the given content.
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			..Self::default()
		}
	}

	/// Creates a node with the given content and style.
	pub fn styled(content: impl Into<String>, style: impl Into<Style>) -> Self {
		Self {
			content: content.into(),
			style: style.into(),
			..Self::default()
		}
	}

	/// An empty node, used as a container for children.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn newline() -> Self {
		Self::new("\n")
	}

	pub fn space() -> Self {
		Self::new(" ")
	}

	pub fn color(mut self, color: Color) -> Self {
		self.style.color = Some(color);
		self
	}

	pub fn decorate(mut self, modifier: Modifier) -> Self {
		self.style.modifiers.insert(modifier);
		self
	}

	pub fn style(mut self, style: impl Into<Style>) -> Self {
		self.style = style.into();
		self
	}

	/// Sets the text shown when the node is hovered.
	pub fn hover(mut self, hover: Text) -> Self {
		self.hover = Some(Box::new(hover));
		self
	}

	pub fn click(mut self, action: ClickAction) -> Self {
		self.click = Some(action);
		self
	}

	/// Appends a child node.
	pub fn append(mut self, child: impl Into<Text>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Appends a child node in place.
	pub fn push(&mut self, child: impl Into<Text>) {
		self.children.push(child.into());
	}

	pub fn content(&self) -> &str {
		&self.content
	}

	pub fn style_ref(&self) -> &Style {
		&self.style
	}

	pub fn hover_text(&self) -> Option<&Text> {
		self.hover.as_deref()
	}

	pub fn click_action(&self) -> Option<&ClickAction> {
		self.click.as_ref()
	}

	pub fn children(&self) -> &[Text] {
		&self.children
	}

	/// Returns true if neither this node nor any child has content.
	pub fn is_empty(&self) -> bool {
		self.content.is_empty() && self.children.iter().all(Text::is_empty)
	}

	/// Concatenates the content of the whole tree, dropping styling.
	pub fn to_plain(&self) -> String {
		let mut out = String::new();
		self.write_plain(&mut out);
		out
	}

	fn write_plain(&self, out: &mut String) {
		out.push_str(&self.content);
		for child in &self.children {
			child.write_plain(out);
		}
	}

	/// Replaces `[name]` placeholders using `values`.
	///
	/// Names missing from `values` render as the bare name without brackets.
	pub fn replace_placeholders(&self, values: &HashMap<String, Text>) -> Text {
		self.replace_with(&mut |name| Some(values.get(name).cloned().unwrap_or_else(|| Text::new(name))))
	}

	/// Replaces `[name]` placeholders with whatever `resolve` returns.
	///
	/// Placeholders for which `resolve` returns `None` are left untouched.
	pub fn replace_with(&self, resolve: &mut dyn FnMut(&str) -> Option<Text>) -> Text {
		let mut pieces: Vec<Text> = Vec::new();
		let mut head = String::new();
		let mut last = 0;
		let mut replaced = false;

		for caps in PLACEHOLDER.captures_iter(&self.content) {
			let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
				continue;
			};
			let Some(replacement) = resolve(name.as_str()) else {
				continue;
			};
			let between = &self.content[last..whole.start()];
			if replaced {
				if !between.is_empty() {
					pieces.push(Text::new(between));
				}
			} else {
				head.push_str(between);
			}
			pieces.push(replacement);
			last = whole.end();
			replaced = true;
		}

		let mut children: Vec<Text> = self.children.iter().map(|child| child.replace_with(resolve)).collect();
		if !replaced {
			return Text {
				children,
				..self.clone_shallow()
			};
		}

		let tail = &self.content[last..];
		if !tail.is_empty() {
			pieces.push(Text::new(tail));
		}
		pieces.append(&mut children);
		Text {
			content: head,
			children: pieces,
			..self.clone_shallow()
		}
	}

	fn clone_shallow(&self) -> Text {
		Text {
			content: self.content.clone(),
			style: self.style,
			hover: self.hover.clone(),
			click: self.click.clone(),
			children: Vec::new(),
		}
	}

	pub(crate) fn into_parts(self) -> (String, Style, Vec<Text>) {
		(self.content, self.style, self.children)
	}

	pub(crate) fn content_mut(&mut self) -> &mut String {
		&mut self.content
	}

	pub(crate) fn is_bare_container(&self) -> bool {
		self.content.is_empty() && self.style.is_plain() && self.hover.is_none() && self.click.is_none()
	}
}

impl From<&str> for Text {
	fn from(content: &str) -> Self {
		Text::new(content)
	}
}

impl From<String> for Text {
	fn from(content: String) -> Self {
		Text::new(content)
	}
}

impl fmt::Display for Text {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_plain())
	}
}
