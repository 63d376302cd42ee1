use crate::style::{Color, Modifier, Style};
use crate::text::Text;

/// Converts rich text to and from the string form stored in locale files.
pub trait TextFormat: Send + Sync {
	/// Renders `text` as a string.
	fn serialize(&self, text: &Text) -> String;

	/// Parses a string produced by [`TextFormat::serialize`] or written by hand.
	///
	/// Never fails: unrecognized syntax is kept as literal text.
	fn deserialize(&self, source: &str) -> Text;
}

/// Styling is dropped; the whole string is one unstyled node.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl TextFormat for Plain {
	fn serialize(&self, text: &Text) -> String {
		text.to_plain()
	}

	fn deserialize(&self, source: &str) -> Text {
		Text::new(source)
	}
}

/// Tag markup: `<red>`, `<#ff8800>`, `<bold>`, closing `</red>`, `<reset>`.
///
/// `\` escapes the next character. Tags that do not name a color or
/// decoration, and closing tags with no open counterpart, are literal text.
/// Hover and click metadata are not represented.
#[derive(Debug, Default, Clone, Copy)]
pub struct Markup;

impl TextFormat for Markup {
	fn serialize(&self, text: &Text) -> String {
		let mut out = String::new();
		write_node(text, &mut out);
		out
	}

	fn deserialize(&self, source: &str) -> Text {
		Parser::default().parse(source)
	}
}

fn open_tags(style: &Style) -> Vec<String> {
	let mut tags = Vec::new();
	if let Some(color) = style.color {
		tags.push(color.tag());
	}
	for (modifier, name) in Modifier::TAGS {
		if style.modifiers.contains(modifier) {
			tags.push(name.to_string());
		}
	}
	tags
}

fn write_node(text: &Text, out: &mut String) {
	let tags = open_tags(text.style_ref());
	for tag in &tags {
		out.push('<');
		out.push_str(tag);
		out.push('>');
	}
	for c in text.content().chars() {
		if matches!(c, '<' | '\\') {
			out.push('\\');
		}
		out.push(c);
	}
	for child in text.children() {
		write_node(child, out);
	}
	for tag in tags.iter().rev() {
		out.push_str("</");
		out.push_str(tag);
		out.push('>');
	}
}

fn style_for_tag(tag: &str) -> Option<Style> {
	if let Some(color) = Color::from_tag(tag) {
		return Some(Style::new().fg(color));
	}
	Modifier::from_tag(tag).map(Style::from)
}

/// Stack of open tags; index 0 is the unnamed root.
struct Parser {
	stack: Vec<(String, Text)>,
	buffer: String,
}

impl Default for Parser {
	fn default() -> Self {
		Self {
			stack: vec![(String::new(), Text::empty())],
			buffer: String::new(),
		}
	}
}

impl Parser {
	fn parse(mut self, source: &str) -> Text {
		let mut chars = source.char_indices().peekable();
		while let Some((i, c)) = chars.next() {
			match c {
				'\\' => match chars.next() {
					Some((_, escaped)) => self.buffer.push(escaped),
					None => self.buffer.push('\\'),
				},
				'<' => {
					let rest = &source[i + 1..];
					let consumed = rest.find('>').filter(|&end| self.apply_tag(&rest[..end]));
					match consumed {
						Some(end) => {
							let close = i + 1 + end;
							while chars.next_if(|&(j, _)| j <= close).is_some() {}
						}
						None => self.buffer.push('<'),
					}
				}
				_ => self.buffer.push(c),
			}
		}
		self.flush();
		self.close_to(1);

		let (_, root) = self.stack.pop().unwrap_or_default();
		if root.is_bare_container() && root.children().len() == 1 {
			let (_, _, children) = root.into_parts();
			return children.into_iter().next().unwrap_or_default();
		}
		root
	}

	fn apply_tag(&mut self, tag: &str) -> bool {
		if tag == "reset" {
			self.flush();
			self.close_to(1);
			return true;
		}
		if let Some(name) = tag.strip_prefix('/') {
			let Some(depth) = self.stack.iter().skip(1).rposition(|(open, _)| open == name) else {
				return false;
			};
			self.flush();
			self.close_to(depth + 1);
			return true;
		}
		let Some(style) = style_for_tag(tag) else {
			return false;
		};
		self.flush();
		self.stack.push((tag.to_string(), Text::styled("", style)));
		true
	}

	/// Pops open nodes until only `depth` entries remain.
	fn close_to(&mut self, depth: usize) {
		while self.stack.len() > depth.max(1) {
			let Some((_, node)) = self.stack.pop() else {
				break;
			};
			if let Some((_, parent)) = self.stack.last_mut() {
				parent.push(node);
			}
		}
	}

	fn flush(&mut self) {
		if self.buffer.is_empty() {
			return;
		}
		let buffer = std::mem::take(&mut self.buffer);
		if let Some((_, top)) = self.stack.last_mut() {
			if top.content().is_empty() && top.children().is_empty() {
				top.content_mut().push_str(&buffer);
			} else {
				top.push(Text::new(buffer));
			}
		}
	}
}
