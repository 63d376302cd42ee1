use core::fmt;

use bitflags::bitflags;

bitflags! {
	/// Text decorations.
	///
	/// Flags compose, so `Modifier::BOLD | Modifier::ITALIC` is bold italic text.
	#[derive(Default, Clone, Copy, Eq, PartialEq, Hash)]
	pub struct Modifier: u8 {
		/// Bold text.
		const BOLD          = 0b0000_0001;
		/// Italic text.
		const ITALIC        = 0b0000_0010;
		/// Underlined text.
		const UNDERLINED    = 0b0000_0100;
		/// Struck through text.
		const STRIKETHROUGH = 0b0000_1000;
		/// Obfuscated (scrambled) text.
		const OBFUSCATED    = 0b0001_0000;
	}
}

impl Modifier {
	/// Markup tag names in canonical emission order.
	pub(crate) const TAGS: [(Modifier, &'static str); 5] = [
		(Modifier::BOLD, "bold"),
		(Modifier::ITALIC, "italic"),
		(Modifier::UNDERLINED, "underlined"),
		(Modifier::STRIKETHROUGH, "strikethrough"),
		(Modifier::OBFUSCATED, "obfuscated"),
	];

	pub(crate) fn from_tag(tag: &str) -> Option<Self> {
		Self::TAGS.iter().find(|(_, name)| *name == tag).map(|(m, _)| *m)
	}
}

impl fmt::Debug for Modifier {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.is_empty() {
			return write!(f, "NONE");
		}
		write!(f, "{}", self.0)
	}
}

/// Text color: the sixteen named chat colors or an arbitrary RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
	Black,
	DarkBlue,
	DarkGreen,
	DarkAqua,
	DarkRed,
	DarkPurple,
	Gold,
	Gray,
	DarkGray,
	Blue,
	Green,
	Aqua,
	Red,
	LightPurple,
	Yellow,
	White,
	Rgb(u8, u8, u8),
}

impl Color {
	const NAMED: [(Color, &'static str); 16] = [
		(Color::Black, "black"),
		(Color::DarkBlue, "dark_blue"),
		(Color::DarkGreen, "dark_green"),
		(Color::DarkAqua, "dark_aqua"),
		(Color::DarkRed, "dark_red"),
		(Color::DarkPurple, "dark_purple"),
		(Color::Gold, "gold"),
		(Color::Gray, "gray"),
		(Color::DarkGray, "dark_gray"),
		(Color::Blue, "blue"),
		(Color::Green, "green"),
		(Color::Aqua, "aqua"),
		(Color::Red, "red"),
		(Color::LightPurple, "light_purple"),
		(Color::Yellow, "yellow"),
		(Color::White, "white"),
	];

	/// Returns the markup tag for this color (`red`, `#ff8800`).
	pub fn tag(self) -> String {
		match self {
			Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
			named => Self::NAMED
				.iter()
				.find(|(c, _)| *c == named)
				.map(|(_, name)| (*name).to_string())
				.unwrap_or_default(),
		}
	}

	/// Parses a markup tag produced by [`Color::tag`].
	pub fn from_tag(tag: &str) -> Option<Self> {
		if let Some(hex) = tag.strip_prefix('#') {
			if hex.len() != 6 || !hex.is_ascii() {
				return None;
			}
			let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
			return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
		}
		Self::NAMED.iter().find(|(_, name)| *name == tag).map(|(c, _)| *c)
	}
}

/// Color and decorations of one text node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
	pub color: Option<Color>,
	pub modifiers: Modifier,
}

impl Style {
	pub const fn new() -> Self {
		Self {
			color: None,
			modifiers: Modifier::empty(),
		}
	}

	pub const fn fg(mut self, color: Color) -> Self {
		self.color = Some(color);
		self
	}

	pub fn add_modifier(mut self, modifier: Modifier) -> Self {
		self.modifiers.insert(modifier);
		self
	}

	pub fn is_plain(&self) -> bool {
		self.color.is_none() && self.modifiers.is_empty()
	}
}

impl From<Color> for Style {
	fn from(color: Color) -> Self {
		Style::new().fg(color)
	}
}

impl From<Modifier> for Style {
	fn from(modifier: Modifier) -> Self {
		Style::new().add_modifier(modifier)
	}
}
