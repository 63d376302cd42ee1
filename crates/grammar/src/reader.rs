/// Cursor over an input line.
#[derive(Debug, Clone)]
pub struct StringReader<'a> {
	input: &'a str,
	cursor: usize,
}

impl<'a> StringReader<'a> {
	pub fn new(input: &'a str) -> Self {
		Self { input, cursor: 0 }
	}

	pub fn input(&self) -> &'a str {
		self.input
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn remaining(&self) -> &'a str {
		&self.input[self.cursor..]
	}

	pub fn can_read(&self) -> bool {
		self.cursor < self.input.len()
	}

	pub fn peek(&self) -> Option<char> {
		self.remaining().chars().next()
	}

	pub fn skip(&mut self) {
		if let Some(c) = self.peek() {
			self.cursor += c.len_utf8();
		}
	}

	/// Reads up to the next space without consuming it.
	pub fn read_unquoted(&mut self) -> &'a str {
		let rest = self.remaining();
		let end = rest.find(' ').unwrap_or(rest.len());
		self.cursor += end;
		&rest[..end]
	}

	/// Reads a `"quoted string"` with `\"` and `\\` escapes.
	///
	/// Returns `None` if the quote is never closed or an escape is invalid.
	pub fn read_quoted(&mut self) -> Option<String> {
		let start = self.cursor;
		let quote = self.peek().filter(|c| *c == '"' || *c == '\'')?;
		self.skip();
		let mut out = String::new();
		let mut escaped = false;
		while let Some(c) = self.peek() {
			self.skip();
			if escaped {
				if c != quote && c != '\\' {
					self.cursor = start;
					return None;
				}
				out.push(c);
				escaped = false;
			} else if c == '\\' {
				escaped = true;
			} else if c == quote {
				return Some(out);
			} else {
				out.push(c);
			}
		}
		self.cursor = start;
		None
	}

	/// Reads a quoted string if the next character is a quote, otherwise a
	/// single word.
	pub fn read_string(&mut self) -> Option<String> {
		match self.peek() {
			Some('"' | '\'') => self.read_quoted(),
			_ => Some(self.read_unquoted().to_string()),
		}
	}

	/// Consumes the rest of the input verbatim.
	pub fn read_remaining(&mut self) -> &'a str {
		let rest = self.remaining();
		self.cursor = self.input.len();
		rest
	}
}
