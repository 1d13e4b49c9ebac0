use super::{ParseError, ParseErrorKind};

/// Byte cursor over a data file.
pub(super) struct Cursor<'a> {
	src: &'a str,
	pos: usize,
}

impl<'a> Cursor<'a> {
	pub(super) fn new(src: &'a str) -> Self {
		Self { src, pos: 0 }
	}

	#[inline]
	pub(super) fn offset(&self) -> usize {
		self.pos
	}

	#[inline]
	fn rest(&self) -> &'a str {
		&self.src[self.pos..]
	}

	pub(super) fn error(&self, kind: ParseErrorKind) -> ParseError {
		ParseError { offset: self.pos, kind }
	}

	pub(super) fn skip_ws(&mut self) {
		let rest = self.rest();
		self.pos += rest.len() - rest.trim_start().len();
	}

	/// Peeks the next non-whitespace byte.
	pub(super) fn peek(&mut self) -> Option<u8> {
		self.skip_ws();
		self.rest().as_bytes().first().copied()
	}

	/// Consumes `token` after optional whitespace, if present.
	pub(super) fn eat(&mut self, token: &str) -> bool {
		self.skip_ws();
		if self.rest().starts_with(token) {
			self.pos += token.len();
			true
		} else {
			false
		}
	}

	pub(super) fn expect(&mut self, token: &'static str) -> Result<(), ParseError> {
		if self.eat(token) {
			return Ok(());
		}
		if self.rest().is_empty() {
			Err(self.error(ParseErrorKind::UnexpectedEof))
		} else {
			Err(self.error(ParseErrorKind::Expected(token)))
		}
	}

	/// Moves just past the next occurrence of `needle`.
	pub(super) fn seek_past(&mut self, needle: &str) -> bool {
		match self.rest().find(needle) {
			Some(at) => {
				self.pos += at + needle.len();
				true
			}
			None => false,
		}
	}

	/// Reads a double-quoted string literal with JSON escapes.
	pub(super) fn string(&mut self) -> Result<String, ParseError> {
		self.skip_ws();
		let start = self.pos;
		let bytes = self.src.as_bytes();

		match bytes.get(start) {
			Some(b'"') => {}
			Some(_) => return Err(self.error(ParseErrorKind::Expected("string literal"))),
			None => return Err(self.error(ParseErrorKind::UnexpectedEof)),
		}

		let mut i = start + 1;
		loop {
			match bytes.get(i) {
				None => {
					self.pos = bytes.len();
					return Err(self.error(ParseErrorKind::UnexpectedEof));
				}
				Some(b'\\') => i += 2,
				Some(b'"') => break,
				Some(_) => i += 1,
			}
		}

		let literal = &self.src[start..=i];
		let value = serde_json::from_str::<String>(literal).map_err(|e| ParseError {
			offset: start,
			kind: ParseErrorKind::InvalidString(e.to_string()),
		})?;
		self.pos = i + 1;
		Ok(value)
	}

	/// Reads `[ "a", "b", ]`. A trailing comma is accepted.
	pub(super) fn string_array(&mut self) -> Result<Vec<String>, ParseError> {
		self.expect("[")?;
		let mut items = Vec::new();
		loop {
			if self.eat("]") {
				return Ok(items);
			}
			items.push(self.string()?);
			if self.eat(",") {
				continue;
			}
			self.expect("]")?;
			return Ok(items);
		}
	}
}
