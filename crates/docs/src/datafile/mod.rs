//! Per-trait implementor data files.
//!
//! The documentation generator writes one script per trait under
//! `implementors/<crate path>/trait.<Name>.js`. The script builds an `implementors` object
//! keyed by producing crate and then either hands it to `window.register_implementors` or
//! parks it in `window.pending_implementors`.
//!
//! Two layouts of the object are accepted:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors["rowdy"] = ["impl …","impl …",];
//! …glue…
//! })()
//! ```
//!
//! ```text
//! (function() {var implementors = {
//! "rowdy":["impl …","impl …"],"other":[]};
//! …glue…
//! })()
//! ```
//!
//! Only the mapping is read back; the glue is regenerated by [`render`].

mod cursor;

use implidx_fragments::ImplementorFragment;

use self::cursor::Cursor;

/// Why a data file failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
	#[error("missing `var implementors` declaration")]
	MissingDeclaration,
	#[error("unexpected end of input")]
	UnexpectedEof,
	#[error("expected {0}")]
	Expected(&'static str),
	#[error("invalid string literal: {0}")]
	InvalidString(String),
}

/// Parse failure with the byte offset it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
	pub offset: usize,
	pub kind: ParseErrorKind,
}

/// Fragments of one data file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFile {
	fragments: Vec<ImplementorFragment>,
}

impl DataFile {
	pub fn new(fragments: Vec<ImplementorFragment>) -> Self {
		Self { fragments }
	}

	pub fn fragments(&self) -> &[ImplementorFragment] {
		&self.fragments
	}

	pub fn into_fragments(self) -> Vec<ImplementorFragment> {
		self.fragments
	}

	/// Producers in file order. A producer listed twice appears twice.
	pub fn producers(&self) -> impl Iterator<Item = &str> {
		self.fragments.iter().map(ImplementorFragment::producer)
	}

	pub fn total_implementors(&self) -> usize {
		self.fragments.iter().map(ImplementorFragment::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.fragments.is_empty()
	}
}

/// Parses a data file in either supported layout.
pub fn parse(src: &str) -> Result<DataFile, ParseError> {
	let mut cur = Cursor::new(src);
	if !cur.seek_past("var implementors") {
		return Err(cur.error(ParseErrorKind::MissingDeclaration));
	}
	cur.expect("=")?;
	cur.expect("{")?;

	let fragments = if cur.eat("}") {
		cur.eat(";");
		parse_statements(&mut cur)?
	} else {
		parse_literal(&mut cur)?
	};

	Ok(DataFile { fragments })
}

/// `implementors["name"] = [...];` repeated.
fn parse_statements(cur: &mut Cursor<'_>) -> Result<Vec<ImplementorFragment>, ParseError> {
	let mut fragments = Vec::new();
	while cur.eat("implementors[") {
		let producer = cur.string()?;
		cur.expect("]")?;
		cur.expect("=")?;
		let implementors = cur.string_array()?;
		cur.eat(";");
		fragments.push(ImplementorFragment::new(producer, implementors));
	}
	Ok(fragments)
}

/// `"name": [...], ...}` after the opening brace.
fn parse_literal(cur: &mut Cursor<'_>) -> Result<Vec<ImplementorFragment>, ParseError> {
	let mut fragments = Vec::new();
	loop {
		if cur.eat("}") {
			break;
		}
		let producer = cur.string()?;
		cur.expect(":")?;
		let implementors = cur.string_array()?;
		fragments.push(ImplementorFragment::new(producer, implementors));

		match cur.peek() {
			Some(b',') => {
				cur.expect(",")?;
			}
			Some(b'}') => {}
			Some(_) => return Err(cur.error(ParseErrorKind::Expected("`,` or `}`"))),
			None => return Err(cur.error(ParseErrorKind::UnexpectedEof)),
		}
	}
	cur.eat(";");
	tracing::trace!(offset = cur.offset(), count = fragments.len(), "parsed literal implementors object");
	Ok(fragments)
}

const GLUE: &str = r#"
            if (window.register_implementors) {
                window.register_implementors(implementors);
            } else {
                window.pending_implementors = implementors;
            }

})()
"#;

/// Renders a data file in the statement layout, followed by the register-or-park glue.
pub fn render(file: &DataFile) -> String {
	let mut out = String::from("(function() {var implementors = {};\n");
	for fragment in &file.fragments {
		out.push_str("implementors[");
		out.push_str(&quote(fragment.producer()));
		out.push_str("] = [");
		for (i, implementor) in fragment.implementors().iter().enumerate() {
			if i > 0 {
				out.push(',');
			}
			out.push_str(&quote(implementor));
		}
		out.push_str("];\n");
	}
	out.push_str(GLUE);
	out
}

/// JSON string literal that is also valid JavaScript: U+2028 and U+2029 end a line in older
/// engines, so they are escaped.
fn quote(s: &str) -> String {
	serde_json::Value::from(s)
		.to_string()
		.replace('\u{2028}', "\\u2028")
		.replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests;
