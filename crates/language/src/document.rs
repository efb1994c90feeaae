//! Document snapshots handed to the extractor by the host.

use std::path::Path;

use ropey::{Rope, RopeSlice};
use tagtint_primitives::{Position, TaggedSpan};

use crate::dialect::Dialect;

/// Full text of a document together with its dialect.
///
/// Owned by the host. The extractor only borrows it for the duration of one
/// scan and never retains it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
	text: Rope,
	dialect: Dialect,
}

impl SourceDocument {
	pub fn new(text: &str, dialect: Dialect) -> Self {
		Self::from_rope(Rope::from_str(text), dialect)
	}

	pub fn from_rope(text: Rope, dialect: Dialect) -> Self {
		Self { text, dialect }
	}

	/// Builds a document for an editor language id, or `None` when the
	/// language is not one of the JS/TS dialects.
	pub fn for_language_id(text: &str, language_id: &str) -> Option<Self> {
		Dialect::from_language_id(language_id).map(|dialect| Self::new(text, dialect))
	}

	/// Builds a document for a file path, or `None` for non-JS/TS extensions.
	pub fn for_path(path: &Path, text: &str) -> Option<Self> {
		Dialect::from_path(path).map(|dialect| Self::new(text, dialect))
	}

	pub fn text(&self) -> &Rope {
		&self.text
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	pub fn len_bytes(&self) -> usize {
		self.text.len_bytes()
	}

	/// Converts a byte offset to a zero-based line and char column.
	///
	/// Offsets past the end clamp to the end of the document.
	pub fn position_at(&self, byte: usize) -> Position {
		let byte = byte.min(self.text.len_bytes());
		let line = self.text.byte_to_line(byte);
		let column = self.text.byte_to_char(byte) - self.text.line_to_char(line);
		Position::new(line, column)
	}

	/// Returns the text covered by a span.
	pub fn slice(&self, span: &TaggedSpan) -> RopeSlice<'_> {
		self.text.byte_slice(span.byte_range())
	}
}

/// Feeds rope chunks to tree-sitter without flattening the document.
pub(crate) struct RopeChunks<'a> {
	rope: &'a Rope,
	chunk: &'a str,
	start: usize,
	end: usize,
}

impl<'a> RopeChunks<'a> {
	pub(crate) fn new(rope: &'a Rope) -> Self {
		Self {
			rope,
			chunk: "",
			start: 0,
			end: 0,
		}
	}

	/// Returns the bytes from `byte_offset` to the end of its chunk.
	pub(crate) fn bytes_from(&mut self, byte_offset: usize) -> &'a [u8] {
		if byte_offset >= self.rope.len_bytes() {
			return &[];
		}

		if byte_offset < self.start || byte_offset >= self.end {
			let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(byte_offset);
			self.chunk = chunk;
			self.start = chunk_start;
			self.end = chunk_start + chunk.len();
		}

		&self.chunk.as_bytes()[byte_offset - self.start..]
	}
}
