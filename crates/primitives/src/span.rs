use std::ops::Range;

use rustc_hash::FxHashSet;
use serde::Serialize;

/// A byte range of a document covering the body of one tagged template,
/// excluding the delimiting backticks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaggedSpan {
	/// Start byte offset (inclusive).
	pub start: u32,
	/// End byte offset (exclusive). Always greater than `start`.
	pub end: u32,
	/// Identifier text of the tag expression.
	pub tag: String,
}

impl TaggedSpan {
	/// Returns the byte range.
	pub fn range(&self) -> Range<u32> {
		self.start..self.end
	}

	/// Returns the byte range as `usize` bounds for slicing.
	pub fn byte_range(&self) -> Range<usize> {
		self.start as usize..self.end as usize
	}

	/// Returns the length in bytes.
	pub fn len(&self) -> u32 {
		self.end - self.start
	}

	/// Always false for spans produced by the extractor.
	pub fn is_empty(&self) -> bool {
		self.start >= self.end
	}
}

/// Zero-based line and column (in chars) of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl std::fmt::Display for Position {
	/// Formats as one-based `line:column`, the convention of compiler diagnostics.
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line + 1, self.column + 1)
	}
}

/// Identifies one rendering surface (an editor pane or terminal view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceId(pub u64);

/// Set of tag names eligible for detection.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
	tags: FxHashSet<String>,
}

impl AllowList {
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn contains(&self, tag: &str) -> bool {
		self.tags.contains(tag)
	}

	pub fn insert(&mut self, tag: impl Into<String>) -> bool {
		self.tags.insert(tag.into())
	}

	pub fn len(&self) -> usize {
		self.tags.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tags.is_empty()
	}

	/// Returns the tag names in sorted order.
	pub fn sorted(&self) -> Vec<&str> {
		let mut tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
		tags.sort_unstable();
		tags
	}
}

impl<S: Into<String>> FromIterator<S> for AllowList {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self {
			tags: iter.into_iter().map(Into::into).collect(),
		}
	}
}
