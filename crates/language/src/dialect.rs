//! Grammar variants of JavaScript and TypeScript.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tree_sitter::Language;

/// The syntax dialect a document is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
	Js,
	Jsx,
	Ts,
	Tsx,
}

/// Returned when a name does not denote one of the four JS/TS dialects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language: {0}")]
pub struct UnknownDialect(pub String);

impl Dialect {
	pub const ALL: [Dialect; 4] = [Dialect::Js, Dialect::Jsx, Dialect::Ts, Dialect::Tsx];

	/// Resolves an editor language identifier.
	///
	/// Accepts the long identifiers used by editors (`typescriptreact`) and
	/// the short names (`tsx`).
	pub fn from_language_id(id: &str) -> Option<Self> {
		match id {
			"javascript" | "js" => Some(Self::Js),
			"javascriptreact" | "jsx" => Some(Self::Jsx),
			"typescript" | "ts" => Some(Self::Ts),
			"typescriptreact" | "tsx" => Some(Self::Tsx),
			_ => None,
		}
	}

	/// Resolves a dialect from a file extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		match path.extension().and_then(|ext| ext.to_str())? {
			"js" | "mjs" | "cjs" => Some(Self::Js),
			"jsx" => Some(Self::Jsx),
			"ts" | "mts" | "cts" => Some(Self::Ts),
			"tsx" => Some(Self::Tsx),
			_ => None,
		}
	}

	/// Editor language identifier of this dialect.
	pub fn language_id(self) -> &'static str {
		match self {
			Self::Js => "javascript",
			Self::Jsx => "javascriptreact",
			Self::Ts => "typescript",
			Self::Tsx => "typescriptreact",
		}
	}

	/// Tree-sitter grammar for this dialect.
	///
	/// The JavaScript grammar always accepts JSX, so `Js` and `Jsx` share it.
	/// TypeScript keeps separate grammars because `<T>expr` assertions and JSX
	/// elements are ambiguous.
	pub fn grammar(self) -> Language {
		match self {
			Self::Js | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
			Self::Ts => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
			Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.language_id())
	}
}

impl FromStr for Dialect {
	type Err = UnknownDialect;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_language_id(s).ok_or_else(|| UnknownDialect(s.to_string()))
	}
}
