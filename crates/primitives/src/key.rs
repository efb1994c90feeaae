use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Canonical name of a visual style bucket, shared by all aliases of a tag.
///
/// Cheap to clone; equality and hashing are by string content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleKey(Arc<str>);

impl StyleKey {
	/// Key used for tags without an entry in the tag policy.
	pub const DEFAULT: &'static str = "default";

	pub fn new(key: impl AsRef<str>) -> Self {
		Self(Arc::from(key.as_ref()))
	}

	/// The fallback key.
	pub fn fallback() -> Self {
		Self::new(Self::DEFAULT)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_default(&self) -> bool {
		&*self.0 == Self::DEFAULT
	}
}

impl Borrow<str> for StyleKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for StyleKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for StyleKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for StyleKey {
	fn from(key: String) -> Self {
		Self(Arc::from(key))
	}
}

impl PartialEq<str> for StyleKey {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for StyleKey {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}

impl fmt::Display for StyleKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
