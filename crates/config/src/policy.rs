//! Tag policy: which template tags are recognized and which style they get.

use indexmap::IndexMap;
use tagtint_primitives::{AllowList, StyleKey};

use crate::TaggedTemplatesConfig;

/// Built-in tag table used when no user mapping is configured.
///
/// Aliases fold onto the canonical key of their language. `sh` and `bash`
/// share the `shell` key, which is not itself a tag.
pub const BUILTIN_TAGS: &[(&str, &str)] = &[
	("json", "json"),
	("html", "html"),
	("css", "css"),
	("scss", "css"),
	("sql", "sql"),
	("graphql", "graphql"),
	("gql", "graphql"),
	("yaml", "yaml"),
	("yml", "yaml"),
	("xml", "xml"),
	("ts", "ts"),
	("typescript", "ts"),
	("sh", "shell"),
	("bash", "shell"),
	("java", "java"),
	("ruby", "ruby"),
	("rb", "ruby"),
	("python", "python"),
	("py", "python"),
	("php", "php"),
	("go", "go"),
	("golang", "go"),
	("csharp", "csharp"),
	("cs", "csharp"),
	("markdown", "markdown"),
	("md", "markdown"),
	("gitignore", "gitignore"),
	("ignore", "gitignore"),
	("env", "env"),
	("dotenv", "env"),
];

/// Where the active tag table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
	Builtin,
	User,
}

/// Immutable snapshot of the tag configuration.
///
/// Rebuilt whenever configuration changes and never mutated during a scan.
#[derive(Debug, Clone)]
pub struct TagPolicy {
	tags: IndexMap<String, StyleKey>,
	enabled: bool,
	source: TagSource,
}

impl Default for TagPolicy {
	fn default() -> Self {
		Self::builtin()
	}
}

impl TagPolicy {
	/// Enabled policy over [`BUILTIN_TAGS`].
	pub fn builtin() -> Self {
		Self {
			tags: BUILTIN_TAGS.iter().map(|&(tag, key)| (tag.to_string(), StyleKey::from(key))).collect(),
			enabled: true,
			source: TagSource::Builtin,
		}
	}

	/// Builds a policy from a user mapping of tag to style key.
	///
	/// An empty mapping counts as absent and selects the built-in table. Any
	/// other mapping is taken verbatim.
	pub fn new(user_tags: impl IntoIterator<Item = (String, String)>, enabled: bool) -> Self {
		let tags: IndexMap<String, StyleKey> = user_tags.into_iter().map(|(tag, key)| (tag, StyleKey::from(key))).collect();
		if tags.is_empty() {
			return Self {
				enabled,
				..Self::builtin()
			};
		}
		Self {
			tags,
			enabled,
			source: TagSource::User,
		}
	}

	pub fn from_config(config: &TaggedTemplatesConfig) -> Self {
		Self::new(config.tags.iter().map(|(k, v)| (k.clone(), v.clone())), config.enabled)
	}

	/// Returns a copy with the kill switch set to `enabled`.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Tag names currently recognized.
	pub fn resolve_allow_list(&self) -> AllowList {
		self.tags.keys().map(String::as_str).collect()
	}

	/// Style key for a tag, or `"default"` for tags outside the table.
	pub fn style_key_for_tag(&self, tag: &str) -> StyleKey {
		self.tags.get(tag).cloned().unwrap_or_else(StyleKey::fallback)
	}

	/// Global kill switch. When false, hosts clear decorations and skip scans.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn source(&self) -> TagSource {
		self.source
	}

	/// `(tag, style key)` pairs in table order.
	pub fn tags(&self) -> impl Iterator<Item = (&str, &StyleKey)> + '_ {
		self.tags.iter().map(|(tag, key)| (tag.as_str(), key))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("gql", "graphql")]
	#[case("yml", "yaml")]
	#[case("scss", "css")]
	#[case("typescript", "ts")]
	#[case("bash", "shell")]
	#[case("rb", "ruby")]
	#[case("py", "python")]
	#[case("golang", "go")]
	#[case("cs", "csharp")]
	#[case("md", "markdown")]
	#[case("ignore", "gitignore")]
	#[case("dotenv", "env")]
	fn aliases_fold_onto_canonical_key(#[case] alias: &str, #[case] canonical: &str) {
		let policy = TagPolicy::builtin();
		assert_eq!(policy.style_key_for_tag(alias), canonical);
	}

	#[test]
	fn alias_and_canonical_share_key() {
		let policy = TagPolicy::builtin();
		assert_eq!(policy.style_key_for_tag("gql"), policy.style_key_for_tag("graphql"));
		assert_eq!(policy.style_key_for_tag("yml"), policy.style_key_for_tag("yaml"));
		assert_eq!(policy.style_key_for_tag("sh"), policy.style_key_for_tag("bash"));
	}

	#[rstest]
	#[case("totally-unknown")]
	#[case("JSON")]
	#[case("shell")]
	#[case("")]
	fn unknown_tags_map_to_default(#[case] tag: &str) {
		assert!(TagPolicy::builtin().style_key_for_tag(tag).is_default());
	}

	#[test]
	fn builtin_allow_list_covers_table() {
		let allow = TagPolicy::builtin().resolve_allow_list();
		assert_eq!(allow.len(), BUILTIN_TAGS.len());
		for (tag, _) in BUILTIN_TAGS {
			assert!(allow.contains(tag), "{tag} missing");
		}
		assert!(!allow.contains("shell"));
	}

	#[test]
	fn empty_user_mapping_falls_back_to_builtin() {
		let policy = TagPolicy::new(Vec::new(), true);
		assert_eq!(policy.source(), TagSource::Builtin);
		assert!(policy.resolve_allow_list().contains("json"));
	}

	#[test]
	fn empty_user_mapping_keeps_enabled_flag() {
		assert!(!TagPolicy::new(Vec::new(), false).is_enabled());
	}

	#[test]
	fn user_mapping_replaces_builtin_verbatim() {
		let policy = TagPolicy::new(
			[("sqlx".to_string(), "sql".to_string()), ("my-tag".to_string(), "Weird Key".to_string())],
			true,
		);

		assert_eq!(policy.source(), TagSource::User);
		assert_eq!(policy.resolve_allow_list().sorted(), vec!["my-tag", "sqlx"]);
		assert_eq!(policy.style_key_for_tag("sqlx"), "sql");
		assert_eq!(policy.style_key_for_tag("my-tag"), "Weird Key");
		assert!(policy.style_key_for_tag("json").is_default());
	}

	#[test]
	fn tags_iterate_in_table_order() {
		let policy = TagPolicy::builtin();
		let first: Vec<&str> = policy.tags().take(4).map(|(tag, _)| tag).collect();
		assert_eq!(first, vec!["json", "html", "css", "scss"]);
	}

	#[test]
	fn enabled_by_default() {
		assert!(TagPolicy::default().is_enabled());
		assert!(!TagPolicy::builtin().with_enabled(false).is_enabled());
	}
}
