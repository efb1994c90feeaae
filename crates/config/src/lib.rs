//! Configuration for tagged template decoration.
//!
//! Configuration is written in KDL (v2) and holds two optional sections:
//!
//! ```kdl
//! tagged-templates {
//!     enabled #true
//!     tags {
//!         json "json"
//!         gql "graphql"
//!     }
//! }
//!
//! theme {
//!     palette { accent "#264f78" }
//!     styles {
//!         json bg="$accent"
//!     }
//! }
//! ```
//!
//! An absent or empty `tags` block selects the built-in tag table (see
//! [`policy::BUILTIN_TAGS`]). `enabled` defaults to `#true`. The config file
//! lives at `$XDG_CONFIG_HOME/tagtint/config.kdl` unless the host passes an
//! explicit path; a missing file means defaults.

pub mod error;
pub mod kdl_util;
pub mod policy;
pub mod theme;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

pub use error::{ConfigError, Result};
pub use policy::{BUILTIN_TAGS, TagPolicy, TagSource};
pub use theme::Theme;

/// Settings of the `tagged-templates` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTemplatesConfig {
	/// Global kill switch.
	pub enabled: bool,
	/// User tag to style key mapping, in file order. Empty means built-in.
	pub tags: IndexMap<String, String>,
}

impl Default for TaggedTemplatesConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			tags: IndexMap::new(),
		}
	}
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
	pub tagged_templates: TaggedTemplatesConfig,
	/// Theme override; `None` selects [`Theme::builtin`].
	pub theme: Option<Theme>,
}

impl Config {
	/// Parse a KDL string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		let doc: kdl::KdlDocument = input.parse()?;

		let tagged_templates = match doc.get("tagged-templates").and_then(|n| n.children()) {
			Some(children) => parse_tagged_templates(children)?,
			None => TaggedTemplatesConfig::default(),
		};
		let theme = doc.get("theme").map(theme::parse_theme_node).transpose()?;

		Ok(Config { tagged_templates, theme })
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		tracing::debug!(
			path = %path.display(),
			user_tags = config.tagged_templates.tags.len(),
			enabled = config.tagged_templates.enabled,
			"config.loaded"
		);
		Ok(config)
	}

	/// Loads `path`, treating a missing file as the default configuration.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if !path.exists() {
			tracing::debug!(path = %path.display(), "config.missing");
			return Ok(Self::default());
		}
		Self::load(path)
	}

	/// Tag policy described by this configuration.
	pub fn policy(&self) -> TagPolicy {
		TagPolicy::from_config(&self.tagged_templates)
	}

	/// Configured theme, or the built-in one.
	pub fn theme_or_builtin(&self) -> Theme {
		self.theme.clone().unwrap_or_default()
	}
}

/// Default config file location, `$XDG_CONFIG_HOME/tagtint/config.kdl`.
pub fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("tagtint").join("config.kdl"))
}

fn parse_tagged_templates(children: &kdl::KdlDocument) -> Result<TaggedTemplatesConfig> {
	let enabled = kdl_util::get_bool_field(children, "enabled")?.unwrap_or(true);

	let mut tags = IndexMap::new();
	if let Some(tag_nodes) = children.get("tags").and_then(|n| n.children()) {
		for node in tag_nodes.nodes() {
			let tag = node.name().value();
			let key = node.get(0).and_then(|v| v.as_string()).ok_or_else(|| ConfigError::InvalidValue {
				field: format!("tags.{tag}"),
				expected: "a style key string",
			})?;
			tags.insert(tag.to_string(), key.to_string());
		}
	}

	Ok(TaggedTemplatesConfig { enabled, tags })
}
