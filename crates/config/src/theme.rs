//! Decoration themes: one style per style key.
//!
//! Parses `theme { }` blocks from KDL into a [`Theme`] and provides the
//! built-in palette used when no theme is configured.

use kdl::KdlNode;
use rustc_hash::FxHashMap;
use tagtint_primitives::{Color, Style, StyleKey};

use crate::error::Result;
use crate::kdl_util::{ParseContext, parse_palette, parse_style_node};

/// Background tint applied to template bodies without a dedicated style.
const DEFAULT_BG: Color = Color::Rgb(0x2a, 0x2d, 0x2e);

/// Built-in per-key tints.
const BUILTIN_STYLES: &[(&str, Color)] = &[
	("json", Color::Rgb(0x1e, 0x3a, 0x2f)),
	("html", Color::Rgb(0x3a, 0x2a, 0x1e)),
	("css", Color::Rgb(0x1e, 0x2f, 0x3a)),
	("sql", Color::Rgb(0x33, 0x2a, 0x40)),
	("graphql", Color::Rgb(0x40, 0x1e, 0x33)),
	("yaml", Color::Rgb(0x2f, 0x3a, 0x1e)),
	("xml", Color::Rgb(0x3a, 0x33, 0x1e)),
	("ts", Color::Rgb(0x1e, 0x2a, 0x40)),
	("shell", Color::Rgb(0x26, 0x26, 0x26)),
	("java", Color::Rgb(0x3a, 0x24, 0x1e)),
	("ruby", Color::Rgb(0x40, 0x1e, 0x1e)),
	("python", Color::Rgb(0x1e, 0x33, 0x40)),
	("php", Color::Rgb(0x2a, 0x2a, 0x40)),
	("go", Color::Rgb(0x1e, 0x3a, 0x3a)),
	("csharp", Color::Rgb(0x2a, 0x1e, 0x40)),
	("markdown", Color::Rgb(0x33, 0x33, 0x33)),
	("gitignore", Color::Rgb(0x2d, 0x2d, 0x24)),
	("env", Color::Rgb(0x24, 0x2d, 0x2d)),
];

/// Maps style keys to concrete styles.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
	pub name: String,
	default: Style,
	styles: FxHashMap<String, Style>,
}

impl Default for Theme {
	fn default() -> Self {
		Self::builtin()
	}
}

impl Theme {
	pub fn builtin() -> Self {
		Self {
			name: "builtin".to_string(),
			default: Style::new().bg(DEFAULT_BG),
			styles: BUILTIN_STYLES
				.iter()
				.map(|&(key, bg)| (key.to_string(), Style::new().bg(bg)))
				.collect(),
		}
	}

	/// Style for a key, falling back to the theme's `default` style.
	pub fn style_for(&self, key: &StyleKey) -> Style {
		self.styles.get(key.as_str()).copied().unwrap_or(self.default)
	}

	pub fn default_style(&self) -> Style {
		self.default
	}

	/// Overrides the style of one key; `"default"` replaces the fallback.
	pub fn set_style(&mut self, key: &str, style: Style) {
		if key == StyleKey::DEFAULT {
			self.default = style;
		} else {
			self.styles.insert(key.to_string(), style);
		}
	}
}

/// Parses a `theme { }` node.
///
/// Styles listed under `styles` are layered over the built-in style of their
/// key (or the default style for keys without one): colours they set replace,
/// modifiers add up. Unlisted keys keep the built-in tint.
///
/// ```kdl
/// theme {
///     name "midnight"
///     palette { accent "#264f78" }
///     styles {
///         default bg="#2a2d2e"
///         json bg="$accent" modifiers="bold"
///     }
/// }
/// ```
pub fn parse_theme_node(node: &KdlNode) -> Result<Theme> {
	let mut theme = Theme::builtin();
	let Some(children) = node.children() else {
		return Ok(theme);
	};

	let mut ctx = ParseContext::default();
	if let Some(palette) = children.get("palette") {
		parse_palette(palette, &mut ctx)?;
	}

	if let Some(name) = children.get_arg("name").and_then(|v| v.as_string()) {
		theme.name = name.to_string();
	}

	if let Some(styles) = children.get("styles").and_then(|n| n.children()) {
		for style_node in styles.nodes() {
			let key = style_node.name().value();
			let base = theme.style_for(&StyleKey::from(key));
			theme.set_style(key, base.patch(parse_style_node(style_node, &ctx)?));
		}
	}

	Ok(theme)
}
