//! KDL parsing utilities shared across config modules.

use kdl::{KdlDocument, KdlNode};
use rustc_hash::FxHashMap;
use tagtint_primitives::{Color, Modifier, Style};

use crate::error::{ConfigError, Result};

/// Context for parsing, including palette colors for variable resolution.
#[derive(Debug, Default)]
pub struct ParseContext {
	/// Named color definitions for `$variable` expansion.
	pub palette: FxHashMap<String, Color>,
}

impl ParseContext {
	/// Resolves a color value, expanding `$palette` variables.
	pub fn resolve_color(&self, value: &str) -> Result<Color> {
		if let Some(name) = value.strip_prefix('$') {
			self.palette
				.get(name)
				.copied()
				.ok_or_else(|| ConfigError::UndefinedPaletteColor(name.to_string()))
		} else {
			parse_color(value)
		}
	}
}

/// Parse a color value from a string.
///
/// Supports hex (`#RGB`, `#RRGGBB`), named colors, and `reset`/`default`.
pub fn parse_color(value: &str) -> Result<Color> {
	let value = value.trim();

	if let Some(hex) = value.strip_prefix('#') {
		return parse_hex_color(hex);
	}

	parse_named_color(value)
}

fn parse_hex_color(hex: &str) -> Result<Color> {
	let err = || ConfigError::InvalidColor(format!("#{hex}"));
	if !hex.is_ascii() {
		return Err(err());
	}

	match hex.len() {
		3 => {
			let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).map_err(|_| err())?;
			let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).map_err(|_| err())?;
			let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).map_err(|_| err())?;
			Ok(Color::Rgb(r, g, b))
		}
		6 => {
			let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| err())?;
			let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| err())?;
			let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| err())?;
			Ok(Color::Rgb(r, g, b))
		}
		_ => Err(err()),
	}
}

/// Parses a named color (e.g., "red", "light-blue") into a Color.
fn parse_named_color(name: &str) -> Result<Color> {
	let normalized = name.to_lowercase().replace(['-', '_'], "");

	match normalized.as_str() {
		"black" => Ok(Color::Black),
		"red" => Ok(Color::Red),
		"green" => Ok(Color::Green),
		"yellow" => Ok(Color::Yellow),
		"blue" => Ok(Color::Blue),
		"magenta" => Ok(Color::Magenta),
		"cyan" => Ok(Color::Cyan),
		"gray" | "grey" => Ok(Color::Gray),
		"darkgray" | "darkgrey" => Ok(Color::DarkGray),
		"lightred" => Ok(Color::LightRed),
		"lightgreen" => Ok(Color::LightGreen),
		"lightyellow" => Ok(Color::LightYellow),
		"lightblue" => Ok(Color::LightBlue),
		"lightmagenta" => Ok(Color::LightMagenta),
		"lightcyan" => Ok(Color::LightCyan),
		"white" => Ok(Color::White),
		"reset" | "default" => Ok(Color::Reset),
		_ => Err(ConfigError::InvalidColor(name.to_string())),
	}
}

/// Parse text modifiers from a space-separated string.
pub fn parse_modifier(value: &str) -> Result<Modifier> {
	let mut modifiers = Modifier::empty();

	for part in value.split_whitespace() {
		let normalized = part.to_lowercase().replace(['-', '_'], "");
		modifiers |= match normalized.as_str() {
			"bold" => Modifier::BOLD,
			"dim" => Modifier::DIM,
			"italic" => Modifier::ITALIC,
			"underlined" | "underline" => Modifier::UNDERLINED,
			"reversed" | "reverse" => Modifier::REVERSED,
			"crossedout" | "strikethrough" => Modifier::CROSSED_OUT,
			_ => return Err(ConfigError::InvalidModifier(part.to_string())),
		};
	}

	Ok(modifiers)
}

/// Parse a palette block into the context.
pub fn parse_palette(node: &KdlNode, ctx: &mut ParseContext) -> Result<()> {
	let Some(children) = node.children() else {
		return Ok(());
	};
	for child in children.nodes() {
		let name = child.name().value();
		let value = child.get(0).and_then(|v| v.as_string()).ok_or_else(|| ConfigError::InvalidValue {
			field: format!("palette.{name}"),
			expected: "a color string",
		})?;
		ctx.palette.insert(name.to_string(), parse_color(value)?);
	}
	Ok(())
}

/// Parses `fg`, `bg` and `modifiers` properties of a node into a style.
pub fn parse_style_node(node: &KdlNode, ctx: &ParseContext) -> Result<Style> {
	let mut style = Style::new();

	if let Some(fg) = string_prop(node, "fg")? {
		style = style.fg(ctx.resolve_color(fg)?);
	}
	if let Some(bg) = string_prop(node, "bg")? {
		style = style.bg(ctx.resolve_color(bg)?);
	}
	if let Some(modifiers) = string_prop(node, "modifiers")? {
		style = style.add_modifier(parse_modifier(modifiers)?);
	}
	Ok(style)
}

fn string_prop<'a>(node: &'a KdlNode, key: &str) -> Result<Option<&'a str>> {
	match node.get(key) {
		None => Ok(None),
		Some(value) => value.as_string().map(Some).ok_or_else(|| ConfigError::InvalidValue {
			field: format!("{}.{key}", node.name().value()),
			expected: "a string",
		}),
	}
}

/// Reads the first argument of the child named `name` as a boolean.
pub fn get_bool_field(doc: &KdlDocument, name: &str) -> Result<Option<bool>> {
	match doc.get_arg(name) {
		None => Ok(None),
		Some(value) => value.as_bool().map(Some).ok_or_else(|| ConfigError::InvalidValue {
			field: name.to_string(),
			expected: "#true or #false",
		}),
	}
}
