//! Abstract color and style types for decoration themes.
//!
//! These types describe how a style key should look without depending on any
//! terminal or UI library. Conversion to crossterm types happens at the
//! rendering boundary in the `tagtint` binary.

use serde::{Deserialize, Serialize};

/// An abstract color representation.
///
/// Mirrors standard ANSI terminal color capabilities. Colors 0-7 are the
/// regular colors, 8-15 are bright variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
	/// Resets to the surface default.
	#[default]
	Reset,
	/// ANSI 0
	Black,
	/// ANSI 1
	Red,
	/// ANSI 2
	Green,
	/// ANSI 3
	Yellow,
	/// ANSI 4
	Blue,
	/// ANSI 5
	Magenta,
	/// ANSI 6
	Cyan,
	/// ANSI 7 (often rendered as light gray)
	Gray,
	/// ANSI 8
	DarkGray,
	/// ANSI 9
	LightRed,
	/// ANSI 10
	LightGreen,
	/// ANSI 11
	LightYellow,
	/// ANSI 12
	LightBlue,
	/// ANSI 13
	LightMagenta,
	/// ANSI 14
	LightCyan,
	/// ANSI 15
	White,
	/// True color RGB.
	Rgb(u8, u8, u8),
	/// 256-color palette index.
	Indexed(u8),
}

/// Text style modifiers (bold, italic, underline, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifier(u16);

impl Modifier {
	pub const NONE: Self = Self(0);
	pub const BOLD: Self = Self(1 << 0);
	pub const DIM: Self = Self(1 << 1);
	pub const ITALIC: Self = Self(1 << 2);
	pub const UNDERLINED: Self = Self(1 << 3);
	pub const REVERSED: Self = Self(1 << 4);
	pub const CROSSED_OUT: Self = Self(1 << 5);

	/// Creates an empty modifier set.
	#[inline]
	pub const fn empty() -> Self {
		Self(0)
	}

	#[inline]
	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Returns true if every bit of `other` is set in `self`.
	#[inline]
	pub const fn contains(self, other: Self) -> bool {
		(self.0 & other.0) == other.0
	}

	#[inline]
	pub const fn union(self, other: Self) -> Self {
		Self(self.0 | other.0)
	}
}

impl std::ops::BitOr for Modifier {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self::Output {
		self.union(rhs)
	}
}

impl std::ops::BitOrAssign for Modifier {
	fn bitor_assign(&mut self, rhs: Self) {
		*self = self.union(rhs);
	}
}

/// A complete text style with optional foreground, background, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Style {
	pub fg: Option<Color>,
	pub bg: Option<Color>,
	pub modifiers: Modifier,
}

impl Style {
	/// Creates an empty style.
	pub const fn new() -> Self {
		Self {
			fg: None,
			bg: None,
			modifiers: Modifier::NONE,
		}
	}

	pub const fn fg(mut self, color: Color) -> Self {
		self.fg = Some(color);
		self
	}

	pub const fn bg(mut self, color: Color) -> Self {
		self.bg = Some(color);
		self
	}

	pub const fn add_modifier(mut self, modifier: Modifier) -> Self {
		self.modifiers = self.modifiers.union(modifier);
		self
	}

	/// Layers `other` on top of `self`: set colors replace, modifiers accumulate.
	pub const fn patch(mut self, other: Style) -> Self {
		if let Some(fg) = other.fg {
			self.fg = Some(fg);
		}
		if let Some(bg) = other.bg {
			self.bg = Some(bg);
		}
		self.modifiers = self.modifiers.union(other.modifiers);
		self
	}

	/// Returns true if applying this style would change nothing.
	pub const fn is_plain(&self) -> bool {
		self.fg.is_none() && self.bg.is_none() && self.modifiers.is_empty()
	}
}
