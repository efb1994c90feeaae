//! ANSI rendering of decorated documents.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::ops::Range;

use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use tagtint_config::Theme;
use tagtint_decoration::{RenderSink, StyleGroup};
use tagtint_primitives::{Color, Modifier, Style, StyleKey, SurfaceId};

/// Styled spans last rendered on a surface.
pub type Frame = Vec<(Style, Vec<Range<u32>>)>;

/// [`RenderSink`] whose handles are theme styles and whose surfaces are
/// buffered frames, painted on demand.
#[derive(Debug, Default)]
pub struct TerminalSink {
	theme: Theme,
	frames: BTreeMap<SurfaceId, Frame>,
}

impl TerminalSink {
	pub fn new(theme: Theme) -> Self {
		Self {
			theme,
			frames: BTreeMap::new(),
		}
	}

	/// Replaces the theme. Existing handles keep their old style until the
	/// session restyles.
	pub fn set_theme(&mut self, theme: Theme) {
		self.theme = theme;
	}

	pub fn frame(&self, surface: SurfaceId) -> &[(Style, Vec<Range<u32>>)] {
		self.frames.get(&surface).map(Vec::as_slice).unwrap_or_default()
	}

	/// Writes `text` with the current frame of `surface` applied.
	pub fn paint(&self, surface: SurfaceId, text: &str, out: &mut impl Write) -> io::Result<()> {
		paint_text(text, self.frame(surface), out)
	}
}

impl RenderSink for TerminalSink {
	type Handle = Style;

	fn create_style(&mut self, key: &StyleKey) -> Style {
		self.theme.style_for(key)
	}

	fn release_style(&mut self, key: &StyleKey, _handle: &Style) {
		tracing::trace!(key = %key, "terminal.release_style");
	}

	fn render(&mut self, surface: SurfaceId, groups: &[StyleGroup<'_, Style>]) {
		let frame: Frame = groups
			.iter()
			.filter(|group| !group.spans.is_empty())
			.map(|group| (**group.handle, group.spans.to_vec()))
			.collect();
		if frame.is_empty() {
			self.frames.remove(&surface);
		} else {
			self.frames.insert(surface, frame);
		}
	}
}

/// Splits `0..len` into runs that share one style.
///
/// Where spans nest, the innermost one (latest start, then earliest end)
/// wins. Boundaries that fall inside a UTF-8 sequence of `text` are ignored.
pub fn segments(text: &str, frame: &[(Style, Vec<Range<u32>>)]) -> Vec<(Range<usize>, Option<Style>)> {
	let len = text.len();
	let spans: Vec<(Range<usize>, Style)> = frame
		.iter()
		.flat_map(|(style, ranges)| {
			ranges
				.iter()
				.map(move |r| ((r.start as usize).min(len)..(r.end as usize).min(len), *style))
		})
		.filter(|(r, _)| !r.is_empty())
		.collect();

	let mut cuts: Vec<usize> = spans.iter().flat_map(|(r, _)| [r.start, r.end]).collect();
	cuts.extend([0, len]);
	cuts.retain(|&cut| text.is_char_boundary(cut));
	cuts.sort_unstable();
	cuts.dedup();

	let mut runs: Vec<(Range<usize>, Option<Style>)> = Vec::new();
	for pair in cuts.windows(2) {
		let run = pair[0]..pair[1];
		let style = spans
			.iter()
			.filter(|(r, _)| r.start <= run.start && run.end <= r.end)
			.max_by_key(|(r, _)| (r.start, std::cmp::Reverse(r.end)))
			.map(|(_, style)| *style);
		match runs.last_mut() {
			Some((last, last_style)) if *last_style == style => last.end = run.end,
			_ => runs.push((run, style)),
		}
	}
	runs
}

/// Writes `text` to `out`, styling each run of the frame.
pub fn paint_text(text: &str, frame: &[(Style, Vec<Range<u32>>)], out: &mut impl Write) -> io::Result<()> {
	for (range, style) in segments(text, frame) {
		let chunk = &text[range];
		match style {
			Some(style) if !style.is_plain() => {
				apply_style(out, style)?;
				queue!(out, Print(chunk), SetAttribute(Attribute::Reset), ResetColor)?;
			}
			_ => queue!(out, Print(chunk))?,
		}
	}
	out.flush()
}

fn apply_style(out: &mut impl Write, style: Style) -> io::Result<()> {
	if let Some(fg) = style.fg {
		queue!(out, SetForegroundColor(to_crossterm(fg)))?;
	}
	if let Some(bg) = style.bg {
		queue!(out, SetBackgroundColor(to_crossterm(bg)))?;
	}
	for (modifier, attribute) in [
		(Modifier::BOLD, Attribute::Bold),
		(Modifier::DIM, Attribute::Dim),
		(Modifier::ITALIC, Attribute::Italic),
		(Modifier::UNDERLINED, Attribute::Underlined),
		(Modifier::REVERSED, Attribute::Reverse),
		(Modifier::CROSSED_OUT, Attribute::CrossedOut),
	] {
		if style.modifiers.contains(modifier) {
			queue!(out, SetAttribute(attribute))?;
		}
	}
	Ok(())
}

/// Maps a theme colour onto the terminal palette.
pub fn to_crossterm(color: Color) -> crossterm::style::Color {
	use crossterm::style::Color as C;
	match color {
		Color::Reset => C::Reset,
		Color::Black => C::Black,
		Color::Red => C::DarkRed,
		Color::Green => C::DarkGreen,
		Color::Yellow => C::DarkYellow,
		Color::Blue => C::DarkBlue,
		Color::Magenta => C::DarkMagenta,
		Color::Cyan => C::DarkCyan,
		Color::Gray => C::Grey,
		Color::DarkGray => C::DarkGrey,
		Color::LightRed => C::Red,
		Color::LightGreen => C::Green,
		Color::LightYellow => C::Yellow,
		Color::LightBlue => C::Blue,
		Color::LightMagenta => C::Magenta,
		Color::LightCyan => C::Cyan,
		Color::White => C::White,
		Color::Rgb(r, g, b) => C::Rgb { r, g, b },
		Color::Indexed(i) => C::AnsiValue(i),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	fn bg(r: u8) -> Style {
		Style::new().bg(Color::Rgb(r, 0, 0))
	}

	#[test]
	fn unstyled_text_is_one_run() {
		assert_eq!(segments("abc", &[]), vec![(0..3, None)]);
	}

	#[test]
	fn single_span_splits_text() {
		let frame = vec![(bg(1), vec![4..7])];
		assert_eq!(segments("sql`abc`;", &frame), vec![(0..4, None), (4..7, Some(bg(1))), (7..9, None)]);
	}

	#[test]
	fn innermost_span_wins() {
		let frame = vec![(bg(1), vec![0..10]), (bg(2), vec![3..5])];
		assert_eq!(
			segments("0123456789", &frame),
			vec![(0..3, Some(bg(1))), (3..5, Some(bg(2))), (5..10, Some(bg(1)))]
		);
	}

	#[test]
	fn adjacent_runs_with_same_style_merge() {
		let frame = vec![(bg(1), vec![0..2, 2..4])];
		assert_eq!(segments("abcd", &frame), vec![(0..4, Some(bg(1)))]);
	}

	#[test]
	fn cuts_inside_a_char_are_skipped() {
		// "é" occupies bytes 1..3.
		let frame = vec![(bg(1), vec![2..4])];
		assert_eq!(segments("aéb", &frame), vec![(0..4, None)]);
	}

	#[test]
	fn out_of_range_spans_are_clamped() {
		let frame = vec![(bg(1), vec![2..100])];
		assert_eq!(segments("abcd", &frame), vec![(0..2, None), (2..4, Some(bg(1)))]);
	}

	#[test]
	fn plain_paint_is_verbatim() {
		let mut out = Vec::new();
		paint_text("const a = 1;\n", &[], &mut out).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "const a = 1;\n");
	}

	#[test]
	fn styled_paint_emits_background() {
		let mut out = Vec::new();
		paint_text("x`y`", &[(Style::new().bg(Color::Rgb(1, 2, 3)), vec![2..3])], &mut out).unwrap();
		let painted = String::from_utf8(out).unwrap();
		assert!(painted.starts_with("x`"));
		assert!(painted.contains("\u{1b}[48;2;1;2;3m"));
		assert!(painted.ends_with('`'));
	}

	#[rstest]
	#[case(Color::Red, crossterm::style::Color::DarkRed)]
	#[case(Color::LightRed, crossterm::style::Color::Red)]
	#[case(Color::Gray, crossterm::style::Color::Grey)]
	#[case(Color::Indexed(42), crossterm::style::Color::AnsiValue(42))]
	#[case(Color::Rgb(1, 2, 3), crossterm::style::Color::Rgb { r: 1, g: 2, b: 3 })]
	fn converts_colors(#[case] color: Color, #[case] expected: crossterm::style::Color) {
		assert_eq!(to_crossterm(color), expected);
	}

	#[test]
	fn sink_resolves_handles_from_theme_and_drops_empty_frames() {
		let mut sink = TerminalSink::new(Theme::builtin());
		let key = StyleKey::from("sql");
		let handle = std::sync::Arc::new(sink.create_style(&key));
		assert_eq!(*handle, Theme::builtin().style_for(&key));

		let spans = [4..7];
		sink.render(SurfaceId(0), &[StyleGroup { key: &key, handle: &handle, spans: &spans }]);
		assert_eq!(sink.frame(SurfaceId(0)), &[(*handle, vec![4..7])]);

		sink.render(SurfaceId(0), &[StyleGroup { key: &key, handle: &handle, spans: &[] }]);
		assert!(sink.frame(SurfaceId(0)).is_empty());
	}
}
