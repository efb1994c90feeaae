use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tagtint_config::TagPolicy;
use tagtint_language::{SourceDocument, extract_tagged_spans};
use tagtint_primitives::{AllowList, Position};

/// One reported span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRecord<'a> {
	pub path: &'a Path,
	pub tag: &'a str,
	pub style_key: String,
	pub start: u32,
	pub end: u32,
	pub from: Position,
	pub to: Position,
}

/// Output format of `tagtint scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFormat {
	Text,
	Json,
}

/// Writes every span of `document` in `format`.
///
/// Text lines read `path:line:col-line:col tag style_key` with one-based
/// positions. JSON output is one object per line.
pub fn write_spans(
	out: &mut impl Write,
	path: &Path,
	document: &SourceDocument,
	allow: &AllowList,
	policy: &TagPolicy,
	format: ScanFormat,
) -> anyhow::Result<usize> {
	let spans = extract_tagged_spans(document, allow);
	for span in &spans {
		let record = ScanRecord {
			path,
			tag: &span.tag,
			style_key: policy.style_key_for_tag(&span.tag).to_string(),
			start: span.start,
			end: span.end,
			from: document.position_at(span.start as usize),
			to: document.position_at(span.end as usize),
		};
		match format {
			ScanFormat::Text => writeln!(
				out,
				"{}:{}-{} {} {}",
				record.path.display(),
				record.from,
				record.to,
				record.tag,
				record.style_key
			)?,
			ScanFormat::Json => {
				serde_json::to_writer(&mut *out, &record)?;
				writeln!(out)?;
			}
		}
	}
	Ok(spans.len())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use tagtint_language::Dialect;

	use super::*;

	fn scan(text: &str, format: ScanFormat) -> String {
		let policy = TagPolicy::builtin();
		let document = SourceDocument::new(text, Dialect::Js);
		let mut out = Vec::new();
		write_spans(&mut out, Path::new("q.js"), &document, &policy.resolve_allow_list(), &policy, format).unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn text_lines_use_one_based_positions() {
		let out = scan("const q = sql`SELECT * FROM users`;\nconst g = gql`\n  { me }\n`;\n", ScanFormat::Text);
		assert_eq!(out, "q.js:1:15-1:34 sql sql\nq.js:2:15-4:1 gql graphql\n");
	}

	#[test]
	fn json_records_carry_offsets_and_style_key() {
		let out = scan("json`{}`", ScanFormat::Json);
		let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
		assert_eq!(value["path"], "q.js");
		assert_eq!(value["tag"], "json");
		assert_eq!(value["style_key"], "json");
		assert_eq!(value["start"], 5);
		assert_eq!(value["end"], 7);
		assert_eq!(value["from"]["line"], 0);
		assert_eq!(value["from"]["column"], 5);
	}

	#[test]
	fn nothing_is_written_without_spans() {
		assert_eq!(scan("let x = `plain`;", ScanFormat::Text), "");
	}
}
