//! Tagged template span extraction.

use std::borrow::Cow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tagtint_primitives::{AllowList, TaggedSpan};
use thiserror::Error;
use tree_sitter::{LanguageError, Node, Parser, Tree};

use crate::dialect::Dialect;
use crate::document::{RopeChunks, SourceDocument};

/// Options controlling one extraction.
///
/// The default parses without a time limit, so every document yields all of
/// its spans however large it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
	/// Parses running longer than this are abandoned with
	/// [`ExtractError::Timeout`]. Zero, the default, disables the limit.
	pub parse_timeout: Duration,
}

/// Faults that abort an extraction.
///
/// Syntax errors in the document are not faults; tree-sitter recovers from
/// them and the walk reports whatever templates survive.
#[derive(Error, Debug)]
pub enum ExtractError {
	/// The grammar is incompatible with the linked tree-sitter runtime.
	#[error("cannot load {dialect} grammar: {source}")]
	Grammar {
		dialect: Dialect,
		#[source]
		source: LanguageError,
	},

	/// Parsing exceeded the configured timeout.
	#[error("timeout during parsing")]
	Timeout,

	/// The parser panicked.
	#[error("parser panicked: {0}")]
	Panicked(String),
}

/// Returns the tagged template spans of `document` whose tag is allow-listed.
///
/// Spans come back in source order. Faults are logged and collapse to an empty
/// result, which is indistinguishable from a document without tagged
/// templates.
pub fn extract_tagged_spans(document: &SourceDocument, allow: &AllowList) -> Vec<TaggedSpan> {
	match try_extract_tagged_spans(document, allow) {
		Ok(spans) => spans,
		Err(err) => {
			tracing::warn!(dialect = %document.dialect(), error = %err, "extract.failed");
			Vec::new()
		}
	}
}

/// Like [`extract_tagged_spans`] but surfaces faults to the caller.
pub fn try_extract_tagged_spans(document: &SourceDocument, allow: &AllowList) -> Result<Vec<TaggedSpan>, ExtractError> {
	try_extract_tagged_spans_with(document, allow, ExtractOptions::default())
}

/// Extraction with explicit options.
pub fn try_extract_tagged_spans_with(
	document: &SourceDocument,
	allow: &AllowList,
	opts: ExtractOptions,
) -> Result<Vec<TaggedSpan>, ExtractError> {
	catch_unwind(AssertUnwindSafe(|| -> Result<Vec<TaggedSpan>, ExtractError> {
		let tree = parse(document, opts)?;
		let spans = collect_spans(&tree, document, allow);
		tracing::trace!(
			dialect = %document.dialect(),
			bytes = document.len_bytes(),
			spans = spans.len(),
			"extract.done"
		);
		Ok(spans)
	}))
	.unwrap_or_else(|payload| Err(ExtractError::Panicked(panic_message(payload.as_ref()))))
}

fn parse(document: &SourceDocument, opts: ExtractOptions) -> Result<Tree, ExtractError> {
	let dialect = document.dialect();
	let mut parser = Parser::new();
	parser
		.set_language(&dialect.grammar())
		.map_err(|source| ExtractError::Grammar { dialect, source })?;
	if !opts.parse_timeout.is_zero() {
		parser.set_timeout_micros(opts.parse_timeout.as_micros().try_into().unwrap_or(u64::MAX));
	}

	let mut chunks = RopeChunks::new(document.text());
	parser
		.parse_with(&mut |byte, _| chunks.bytes_from(byte), None)
		.ok_or(ExtractError::Timeout)
}

/// Pre-order, left-to-right walk over every node using a cursor, so nesting
/// depth never grows the call stack.
fn collect_spans(tree: &Tree, document: &SourceDocument, allow: &AllowList) -> Vec<TaggedSpan> {
	let mut spans = Vec::new();
	let mut cursor = tree.walk();

	loop {
		if let Some(span) = tagged_span(cursor.node(), document, allow) {
			spans.push(span);
		}

		if cursor.goto_first_child() {
			continue;
		}
		loop {
			if cursor.goto_next_sibling() {
				break;
			}
			if !cursor.goto_parent() {
				return spans;
			}
		}
	}
}

/// Matches `identifier` followed by a template string, and nothing else:
/// member (`a.b\`\``), call (`f()\`\``) and parenthesized tags are rejected
/// because their `function` child is not an identifier.
fn tagged_span(node: Node<'_>, document: &SourceDocument, allow: &AllowList) -> Option<TaggedSpan> {
	let (tag, template) = tag_and_template(node, document.dialect())?;

	let name: Cow<'_, str> = document.text().byte_slice(tag.start_byte()..tag.end_byte()).into();
	if !allow.contains(&name) {
		return None;
	}

	// Skip the opening backtick, exclude the closing one.
	let start = template.start_byte() + 1;
	let end = template.end_byte().saturating_sub(1);
	if end <= start {
		return None;
	}

	Some(TaggedSpan {
		start: u32::try_from(start).ok()?,
		end: u32::try_from(end).ok()?,
		tag: name.into_owned(),
	})
}

/// The tag identifier and template string of a tagged template node.
///
/// TypeScript grammars read `tag<T>\`..\`` as `(tag < T) > \`..\``, so in those
/// dialects a `>` comparison whose left side is `identifier < _` and whose
/// right side is a template counts as a tagged template with type arguments.
fn tag_and_template<'t>(node: Node<'t>, dialect: Dialect) -> Option<(Node<'t>, Node<'t>)> {
	match node.kind() {
		"call_expression" => {
			let template = node.child_by_field_name("arguments").filter(|n| n.kind() == "template_string")?;
			let tag = node.child_by_field_name("function").filter(|n| n.kind() == "identifier")?;
			Some((tag, template))
		}
		"binary_expression" if matches!(dialect, Dialect::Ts | Dialect::Tsx) => {
			let template = node.child_by_field_name("right").filter(|n| n.kind() == "template_string")?;
			let open = node.child_by_field_name("left").filter(|n| n.kind() == "binary_expression")?;
			if operator(node) != Some(">") || operator(open) != Some("<") {
				return None;
			}
			let tag = open.child_by_field_name("left").filter(|n| n.kind() == "identifier")?;
			Some((tag, template))
		}
		_ => None,
	}
}

fn operator(node: Node<'_>) -> Option<&'static str> {
	node.child_by_field_name("operator").map(|op| op.kind())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}

#[cfg(test)]
mod tests;
