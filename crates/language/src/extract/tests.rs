use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn default_allow() -> AllowList {
	["json", "html", "css", "sql", "graphql", "gql", "yaml", "yml", "sh"].into_iter().collect()
}

/// Runs the extractor and returns `(tag, covered text)` pairs.
fn scan(src: &str, dialect: Dialect) -> Vec<(String, String)> {
	let doc = SourceDocument::new(src, dialect);
	extract_tagged_spans(&doc, &default_allow())
		.into_iter()
		.map(|span| {
			let text = doc.slice(&span).to_string();
			(span.tag, text)
		})
		.collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
	expected.iter().map(|(t, c)| (t.to_string(), c.to_string())).collect()
}

#[test]
fn sql_declaration_end_to_end() {
	let src = "const c = sql`SELECT * FROM users`";
	let doc = SourceDocument::new(src, Dialect::Ts);
	let spans = extract_tagged_spans(&doc, &default_allow());

	assert_eq!(spans.len(), 1);
	assert_eq!(spans[0].tag, "sql");
	assert_eq!(&src[spans[0].byte_range()], "SELECT * FROM users");
	assert_eq!(spans[0].start as usize, src.find('S').unwrap_or_default());
}

#[test]
fn preserves_document_order() {
	let got = scan("json`{\"id\":1}`\nhtml`<div></div>`", Dialect::Ts);
	assert_eq!(got, pairs(&[("json", "{\"id\":1}"), ("html", "<div></div>")]));
}

#[test]
fn several_templates_on_one_line() {
	let got = scan("f(json`[1]`, sql`SELECT 1`, css`a{}`)", Dialect::Js);
	assert_eq!(got, pairs(&[("json", "[1]"), ("sql", "SELECT 1"), ("css", "a{}")]));
}

#[test]
fn skips_tags_outside_allow_list() {
	let src = ["const a = json`{ \"id\": 1 }`", "const b = html`<div>${x}</div>`", "const c = nope`not included`"].join("\n");
	let got = scan(&src, Dialect::Ts);
	assert_eq!(got, pairs(&[("json", "{ \"id\": 1 }"), ("html", "<div>${x}</div>")]));
}

#[rstest]
#[case::member("const q = db.sql`SELECT 1`")]
#[case::call("const q = sql()`SELECT 1`")]
#[case::parenthesized("const q = (sql)`SELECT 1`")]
#[case::untagged("const q = `SELECT 1`")]
#[case::plain_call("const q = sql('SELECT 1')")]
fn only_bare_identifier_tags_qualify(#[case] src: &str) {
	assert_eq!(scan(src, Dialect::Ts), vec![]);
}

#[test]
fn empty_template_is_dropped() {
	assert_eq!(scan("const a = json``;", Dialect::Js), vec![]);
}

#[test]
fn nested_templates_are_reported_after_their_parent() {
	let src = "html`<ul>${json`[1]`}</ul>`";
	let got = scan(src, Dialect::Js);
	assert_eq!(got, pairs(&[("html", "<ul>${json`[1]`}</ul>"), ("json", "[1]")]));
}

#[test]
fn nested_templates_found_under_unlisted_parent() {
	let got = scan("render`${sql`SELECT 1`} and ${yaml`a: 1`}`", Dialect::Ts);
	assert_eq!(got, pairs(&[("sql", "SELECT 1"), ("yaml", "a: 1")]));
}

#[test]
fn multiline_body_in_javascript() {
	let got = scan("const a = json`{\n  \"x\": 1\n}`", Dialect::Js);
	assert_eq!(got, pairs(&[("json", "{\n  \"x\": 1\n}")]));
}

#[rstest]
#[case::ts(Dialect::Ts)]
#[case::tsx(Dialect::Tsx)]
fn typescript_type_arguments_keep_identifier_tag(#[case] dialect: Dialect) {
	let got = scan("const rows = sql<Row>`SELECT id FROM t`;", dialect);
	assert_eq!(got, pairs(&[("sql", "SELECT id FROM t")]));
}

#[test]
fn type_argument_tags_respect_allow_list() {
	let src = "const a = query<Row>`SELECT 1`;\nconst b = gql<Data>`{ a }`;";
	assert_eq!(scan(src, Dialect::Ts), pairs(&[("gql", "{ a }")]));
}

#[test]
fn javascript_comparison_with_template_is_not_a_tag() {
	assert_eq!(scan("const x = sql < Row > `SELECT 1`;", Dialect::Js), vec![]);
}

#[test]
fn templates_inside_jsx_expressions() {
	let src = "export const View = () => <pre>{json`{\"a\":1}`}</pre>;";
	assert_eq!(scan(src, Dialect::Tsx), pairs(&[("json", "{\"a\":1}")]));
	assert_eq!(scan(src, Dialect::Jsx), pairs(&[("json", "{\"a\":1}")]));
}

#[test]
fn dialect_mismatch_never_fails() {
	let src = "const el = <div>{json`{}`}</div>;";
	let doc = SourceDocument::new(src, Dialect::Ts);
	let spans = try_extract_tagged_spans(&doc, &default_allow()).expect("syntax errors are not faults");
	for span in spans {
		assert!(span.start < span.end);
		assert!(span.end as usize <= src.len());
	}
}

#[test]
fn malformed_tail_keeps_earlier_spans() {
	let src = "const a = json`[1, 2]`;\nconst b = {;\n";
	let got = scan(src, Dialect::Ts);
	assert_eq!(got.first(), Some(&("json".to_string(), "[1, 2]".to_string())));
}

#[test]
fn multibyte_content_is_sliced_on_char_boundaries() {
	let got = scan("const s = json`{\"näme\": \"→\"}`", Dialect::Ts);
	assert_eq!(got, pairs(&[("json", "{\"näme\": \"→\"}")]));
}

#[test]
fn extraction_is_idempotent() {
	let doc = SourceDocument::new("gql`query { a }`; yml`k: v`; sh`ls -la`", Dialect::Js);
	let allow = default_allow();
	assert_eq!(extract_tagged_spans(&doc, &allow), extract_tagged_spans(&doc, &allow));
}

#[test]
fn empty_allow_list_yields_nothing() {
	let doc = SourceDocument::new("json`{}`", Dialect::Js);
	assert_eq!(extract_tagged_spans(&doc, &AllowList::new()), vec![]);
}

#[test]
fn large_document_keeps_every_span() {
	const LINES: usize = 100_000;
	let src: String = (0..LINES).map(|i| format!("const v{i} = {{ a: {i} }}; json`{{\"id\":{i}}}`;\n")).collect();
	let doc = SourceDocument::new(&src, Dialect::Ts);
	let allow = default_allow();

	let spans = extract_tagged_spans(&doc, &allow);
	assert_eq!(spans.len(), LINES);
	assert_eq!(doc.slice(&spans[0]).to_string(), "{\"id\":0}");
	assert_eq!(doc.slice(&spans[LINES - 1]).to_string(), format!("{{\"id\":{}}}", LINES - 1));
	assert_eq!(extract_tagged_spans(&doc, &allow), spans);
}

#[test]
fn parse_timeout_is_opt_in() {
	assert_eq!(ExtractOptions::default().parse_timeout, Duration::ZERO);

	let doc = SourceDocument::new("const a = sql`SELECT 1`;", Dialect::Ts);
	let opts = ExtractOptions { parse_timeout: Duration::from_secs(60) };
	let spans = try_extract_tagged_spans_with(&doc, &default_allow(), opts).expect("generous timeout");
	assert_eq!(spans.len(), 1);
}

#[test]
fn panic_message_extracts_payload() {
	let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
	assert_eq!(panic_message(payload.as_ref()), "boom");
	let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
	assert_eq!(panic_message(payload.as_ref()), "bang");
}
