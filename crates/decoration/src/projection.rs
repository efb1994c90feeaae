use std::ops::Range;

use indexmap::IndexMap;
use tagtint_config::TagPolicy;
use tagtint_primitives::{StyleKey, TaggedSpan};

/// Spans grouped by style key.
///
/// Buckets appear in order of first use and keep the input order of their
/// spans, so a projection of an ordered span sequence is itself ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
	buckets: IndexMap<StyleKey, Vec<Range<u32>>>,
}

impl Projection {
	pub fn get(&self, key: &str) -> Option<&[Range<u32>]> {
		self.buckets.get(key).map(Vec::as_slice)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&StyleKey, &[Range<u32>])> + '_ {
		self.buckets.iter().map(|(key, spans)| (key, spans.as_slice()))
	}

	pub fn keys(&self) -> impl Iterator<Item = &StyleKey> + '_ {
		self.buckets.keys()
	}

	/// Number of buckets.
	pub fn len(&self) -> usize {
		self.buckets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}

	/// Number of spans across all buckets.
	pub fn span_count(&self) -> usize {
		self.buckets.values().map(Vec::len).sum()
	}
}

/// Groups `spans` by the style key `policy` assigns to their tag.
pub fn project(spans: &[TaggedSpan], policy: &TagPolicy) -> Projection {
	let mut buckets: IndexMap<StyleKey, Vec<Range<u32>>> = IndexMap::new();
	for span in spans {
		buckets.entry(policy.style_key_for_tag(&span.tag)).or_default().push(span.range());
	}
	Projection { buckets }
}
