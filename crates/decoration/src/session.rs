//! The refresh cycle: extract, project, acquire handles, render.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use tagtint_config::TagPolicy;
use tagtint_language::{SourceDocument, extract_tagged_spans};
use tagtint_primitives::{StyleKey, SurfaceId};

use crate::cache::StyleCache;
use crate::projection::{Projection, project};

/// Rendering collaborator owned by a [`DecorationSession`].
///
/// A render call replaces everything previously drawn on the surface for the
/// handles it names. Groups with an empty span list clear their handle.
pub trait RenderSink {
	type Handle;

	fn create_style(&mut self, key: &StyleKey) -> Self::Handle;

	fn release_style(&mut self, key: &StyleKey, handle: &Self::Handle);

	fn render(&mut self, surface: SurfaceId, groups: &[StyleGroup<'_, Self::Handle>]);
}

/// Spans of one style key, drawn with one handle.
#[derive(Debug)]
pub struct StyleGroup<'a, H> {
	pub key: &'a StyleKey,
	pub handle: &'a Arc<H>,
	pub spans: &'a [Range<u32>],
}

impl<H> Clone for StyleGroup<'_, H> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<H> Copy for StyleGroup<'_, H> {}

/// What a [`DecorationSession::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// Decoration is switched off; all surfaces were cleared.
	Disabled,
	/// The document is not a JS/TS dialect.
	Unsupported,
	Rendered { spans: usize, groups: usize },
}

/// Per-host decoration state: the style cache, the sink, and the set of
/// surfaces that currently carry decorations.
pub struct DecorationSession<S: RenderSink> {
	sink: S,
	cache: StyleCache<S::Handle>,
	rendered: BTreeSet<SurfaceId>,
}

impl<S: RenderSink> DecorationSession<S> {
	pub fn new(sink: S) -> Self {
		Self {
			sink,
			cache: StyleCache::new(),
			rendered: BTreeSet::new(),
		}
	}

	pub fn sink(&self) -> &S {
		&self.sink
	}

	pub fn sink_mut(&mut self) -> &mut S {
		&mut self.sink
	}

	pub fn cache(&self) -> &StyleCache<S::Handle> {
		&self.cache
	}

	/// Surfaces that received a non-clearing render since they were last cleared.
	pub fn rendered_surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
		self.rendered.iter().copied()
	}

	/// Handle for `key`, created through the sink on first use.
	pub fn acquire_style_handle(&mut self, key: &StyleKey) -> Arc<S::Handle> {
		let sink = &mut self.sink;
		self.cache.acquire(key, |key| sink.create_style(key))
	}

	/// Releases every cached handle through the sink.
	pub fn invalidate_all(&mut self) {
		let sink = &mut self.sink;
		self.cache.invalidate_all(|key, handle| sink.release_style(&key, &handle));
	}

	/// Drops all handles after a theme change. The caller refreshes afterwards
	/// to recreate them with the new styles.
	pub fn restyle(&mut self) {
		tracing::debug!(handles = self.cache.len(), "session.restyle");
		self.invalidate_all();
	}

	/// Runs one refresh of `surface`.
	///
	/// `document` is `None` when the surface shows something other than a
	/// supported dialect.
	pub fn refresh(&mut self, surface: SurfaceId, document: Option<&SourceDocument>, policy: &TagPolicy) -> RefreshOutcome {
		if !policy.is_enabled() {
			self.clear(surface);
			self.clear_all();
			return RefreshOutcome::Disabled;
		}

		let Some(document) = document else {
			if self.rendered.contains(&surface) {
				self.clear(surface);
			}
			return RefreshOutcome::Unsupported;
		};

		let spans = extract_tagged_spans(document, &policy.resolve_allow_list());
		let projection = project(&spans, policy);
		self.apply(surface, &projection);

		tracing::trace!(
			surface = surface.0,
			dialect = %document.dialect(),
			spans = spans.len(),
			groups = projection.len(),
			"session.refresh"
		);
		RefreshOutcome::Rendered {
			spans: spans.len(),
			groups: projection.len(),
		}
	}

	/// Renders `projection` on `surface`.
	///
	/// Every cached handle gets a group, so keys missing from `projection`
	/// lose whatever they drew on the surface before.
	pub fn apply(&mut self, surface: SurfaceId, projection: &Projection) {
		for key in projection.keys() {
			self.acquire_style_handle(key);
		}

		let groups: Vec<StyleGroup<'_, S::Handle>> = self
			.cache
			.iter()
			.map(|(key, handle)| StyleGroup {
				key,
				handle,
				spans: projection.get(key.as_str()).unwrap_or_default(),
			})
			.collect();
		self.sink.render(surface, &groups);
		self.rendered.insert(surface);
	}

	/// Clears every cached handle on `surface`.
	pub fn clear(&mut self, surface: SurfaceId) {
		let groups: Vec<StyleGroup<'_, S::Handle>> = self
			.cache
			.iter()
			.map(|(key, handle)| StyleGroup { key, handle, spans: &[] })
			.collect();
		self.sink.render(surface, &groups);
		self.rendered.remove(&surface);
	}

	/// Clears every surface rendered so far.
	pub fn clear_all(&mut self) {
		for surface in std::mem::take(&mut self.rendered) {
			self.clear(surface);
		}
	}

	/// Clears all surfaces and releases every handle.
	pub fn teardown(&mut self) {
		self.clear_all();
		self.invalidate_all();
	}
}
