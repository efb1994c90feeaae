use std::sync::Arc;

use indexmap::IndexMap;
use tagtint_primitives::StyleKey;

/// One lazily created style handle per style key.
///
/// Within an epoch, every [`acquire`](Self::acquire) of a key returns the same
/// `Arc`. [`invalidate_all`](Self::invalidate_all) releases every handle at
/// once and starts a new epoch, so stale handles never coexist with fresh ones.
#[derive(Debug)]
pub struct StyleCache<H> {
	handles: IndexMap<StyleKey, Arc<H>>,
	epoch: u64,
}

impl<H> Default for StyleCache<H> {
	fn default() -> Self {
		Self {
			handles: IndexMap::new(),
			epoch: 0,
		}
	}
}

impl<H> StyleCache<H> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the handle for `key`, calling `create` only on first request.
	pub fn acquire(&mut self, key: &StyleKey, create: impl FnOnce(&StyleKey) -> H) -> Arc<H> {
		if let Some(handle) = self.handles.get(key) {
			return Arc::clone(handle);
		}
		let handle = Arc::new(create(key));
		tracing::debug!(key = %key, epoch = self.epoch, "style_cache.create");
		self.handles.insert(key.clone(), Arc::clone(&handle));
		handle
	}

	pub fn get(&self, key: &str) -> Option<&Arc<H>> {
		self.handles.get(key)
	}

	/// Releases every handle in creation order and empties the cache.
	pub fn invalidate_all(&mut self, mut release: impl FnMut(StyleKey, Arc<H>)) {
		let released = self.handles.len();
		for (key, handle) in self.handles.drain(..) {
			release(key, handle);
		}
		self.epoch += 1;
		tracing::debug!(released, epoch = self.epoch, "style_cache.invalidate");
	}

	/// Cached handles in creation order.
	pub fn iter(&self) -> impl Iterator<Item = (&StyleKey, &Arc<H>)> + '_ {
		self.handles.iter()
	}

	pub fn len(&self) -> usize {
		self.handles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}

	/// Number of completed invalidations.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}
}
