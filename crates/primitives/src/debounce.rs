use std::time::{Duration, Instant};

/// Trailing-edge debounce over a pending value.
///
/// Each [`request`](Self::request) replaces the pending value and restarts the
/// quiescence window. [`poll`](Self::poll) hands out the latest value once the
/// window has elapsed without further requests, so a burst of requests fires
/// exactly once with the last value. Earlier values are superseded, never
/// queued.
///
/// Time is passed in explicitly; the caller owns the clock and the wakeups.
#[derive(Debug, Clone)]
pub struct TrailingDebounce<T> {
	window: Duration,
	pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
	since: Instant,
	value: T,
}

impl<T> TrailingDebounce<T> {
	pub fn new(window: Duration) -> Self {
		Self { window, pending: None }
	}

	pub fn window(&self) -> Duration {
		self.window
	}

	/// Records a request at `now`, superseding any pending one.
	pub fn request(&mut self, now: Instant, value: T) {
		self.pending = Some(Pending { since: now, value });
	}

	/// Returns the pending value if the window has elapsed since the last request.
	pub fn poll(&mut self, now: Instant) -> Option<T> {
		let due = self
			.pending
			.as_ref()
			.is_some_and(|p| now.saturating_duration_since(p.since) >= self.window);
		if due { self.pending.take().map(|p| p.value) } else { None }
	}

	/// Instant at which the pending request becomes due.
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|p| p.since + self.window)
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Drops the pending request without firing it.
	pub fn cancel(&mut self) -> Option<T> {
		self.pending.take().map(|p| p.value)
	}
}
