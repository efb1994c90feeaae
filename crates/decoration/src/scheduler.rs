use std::time::{Duration, Instant};

use tagtint_primitives::TrailingDebounce;

/// Quiescence window for edit and configuration bursts.
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Host event that may require new decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
	FocusChanged,
	VisibleSurfacesChanged,
	DocumentEdited,
	ConfigChanged,
	ThemeChanged,
}

/// Work the host should do now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
	/// Refresh the visible surfaces.
	Repaint,
	/// Invalidate all style handles, then refresh.
	Restyle,
}

/// Routes host triggers to immediate or debounced refreshes.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
	debounce: TrailingDebounce<Trigger>,
}

impl Default for RefreshScheduler {
	fn default() -> Self {
		Self::new(REFRESH_DEBOUNCE)
	}
}

impl RefreshScheduler {
	pub fn new(window: Duration) -> Self {
		Self {
			debounce: TrailingDebounce::new(window),
		}
	}

	/// Classifies `trigger`. Returns the action to run immediately, if any.
	///
	/// An immediate action also absorbs a pending debounced refresh, since it
	/// repaints from current state anyway.
	pub fn on_trigger(&mut self, trigger: Trigger, now: Instant) -> Option<RefreshAction> {
		let action = match trigger {
			Trigger::FocusChanged | Trigger::VisibleSurfacesChanged => RefreshAction::Repaint,
			Trigger::ThemeChanged => RefreshAction::Restyle,
			Trigger::DocumentEdited | Trigger::ConfigChanged => {
				self.debounce.request(now, trigger);
				tracing::trace!(?trigger, "refresh.deferred");
				return None;
			}
		};
		if let Some(absorbed) = self.debounce.cancel() {
			tracing::trace!(?absorbed, ?trigger, "refresh.absorbed");
		}
		Some(action)
	}

	/// Returns a repaint once the debounce window has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<RefreshAction> {
		self.debounce.poll(now).map(|trigger| {
			tracing::trace!(?trigger, "refresh.due");
			RefreshAction::Repaint
		})
	}

	/// When the pending refresh falls due.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.debounce.deadline()
	}

	pub fn is_pending(&self) -> bool {
		self.debounce.is_pending()
	}
}
