//! Turns tagged spans into rendered decorations.
//!
//! * [`projection`]: groups spans by style key
//! * [`cache`]: one style handle per style key, recreated wholesale on theme change
//! * [`session`]: the refresh cycle driving a [`RenderSink`]
//! * [`scheduler`]: routes host triggers to immediate or debounced refreshes

pub mod cache;
pub mod projection;
pub mod scheduler;
pub mod session;

pub use cache::StyleCache;
pub use projection::{Projection, project};
pub use scheduler::{REFRESH_DEBOUNCE, RefreshAction, RefreshScheduler, Trigger};
pub use session::{DecorationSession, RefreshOutcome, RenderSink, StyleGroup};
