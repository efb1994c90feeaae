//! Value types shared by the tagtint crates.

/// Abstract colour and style types for decoration themes.
pub mod color;
/// Trailing debounce timer for coalescing bursts of refresh requests.
pub mod debounce;
/// Style keys naming visual style buckets.
pub mod key;
/// Tagged spans, text positions, surfaces, and allow-lists.
pub mod span;

pub use color::{Color, Modifier, Style};
pub use debounce::TrailingDebounce;
pub use key::StyleKey;
pub use span::{AllowList, Position, SurfaceId, TaggedSpan};
