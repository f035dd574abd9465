//! Integer geometry primitives used across arbor.
//!
//! All types are plain-old-data with signed coordinates. Sizes are kept
//! non-negative by every constructor and operation; there is no floating
//! point anywhere in this crate.

/// Margin insets.
mod margin;
/// Padding insets.
mod padding;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use margin::Margin;
pub use padding::Padding;
pub use point::Point;
pub use rect::Rect;
