//! Canonical input event types routed through the canvas.

/// Keyboard identifiers.
mod key;
/// Mouse buttons.
mod mouse;

pub use key::Key;
pub use mouse::MouseButton;
