/// Semantic keyboard identifiers.
///
/// The embedder translates platform key events into these before calling
/// [`Canvas::key`](crate::Canvas::key); character-level text input is a
/// widget concern and does not pass through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Forward focus movement.
    Tab,
    /// Activation for button-like widgets.
    Space,
    /// Jump to the start.
    Home,
    /// Jump to the end.
    End,
    /// Confirm or activate.
    Return,
    /// Delete backwards.
    Backspace,
    /// Delete forwards.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Cancel or dismiss.
    Escape,
}
