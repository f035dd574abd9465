/// Mouse buttons reported to widget hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The primary button.
    Left,
    /// The middle button or wheel press.
    Middle,
    /// The secondary button.
    Right,
}
