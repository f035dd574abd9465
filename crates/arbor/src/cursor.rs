/// Pointer shape a node requests while hovered.
///
/// The canvas reports the hovered node's cursor through
/// [`Canvas::cursor`](crate::Canvas::cursor); applying it is the embedder's
/// job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// The platform default arrow.
    #[default]
    Arrow,
    /// A pointing hand, for clickable elements.
    Hand,
    /// A text I-beam.
    Beam,
    /// Horizontal resize.
    SizeWE,
    /// Vertical resize.
    SizeNS,
    /// Diagonal resize, north-west to south-east.
    SizeNWSE,
    /// Diagonal resize, north-east to south-west.
    SizeNESW,
    /// Omnidirectional move.
    SizeAll,
    /// The action is unavailable.
    No,
    /// A wait indicator.
    Wait,
}
