use bitflags::bitflags;

bitflags! {
    /// Edge-consumption directives for the layout pass.
    ///
    /// Edge flags may be combined; each is applied independently in the
    /// fixed order TOP, LEFT, RIGHT, BOTTOM. `FILL` is mutually
    /// authoritative: a FILL child is skipped during edge docking and
    /// receives the whole remaining interior afterwards, so combining it
    /// with an edge flag is a caller bug and is rejected by
    /// [`Canvas::set_dock`](crate::Canvas::set_dock).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Dock: u8 {
        /// Consume from the left edge of the remaining interior.
        const LEFT = 1 << 0;
        /// Consume from the top edge.
        const TOP = 1 << 1;
        /// Consume from the right edge.
        const RIGHT = 1 << 2;
        /// Consume from the bottom edge.
        const BOTTOM = 1 << 3;
        /// Receive the entire interior left over after edge docking.
        const FILL = 1 << 4;
    }
}

impl Dock {
    /// All four edge flags.
    pub const fn edges() -> Self {
        Self::LEFT
            .union(Self::TOP)
            .union(Self::RIGHT)
            .union(Self::BOTTOM)
    }

    /// A set is valid unless it combines FILL with an edge flag.
    pub fn is_valid(&self) -> bool {
        !(self.contains(Self::FILL) && self.intersects(Self::edges()))
    }
}
