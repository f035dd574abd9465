use std::{fmt, sync::Arc};

use convert_case::{Case, Casing};
use geom::{Margin, Padding, Point, Rect};

use crate::{
    cursor::Cursor, dock::Dock, id::NodeId, observers::Observers, skin::Skin, widget::Widget,
};

/// Return true if the character is valid in a node name.
fn valid_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// A node name: lowercase ASCII alphanumerics plus underscores.
///
/// Names default to the widget's type name and are used in debug dumps and
/// [`Canvas::find_child`](crate::Canvas::find_child) lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    /// Stored name string.
    name: String,
}

impl NodeName {
    /// Munge an arbitrary string into a valid node name: snake case it,
    /// then strip invalid characters. Falls back to "node" when nothing
    /// survives.
    pub fn convert(name: &str) -> Self {
        let raw = name.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|c| valid_name_char(*c)).collect();
        let name = if filtered.is_empty() {
            "node".to_string()
        } else {
            filtered
        };
        Self { name }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state. Empty while a hook on this node is being
    /// dispatched.
    pub(crate) widget: Option<Box<dyn Widget>>,

    /// Structural parent: the node whose child list contains this node.
    pub(crate) parent: Option<NodeId>,
    /// The parent callers see when an inner-panel indirection routed the
    /// attachment elsewhere. `None` when it matches the structural parent.
    pub(crate) logical_parent: Option<NodeId>,
    /// Children in z-order: index 0 is the back, the last entry the front.
    pub(crate) children: Vec<NodeId>,
    /// Designated direct child that transparently receives new children.
    pub(crate) inner_panel: Option<NodeId>,

    /// Bounds relative to the structural parent, post-layout.
    pub(crate) bounds: Rect,
    /// Interior left after the layout pass docked non-fill children.
    pub(crate) inner_bounds: Rect,
    /// Requested spacing outside the bounds.
    pub(crate) margin: Margin,
    /// Spacing reserved inside the bounds before children are placed.
    pub(crate) padding: Padding,
    /// Edge-consumption directives for the parent's layout pass.
    pub(crate) dock: Dock,
    /// Lower bound applied to the size by `set_bounds`.
    pub(crate) min_size: Point,
    /// Upper bound applied to the size by `set_bounds`.
    pub(crate) max_size: Point,

    /// Node visibility; hidden nodes are skipped by layout, render, and
    /// hit-testing.
    pub(crate) hidden: bool,
    /// Disabled nodes keep rendering but receive no mouse events.
    pub(crate) disabled: bool,
    /// Whether hit-testing may resolve to this node.
    pub(crate) mouse_input: bool,
    /// Whether key events are dispatched when this node is focused.
    pub(crate) keyboard_input: bool,
    /// Whether the node participates in the tab chain.
    pub(crate) tabable: bool,
    /// Opt-in to the cache-to-texture render path.
    pub(crate) cached: bool,

    /// The next layout pass should run this node's layout hook.
    pub(crate) needs_layout: bool,
    /// The node's cached texture no longer matches its content.
    pub(crate) cache_dirty: bool,
    /// A widget hook reported a resource failure; render substitutes the
    /// skin placeholder until cleared.
    pub(crate) resource_failed: bool,

    /// Pointer shape requested while hovered.
    pub(crate) cursor: Cursor,
    /// Name for dumps and lookups.
    pub(crate) name: NodeName,
    /// Skin override for this node's subtree.
    pub(crate) skin: Option<Arc<dyn Skin>>,

    /// Observers fired when the pointer enters the node.
    pub(crate) hover_enter: Observers,
    /// Observers fired when the pointer leaves the node.
    pub(crate) hover_leave: Observers,
}

impl Node {
    /// Build a node around a widget with the default attribute set: visible,
    /// enabled, mouse input on, keyboard input off, not tabable, dirty for
    /// layout and cache.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        Self {
            widget: Some(widget),
            parent: None,
            logical_parent: None,
            children: Vec::new(),
            inner_panel: None,
            bounds: Rect::new(0, 0, 10, 10),
            inner_bounds: Rect::zero(),
            margin: Margin::zero(),
            padding: Padding::zero(),
            dock: Dock::empty(),
            min_size: Point::new(1, 1),
            max_size: Point::new(4096, 4096),
            hidden: false,
            disabled: false,
            mouse_input: true,
            keyboard_input: false,
            tabable: false,
            cached: false,
            needs_layout: true,
            cache_dirty: true,
            resource_failed: false,
            cursor: Cursor::Arrow,
            name,
            skin: None,
            hover_enter: Observers::default(),
            hover_leave: Observers::default(),
        }
    }

    /// The node's name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// The parent callers see: the logical parent when an inner-panel
    /// indirection is active, the structural parent otherwise.
    pub fn parent(&self) -> Option<NodeId> {
        self.logical_parent.or(self.parent)
    }

    /// The structural parent: the node whose child list contains this one.
    pub fn structural_parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in z-order, back to front.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The designated inner panel, if any.
    pub fn inner_panel(&self) -> Option<NodeId> {
        self.inner_panel
    }

    /// Bounds relative to the structural parent.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The bounds placed at the origin: the node's own coordinate space.
    pub fn render_bounds(&self) -> Rect {
        self.bounds.at_origin()
    }

    /// Interior remaining after the last layout pass docked non-fill
    /// children.
    pub fn inner_bounds(&self) -> Rect {
        self.inner_bounds
    }

    /// Requested outer spacing.
    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Reserved interior spacing.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Docking directives.
    pub fn dock(&self) -> Dock {
        self.dock
    }

    /// Minimum size enforced by `set_bounds`.
    pub fn min_size(&self) -> Point {
        self.min_size
    }

    /// Maximum size enforced by `set_bounds`.
    pub fn max_size(&self) -> Point {
        self.max_size
    }

    /// Is the node hidden?
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Is the node disabled?
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Does hit-testing resolve to this node?
    pub fn mouse_input(&self) -> bool {
        self.mouse_input
    }

    /// Are key events dispatched when this node is focused?
    pub fn keyboard_input(&self) -> bool {
        self.keyboard_input
    }

    /// Does the node participate in the tab chain?
    pub fn is_tabable(&self) -> bool {
        self.tabable
    }

    /// Has the node opted into the cache-to-texture path?
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Will the next layout pass run this node's layout hook?
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Is the node's cached texture stale?
    pub fn is_cache_dirty(&self) -> bool {
        self.cache_dirty
    }

    /// Did a widget hook report a resource failure?
    pub fn resource_failed(&self) -> bool {
        self.resource_failed
    }

    /// Pointer shape requested while hovered.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_conversion() {
        assert_eq!(NodeName::convert("MyWidget"), "my_widget");
        assert_eq!(NodeName::convert("FooBar Voing"), "foo_bar_voing");
        assert_eq!(NodeName::convert(""), "node");
        assert_eq!(NodeName::convert("!!!"), "node");
        assert_eq!(NodeName::convert("already_fine"), "already_fine");
    }
}
