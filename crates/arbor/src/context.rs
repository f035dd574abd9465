use geom::{Point, Rect};

use crate::{
    canvas::Canvas, cursor::Cursor, error::Result, id::NodeId, skin::Skin, widget::Widget,
};

/// Mutable context handed to widget hooks, bound to the hook's node.
///
/// Most methods are conveniences that operate on the bound node;
/// [`canvas_mut`](Context::canvas_mut) exposes the full canvas API for
/// anything else.
pub struct Context<'a> {
    /// Canvas state reference.
    canvas: &'a mut Canvas,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> Context<'a> {
    /// Create a new context for a node.
    pub(crate) fn new(canvas: &'a mut Canvas, node_id: NodeId) -> Self {
        Self { canvas, node_id }
    }

    /// The node this context is bound to.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// The root of the tree.
    pub fn root_id(&self) -> NodeId {
        self.canvas.root()
    }

    /// Shared access to the whole canvas.
    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    /// Mutable access to the whole canvas.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        self.canvas
    }

    /// Bounds of the bound node, relative to its structural parent.
    pub fn bounds(&self) -> Rect {
        self.canvas.node(self.node_id).bounds()
    }

    /// Interior left for fill children after the last layout pass.
    pub fn inner_bounds(&self) -> Rect {
        self.canvas.node(self.node_id).inner_bounds()
    }

    /// The bound node's parent.
    pub fn parent(&self) -> Option<NodeId> {
        self.canvas.node(self.node_id).parent()
    }

    /// Children of the bound node in z-order.
    pub fn children(&self) -> Vec<NodeId> {
        self.canvas.node(self.node_id).children().to_vec()
    }

    /// Does the bound node have keyboard focus?
    pub fn is_focused(&self) -> bool {
        self.canvas.focused() == Some(self.node_id)
    }

    /// Move keyboard focus. Returns `true` if focus changed.
    pub fn set_focus(&mut self, node: NodeId) -> bool {
        self.canvas.set_focus(node)
    }

    /// Focus the bound node.
    pub fn focus(&mut self) -> bool {
        self.canvas.set_focus(self.node_id)
    }

    /// Convert a point from the bound node's space to canvas space.
    pub fn to_canvas(&self, p: Point) -> Point {
        self.canvas.to_canvas(self.node_id, p)
    }

    /// Convert a point from canvas space to the bound node's space.
    pub fn to_local(&self, p: Point) -> Point {
        self.canvas.to_local(self.node_id, p)
    }

    /// Mark the bound node for layout.
    pub fn invalidate(&mut self) {
        self.canvas.invalidate(self.node_id);
    }

    /// Request a repaint of the bound node.
    pub fn redraw(&mut self) {
        self.canvas.redraw(self.node_id);
    }

    /// Set the pointer shape shown while the bound node is hovered.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.canvas.set_cursor(self.node_id, cursor);
    }

    /// Add a widget as a child of the bound node.
    pub fn add_child(&mut self, widget: impl Into<Box<dyn Widget>>) -> Result<NodeId> {
        self.canvas.insert(self.node_id, widget)
    }

    /// Remove a node and its subtree. Safe to call from any hook; removal
    /// is deferred when a traversal is in progress.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        self.canvas.remove(node)
    }

    /// Hide the bound node.
    pub fn hide(&mut self) {
        self.canvas.set_hidden(self.node_id, true);
    }

    /// Show the bound node.
    pub fn show(&mut self) {
        self.canvas.set_hidden(self.node_id, false);
    }
}

/// Read-only context handed to widget render hooks.
pub struct RenderContext<'a> {
    /// Canvas state reference.
    canvas: &'a Canvas,
    /// Node being rendered.
    node_id: NodeId,
    /// Skin in effect for this node, overrides resolved.
    skin: &'a dyn Skin,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context for a node.
    pub(crate) fn new(canvas: &'a Canvas, node_id: NodeId, skin: &'a dyn Skin) -> Self {
        Self {
            canvas,
            node_id,
            skin,
        }
    }

    /// The node being rendered.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Shared access to the whole canvas.
    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    /// The node's rectangle in its own coordinate space.
    pub fn bounds(&self) -> Rect {
        self.canvas.node(self.node_id).render_bounds()
    }

    /// The skin in effect for this node.
    pub fn skin(&self) -> &dyn Skin {
        self.skin
    }

    /// Does the node being rendered have keyboard focus?
    pub fn is_focused(&self) -> bool {
        self.canvas.focused() == Some(self.node_id)
    }

    /// Is the pointer over the node being rendered?
    pub fn is_hovered(&self) -> bool {
        self.canvas.hovered() == Some(self.node_id)
    }

    /// Is the node being rendered disabled?
    pub fn is_disabled(&self) -> bool {
        self.canvas.node(self.node_id).is_disabled()
    }
}
