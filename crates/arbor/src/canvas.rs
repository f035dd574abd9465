//! The canvas: arena ownership, structural mutation, and the public
//! entry points for layout, rendering, and input.

use std::{any::Any, sync::Arc};

use geom::{Margin, Padding, Point, Rect};
use tracing::debug;

use crate::{
    context::Context,
    cursor::Cursor,
    dock::Dock,
    error::{Error, Result},
    event::{Key, MouseButton},
    focus, input,
    id::NodeId,
    layout,
    node::{Node, NodeName},
    observers::ObserverId,
    render::{self, RenderBackend},
    skin::{SimpleSkin, Skin},
    tree::Tree,
    widget::Widget,
};

/// Behavior slot for the root node. A bare container.
struct Root;

impl Widget for Root {}

/// Owner of the node arena and all cross-node interaction state.
///
/// Every operation is keyed by [`NodeId`]. Fallible structural operations
/// return [`Result`]; accessors panic on stale ids.
pub struct Canvas {
    /// Node storage arena.
    pub(crate) tree: Tree,
    /// Root node id, fixed for the canvas lifetime.
    root: NodeId,
    /// Fallback skin for nodes without a subtree override.
    skin: Arc<dyn Skin>,
    /// Currently focused node.
    pub(crate) focused: Option<NodeId>,
    /// Node currently under the pointer.
    pub(crate) hovered: Option<NodeId>,
    /// Node receiving all mouse events regardless of pointer position.
    pub(crate) mouse_capture: Option<NodeId>,
    /// First tabable node found by the last layout pass.
    pub(crate) first_tab: Option<NodeId>,
    /// Tab target after the focused node, rebuilt each layout pass.
    pub(crate) next_tab: Option<NodeId>,
    /// Last pointer position seen by [`Canvas::mouse_move`].
    pub(crate) mouse_pos: Point,
    /// Nodes whose removal was requested while a traversal was running.
    deferred: Vec<NodeId>,
    /// Raised by [`Canvas::redraw`], cleared by [`Canvas::render`].
    needs_redraw: bool,
    /// Depth of nested layout/render/input traversals.
    traversal_depth: u32,
    /// Canvas clock as of the last [`Canvas::tick`].
    time: f64,
    /// Cached nodes removed or un-cached since the last render; their
    /// backend textures are released at the next render.
    dead_textures: Vec<NodeId>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(SimpleSkin)
    }
}

impl Canvas {
    /// Create a canvas rendering with the given skin. The root node is
    /// created immediately and sized by the embedder via
    /// [`Canvas::set_bounds`].
    pub fn new(skin: impl Skin + 'static) -> Self {
        let mut tree = Tree::default();
        let root = tree.add(Box::new(Root));
        Self {
            tree,
            root,
            skin: Arc::new(skin),
            focused: None,
            hovered: None,
            mouse_capture: None,
            first_tab: None,
            next_tab: None,
            mouse_pos: Point::zero(),
            deferred: Vec::new(),
            needs_redraw: true,
            traversal_depth: 0,
            time: 0.0,
            dead_textures: Vec::new(),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to a node.
    ///
    /// Panics if `id` is stale; use [`Canvas::contains`] to probe.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.tree[id]
    }

    /// Mutable access to a node. Panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.tree[id]
    }

    /// Does `id` refer to a live node?
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The node currently under the pointer, if any.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// The node holding mouse capture, if any.
    pub fn mouse_capture(&self) -> Option<NodeId> {
        self.mouse_capture
    }

    /// First tabable node found by the last layout pass.
    pub fn first_tab(&self) -> Option<NodeId> {
        self.first_tab
    }

    /// Node that an unhandled Tab press would focus next.
    pub fn next_tab(&self) -> Option<NodeId> {
        self.next_tab
    }

    /// Canvas clock as of the last [`Canvas::tick`].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Has anything requested a repaint since the last render?
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Pointer shape requested by the hovered node, for the embedder to
    /// apply.
    pub fn cursor(&self) -> Cursor {
        self.hovered
            .map(|id| self.node(id).cursor())
            .unwrap_or_default()
    }

    /// Create a node for `widget` and attach it under `parent`, routing
    /// through the parent's inner panel when one is designated. Fires the
    /// receiving parent's `child_added` hook and invalidates it.
    pub fn insert(&mut self, parent: NodeId, widget: impl Into<Box<dyn Widget>>) -> Result<NodeId> {
        if !self.tree.contains(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let target = self.tree.attach_target(parent);
        let id = self.tree.add(widget.into());
        self.tree.attach(target, id)?;
        if target != parent {
            self.tree[id].logical_parent = Some(parent);
        }
        dispatch(self, target, |w, ctx| w.child_added(ctx, id));
        self.invalidate(target);
        self.redraw(target);
        Ok(id)
    }

    /// Remove a node and its whole subtree, dropping the widgets and
    /// releasing any cached textures. While a traversal is running the
    /// removal is queued instead and applied at the next flush.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::RootNode);
        }
        if !self.tree.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        if self.traversal_depth > 0 {
            debug!(node = ?id, "removal requested during traversal, deferring");
            self.defer_remove(id);
            return Ok(());
        }
        self.remove_now(id);
        Ok(())
    }

    /// Queue a node for removal at the next flush. Stale ids and repeat
    /// requests are no-ops.
    pub fn defer_remove(&mut self, id: NodeId) {
        if id != self.root && self.tree.contains(id) && !self.deferred.contains(&id) {
            self.deferred.push(id);
        }
    }

    /// Apply queued removals. Runs automatically at the start of
    /// [`Canvas::render`] and [`Canvas::tick`]; a no-op while a traversal
    /// holds the guard.
    pub fn flush_deferred(&mut self) {
        if self.traversal_depth > 0 {
            return;
        }
        let queue = std::mem::take(&mut self.deferred);
        for id in queue {
            if self.tree.contains(id) {
                self.remove_now(id);
            }
        }
    }

    /// Move a node under a new parent, routing through the new parent's
    /// inner panel. A no-op if the logical parent is already `new_parent`.
    pub fn set_parent(&mut self, id: NodeId, new_parent: NodeId) -> Result<()> {
        if !self.tree.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        if !self.tree.contains(new_parent) {
            return Err(Error::NodeNotFound(new_parent));
        }
        if id == self.root {
            return Err(Error::RootNode);
        }
        if self.node(id).parent() == Some(new_parent) {
            return Ok(());
        }
        let target = self.tree.attach_target(new_parent);
        // Validate before detaching so a failure cannot orphan the node.
        if target == id || self.tree.is_ancestor(id, target) {
            return Err(Error::WouldCreateCycle {
                parent: new_parent,
                child: id,
            });
        }
        if let Some(old) = self.tree.detach(id)? {
            dispatch(self, old, |w, ctx| w.child_removed(ctx, id));
            self.invalidate(old);
            self.redraw(old);
        }
        self.tree.attach(target, id)?;
        self.tree[id].logical_parent = (target != new_parent).then_some(new_parent);
        dispatch(self, target, |w, ctx| w.child_added(ctx, id));
        self.invalidate(target);
        self.redraw(target);
        Ok(())
    }

    /// Move a node to the end of its structural parent's child list, on
    /// top of its siblings. A no-op when already frontmost.
    pub fn bring_to_front(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.checked(id)?.structural_parent() else {
            return Err(Error::RootNode);
        };
        if self.tree.raise(parent, id)? {
            self.invalidate(parent);
        }
        Ok(())
    }

    /// Move a node to the start of its structural parent's child list,
    /// underneath its siblings. A no-op when already hindmost.
    pub fn send_to_back(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.checked(id)?.structural_parent() else {
            return Err(Error::RootNode);
        };
        if self.tree.lower(parent, id)? {
            self.invalidate(parent);
        }
        Ok(())
    }

    /// Designate a direct child as the node's inner panel, or clear the
    /// designation. Future attachments to the node land in the panel.
    pub fn set_inner_panel(&mut self, id: NodeId, panel: Option<NodeId>) -> Result<()> {
        if !self.tree.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        if let Some(p) = panel {
            if !self.tree.contains(p) {
                return Err(Error::NodeNotFound(p));
            }
            if self.node(p).structural_parent() != Some(id) {
                return Err(Error::NotAChild {
                    parent: id,
                    node: p,
                });
            }
        }
        self.node_mut(id).inner_panel = panel;
        Ok(())
    }

    /// Find a child by name among `id`'s structural children, descending
    /// depth-first when `recurse` is set. Direct children win over deeper
    /// matches.
    pub fn find_child(&self, id: NodeId, name: &str, recurse: bool) -> Option<NodeId> {
        for &child in self.node(id).children() {
            if self.node(child).name().as_str() == name {
                return Some(child);
            }
        }
        if recurse {
            for &child in self.node(id).children() {
                if let Some(found) = self.find_child(child, name, true) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Set a node's bounds, clamping width and height into its min/max
    /// size. Returns false if the clamped rectangle equals the current
    /// bounds. Otherwise notifies the structural parent's widget,
    /// invalidates the node iff its size changed, and redraws.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> bool {
        let (old, min, max) = {
            let node = self.node(id);
            (node.bounds(), node.min_size(), node.max_size())
        };
        let bounds = Rect::new(
            bounds.x,
            bounds.y,
            bounds.w.max(min.x).min(max.x),
            bounds.h.max(min.y).min(max.y),
        );
        if bounds == old {
            return false;
        }
        self.node_mut(id).bounds = bounds;
        if let Some(parent) = self.node(id).structural_parent() {
            dispatch(self, parent, |w, ctx| w.child_bounds_changed(ctx, old, id));
        }
        if bounds.w != old.w || bounds.h != old.h {
            self.invalidate(id);
        }
        self.redraw(id);
        true
    }

    /// Move a node to `pos`, keeping its size.
    pub fn set_pos(&mut self, id: NodeId, pos: Point) -> bool {
        let bounds = self.node(id).bounds();
        self.set_bounds(id, bounds.at(pos))
    }

    /// Resize a node in place.
    pub fn set_size(&mut self, id: NodeId, w: i32, h: i32) -> bool {
        let bounds = self.node(id).bounds();
        self.set_bounds(id, Rect::new(bounds.x, bounds.y, w, h))
    }

    /// Shift a node by `delta`.
    pub fn move_by(&mut self, id: NodeId, delta: Point) -> bool {
        let bounds = self.node(id).bounds();
        self.set_bounds(id, bounds.translate(delta))
    }

    /// Set the minimum size enforced by [`Canvas::set_bounds`].
    pub fn set_min_size(&mut self, id: NodeId, min: Point) {
        self.node_mut(id).min_size = min;
    }

    /// Set the maximum size enforced by [`Canvas::set_bounds`].
    pub fn set_max_size(&mut self, id: NodeId, max: Point) {
        self.node_mut(id).max_size = max;
    }

    /// The furthest right/bottom extent of `id`'s visible children,
    /// including their margins.
    pub fn children_size(&self, id: NodeId) -> Point {
        let mut size = Point::zero();
        for &child in self.node(id).children() {
            let node = self.node(child);
            if node.is_hidden() {
                continue;
            }
            size.x = size.x.max(node.bounds().right() + node.margin().right);
            size.y = size.y.max(node.bounds().bottom() + node.margin().bottom);
        }
        size
    }

    /// Resize a node to fit its children on the selected axes. Goes
    /// through [`Canvas::set_bounds`], so clamping and notification apply.
    pub fn size_to_children(&mut self, id: NodeId, w: bool, h: bool) -> bool {
        let size = self.children_size(id);
        let bounds = self.node(id).bounds();
        self.set_bounds(
            id,
            Rect::new(
                bounds.x,
                bounds.y,
                if w { size.x } else { bounds.w },
                if h { size.y } else { bounds.h },
            ),
        )
    }

    /// Translate a node-local point into canvas space.
    pub fn to_canvas(&self, id: NodeId, p: Point) -> Point {
        let mut p = p;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            p = p + node.bounds().pos();
            cur = node.structural_parent();
        }
        p
    }

    /// Translate a canvas-space point into node-local space.
    pub fn to_local(&self, id: NodeId, p: Point) -> Point {
        let mut p = p;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            p = p - node.bounds().pos();
            cur = node.structural_parent();
        }
        p
    }

    /// Mark a node for layout and its cached texture stale. This node
    /// only; see [`Canvas::invalidate_children`] for fan-out.
    pub fn invalidate(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.needs_layout = true;
        node.cache_dirty = true;
    }

    /// Invalidate all of a node's children, following the inner-panel
    /// indirection so logical children are reached too. The recursive form
    /// descends the whole subtree.
    pub fn invalidate_children(&mut self, id: NodeId, recursive: bool) {
        for child in self.node(id).children().to_vec() {
            self.invalidate(child);
            if recursive {
                self.invalidate_children(child, true);
            }
        }
        if let Some(panel) = self.node(id).inner_panel() {
            for child in self.node(panel).children().to_vec() {
                self.invalidate(child);
                if recursive {
                    self.invalidate_children(child, true);
                }
            }
        }
    }

    /// Mark a node's cached texture stale, bubble the same to every
    /// structural ancestor, and raise the canvas repaint flag.
    pub fn redraw(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node_mut(n);
            node.cache_dirty = true;
            cur = node.structural_parent();
        }
        self.needs_redraw = true;
    }

    /// Set a node's dock directive.
    ///
    /// Panics if `dock` combines FILL with an edge flag.
    pub fn set_dock(&mut self, id: NodeId, dock: Dock) {
        assert!(
            dock.is_valid(),
            "FILL cannot be combined with edge docking: {dock:?}"
        );
        if self.node(id).dock() == dock {
            return;
        }
        self.node_mut(id).dock = dock;
        self.invalidate(id);
        if let Some(parent) = self.node(id).structural_parent() {
            self.invalidate(parent);
        }
    }

    /// Set the space reserved around a node's outside edge.
    pub fn set_margin(&mut self, id: NodeId, margin: Margin) {
        if self.node(id).margin() == margin {
            return;
        }
        self.node_mut(id).margin = margin;
        self.invalidate(id);
        if let Some(parent) = self.node(id).structural_parent() {
            self.invalidate(parent);
        }
    }

    /// Set the inset applied to a node's interior before docking children.
    pub fn set_padding(&mut self, id: NodeId, padding: Padding) {
        if self.node(id).padding() == padding {
            return;
        }
        self.node_mut(id).padding = padding;
        self.invalidate(id);
        if let Some(parent) = self.node(id).structural_parent() {
            self.invalidate(parent);
        }
    }

    /// Hide or show a node. Hidden nodes are skipped by layout, render,
    /// and hit testing, along with their whole subtree.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if self.node(id).is_hidden() == hidden {
            return;
        }
        self.node_mut(id).hidden = hidden;
        self.invalidate(id);
    }

    /// Show a node. Sugar for `set_hidden(id, false)`.
    pub fn show(&mut self, id: NodeId) {
        self.set_hidden(id, false);
    }

    /// Hide a node. Sugar for `set_hidden(id, true)`.
    pub fn hide(&mut self, id: NodeId) {
        self.set_hidden(id, true);
    }

    /// Disable or enable a node. Disabled nodes swallow mouse buttons and
    /// are skipped by wheel bubbling, but still render and lay out.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        if self.node(id).is_disabled() == disabled {
            return;
        }
        self.node_mut(id).disabled = disabled;
        self.redraw(id);
    }

    /// Opt a node in or out of mouse hit testing.
    pub fn set_mouse_input(&mut self, id: NodeId, enabled: bool) {
        self.node_mut(id).mouse_input = enabled;
    }

    /// Opt a node in or out of keyboard dispatch while focused.
    pub fn set_keyboard_input(&mut self, id: NodeId, enabled: bool) {
        self.node_mut(id).keyboard_input = enabled;
    }

    /// Include or exclude a node from the tab chain built at layout.
    pub fn set_tabable(&mut self, id: NodeId, tabable: bool) {
        self.node_mut(id).tabable = tabable;
    }

    /// Opt a node in or out of cache-to-texture rendering. Opting out
    /// queues the node's texture for release at the next render.
    pub fn set_cached(&mut self, id: NodeId, cached: bool) {
        if self.node(id).is_cached() == cached {
            return;
        }
        self.node_mut(id).cached = cached;
        if cached {
            self.node_mut(id).cache_dirty = true;
        } else {
            self.dead_textures.push(id);
        }
    }

    /// Set the pointer shape shown while the node is hovered.
    pub fn set_cursor(&mut self, id: NodeId, cursor: Cursor) {
        self.node_mut(id).cursor = cursor;
    }

    /// Rename a node. The name is normalized the same way widget type
    /// names are.
    pub fn set_name(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).name = NodeName::convert(name);
    }

    /// Override the skin for a node and its descendants, or clear the
    /// override so the subtree inherits again.
    pub fn set_skin(&mut self, id: NodeId, skin: Option<Arc<dyn Skin>>) {
        self.node_mut(id).skin = skin;
        self.invalidate(id);
        self.redraw(id);
    }

    /// Clear a node's resource-failed marker so its own rendering is
    /// attempted again.
    pub fn clear_resource_failed(&mut self, id: NodeId) {
        if self.node(id).resource_failed() {
            self.node_mut(id).resource_failed = false;
            self.redraw(id);
        }
    }

    /// Give a node keyboard focus. Returns false when it was already
    /// focused. Fires the old node's blur hook and the new node's focus
    /// hook.
    pub fn set_focus(&mut self, id: NodeId) -> bool {
        focus::set_focus(self, id)
    }

    /// Clear keyboard focus. A no-op when nothing is focused.
    pub fn blur(&mut self) {
        focus::blur(self);
    }

    /// Route all mouse events to `id` until released, regardless of the
    /// pointer position. Panics if `id` is stale.
    pub fn capture_mouse(&mut self, id: NodeId) {
        assert!(self.tree.contains(id), "capture_mouse on a dead node: {id:?}");
        self.mouse_capture = Some(id);
    }

    /// End mouse capture. A no-op when nothing holds it.
    pub fn release_mouse(&mut self) {
        self.mouse_capture = None;
    }

    /// Register a handler fired when the pointer enters the node.
    pub fn observe_hover_enter(
        &mut self,
        id: NodeId,
        handler: impl Fn(&mut Self, NodeId) + Send + Sync + 'static,
    ) -> ObserverId {
        self.node_mut(id).hover_enter.register(handler)
    }

    /// Register a handler fired when the pointer leaves the node.
    pub fn observe_hover_leave(
        &mut self,
        id: NodeId,
        handler: impl Fn(&mut Self, NodeId) + Send + Sync + 'static,
    ) -> ObserverId {
        self.node_mut(id).hover_leave.register(handler)
    }

    /// Remove a hover-enter handler. Returns false if it was not
    /// registered.
    pub fn remove_hover_enter(&mut self, id: NodeId, observer: ObserverId) -> bool {
        self.node_mut(id).hover_enter.remove(observer)
    }

    /// Remove a hover-leave handler. Returns false if it was not
    /// registered.
    pub fn remove_hover_leave(&mut self, id: NodeId, observer: ObserverId) -> bool {
        self.node_mut(id).hover_leave.remove(observer)
    }

    /// Borrow a node's widget as a concrete type. `None` if the id is
    /// stale, the slot is taken by an in-flight dispatch, or the type does
    /// not match.
    pub fn widget_ref<W: Widget>(&self, id: NodeId) -> Option<&W> {
        let widget = self.tree.get(id)?.widget.as_deref()?;
        (widget as &dyn Any).downcast_ref::<W>()
    }

    /// Mutably borrow a node's widget as a concrete type.
    pub fn widget_mut<W: Widget>(&mut self, id: NodeId) -> Option<&mut W> {
        let widget = self.tree.get_mut(id)?.widget.as_deref_mut()?;
        (widget as &mut dyn Any).downcast_mut::<W>()
    }

    /// Run the layout pass over the whole tree, docking children and
    /// rebuilding the tab chain.
    pub fn layout(&mut self) {
        layout::layout_canvas(self);
    }

    /// Paint the whole tree onto `backend`. Flushes queued removals and
    /// runs layout first; clears the repaint flag on success.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        render::render_canvas(self, backend)
    }

    /// Advance the canvas clock and run every visible widget's tick hook.
    /// Flushes queued removals first.
    pub fn tick(&mut self, now: f64) {
        self.flush_deferred();
        self.time = now;
        let root = self.root;
        with_traversal_guard(self, |c| tick_node(c, root, now));
    }

    /// The topmost node under a canvas-space point, if any.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        input::node_at(self, p)
    }

    /// Feed pointer motion into the canvas. Returns whether a widget
    /// handled it.
    pub fn mouse_move(&mut self, p: Point) -> Result<bool> {
        with_traversal_guard(self, |c| input::mouse_move(c, p))
    }

    /// Feed a mouse button press or release into the canvas.
    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) -> Result<bool> {
        with_traversal_guard(self, |c| input::mouse_button(c, button, pressed))
    }

    /// Feed a scroll wheel step into the canvas.
    pub fn mouse_wheel(&mut self, delta: i32) -> Result<bool> {
        with_traversal_guard(self, |c| input::mouse_wheel(c, delta))
    }

    /// Feed a key press or release into the canvas.
    pub fn key(&mut self, key: Key, pressed: bool) -> Result<bool> {
        with_traversal_guard(self, |c| input::key(c, key, pressed))
    }

    /// Offer a payload dropped at a canvas-space point to the widget under
    /// it, walking up until one accepts. Returns whether any did.
    pub fn drop_at(&mut self, p: Point, payload: &dyn Any) -> Result<bool> {
        with_traversal_guard(self, |c| input::drop_at(c, p, payload))
    }

    /// Box a node's widget out of its slot for a hook call.
    pub(crate) fn take_widget(&mut self, id: NodeId) -> Option<Box<dyn Widget>> {
        self.tree.get_mut(id)?.widget.take()
    }

    /// Return a widget to its slot. Dropped instead if the node was
    /// removed while the hook ran.
    pub(crate) fn put_widget(&mut self, id: NodeId, widget: Box<dyn Widget>) {
        if let Some(node) = self.tree.get_mut(id)
            && node.widget.is_none()
        {
            node.widget = Some(widget);
        }
    }

    /// The skin a node renders with: the nearest structural ancestor's
    /// override, or the canvas default.
    pub(crate) fn resolve_skin(&self, id: NodeId) -> Arc<dyn Skin> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            if let Some(skin) = &node.skin {
                return Arc::clone(skin);
            }
            cur = node.structural_parent();
        }
        Arc::clone(&self.skin)
    }

    /// Record that a node's render hook reported a resource failure.
    pub(crate) fn mark_resource_failed(&mut self, id: NodeId) {
        self.node_mut(id).resource_failed = true;
    }

    /// Mark a node's cached texture fresh after regeneration.
    pub(crate) fn clear_cache_dirty(&mut self, id: NodeId) {
        self.node_mut(id).cache_dirty = false;
    }

    /// Drain the ids whose backend textures should be released.
    pub(crate) fn take_dead_textures(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.dead_textures)
    }

    /// Lower the repaint flag after a completed render.
    pub(crate) fn clear_needs_redraw(&mut self) {
        self.needs_redraw = false;
    }

    /// Fallible read access, for operations that report stale ids instead
    /// of panicking.
    fn checked(&self, id: NodeId) -> Result<&Node> {
        self.tree.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Immediate subtree removal. Callers have validated `id` and ensured
    /// no traversal is running.
    fn remove_now(&mut self, id: NodeId) {
        let parent = self.tree.detach(id).unwrap_or_default();
        if let Some(p) = parent {
            dispatch(self, p, |w, ctx| w.child_removed(ctx, id));
            self.invalidate(p);
            self.redraw(p);
        }
        let subtree = self.tree.subtree_post_order(id);
        for &n in &subtree {
            if self.focused == Some(n) {
                self.focused = None;
            }
            if self.hovered == Some(n) {
                self.hovered = None;
            }
            if self.mouse_capture == Some(n) {
                self.mouse_capture = None;
            }
            if self.first_tab == Some(n) {
                self.first_tab = None;
            }
            if self.next_tab == Some(n) {
                self.next_tab = None;
            }
            if self.tree[n].cached {
                self.dead_textures.push(n);
            }
        }
        for n in subtree {
            self.tree.nodes.remove(n);
        }
        self.tree.debug_assert_invariants();
    }
}

/// Run `f` with the traversal guard held. Structural removals requested
/// while the guard is up are queued instead of applied, so in-flight
/// walks never see nodes disappear. The guard is restored on unwind.
pub fn with_traversal_guard<R>(canvas: &mut Canvas, f: impl FnOnce(&mut Canvas) -> R) -> R {
    canvas.traversal_depth += 1;
    let mut guard = scopeguard::guard(canvas, |c| c.traversal_depth -= 1);
    f(&mut guard)
}

/// Run a widget hook with the node's behavior boxed out of its arena
/// slot. A reentrant dispatch to the same node finds the slot empty and
/// returns `None`; so does a stale id.
pub fn dispatch_value<T>(
    canvas: &mut Canvas,
    id: NodeId,
    f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> T,
) -> Option<T> {
    let mut widget = canvas.take_widget(id)?;
    let mut ctx = Context::new(canvas, id);
    let out = f(widget.as_mut(), &mut ctx);
    canvas.put_widget(id, widget);
    Some(out)
}

/// [`dispatch_value`] for hooks without a result.
pub fn dispatch(canvas: &mut Canvas, id: NodeId, f: impl FnOnce(&mut dyn Widget, &mut Context<'_>)) {
    dispatch_value(canvas, id, f);
}

/// Pre-order tick traversal skipping hidden subtrees.
fn tick_node(canvas: &mut Canvas, id: NodeId, now: f64) {
    if canvas.node(id).is_hidden() {
        return;
    }
    dispatch(canvas, id, |w, ctx| w.tick(ctx, now));
    for child in canvas.node(id).children().to_vec() {
        tick_node(canvas, child, now);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::widget::EventOutcome;

    struct Blank;
    impl Widget for Blank {}

    /// Records structural hook invocations.
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Widget for Recorder {
        fn child_added(&mut self, _ctx: &mut Context<'_>, _child: NodeId) {
            self.log.lock().unwrap().push("child_added".into());
        }

        fn child_removed(&mut self, _ctx: &mut Context<'_>, _child: NodeId) {
            self.log.lock().unwrap().push("child_removed".into());
        }

        fn child_bounds_changed(&mut self, _ctx: &mut Context<'_>, old: Rect, _child: NodeId) {
            self.log
                .lock()
                .unwrap()
                .push(format!("bounds_changed from {},{}", old.w, old.h));
        }
    }

    /// Removes its own node when clicked.
    struct SelfRemover;

    impl Widget for SelfRemover {
        fn on_mouse_button(
            &mut self,
            ctx: &mut Context<'_>,
            _button: MouseButton,
            _pos: Point,
            _pressed: bool,
        ) -> crate::error::Result<EventOutcome> {
            let id = ctx.node_id();
            ctx.remove(id)?;
            Ok(EventOutcome::Handle)
        }
    }

    #[test]
    fn insert_fires_parent_hooks_and_invalidates() -> Result<()> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let holder = canvas.insert(root, Recorder { log: Arc::clone(&log) })?;
        canvas.node_mut(holder).needs_layout = false;

        let child = canvas.insert(holder, Blank)?;
        assert_eq!(log.lock().unwrap().as_slice(), ["child_added"]);
        assert!(canvas.node(holder).needs_layout());

        canvas.remove(child)?;
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["child_added", "child_removed"]
        );
        Ok(())
    }

    #[test]
    fn set_bounds_clamps_and_notifies() -> Result<()> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let holder = canvas.insert(root, Recorder { log: Arc::clone(&log) })?;
        let child = canvas.insert(holder, Blank)?;
        log.lock().unwrap().clear();

        canvas.set_min_size(child, Point::new(20, 20));
        canvas.set_max_size(child, Point::new(50, 50));

        assert!(canvas.set_bounds(child, Rect::new(0, 0, 5, 100)));
        assert_eq!(canvas.node(child).bounds(), Rect::new(0, 0, 20, 50));
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["bounds_changed from 10,10"]
        );

        // Clamped to the same rect: no-op, no notification.
        assert!(!canvas.set_bounds(child, Rect::new(0, 0, 10, 60)));
        assert_eq!(log.lock().unwrap().len(), 1);
        Ok(())
    }

    #[test]
    fn remove_clears_interaction_state() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let a = canvas.insert(root, Blank)?;
        let b = canvas.insert(a, Blank)?;

        canvas.set_focus(b);
        canvas.capture_mouse(b);
        assert_eq!(canvas.focused(), Some(b));

        canvas.remove(a)?;
        assert!(!canvas.contains(a));
        assert!(!canvas.contains(b));
        assert_eq!(canvas.focused(), None);
        assert_eq!(canvas.mouse_capture(), None);
        Ok(())
    }

    #[test]
    fn removal_during_dispatch_is_deferred() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 100, 100));
        let victim = canvas.insert(root, SelfRemover)?;
        canvas.set_bounds(victim, Rect::new(0, 0, 100, 100));

        canvas.mouse_move(Point::new(50, 50))?;
        assert!(canvas.mouse_button(MouseButton::Left, true)?);
        // Still alive: the removal was queued while the event dispatched.
        assert!(canvas.contains(victim));

        canvas.flush_deferred();
        assert!(!canvas.contains(victim));
        Ok(())
    }

    #[test]
    fn set_parent_routes_through_inner_panel() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let frame = canvas.insert(root, Blank)?;
        let panel = canvas.insert(frame, Blank)?;
        canvas.set_inner_panel(frame, Some(panel))?;

        let item = canvas.insert(root, Blank)?;
        canvas.set_parent(item, frame)?;

        assert_eq!(canvas.node(item).structural_parent(), Some(panel));
        assert_eq!(canvas.node(item).parent(), Some(frame));
        Ok(())
    }

    #[test]
    fn set_parent_rejects_cycles_without_detaching() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let a = canvas.insert(root, Blank)?;
        let b = canvas.insert(a, Blank)?;

        assert_eq!(
            canvas.set_parent(a, b),
            Err(Error::WouldCreateCycle { parent: b, child: a })
        );
        // The failed move left the node attached where it was.
        assert_eq!(canvas.node(a).structural_parent(), Some(root));
        Ok(())
    }

    #[test]
    fn inner_panel_designation_requires_direct_child() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let frame = canvas.insert(root, Blank)?;
        let deep = canvas.insert(frame, Blank)?;
        let deeper = canvas.insert(deep, Blank)?;

        assert_eq!(
            canvas.set_inner_panel(frame, Some(deeper)),
            Err(Error::NotAChild {
                parent: frame,
                node: deeper
            })
        );
        Ok(())
    }

    #[test]
    fn find_child_by_name() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let a = canvas.insert(root, Blank)?;
        let b = canvas.insert(a, Blank)?;
        canvas.set_name(b, "Target");

        assert_eq!(canvas.find_child(root, "target", false), None);
        assert_eq!(canvas.find_child(root, "target", true), Some(b));
        assert_eq!(canvas.find_child(a, "target", false), Some(b));
        Ok(())
    }

    #[test]
    fn children_size_and_fit() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 300, 300));
        let holder = canvas.insert(root, Blank)?;
        canvas.set_bounds(holder, Rect::new(0, 0, 300, 300));

        let a = canvas.insert(holder, Blank)?;
        canvas.set_bounds(a, Rect::new(10, 10, 40, 20));
        canvas.set_margin(a, Margin::new(0, 0, 5, 5));
        let b = canvas.insert(holder, Blank)?;
        canvas.set_bounds(b, Rect::new(0, 60, 20, 20));
        let hidden = canvas.insert(holder, Blank)?;
        canvas.set_bounds(hidden, Rect::new(200, 200, 50, 50));
        canvas.hide(hidden);

        assert_eq!(canvas.children_size(holder), Point::new(55, 80));
        assert!(canvas.size_to_children(holder, true, true));
        assert_eq!(canvas.node(holder).bounds(), Rect::new(0, 0, 55, 80));
        Ok(())
    }

    #[test]
    fn coordinate_transforms_roundtrip() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 200, 200));
        let outer = canvas.insert(root, Blank)?;
        canvas.set_bounds(outer, Rect::new(20, 30, 100, 100));
        let inner = canvas.insert(outer, Blank)?;
        canvas.set_bounds(inner, Rect::new(5, 5, 50, 50));

        let local = Point::new(3, 4);
        let abs = canvas.to_canvas(inner, local);
        assert_eq!(abs, Point::new(28, 39));
        assert_eq!(canvas.to_local(inner, abs), local);
        Ok(())
    }

    #[test]
    fn widget_downcasting() -> Result<()> {
        struct Counter {
            clicks: u32,
        }
        impl Widget for Counter {}

        let mut canvas = Canvas::default();
        let root = canvas.root();
        let id = canvas.insert(root, Counter { clicks: 3 })?;

        assert!(canvas.widget_ref::<Blank>(id).is_none());
        assert_eq!(canvas.widget_ref::<Counter>(id).map(|c| c.clicks), Some(3));
        canvas.widget_mut::<Counter>(id).unwrap().clicks += 1;
        assert_eq!(canvas.widget_ref::<Counter>(id).map(|c| c.clicks), Some(4));
        Ok(())
    }

    #[test]
    fn bring_to_front_and_back() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let a = canvas.insert(root, Blank)?;
        let b = canvas.insert(root, Blank)?;
        let c = canvas.insert(root, Blank)?;

        canvas.bring_to_front(a)?;
        assert_eq!(canvas.node(root).children(), &[b, c, a]);
        canvas.send_to_back(c)?;
        assert_eq!(canvas.node(root).children(), &[c, b, a]);
        assert_eq!(canvas.bring_to_front(root), Err(Error::RootNode));
        Ok(())
    }

    #[test]
    fn redraw_marks_ancestor_caches() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        let outer = canvas.insert(root, Blank)?;
        let inner = canvas.insert(outer, Blank)?;
        canvas.set_cached(outer, true);

        canvas.node_mut(outer).cache_dirty = false;
        canvas.node_mut(inner).cache_dirty = false;
        canvas.clear_needs_redraw();

        canvas.redraw(inner);
        assert!(canvas.node(inner).is_cache_dirty());
        assert!(canvas.node(outer).is_cache_dirty());
        assert!(canvas.needs_redraw());
        Ok(())
    }
}
