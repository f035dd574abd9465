//! The dock layout pass.
//!
//! A single top-down walk. Per node: run the layout hook if the node is
//! marked, dock non-fill children by consuming interior edges in a fixed
//! TOP, LEFT, RIGHT, BOTTOM order, publish what remains as `inner_bounds`,
//! then hand that remainder to every fill child. Edge flags are checked
//! independently; combining LEFT and RIGHT consumes from both edges in the
//! same pass.
//!
//! The tab chain is rebuilt as a side effect: the walk notes the first
//! tabable node and the first tabable node after the focused one.

use geom::Rect;

use crate::{
    canvas::{self, Canvas},
    dock::Dock,
    focus,
    id::NodeId,
};

/// Run the layout pass from the root, resetting the tab chain first.
pub fn layout_canvas(canvas: &mut Canvas) {
    canvas.first_tab = None;
    canvas.next_tab = None;
    let root = canvas.root();
    canvas::with_traversal_guard(canvas, |c| layout_node(c, root));
}

/// Lay out one node and its subtree.
pub fn layout_node(canvas: &mut Canvas, id: NodeId) {
    if canvas.node(id).is_hidden() {
        return;
    }

    if canvas.node(id).needs_layout() {
        canvas.node_mut(id).needs_layout = false;
        canvas::dispatch(canvas, id, |w, ctx| w.layout(ctx));
    }

    let padding = canvas.node(id).padding();
    let mut area = canvas.node(id).render_bounds().inner(&padding);

    for child in canvas.node(id).children().to_vec() {
        let (hidden, dock, m) = {
            let n = canvas.node(child);
            (n.is_hidden(), n.dock(), n.margin())
        };
        if hidden || dock.contains(Dock::FILL) {
            continue;
        }

        // Placement uses the child's current size; consumption re-reads it
        // after set_bounds, which may have clamped to min/max.
        if dock.contains(Dock::TOP) {
            let h = canvas.node(child).bounds().h;
            canvas.set_bounds(
                child,
                Rect::new(area.x + m.left, area.y + m.top, area.w - m.horizontal(), h),
            );
            area = area.consume_top(m.vertical() + canvas.node(child).bounds().h);
        }
        if dock.contains(Dock::LEFT) {
            let w = canvas.node(child).bounds().w;
            canvas.set_bounds(
                child,
                Rect::new(area.x + m.left, area.y + m.top, w, area.h - m.vertical()),
            );
            area = area.consume_left(m.horizontal() + canvas.node(child).bounds().w);
        }
        if dock.contains(Dock::RIGHT) {
            let w = canvas.node(child).bounds().w;
            canvas.set_bounds(
                child,
                Rect::new(
                    area.right() - w - m.right,
                    area.y + m.top,
                    w,
                    area.h - m.vertical(),
                ),
            );
            area = area.consume_right(m.horizontal() + canvas.node(child).bounds().w);
        }
        if dock.contains(Dock::BOTTOM) {
            let h = canvas.node(child).bounds().h;
            canvas.set_bounds(
                child,
                Rect::new(
                    area.x + m.left,
                    area.bottom() - h - m.bottom,
                    area.w - m.horizontal(),
                    h,
                ),
            );
            area = area.consume_bottom(canvas.node(child).bounds().h + m.vertical());
        }

        layout_node(canvas, child);
    }

    canvas.node_mut(id).inner_bounds = area;

    // Fill children share the leftover interior; they do not subdivide it.
    for child in canvas.node(id).children().to_vec() {
        let (hidden, dock, m) = {
            let n = canvas.node(child);
            (n.is_hidden(), n.dock(), n.margin())
        };
        if hidden || !dock.contains(Dock::FILL) {
            continue;
        }
        canvas.set_bounds(child, area.shrink(&m));
        layout_node(canvas, child);
    }

    canvas::dispatch(canvas, id, |w, ctx| w.post_layout(ctx));
    focus::register_tab(canvas, id);
}
