//! Hit testing and input routing.
//!
//! The canvas entry points resolve a target node, then dispatch the
//! matching widget hook with node-local coordinates. Hidden subtrees are
//! invisible to the hit test; disabled nodes are hit-testable but handled
//! per event class (buttons swallow, wheels skip, keys ignore the flag).

use std::any::Any;

use geom::Point;

use crate::{
    canvas::{self, Canvas},
    error::Result,
    event::{Key, MouseButton},
    focus,
    id::NodeId,
    widget::EventOutcome,
};

/// Resolve the topmost node under a canvas-space point.
pub fn node_at(canvas: &Canvas, p: Point) -> Option<NodeId> {
    let root = canvas.root();
    control_at(canvas, root, p - canvas.node(root).bounds().pos())
}

/// Recursive hit test. `p` is in `id`-local coordinates. Children are
/// visited in reverse list order so the frontmost sibling wins; a node
/// claims the point itself only when its mouse-input flag is set.
fn control_at(canvas: &Canvas, id: NodeId, p: Point) -> Option<NodeId> {
    let node = canvas.node(id);
    if node.is_hidden() {
        return None;
    }
    let b = node.bounds();
    if p.x < 0 || p.y < 0 || p.x >= b.w || p.y >= b.h {
        return None;
    }
    for &child in node.children().iter().rev() {
        let hit = control_at(canvas, child, p - canvas.node(child).bounds().pos());
        if hit.is_some() {
            return hit;
        }
    }
    node.mouse_input().then_some(id)
}

/// Route pointer motion: update the hover state from the hit test, then
/// dispatch to the capture node if one is set, else to the hit node.
pub fn mouse_move(canvas: &mut Canvas, p: Point) -> Result<bool> {
    let delta = p - canvas.mouse_pos;
    canvas.mouse_pos = p;

    let hit = node_at(canvas, p);
    update_hover(canvas, hit);

    let Some(id) = canvas.mouse_capture.or(hit) else {
        return Ok(false);
    };
    if canvas.node(id).is_disabled() {
        return Ok(false);
    }
    let local = canvas.to_local(id, p);
    let outcome = canvas::dispatch_value(canvas, id, |w, ctx| w.on_mouse_move(ctx, local, delta))
        .transpose()?
        .unwrap_or(EventOutcome::Ignore);
    Ok(outcome.is_handled())
}

/// Move the hovered-node reference, firing leave then enter observers and
/// hooks. Observers may mutate the canvas, so each side re-checks that its
/// node is still alive.
fn update_hover(canvas: &mut Canvas, hit: Option<NodeId>) {
    if canvas.hovered == hit {
        return;
    }
    let old = canvas.hovered;
    canvas.hovered = hit;

    if let Some(id) = old
        && canvas.tree.contains(id)
    {
        for h in canvas.node(id).hover_leave.snapshot() {
            h(canvas, id);
        }
        canvas::dispatch(canvas, id, |w, ctx| w.on_mouse_leave(ctx));
        canvas.redraw(id);
    }
    if let Some(id) = hit
        && canvas.tree.contains(id)
    {
        for h in canvas.node(id).hover_enter.snapshot() {
            h(canvas, id);
        }
        canvas::dispatch(canvas, id, |w, ctx| w.on_mouse_enter(ctx));
        canvas.redraw(id);
    }
}

/// Route a button event to the capture node or the hovered node. Disabled
/// targets swallow the event without dispatch. No bubbling.
pub fn mouse_button(canvas: &mut Canvas, button: MouseButton, pressed: bool) -> Result<bool> {
    let Some(id) = canvas.mouse_capture.or(canvas.hovered) else {
        return Ok(false);
    };
    if canvas.node(id).is_disabled() {
        return Ok(true);
    }
    let local = canvas.to_local(id, canvas.mouse_pos);
    let outcome =
        canvas::dispatch_value(canvas, id, |w, ctx| w.on_mouse_button(ctx, button, local, pressed))
            .transpose()?
            .unwrap_or(EventOutcome::Ignore);
    Ok(outcome.is_handled())
}

/// Route a wheel event to the hovered node, bubbling to logical parents
/// while handlers return [`EventOutcome::Ignore`]. Disabled nodes are
/// skipped but do not stop the bubble.
pub fn mouse_wheel(canvas: &mut Canvas, delta: i32) -> Result<bool> {
    let mut target = canvas.hovered;
    while let Some(id) = target {
        if !canvas.node(id).is_disabled() {
            let outcome = canvas::dispatch_value(canvas, id, |w, ctx| w.on_mouse_wheel(ctx, delta))
                .transpose()?
                .unwrap_or(EventOutcome::Ignore);
            if outcome.is_handled() {
                return Ok(true);
            }
        }
        target = canvas.node(id).parent();
    }
    Ok(false)
}

/// Offer a key event to the focused node, bubbling to logical parents
/// while handlers return [`EventOutcome::Ignore`]. An unhandled Tab press
/// advances focus along the tab chain.
pub fn key(canvas: &mut Canvas, key: Key, pressed: bool) -> Result<bool> {
    if let Some(start) = canvas.focused
        && canvas.node(start).keyboard_input()
    {
        let mut target = Some(start);
        while let Some(id) = target {
            let outcome = canvas::dispatch_value(canvas, id, |w, ctx| w.on_key(ctx, key, pressed))
                .transpose()?
                .unwrap_or(EventOutcome::Ignore);
            if outcome.is_handled() {
                return Ok(true);
            }
            target = canvas.node(id).parent();
        }
    }
    if key == Key::Tab && pressed {
        return Ok(focus::tab_advance(canvas));
    }
    Ok(false)
}

/// Hit-test a drop point and walk logical parents until a widget accepts
/// the payload, then dispatch its drop hook with node-local coordinates.
pub fn drop_at(canvas: &mut Canvas, p: Point, payload: &dyn Any) -> Result<bool> {
    let mut target = node_at(canvas, p);
    while let Some(id) = target {
        let accepts = canvas
            .node(id)
            .widget
            .as_ref()
            .is_some_and(|w| w.can_accept_drop());
        if accepts {
            let local = canvas.to_local(id, p);
            return match canvas::dispatch_value(canvas, id, |w, ctx| w.on_drop(ctx, payload, local))
            {
                Some(res) => res.map(|()| true),
                None => Ok(false),
            };
        }
        target = canvas.node(id).parent();
    }
    Ok(false)
}
