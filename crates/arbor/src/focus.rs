//! Keyboard focus and the forward-only tab chain.
//!
//! The chain is two references rebuilt by every layout pass: the first
//! tabable node in the walk, and the first tabable node visited after the
//! focused one. Tab advances to the latter. There is no reverse chain and
//! no wraparound; once the walk has passed the last tabable node without
//! finding another, Tab does nothing until focus moves.

use crate::{
    canvas::{self, Canvas},
    id::NodeId,
};

/// Move keyboard focus to `id`, firing the old node's blur hook and the
/// new node's focus hook and repainting both. Returns false when `id` is
/// already focused.
///
/// Hidden and disabled nodes may be focused programmatically; the tab
/// chain simply rebuilds around them on the next layout pass.
pub fn set_focus(canvas: &mut Canvas, id: NodeId) -> bool {
    assert!(canvas.tree.contains(id), "set_focus on a dead node: {id:?}");
    if canvas.focused == Some(id) {
        return false;
    }
    blur(canvas);
    canvas.focused = Some(id);
    canvas::dispatch(canvas, id, |w, ctx| w.on_focus(ctx));
    canvas.redraw(id);
    true
}

/// Clear keyboard focus, firing the blur hook. No-op when nothing is
/// focused.
pub fn blur(canvas: &mut Canvas) {
    if let Some(old) = canvas.focused.take()
        && canvas.tree.contains(old)
    {
        canvas::dispatch(canvas, old, |w, ctx| w.on_blur(ctx));
        canvas.redraw(old);
    }
}

/// Layout-pass side effect: note the first tabable node, and claim
/// next-tab if it is unclaimed. Visiting the focused node clears next-tab
/// so the first tabable node after it claims the slot.
pub fn register_tab(canvas: &mut Canvas, id: NodeId) {
    if canvas.node(id).is_tabable() {
        if canvas.first_tab.is_none() {
            canvas.first_tab = Some(id);
        }
        if canvas.next_tab.is_none() {
            canvas.next_tab = Some(id);
        }
    }
    if canvas.focused == Some(id) {
        canvas.next_tab = None;
    }
}

/// Advance focus on an unhandled Tab press. When nothing is focused this
/// lands on the first tabable node, because no layout visit cleared
/// next-tab.
pub fn tab_advance(canvas: &mut Canvas) -> bool {
    match canvas.next_tab {
        Some(id) if canvas.tree.contains(id) => set_focus(canvas, id),
        _ => false,
    }
}
