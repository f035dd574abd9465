//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use geom::{Point, Rect};

use crate::{
    context::{Context, RenderContext},
    error::Result,
    event::{Key, MouseButton},
    id::NodeId,
    node::NodeName,
    render::Render,
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was processed without a state change and propagation stops.
    Consume,
    /// The event was not handled and will bubble up the tree.
    Ignore,
}

impl EventOutcome {
    /// Did the handler claim the event?
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventOutcome::Ignore)
    }
}

/// Widgets are the behavior attached to nodes in the canvas arena.
///
/// Every method has a default, so a widget implements only the hooks it
/// cares about. Mouse positions are local to the receiving node; use
/// [`Context::to_canvas`] when an absolute position is needed.
pub trait Widget: Any + Send {
    /// Sizing and child-arrangement hook, run by the layout pass when the
    /// node is marked for layout, before its children are docked.
    fn layout(&mut self, _ctx: &mut Context<'_>) {}

    /// Run after this node's children have been laid out.
    fn post_layout(&mut self, _ctx: &mut Context<'_>) {}

    /// Render this widget's own content. Does not render children.
    fn render(&mut self, _r: &mut Render<'_>, _ctx: &RenderContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Render behind this widget's content, unclipped by its bounds.
    fn render_under(&mut self, _r: &mut Render<'_>, _ctx: &RenderContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Render on top of this widget's children.
    fn render_over(&mut self, _r: &mut Render<'_>, _ctx: &RenderContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Periodic animation hook. `now` is the canvas clock in seconds.
    fn tick(&mut self, _ctx: &mut Context<'_>, _now: f64) {}

    /// Handle a key event. Unhandled keys bubble to the parent.
    fn on_key(&mut self, _ctx: &mut Context<'_>, _key: Key, _pressed: bool) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Handle a mouse button event at `pos`.
    fn on_mouse_button(
        &mut self,
        _ctx: &mut Context<'_>,
        _button: MouseButton,
        _pos: Point,
        _pressed: bool,
    ) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Handle pointer motion. `delta` is the movement since the last event.
    fn on_mouse_move(
        &mut self,
        _ctx: &mut Context<'_>,
        _pos: Point,
        _delta: Point,
    ) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Handle a scroll wheel event. Unhandled wheels bubble to the parent.
    fn on_mouse_wheel(&mut self, _ctx: &mut Context<'_>, _delta: i32) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// The pointer entered this node.
    fn on_mouse_enter(&mut self, _ctx: &mut Context<'_>) {}

    /// The pointer left this node.
    fn on_mouse_leave(&mut self, _ctx: &mut Context<'_>) {}

    /// This node gained keyboard focus.
    fn on_focus(&mut self, _ctx: &mut Context<'_>) {}

    /// This node lost keyboard focus.
    fn on_blur(&mut self, _ctx: &mut Context<'_>) {}

    /// A child was attached to this node.
    fn child_added(&mut self, _ctx: &mut Context<'_>, _child: NodeId) {}

    /// A child was detached from this node.
    fn child_removed(&mut self, _ctx: &mut Context<'_>, _child: NodeId) {}

    /// A child's bounds changed. `old` is the child's previous rectangle.
    fn child_bounds_changed(&mut self, _ctx: &mut Context<'_>, _old: Rect, _child: NodeId) {}

    /// Will this widget take a dropped payload?
    fn can_accept_drop(&self) -> bool {
        false
    }

    /// Receive a dropped payload at `pos`. Only called when
    /// [`can_accept_drop`](Widget::can_accept_drop) returned true.
    fn on_drop(&mut self, _ctx: &mut Context<'_>, _payload: &dyn Any, _pos: Point) -> Result<()> {
        Ok(())
    }

    /// Name used for dumps and lookups.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        NodeName::convert(short)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
