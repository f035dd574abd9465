/*! A standard tree of instrumented widgets for tests. */
use std::any::Any;
use std::cell::RefCell;

use geom::{Point, Rect};

use crate::{
    Canvas, Color, Context, EventOutcome, Key, MouseButton, NodeId, NodeName, Render,
    RenderContext, Result, Widget,
};

/// Thread-local state tracked by instrumented widgets.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct State {
    /// Recorded event path entries.
    pub path: Vec<String>,
}

impl State {
    /// Clear recorded events.
    pub fn reset(&mut self) {
        self.path = vec![];
    }

    /// Record a handler invocation and its outcome.
    pub fn add_event(&mut self, n: &NodeName, evt: &str, result: &EventOutcome) {
        let outcome = match result {
            EventOutcome::Handle => "handle",
            EventOutcome::Consume => "consume",
            EventOutcome::Ignore => "ignore",
        };
        self.path.push(format!("{n}@{evt}->{outcome}"))
    }

    /// Record a hook invocation with no outcome.
    pub fn add_hook(&mut self, n: &NodeName, evt: &str) {
        self.path.push(format!("{n}@{evt}"))
    }
}

thread_local! {
    /// Event log shared by every instrumented widget on this thread.
    static TSTATE: RefCell<State> = RefCell::new(State::default());
}

/// Clear the recorded event log.
pub fn reset_state() {
    TSTATE.with(|s| {
        s.borrow_mut().reset();
    });
}

/// A snapshot of the recorded event log.
pub fn get_state() -> State {
    TSTATE.with(|s| s.borrow().clone())
}

/// A widget that records every handler and hook it sees in the thread
/// event log.
pub struct Probe {
    /// The name reported to the canvas.
    name: NodeName,
    /// One-shot outcome override consumed by the next handler call.
    pub next_outcome: Option<EventOutcome>,
    /// Whether the widget takes dropped payloads.
    pub accept_drop: bool,
}

impl Probe {
    /// An instrumented widget named `name`.
    pub fn new(name: &str) -> Self {
        Probe {
            name: NodeName::convert(name),
            next_outcome: None,
            accept_drop: false,
        }
    }

    /// Record a handler event, consuming any outcome override.
    fn handle(&mut self, evt: &str) -> Result<EventOutcome> {
        let ret = self.next_outcome.take().unwrap_or(EventOutcome::Ignore);
        TSTATE.with(|s| s.borrow_mut().add_event(&self.name, evt, &ret));
        Ok(ret)
    }

    /// Record an outcome-less hook event.
    fn hook(&self, evt: &str) {
        TSTATE.with(|s| s.borrow_mut().add_hook(&self.name, evt));
    }
}

impl Widget for Probe {
    fn on_key(
        &mut self,
        _ctx: &mut Context<'_>,
        _key: Key,
        _pressed: bool,
    ) -> Result<EventOutcome> {
        self.handle("key")
    }

    fn on_mouse_button(
        &mut self,
        _ctx: &mut Context<'_>,
        _button: MouseButton,
        _pos: Point,
        _pressed: bool,
    ) -> Result<EventOutcome> {
        self.handle("mouse")
    }

    fn on_mouse_wheel(&mut self, _ctx: &mut Context<'_>, _delta: i32) -> Result<EventOutcome> {
        self.handle("wheel")
    }

    fn on_mouse_enter(&mut self, _ctx: &mut Context<'_>) {
        self.hook("enter");
    }

    fn on_mouse_leave(&mut self, _ctx: &mut Context<'_>) {
        self.hook("leave");
    }

    fn on_focus(&mut self, _ctx: &mut Context<'_>) {
        self.hook("focus");
    }

    fn on_blur(&mut self, _ctx: &mut Context<'_>) {
        self.hook("blur");
    }

    fn can_accept_drop(&self) -> bool {
        self.accept_drop
    }

    fn on_drop(&mut self, _ctx: &mut Context<'_>, _payload: &dyn Any, _pos: Point) -> Result<()> {
        self.hook("drop");
        Ok(())
    }

    fn name(&self) -> NodeName {
        self.name.clone()
    }
}

/// A widget that fills its bounds with a solid color.
pub struct Block {
    /// Fill color.
    pub color: Color,
}

impl Block {
    /// A block of the given color.
    pub fn new(color: Color) -> Self {
        Block { color }
    }
}

impl Widget for Block {
    fn render(&mut self, r: &mut Render<'_>, ctx: &RenderContext<'_>) -> Result<()> {
        r.fill(self.color, ctx.bounds());
        Ok(())
    }

    fn name(&self) -> NodeName {
        NodeName::convert("block")
    }
}

/// Node handles for the standard test tree: two branches under the root,
/// each with two leaves, every node a [`Probe`] named after its field.
pub struct TTree {
    /// Left branch, the left half of the canvas.
    pub ba: NodeId,
    /// Top leaf under `ba`.
    pub ba_la: NodeId,
    /// Bottom leaf under `ba`.
    pub ba_lb: NodeId,
    /// Right branch, the right half of the canvas.
    pub bb: NodeId,
    /// Top leaf under `bb`.
    pub bb_la: NodeId,
    /// Bottom leaf under `bb`.
    pub bb_lb: NodeId,
}

/// Build the standard tree on a fresh 100x100 canvas, lay it out, clear
/// the event log, and run `func` on it.
pub fn run_ttree(func: impl FnOnce(&mut Canvas, &TTree) -> Result<()>) -> Result<()> {
    let mut canvas = Canvas::default();
    let root = canvas.root();
    canvas.set_bounds(root, Rect::new(0, 0, 100, 100));

    let ba = canvas.insert(root, Probe::new("ba"))?;
    let bb = canvas.insert(root, Probe::new("bb"))?;
    let ba_la = canvas.insert(ba, Probe::new("ba_la"))?;
    let ba_lb = canvas.insert(ba, Probe::new("ba_lb"))?;
    let bb_la = canvas.insert(bb, Probe::new("bb_la"))?;
    let bb_lb = canvas.insert(bb, Probe::new("bb_lb"))?;

    canvas.set_bounds(ba, Rect::new(0, 0, 50, 100));
    canvas.set_bounds(bb, Rect::new(50, 0, 50, 100));
    for (leaf, r) in [
        (ba_la, Rect::new(0, 0, 50, 50)),
        (ba_lb, Rect::new(0, 50, 50, 50)),
        (bb_la, Rect::new(0, 0, 50, 50)),
        (bb_lb, Rect::new(0, 50, 50, 50)),
    ] {
        canvas.set_bounds(leaf, r);
    }
    for id in [ba, ba_la, ba_lb, bb, bb_la, bb_lb] {
        canvas.set_tabable(id, true);
        canvas.set_keyboard_input(id, true);
    }

    canvas.layout();
    reset_state();
    func(
        &mut canvas,
        &TTree {
            ba,
            ba_la,
            ba_lb,
            bb,
            bb_la,
            bb_lb,
        },
    )
}
