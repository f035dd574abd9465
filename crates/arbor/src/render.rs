//! Render backend traits, the `Render` wrapper, and the paint traversal.
//!
//! Nodes draw in local coordinates through [`Render`], which owns the
//! offset and clip stacks and hands the backend absolute rectangles plus a
//! scissor. Two paint paths exist per node: direct, and cache-to-texture
//! for nodes that opt in on a backend that exposes the capability. The two
//! must produce identical output whenever the cache is fresh.

use geom::{Point, Rect};
use tracing::warn;

use crate::{
    canvas::{self, Canvas},
    context::RenderContext,
    error::{Error, Result},
    id::NodeId,
};

/// Solid 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The trait implemented by renderers.
///
/// All rectangles arrive in absolute surface coordinates; the backend is
/// expected to scissor drawing against the most recent [`set_clip`]
/// rectangle.
///
/// [`set_clip`]: RenderBackend::set_clip
pub trait RenderBackend {
    /// Set the color applied to subsequent draw calls.
    fn set_color(&mut self, color: Color);

    /// Fill a rectangle.
    fn fill(&mut self, r: Rect);

    /// Outline a rectangle, one unit thick, inside its edges.
    fn outline(&mut self, r: Rect);

    /// Scissor subsequent draws to `r`. `None` disables clipping; a
    /// zero-size rect suppresses all drawing.
    fn set_clip(&mut self, r: Option<Rect>);

    /// The cache-to-texture capability, if this backend has one.
    fn cache(&mut self) -> Option<&mut dyn TextureCache> {
        None
    }
}

/// Offscreen per-node texture storage for the cached render path.
///
/// `begin` calls may nest: a texture being recorded can have further
/// textures recorded (and composited) inside it, so implementations keep a
/// stack of active targets.
pub trait TextureCache {
    /// Redirect subsequent draws into a texture for `id`, sized `w` by `h`.
    fn begin(&mut self, id: NodeId, w: i32, h: i32);

    /// Finish recording the texture for `id`, restoring the previous
    /// target.
    fn end(&mut self, id: NodeId);

    /// Composite the texture for `id` with its origin at `pos`, in absolute
    /// surface coordinates, under the current clip.
    fn draw(&mut self, id: NodeId, pos: Point);

    /// Release the texture for `id`.
    fn drop_texture(&mut self, id: NodeId);
}

/// Offset/clip state saved while drawing is redirected into a texture.
struct Frame {
    offset: Point,
    offsets: Vec<Point>,
    clips: Vec<Rect>,
}

/// The drawing capability handed to widgets and skins.
///
/// Locals rectangles are translated by the current offset before reaching
/// the backend; the clip stack keeps pre-intersected absolute rectangles,
/// so the top of the stack is always the effective scissor.
pub struct Render<'a> {
    /// The backend that receives absolute-coordinate draw calls.
    backend: &'a mut dyn RenderBackend,
    /// Sum of all pushed offsets: the local-to-absolute translation.
    offset: Point,
    /// Individual pushed offsets, for popping.
    offsets: Vec<Point>,
    /// Pre-intersected clip rectangles in absolute coordinates. An empty
    /// intersection is stored as a zero-size rect, never dropped.
    clips: Vec<Rect>,
    /// Saved state across nested cache redirections.
    frames: Vec<Frame>,
}

impl<'a> Render<'a> {
    /// Construct a renderer over a backend, unclipped, at offset zero.
    pub fn new(backend: &'a mut dyn RenderBackend) -> Self {
        Render {
            backend,
            offset: Point::zero(),
            offsets: Vec::new(),
            clips: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// The current local-to-absolute translation.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Translate subsequent local coordinates by `p`.
    pub fn push_offset(&mut self, p: Point) {
        self.offset = self.offset + p;
        self.offsets.push(p);
    }

    /// Undo the most recent offset.
    pub fn pop_offset(&mut self) {
        if let Some(p) = self.offsets.pop() {
            self.offset = self.offset - p;
        }
    }

    /// Intersect the clip region with a local-coordinate rectangle.
    pub fn push_clip(&mut self, local: Rect) {
        let abs = local.translate(self.offset);
        let clip = match self.clips.last() {
            Some(top) => top
                .intersect(&abs)
                .unwrap_or_else(|| Rect::new(abs.x, abs.y, 0, 0)),
            None => abs,
        };
        self.clips.push(clip);
        self.backend.set_clip(Some(clip));
    }

    /// Undo the most recent clip intersection.
    pub fn pop_clip(&mut self) {
        self.clips.pop();
        self.backend.set_clip(self.clips.last().copied());
    }

    /// Can anything be drawn under the current clip?
    pub fn clip_visible(&self) -> bool {
        self.clips.last().is_none_or(|c| !c.is_zero())
    }

    /// Would a local-coordinate rectangle be at least partly visible under
    /// the current clip?
    pub fn region_visible(&self, local: Rect) -> bool {
        let abs = local.translate(self.offset);
        match self.clips.last() {
            Some(top) => top.intersect(&abs).is_some(),
            None => !abs.is_zero(),
        }
    }

    /// Fill a local-coordinate rectangle.
    pub fn fill(&mut self, color: Color, local: Rect) {
        self.backend.set_color(color);
        self.backend.fill(local.translate(self.offset));
    }

    /// Outline a local-coordinate rectangle.
    pub fn outline(&mut self, color: Color, local: Rect) {
        self.backend.set_color(color);
        self.backend.outline(local.translate(self.offset));
    }

    /// Does the backend expose the cache-to-texture capability?
    pub fn has_cache(&mut self) -> bool {
        self.backend.cache().is_some()
    }

    /// Redirect drawing into a texture for `id`. Offset and clip state are
    /// saved and reset; texture-local coordinates start at the origin.
    fn begin_cache(&mut self, id: NodeId, w: i32, h: i32) {
        self.frames.push(Frame {
            offset: self.offset,
            offsets: std::mem::take(&mut self.offsets),
            clips: std::mem::take(&mut self.clips),
        });
        self.offset = Point::zero();
        self.backend.set_clip(None);
        if let Some(cache) = self.backend.cache() {
            cache.begin(id, w, h);
        }
    }

    /// Finish the texture for `id` and restore the saved drawing state.
    fn end_cache(&mut self, id: NodeId) {
        if let Some(cache) = self.backend.cache() {
            cache.end(id);
        }
        if let Some(frame) = self.frames.pop() {
            self.offset = frame.offset;
            self.offsets = frame.offsets;
            self.clips = frame.clips;
        }
        self.backend.set_clip(self.clips.last().copied());
    }

    /// Composite the texture for `id` with its origin at a local position.
    fn draw_cached(&mut self, id: NodeId, local: Point) {
        let abs = self.offset + local;
        if let Some(cache) = self.backend.cache() {
            cache.draw(id, abs);
        }
    }

    /// Release the texture for `id`, if the backend holds one.
    pub(crate) fn drop_texture(&mut self, id: NodeId) {
        if let Some(cache) = self.backend.cache() {
            cache.drop_texture(id);
        }
    }
}

/// Which of a widget's paint hooks to run.
enum Hook {
    Under,
    Content,
    Over,
}

/// Run one of a widget's paint hooks with the widget boxed out of its slot.
///
/// A `Resource` error does not abort the frame: it marks the node failed,
/// logs, and substitutes the skin placeholder. Everything else propagates.
fn run_paint_hook(canvas: &mut Canvas, r: &mut Render<'_>, id: NodeId, hook: Hook) -> Result<()> {
    let Some(mut widget) = canvas.take_widget(id) else {
        return Ok(());
    };
    let skin = canvas.resolve_skin(id);
    let result = {
        let ctx = RenderContext::new(canvas, id, &*skin);
        match hook {
            Hook::Under => widget.render_under(r, &ctx),
            Hook::Content => widget.render(r, &ctx),
            Hook::Over => widget.render_over(r, &ctx),
        }
    };
    canvas.put_widget(id, widget);
    match result {
        Err(Error::Resource(msg)) => {
            warn!(node = ?id, "resource failure, substituting placeholder: {msg}");
            canvas.mark_resource_failed(id);
            skin.draw_placeholder(r, canvas.node(id).render_bounds());
            Ok(())
        }
        other => other,
    }
}

/// Paint a node and its subtree, picking the direct or cached path.
pub(crate) fn render_node(canvas: &mut Canvas, r: &mut Render<'_>, id: NodeId) -> Result<()> {
    if canvas.node(id).is_hidden() {
        return Ok(());
    }
    if canvas.node(id).is_cached() && r.has_cache() {
        render_cached(canvas, r, id)
    } else {
        render_direct(canvas, r, id)
    }
}

/// The direct paint path.
///
/// Order: offset, under-hook, clip, content, children back to front,
/// unclip, over-hook, focus ring. An empty clip skips everything from the
/// content onward, over-hook and focus ring included.
fn render_direct(canvas: &mut Canvas, r: &mut Render<'_>, id: NodeId) -> Result<()> {
    let bounds = canvas.node(id).bounds();
    r.push_offset(bounds.pos());

    run_paint_hook(canvas, r, id, Hook::Under)?;

    r.push_clip(bounds.at_origin());
    if !r.clip_visible() {
        r.pop_clip();
        r.pop_offset();
        return Ok(());
    }

    if canvas.node(id).resource_failed() {
        let skin = canvas.resolve_skin(id);
        skin.draw_placeholder(r, bounds.at_origin());
    } else {
        run_paint_hook(canvas, r, id, Hook::Content)?;
    }

    for child in canvas.node(id).children().to_vec() {
        render_node(canvas, r, child)?;
    }

    r.pop_clip();
    run_paint_hook(canvas, r, id, Hook::Over)?;

    if canvas.focused() == Some(id) && canvas.node(id).is_tabable() {
        let skin = canvas.resolve_skin(id);
        skin.draw_focus_ring(r, bounds.at_origin());
    }

    r.pop_offset();
    Ok(())
}

/// The cache-to-texture paint path.
///
/// Regenerates the node's texture through the direct path when it is dirty
/// and visible, then composites it at the node's position. Nested cached
/// children composite their own textures into the one being recorded.
fn render_cached(canvas: &mut Canvas, r: &mut Render<'_>, id: NodeId) -> Result<()> {
    let bounds = canvas.node(id).bounds();

    if canvas.node(id).is_cache_dirty() && r.region_visible(bounds) {
        r.begin_cache(id, bounds.w, bounds.h);
        // Cancel the node's own position so it records at the texture
        // origin.
        r.push_offset(Point::new(-bounds.x, -bounds.y));
        let result = render_direct(canvas, r, id);
        r.pop_offset();
        r.end_cache(id);
        result?;
        canvas.clear_cache_dirty(id);
    }

    r.draw_cached(id, bounds.pos());
    Ok(())
}

/// Paint the whole tree onto a backend: flush deferred deletes, run
/// layout, release dead textures, walk from the root, clear the redraw
/// flag.
pub(crate) fn render_canvas(canvas: &mut Canvas, backend: &mut dyn RenderBackend) -> Result<()> {
    canvas.flush_deferred();
    crate::layout::layout_canvas(canvas);

    let mut r = Render::new(backend);
    for id in canvas.take_dead_textures() {
        r.drop_texture(id);
    }

    let root = canvas.root();
    canvas::with_traversal_guard(canvas, |c| render_node(c, &mut r, root))?;
    canvas.clear_needs_redraw();
    Ok(())
}
