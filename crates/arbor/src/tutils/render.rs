/*! An in-memory pixel backend for verifying paint output in tests. */
use std::collections::HashMap;

use geom::{Point, Rect};

use crate::{
    id::NodeId,
    render::{Color, RenderBackend, TextureCache},
};

/// A fixed-size grid of pixels with equality, for comparing paint output.
///
/// Draws overwrite; there is no blending. A zero-alpha color draws
/// nothing, so compositing a texture and painting directly produce the
/// same pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
    /// Row-major pixels, `w * h` entries.
    pixels: Vec<Color>,
}

impl Pixmap {
    /// A transparent pixmap of the given size.
    pub fn new(w: i32, h: i32) -> Self {
        let (w, h) = (w.max(0), h.max(0));
        Pixmap {
            w,
            h,
            pixels: vec![Color::TRANSPARENT; (w * h) as usize],
        }
    }

    /// The pixel at a position, transparent when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x >= self.w || y >= self.h {
            return Color::TRANSPARENT;
        }
        self.pixels[(y * self.w + x) as usize]
    }

    /// Write a pixel, ignoring out-of-bounds positions and zero alpha.
    fn set(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.w || y >= self.h || color.a == 0 {
            return;
        }
        self.pixels[(y * self.w + x) as usize] = color;
    }

    /// How many pixels hold exactly `color`?
    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Is every pixel still transparent?
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p.a == 0)
    }
}

/// A render backend that paints into a [`Pixmap`].
///
/// The cache-to-texture capability is on by default and records textures
/// as further pixmaps, so tests can compare the cached and direct paint
/// paths pixel for pixel.
pub struct TestRender {
    /// The output surface.
    pub surface: Pixmap,
    /// Count of fill and outline calls that reached the backend.
    pub ops: usize,
    /// Current draw color.
    color: Color,
    /// Current scissor, in coordinates of the current target.
    clip: Option<Rect>,
    /// Completed textures by node.
    textures: HashMap<NodeId, Pixmap>,
    /// In-progress texture recordings, innermost last.
    recording: Vec<(NodeId, Pixmap)>,
    /// Whether the texture capability is exposed.
    caching: bool,
}

impl TestRender {
    /// A caching backend with a surface of the given size.
    pub fn new(w: i32, h: i32) -> Self {
        TestRender {
            surface: Pixmap::new(w, h),
            ops: 0,
            color: Color::TRANSPARENT,
            clip: None,
            textures: HashMap::new(),
            recording: Vec::new(),
            caching: true,
        }
    }

    /// A backend without the texture capability, which forces the direct
    /// paint path for every node.
    pub fn without_cache(w: i32, h: i32) -> Self {
        TestRender {
            caching: false,
            ..TestRender::new(w, h)
        }
    }

    /// The pixel at a surface position.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.surface.get(x, y)
    }

    /// Does the backend hold a texture for `id`?
    pub fn has_texture(&self, id: NodeId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Reset the surface to transparent and zero the op counter, keeping
    /// recorded textures, as a backend would between frames.
    pub fn clear(&mut self) {
        self.surface = Pixmap::new(self.surface.w, self.surface.h);
        self.ops = 0;
    }

    /// The pixmap currently receiving draws.
    fn target_mut(&mut self) -> &mut Pixmap {
        match self.recording.last_mut() {
            Some((_, pixmap)) => pixmap,
            None => &mut self.surface,
        }
    }

    /// Fill `r` on the current target under the current clip.
    fn fill_clipped(&mut self, r: Rect) {
        let r = match self.clip {
            Some(clip) => match r.intersect(&clip) {
                Some(within) => within,
                None => return,
            },
            None => r,
        };
        let color = self.color;
        let target = self.target_mut();
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                target.set(x, y, color);
            }
        }
    }
}

impl RenderBackend for TestRender {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill(&mut self, r: Rect) {
        self.ops += 1;
        self.fill_clipped(r);
    }

    fn outline(&mut self, r: Rect) {
        self.ops += 1;
        if r.w <= 0 || r.h <= 0 {
            return;
        }
        self.fill_clipped(Rect::new(r.x, r.y, r.w, 1));
        self.fill_clipped(Rect::new(r.x, r.bottom() - 1, r.w, 1));
        self.fill_clipped(Rect::new(r.x, r.y, 1, r.h));
        self.fill_clipped(Rect::new(r.right() - 1, r.y, 1, r.h));
    }

    fn set_clip(&mut self, r: Option<Rect>) {
        self.clip = r;
    }

    fn cache(&mut self) -> Option<&mut dyn TextureCache> {
        if self.caching { Some(self) } else { None }
    }
}

impl TextureCache for TestRender {
    fn begin(&mut self, id: NodeId, w: i32, h: i32) {
        self.recording.push((id, Pixmap::new(w, h)));
    }

    fn end(&mut self, id: NodeId) {
        if let Some((rec, pixmap)) = self.recording.pop() {
            debug_assert_eq!(rec, id);
            self.textures.insert(rec, pixmap);
        }
    }

    fn draw(&mut self, id: NodeId, pos: Point) {
        let Some(tex) = self.textures.get(&id).cloned() else {
            return;
        };
        let clip = self.clip;
        let target = self.target_mut();
        for y in 0..tex.h {
            for x in 0..tex.w {
                let at = Point::new(pos.x + x, pos.y + y);
                if clip.is_some_and(|c| !c.contains(at)) {
                    continue;
                }
                target.set(at.x, at.y, tex.get(x, y));
            }
        }
    }

    fn drop_texture(&mut self, id: NodeId) {
        self.textures.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use slotmap::KeyData;

    use super::*;

    /// A key for exercising the backend without a canvas.
    fn key(n: u64) -> NodeId {
        KeyData::from_ffi(n).into()
    }

    #[test]
    fn fill_respects_clip() {
        let red = Color::rgb(255, 0, 0);
        let mut tr = TestRender::new(10, 10);
        tr.set_clip(Some(Rect::new(2, 2, 3, 3)));
        tr.set_color(red);
        tr.fill(Rect::new(0, 0, 10, 10));

        assert_eq!(tr.surface.count(red), 9);
        assert_eq!(tr.pixel(2, 2), red);
        assert_eq!(tr.pixel(4, 4), red);
        assert_eq!(tr.pixel(5, 5), Color::TRANSPARENT);

        tr.set_clip(Some(Rect::new(2, 2, 0, 0)));
        tr.fill(Rect::new(0, 0, 10, 10));
        assert_eq!(tr.surface.count(red), 9);
    }

    #[test]
    fn outline_is_one_unit_thick() {
        let red = Color::rgb(255, 0, 0);
        let mut tr = TestRender::new(10, 10);
        tr.set_color(red);
        tr.outline(Rect::new(1, 1, 4, 3));

        assert_eq!(tr.pixel(1, 1), red);
        assert_eq!(tr.pixel(4, 3), red);
        assert_eq!(tr.pixel(2, 2), Color::TRANSPARENT);
        assert_eq!(tr.surface.count(red), 10);
    }

    #[test]
    fn textures_record_and_composite() {
        let red = Color::rgb(255, 0, 0);
        let green = Color::rgb(0, 255, 0);
        let mut tr = TestRender::new(10, 10);
        let id = key(1);

        tr.begin(id, 4, 4);
        tr.set_color(red);
        tr.fill(Rect::new(0, 0, 2, 2));
        tr.end(id);
        assert!(tr.has_texture(id));
        assert!(tr.surface.is_blank());

        tr.set_color(green);
        tr.fill(Rect::new(0, 0, 10, 10));
        tr.draw(id, Point::new(5, 5));
        assert_eq!(tr.pixel(5, 5), red);
        assert_eq!(tr.pixel(6, 6), red);
        // Transparent texture pixels leave the target alone.
        assert_eq!(tr.pixel(7, 7), green);
        assert_eq!(tr.surface.count(red), 4);

        tr.drop_texture(id);
        assert!(!tr.has_texture(id));
    }

    #[test]
    fn nested_recordings_target_the_innermost() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let mut tr = TestRender::new(10, 10);
        let (outer, inner) = (key(1), key(2));

        tr.begin(outer, 6, 6);
        tr.set_color(red);
        tr.fill(Rect::new(0, 0, 6, 6));
        tr.begin(inner, 2, 2);
        tr.set_color(blue);
        tr.fill(Rect::new(0, 0, 2, 2));
        tr.end(inner);
        tr.draw(inner, Point::new(1, 1));
        tr.end(outer);

        tr.draw(outer, Point::new(0, 0));
        assert_eq!(tr.pixel(0, 0), red);
        assert_eq!(tr.pixel(1, 1), blue);
        assert_eq!(tr.pixel(3, 3), red);
    }
}
