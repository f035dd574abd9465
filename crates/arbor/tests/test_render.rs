//! Integration tests for the paint traversal and the texture cache.

#[cfg(test)]
mod tests {
    use arbor::{
        Canvas, Color, Error, NodeId, Rect, Render, RenderContext, Result, Widget,
        tutils::render::TestRender, tutils::ttree::Block,
    };

    const GREEN: Color = Color::rgb(0, 200, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);
    const RED: Color = Color::rgb(255, 0, 0);
    const YELLOW: Color = Color::rgb(255, 255, 0);
    const HALO: Color = Color::rgb(10, 10, 10);
    const BODY: Color = Color::rgb(20, 20, 20);
    const TAG: Color = Color::rgb(30, 30, 30);
    const PLACEHOLDER: Color = Color::rgb(255, 0, 255);

    /// Fails its content hook with a resource error until told otherwise.
    struct Flaky {
        ok: bool,
        calls: usize,
    }

    impl Widget for Flaky {
        fn render(&mut self, r: &mut Render<'_>, ctx: &RenderContext<'_>) -> Result<()> {
            self.calls += 1;
            if !self.ok {
                return Err(Error::Resource("image missing".into()));
            }
            r.fill(BLUE, ctx.bounds());
            Ok(())
        }
    }

    /// Paints a halo under itself, a body as content, and a tag over its
    /// children.
    struct Layered;

    impl Widget for Layered {
        fn render_under(&mut self, r: &mut Render<'_>, ctx: &RenderContext<'_>) -> Result<()> {
            let b = ctx.bounds();
            r.fill(HALO, Rect::new(-2, -2, b.w + 4, b.h + 4));
            Ok(())
        }

        fn render(&mut self, r: &mut Render<'_>, ctx: &RenderContext<'_>) -> Result<()> {
            r.fill(BODY, ctx.bounds());
            Ok(())
        }

        fn render_over(&mut self, r: &mut Render<'_>, _ctx: &RenderContext<'_>) -> Result<()> {
            r.fill(TAG, Rect::new(0, 0, 2, 2));
            Ok(())
        }
    }

    /// A canvas with a panel and two children, one clipped by the panel
    /// edge, plus a sibling outside the panel.
    fn panel_scene() -> Result<(Canvas, NodeId)> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 60, 40));

        let panel = canvas.insert(root, Block::new(GREEN))?;
        canvas.set_bounds(panel, Rect::new(5, 5, 30, 20));
        let inner = canvas.insert(panel, Block::new(BLUE))?;
        canvas.set_bounds(inner, Rect::new(2, 2, 10, 8));
        let edge = canvas.insert(panel, Block::new(RED))?;
        canvas.set_bounds(edge, Rect::new(25, 15, 10, 8));
        let outside = canvas.insert(root, Block::new(YELLOW))?;
        canvas.set_bounds(outside, Rect::new(40, 5, 10, 10));

        Ok((canvas, panel))
    }

    #[test]
    fn cached_and_direct_paths_are_pixel_identical() -> Result<()> {
        let (mut canvas, panel) = panel_scene()?;

        let mut direct = TestRender::without_cache(60, 40);
        canvas.render(&mut direct)?;

        canvas.set_cached(panel, true);
        let mut cached = TestRender::new(60, 40);
        canvas.render(&mut cached)?;

        assert!(cached.has_texture(panel));
        assert_eq!(direct.surface, cached.surface);

        assert_eq!(direct.pixel(7, 7), BLUE);
        assert_eq!(direct.pixel(6, 6), GREEN);
        assert_eq!(direct.pixel(34, 24), RED);
        // The panel edge clips the overhanging child.
        assert_eq!(direct.pixel(35, 20), Color::TRANSPARENT);
        assert_eq!(direct.pixel(44, 9), YELLOW);
        Ok(())
    }

    #[test]
    fn fresh_caches_composite_without_repainting() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 60, 40));
        let panel = canvas.insert(root, Block::new(GREEN))?;
        canvas.set_bounds(panel, Rect::new(5, 5, 30, 20));
        let inner = canvas.insert(panel, Block::new(BLUE))?;
        canvas.set_bounds(inner, Rect::new(2, 2, 10, 8));
        canvas.set_cached(panel, true);

        let mut tr = TestRender::new(60, 40);
        canvas.render(&mut tr)?;
        let first = tr.surface.clone();
        assert_eq!(tr.pixel(7, 7), BLUE);

        // Nothing changed, so the second frame is pure composition.
        tr.clear();
        canvas.render(&mut tr)?;
        assert_eq!(tr.ops, 0);
        assert_eq!(tr.surface, first);

        // A redraw regenerates the texture and repaints both blocks.
        canvas.redraw(panel);
        tr.clear();
        canvas.render(&mut tr)?;
        assert_eq!(tr.ops, 2);
        assert_eq!(tr.surface, first);

        // Widget changes show up once the node is invalidated.
        canvas.widget_mut::<Block>(panel).unwrap().color = RED;
        canvas.redraw(panel);
        tr.clear();
        canvas.render(&mut tr)?;
        assert_eq!(tr.pixel(6, 6), RED);
        assert_eq!(tr.pixel(7, 7), BLUE);
        Ok(())
    }

    #[test]
    fn dead_textures_are_released() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 40, 20));
        let panel = canvas.insert(root, Block::new(GREEN))?;
        canvas.set_bounds(panel, Rect::new(5, 5, 20, 10));
        canvas.set_cached(panel, true);

        let mut tr = TestRender::new(40, 20);
        canvas.render(&mut tr)?;
        assert!(tr.has_texture(panel));

        canvas.set_cached(panel, false);
        canvas.render(&mut tr)?;
        assert!(!tr.has_texture(panel));
        assert_eq!(tr.pixel(6, 6), GREEN);

        canvas.set_cached(panel, true);
        canvas.render(&mut tr)?;
        assert!(tr.has_texture(panel));

        canvas.remove(panel)?;
        tr.clear();
        canvas.render(&mut tr)?;
        assert!(!tr.has_texture(panel));
        assert_eq!(tr.surface.count(GREEN), 0);
        Ok(())
    }

    #[test]
    fn resource_failures_substitute_the_placeholder() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 40, 20));
        let flaky = canvas.insert(root, Flaky { ok: false, calls: 0 })?;
        canvas.set_bounds(flaky, Rect::new(5, 5, 20, 10));

        // The failure is converted, not propagated.
        let mut tr = TestRender::new(40, 20);
        canvas.render(&mut tr)?;
        assert_eq!(canvas.widget_ref::<Flaky>(flaky).unwrap().calls, 1);
        assert_eq!(tr.pixel(6, 6), PLACEHOLDER);
        assert_eq!(tr.pixel(5, 5), Color::rgb(80, 80, 80));

        // Failed nodes skip their content hook on later frames.
        tr.clear();
        canvas.render(&mut tr)?;
        assert_eq!(canvas.widget_ref::<Flaky>(flaky).unwrap().calls, 1);
        assert_eq!(tr.pixel(6, 6), PLACEHOLDER);

        canvas.widget_mut::<Flaky>(flaky).unwrap().ok = true;
        canvas.clear_resource_failed(flaky);
        tr.clear();
        canvas.render(&mut tr)?;
        assert_eq!(canvas.widget_ref::<Flaky>(flaky).unwrap().calls, 2);
        assert_eq!(tr.pixel(6, 6), BLUE);
        Ok(())
    }

    #[test]
    fn under_content_children_over_paint_in_order() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 40, 30));
        let layered = canvas.insert(root, Layered)?;
        canvas.set_bounds(layered, Rect::new(10, 10, 12, 8));
        let child = canvas.insert(layered, Block::new(RED))?;
        canvas.set_bounds(child, Rect::new(0, 0, 8, 8));

        let mut tr = TestRender::new(40, 30);
        canvas.render(&mut tr)?;

        // The under hook escapes the node's own clip.
        assert_eq!(tr.pixel(8, 8), HALO);
        assert_eq!(tr.pixel(19, 11), BODY);
        assert_eq!(tr.pixel(15, 11), RED);
        // The over hook lands on top of children.
        assert_eq!(tr.pixel(10, 10), TAG);
        Ok(())
    }

    #[test]
    fn empty_clips_suppress_entire_subtrees() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 60, 40));
        let panel = canvas.insert(root, Block::new(GREEN))?;
        canvas.set_bounds(panel, Rect::new(5, 5, 20, 10));
        let inside = canvas.insert(panel, Block::new(BLUE))?;
        canvas.set_bounds(inside, Rect::new(15, 5, 20, 10));
        let outsider = canvas.insert(panel, Block::new(Color::WHITE))?;
        canvas.set_bounds(outsider, Rect::new(30, 0, 5, 5));

        let mut tr = TestRender::new(60, 40);
        canvas.render(&mut tr)?;

        assert_eq!(tr.surface.count(BLUE), 25);
        assert_eq!(tr.surface.count(Color::WHITE), 0);
        // Only the panel and the partly visible child reached the backend.
        assert_eq!(tr.ops, 2);
        Ok(())
    }

    #[test]
    fn hidden_nodes_do_not_paint() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 40, 20));
        let block = canvas.insert(root, Block::new(BLUE))?;
        canvas.set_bounds(block, Rect::new(5, 5, 10, 5));

        canvas.hide(block);
        let mut tr = TestRender::new(40, 20);
        canvas.render(&mut tr)?;
        assert_eq!(tr.surface.count(BLUE), 0);

        canvas.show(block);
        canvas.render(&mut tr)?;
        assert_eq!(tr.surface.count(BLUE), 50);
        Ok(())
    }

    #[test]
    fn focus_ring_marks_focused_tabable_nodes() -> Result<()> {
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 40, 20));
        let block = canvas.insert(root, Block::new(BLUE))?;
        canvas.set_bounds(block, Rect::new(5, 5, 10, 6));
        canvas.set_tabable(block, true);
        canvas.set_focus(block);

        let mut tr = TestRender::new(40, 20);
        canvas.render(&mut tr)?;
        assert_eq!(tr.pixel(5, 5), Color::BLACK);
        assert_eq!(tr.pixel(14, 10), Color::BLACK);
        assert_eq!(tr.pixel(6, 6), BLUE);

        // Non-tabable nodes can hold focus but draw no ring.
        canvas.set_tabable(block, false);
        tr.clear();
        canvas.render(&mut tr)?;
        assert_eq!(tr.pixel(5, 5), BLUE);
        Ok(())
    }
}
