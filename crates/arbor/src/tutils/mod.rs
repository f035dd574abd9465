//! Utilities for writing tests against the canvas.

pub mod render;
pub mod ttree;

#[cfg(test)]
mod tests {
    use geom::{Point, Rect};

    use crate::{
        Canvas, Color, MouseButton, Result,
        tutils::render::TestRender,
        tutils::ttree::{Block, get_state, run_ttree},
    };

    #[test]
    fn block_renders() -> Result<()> {
        let blue = Color::rgb(0, 0, 255);
        let mut canvas = Canvas::default();
        let root = canvas.root();
        canvas.set_bounds(root, Rect::new(0, 0, 20, 10));
        let block = canvas.insert(root, Block::new(blue))?;
        canvas.set_bounds(block, Rect::new(2, 1, 5, 5));

        let mut tr = TestRender::new(20, 10);
        canvas.render(&mut tr)?;

        assert_eq!(tr.surface.count(blue), 25);
        assert_eq!(tr.pixel(2, 1), blue);
        assert_eq!(tr.pixel(6, 5), blue);
        assert_eq!(tr.pixel(7, 1), Color::TRANSPARENT);
        Ok(())
    }

    #[test]
    fn probes_record_events() -> Result<()> {
        run_ttree(|c, _t| {
            c.mouse_move(Point::new(25, 25))?;
            c.mouse_button(MouseButton::Left, true)?;
            assert_eq!(get_state().path, vec!["ba_la@enter", "ba_la@mouse->ignore"]);
            Ok(())
        })
    }
}
