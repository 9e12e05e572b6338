use crate::canvas::{Canvas, Color};
use crate::geometry::Point;
use crate::render::{Frame, Layer};

const BACKGROUND: Color = Color::hex(0x0a0a12);

pub struct BackgroundLayer;

impl Layer for BackgroundLayer {
    fn name(&self) -> &'static str {
        "background"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let view = frame.geometry.viewport;
        canvas.fill_rect(Point::new(0.0, 0.0), view.width, view.height, BACKGROUND);
    }
}
