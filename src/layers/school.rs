use super::{water, AMBER, EARTH, EARTH_EDGE};
use crate::canvas::{Canvas, Paint, Path, Stroke};
use crate::render::{Frame, Layer};

pub struct SchoolWaterLayer;

impl Layer for SchoolWaterLayer {
    fn name(&self) -> &'static str {
        "school_water"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let ring = geo.pixels.school_water;
        if !ring.is_drawable() {
            return;
        }
        canvas.fill_path(
            &Path::ring(geo.center, ring.inner, ring.outer),
            &water(geo.center, ring.inner, ring.outer),
        );
    }
}

/// The school building with its amber accent border.
pub struct SchoolLayer;

impl Layer for SchoolLayer {
    fn name(&self) -> &'static str {
        "school"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let outline = Path::polygon(&frame.geometry.school_outline());
        canvas.fill_path(&outline, &Paint::Solid(EARTH));
        canvas.stroke_path(&outline, &Stroke::new(EARTH_EDGE, 1.0));
        canvas.stroke_path(&outline, &Stroke::new(AMBER, 2.0));
    }
}
