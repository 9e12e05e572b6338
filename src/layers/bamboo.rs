use std::f64::consts::TAU;

use super::{arc_around_gap, banded, DARK_GREEN, FOREST_GREEN, PATH_BROWN};
use crate::canvas::{Canvas, Color, Paint, Path, Stroke};
use crate::geometry::{Geometry, NORTH};
use crate::region::Region;
use crate::render::{Frame, Layer};

const BAMBOO_INNER: Color = Color::hex(0x0d3320);

/// Bamboo ring with its texture and the two service roads.
pub struct BambooLayer;

impl Layer for BambooLayer {
    fn name(&self) -> &'static str {
        "bamboo"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let ring = geo.pixels.bamboo;
        if !ring.is_drawable() {
            return;
        }
        let fill = banded(geo.center, ring.inner, ring.outer, DARK_GREEN, BAMBOO_INNER);
        canvas.fill_path(&Region::Bamboo.shape(geo).to_path(), &fill);
        draw_texture(geo, canvas);
        draw_service_roads(geo, canvas);
    }
}

fn draw_texture(geo: &Geometry, canvas: &mut dyn Canvas) {
    let outer = geo.pixels.bamboo.outer;
    let count = ((outer * 0.2).floor() as usize).max(24);
    let mut texture = Path::new();
    for i in 0..count {
        let angle = i as f64 / count as f64 * TAU + NORTH;
        if geo.urban.contains_outer(angle) {
            continue;
        }
        let base = geo.at(angle, outer - 4.0);
        texture = texture
            .move_to(base.polar(angle, 6.0))
            .line_to(base.polar(angle - 0.1, 2.0))
            .line_to(base.polar(angle + 0.1, 2.0))
            .close();
    }
    canvas.fill_path(&texture, &Paint::Solid(FOREST_GREEN));
}

fn draw_service_roads(geo: &Geometry, canvas: &mut dyn Canvas) {
    let params = &geo.params;
    let gap = geo.urban.outer_angle / 2.0;
    let ring = geo.pixels.bamboo;

    if params.bamboo_path_width > 0.0 {
        canvas.stroke_path(
            &arc_around_gap(geo.center, ring.mid(), gap),
            &Stroke::new(PATH_BROWN, geo.to_px(params.bamboo_path_width)),
        );
    }
    if params.bamboo_outer_path_width > 0.0 {
        let radius = ring.outer + geo.to_px(params.bamboo_outer_path_width / 2.0);
        canvas.stroke_path(
            &arc_around_gap(geo.center, radius, gap),
            &Stroke::new(PATH_BROWN, geo.to_px(params.bamboo_outer_path_width)),
        );
    }
}
