use super::{PATH_BROWN, WATER};
use crate::canvas::{Canvas, Path, Stroke};
use crate::geometry::Geometry;
use crate::render::{Frame, Layer};

/// Clearance left between a radial canal and the moat it skirts.
const MOAT_CLEARANCE_PX: f64 = 2.0;

/// Radial canals along each guild bisector, split around the guild, and
/// radial paths out through the bamboo.
pub struct RadialLayer;

impl RadialLayer {
    /// `(from, to)` radii of the canal pieces on one bisector.
    pub fn canal_segments(geo: &Geometry) -> Vec<(f64, f64)> {
        let px = &geo.pixels;
        let moat_outer = px.guild_moat.outer;
        [
            (px.school_water.outer, px.guild_center - moat_outer - MOAT_CLEARANCE_PX),
            (px.guild_center + moat_outer + MOAT_CLEARANCE_PX, px.canal.inner),
        ]
        .into_iter()
        .filter(|(from, to)| to > from)
        .collect()
    }
}

impl Layer for RadialLayer {
    fn name(&self) -> &'static str {
        "radial"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let params = &geo.params;
        let px = &geo.pixels;

        let canal = Stroke::new(WATER, geo.to_px(params.guild_canal_width).max(2.0)).round();
        let segments = Self::canal_segments(geo);
        for guild in 0..geo.slots.count {
            let angle = geo.slots.angle(guild);
            for (from, to) in &segments {
                canvas.stroke_path(&Path::segment(geo.at(angle, *from), geo.at(angle, *to)), &canal);
            }
        }

        if params.radial_path_width <= 0.0 {
            return;
        }
        let path = Stroke::new(PATH_BROWN, geo.to_px(params.radial_path_width).max(1.0));
        let from = px.canal.outer + geo.to_px(params.canal_path_width);
        let to = px.bamboo.outer + geo.to_px(params.bamboo_outer_path_width / 2.0);
        for guild in 0..geo.slots.count {
            let angle = geo.slots.angle(guild);
            canvas.stroke_path(&Path::segment(geo.at(angle, from), geo.at(angle, to)), &path);
        }
    }
}
