use super::{arc_around_gap, water, PATH_BROWN};
use crate::canvas::{Canvas, Path, Stroke};
use crate::render::{Frame, Layer};

/// Perimeter canal, drawn as a full ring, plus the roads on either bank.
pub struct CanalLayer;

impl Layer for CanalLayer {
    fn name(&self) -> &'static str {
        "canal"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let canal = geo.pixels.canal;
        if geo.perimeter_canal_shown() {
            canvas.fill_path(
                &Path::ring(geo.center, canal.inner, canal.outer),
                &water(geo.center, canal.inner, canal.outer),
            );
        }

        let width_m = geo.params.canal_path_width;
        if width_m <= 0.0 {
            return;
        }
        let stroke = Stroke::new(PATH_BROWN, geo.to_px(width_m));
        let half = geo.to_px(width_m / 2.0);
        // the inner bank stops at the inner urban wedge, the outer bank at the outer one
        canvas.stroke_path(
            &arc_around_gap(geo.center, canal.inner - half, geo.urban.inner_angle / 2.0),
            &stroke,
        );
        canvas.stroke_path(
            &arc_around_gap(geo.center, canal.outer + half, geo.urban.outer_angle / 2.0),
            &stroke,
        );
    }
}
