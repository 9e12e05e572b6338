use std::f64::consts::FRAC_PI_2;

use super::{pond, water, PATH_BROWN, WATER, WATER_EDGE};
use crate::canvas::{Canvas, Color, Paint, Path, Stroke};
use crate::geometry::{Geometry, Point, NORTH};
use crate::region::{Region, UrbanZone};
use crate::render::{Frame, Layer};

const INNER_WEDGE: Color = Color::hex(0x4a4a5a);
const OUTER_WEDGE: Color = Color::hex(0x5a5a6a);
/// Clearance between the central canal and the streets beside it, metres.
const CANAL_STREET_GAP_M: f64 = 1.0;

/// The urban wedge at north: two district fills, the central canal with
/// its ponds, and the street grid.
pub struct UrbanLayer;

impl Layer for UrbanLayer {
    fn name(&self) -> &'static str {
        "urban"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        if !geo.urban.shown {
            return;
        }
        let params = &geo.params;
        let px = &geo.pixels;

        for (zone, color) in [(UrbanZone::Inner, INNER_WEDGE), (UrbanZone::Outer, OUTER_WEDGE)] {
            let region = Region::Urban { zone };
            canvas.fill_path(&region.shape(geo).to_path(), &Paint::Solid(color));
        }

        let canal_end = px.canal.inner - geo.to_px(params.canal_path_width);
        canvas.stroke_path(
            &Path::segment(geo.at(NORTH, px.school_water.outer), geo.at(NORTH, canal_end)),
            &Stroke::new(WATER, geo.to_px(params.central_canal_width).max(2.0)).round(),
        );

        draw_pond(
            canvas,
            geo.at(NORTH, px.guild_center),
            geo.to_px(params.urban_pond_inner_diameter / 2.0),
        );

        redraw_canal_crossing(geo, canvas);

        let street = Stroke::new(PATH_BROWN, geo.to_px(params.urban_street_width).max(1.0)).round();
        for path in streets(geo) {
            canvas.stroke_path(&path, &street);
        }

        let outer_pond = geo.at(NORTH, px.canal.mid());
        let outer_pond_radius = geo.to_px(params.urban_pond_outer_diameter / 2.0);
        draw_pond(canvas, outer_pond, outer_pond_radius);
        if params.outer_pond_path_width > 0.0 {
            canvas.stroke_path(
                &Path::circle(
                    outer_pond,
                    outer_pond_radius + geo.to_px(params.outer_pond_path_width / 2.0),
                ),
                &Stroke::new(PATH_BROWN, geo.to_px(params.outer_pond_path_width)),
            );
        }
    }
}

fn draw_pond(canvas: &mut dyn Canvas, centre: Point, radius: f64) {
    if radius <= 0.0 {
        return;
    }
    let disk = Path::circle(centre, radius);
    canvas.fill_path(&disk, &pond(centre, radius));
    canvas.stroke_path(&disk, &Stroke::new(WATER_EDGE, 2.0));
}

/// The district fills cover the perimeter canal; paint it back across the
/// wider of the two wedges.
fn redraw_canal_crossing(geo: &Geometry, canvas: &mut dyn Canvas) {
    let canal = geo.pixels.canal;
    if !geo.perimeter_canal_shown() {
        return;
    }
    let (start, end) = if geo.urban.inner_angle >= geo.urban.outer_angle {
        geo.urban.inner_span()
    } else {
        geo.urban.outer_span()
    };
    canvas.fill_path(
        &Path::annular_sector(geo.center, canal.inner, canal.outer, start, end),
        &water(geo.center, canal.inner, canal.outer),
    );
}

/// Centre lines of every street in the wedge.
pub fn streets(geo: &Geometry) -> Vec<Path> {
    let mut paths = Vec::new();
    inner_radial_streets(geo, &mut paths);
    outer_radial_streets(geo, &mut paths);
    inner_cross_streets(geo, &mut paths);
    outer_cross_streets(geo, &mut paths);
    paths
}

/// Per side of the central canal: streets fanned from the wedge edge
/// inwards, the last one running parallel to the canal.
fn inner_radial_streets(geo: &Geometry, paths: &mut Vec<Path>) {
    let params = &geo.params;
    let per_side = params.urban_streets;
    if per_side == 0 {
        return;
    }
    let from = geo.pixels.productive.inner;
    let to = geo.pixels.canal.inner - geo.to_px(params.canal_path_width);
    let offset = geo.to_px(
        params.central_canal_width / 2.0 + params.urban_street_width / 2.0 + CANAL_STREET_GAP_M,
    );
    let (wedge_start, wedge_end) = geo.urban.inner_span();
    let spacing = if per_side > 1 {
        geo.urban.inner_angle / 2.0 / (per_side - 1) as f64
    } else {
        0.0
    };

    for side in [-1.0, 1.0] {
        for s in 0..per_side - 1 {
            let angle = if side < 0.0 {
                wedge_start + s as f64 * spacing
            } else {
                wedge_end - s as f64 * spacing
            };
            paths.push(Path::segment(geo.at(angle, from), geo.at(angle, to)));
        }
        let shift = Point::new(0.0, 0.0).polar(NORTH + FRAC_PI_2, offset * side);
        paths.push(Path::segment(
            geo.at(NORTH, from).offset(shift.x, shift.y),
            geo.at(NORTH, to).offset(shift.x, shift.y),
        ));
    }
}

/// Evenly spread across the outer wedge, edge to edge, from the outer canal
/// road to the outer bamboo road.
fn outer_radial_streets(geo: &Geometry, paths: &mut Vec<Path>) {
    let params = &geo.params;
    let count = params.urban_streets_outer;
    if count == 0 {
        return;
    }
    let from = geo.pixels.canal.outer + geo.to_px(params.canal_path_width);
    let to = geo.pixels.bamboo.outer + geo.to_px(params.bamboo_outer_path_width / 2.0);
    let (start, _) = geo.urban.outer_span();
    let spacing = if count > 1 {
        geo.urban.outer_angle / (count - 1) as f64
    } else {
        0.0
    };
    for s in 0..count {
        let angle = start + s as f64 * spacing;
        paths.push(Path::segment(geo.at(angle, from), geo.at(angle, to)));
    }
}

/// Arcs across the inner wedge, split around the central canal.
fn inner_cross_streets(geo: &Geometry, paths: &mut Vec<Path>) {
    let params = &geo.params;
    let count = params.urban_cross_streets_inner;
    if count == 0 {
        return;
    }
    let first = geo.pixels.productive.inner;
    let last = geo.pixels.canal.inner - geo.to_px(params.canal_path_width / 2.0);
    let spacing = if count > 1 {
        (last - first) / (count - 1) as f64
    } else {
        0.0
    };
    let gap_px = geo.to_px((params.central_canal_width + params.urban_street_width) / 2.0);
    let (start, end) = geo.urban.inner_span();
    for c in 0..count {
        let radius = first + c as f64 * spacing;
        if radius <= 0.0 {
            continue;
        }
        let gap = gap_px / radius;
        if NORTH - gap > start {
            paths.push(Path::new().arc(geo.center, radius, start, NORTH - gap));
            paths.push(Path::new().arc(geo.center, radius, NORTH + gap, end));
        }
    }
}

/// Arcs across the outer wedge, from the outer canal road to the outer
/// bamboo road.
fn outer_cross_streets(geo: &Geometry, paths: &mut Vec<Path>) {
    let params = &geo.params;
    let count = params.urban_cross_streets_outer;
    if count == 0 {
        return;
    }
    let first = geo.pixels.canal.outer + geo.to_px(params.canal_path_width / 2.0);
    let last = geo.pixels.bamboo.outer + geo.to_px(params.bamboo_outer_path_width / 2.0);
    let spacing = if count > 1 {
        (last - first) / (count - 1) as f64
    } else {
        0.0
    };
    let (start, end) = geo.urban.outer_span();
    for c in 0..count {
        let radius = first + c as f64 * spacing;
        paths.push(Path::new().arc(geo.center, radius, start, end));
    }
}
