use std::f64::consts::{PI, TAU};

use super::{banded, water, EARTH, EARTH_EDGE, FIELD_GREEN, FOREST_GREEN, PATH_BROWN, WATER, WATER_EDGE};
use crate::canvas::{Canvas, Color, Paint, Path, Stroke};
use crate::geometry::{Geometry, Point, NORTH};
use crate::region::Region;
use crate::render::{Frame, Layer};

const GUILD_GROUND: Color = Color::hex(0x2d4a3a);
const GARDEN: Color = Color::hex(0x4a7c59).with_alpha(0x40);
const GREENHOUSE: Color = Color::hex(0x22c55e);
const GARDEN_MARGIN_PX: f64 = 5.0;
const DOME_MIN_RADIUS_PX: f64 = 2.0;
const DOME_DISTANCE: f64 = 0.7;

/// Band between the orchard and the silvopasture that the guilds sit in.
pub struct GuildRingLayer;

impl Layer for GuildRingLayer {
    fn name(&self) -> &'static str {
        "guild_ring"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let ring = geo.pixels.guild_ring;
        if !ring.is_drawable() {
            return;
        }
        canvas.fill_path(
            &Path::ring(geo.center, ring.inner, ring.outer),
            &banded(geo.center, ring.inner, ring.outer, FIELD_GREEN, FOREST_GREEN),
        );
    }
}

/// Every guild: ground disk, garden band, greenhouse kernel, compounds
/// with their domes, and the moat around it.
pub struct GuildsLayer;

impl Layer for GuildsLayer {
    fn name(&self) -> &'static str {
        "guilds"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        for guild in 0..geo.slots.count {
            draw_guild(geo, guild, canvas);
        }
    }
}

fn draw_guild(geo: &Geometry, guild: u32, canvas: &mut dyn Canvas) {
    let px = &geo.pixels;
    let centre = geo.guild_center(guild);

    canvas.fill_path(&Path::circle(centre, px.guild), &Paint::Solid(GUILD_GROUND));

    let garden_inner = px.greenhouse + GARDEN_MARGIN_PX;
    let garden_outer = px.compound_ring - px.compound - GARDEN_MARGIN_PX;
    if garden_outer > garden_inner {
        canvas.fill_path(
            &Path::ring(centre, garden_inner, garden_outer),
            &Paint::Solid(GARDEN),
        );
    }

    let kernel = Path::circle(centre, px.greenhouse);
    canvas.fill_path(&kernel, &Paint::Solid(GREENHOUSE.with_alpha(0x30)));
    canvas.stroke_path(&kernel, &Stroke::new(GREENHOUSE, 2.0));

    for compound in 0..geo.params.num_compounds {
        draw_compound(geo, guild, compound, canvas);
    }

    let moat = px.guild_moat;
    if geo.params.guild_moat_width > 0.0 && moat.is_drawable() {
        canvas.fill_path(
            &Region::GuildMoat { index: guild }.shape(geo).to_path(),
            &water(centre, moat.inner, moat.outer),
        );
        canvas.stroke_path(&Path::circle(centre, moat.outer), &Stroke::new(WATER_EDGE, 1.0));
    }
}

fn draw_compound(geo: &Geometry, guild: u32, compound: u32, canvas: &mut dyn Canvas) {
    let outline = Path::polygon(&geo.compound_outline(guild, compound));
    canvas.fill_path(&outline, &Paint::Solid(EARTH));
    canvas.stroke_path(&outline, &Stroke::new(EARTH_EDGE, 1.0));

    let sides = geo.params.polygon_sides;
    let dome_radius = geo.pixels.dome.max(DOME_MIN_RADIUS_PX);
    let domes = dome_centres(geo.compound_center(guild, compound), geo.pixels.compound, sides)
        .into_iter()
        .fold(Path::new(), |path, dome| path.arc(dome, dome_radius, 0.0, TAU).close());
    canvas.fill_path(&domes, &Paint::Solid(PATH_BROWN));
}

/// One dome per polygon side, sitting between two vertices.
fn dome_centres(compound: Point, radius: f64, sides: u32) -> Vec<Point> {
    if sides == 0 {
        return Vec::new();
    }
    let half_step = PI / sides as f64;
    (0..sides)
        .map(|d| {
            let angle = d as f64 / sides as f64 * TAU + half_step;
            compound.polar(angle, radius * DOME_DISTANCE)
        })
        .collect()
}

/// Arcs along the guild ring that join neighbouring moats, and the ends of
/// the chain to the inner urban pond (or to each other when there is no
/// urban sector).
pub struct InterGuildCanalLayer;

impl InterGuildCanalLayer {
    /// Start and end angles of each connecting arc.
    pub fn arcs(geo: &Geometry) -> Vec<(f64, f64)> {
        let params = &geo.params;
        let count = geo.slots.count;
        if count == 0 || params.guild_moat_width <= 0.0 || params.inter_guild_canal_width <= 0.0 {
            return Vec::new();
        }
        let Some(moat) = geo.moat_angular_offset() else {
            return Vec::new();
        };

        let mut arcs: Vec<(f64, f64)> = (0..count.saturating_sub(1))
            .map(|i| (geo.slots.angle(i) + moat, geo.slots.angle(i + 1) - moat))
            .collect();

        let first = geo.slots.angle(0);
        let last = geo.slots.angle(count - 1);
        if geo.urban.shown {
            if let Some(pond) = geo.inner_pond_angular_offset() {
                arcs.push((NORTH + pond, first - moat));
                arcs.push((last + moat, NORTH - pond + TAU));
            }
        } else {
            arcs.push((last + moat, first + TAU - moat));
        }
        arcs.retain(|(start, end)| end > start);
        arcs
    }
}

impl Layer for InterGuildCanalLayer {
    fn name(&self) -> &'static str {
        "inter_guild_canals"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let arcs = Self::arcs(geo);
        if arcs.is_empty() {
            return;
        }
        let width = geo.to_px(geo.params.inter_guild_canal_width).max(2.0);
        let stroke = Stroke::new(WATER, width).round();
        let radius = geo.pixels.guild_center;
        for (start, end) in arcs {
            canvas.stroke_path(&Path::new().arc(geo.center, radius, start, end), &stroke);
        }
    }
}
