//! Radial geometry of a settlement cell.
//!
//! Every radius is computed in metres from [`LayoutParameters`] and then
//! projected into pixels with one uniform scale fitted to the viewport. The
//! resulting [`Geometry`] is rebuilt wholesale whenever the parameters or the
//! viewport change; the renderer paints from it and the hit-tester reads the
//! same record, so both partition the plane identically.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::config::{LayoutParameters, SettlementSystems};

/// Screen-space margin kept around the bamboo ring.
pub const VIEW_PADDING: f64 = 30.0;
/// The cell centre sits slightly below the viewport centre.
pub const CENTER_OFFSET_Y: f64 = 10.0;
/// Canvas angle pointing up; the urban wedge is centred on it.
pub const NORTH: f64 = -PI / 2.0;

const SQ_M_PER_HA: f64 = 10_000.0;
const PRODUCTIVE_CANAL_GAP_M: f64 = 5.0;
const GUILD_CLEARANCE_M: f64 = 10.0;
const ORCHARD_WATER_GAP_M: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `radius` from `self` along canvas angle `angle`.
    pub fn polar(self, angle: f64, radius: f64) -> Point {
        Point::new(
            self.x + angle.cos() * radius,
            self.y + angle.sin() * radius,
        )
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn angle_from(self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }
}

/// Annulus bounds around the cell centre (or a guild centre).
///
/// Construction clamps so that `0 <= inner <= outer`; a band whose
/// parameters would give it negative width collapses to zero width and is
/// reported as not drawable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ring {
    pub inner: f64,
    pub outer: f64,
}

impl Ring {
    pub fn spanning(inner: f64, outer: f64) -> Self {
        let inner = inner.max(0.0);
        Self {
            inner,
            outer: outer.max(inner),
        }
    }

    pub fn width(&self) -> f64 {
        self.outer - self.inner
    }

    pub fn mid(&self) -> f64 {
        (self.inner + self.outer) / 2.0
    }

    pub fn is_drawable(&self) -> bool {
        self.outer > self.inner
    }

    /// Half-open radial test, inner edge excluded.
    pub fn contains(&self, distance: f64) -> bool {
        distance > self.inner && distance <= self.outer
    }

    pub fn area_ha(&self) -> f64 {
        PI * (self.outer * self.outer - self.inner * self.inner) / SQ_M_PER_HA
    }

    fn scaled(&self, scale: f64) -> Self {
        Self {
            inner: self.inner * scale,
            outer: self.outer * scale,
        }
    }
}

/// Every radius of the layout, in a single unit (metres or pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingSet {
    /// Circumradius of the school polygon.
    pub school: f64,
    pub school_water: Ring,
    pub orchard: Ring,
    pub guild_ring: Ring,
    pub productive: Ring,
    pub canal: Ring,
    pub bamboo: Ring,
    /// Distance from the cell centre to each guild centre.
    pub guild_center: f64,
    pub guild: f64,
    pub greenhouse: f64,
    /// Distance from a guild centre to its compound centres.
    pub compound_ring: f64,
    pub compound: f64,
    /// Moat band measured from the guild centre.
    pub guild_moat: Ring,
    pub dome: f64,
}

impl RingSet {
    fn scaled(&self, scale: f64) -> Self {
        Self {
            school: self.school * scale,
            school_water: self.school_water.scaled(scale),
            orchard: self.orchard.scaled(scale),
            guild_ring: self.guild_ring.scaled(scale),
            productive: self.productive.scaled(scale),
            canal: self.canal.scaled(scale),
            bamboo: self.bamboo.scaled(scale),
            guild_center: self.guild_center * scale,
            guild: self.guild * scale,
            greenhouse: self.greenhouse * scale,
            compound_ring: self.compound_ring * scale,
            compound: self.compound * scale,
            guild_moat: self.guild_moat.scaled(scale),
            dome: self.dome * scale,
        }
    }
}

/// Equal angular slots for the guilds over the arc left free by the urban
/// wedge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuildSlots {
    pub count: u32,
    pub slot_angle: f64,
    /// Bisector angle of slot 0.
    pub start_angle: f64,
}

impl GuildSlots {
    fn new(count: u32, urban_inner_angle: f64) -> Self {
        if count == 0 {
            return Self {
                count,
                slot_angle: 0.0,
                start_angle: NORTH + urban_inner_angle / 2.0,
            };
        }
        let slot_angle = (TAU - urban_inner_angle) / count as f64;
        Self {
            count,
            slot_angle,
            start_angle: NORTH + urban_inner_angle / 2.0 + slot_angle / 2.0,
        }
    }

    pub fn angle(&self, index: u32) -> f64 {
        self.start_angle + index as f64 * self.slot_angle
    }

    /// Angular extent covered by all guild slots.
    pub fn arc(&self) -> f64 {
        self.count as f64 * self.slot_angle
    }

    pub fn arc_start(&self) -> f64 {
        self.start_angle - self.slot_angle / 2.0
    }
}

/// Two wedges centred on north: the inner one reaches from the guild ring
/// out to the perimeter canal, the outer one cuts through the bamboo ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UrbanSector {
    pub shown: bool,
    pub inner_angle: f64,
    pub outer_angle: f64,
}

impl UrbanSector {
    fn new(params: &LayoutParameters) -> Self {
        if !params.show_urban_sector {
            return Self {
                shown: false,
                inner_angle: 0.0,
                outer_angle: 0.0,
            };
        }
        Self {
            shown: true,
            inner_angle: params.urban_sector_angle.to_radians(),
            outer_angle: params.urban_sector_angle_outer.to_radians(),
        }
    }

    pub fn inner_span(&self) -> (f64, f64) {
        (NORTH - self.inner_angle / 2.0, NORTH + self.inner_angle / 2.0)
    }

    pub fn outer_span(&self) -> (f64, f64) {
        (NORTH - self.outer_angle / 2.0, NORTH + self.outer_angle / 2.0)
    }

    pub fn outer_fraction(&self) -> f64 {
        self.outer_angle / TAU
    }

    pub fn contains_inner(&self, angle: f64) -> bool {
        self.inner_angle > 0.0 && north_offset(angle).abs() <= self.inner_angle / 2.0
    }

    pub fn contains_outer(&self, angle: f64) -> bool {
        self.outer_angle > 0.0 && north_offset(angle).abs() <= self.outer_angle / 2.0
    }
}

/// Signed angle from north, normalised into `(-π, π]`.
pub fn north_offset(angle: f64) -> f64 {
    wrap_angle(angle - NORTH)
}

/// Normalises an angle into `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Descriptive figures shown in the hover box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionMetrics {
    pub bamboo_area_ha: f64,
    pub canal_area_ha: f64,
    pub canal_length_m: f64,
    pub productive_area_ha: f64,
    pub orchard_area_ha: f64,
    pub guild_ring_area_ha: f64,
    pub school_area_ha: f64,
    pub school_water_area_ha: f64,
    pub guild_area_ha: f64,
    pub all_guilds_area_ha: f64,
    pub greenhouse_area_ha: f64,
    pub moat_perimeter_m: f64,
    pub moat_volume_m3: f64,
    pub urban_inner_area_ha: f64,
    pub urban_outer_area_ha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    pub params: LayoutParameters,
    pub systems: SettlementSystems,
    pub viewport: Viewport,
    pub center: Point,
    /// Pixels per metre.
    pub scale: f64,
    pub meters: RingSet,
    pub pixels: RingSet,
    pub slots: GuildSlots,
    pub urban: UrbanSector,
    pub metrics: RegionMetrics,
}

impl Geometry {
    pub fn compute(params: &LayoutParameters, viewport: Viewport) -> Self {
        let systems = SettlementSystems::derive(params);
        let urban = UrbanSector::new(params);

        let bamboo_inner = (params.inner_area_ha * SQ_M_PER_HA / PI).sqrt();
        let bamboo_area_m2 = systems.bamboo_area_ha * SQ_M_PER_HA;
        let effective_arc = 1.0 - urban.outer_fraction();
        let bamboo_outer = (bamboo_area_m2 / (PI * effective_arc) + bamboo_inner * bamboo_inner).sqrt();

        let canal_outer = bamboo_inner;
        let canal_inner = bamboo_inner - params.perimeter_canal_width;

        let guild_radius = systems.guild_diameter / 2.0;
        let guild_center = params.guild_spacing;

        let productive_outer = canal_inner - PRODUCTIVE_CANAL_GAP_M;
        let productive_inner = guild_center + guild_radius + GUILD_CLEARANCE_M;

        let school_water_inner = params.school_building_radius + params.school_water_distance;
        let school_water_outer = school_water_inner + params.school_water_ring_width;

        let orchard_outer = guild_center - guild_radius - GUILD_CLEARANCE_M;
        let orchard_inner = school_water_outer + ORCHARD_WATER_GAP_M;

        let moat_inner = guild_radius + params.guild_moat_offset;

        let meters = RingSet {
            school: params.school_building_radius,
            school_water: Ring::spanning(school_water_inner, school_water_outer),
            orchard: Ring::spanning(orchard_inner, orchard_outer),
            guild_ring: Ring::spanning(orchard_outer, productive_inner),
            productive: Ring::spanning(productive_inner, productive_outer),
            canal: Ring::spanning(canal_inner, canal_outer),
            bamboo: Ring::spanning(bamboo_inner, bamboo_outer),
            guild_center,
            guild: guild_radius,
            greenhouse: params.greenhouse_length.max(params.greenhouse_width) / 2.0,
            compound_ring: systems.guild_ring_radius,
            compound: systems.compound_radius,
            guild_moat: Ring::spanning(moat_inner, moat_inner + params.guild_moat_width),
            dome: params.dome_diameter / 2.0,
        };

        let available = viewport.width.min(viewport.height) - VIEW_PADDING * 2.0;
        let scale = if available > 0.0 && meters.bamboo.outer > 0.0 {
            available / (meters.bamboo.outer * 2.0)
        } else {
            0.0
        };

        let slots = GuildSlots::new(params.num_guilds, urban.inner_angle);
        let metrics = RegionMetrics::measure(params, &systems, &meters, &urban);

        Self {
            params: params.clone(),
            systems,
            viewport,
            center: Point::new(viewport.width / 2.0, viewport.height / 2.0 + CENTER_OFFSET_Y),
            scale,
            pixels: meters.scaled(scale),
            meters,
            slots,
            urban,
            metrics,
        }
    }

    pub fn to_px(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    /// Point at `radius_px` from the cell centre along `angle`.
    pub fn at(&self, angle: f64, radius_px: f64) -> Point {
        self.center.polar(angle, radius_px)
    }

    pub fn guild_center(&self, guild: u32) -> Point {
        self.at(self.slots.angle(guild), self.pixels.guild_center)
    }

    pub fn compound_angle(&self, compound: u32) -> f64 {
        if self.params.num_compounds == 0 {
            return 0.0;
        }
        compound as f64 / self.params.num_compounds as f64 * TAU
    }

    pub fn compound_center(&self, guild: u32, compound: u32) -> Point {
        self.guild_center(guild)
            .polar(self.compound_angle(compound), self.pixels.compound_ring)
    }

    pub fn compound_outline(&self, guild: u32, compound: u32) -> Vec<Point> {
        regular_polygon(
            self.compound_center(guild, compound),
            self.pixels.compound,
            self.params.polygon_sides,
        )
    }

    pub fn school_outline(&self) -> Vec<Point> {
        regular_polygon(
            self.center,
            self.pixels.school,
            self.params.school_polygon_sides,
        )
    }

    /// Whether the perimeter canal is painted, and therefore hittable.
    pub fn perimeter_canal_shown(&self) -> bool {
        self.pixels.canal.inner > 0.0 && self.pixels.canal.is_drawable()
    }

    /// Half-angle, seen from the cell centre, subtended by a guild's moat.
    /// `None` when the moat reaches past the centre.
    pub fn moat_angular_offset(&self) -> Option<f64> {
        angular_half_width(self.meters.guild_moat.outer, self.meters.guild_center)
    }

    pub fn inner_pond_angular_offset(&self) -> Option<f64> {
        angular_half_width(
            self.params.urban_pond_inner_diameter / 2.0,
            self.meters.guild_center,
        )
    }
}

fn angular_half_width(radius: f64, distance: f64) -> Option<f64> {
    if distance <= 0.0 || radius > distance {
        None
    } else {
        Some((radius / distance).asin())
    }
}

impl RegionMetrics {
    fn measure(
        params: &LayoutParameters,
        systems: &SettlementSystems,
        meters: &RingSet,
        urban: &UrbanSector,
    ) -> Self {
        let guild_area_ha = PI * meters.guild * meters.guild / SQ_M_PER_HA;
        let moat = meters.guild_moat;
        let urban_inner = Ring::spanning(meters.productive.inner, meters.canal.inner);
        let urban_outer = Ring::spanning(meters.canal.outer, meters.bamboo.outer);
        Self {
            bamboo_area_ha: systems.bamboo_area_ha,
            canal_area_ha: meters.canal.area_ha(),
            canal_length_m: TAU * meters.canal.mid(),
            productive_area_ha: meters.productive.area_ha(),
            orchard_area_ha: systems.orchard_zone_area_ha,
            guild_ring_area_ha: meters.guild_ring.area_ha(),
            school_area_ha: PI * meters.school * meters.school / SQ_M_PER_HA,
            school_water_area_ha: meters.school_water.area_ha(),
            guild_area_ha,
            all_guilds_area_ha: guild_area_ha * params.num_guilds as f64,
            greenhouse_area_ha: params.greenhouse_length * params.greenhouse_width / SQ_M_PER_HA,
            moat_perimeter_m: TAU * (moat.inner + moat.width() / 2.0),
            moat_volume_m3: PI * (moat.outer * moat.outer - moat.inner * moat.inner)
                * params.guild_moat_depth,
            urban_inner_area_ha: sector_area_ha(urban.inner_angle, &urban_inner),
            urban_outer_area_ha: sector_area_ha(urban.outer_angle, &urban_outer),
        }
    }
}

fn sector_area_ha(angle: f64, ring: &Ring) -> f64 {
    angle / 2.0 * (ring.outer * ring.outer - ring.inner * ring.inner) / SQ_M_PER_HA
}

/// Vertices of a regular polygon with its first vertex pointing north.
pub fn regular_polygon(center: Point, radius: f64, sides: u32) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = i as f64 / sides as f64 * TAU + NORTH;
            center.polar(angle, radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    fn all_rings(set: &RingSet) -> [Ring; 7] {
        [
            set.school_water,
            set.orchard,
            set.guild_ring,
            set.productive,
            set.canal,
            set.bamboo,
            set.guild_moat,
        ]
    }

    #[test]
    fn bamboo_inner_radius_from_area() {
        let params = LayoutParameters {
            num_guilds: 8,
            inner_area_ha: 50.0,
            show_urban_sector: false,
            ..LayoutParameters::default()
        };
        let geo = Geometry::compute(&params, VIEW);
        assert_close(geo.meters.bamboo.inner, 398.94, 0.01);
        assert_close(geo.meters.bamboo.inner, (50.0 * 10_000.0 / PI).sqrt(), 1e-9);
    }

    #[test]
    fn bamboo_outer_preserves_area_despite_wedge() {
        let geo = Geometry::compute(&LayoutParameters::default(), VIEW);
        let fraction = 1.0 - 50.0 / 360.0;
        let ring = geo.meters.bamboo;
        let visible_ha = ring.area_ha() * fraction;
        assert_close(visible_ha, geo.systems.bamboo_area_ha, 1e-6);
    }

    #[test]
    fn rings_never_have_negative_width() {
        let cases = [
            LayoutParameters::default(),
            LayoutParameters::compact(),
            LayoutParameters {
                inner_area_ha: 1.0,
                perimeter_canal_width: 500.0,
                ..LayoutParameters::default()
            },
            LayoutParameters {
                guild_spacing: 0.0,
                school_water_distance: 400.0,
                ..LayoutParameters::default()
            },
        ];
        for params in cases {
            let geo = Geometry::compute(&params, VIEW);
            for ring in all_rings(&geo.meters).iter().chain(all_rings(&geo.pixels).iter()) {
                assert!(ring.outer >= ring.inner, "{ring:?}");
                assert!(ring.inner >= 0.0);
            }
        }
    }

    #[test]
    fn degenerate_productive_ring_is_not_drawable() {
        let params = LayoutParameters {
            inner_area_ha: 50.0,
            ..LayoutParameters::default()
        };
        let geo = Geometry::compute(&params, VIEW);
        assert!(!geo.meters.productive.is_drawable());
        assert!(!geo.meters.productive.contains(geo.meters.productive.inner));
    }

    #[test]
    fn compute_is_idempotent() {
        let params = LayoutParameters::default();
        let a = Geometry::compute(&params, VIEW);
        let b = Geometry::compute(&params, VIEW);
        assert_eq!(a, b);
        assert_eq!(a.pixels.bamboo.outer.to_bits(), b.pixels.bamboo.outer.to_bits());
    }

    #[test]
    fn slots_partition_remaining_arc() {
        for (guilds, shown) in [(10, true), (8, false), (3, true), (1, false)] {
            let params = LayoutParameters {
                num_guilds: guilds,
                show_urban_sector: shown,
                ..LayoutParameters::default()
            };
            let geo = Geometry::compute(&params, VIEW);
            let total = geo.slots.slot_angle * guilds as f64 + geo.urban.inner_angle;
            assert_close(total, TAU, 1e-12);
        }
    }

    #[test]
    fn slots_start_after_urban_wedge() {
        let params = LayoutParameters {
            urban_sector_angle: 33.0,
            urban_sector_angle_outer: 33.0,
            ..LayoutParameters::default()
        };
        let geo = Geometry::compute(&params, VIEW);
        let expected_slot = (360.0_f64 - 33.0).to_radians() / 10.0;
        assert_close(geo.slots.slot_angle, expected_slot, 1e-12);
        let (_, wedge_end) = geo.urban.inner_span();
        assert_close(geo.slots.arc_start(), wedge_end, 1e-12);
        assert_close(geo.slots.arc(), (327.0_f64).to_radians(), 1e-12);
    }

    #[test]
    fn zero_guilds_has_no_slots() {
        let params = LayoutParameters {
            num_guilds: 0,
            ..LayoutParameters::default()
        };
        let geo = Geometry::compute(&params, VIEW);
        assert_eq!(geo.slots.slot_angle, 0.0);
        assert!(geo.slots.start_angle.is_finite());
        assert_eq!(geo.metrics.all_guilds_area_ha, 0.0);
    }

    #[test]
    fn scale_fits_bamboo_ring_in_smaller_dimension() {
        let geo = Geometry::compute(&LayoutParameters::default(), VIEW);
        assert_close(geo.pixels.bamboo.outer * 2.0, 600.0 - 2.0 * VIEW_PADDING, 1e-9);
        assert_eq!(geo.center, Point::new(400.0, 310.0));
    }

    #[test]
    fn tiny_viewport_scales_to_zero() {
        let geo = Geometry::compute(&LayoutParameters::default(), Viewport::new(40.0, 40.0));
        assert_eq!(geo.scale, 0.0);
        assert_eq!(geo.pixels.bamboo.outer, 0.0);
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        assert_close(wrap_angle(3.0 * PI), PI, 1e-12);
        assert_close(wrap_angle(-PI), PI, 1e-12);
        assert_close(wrap_angle(0.5), 0.5, 1e-12);
        assert_close(north_offset(NORTH + 0.1), 0.1, 1e-12);
        assert_close(north_offset(3.0 * PI / 2.0), 0.0, 1e-12);
    }

    #[test]
    fn urban_wedge_membership() {
        let geo = Geometry::compute(&LayoutParameters::default(), VIEW);
        assert!(geo.urban.contains_inner(NORTH));
        assert!(geo.urban.contains_outer(NORTH + 20f64.to_radians()));
        assert!(!geo.urban.contains_inner(NORTH + 20f64.to_radians()));
        assert!(!geo.urban.contains_outer(PI / 2.0));
    }

    #[test]
    fn moat_metrics() {
        let geo = Geometry::compute(&LayoutParameters::default(), VIEW);
        assert_close(geo.meters.guild_moat.inner, 80.0, 1e-12);
        assert_close(geo.meters.guild_moat.outer, 83.0, 1e-12);
        assert_close(geo.metrics.moat_perimeter_m, TAU * 81.5, 1e-9);
        assert_close(
            geo.metrics.moat_volume_m3,
            PI * (83.0 * 83.0 - 80.0 * 80.0) * 2.0,
            1e-6,
        );
    }

    #[test]
    fn polygon_starts_at_north() {
        let vertices = regular_polygon(Point::new(0.0, 0.0), 10.0, 6);
        assert_eq!(vertices.len(), 6);
        assert_close(vertices[0].x, 0.0, 1e-12);
        assert_close(vertices[0].y, -10.0, 1e-12);
    }
}
