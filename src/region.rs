//! Semantic regions of the map and the shapes that bound them.
//!
//! [`Region::shape`] is the single construction used both to paint the
//! hover highlight and to decide containment during hit-testing.

use std::fmt;

use serde::Serialize;

use crate::canvas::Path;
use crate::geometry::{north_offset, Geometry, Point, NORTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrbanZone {
    Inner,
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Region {
    School,
    SchoolWater,
    Guild { index: u32 },
    GuildMoat { index: u32 },
    Greenhouse { index: u32 },
    Compound { guild: u32, index: u32 },
    Orchard,
    GuildRing,
    Productive,
    Canal,
    Bamboo,
    Urban { zone: UrbanZone },
}

/// Descriptive figures for the hover box; absent figures are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInfo {
    pub label: String,
    pub description: &'static str,
    pub area_ha: Option<f64>,
    pub diameter_m: Option<f64>,
    pub length_m: Option<f64>,
    pub width_m: Option<f64>,
    pub depth_m: Option<f64>,
    pub volume_m3: Option<f64>,
}

impl RegionInfo {
    fn new(label: impl Into<String>, description: &'static str) -> Self {
        Self {
            label: label.into(),
            description,
            area_ha: None,
            diameter_m: None,
            length_m: None,
            width_m: None,
            depth_m: None,
            volume_m3: None,
        }
    }

    fn area(mut self, value: f64) -> Self {
        self.area_ha = Some(value);
        self
    }

    fn diameter(mut self, value: f64) -> Self {
        self.diameter_m = Some(value);
        self
    }

    fn length(mut self, value: f64) -> Self {
        self.length_m = Some(value);
        self
    }

    fn width(mut self, value: f64) -> Self {
        self.width_m = Some(value);
        self
    }

    fn depth(mut self, value: f64) -> Self {
        self.depth_m = Some(value);
        self
    }

    fn volume(mut self, value: f64) -> Self {
        self.volume_m3 = Some(value);
        self
    }

    /// Lines of the hover box after the label, formatted for display.
    /// Zero or missing figures are skipped.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut push = |name: &str, value: Option<f64>, unit: &str, decimals: usize| {
            if let Some(value) = value.filter(|v| *v > 0.0) {
                lines.push(format!("{name}: {value:.decimals$} {unit}"));
            }
        };
        push("Area", self.area_ha, "ha", 1);
        push("Diameter", self.diameter_m, "m", 0);
        push("Length", self.length_m, "m", 0);
        push("Width", self.width_m, "m", 0);
        push("Depth", self.depth_m, "m", 1);
        push("Volume", self.volume_m3, "m³", 0);
        lines
    }
}

/// The region under the pointer together with its descriptors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverTarget {
    pub region: Region,
    pub info: RegionInfo,
}

impl HoverTarget {
    pub fn new(region: Region, geometry: &Geometry) -> Self {
        Self {
            region,
            info: region.info(geometry),
        }
    }
}

impl fmt::Display for HoverTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info.label)
    }
}

/// Closed planar shape in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Disk {
        center: Point,
        radius: f64,
    },
    Annulus {
        center: Point,
        inner: f64,
        outer: f64,
    },
    /// Annulus limited to angles within `half_angle` of north.
    Wedge {
        center: Point,
        inner: f64,
        outer: f64,
        half_angle: f64,
    },
    /// Annulus minus the wedge within `gap_half_angle` of north.
    NotchedAnnulus {
        center: Point,
        inner: f64,
        outer: f64,
        gap_half_angle: f64,
    },
    Polygon(Vec<Point>),
}

impl Shape {
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Disk { center, radius } => *radius > 0.0 && p.distance(*center) <= *radius,
            Shape::Annulus {
                center,
                inner,
                outer,
            } => in_band(p.distance(*center), *inner, *outer),
            Shape::Wedge {
                center,
                inner,
                outer,
                half_angle,
            } => {
                *half_angle > 0.0
                    && in_band(p.distance(*center), *inner, *outer)
                    && north_offset(p.angle_from(*center)).abs() <= *half_angle
            }
            Shape::NotchedAnnulus {
                center,
                inner,
                outer,
                gap_half_angle,
            } => {
                in_band(p.distance(*center), *inner, *outer)
                    && (*gap_half_angle <= 0.0
                        || north_offset(p.angle_from(*center)).abs() > *gap_half_angle)
            }
            Shape::Polygon(vertices) => point_in_polygon(p, vertices),
        }
    }

    pub fn to_path(&self) -> Path {
        match self {
            Shape::Disk { center, radius } => Path::circle(*center, *radius),
            Shape::Annulus {
                center,
                inner,
                outer,
            } => Path::ring(*center, *inner, *outer),
            Shape::Wedge {
                center,
                inner,
                outer,
                half_angle,
            } => Path::annular_sector(
                *center,
                *inner,
                *outer,
                NORTH - half_angle,
                NORTH + half_angle,
            ),
            Shape::NotchedAnnulus {
                center,
                inner,
                outer,
                gap_half_angle,
            } => {
                if *gap_half_angle <= 0.0 {
                    Path::ring(*center, *inner, *outer)
                } else {
                    Path::annular_sector(
                        *center,
                        *inner,
                        *outer,
                        NORTH + gap_half_angle,
                        NORTH - gap_half_angle + std::f64::consts::TAU,
                    )
                }
            }
            Shape::Polygon(vertices) => Path::polygon(vertices),
        }
    }
}

fn in_band(distance: f64, inner: f64, outer: f64) -> bool {
    distance > inner && distance <= outer
}

/// Even-odd crossing test.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl Region {
    pub fn shape(&self, geo: &Geometry) -> Shape {
        let px = &geo.pixels;
        let center = geo.center;
        match *self {
            Region::School => Shape::Polygon(geo.school_outline()),
            Region::SchoolWater => annulus(center, px.school_water.inner, px.school_water.outer),
            Region::Greenhouse { index } => Shape::Disk {
                center: geo.guild_center(index),
                radius: px.greenhouse,
            },
            Region::Compound { guild, index } => Shape::Polygon(geo.compound_outline(guild, index)),
            Region::Guild { index } => Shape::Disk {
                center: geo.guild_center(index),
                radius: px.guild,
            },
            Region::GuildMoat { index } => annulus(
                geo.guild_center(index),
                px.guild_moat.inner,
                px.guild_moat.outer,
            ),
            Region::Urban {
                zone: UrbanZone::Inner,
            } => Shape::Wedge {
                center,
                inner: px.productive.inner,
                outer: px.canal.inner,
                half_angle: geo.urban.inner_angle / 2.0,
            },
            Region::Urban {
                zone: UrbanZone::Outer,
            } => Shape::Wedge {
                center,
                inner: px.canal.outer,
                outer: px.bamboo.outer,
                half_angle: geo.urban.outer_angle / 2.0,
            },
            Region::Orchard => annulus(center, px.orchard.inner, px.orchard.outer),
            Region::GuildRing => annulus(center, px.guild_ring.inner, px.guild_ring.outer),
            Region::Productive => annulus(center, px.productive.inner, px.productive.outer),
            Region::Canal => annulus(center, px.canal.inner, px.canal.outer),
            Region::Bamboo => Shape::NotchedAnnulus {
                center,
                inner: px.bamboo.inner,
                outer: px.bamboo.outer,
                gap_half_angle: geo.urban.outer_angle / 2.0,
            },
        }
    }

    /// Area that answers hit-tests, or `None` when the region is not painted.
    /// The school answers over its full disk while its outline stays the
    /// drawn polygon.
    pub fn hit_shape(&self, geo: &Geometry) -> Option<Shape> {
        match *self {
            Region::School => Some(Shape::Disk {
                center: geo.center,
                radius: geo.pixels.school,
            }),
            Region::Canal if !geo.perimeter_canal_shown() => None,
            _ => Some(self.shape(geo)),
        }
    }

    pub fn info(&self, geo: &Geometry) -> RegionInfo {
        let m = &geo.meters;
        let metrics = &geo.metrics;
        let params = &geo.params;
        match *self {
            Region::School => RegionInfo::new("Earth School", "Education center for the cell")
                .area(metrics.school_area_ha)
                .diameter(m.school * 2.0),
            Region::SchoolWater => {
                RegionInfo::new("School Water Ring", "Aquaculture and water storage")
                    .area(metrics.school_water_area_ha)
                    .width(params.school_water_ring_width)
                    .depth(params.school_water_depth)
            }
            Region::Greenhouse { index } => RegionInfo::new(
                format!("Greenhouse {}", index + 1),
                "Year-round vegetable production",
            )
            .length(params.greenhouse_length)
            .width(params.greenhouse_width)
            .area(metrics.greenhouse_area_ha),
            Region::Compound { index, .. } => {
                RegionInfo::new(format!("Compound {}", index + 1), "Housing with private domes")
            }
            Region::Guild { index } => RegionInfo::new(
                format!("Guild {}", index + 1),
                "Production unit with compounds",
            )
            .area(metrics.guild_area_ha)
            .diameter(m.guild * 2.0),
            Region::GuildMoat { index } => {
                RegionInfo::new(format!("Guild {} Moat", index + 1), "Aquaculture ring")
                    .width(params.guild_moat_width)
                    .depth(params.guild_moat_depth)
                    .length(metrics.moat_perimeter_m)
                    .volume(metrics.moat_volume_m3)
            }
            Region::Urban {
                zone: UrbanZone::Inner,
            } => RegionInfo::new("Urban Sector (Inner)", "CBD, markets, cultural venues")
                .area(metrics.urban_inner_area_ha),
            Region::Urban {
                zone: UrbanZone::Outer,
            } => RegionInfo::new("Urban Sector (Outer)", "Extended urban amenities")
                .area(metrics.urban_outer_area_ha),
            Region::Orchard => RegionInfo::new("Orchard", "Fruit trees + small livestock")
                .area(metrics.orchard_area_ha)
                .width(m.orchard.width()),
            Region::GuildRing => RegionInfo::new("Guild Zone", "Gardens and legume trees")
                .area(metrics.guild_ring_area_ha)
                .width(m.guild_ring.width()),
            Region::Productive => RegionInfo::new("Silvopasture", "Cattle grazing with trees")
                .area(metrics.productive_area_ha)
                .width(m.productive.width()),
            Region::Canal => RegionInfo::new("Perimeter Canal", "Water reservoir and aquaculture")
                .area(metrics.canal_area_ha)
                .width(params.perimeter_canal_width)
                .depth(params.perimeter_canal_depth)
                .length(metrics.canal_length_m),
            Region::Bamboo => RegionInfo::new("Bamboo Plantation", "Biomass for energy production")
                .area(metrics.bamboo_area_ha)
                .width(m.bamboo.width()),
        }
    }
}

fn annulus(center: Point, inner: f64, outer: f64) -> Shape {
    Shape::Annulus {
        center,
        inner,
        outer,
    }
}
