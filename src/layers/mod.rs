//! Map layers, one unit per visual stratum.

mod background;
mod bamboo;
mod canal;
mod guilds;
mod overlay;
mod productive;
mod radial;
mod school;
mod trees;
mod urban;

use std::f64::consts::TAU;

pub use background::BackgroundLayer;
pub use bamboo::BambooLayer;
pub use canal::CanalLayer;
pub use guilds::{GuildRingLayer, GuildsLayer, InterGuildCanalLayer};
pub use overlay::{info_lines, HoverLayer, InfoLine, ZoomLayer};
pub use productive::{paddock_cells, Paddock, ProductiveLayer};
pub use radial::RadialLayer;
pub use school::{SchoolLayer, SchoolWaterLayer};
pub use trees::{OrchardLayer, SilvopastureLayer, Species};
pub use urban::{streets, UrbanLayer};

use crate::canvas::{Color, Paint, Path, RadialGradient};
use crate::geometry::{Point, NORTH};

pub(crate) const PATH_BROWN: Color = Color::hex(0x8b7355);
pub(crate) const WATER: Color = Color::hex(0x3b82f6);
pub(crate) const WATER_DEEP: Color = Color::hex(0x1d4ed8);
pub(crate) const WATER_EDGE: Color = Color::hex(0x60a5fa);
pub(crate) const AMBER: Color = Color::hex(0xf59e0b);
pub(crate) const FIELD_GREEN: Color = Color::hex(0x3d6b4a);
pub(crate) const FOREST_GREEN: Color = Color::hex(0x2d5a3d);
pub(crate) const DARK_GREEN: Color = Color::hex(0x1a472a);
pub(crate) const EARTH: Color = Color::hex(0x4a3728);
pub(crate) const EARTH_EDGE: Color = Color::hex(0x3d2e22);

/// Deep-light-deep water shading across a band.
pub(crate) fn water(center: Point, inner: f64, outer: f64) -> Paint {
    Paint::Radial(
        RadialGradient::new(center, inner, outer)
            .stop(0.0, WATER_DEEP)
            .stop(0.5, WATER)
            .stop(1.0, WATER_DEEP),
    )
}

/// Pond shading, lightest a little past the middle.
pub(crate) fn pond(center: Point, radius: f64) -> Paint {
    Paint::Radial(
        RadialGradient::new(center, 0.0, radius)
            .stop(0.0, WATER_DEEP)
            .stop(0.6, WATER)
            .stop(1.0, WATER_DEEP),
    )
}

/// Two-tone fill from `inner_color` at the inner edge to `outer_color`.
pub(crate) fn banded(center: Point, inner: f64, outer: f64, outer_color: Color, inner_color: Color) -> Paint {
    Paint::Radial(
        RadialGradient::new(center, inner, outer)
            .stop(0.0, inner_color)
            .stop(1.0, outer_color),
    )
}

/// Circle of `radius` around `center`, leaving out the wedge within
/// `half_gap` of north. A zero gap gives the full circle.
pub(crate) fn arc_around_gap(center: Point, radius: f64, half_gap: f64) -> Path {
    if half_gap > 0.0 {
        Path::new().arc(center, radius, NORTH + half_gap, NORTH - half_gap + TAU)
    } else {
        Path::new().arc(center, radius, 0.0, TAU)
    }
}
