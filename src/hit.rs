//! Inverse mapping from a pixel to the region drawn there.

use crate::geometry::{Geometry, Point};
use crate::region::{HoverTarget, Region, UrbanZone};

/// Regions in the order they are tested. Earlier entries shadow later ones
/// where their shapes overlap.
pub fn precedence(geo: &Geometry) -> impl Iterator<Item = Region> {
    let compounds = geo.params.num_compounds;
    let guilds = (0..geo.slots.count).flat_map(move |index| {
        std::iter::once(Region::Greenhouse { index })
            .chain((0..compounds).map(move |c| Region::Compound { guild: index, index: c }))
            .chain([Region::Guild { index }, Region::GuildMoat { index }])
    });
    let urban = geo
        .urban
        .shown
        .then_some([
            Region::Urban {
                zone: UrbanZone::Inner,
            },
            Region::Urban {
                zone: UrbanZone::Outer,
            },
        ])
        .into_iter()
        .flatten();
    [Region::School, Region::SchoolWater]
        .into_iter()
        .chain(guilds)
        .chain(urban)
        .chain([
            Region::Orchard,
            Region::GuildRing,
            Region::Productive,
            Region::Canal,
            Region::Bamboo,
        ])
}

/// First region, in precedence order, whose hit shape contains `point`.
pub fn hit_region(geo: &Geometry, point: Point) -> Option<Region> {
    if geo.scale <= 0.0 {
        return None;
    }
    precedence(geo).find(|region| {
        region
            .hit_shape(geo)
            .is_some_and(|shape| shape.contains(point))
    })
}

pub fn hit_test(geo: &Geometry, point: Point) -> Option<HoverTarget> {
    hit_region(geo, point).map(|region| HoverTarget::new(region, geo))
}
