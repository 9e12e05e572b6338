use std::f64::consts::TAU;

use super::{DARK_GREEN, FOREST_GREEN};
use crate::canvas::{Canvas, Color, Paint, Path, RadialGradient};
use crate::geometry::{Geometry, Point};
use crate::rng::{scatter, RngManager, TreeSample};
use crate::render::{Frame, Layer};

const ORCHARD_TREE: Color = Color::hex(0xea580c);
const ORCHARD_TREE_RADIUS: f64 = 0.5;
const PASTURE_TREE_RADIUS: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    BlackLocust,
    OakAsh,
    Walnut,
}

impl Species {
    pub fn color(self) -> Color {
        match self {
            Species::BlackLocust => Color::hex(0x22c55e),
            Species::OakAsh => Color::hex(0x16a34a),
            Species::Walnut => Color::hex(0x15803d),
        }
    }
}

/// Samples memoised by the count they were drawn for, so positions are
/// reproduced exactly across frames without re-sampling.
#[derive(Default)]
struct SampleCache {
    key: Option<u64>,
    samples: Vec<TreeSample>,
}

impl SampleCache {
    fn get(&mut self, seed: u64, stream: &str, count: u32) -> &[TreeSample] {
        if self.key != Some(seed) || self.samples.len() != count as usize {
            let mut rng = RngManager::new(seed);
            self.samples = scatter(rng.stream(stream), count);
            self.key = Some(seed);
        }
        &self.samples
    }
}

fn dots<'a>(
    samples: impl Iterator<Item = &'a TreeSample>,
    radius: f64,
    place: impl Fn(&TreeSample) -> Point,
) -> Path {
    samples.fold(Path::new(), |path, sample| {
        path.arc(place(sample), radius, 0.0, TAU).close()
    })
}

/// Orchard ring and its fruit trees, scattered over the whole circle.
#[derive(Default)]
pub struct OrchardLayer {
    cache: SampleCache,
}

impl Layer for OrchardLayer {
    fn name(&self) -> &'static str {
        "orchard"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let ring = geo.pixels.orchard;
        if !ring.is_drawable() {
            return;
        }
        let shade = RadialGradient::new(geo.center, ring.inner, ring.outer)
            .stop(0.0, DARK_GREEN)
            .stop(0.5, FOREST_GREEN)
            .stop(1.0, DARK_GREEN);
        canvas.fill_path(
            &Path::ring(geo.center, ring.inner, ring.outer),
            &Paint::Radial(shade),
        );

        let count = geo.systems.num_fruit_trees;
        if count == 0 {
            return;
        }
        let samples = self.cache.get(count as u64 * 7, "orchard", count);
        let trees = dots(samples.iter(), ORCHARD_TREE_RADIUS, |s| {
            geo.at(s.angle_fraction * TAU, ring.inner + s.radial_fraction * ring.width())
        });
        canvas.fill_path(&trees, &Paint::Solid(ORCHARD_TREE));
    }
}

/// Silvopasture trees, by species, over the guild arc of the productive
/// ring. The urban wedge gets none.
#[derive(Default)]
pub struct SilvopastureLayer {
    cache: SampleCache,
}

impl SilvopastureLayer {
    fn species_counts(geo: &Geometry) -> [(Species, u32); 3] {
        let params = &geo.params;
        [
            (Species::BlackLocust, params.black_locust_trees),
            (Species::OakAsh, params.oak_ash_trees),
            (Species::Walnut, params.walnut_trees),
        ]
    }
}

impl Layer for SilvopastureLayer {
    fn name(&self) -> &'static str {
        "silvopasture"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let ring = geo.pixels.productive;
        let total = geo.params.total_silvopasture_trees();
        if total == 0 || !ring.is_drawable() || geo.slots.count == 0 {
            return;
        }
        let arc_start = geo.slots.arc_start();
        let arc = geo.slots.arc();
        let samples = self.cache.get(total as u64 * 11, "silvopasture", total);

        let mut remaining = samples;
        for (species, count) in Self::species_counts(geo) {
            let (batch, rest) = remaining.split_at((count as usize).min(remaining.len()));
            remaining = rest;
            if batch.is_empty() {
                continue;
            }
            let trees = dots(batch.iter(), PASTURE_TREE_RADIUS, |s| {
                geo.at(
                    arc_start + s.angle_fraction * arc,
                    ring.inner + s.radial_fraction * ring.width(),
                )
            });
            canvas.fill_path(&trees, &Paint::Solid(species.color()));
        }
    }
}
