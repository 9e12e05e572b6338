use super::{banded, FIELD_GREEN, FOREST_GREEN};
use crate::canvas::{Canvas, Color, FontStyle, Paint, Path, Stroke, TextStyle};
use crate::geometry::Geometry;
use crate::grazing::{GrazingRotation, RecoveryStage};
use crate::render::{Frame, Layer};

const PADDOCK_ANGULAR_GAP: f64 = 0.02;
const PADDOCK_RADIAL_GAP_PX: f64 = 2.0;
const COW: &str = "🐄";

/// Silvopasture ring and the rotational grazing paddocks inside it.
pub struct ProductiveLayer;

impl Layer for ProductiveLayer {
    fn name(&self) -> &'static str {
        "productive"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let geo = frame.geometry;
        let ring = geo.pixels.productive;
        if !ring.is_drawable() {
            return;
        }
        canvas.fill_path(
            &Path::ring(geo.center, ring.inner, ring.outer),
            &banded(geo.center, ring.inner, ring.outer, FIELD_GREEN, FOREST_GREEN),
        );

        if !geo.params.show_grazing_cells || geo.systems.num_grazing_paddocks == 0 {
            return;
        }
        if let Some(rotation) = GrazingRotation::from_params(&geo.params) {
            draw_paddocks(geo, &rotation, frame.rotation_minute, canvas);
        }
    }
}

/// One paddock cell: an annular sector inside a guild's slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddock {
    pub guild: u32,
    pub index: u32,
    pub inner: f64,
    pub outer: f64,
    pub start: f64,
    pub end: f64,
}

/// Paddock cells for every guild, concentric from the guild side out to
/// the canal side. Empty when the bands would have no height.
pub fn paddock_cells(geo: &Geometry, rotation: &GrazingRotation) -> Vec<Paddock> {
    let ring = geo.pixels.productive;
    let n = rotation.paddocks_per_guild;
    let band = (ring.width() - PADDOCK_RADIAL_GAP_PX * (n - 1) as f64) / n as f64;
    if band <= 0.0 || geo.slots.count == 0 {
        return Vec::new();
    }
    let half_sector = geo.slots.slot_angle / 2.0;
    let mut cells = Vec::with_capacity((geo.slots.count as usize).saturating_mul(n as usize));
    for guild in 0..geo.slots.count {
        let angle = geo.slots.angle(guild);
        let start = angle - half_sector + PADDOCK_ANGULAR_GAP / 2.0;
        let end = angle + half_sector - PADDOCK_ANGULAR_GAP / 2.0;
        if end <= start {
            continue;
        }
        for index in 0..n {
            let inner = ring.inner + index as f64 * (band + PADDOCK_RADIAL_GAP_PX);
            cells.push(Paddock {
                guild,
                index,
                inner,
                outer: inner + band,
                start,
                end,
            });
        }
    }
    cells
}

fn draw_paddocks(geo: &Geometry, rotation: &GrazingRotation, minute: i64, canvas: &mut dyn Canvas) {
    let active = rotation.active_paddock(minute);
    let label = TextStyle {
        size: 10.0,
        style: FontStyle::Normal,
        color: Color::WHITE,
        shadow: false,
    };
    for cell in paddock_cells(geo, rotation) {
        let stage = rotation.stage(cell.index, active);
        let color = stage.color();
        let path = Path::annular_sector(geo.center, cell.inner, cell.outer, cell.start, cell.end);
        if stage == RecoveryStage::Active {
            canvas.fill_path(&path, &Paint::Solid(color));
            canvas.stroke_path(&path, &Stroke::new(color, 2.0));
            let mid = geo.at(geo.slots.angle(cell.guild), (cell.inner + cell.outer) / 2.0);
            let width = canvas.measure_text(COW, &label);
            canvas.fill_text(COW, mid.offset(-width / 2.0, 3.0), &label);
        } else {
            canvas.fill_path(&path, &Paint::Solid(color.with_alpha(0x40)));
            canvas.stroke_path(&path, &Stroke::new(color, 0.5));
        }
    }
}
