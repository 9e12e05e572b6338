//! Immediate-mode 2D drawing surface.
//!
//! Layers describe shapes as [`Path`]s built from canvas-style commands
//! (`move_to`, `line_to`, `arc`, `close`) and hand them to a [`Canvas`]
//! backend. Paths are filled with the non-zero winding rule, so a ring is an
//! outer arc followed by an inner arc traced the other way.

mod svg;

use std::f64::consts::TAU;

use serde::Serialize;

use crate::geometry::Point;

pub use svg::SvgCanvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn css_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub stops: Vec<(f64, Color)>,
}

impl RadialGradient {
    pub fn new(center: Point, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push((offset, color));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(mut self) -> Self {
        self.cap = LineCap::Round;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub style: FontStyle,
    pub color: Color,
    pub shadow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn arc(mut self, center: Point, radius: f64, start: f64, end: f64) -> Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start,
            end,
            anticlockwise: false,
        });
        self
    }

    pub fn arc_ccw(mut self, center: Point, radius: f64, start: f64, end: f64) -> Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start,
            end,
            anticlockwise: true,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Path::new().arc(center, radius, 0.0, TAU).close()
    }

    /// Full annulus; fills only the band between the two radii.
    pub fn ring(center: Point, inner: f64, outer: f64) -> Self {
        Path::new()
            .arc(center, outer, 0.0, TAU)
            .close()
            .arc_ccw(center, inner, TAU, 0.0)
            .close()
    }

    /// Annulus restricted to the clockwise arc `start..end`.
    pub fn annular_sector(center: Point, inner: f64, outer: f64, start: f64, end: f64) -> Self {
        Path::new()
            .arc(center, outer, start, end)
            .arc_ccw(center, inner, end, start)
            .close()
    }

    pub fn segment(from: Point, to: Point) -> Self {
        Path::new().move_to(from).line_to(to)
    }

    pub fn polygon(vertices: &[Point]) -> Self {
        let mut path = Path::new();
        for (i, vertex) in vertices.iter().enumerate() {
            path = if i == 0 {
                path.move_to(*vertex)
            } else {
                path.line_to(*vertex)
            };
        }
        path.close()
    }
}

/// Signed sweep of a canvas arc, following the HTML canvas rules: a
/// clockwise arc spanning at least a full turn is a full circle, otherwise
/// the span is reduced modulo one turn.
pub fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise {
        let span = end - start;
        if span >= TAU {
            TAU
        } else {
            span.rem_euclid(TAU)
        }
    } else {
        let span = start - end;
        if span >= TAU {
            -TAU
        } else {
            -span.rem_euclid(TAU)
        }
    }
}

pub trait Canvas {
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Approximate advance width of `text`; backends with real font metrics
    /// override it.
    fn measure_text(&self, text: &str, style: &TextStyle) -> f64 {
        text.chars().count() as f64 * style.size * 0.55
    }
}

/// Draw call captured by [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Color,
    },
    Fill {
        path: Path,
        paint: Paint,
    },
    Stroke {
        path: Path,
        stroke: Stroke,
    },
    Text {
        text: String,
        at: Point,
    },
}

/// Canvas that keeps every call, for inspecting what a layer painted.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fills_with(&self, color: Color) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { paint: Paint::Solid(c), .. } if *c == color))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::Rect {
            origin,
            width,
            height,
            color,
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.ops.push(DrawOp::Stroke {
            path: path.clone(),
            stroke: *stroke,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, _style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn hex_colors() {
        let amber = Color::hex(0xf59e0b);
        assert_eq!(amber, Color::rgb(0xf5, 0x9e, 0x0b));
        assert_eq!(amber.css_hex(), "#f59e0b");
        assert_eq!(amber.with_alpha(0x40).a, 0x40);
    }

    #[test]
    fn sweep_follows_canvas_rules() {
        assert!((arc_sweep(0.0, TAU, false) - TAU).abs() < 1e-12);
        assert!((arc_sweep(0.0, 3.0 * TAU, false) - TAU).abs() < 1e-12);
        assert!((arc_sweep(PI, 0.0, false) - PI).abs() < 1e-12);
        assert!((arc_sweep(TAU, 0.0, true) + TAU).abs() < 1e-12);
        assert!((arc_sweep(0.5, 0.25, true) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn polygon_path_closes() {
        let path = Path::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.commands()[3], PathCommand::Close);
    }
}
