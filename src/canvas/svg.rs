use std::f64::consts::FRAC_PI_2;

use super::{arc_sweep, Canvas, Color, FontStyle, LineCap, Paint, Path, PathCommand, Stroke, TextStyle};
use crate::geometry::Point;

/// Canvas backend that accumulates an SVG document.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    gradients: usize,
    elements: usize,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            defs: String::new(),
            body: String::with_capacity(64 * 1024),
            gradients: 0,
            elements: 0,
        }
    }

    /// Number of shape and text elements emitted so far.
    pub fn element_count(&self) -> usize {
        self.elements
    }

    pub fn finish(self) -> String {
        let mut svg = String::with_capacity(self.defs.len() + self.body.len() + 256);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height),
        ));
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    fn paint_attrs(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => color_attrs("fill", color),
            Paint::Radial(gradient) => {
                if gradient.outer_radius <= 0.0 || gradient.stops.is_empty() {
                    let fallback = gradient
                        .stops
                        .first()
                        .map(|(_, color)| *color)
                        .unwrap_or(Color::WHITE);
                    return color_attrs("fill", &fallback);
                }
                let id = format!("g{}", self.gradients);
                self.gradients += 1;
                self.defs.push_str(&format!(
                    r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{cx}" cy="{cy}" r="{r}">"#,
                    cx = fmt_num(gradient.center.x),
                    cy = fmt_num(gradient.center.y),
                    r = fmt_num(gradient.outer_radius),
                ));
                let span = gradient.outer_radius - gradient.inner_radius;
                for (offset, color) in &gradient.stops {
                    let radius = gradient.inner_radius + offset * span;
                    self.defs.push_str(&format!(
                        r#"<stop offset="{:.4}" stop-color="{}" stop-opacity="{:.3}"/>"#,
                        (radius / gradient.outer_radius).clamp(0.0, 1.0),
                        color.css_hex(),
                        color.opacity(),
                    ));
                }
                self.defs.push_str("</radialGradient>");
                format!(r#"fill="url(#{id})""#)
            }
        }
    }
}

impl Canvas for SvgCanvas {
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        self.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
            fmt_num(origin.x),
            fmt_num(origin.y),
            fmt_num(width),
            fmt_num(height),
            color_attrs("fill", &color),
        ));
        self.elements += 1;
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if path.is_empty() {
            return;
        }
        let attrs = self.paint_attrs(paint);
        self.body.push_str(&format!(r#"<path d="{}" {attrs}/>"#, path_data(path)));
        self.elements += 1;
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        if path.is_empty() || stroke.width <= 0.0 {
            return;
        }
        let cap = match stroke.cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        };
        self.body.push_str(&format!(
            r#"<path d="{}" fill="none" {} stroke-width="{}" stroke-linecap="{cap}"/>"#,
            path_data(path),
            color_attrs("stroke", &stroke.color),
            fmt_num(stroke.width),
        ));
        self.elements += 1;
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let font = match style.style {
            FontStyle::Normal => String::new(),
            FontStyle::Bold => r#" font-weight="bold""#.to_string(),
            FontStyle::Italic => r#" font-style="italic""#.to_string(),
        };
        let escaped = escape_text(text);
        if style.shadow {
            self.body.push_str(&format!(
                r##"<text x="{}" y="{}" font-family="system-ui, sans-serif" font-size="{}"{font} fill="#000000" fill-opacity="0.8">{escaped}</text>"##,
                fmt_num(at.x + 1.0),
                fmt_num(at.y + 1.0),
                fmt_num(style.size),
            ));
        }
        self.body.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="system-ui, sans-serif" font-size="{}"{font} {}>{escaped}</text>"#,
            fmt_num(at.x),
            fmt_num(at.y),
            fmt_num(style.size),
            color_attrs("fill", &style.color),
        ));
        self.elements += 1;
    }
}

fn color_attrs(attr: &str, color: &Color) -> String {
    if color.a == 0xff {
        format!(r#"{attr}="{}""#, color.css_hex())
    } else {
        format!(
            r#"{attr}="{}" {attr}-opacity="{:.3}""#,
            color.css_hex(),
            color.opacity()
        )
    }
}

/// SVG path data for a canvas path. Arcs are split into quarter turns at
/// most, since a single SVG arc cannot describe a full circle.
fn path_data(path: &Path) -> String {
    let mut d = String::new();
    let mut current: Option<Point> = None;
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => {
                d.push_str(&format!("M{} {}", fmt_num(p.x), fmt_num(p.y)));
                current = Some(p);
            }
            PathCommand::LineTo(p) => {
                let op = if current.is_some() { 'L' } else { 'M' };
                d.push_str(&format!("{op}{} {}", fmt_num(p.x), fmt_num(p.y)));
                current = Some(p);
            }
            PathCommand::Arc {
                center,
                radius,
                start,
                end,
                anticlockwise,
            } => {
                let from = center.polar(start, radius);
                let op = if current.is_some() { 'L' } else { 'M' };
                d.push_str(&format!("{op}{} {}", fmt_num(from.x), fmt_num(from.y)));
                current = Some(from);
                let sweep = arc_sweep(start, end, anticlockwise);
                if radius <= 0.0 || sweep == 0.0 {
                    continue;
                }
                let pieces = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
                let step = sweep / pieces as f64;
                let flag = if sweep > 0.0 { 1 } else { 0 };
                for i in 1..=pieces {
                    let to = center.polar(start + step * i as f64, radius);
                    d.push_str(&format!(
                        "A{r} {r} 0 0 {flag} {} {}",
                        fmt_num(to.x),
                        fmt_num(to.y),
                        r = fmt_num(radius),
                    ));
                    current = Some(to);
                }
            }
            PathCommand::Close => {
                d.push('Z');
                current = None;
            }
        }
    }
    d
}

fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
