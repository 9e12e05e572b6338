use super::AMBER;
use crate::canvas::{Canvas, Color, FontStyle, Paint, Path, TextStyle};
use crate::geometry::Point;
use crate::region::HoverTarget;
use crate::render::{Frame, Layer};

const HIGHLIGHT: Color = Color::WHITE.with_alpha(38);
const DESCRIPTION: Color = Color::hex(0x999999);
const BOX_MARGIN: f64 = 12.0;
const BOX_PADDING: f64 = 10.0;
const LINE_HEIGHT: f64 = 16.0;
const FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct InfoLine {
    pub text: String,
    pub style: TextStyle,
}

/// Label, figures, then the description, as shown in the hover box.
pub fn info_lines(target: &HoverTarget) -> Vec<InfoLine> {
    let style = |style, size, color| TextStyle {
        size,
        style,
        color,
        shadow: true,
    };
    let mut lines = vec![InfoLine {
        text: target.info.label.clone(),
        style: style(FontStyle::Bold, FONT_SIZE, Color::WHITE),
    }];
    lines.extend(target.info.detail_lines().into_iter().map(|text| InfoLine {
        text,
        style: style(FontStyle::Normal, FONT_SIZE, Color::WHITE),
    }));
    if !target.info.description.is_empty() {
        lines.push(InfoLine {
            text: target.info.description.to_string(),
            style: style(FontStyle::Italic, FONT_SIZE - 1.0, DESCRIPTION),
        });
    }
    lines
}

/// Translucent highlight over the hovered region and its info box in the
/// upper-right corner.
pub struct HoverLayer;

impl Layer for HoverLayer {
    fn name(&self) -> &'static str {
        "hover"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let Some(target) = frame.hover else {
            return;
        };
        let geo = frame.geometry;
        canvas.fill_path(
            &target.region.shape(geo).to_path(),
            &Paint::Solid(HIGHLIGHT),
        );

        let lines = info_lines(target);
        let widest = lines
            .iter()
            .map(|line| canvas.measure_text(&line.text, &line.style))
            .fold(0.0, f64::max);
        let box_x = geo.viewport.width - (widest + BOX_PADDING * 2.0) - BOX_MARGIN;
        for (i, line) in lines.iter().enumerate() {
            let baseline = BOX_MARGIN + BOX_PADDING + (i + 1) as f64 * LINE_HEIGHT - 4.0;
            canvas.fill_text(&line.text, Point::new(box_x + BOX_PADDING, baseline), &line.style);
        }
    }
}

/// Amber disk growing from the school to cover the viewport.
pub struct ZoomLayer;

impl Layer for ZoomLayer {
    fn name(&self) -> &'static str {
        "zoom"
    }

    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) {
        let Some(progress) = frame.zoom_progress.filter(|p| *p > 0.0) else {
            return;
        };
        let geo = frame.geometry;
        let start = geo.pixels.school;
        let radius = start + (geo.viewport.diagonal() - start) * progress;
        canvas.fill_path(&Path::circle(geo.center, radius), &Paint::Solid(AMBER));
    }
}
