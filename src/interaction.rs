//! Pointer handling, zoom animation and navigation for one map view.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::animation::{ZoomAnimation, ZoomStep, DEFAULT_ZOOM_MS};
use crate::canvas::Canvas;
use crate::config::LayoutParameters;
use crate::geometry::{Geometry, Point, Viewport};
use crate::grazing::{RotationClock, SystemClock};
use crate::hit::hit_test;
use crate::region::{HoverTarget, Region};
use crate::render::{Frame, LayerRenderer, RenderReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    School,
    Guild,
    Compound,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Destination::School => "school",
            Destination::Guild => "guild",
            Destination::Compound => "compound",
        };
        f.write_str(name)
    }
}

pub type NavigateFn = Box<dyn FnMut(Destination) + Send>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickOutcome {
    pub target: Option<HoverTarget>,
    /// Destination delivered immediately by this click.
    pub destination: Option<Destination>,
    pub zoom_started: bool,
}

pub struct InteractionController {
    params: LayoutParameters,
    geometry: Geometry,
    hover: Option<HoverTarget>,
    zoom: Option<ZoomAnimation>,
    zoom_duration_ms: f64,
    renderer: LayerRenderer,
    clock: Box<dyn RotationClock>,
    on_navigate: Option<NavigateFn>,
}

impl InteractionController {
    pub fn new(params: LayoutParameters, viewport: Viewport) -> Self {
        let geometry = Geometry::compute(&params, viewport);
        Self {
            params,
            geometry,
            hover: None,
            zoom: None,
            zoom_duration_ms: DEFAULT_ZOOM_MS,
            renderer: LayerRenderer::standard(),
            clock: Box::new(SystemClock),
            on_navigate: None,
        }
    }

    pub fn with_clock(mut self, clock: impl RotationClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_zoom_duration(mut self, duration_ms: f64) -> Self {
        self.zoom_duration_ms = duration_ms;
        self
    }

    pub fn on_navigate(mut self, callback: impl FnMut(Destination) + Send + 'static) -> Self {
        self.on_navigate = Some(Box::new(callback));
        self
    }

    pub fn set_navigate(&mut self, callback: Option<NavigateFn>) {
        self.on_navigate = callback;
    }

    pub fn params(&self) -> &LayoutParameters {
        &self.params
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    pub fn zoom(&self) -> Option<&ZoomAnimation> {
        self.zoom.as_ref()
    }

    pub fn rotation_minute(&self) -> i64 {
        self.clock.now_minutes()
    }

    /// Re-targets the hover. Returns `true` when the hovered region changed
    /// and the view needs repainting.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let target = hit_test(&self.geometry, Point::new(x, y));
        let changed = target.as_ref().map(|t| t.region) != self.hover.as_ref().map(|t| t.region);
        self.hover = target;
        changed
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.hover.take().is_some()
    }

    /// Handles a click at `(x, y)`. The school starts the zoom; guilds and
    /// compounds navigate straight away; other regions are ignored. Without
    /// a navigation callback clicks have no effect.
    pub fn click(&mut self, x: f64, y: f64, now_ms: f64) -> ClickOutcome {
        let target = hit_test(&self.geometry, Point::new(x, y));
        let mut outcome = ClickOutcome {
            target: target.clone(),
            destination: None,
            zoom_started: false,
        };
        let Some(target) = target else {
            return outcome;
        };
        if self.on_navigate.is_none() {
            debug!(region = %target, "click ignored, no navigation handler");
            return outcome;
        }
        match target.region {
            Region::School => {
                if self.zoom.is_none() {
                    self.zoom = Some(ZoomAnimation::start(now_ms, self.zoom_duration_ms));
                    outcome.zoom_started = true;
                    debug!(now_ms, "zoom started");
                }
            }
            Region::Guild { .. } => {
                self.navigate(Destination::Guild);
                outcome.destination = Some(Destination::Guild);
            }
            Region::Compound { .. } => {
                self.navigate(Destination::Compound);
                outcome.destination = Some(Destination::Compound);
            }
            _ => {}
        }
        outcome
    }

    /// Advances the zoom to `now_ms`. When it completes the animation is torn
    /// down and the school destination fires, exactly once.
    pub fn frame(&mut self, now_ms: f64) -> Option<Destination> {
        let zoom = self.zoom.as_mut()?;
        match zoom.advance(now_ms) {
            ZoomStep::Running(_) => None,
            ZoomStep::Finished => {
                self.zoom = None;
                self.navigate(Destination::School);
                Some(Destination::School)
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.zoom.is_some()
    }

    /// Drops an in-flight zoom without navigating.
    pub fn cancel(&mut self) -> bool {
        self.zoom.take().is_some()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let viewport = Viewport::new(width, height);
        if viewport == self.geometry.viewport {
            return;
        }
        self.geometry = Geometry::compute(&self.params, viewport);
        self.invalidate();
    }

    pub fn set_parameters(&mut self, params: LayoutParameters) {
        self.geometry = Geometry::compute(&params, self.geometry.viewport);
        self.params = params;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.hover = None;
        if self.cancel() {
            debug!("zoom cancelled by layout change");
        }
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) -> RenderReport {
        let frame = Frame {
            geometry: &self.geometry,
            hover: self.hover.as_ref(),
            zoom_progress: self.zoom.map(|z| z.progress),
            rotation_minute: self.clock.now_minutes(),
        };
        self.renderer.render(&frame, canvas)
    }

    fn navigate(&mut self, destination: Destination) {
        if let Some(callback) = self.on_navigate.as_mut() {
            info!(%destination, "navigating");
            callback(destination);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::grazing::FixedClock;

    fn controller() -> (InteractionController, Arc<Mutex<Vec<Destination>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let controller =
            InteractionController::new(LayoutParameters::default(), Viewport::new(800.0, 600.0))
                .with_clock(FixedClock(0))
                .on_navigate(move |d| sink.lock().unwrap().push(d));
        (controller, fired)
    }

    #[test]
    fn school_click_zooms_then_navigates_once() {
        let (mut c, fired) = controller();
        let centre = c.geometry().center;
        let outcome = c.click(centre.x, centre.y, 1_000.0);
        assert!(outcome.zoom_started);
        assert_eq!(outcome.destination, None);
        assert_eq!(c.frame(1_300.0), None);
        assert!(c.zoom().unwrap().progress > 0.5);
        assert_eq!(c.frame(1_600.0), Some(Destination::School));
        assert_eq!(c.frame(1_700.0), None);
        assert!(!c.is_animating());
        assert_eq!(*fired.lock().unwrap(), vec![Destination::School]);
    }

    #[test]
    fn second_school_click_does_not_restart_zoom() {
        let (mut c, _) = controller();
        let centre = c.geometry().center;
        c.click(centre.x, centre.y, 0.0);
        let again = c.click(centre.x, centre.y, 300.0);
        assert!(!again.zoom_started);
        assert_eq!(c.zoom().unwrap().start_ms, 0.0);
    }

    #[test]
    fn guild_and_compound_navigate_immediately() {
        let (mut c, fired) = controller();
        let geo = c.geometry().clone();
        let guild = geo.guild_center(1).polar(0.4, geo.to_px(40.0));
        assert_eq!(c.click(guild.x, guild.y, 0.0).destination, Some(Destination::Guild));
        let compound = geo.compound_center(1, 3);
        assert_eq!(
            c.click(compound.x, compound.y, 0.0).destination,
            Some(Destination::Compound)
        );
        assert_eq!(
            *fired.lock().unwrap(),
            vec![Destination::Guild, Destination::Compound]
        );
    }

    #[test]
    fn other_regions_and_misses_are_ignored() {
        let (mut c, fired) = controller();
        let outcome = c.click(1.0, 1.0, 0.0);
        assert_eq!(outcome.target, None);
        let geo = c.geometry().clone();
        let canal = geo.at(1.0, geo.pixels.canal.mid());
        let outcome = c.click(canal.x, canal.y, 0.0);
        assert_eq!(outcome.target.map(|t| t.region), Some(Region::Canal));
        assert_eq!(outcome.destination, None);
        assert!(fired.lock().unwrap().is_empty());
    }

    #[test]
    fn no_callback_means_no_zoom() {
        let mut c = InteractionController::new(LayoutParameters::default(), Viewport::new(800.0, 600.0));
        let centre = c.geometry().center;
        let outcome = c.click(centre.x, centre.y, 0.0);
        assert!(!outcome.zoom_started);
        assert!(!c.is_animating());
    }

    #[test]
    fn cancel_suppresses_navigation() {
        let (mut c, fired) = controller();
        let centre = c.geometry().center;
        c.click(centre.x, centre.y, 0.0);
        assert!(c.cancel());
        assert_eq!(c.frame(1_000.0), None);
        assert!(fired.lock().unwrap().is_empty());
    }

    #[test]
    fn resize_drops_zoom_and_hover() {
        let (mut c, fired) = controller();
        let centre = c.geometry().center;
        assert!(c.pointer_move(centre.x, centre.y));
        c.click(centre.x, centre.y, 0.0);
        c.resize(1024.0, 768.0);
        assert!(c.hover().is_none());
        assert!(!c.is_animating());
        assert_eq!(c.geometry().viewport, Viewport::new(1024.0, 768.0));
        c.frame(5_000.0);
        assert!(fired.lock().unwrap().is_empty());
    }

    #[test]
    fn hover_change_detection() {
        let (mut c, _) = controller();
        let centre = c.geometry().center;
        assert!(c.pointer_move(centre.x, centre.y));
        assert!(!c.pointer_move(centre.x + 1.0, centre.y));
        assert!(c.pointer_leave());
        assert!(!c.pointer_leave());
    }

    #[test]
    fn render_uses_current_state() {
        let (mut c, _) = controller();
        let centre = c.geometry().center;
        c.pointer_move(centre.x, centre.y);
        let mut canvas = RecordingCanvas::new();
        let report = c.render(&mut canvas);
        assert!(canvas.texts().contains(&"Earth School"));
        assert_eq!(report.layers.len(), c.renderer.layer_names().len());
    }

    #[test]
    fn set_parameters_recomputes_geometry() {
        let (mut c, _) = controller();
        c.set_parameters(LayoutParameters::compact());
        assert_eq!(c.geometry().slots.count, 8);
        assert!(!c.geometry().urban.shown);
    }
}
