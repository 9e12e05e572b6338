use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::canvas::Canvas;
use crate::geometry::Geometry;
use crate::layers::{
    BackgroundLayer, BambooLayer, CanalLayer, GuildRingLayer, GuildsLayer, HoverLayer,
    InterGuildCanalLayer, OrchardLayer, ProductiveLayer, RadialLayer, SchoolLayer,
    SchoolWaterLayer, SilvopastureLayer, UrbanLayer, ZoomLayer,
};
use crate::region::HoverTarget;

/// Everything a layer may read while painting one frame.
pub struct Frame<'a> {
    pub geometry: &'a Geometry,
    pub hover: Option<&'a HoverTarget>,
    /// Eased zoom progress; `None` when no zoom is running.
    pub zoom_progress: Option<f64>,
    /// Minute on the rotation clock, drives the grazing paddocks.
    pub rotation_minute: i64,
}

impl<'a> Frame<'a> {
    pub fn still(geometry: &'a Geometry, rotation_minute: i64) -> Self {
        Self {
            geometry,
            hover: None,
            zoom_progress: None,
            rotation_minute,
        }
    }
}

pub trait Layer: Send {
    fn name(&self) -> &'static str;
    fn draw(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas);
}

#[derive(Clone, Debug, Serialize)]
pub struct LayerRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RenderReport {
    pub layers: Vec<LayerRunReport>,
    pub total_ms: f64,
}

impl RenderReport {
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|report| report.name).collect()
    }
}

#[derive(Default)]
pub struct RendererBuilder {
    layers: Vec<Box<dyn Layer>>,
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn build(self) -> LayerRenderer {
        LayerRenderer {
            layers: self.layers,
        }
    }
}

/// Paints a frame by running its layers in insertion order.
pub struct LayerRenderer {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerRenderer {
    /// The full map, back to front.
    pub fn standard() -> Self {
        RendererBuilder::new()
            .with_layer(BackgroundLayer)
            .with_layer(BambooLayer)
            .with_layer(CanalLayer)
            .with_layer(ProductiveLayer)
            .with_layer(OrchardLayer::default())
            .with_layer(SilvopastureLayer::default())
            .with_layer(SchoolWaterLayer)
            .with_layer(SchoolLayer)
            .with_layer(GuildRingLayer)
            .with_layer(GuildsLayer)
            .with_layer(InterGuildCanalLayer)
            .with_layer(UrbanLayer)
            .with_layer(RadialLayer)
            .with_layer(HoverLayer)
            .with_layer(ZoomLayer)
            .build()
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn render(&mut self, frame: &Frame<'_>, canvas: &mut dyn Canvas) -> RenderReport {
        let start = Instant::now();
        let mut layers = Vec::with_capacity(self.layers.len());
        for layer in self.layers.iter_mut() {
            let layer_start = Instant::now();
            layer.draw(frame, canvas);
            let elapsed = layer_start.elapsed();
            layers.push(LayerRunReport {
                name: layer.name(),
                duration_ms: elapsed.as_secs_f64() * 1_000.0,
            });
        }
        let total_ms = start.elapsed().as_secs_f64() * 1_000.0;
        debug!(
            layers = layers.len(),
            total_ms,
            width = frame.geometry.viewport.width,
            height = frame.geometry.viewport.height,
            "frame rendered"
        );
        RenderReport { layers, total_ms }
    }
}
