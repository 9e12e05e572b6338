use serde::Serialize;

pub const DEFAULT_ZOOM_MS: f64 = 600.0;

/// `1 − (1 − t)³`, clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomStep {
    Running(f64),
    Finished,
}

/// Zoom-into-school overlay. Progress is eased and monotone in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomAnimation {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub progress: f64,
}

impl ZoomAnimation {
    pub fn start(now_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            duration_ms,
            progress: 0.0,
        }
    }

    pub fn advance(&mut self, now_ms: f64) -> ZoomStep {
        let linear = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        };
        self.progress = self.progress.max(ease_out_cubic(linear));
        if linear >= 1.0 {
            self.progress = 1.0;
            ZoomStep::Finished
        } else {
            ZoomStep::Running(self.progress)
        }
    }

    /// Overlay disk radius, growing from `start_radius` to `end_radius`.
    pub fn radius(&self, start_radius: f64, end_radius: f64) -> f64 {
        start_radius + (end_radius - start_radius) * self.progress
    }
}
