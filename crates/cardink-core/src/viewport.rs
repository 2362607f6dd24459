//! Viewport zoom and pan state.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

/// The zoom/pan state of the editing surface.
///
/// Zoom is a uniform scale factor in `[MIN_ZOOM, MAX_ZOOM]`. The pan offset
/// is an unclamped screen-space translation of the page. Neither affects
/// document coordinates; export ignores the viewport entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Set the zoom factor, clamped to the legal range. Returning to 100%
    /// recenters the page: the pan offset resets to the origin.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (self.zoom - 1.0).abs() < 1e-6 {
            self.pan = Vec2::ZERO;
        }
    }

    /// Accumulate a raw screen-space pan delta. Not divided by zoom and not
    /// clamped; the page may be panned fully out of view.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Convert a screen-space delta to a canvas-space delta. The pan offset
    /// does not participate; deltas only scale.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Convert an absolute screen position to canvas space, given the screen
    /// position of the page's top-left corner.
    pub fn screen_to_canvas(&self, screen: Point, canvas_origin: Point) -> Point {
        ((screen - canvas_origin) / self.zoom).to_point()
    }
}
