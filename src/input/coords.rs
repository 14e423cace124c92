//! Coordinate conversion between screen space and canvas space.
//!
//! `canvas = (screen - offset) / zoom`

use crate::constants::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::types::{Point, SamplePoint};

/// Pan offset (screen units) and zoom of the canvas view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub offset: Point,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let clamped = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            self.zoom
        };
        let changed = (clamped - self.zoom).abs() > f32::EPSILON;
        self.zoom = clamped;
        changed
    }

    /// Take over another view. Non-finite parts fall back to the defaults.
    pub fn replace(&mut self, other: Viewport) {
        self.offset = if other.offset.x.is_finite() && other.offset.y.is_finite() {
            other.offset
        } else {
            Point::default()
        };
        let zoom = if other.zoom.is_finite() { other.zoom } else { DEFAULT_ZOOM };
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset.offset(dx, dy);
    }
}

pub struct CoordinateConverter;

impl CoordinateConverter {
    /// Convert screen position to canvas position
    #[inline]
    pub fn screen_to_canvas(screen_pos: Point, viewport: &Viewport) -> Point {
        Point::new(
            (screen_pos.x - viewport.offset.x) / viewport.zoom,
            (screen_pos.y - viewport.offset.y) / viewport.zoom,
        )
    }

    /// Convert canvas position to screen position
    #[inline]
    pub fn canvas_to_screen(canvas_pos: Point, viewport: &Viewport) -> Point {
        Point::new(
            canvas_pos.x * viewport.zoom + viewport.offset.x,
            canvas_pos.y * viewport.zoom + viewport.offset.y,
        )
    }

    /// Convert a delta from screen to canvas (for drag operations)
    #[inline]
    pub fn delta_screen_to_canvas(dx: f32, dy: f32, zoom: f32) -> (f32, f32) {
        (dx / zoom, dy / zoom)
    }

    /// Convert a pointer sample to canvas space, keeping pressure and tilt
    #[inline]
    pub fn sample_to_canvas(sample: SamplePoint, viewport: &Viewport) -> SamplePoint {
        let p = Self::screen_to_canvas(sample.position(), viewport);
        SamplePoint::new(p.x, p.y, sample.pressure, sample.tilt)
    }
}
