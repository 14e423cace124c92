//! Stroke geometry: smoothing, path strings and the rectangle helpers used for
//! hit testing.
//!
//! Everything here is pure. Functions take borrowed samples and return new
//! values, so they can be called from any thread and re-run at will.

use crate::constants::{MIN_SMOOTHING_POINTS, SMOOTHING_BLEND, SMOOTHING_WINDOW};
use crate::types::{Point, SamplePoint};
use std::fmt::Write;

/// Smooth a sample sequence with a clipped moving average blended back into
/// the raw samples.
///
/// Sequences shorter than three samples are returned unchanged. Pressure and
/// tilt are never smoothed. Output length always equals input length.
pub fn smooth(points: &[SamplePoint]) -> Vec<SamplePoint> {
    if points.len() < MIN_SMOOTHING_POINTS {
        return points.to_vec();
    }

    let last = points.len() - 1;
    points
        .iter()
        .enumerate()
        .map(|(i, original)| {
            let start = i.saturating_sub(SMOOTHING_WINDOW);
            let end = (i + SMOOTHING_WINDOW).min(last);
            let window = &points[start..=end];

            let count = window.len() as f32;
            let (sum_x, sum_y) = window
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            let (avg_x, avg_y) = (sum_x / count, sum_y / count);

            SamplePoint {
                x: SMOOTHING_BLEND * avg_x + (1.0 - SMOOTHING_BLEND) * original.x,
                y: SMOOTHING_BLEND * avg_y + (1.0 - SMOOTHING_BLEND) * original.y,
                pressure: original.pressure,
                tilt: original.tilt,
            }
        })
        .collect()
}

/// Render samples as an absolute SVG-style path: `M x y` then `L x y` per
/// following sample, two decimals per coordinate.
pub fn to_path_string(points: &[SamplePoint]) -> String {
    let mut path = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            path.push(' ');
        }
        let command = if i == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail
        let _ = write!(path, "{} {:.2} {:.2}", command, p.x, p.y);
    }
    path
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    pub fn from_origin_size(origin: Point, width: f32, height: f32) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + width,
            max_y: origin.y + height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn width(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    pub fn height(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Grow the rectangle by `margin` on every side. Empty bounds stay empty.
    pub fn expand(&self, margin: f32) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

/// Smallest rectangle containing every point; `Bounds::EMPTY` for none.
pub fn bounds_of(points: impl IntoIterator<Item = Point>) -> Bounds {
    points.into_iter().fold(Bounds::EMPTY, |acc, p| Bounds {
        min_x: acc.min_x.min(p.x),
        min_y: acc.min_y.min(p.y),
        max_x: acc.max_x.max(p.x),
        max_y: acc.max_y.max(p.y),
    })
}
