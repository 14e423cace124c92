//! Viewport transformations - pinch zoom.

use super::state::GestureState;
use super::{GestureOutcome, GestureRouter};
use crate::types::ToolMode;
use tracing::debug;

impl GestureRouter {
    /// A second finger landed. Only pan mode zooms, and an element drag or
    /// resize keeps the input.
    pub fn pinch_begin(&mut self) -> GestureOutcome {
        if self.mode.tool() != ToolMode::Pan || self.state.is_manipulating_element() {
            return GestureOutcome::None;
        }
        if self.state.is_pinching() {
            return GestureOutcome::None;
        }
        self.state = GestureState::Pinching {
            start_zoom: self.viewport.zoom,
        };
        debug!(start_zoom = self.viewport.zoom, "Pinch started");
        GestureOutcome::None
    }

    /// `scale` is the finger distance relative to the distance at `pinch_begin`.
    pub fn pinch_update(&mut self, scale: f32) -> GestureOutcome {
        let GestureState::Pinching { start_zoom } = self.state else {
            return GestureOutcome::None;
        };
        if self.viewport.set_zoom(start_zoom * scale) {
            GestureOutcome::ViewportChanged
        } else {
            GestureOutcome::None
        }
    }

    pub fn pinch_end(&mut self) -> GestureOutcome {
        if self.state.is_pinching() {
            self.state.reset();
            debug!(zoom = self.viewport.zoom, "Pinch ended");
        }
        GestureOutcome::None
    }

    /// Pan the viewport directly (e.g. from a scroll wheel).
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> GestureOutcome {
        if dx == 0.0 && dy == 0.0 {
            return GestureOutcome::None;
        }
        self.viewport.pan_by(dx, dy);
        GestureOutcome::ViewportChanged
    }
}
