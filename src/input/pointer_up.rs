//! Pointer up and cancel handling - stroke commit, taps, drag finalization.

use super::coords::CoordinateConverter;
use super::state::{GestureState, PressTarget};
use super::{GestureOutcome, GestureRouter};
use crate::constants::TAP_SLOP;
use crate::profile_scope;
use crate::scene::Scene;
use crate::types::{Point, SamplePoint, ToolMode};
use tracing::debug;

impl GestureRouter {
    /// Finish the active pointer stream at `sample` (screen coordinates).
    pub fn pointer_up(&mut self, scene: &mut Scene, sample: SamplePoint) -> GestureOutcome {
        profile_scope!("pointer_up");

        // A pinch owns the input until it ends
        if self.state.is_pinching() {
            return GestureOutcome::None;
        }

        let pos = sample.position();
        // The release position is the last move of a drag or pan
        let released = if self.state.is_manipulating_element() || self.state.is_panning() {
            self.pointer_move(scene, sample)
        } else {
            GestureOutcome::None
        };

        match self.state.take() {
            GestureState::Recording { points } => {
                let brush = self.brush.clone();
                match scene.add_stroke(points, brush.color, brush.width, brush.kind) {
                    Some(id) => {
                        debug!(%id, "Stroke committed");
                        GestureOutcome::Committed
                    }
                    None => GestureOutcome::None,
                }
            }
            GestureState::Pressing { origin, target } => {
                if origin.distance(pos) > TAP_SLOP {
                    return GestureOutcome::None;
                }
                self.tap(scene, origin, target)
            }
            GestureState::DraggingElement { id, .. } | GestureState::ResizingImage { id, .. } => {
                debug!(%id, "Element manipulation committed");
                GestureOutcome::Committed
            }
            GestureState::Panning { .. } => released,
            GestureState::Pinching { .. } | GestureState::Idle => GestureOutcome::None,
        }
    }

    /// Abort the active pointer stream. A stroke being recorded is discarded;
    /// a drag or resize keeps what it already applied.
    pub fn pointer_cancel(&mut self) -> GestureOutcome {
        if self.state.is_pinching() {
            return GestureOutcome::None;
        }
        match self.state.take() {
            GestureState::Recording { points } => {
                debug!(samples = points.len(), "Stroke recording discarded");
                GestureOutcome::None
            }
            GestureState::DraggingElement { .. } | GestureState::ResizingImage { .. } => {
                GestureOutcome::Committed
            }
            _ => GestureOutcome::None,
        }
    }

    fn tap(&mut self, scene: &mut Scene, origin: Point, target: PressTarget) -> GestureOutcome {
        let selection_outcome = |changed: bool| {
            if changed {
                GestureOutcome::SelectionChanged
            } else {
                GestureOutcome::None
            }
        };

        match (self.mode.tool(), target) {
            (ToolMode::Pan, PressTarget::Background) => {
                selection_outcome(self.mode.clear_selection())
            }
            (ToolMode::Pan | ToolMode::Text, PressTarget::Element(id)) => {
                selection_outcome(self.mode.select(id))
            }
            (ToolMode::Text, PressTarget::Background) => {
                let at = CoordinateConverter::screen_to_canvas(origin, &self.viewport);
                let id = scene.add_text(at.x, at.y);
                self.mode.select(id);
                GestureOutcome::Committed
            }
            _ => GestureOutcome::None,
        }
    }
}
