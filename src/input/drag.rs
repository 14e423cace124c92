//! Pointer move handling - recording, element drag, image resize, panning.
//!
//! ## Performance Notes
//!
//! Moves arrive at display rate while a finger or pen is down. Recording only
//! appends a sample; drags apply one incremental delta per event.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use super::coords::CoordinateConverter;
use super::state::{GestureState, PressTarget};
use super::{GestureOutcome, GestureRouter};
use crate::constants::TAP_SLOP;
use crate::profile_scope;
use crate::scene::Scene;
use crate::types::{Point, SamplePoint, ToolMode};
use tracing::debug;

impl GestureRouter {
    /// Continue the active pointer stream at `sample` (screen coordinates).
    pub fn pointer_move(&mut self, scene: &mut Scene, sample: SamplePoint) -> GestureOutcome {
        profile_scope!("pointer_move");

        let pos = sample.position();
        match self.state {
            GestureState::Recording { ref mut points } => {
                points.push(CoordinateConverter::sample_to_canvas(sample, &self.viewport));
                GestureOutcome::None
            }
            GestureState::Pressing { origin, target } => {
                if origin.distance(pos) <= TAP_SLOP {
                    return GestureOutcome::None;
                }
                self.begin_drag(scene, origin, target, pos)
            }
            GestureState::DraggingElement { .. }
            | GestureState::ResizingImage { .. }
            | GestureState::Panning { .. } => self.drag_to(scene, pos),
            // Single-pointer movement is ignored during a pinch
            GestureState::Idle | GestureState::Pinching { .. } => GestureOutcome::None,
        }
    }

    /// Turn a press that left the tap slop into a drag, resize or pan.
    fn begin_drag(
        &mut self,
        scene: &mut Scene,
        origin: Point,
        target: PressTarget,
        pos: Point,
    ) -> GestureOutcome {
        if self.mode.tool() != ToolMode::Pan {
            // Text mode only reacts to taps
            self.state.reset();
            return GestureOutcome::None;
        }

        self.state = match target {
            PressTarget::Handle { id, corner } => GestureState::ResizingImage {
                id,
                corner,
                last_pos: origin,
            },
            PressTarget::Element(id) => {
                self.mode.select(id);
                GestureState::DraggingElement {
                    id,
                    last_pos: origin,
                }
            }
            PressTarget::Background => GestureState::Panning { last_pos: origin },
            PressTarget::Ignored => {
                self.state.reset();
                return GestureOutcome::None;
            }
        };
        debug!(state = ?self.state, "Drag started");
        self.drag_to(scene, pos)
    }

    /// Apply the movement from the last position to `pos`.
    fn drag_to(&mut self, scene: &mut Scene, pos: Point) -> GestureOutcome {
        let zoom = self.viewport.zoom;
        let outcome = match self.state {
            GestureState::DraggingElement { id, last_pos } => {
                let (dx, dy) =
                    CoordinateConverter::delta_screen_to_canvas(pos.x - last_pos.x, pos.y - last_pos.y, zoom);
                if scene.move_element(id, dx, dy) {
                    GestureOutcome::SceneChanged
                } else {
                    // Element vanished under the drag
                    self.state.reset();
                    return GestureOutcome::None;
                }
            }
            GestureState::ResizingImage { id, corner, last_pos } => {
                let (dx, dy) =
                    CoordinateConverter::delta_screen_to_canvas(pos.x - last_pos.x, pos.y - last_pos.y, zoom);
                if scene.resize_image(id, corner, dx, dy) {
                    GestureOutcome::SceneChanged
                } else {
                    self.state.reset();
                    return GestureOutcome::None;
                }
            }
            GestureState::Panning { last_pos } => {
                if pos == last_pos {
                    return GestureOutcome::None;
                }
                self.viewport.pan_by(pos.x - last_pos.x, pos.y - last_pos.y);
                GestureOutcome::ViewportChanged
            }
            _ => return GestureOutcome::None,
        };
        self.state.update_last_pos(pos);
        outcome
    }
}
