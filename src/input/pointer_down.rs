//! Pointer down handling - recording start, hit testing and handle detection.
//!
//! ## Performance Notes
//!
//! Hit testing goes through the scene's R-tree, so a press stays O(log n) in
//! the number of text and image elements.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use super::coords::CoordinateConverter;
use super::state::{GestureState, PressTarget};
use super::{GestureOutcome, GestureRouter};
use crate::constants::HANDLE_HIT_RADIUS;
use crate::profile_scope;
use crate::scene::Scene;
use crate::types::{Corner, ElementId, ElementKind, Point, SamplePoint, ToolMode};
use tracing::debug;

impl GestureRouter {
    /// Start a pointer stream at `sample` (screen coordinates).
    pub fn pointer_down(&mut self, scene: &mut Scene, sample: SamplePoint) -> GestureOutcome {
        profile_scope!("pointer_down");

        // One stream at a time; a pinch or an unfinished stream owns the input
        if !self.state.is_idle() {
            return GestureOutcome::None;
        }

        if self.mode.tool() == ToolMode::Draw {
            let first = CoordinateConverter::sample_to_canvas(sample, &self.viewport);
            self.state = GestureState::Recording {
                points: vec![first],
            };
            debug!(x = first.x, y = first.y, "Stroke recording started");
            return GestureOutcome::None;
        }

        let origin = sample.position();
        let target = self.press_target(scene, origin);
        debug!(?target, "Pointer pressed");
        self.state = GestureState::Pressing { origin, target };
        GestureOutcome::None
    }

    /// Resolve what a press at `screen_pos` interacts with under the current tool.
    fn press_target(&self, scene: &Scene, screen_pos: Point) -> PressTarget {
        let tool = self.mode.tool();

        // Resize handles win over element bodies
        if tool == ToolMode::Pan {
            if let Some((id, corner)) = self.handle_at(scene, screen_pos) {
                return PressTarget::Handle { id, corner };
            }
        }

        let canvas_pos = CoordinateConverter::screen_to_canvas(screen_pos, &self.viewport);
        let Some(id) = scene.hit_test(canvas_pos) else {
            return PressTarget::Background;
        };

        match (tool, scene.kind_of(id)) {
            (ToolMode::Pan, Some(_)) => PressTarget::Element(id),
            (ToolMode::Text, Some(ElementKind::Text)) => PressTarget::Element(id),
            (ToolMode::Text, _) => PressTarget::Ignored,
            _ => PressTarget::Background,
        }
    }

    /// Corner handle of the selected image within `HANDLE_HIT_RADIUS` screen
    /// units of `screen_pos`, nearest first.
    pub(crate) fn handle_at(&self, scene: &Scene, screen_pos: Point) -> Option<(ElementId, Corner)> {
        let id = self.mode.selection()?;
        let image = scene.image(id)?;
        let bounds = image.bounds();

        Corner::ALL
            .iter()
            .map(|&corner| {
                let screen = CoordinateConverter::canvas_to_screen(corner.locate(&bounds), &self.viewport);
                (corner, screen.distance(screen_pos))
            })
            .filter(|(_, distance)| *distance <= HANDLE_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(corner, _)| (id, corner))
    }
}
