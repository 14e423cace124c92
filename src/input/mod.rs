//! Pointer and gesture input for the canvas.
//!
//! A [`GestureRouter`] receives one pointer stream at a time and dispatches it
//! to exactly one handler: the freehand recorder, the element drag or resize
//! handler, or the viewport pan/zoom handler. Which one is decided by the tool
//! mode and selection held in [`ModeState`].
//!
//! ## Architecture
//!
//! The router uses an explicit state machine (`GestureState`) to track the
//! active gesture instead of scattered flags. The scene is not owned by the
//! router; each entry point borrows it mutably for the duration of the event.
//!
//! ## Modules
//!
//! - `state` - Gesture state machine enum and helper methods
//! - `mode` - Tool mode and selection
//! - `coords` - Viewport and screen/canvas conversion
//! - `pointer_down` - Press handling (recording start, hit and handle tests)
//! - `drag` - Pointer move handling (recording, drag, resize, pan)
//! - `pointer_up` - Release and cancel handling (commit, taps)
//! - `transform` - Pinch zoom

pub mod coords;
mod drag;
pub mod mode;
mod pointer_down;
mod pointer_up;
mod state;
mod transform;

pub use coords::{CoordinateConverter, Viewport};
pub use mode::ModeState;
pub use state::{GestureState, PressTarget};

use crate::geometry;
use crate::scene::Scene;
use crate::types::{Brush, ElementId, SamplePoint, TextStyleUpdate, ToolMode};
use tracing::debug;

/// What an input event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureOutcome {
    /// Nothing observable changed
    #[default]
    None,
    /// The selection changed, the scene did not
    SelectionChanged,
    /// The scene changed and the gesture is still running
    SceneChanged,
    /// The scene changed and the gesture finished
    Committed,
    /// Pan offset or zoom changed
    ViewportChanged,
}

impl GestureOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }

    pub fn changed_scene(&self) -> bool {
        matches!(self, Self::SceneChanged | Self::Committed)
    }
}

/// Routes pointer and pinch events to the scene and the viewport.
pub struct GestureRouter {
    mode: ModeState,
    state: GestureState,
    viewport: Viewport,
    brush: Brush,
}

impl GestureRouter {
    pub fn new(brush: Brush) -> Self {
        Self {
            mode: ModeState::default(),
            state: GestureState::Idle,
            viewport: Viewport::default(),
            brush,
        }
    }

    pub fn tool(&self) -> ToolMode {
        self.mode.tool()
    }

    /// Switch tools. A change cancels the active gesture, discarding any
    /// stroke being recorded, and clears the selection.
    pub fn set_tool(&mut self, tool: ToolMode) -> GestureOutcome {
        if tool == self.mode.tool() {
            return GestureOutcome::None;
        }
        let had_selection = self.mode.selection().is_some();
        let cancelled = self.state.take();
        if !cancelled.is_idle() {
            debug!(state = ?cancelled, "Gesture cancelled by tool change");
        }
        self.mode.set_tool(tool);

        if cancelled.is_manipulating_element() {
            GestureOutcome::Committed
        } else if had_selection {
            GestureOutcome::SelectionChanged
        } else {
            GestureOutcome::None
        }
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.mode.selection()
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport.replace(viewport);
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    /// Samples of the stroke being recorded, in canvas coordinates.
    pub fn active_stroke(&self) -> Option<&[SamplePoint]> {
        self.state.recorded_points()
    }

    /// Smoothed path of the stroke being recorded, for live rendering.
    pub fn active_stroke_path(&self) -> Option<String> {
        self.active_stroke()
            .map(|points| geometry::to_path_string(&geometry::smooth(points)))
    }

    /// Replace the content of the selected text element.
    pub fn edit_selected_text(&mut self, scene: &mut Scene, content: &str) -> GestureOutcome {
        let Some(id) = self.selected_text(scene) else {
            return GestureOutcome::None;
        };
        if scene.update_text_content(id, content) {
            GestureOutcome::Committed
        } else {
            GestureOutcome::None
        }
    }

    /// Apply a style change to the selected text element.
    pub fn style_selected_text(
        &mut self,
        scene: &mut Scene,
        update: TextStyleUpdate,
    ) -> GestureOutcome {
        let Some(id) = self.selected_text(scene) else {
            return GestureOutcome::None;
        };
        if scene.update_text_style(id, update) {
            GestureOutcome::Committed
        } else {
            GestureOutcome::None
        }
    }

    /// Remove an element, dropping it from the selection if needed.
    pub fn remove_element(&mut self, scene: &mut Scene, id: ElementId) -> GestureOutcome {
        if !scene.remove_element(id) {
            return GestureOutcome::None;
        }
        if self.mode.is_selected(id) {
            self.mode.clear_selection();
        }
        if self.state.dragged_element_id() == Some(id) || self.state.resized_image_id() == Some(id)
        {
            self.state.reset();
        }
        GestureOutcome::Committed
    }

    pub fn remove_selected(&mut self, scene: &mut Scene) -> GestureOutcome {
        match self.mode.selection() {
            Some(id) => self.remove_element(scene, id),
            None => GestureOutcome::None,
        }
    }

    /// Forget the selection and any gesture; used when a new scene is loaded.
    pub fn reset(&mut self) {
        self.state.reset();
        self.mode.clear_selection();
    }

    fn selected_text(&self, scene: &Scene) -> Option<ElementId> {
        self.mode
            .selection()
            .filter(|id| scene.text(*id).is_some())
    }
}

impl Default for GestureRouter {
    fn default() -> Self {
        Self::new(Brush::default())
    }
}
