//! Gesture state machine - one explicit state for the active pointer stream.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Recording          (pointer down in draw mode)
//! Idle -> Pressing           (pointer down in pan or text mode)
//! Pressing -> DraggingElement (moved past the tap slop on an element body)
//! Pressing -> ResizingImage  (moved past the tap slop on a corner handle)
//! Pressing -> Panning        (moved past the tap slop on the background)
//! Idle | Pressing | Panning -> Pinching (two-finger pinch in pan mode)
//!
//! Any -> Idle                (pointer up, cancel or tool change)
//! ```

use crate::types::{Corner, ElementId, Point, SamplePoint};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressTarget {
    /// Empty canvas
    Background,
    /// Body of a text or image element
    Element(ElementId),
    /// Corner handle of the selected image
    Handle { id: ElementId, corner: Corner },
    /// Something the current tool does not interact with
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No pointer down
    #[default]
    Idle,

    /// Pointer down, not yet moved past the tap slop
    Pressing {
        /// Screen position of the pointer-down
        origin: Point,
        target: PressTarget,
    },

    /// Freehand stroke being recorded (canvas coordinates)
    Recording { points: Vec<SamplePoint> },

    /// Moving an element
    DraggingElement {
        id: ElementId,
        /// Last screen position for delta calculation
        last_pos: Point,
    },

    /// Resizing an image from one corner
    ResizingImage {
        id: ElementId,
        corner: Corner,
        last_pos: Point,
    },

    /// Panning the viewport
    Panning { last_pos: Point },

    /// Two-finger pinch zoom
    Pinching {
        /// Zoom when the pinch began
        start_zoom: f32,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self, Self::Pinching { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// Returns true while an element is being moved or resized
    pub fn is_manipulating_element(&self) -> bool {
        matches!(self, Self::DraggingElement { .. } | Self::ResizingImage { .. })
    }

    pub fn dragged_element_id(&self) -> Option<ElementId> {
        match self {
            Self::DraggingElement { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn resized_image_id(&self) -> Option<ElementId> {
        match self {
            Self::ResizingImage { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Samples of the stroke being recorded, if any
    pub fn recorded_points(&self) -> Option<&[SamplePoint]> {
        match self {
            Self::Recording { points } => Some(points),
            _ => None,
        }
    }

    /// Update the last pointer position of a drag, resize or pan
    pub fn update_last_pos(&mut self, pos: Point) {
        match self {
            Self::DraggingElement { last_pos, .. }
            | Self::ResizingImage { last_pos, .. }
            | Self::Panning { last_pos } => *last_pos = pos,
            _ => {}
        }
    }

    /// Reset to Idle, returning the previous state
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
