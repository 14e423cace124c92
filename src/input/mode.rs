//! Tool mode and selection.

use crate::types::{ElementId, ToolMode};
use tracing::debug;

/// Current tool and the (single) selected element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeState {
    tool: ToolMode,
    selection: Option<ElementId>,
}

impl ModeState {
    pub fn new(tool: ToolMode) -> Self {
        Self {
            tool,
            selection: None,
        }
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Switch tools. Any change clears the selection; returns whether the tool changed.
    pub fn set_tool(&mut self, tool: ToolMode) -> bool {
        if self.tool == tool {
            return false;
        }
        debug!(from = ?self.tool, to = ?tool, "Tool changed");
        self.tool = tool;
        self.selection = None;
        true
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection == Some(id)
    }

    /// Returns whether the selection changed.
    pub fn select(&mut self, id: ElementId) -> bool {
        let changed = self.selection != Some(id);
        self.selection = Some(id);
        changed
    }

    /// Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }
}
