//! Core types for the canvas scene graph.
//!
//! This module defines the element model shared by the scene graph, the
//! gesture router and the wire adapter: points, element identifiers, the three
//! element variants and their styling.

use crate::constants::{
    DEFAULT_BRUSH_SIZE, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_PRESSURE,
    DEFAULT_STROKE_COLOR, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_WIDTH, DEFAULT_TILT, TEXT_LINE_HEIGHT,
};
use crate::geometry::{self, Bounds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Points
// ============================================================================

/// A position in canvas or screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One recorded pointer sample of a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub tilt: f32,
}

impl SamplePoint {
    pub const fn new(x: f32, y: f32, pressure: f32, tilt: f32) -> Self {
        Self { x, y, pressure, tilt }
    }

    /// A sample with default pressure and tilt.
    pub const fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, DEFAULT_PRESSURE, DEFAULT_TILT)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Scene-unique element identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and bookkeeping carried by every element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementMeta {
    pub id: ElementId,
    /// Random key backing a stable wire id for elements created locally
    pub uid: Uuid,
    /// Identifier the element was loaded under, if it came from the service
    pub wire_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ElementMeta {
    pub fn new(id: ElementId) -> Self {
        let now = Utc::now();
        Self {
            id,
            uid: Uuid::new_v4(),
            wire_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The three element layers, also the wire `type` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Stroke,
    Text,
    Image,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Stroke => "stroke",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "stroke" => Some(ElementKind::Stroke),
            "text" => Some(ElementKind::Text),
            "image" => Some(ElementKind::Image),
            _ => None,
        }
    }
}

// ============================================================================
// Strokes
// ============================================================================

/// Brush used to record a stroke.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BrushKind {
    #[default]
    Pen,
    Pencil,
    Marker,
    Highlighter,
    /// Any brush this build does not know about, carried through unchanged
    Other(String),
}

impl BrushKind {
    pub fn as_str(&self) -> &str {
        match self {
            BrushKind::Pen => "pen",
            BrushKind::Pencil => "pencil",
            BrushKind::Marker => "marker",
            BrushKind::Highlighter => "highlighter",
            BrushKind::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "pen" => BrushKind::Pen,
            "pencil" => BrushKind::Pencil,
            "marker" => BrushKind::Marker,
            "highlighter" => BrushKind::Highlighter,
            other => BrushKind::Other(other.to_string()),
        }
    }
}

/// Color, width and brush applied to newly recorded strokes.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    /// Stroke color as hex string (e.g., "#000000")
    pub color: String,
    pub width: f32,
    pub kind: BrushKind,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR.to_string(),
            width: DEFAULT_BRUSH_SIZE,
            kind: BrushKind::Pen,
        }
    }
}

/// A finished freehand stroke. Immutable once recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeElement {
    pub meta: ElementMeta,
    /// Samples in drawing order
    pub points: Vec<SamplePoint>,
    pub color: String,
    pub width: f32,
    pub brush: BrushKind,
}

impl StrokeElement {
    pub fn id(&self) -> ElementId {
        self.meta.id
    }

    /// Smoothed vector path for the rendering layer.
    pub fn render_path(&self) -> String {
        geometry::to_path_string(&geometry::smooth(&self.points))
    }

    pub fn bounds(&self) -> Bounds {
        geometry::bounds_of(self.points.iter().map(SamplePoint::position))
            .expand(self.width * 0.5)
    }
}

// ============================================================================
// Text
// ============================================================================

/// Text box styling.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    /// Text color as hex string
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_TEXT_COLOR.to_string(),
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// A single styling change applied to a text element.
#[derive(Clone, Debug, PartialEq)]
pub enum TextStyleUpdate {
    FontFamily(String),
    FontSize(f32),
    Color(String),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Width(f32),
}

/// An editable text box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub meta: ElementMeta,
    pub position: Point,
    pub content: String,
    pub style: TextStyle,
    /// Container width in canvas units
    pub width: f32,
}

impl TextElement {
    pub fn new(meta: ElementMeta, position: Point) -> Self {
        Self {
            meta,
            position,
            content: String::new(),
            style: TextStyle::default(),
            width: DEFAULT_TEXT_WIDTH,
        }
    }

    pub fn id(&self) -> ElementId {
        self.meta.id
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count().max(1)
    }

    pub fn bounds(&self) -> Bounds {
        let height = self.style.font_size * TEXT_LINE_HEIGHT * self.line_count() as f32;
        Bounds::from_origin_size(self.position, self.width, height)
    }

    pub(crate) fn apply_style(&mut self, update: TextStyleUpdate) {
        match update {
            TextStyleUpdate::FontFamily(family) => self.style.font_family = family,
            TextStyleUpdate::FontSize(size) if size > 0.0 => self.style.font_size = size,
            TextStyleUpdate::Color(color) => self.style.color = color,
            TextStyleUpdate::Bold(on) => self.style.bold = on,
            TextStyleUpdate::Italic(on) => self.style.italic = on,
            TextStyleUpdate::Underline(on) => self.style.underline = on,
            TextStyleUpdate::Width(width) if width > 0.0 => self.width = width,
            TextStyleUpdate::FontSize(_) | TextStyleUpdate::Width(_) => {}
        }
    }
}

// ============================================================================
// Images
// ============================================================================

/// Corner handle of a selected image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Sign multipliers turning a drag delta into a size change.
    pub fn to_signs(self) -> (f32, f32) {
        match self {
            Corner::TopLeft => (-1.0, -1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, 1.0),
            Corner::BottomRight => (1.0, 1.0),
        }
    }

    /// Position of this corner on the given rectangle.
    pub fn locate(self, bounds: &Bounds) -> Point {
        match self {
            Corner::TopLeft => Point::new(bounds.min_x, bounds.min_y),
            Corner::TopRight => Point::new(bounds.max_x, bounds.min_y),
            Corner::BottomLeft => Point::new(bounds.min_x, bounds.max_y),
            Corner::BottomRight => Point::new(bounds.max_x, bounds.max_y),
        }
    }
}

/// A placed image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    pub meta: ElementMeta,
    pub position: Point,
    /// Base width before `scale`
    pub width: f32,
    /// Base height before `scale`
    pub height: f32,
    pub uri: String,
    pub scale: f32,
}

impl ImageElement {
    pub fn id(&self) -> ElementId {
        self.meta.id
    }

    pub fn displayed_size(&self) -> (f32, f32) {
        (self.width * self.scale, self.height * self.scale)
    }

    /// Width over height; `None` when a side or the scale is empty or not finite.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        (valid(self.width) && valid(self.height) && valid(self.scale))
            .then(|| self.width / self.height)
    }

    pub fn bounds(&self) -> Bounds {
        let (w, h) = self.displayed_size();
        Bounds::from_origin_size(self.position, w, h)
    }
}

// ============================================================================
// Borrowed views
// ============================================================================

/// A borrowed element of any kind, in paint order.
#[derive(Clone, Copy, Debug)]
pub enum ElementRef<'a> {
    Stroke(&'a StrokeElement),
    Text(&'a TextElement),
    Image(&'a ImageElement),
}

impl ElementRef<'_> {
    pub fn id(&self) -> ElementId {
        match self {
            ElementRef::Stroke(s) => s.id(),
            ElementRef::Text(t) => t.id(),
            ElementRef::Image(i) => i.id(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Stroke(_) => ElementKind::Stroke,
            ElementRef::Text(_) => ElementKind::Text,
            ElementRef::Image(_) => ElementKind::Image,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            ElementRef::Stroke(s) => s.bounds(),
            ElementRef::Text(t) => t.bounds(),
            ElementRef::Image(i) => i.bounds(),
        }
    }
}

/// Tool currently active on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Pan,
    Text,
    Draw,
}

impl ToolMode {
    /// Whether elements can be selected while this tool is active.
    pub fn supports_selection(&self) -> bool {
        matches!(self, ToolMode::Pan | ToolMode::Text)
    }
}
