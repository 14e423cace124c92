//! Application-wide constants.
//!
//! Centralizes magic numbers used by the scene graph, the gesture router and
//! the wire adapter.

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum viewport zoom level
pub const MIN_ZOOM: f32 = 1.0;

/// Maximum viewport zoom level
pub const MAX_ZOOM: f32 = 3.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f32 = 1.0;

// ============================================================================
// Stroke Smoothing
// ============================================================================

/// Neighbors on each side that take part in the moving average
pub const SMOOTHING_WINDOW: usize = 1;

/// Weight given to the neighborhood average when blending with the raw sample
pub const SMOOTHING_BLEND: f32 = 0.3;

/// Strokes shorter than this are rendered unsmoothed
pub const MIN_SMOOTHING_POINTS: usize = 3;

// ============================================================================
// Gestures
// ============================================================================

/// Pointer travel (screen units) below which a press still counts as a tap
pub const TAP_SLOP: f32 = 6.0;

/// Hit radius (screen units) around an image corner handle
pub const HANDLE_HIT_RADIUS: f32 = 24.0;

/// Minimum hit area around text and image bounds (canvas units)
pub const MIN_HIT_AREA: f32 = 4.0;

// ============================================================================
// Element Defaults
// ============================================================================

/// Default stroke color
pub const DEFAULT_STROKE_COLOR: &str = "#000000";

/// Default stroke width
pub const DEFAULT_BRUSH_SIZE: f32 = 2.0;

/// Default pen pressure for samples that carry none
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Default pen tilt for samples that carry none
pub const DEFAULT_TILT: f32 = 0.0;

/// Default font family for text boxes
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Default font size for text boxes
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Default text color
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Default text box container width
pub const DEFAULT_TEXT_WIDTH: f32 = 200.0;

/// Line height as a multiple of the font size
pub const TEXT_LINE_HEIGHT: f32 = 1.2;

/// Base width of a newly inserted image
pub const DEFAULT_IMAGE_WIDTH: f32 = 200.0;

/// Image size used when the wire payload carries none
pub const DEFAULT_IMAGE_SIZE: (f32, f32) = (200.0, 200.0);

/// Where newly inserted images land on the canvas
pub const DEFAULT_IMAGE_POSITION: (f32, f32) = (50.0, 50.0);

/// Smallest side an image can be resized down to
pub const MIN_IMAGE_SIZE: f32 = 20.0;

// ============================================================================
// Document Defaults
// ============================================================================

/// Canvas width used when a document carries none
pub const DEFAULT_CANVAS_WIDTH: u32 = 1024;

/// Canvas height used when a document carries none
pub const DEFAULT_CANVAS_HEIGHT: u32 = 768;

/// Canvas background used when a document carries none
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Title given to documents created without one
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled";

// ============================================================================
// Persistence Service
// ============================================================================

/// Base URL of the persistence service
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001/api";

/// Request timeout for persistence calls
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the configured API base URL
pub const API_URL_ENV: &str = "NOTECANVAS_API_URL";
