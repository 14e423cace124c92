//! Wire shapes of canvas elements.
//!
//! Every optional field carries a serde default so that sparse payloads from
//! older clients still load. An explicit `null` reads the same as a missing
//! field.

use crate::constants::{
    DEFAULT_BRUSH_SIZE, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_IMAGE_SIZE,
    DEFAULT_PRESSURE, DEFAULT_STROKE_COLOR, DEFAULT_TEXT_COLOR,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of a document's `elements` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireElement {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Accept RFC 3339 or naive ISO-8601 timestamps (read as UTC); anything else
/// becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `T::default()` for a `null` field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Generates a field deserializer that maps `null` to the given default.
macro_rules! null_as {
    ($name:ident, $ty:ty, $default:path) => {
        fn $name<'de, D>(deserializer: D) -> Result<$ty, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(Option::<$ty>::deserialize(deserializer)?.unwrap_or_else($default))
        }
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePosition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f32,
}

// ============================================================================
// Stroke
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_pressure", deserialize_with = "pressure_or_default")]
    pub pressure: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tilt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: Vec<WirePoint>,
    #[serde(default = "default_stroke_color", deserialize_with = "stroke_color_or_default")]
    pub color: String,
    #[serde(default = "default_brush_size", deserialize_with = "brush_size_or_default")]
    pub brush_size: f32,
    #[serde(default = "default_brush_type", deserialize_with = "brush_type_or_default")]
    pub brush_type: String,
}

null_as!(pressure_or_default, f32, default_pressure);
null_as!(stroke_color_or_default, String, default_stroke_color);
null_as!(brush_size_or_default, f32, default_brush_size);
null_as!(brush_type_or_default, String, default_brush_type);

fn default_pressure() -> f32 {
    DEFAULT_PRESSURE
}

fn default_stroke_color() -> String {
    DEFAULT_STROKE_COLOR.to_string()
}

fn default_brush_size() -> f32 {
    DEFAULT_BRUSH_SIZE
}

fn default_brush_type() -> String {
    "pen".to_string()
}

// ============================================================================
// Text
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTextStyle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bold: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub italic: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: WirePosition,
    #[serde(default = "default_font_family", deserialize_with = "font_family_or_default")]
    pub font_family: String,
    #[serde(default = "default_font_size", deserialize_with = "font_size_or_default")]
    pub font_size: f32,
    #[serde(default = "default_text_color", deserialize_with = "text_color_or_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: WireTextStyle,
    /// Container width; absent in payloads written by older clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

null_as!(font_family_or_default, String, default_font_family);
null_as!(font_size_or_default, f32, default_font_size);
null_as!(text_color_or_default, String, default_text_color);

// ============================================================================
// Image
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: WirePosition,
    #[serde(default = "default_image_width", deserialize_with = "image_width_or_default")]
    pub width: f32,
    #[serde(default = "default_image_height", deserialize_with = "image_height_or_default")]
    pub height: f32,
    #[serde(
        default = "default_scale",
        deserialize_with = "scale_or_default",
        skip_serializing_if = "is_unit_scale"
    )]
    pub scale: f32,
}

fn default_image_width() -> f32 {
    DEFAULT_IMAGE_SIZE.0
}

fn default_image_height() -> f32 {
    DEFAULT_IMAGE_SIZE.1
}

fn default_scale() -> f32 {
    1.0
}

fn is_unit_scale(scale: &f32) -> bool {
    *scale == 1.0
}

null_as!(image_width_or_default, f32, default_image_width);
null_as!(image_height_or_default, f32, default_image_height);
null_as!(scale_or_default, f32, default_scale);
