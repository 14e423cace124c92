use crate::scene::Scene;
use crate::types::{
    BrushKind, ElementKind, ElementMeta, ImageElement, Point, SamplePoint, StrokeElement,
    TextElement, TextStyle,
};
use crate::wire::IdPolicy;
use crate::wire::element::{
    ImagePayload, StrokePayload, TextPayload, WireElement, WirePoint, WirePosition, WireTextStyle,
};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Serialize a scene in paint order, followed by pass-through elements.
pub fn to_wire(scene: &Scene, policy: IdPolicy) -> Vec<Value> {
    crate::profile_scope!("wire::to_wire");
    let mut out = Vec::with_capacity(scene.len() + scene.passthrough().len());

    for (index, stroke) in scene.strokes().iter().enumerate() {
        let payload = StrokePayload {
            points: stroke
                .points
                .iter()
                .map(|p| WirePoint {
                    x: p.x,
                    y: p.y,
                    pressure: p.pressure,
                    tilt: p.tilt,
                })
                .collect(),
            color: stroke.color.clone(),
            brush_size: stroke.width,
            brush_type: stroke.brush.as_str().to_string(),
        };
        out.push(element(ElementKind::Stroke, index, &stroke.meta, policy, &payload));
    }

    for (index, text) in scene.texts().iter().enumerate() {
        let payload = TextPayload {
            content: text.content.clone(),
            position: WirePosition {
                x: text.position.x,
                y: text.position.y,
            },
            font_family: text.style.font_family.clone(),
            font_size: text.style.font_size,
            color: text.style.color.clone(),
            style: WireTextStyle {
                bold: text.style.bold,
                italic: text.style.italic,
                underline: text.style.underline,
            },
            width: Some(text.width),
        };
        out.push(element(ElementKind::Text, index, &text.meta, policy, &payload));
    }

    for (index, image) in scene.images().iter().enumerate() {
        let payload = ImagePayload {
            uri: image.uri.clone(),
            position: WirePosition {
                x: image.position.x,
                y: image.position.y,
            },
            width: image.width,
            height: image.height,
            scale: image.scale,
        };
        out.push(element(ElementKind::Image, index, &image.meta, policy, &payload));
    }

    out.extend(scene.passthrough().iter().cloned());
    out
}

/// Build a scene from a wire element list.
///
/// Elements of unknown type, or whose payload does not decode, are kept
/// verbatim and re-emitted by [`to_wire`].
pub fn from_wire(elements: &[Value]) -> Scene {
    crate::profile_scope!("wire::from_wire");
    let mut scene = Scene::new();

    for value in elements {
        let element: WireElement = match serde_json::from_value(value.clone()) {
            Ok(element) => element,
            Err(e) => {
                warn!(error = %e, "Keeping undecodable element as-is");
                scene.push_passthrough(value.clone());
                continue;
            }
        };

        let Some(kind) = ElementKind::from_tag(&element.kind) else {
            warn!(kind = %element.kind, id = %element.id, "Keeping element of unknown type as-is");
            scene.push_passthrough(value.clone());
            continue;
        };

        let loaded = match kind {
            ElementKind::Stroke => decode::<StrokePayload>(&element).map(|payload| {
                let meta = loaded_meta(&mut scene, &element);
                scene.push_stroke(stroke_from(meta, payload));
            }),
            ElementKind::Text => decode::<TextPayload>(&element).map(|payload| {
                let meta = loaded_meta(&mut scene, &element);
                scene.push_text(text_from(meta, payload));
            }),
            ElementKind::Image => decode::<ImagePayload>(&element).map(|payload| {
                let meta = loaded_meta(&mut scene, &element);
                scene.push_image(image_from(meta, payload));
            }),
        };

        if loaded.is_none() {
            scene.push_passthrough(value.clone());
        }
    }

    scene.reindex();
    debug!(
        strokes = scene.stroke_count(),
        texts = scene.text_count(),
        images = scene.image_count(),
        passthrough = scene.passthrough().len(),
        "Scene decoded"
    );
    scene
}

fn element<T: Serialize>(
    kind: ElementKind,
    index: usize,
    meta: &ElementMeta,
    policy: IdPolicy,
    payload: &T,
) -> Value {
    let id = match policy {
        IdPolicy::Regenerate => format!("{}-{}", kind.as_str(), index),
        IdPolicy::Preserve => meta
            .wire_id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", kind.as_str(), meta.uid)),
    };
    let wire = WireElement {
        id,
        kind: kind.as_str().to_string(),
        data: encode(payload),
        created_at: Some(meta.created_at),
        updated_at: Some(meta.updated_at),
    };
    encode(&wire)
}

fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to encode wire value");
        Value::Null
    })
}

fn decode<T: DeserializeOwned>(element: &WireElement) -> Option<T> {
    match serde_json::from_value(element.data.clone()) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(kind = %element.kind, id = %element.id, error = %e, "Keeping element with malformed payload as-is");
            None
        }
    }
}

fn loaded_meta(scene: &mut Scene, element: &WireElement) -> ElementMeta {
    let mut meta = scene.allocate_meta();
    let now = Utc::now();
    meta.wire_id = (!element.id.is_empty()).then(|| element.id.clone());
    meta.created_at = element.created_at.unwrap_or(now);
    meta.updated_at = element.updated_at.unwrap_or(now);
    meta
}

fn stroke_from(meta: ElementMeta, payload: StrokePayload) -> StrokeElement {
    StrokeElement {
        meta,
        points: payload
            .points
            .into_iter()
            .map(|p| SamplePoint::new(p.x, p.y, p.pressure, p.tilt))
            .collect(),
        color: payload.color,
        width: payload.brush_size,
        brush: BrushKind::from_name(&payload.brush_type),
    }
}

fn text_from(meta: ElementMeta, payload: TextPayload) -> TextElement {
    let mut text = TextElement::new(meta, Point::new(payload.position.x, payload.position.y));
    text.content = payload.content;
    text.style = TextStyle {
        font_family: payload.font_family,
        font_size: payload.font_size,
        color: payload.color,
        bold: payload.style.bold,
        italic: payload.style.italic,
        underline: payload.style.underline,
    };
    if let Some(width) = payload.width {
        text.width = width;
    }
    text
}

fn image_from(meta: ElementMeta, payload: ImagePayload) -> ImageElement {
    ImageElement {
        meta,
        position: Point::new(payload.position.x, payload.position.y),
        width: payload.width,
        height: payload.height,
        uri: payload.uri,
        scale: payload.scale,
    }
}
