//! Scene to wire and back.

use crate::helpers::TestSceneBuilder;
use notecanvas::Scene;
use notecanvas::types::{BrushKind, Corner, Point, SamplePoint, TextStyleUpdate};
use notecanvas::wire::{Document, IdPolicy};
use serde_json::{Value, json};

fn round_trip(scene: &Scene, policy: IdPolicy) -> Scene {
    Scene::from_serializable(&scene.to_serializable(policy))
}

#[test]
fn test_round_trip_preserves_elements() {
    let mut scene = TestSceneBuilder::new()
        .with_text("first", (10.0, 20.0))
        .with_text("second", (400.0, 20.0))
        .with_image("file:///wide.png", (300.0, 150.0))
        .build();
    scene.add_stroke(
        vec![
            SamplePoint::new(0.0, 0.0, 0.2, 15.0),
            SamplePoint::new(4.5, 6.25, 0.9, -10.0),
        ],
        "#112233",
        6.0,
        BrushKind::Highlighter,
    );
    let text = scene.texts()[1].id();
    scene.update_text_style(text, TextStyleUpdate::Italic(true));
    scene.update_text_style(text, TextStyleUpdate::FontFamily("Georgia".into()));
    scene.update_text_style(text, TextStyleUpdate::Width(320.0));
    let image = scene.images()[0].id();
    scene.resize_image(image, Corner::BottomRight, 100.0, 0.0);

    let restored = round_trip(&scene, IdPolicy::Regenerate);

    assert_eq!(restored.stroke_count(), 1);
    assert_eq!(restored.text_count(), 2);
    assert_eq!(restored.image_count(), 1);

    let stroke = &restored.strokes()[0];
    assert_eq!(stroke.points, scene.strokes()[0].points);
    assert_eq!(stroke.color, "#112233");
    assert_eq!(stroke.width, 6.0);
    assert_eq!(stroke.brush, BrushKind::Highlighter);

    for (before, after) in scene.texts().iter().zip(restored.texts()) {
        assert_eq!(after.content, before.content);
        assert_eq!(after.position, before.position);
        assert_eq!(after.style, before.style);
        assert_eq!(after.width, before.width);
    }

    let (before, after) = (&scene.images()[0], &restored.images()[0]);
    assert_eq!(after.position, before.position);
    assert_eq!(after.displayed_size(), before.displayed_size());
    assert_eq!(after.uri, "file:///wide.png");

    // Loaded elements are hit-testable
    assert_eq!(restored.hit_test(Point::new(15.0, 25.0)), Some(restored.texts()[0].id()));
    assert_eq!(restored.hit_test(Point::new(100.0, 100.0)), Some(after.id()));
}

#[test]
fn test_round_trip_keeps_timestamps() {
    let elements = vec![json!({
        "id": "text-0",
        "type": "text",
        "data": { "content": "dated" },
        "created_at": "2023-05-06T07:08:09Z",
        "updated_at": "2023-05-07T07:08:09Z"
    })];
    let scene = Scene::from_serializable(&elements);
    let out = scene.to_serializable(IdPolicy::Regenerate);

    let restored = Scene::from_serializable(&out);
    let meta = &restored.texts()[0].meta;
    assert_eq!(meta.created_at.to_rfc3339(), "2023-05-06T07:08:09+00:00");
    assert_eq!(meta.updated_at.to_rfc3339(), "2023-05-07T07:08:09+00:00");
}

#[test]
fn test_unknown_and_malformed_elements_survive_a_save() {
    let sticky = json!({ "id": "sticky-1", "type": "sticky", "data": { "note": "keep me" } });
    let broken = json!({ "id": "stroke-9", "type": "stroke", "data": { "points": "nope" } });
    let untyped = json!({ "data": {} });
    let elements = vec![
        sticky.clone(),
        json!({ "type": "text", "data": { "content": "ok" } }),
        broken.clone(),
        untyped.clone(),
    ];

    let scene = Scene::from_serializable(&elements);
    assert_eq!(scene.text_count(), 1);
    assert_eq!(scene.stroke_count(), 0);
    assert_eq!(scene.passthrough().len(), 3);

    let out = scene.to_serializable(IdPolicy::Regenerate);
    assert_eq!(out.len(), 4);
    assert_eq!(&out[1..], &[sticky, broken, untyped]);
}

#[test]
fn test_document_elements_rebuild_scene() {
    let doc = Document::from_json(
        r#"{
            "id": "c1",
            "title": "Board",
            "elements": [
                { "id": "stroke-0", "type": "stroke", "data": { "points": [{ "x": 1, "y": 1 }] } },
                { "id": "image-0", "type": "image", "data": { "uri": "u", "width": 50, "height": 25, "scale": 2 } }
            ]
        }"#,
    )
    .unwrap();

    let scene = Scene::from_serializable(&doc.elements);
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.images()[0].displayed_size(), (100.0, 50.0));

    let out: Vec<Value> = round_trip(&scene, IdPolicy::Preserve).to_serializable(IdPolicy::Preserve);
    assert_eq!(out[0]["id"], "stroke-0");
    assert_eq!(out[1]["id"], "image-0");
    assert_eq!(out[1]["data"]["scale"], 2.0);
}
