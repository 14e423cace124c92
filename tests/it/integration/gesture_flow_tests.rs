//! Pointer streams routed through the gesture router into a scene.

use crate::helpers::{TestSceneBuilder, drag, sample, tap};
use notecanvas::Scene;
use notecanvas::input::{GestureOutcome, GestureRouter, Viewport};
use notecanvas::types::{Brush, BrushKind, ElementKind, Point, TextStyleUpdate, ToolMode};

fn router_in(tool: ToolMode) -> GestureRouter {
    let mut router = GestureRouter::default();
    router.set_tool(tool);
    router
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_draw_records_one_stroke_per_stream() {
    let mut scene = Scene::new();
    let mut router = router_in(ToolMode::Draw);

    router.pointer_down(&mut scene, sample(0.0, 0.0));
    router.pointer_move(&mut scene, sample(10.0, 0.0));
    router.pointer_move(&mut scene, sample(20.0, 0.0));
    assert_eq!(router.active_stroke().map(<[_]>::len), Some(3));
    assert!(router.active_stroke_path().unwrap().starts_with("M "));

    let outcome = router.pointer_up(&mut scene, sample(20.0, 0.0));

    assert_eq!(outcome, GestureOutcome::Committed);
    assert_eq!(scene.stroke_count(), 1);
    let xs: Vec<f32> = scene.strokes()[0].points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 10.0, 20.0]);
    assert!(router.state().is_idle());
}

#[test]
fn test_stroke_uses_current_brush_and_canvas_space() {
    let mut scene = Scene::new();
    let mut router = router_in(ToolMode::Draw);
    router.set_brush(Brush {
        color: "#ff0000".into(),
        width: 8.0,
        kind: BrushKind::Marker,
    });
    router.set_viewport(Viewport {
        offset: Point::new(100.0, 50.0),
        zoom: 2.0,
    });

    drag(&mut router, &mut scene, (100.0, 50.0), (140.0, 90.0), 2);

    let stroke = &scene.strokes()[0];
    assert_eq!(stroke.color, "#ff0000");
    assert_eq!(stroke.width, 8.0);
    assert_eq!(stroke.brush, BrushKind::Marker);
    assert_eq!(stroke.points[0].position(), Point::new(0.0, 0.0));
    assert_eq!(stroke.points.last().unwrap().position(), Point::new(20.0, 20.0));
}

#[test]
fn test_tool_switch_discards_recording() {
    let mut scene = TestSceneBuilder::new().with_line(&[(0.0, 0.0), (5.0, 5.0)]).build();
    let mut router = router_in(ToolMode::Draw);

    router.pointer_down(&mut scene, sample(100.0, 100.0));
    router.pointer_move(&mut scene, sample(120.0, 110.0));
    router.set_tool(ToolMode::Pan);
    let outcome = router.pointer_up(&mut scene, sample(130.0, 120.0));

    assert_eq!(outcome, GestureOutcome::None);
    assert_eq!(scene.stroke_count(), 1);
    assert!(router.active_stroke().is_none());
}

#[test]
fn test_cancel_discards_recording() {
    let mut scene = Scene::new();
    let mut router = router_in(ToolMode::Draw);
    router.pointer_down(&mut scene, sample(0.0, 0.0));
    router.pointer_move(&mut scene, sample(10.0, 10.0));

    assert_eq!(router.pointer_cancel(), GestureOutcome::None);
    assert_eq!(scene.stroke_count(), 0);
}

#[test]
fn test_second_pointer_is_ignored_while_recording() {
    let mut scene = Scene::new();
    let mut router = router_in(ToolMode::Draw);
    router.pointer_down(&mut scene, sample(0.0, 0.0));
    router.pointer_down(&mut scene, sample(500.0, 500.0));
    router.pointer_up(&mut scene, sample(0.0, 0.0));

    assert_eq!(scene.stroke_count(), 1);
    assert_eq!(scene.strokes()[0].points.len(), 1);
}

// ============================================================================
// Images
// ============================================================================

#[test]
fn test_corner_handle_resize_keeps_aspect_ratio() {
    let mut scene = TestSceneBuilder::new().with_image("file:///sq.png", (200.0, 200.0)).build();
    let id = scene.images()[0].id();
    let mut router = GestureRouter::default();

    assert_eq!(tap(&mut router, &mut scene, (150.0, 150.0)), GestureOutcome::SelectionChanged);
    assert_eq!(router.selection(), Some(id));

    // Bottom-right corner sits at (250, 250)
    let outcome = drag(&mut router, &mut scene, (250.0, 250.0), (270.0, 270.0), 4);

    assert_eq!(outcome, GestureOutcome::Committed);
    let image = scene.image(id).unwrap();
    let (w, h) = image.displayed_size();
    assert!(w > 200.0 && h > 200.0);
    assert!((w / h - 1.0).abs() < 0.01, "ratio drifted: {w}x{h}");
    assert_eq!(image.position, Point::new(50.0, 50.0));
}

#[test]
fn test_handles_require_selection() {
    let mut scene = TestSceneBuilder::new().with_image("file:///sq.png", (200.0, 200.0)).build();
    let id = scene.images()[0].id();
    let mut router = GestureRouter::default();

    // Unselected: pressing the corner drags the image body instead
    drag(&mut router, &mut scene, (248.0, 248.0), (268.0, 268.0), 4);

    let image = scene.image(id).unwrap();
    assert_eq!(image.displayed_size(), (200.0, 200.0));
    assert_eq!(image.position, Point::new(70.0, 70.0));
    assert_eq!(router.selection(), Some(id));
}

#[test]
fn test_drag_moves_element_in_canvas_units() {
    let mut scene = TestSceneBuilder::new().with_text("drag me", (0.0, 0.0)).build();
    let id = scene.texts()[0].id();
    let mut router = GestureRouter::default();
    router.set_viewport(Viewport {
        offset: Point::default(),
        zoom: 2.0,
    });

    let outcome = drag(&mut router, &mut scene, (20.0, 10.0), (60.0, 30.0), 5);

    assert_eq!(outcome, GestureOutcome::Committed);
    assert_eq!(scene.text(id).unwrap().position, Point::new(20.0, 10.0));
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_background_drag_pans_viewport() {
    let mut scene = Scene::new();
    let mut router = GestureRouter::default();

    // Released where the last move ended: nothing left to pan
    let outcome = drag(&mut router, &mut scene, (100.0, 100.0), (130.0, 80.0), 2);

    assert_eq!(outcome, GestureOutcome::None);
    assert_eq!(router.viewport().offset, Point::new(30.0, -20.0));
    assert!(scene.is_empty());
}

#[test]
fn test_pan_release_applies_final_delta() {
    let mut scene = Scene::new();
    let mut router = GestureRouter::default();

    router.pointer_down(&mut scene, sample(100.0, 100.0));
    assert_eq!(
        router.pointer_move(&mut scene, sample(120.0, 100.0)),
        GestureOutcome::ViewportChanged
    );
    let outcome = router.pointer_up(&mut scene, sample(140.0, 110.0));

    assert_eq!(outcome, GestureOutcome::ViewportChanged);
    assert_eq!(router.viewport().offset, Point::new(40.0, 10.0));
    assert!(router.state().is_idle());
}

#[test]
fn test_set_viewport_rejects_non_finite_zoom() {
    let mut scene = TestSceneBuilder::new().with_text("note", (0.0, 0.0)).build();
    let id = scene.texts()[0].id();
    let mut router = GestureRouter::default();

    router.set_viewport(Viewport {
        offset: Point::new(10.0, 10.0),
        zoom: f32::INFINITY,
    });
    assert_eq!(router.viewport().zoom, 1.0);
    assert_eq!(router.viewport().offset, Point::new(10.0, 10.0));

    router.set_viewport(Viewport {
        offset: Point::default(),
        zoom: f32::NAN,
    });
    assert_eq!(router.viewport().zoom, 1.0);

    // Hit testing still maps screen to canvas
    assert_eq!(tap(&mut router, &mut scene, (5.0, 5.0)), GestureOutcome::SelectionChanged);
    assert_eq!(router.selection(), Some(id));
}

#[test]
fn test_pinch_zoom_is_clamped() {
    let mut scene = Scene::new();
    let mut router = GestureRouter::default();

    router.pinch_begin();
    assert_eq!(router.pinch_update(2.0), GestureOutcome::ViewportChanged);
    assert_eq!(router.viewport().zoom, 2.0);
    router.pinch_update(10.0);
    assert_eq!(router.viewport().zoom, 3.0);
    router.pinch_update(0.1);
    assert_eq!(router.viewport().zoom, 1.0);

    // Single-pointer input waits for the pinch to end
    assert_eq!(router.pointer_down(&mut scene, sample(0.0, 0.0)), GestureOutcome::None);
    router.pinch_end();
    assert!(router.state().is_idle());
}

#[test]
fn test_pinch_only_in_pan_mode() {
    let mut router = router_in(ToolMode::Draw);
    router.pinch_begin();
    assert_eq!(router.pinch_update(2.0), GestureOutcome::None);
    assert_eq!(router.viewport().zoom, 1.0);
}

// ============================================================================
// Selection & text
// ============================================================================

#[test]
fn test_pan_tap_on_background_clears_selection() {
    let mut scene = TestSceneBuilder::new().with_text("t", (0.0, 0.0)).build();
    let mut router = GestureRouter::default();

    tap(&mut router, &mut scene, (10.0, 5.0));
    assert!(router.selection().is_some());

    assert_eq!(tap(&mut router, &mut scene, (700.0, 700.0)), GestureOutcome::SelectionChanged);
    assert_eq!(router.selection(), None);
}

#[test]
fn test_text_tap_creates_and_selects_text() {
    let mut scene = Scene::new();
    let mut router = router_in(ToolMode::Text);
    assert!(router.tool().supports_selection());

    let outcome = tap(&mut router, &mut scene, (300.0, 400.0));

    assert_eq!(outcome, GestureOutcome::Committed);
    let text = &scene.texts()[0];
    assert_eq!(text.position, Point::new(300.0, 400.0));
    assert_eq!(router.selection(), Some(text.id()));

    assert_eq!(router.edit_selected_text(&mut scene, "hello"), GestureOutcome::Committed);
    assert_eq!(
        router.style_selected_text(&mut scene, TextStyleUpdate::Underline(true)),
        GestureOutcome::Committed
    );
    let text = &scene.texts()[0];
    assert_eq!(text.content, "hello");
    assert!(text.style.underline);
}

#[test]
fn test_text_mode_ignores_images() {
    let mut scene = TestSceneBuilder::new().with_image("file:///i.png", (200.0, 200.0)).build();
    let mut router = router_in(ToolMode::Text);

    let outcome = tap(&mut router, &mut scene, (100.0, 100.0));

    assert_eq!(outcome, GestureOutcome::None);
    assert_eq!(scene.text_count(), 0);
    assert_eq!(router.selection(), None);
}

#[test]
fn test_text_mode_drag_does_nothing() {
    let mut scene = TestSceneBuilder::new().with_text("stay", (0.0, 0.0)).build();
    let id = scene.texts()[0].id();
    let mut router = router_in(ToolMode::Text);

    let outcome = drag(&mut router, &mut scene, (10.0, 5.0), (90.0, 5.0), 4);

    assert_eq!(outcome, GestureOutcome::None);
    assert_eq!(scene.text(id).unwrap().position, Point::new(0.0, 0.0));
    assert_eq!(router.viewport().offset, Point::default());
}

#[test]
fn test_draw_mode_has_no_selection() {
    let mut scene = TestSceneBuilder::new().with_text("t", (0.0, 0.0)).build();
    let mut router = GestureRouter::default();
    tap(&mut router, &mut scene, (10.0, 5.0));

    assert_eq!(router.set_tool(ToolMode::Draw), GestureOutcome::SelectionChanged);
    assert!(!router.tool().supports_selection());
    assert_eq!(router.selection(), None);
}

#[test]
fn test_removing_selected_element_clears_selection() {
    let mut scene = TestSceneBuilder::new().with_text("t", (0.0, 0.0)).build();
    let mut router = GestureRouter::default();
    tap(&mut router, &mut scene, (10.0, 5.0));

    assert_eq!(router.remove_selected(&mut scene), GestureOutcome::Committed);
    assert_eq!(router.selection(), None);
    assert_eq!(scene.text_count(), 0);
    assert!(scene.hit_test(Point::new(10.0, 5.0)).is_none());
    assert!(!scene.paint_order().any(|e| e.kind() == ElementKind::Text));
}
