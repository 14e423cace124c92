//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestSceneBuilder` - Builder pattern for creating test scenes
//! - Gesture helpers like `tap()` and `drag()`
//! - `MemoryPersistence` - In-memory persistence service
//! - `wait_for()` - Polls a session until a condition holds

#![allow(dead_code)]

use notecanvas::error::{ApiError, ApiResult};
use notecanvas::input::{GestureOutcome, GestureRouter};
use notecanvas::persistence::{AttachmentUpload, PersistenceService};
use notecanvas::settings::Settings;
use notecanvas::types::{BrushKind, SamplePoint};
use notecanvas::wire::{Answer, AttachmentRef, Document, DocumentUpdate, NewDocument, Question};
use notecanvas::{CanvasSession, Scene};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

// ============================================================================
// TestSceneBuilder - Builder pattern for creating test scenes
// ============================================================================

/// Builder for creating test scenes.
///
/// # Example
/// ```ignore
/// let scene = TestSceneBuilder::new()
///     .with_text("First note", (0.0, 0.0))
///     .with_image("a.png", (400.0, 300.0))
///     .with_line(&[(0.0, 0.0), (10.0, 0.0)])
///     .build();
/// ```
#[derive(Default)]
pub struct TestSceneBuilder {
    texts: Vec<(String, (f32, f32))>,
    images: Vec<(String, (f32, f32))>,
    strokes: Vec<Vec<(f32, f32)>>,
}

impl TestSceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text element with content at a canvas position.
    pub fn with_text(mut self, content: impl Into<String>, pos: (f32, f32)) -> Self {
        self.texts.push((content.into(), pos));
        self
    }

    /// Add an image with the given natural size at the default position.
    pub fn with_image(mut self, uri: impl Into<String>, natural: (f32, f32)) -> Self {
        self.images.push((uri.into(), natural));
        self
    }

    /// Add a black pen stroke through the given points.
    pub fn with_line(mut self, points: &[(f32, f32)]) -> Self {
        self.strokes.push(points.to_vec());
        self
    }

    pub fn build(self) -> Scene {
        let mut scene = Scene::new();
        for points in self.strokes {
            scene.add_stroke(
                points.iter().map(|&(x, y)| SamplePoint::at(x, y)).collect(),
                "#000000",
                2.0,
                BrushKind::Pen,
            );
        }
        for (content, (x, y)) in self.texts {
            let id = scene.add_text(x, y);
            scene.update_text_content(id, content);
        }
        for (uri, (w, h)) in self.images {
            scene.add_image(uri, w, h);
        }
        scene
    }
}

// ============================================================================
// Gestures
// ============================================================================

pub fn sample(x: f32, y: f32) -> SamplePoint {
    SamplePoint::at(x, y)
}

/// Press and release at the same screen point.
pub fn tap(router: &mut GestureRouter, scene: &mut Scene, at: (f32, f32)) -> GestureOutcome {
    router.pointer_down(scene, sample(at.0, at.1));
    router.pointer_up(scene, sample(at.0, at.1))
}

/// Press at `from`, move to `to` in `steps` equal moves, release at `to`.
pub fn drag(
    router: &mut GestureRouter,
    scene: &mut Scene,
    from: (f32, f32),
    to: (f32, f32),
    steps: usize,
) -> GestureOutcome {
    router.pointer_down(scene, sample(from.0, from.1));
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        router.pointer_move(scene, sample(x, y));
    }
    router.pointer_up(scene, sample(to.0, to.1))
}

// ============================================================================
// In-memory persistence
// ============================================================================

/// Persistence service backed by a map, with switchable failures.
#[derive(Default)]
pub struct MemoryPersistence {
    documents: Mutex<HashMap<String, Document>>,
    updates: Mutex<Vec<DocumentUpdate>>,
    next_id: AtomicU64,
    fail_updates: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, doc: Document) {
        self.documents.lock().unwrap().insert(doc.id.clone(), doc);
    }

    pub fn stored(&self, id: &str) -> Option<Document> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    pub fn updates(&self) -> Vec<DocumentUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PersistenceService for MemoryPersistence {
    async fn create_document(&self, initial: &NewDocument) -> ApiResult<Document> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let doc = Document {
            id: format!("doc-{n}"),
            title: initial.title.clone(),
            width: initial.width,
            height: initial.height,
            background_color: initial.background_color.clone(),
            created_at: None,
            updated_at: None,
            elements: initial.elements.clone(),
            files: Vec::new(),
            markdown_content: String::new(),
        };
        self.insert(doc.clone());
        Ok(doc)
    }

    async fn get_document(&self, id: &str) -> ApiResult<Document> {
        self.stored(id).ok_or_else(|| ApiError::Status {
            status: 404,
            body: "not found".into(),
        })
    }

    async fn update_document(&self, id: &str, update: &DocumentUpdate) -> ApiResult<Document> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "storage unavailable".into(),
            });
        }
        self.updates.lock().unwrap().push(update.clone());
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .get_mut(id)
            .ok_or_else(|| ApiError::Other(format!("no document {id}")))?;
        doc.title = update.title.clone();
        doc.elements = update.elements.clone();
        Ok(doc.clone())
    }

    async fn upload_attachment(
        &self,
        document_id: &str,
        file: &AttachmentUpload,
    ) -> ApiResult<AttachmentRef> {
        Ok(AttachmentRef {
            id: format!("{document_id}-file"),
            path: format!("/files/{}", file.file_name),
            title: Some(file.title.clone()),
        })
    }

    async fn ask_question(&self, question: &Question) -> ApiResult<Answer> {
        Ok(Answer {
            answer: format!("echo: {}", question.question),
        })
    }
}

// ============================================================================
// Sessions
// ============================================================================

pub fn test_runtime() -> Runtime {
    notecanvas::logging::init("warn");
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

pub fn session_with(runtime: &Runtime, service: Arc<MemoryPersistence>) -> CanvasSession {
    CanvasSession::new(runtime.handle().clone(), service, &Settings::default())
}

/// Poll the session until `condition` holds or `timeout` passes.
pub fn wait_for<F>(session: &mut CanvasSession, mut condition: F, timeout: Duration) -> bool
where
    F: FnMut(&CanvasSession) -> bool,
{
    let start = Instant::now();
    while start.elapsed() < timeout {
        session.poll();
        if condition(session) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    session.poll();
    condition(session)
}

/// Poll until no persistence call is in flight.
pub fn settle(session: &mut CanvasSession) -> bool {
    wait_for(session, |s| !s.is_busy(), Duration::from_secs(2))
}

/// A stored document with one element of each kind.
pub fn sample_document(id: &str) -> Document {
    let elements: Vec<Value> = vec![
        json!({
            "id": "stroke-0",
            "type": "stroke",
            "data": { "points": [{ "x": 0, "y": 0 }, { "x": 10, "y": 5 }] }
        }),
        json!({
            "id": "text-0",
            "type": "text",
            "data": { "content": "hello", "position": { "x": 300, "y": 300 } }
        }),
        json!({
            "id": "image-0",
            "type": "image",
            "data": { "uri": "file:///a.png", "position": { "x": 50, "y": 50 }, "width": 200, "height": 100 }
        }),
    ];
    Document {
        id: id.to_string(),
        title: "Sample".into(),
        width: 1024,
        height: 768,
        background_color: "#ffffff".into(),
        created_at: None,
        updated_at: None,
        elements,
        files: Vec::new(),
        markdown_content: String::new(),
    }
}
