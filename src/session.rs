//! One open canvas document.
//!
//! A [`CanvasSession`] owns the scene, the gesture router, the document
//! metadata and the cached wire snapshot. Persistence calls run on a tokio
//! runtime; their results come back over a channel and are applied on the
//! owning thread by [`CanvasSession::poll`], which the host calls every frame
//! together with [`CanvasSession::tick`].
//!
//! ## Exit flow
//!
//! ```text
//! Open -> Closed            (request_exit without unsaved changes)
//! Open -> AwaitingChoice    (request_exit with unsaved changes)
//! AwaitingChoice -> Saving  (Save)
//! AwaitingChoice -> Closed  (Discard)
//! AwaitingChoice -> Open    (Cancel)
//! Saving -> Closed | Open   (save confirmed | save failed)
//! ```

use crate::error::{ApiError, ApiResult, SessionError, SessionResult};
use crate::flush::FlushScheduler;
use crate::input::{GestureOutcome, GestureRouter, Viewport};
use crate::notifications::{Alert, Toast, ToastManager};
use crate::perf::{FlushStats, TARGET_FRAME_MS, measure, measure_and_log};
use crate::persistence::{AttachmentUpload, PersistenceService};
use crate::scene::Scene;
use crate::settings::Settings;
use crate::types::{ElementId, SamplePoint, TextStyleUpdate, ToolMode};
use crate::wire::{AttachmentRef, Document, DocumentUpdate, IdPolicy, NewDocument};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// Document fields the scene graph does not own.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    pub id: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub files: Vec<AttachmentRef>,
    pub markdown_content: String,
}

impl DocumentMeta {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            width: doc.width,
            height: doc.height,
            background_color: doc.background_color.clone(),
            files: doc.files.clone(),
            markdown_content: doc.markdown_content.clone(),
        }
    }
}

const UNSAVED_BLOCKS_OPEN: &str = "Save or discard your changes before opening another canvas";

/// Result of a persistence call, delivered to `poll`.
#[derive(Debug)]
pub enum PersistenceEvent {
    Loaded {
        id: String,
        result: ApiResult<Document>,
    },
    Created(ApiResult<Document>),
    Saved {
        /// Document the save was sent for
        id: String,
        /// Scene revision the save was taken from
        revision: u64,
        closing: bool,
        result: ApiResult<Document>,
    },
    AttachmentUploaded(ApiResult<AttachmentRef>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Open,
    /// Unsaved changes; waiting for save, discard or cancel
    AwaitingChoice,
    /// Exit-with-save in flight
    Saving,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitChoice {
    Save,
    Discard,
    Cancel,
}

pub struct CanvasSession {
    runtime: Handle,
    service: Arc<dyn PersistenceService>,
    events_tx: Sender<PersistenceEvent>,
    events_rx: Receiver<PersistenceEvent>,

    document: Option<DocumentMeta>,
    scene: Scene,
    router: GestureRouter,
    id_policy: IdPolicy,

    flush: FlushScheduler,
    flush_stats: FlushStats,
    /// Wire elements as of the last flush
    snapshot: Vec<Value>,
    saved_revision: u64,

    in_flight: usize,
    /// Document id of the load in flight, if any
    loading: Option<String>,
    exit: ExitState,

    toasts: ToastManager,
    alert: Option<Alert>,
}

impl CanvasSession {
    pub fn new(runtime: Handle, service: Arc<dyn PersistenceService>, settings: &Settings) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let scene = Scene::new();
        let saved_revision = scene.revision();
        Self {
            runtime,
            service,
            events_tx,
            events_rx,
            document: None,
            scene,
            router: GestureRouter::new(settings.brush.to_brush()),
            id_policy: settings.canvas.id_policy,
            flush: FlushScheduler::new(),
            flush_stats: FlushStats::default(),
            snapshot: Vec::new(),
            saved_revision,
            in_flight: 0,
            loading: None,
            exit: ExitState::Open,
            toasts: ToastManager::new(),
            alert: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn router(&self) -> &GestureRouter {
        &self.router
    }

    pub fn document(&self) -> Option<&DocumentMeta> {
        self.document.as_ref()
    }

    pub fn snapshot(&self) -> &[Value] {
        &self.snapshot
    }

    pub fn flush_count(&self) -> u64 {
        self.flush.flush_count()
    }

    pub fn flush_stats(&self) -> &FlushStats {
        &self.flush_stats
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastManager {
        &mut self.toasts
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn exit_state(&self) -> ExitState {
        self.exit
    }

    pub fn is_closed(&self) -> bool {
        self.exit == ExitState::Closed
    }

    /// True while any persistence call is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.scene.revision() != self.saved_revision
    }

    /// Whether canvas input is currently accepted.
    pub fn accepts_input(&self) -> bool {
        self.alert.is_none() && self.exit == ExitState::Open
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> SessionResult<()> {
        let doc = self.document.as_mut().ok_or(SessionError::NoDocument)?;
        doc.title = title.into();
        Ok(())
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch a document from the service; applied by a later `poll`.
    pub fn load(&mut self, id: &str) -> SessionResult<()> {
        self.ensure_replaceable()?;
        if self.loading.as_deref() == Some(id) {
            warn!(id, "Load already in flight");
            return Err(SessionError::LoadInFlight(id.to_string()));
        }

        info!(id, "Loading document");
        self.loading = Some(id.to_string());
        let service = Arc::clone(&self.service);
        let id = id.to_string();
        self.spawn(async move {
            let result = service.get_document(&id).await;
            PersistenceEvent::Loaded { id, result }
        });
        Ok(())
    }

    /// Create a new document on the service and open it once confirmed.
    pub fn create(&mut self, title: impl Into<String>) -> SessionResult<()> {
        self.ensure_replaceable()?;
        let initial = NewDocument {
            title: title.into(),
            ..Default::default()
        };
        let service = Arc::clone(&self.service);
        self.spawn(async move { PersistenceEvent::Created(service.create_document(&initial).await) });
        Ok(())
    }

    /// Replace the open document and scene. Clears selection and any gesture.
    pub fn open_document(&mut self, doc: Document) {
        let scene = measure_and_log("decode_scene", TARGET_FRAME_MS, || {
            Scene::from_serializable(&doc.elements)
        });
        info!(
            id = %doc.id,
            elements = scene.len(),
            passthrough = scene.passthrough().len(),
            "Document opened"
        );
        self.document = Some(DocumentMeta::from_document(&doc));
        self.scene = scene;
        self.router.reset();
        self.saved_revision = self.scene.revision();
        self.flush_now();
        self.exit = ExitState::Open;
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Apply finished persistence calls. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Once per event-loop turn: run the coalesced flush and prune toasts.
    pub fn tick(&mut self) {
        if self.flush.poll(self.scene.revision()) {
            self.serialize_snapshot();
        }
        self.toasts.remove_expired();
    }

    /// Ask for a flush on the next `tick`.
    pub fn request_flush(&mut self) {
        self.flush.request();
    }

    fn flush_now(&mut self) {
        self.serialize_snapshot();
        self.flush.mark_flushed(self.scene.revision());
    }

    fn serialize_snapshot(&mut self) {
        let (snapshot, elapsed_ms) = measure(|| self.scene.to_serializable(self.id_policy));
        self.snapshot = snapshot;
        self.flush_stats.record(elapsed_ms);
        if elapsed_ms > TARGET_FRAME_MS {
            warn!(elapsed_ms = format!("{elapsed_ms:.2}"), "Slow scene flush");
        }
        debug!(elements = self.snapshot.len(), "Scene flushed");
    }

    fn apply_event(&mut self, event: PersistenceEvent) {
        match event {
            PersistenceEvent::Loaded { id, result } => {
                if self.loading.as_deref() == Some(id.as_str()) {
                    self.loading = None;
                }
                match result {
                    Ok(doc) if self.holds_unsaved_document() => {
                        warn!(id = %doc.id, "Edited while loading; keeping the open canvas");
                        self.toasts.push(Toast::error(UNSAVED_BLOCKS_OPEN));
                    }
                    Ok(doc) => self.open_document(doc),
                    Err(e) => self.report_failure("Failed to load canvas", &e),
                }
            }
            PersistenceEvent::Created(result) => match result {
                Ok(doc) if self.holds_unsaved_document() => {
                    warn!(id = %doc.id, "Edited while creating; keeping the open canvas");
                    self.toasts.push(Toast::error(UNSAVED_BLOCKS_OPEN));
                }
                Ok(doc) => {
                    self.toasts.push(Toast::success("Canvas created"));
                    self.open_document(doc);
                }
                Err(e) => self.report_failure("Failed to create canvas", &e),
            },
            PersistenceEvent::Saved { id, .. }
                if self.document.as_ref().map(|d| d.id.as_str()) != Some(id.as_str()) =>
            {
                debug!(%id, "Save finished for a document that is no longer open");
            }
            PersistenceEvent::Saved {
                revision,
                closing,
                result,
                ..
            } => match result {
                Ok(_) => {
                    info!(revision, "Document saved");
                    self.saved_revision = revision;
                    self.toasts.push(Toast::success("Canvas saved"));
                    if closing {
                        self.exit = ExitState::Closed;
                    }
                }
                Err(e) => {
                    self.report_failure("Failed to save canvas", &e);
                    if closing {
                        self.exit = ExitState::Open;
                    }
                }
            },
            PersistenceEvent::AttachmentUploaded(result) => match result {
                Ok(file) => {
                    info!(id = %file.id, "Attachment uploaded");
                    if let Some(doc) = self.document.as_mut() {
                        doc.files.push(file);
                    }
                    self.toasts.push(Toast::success("File attached"));
                }
                Err(e) => self.report_failure("Failed to upload file", &e),
            },
        }
    }

    fn report_failure(&mut self, context: &str, err: &ApiError) {
        error!(error = %err, "{context}");
        if err.is_permission_denied() {
            self.alert = Some(Alert::permission_denied("the file"));
        } else {
            self.toasts.push(Toast::error(format!("{context}: {err}")));
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = PersistenceEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            // Receiver gone means the session was dropped
            let _ = tx.send(task.await);
        });
    }

    // ========================================================================
    // Saving & exit
    // ========================================================================

    /// Send the current scene to the service. `thumbnail` is an encoded image
    /// of the rendered canvas.
    pub fn save(&mut self, thumbnail: Option<&[u8]>) -> SessionResult<()> {
        self.ensure_input()?;
        self.spawn_save(thumbnail, false)
    }

    fn spawn_save(&mut self, thumbnail: Option<&[u8]>, closing: bool) -> SessionResult<()> {
        let doc = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let id = doc.id.clone();
        let title = doc.title.clone();

        if self.flush.is_pending() || self.scene.revision() != self.saved_revision {
            self.flush_now();
        }
        let update = DocumentUpdate {
            title,
            elements: self.snapshot.clone(),
            image: thumbnail.map(|bytes| BASE64.encode(bytes)),
        };
        let revision = self.scene.revision();
        info!(%id, revision, closing, "Saving document");

        let service = Arc::clone(&self.service);
        self.spawn(async move {
            let result = service.update_document(&id, &update).await;
            PersistenceEvent::Saved {
                id,
                revision,
                closing,
                result,
            }
        });
        Ok(())
    }

    /// Start closing the document.
    pub fn request_exit(&mut self) -> ExitState {
        if self.exit != ExitState::Open {
            return self.exit;
        }
        self.router.pointer_cancel();
        self.exit = if self.has_unsaved_changes() {
            ExitState::AwaitingChoice
        } else {
            ExitState::Closed
        };
        debug!(state = ?self.exit, "Exit requested");
        self.exit
    }

    /// Answer the unsaved-changes prompt.
    pub fn resolve_exit(&mut self, choice: ExitChoice) -> SessionResult<ExitState> {
        if self.exit != ExitState::AwaitingChoice {
            return Ok(self.exit);
        }
        match choice {
            ExitChoice::Save => {
                self.exit = ExitState::Saving;
                if let Err(e) = self.spawn_save(None, true) {
                    self.exit = ExitState::AwaitingChoice;
                    return Err(e);
                }
            }
            ExitChoice::Discard => {
                info!("Unsaved changes discarded");
                self.exit = ExitState::Closed;
            }
            ExitChoice::Cancel => self.exit = ExitState::Open,
        }
        Ok(self.exit)
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn set_tool(&mut self, tool: ToolMode) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.set_tool(tool);
        Ok(self.after(outcome))
    }

    pub fn pointer_down(&mut self, sample: SamplePoint) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.pointer_down(&mut self.scene, sample);
        Ok(self.after(outcome))
    }

    pub fn pointer_move(&mut self, sample: SamplePoint) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.pointer_move(&mut self.scene, sample);
        Ok(self.after(outcome))
    }

    pub fn pointer_up(&mut self, sample: SamplePoint) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.pointer_up(&mut self.scene, sample);
        Ok(self.after(outcome))
    }

    pub fn pointer_cancel(&mut self) -> GestureOutcome {
        let outcome = self.router.pointer_cancel();
        self.after(outcome)
    }

    pub fn pinch_begin(&mut self) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        Ok(self.router.pinch_begin())
    }

    pub fn pinch_update(&mut self, scale: f32) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        Ok(self.router.pinch_update(scale))
    }

    pub fn pinch_end(&mut self) -> GestureOutcome {
        self.router.pinch_end()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.router.set_viewport(viewport);
    }

    pub fn edit_selected_text(&mut self, content: &str) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.edit_selected_text(&mut self.scene, content);
        Ok(self.after(outcome))
    }

    pub fn style_selected_text(&mut self, update: TextStyleUpdate) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.style_selected_text(&mut self.scene, update);
        Ok(self.after(outcome))
    }

    pub fn remove_element(&mut self, id: ElementId) -> SessionResult<GestureOutcome> {
        self.ensure_input()?;
        let outcome = self.router.remove_element(&mut self.scene, id);
        Ok(self.after(outcome))
    }

    pub fn undo_stroke(&mut self) -> SessionResult<Option<ElementId>> {
        self.ensure_input()?;
        let removed = self.scene.remove_last_stroke();
        if removed.is_some() {
            self.flush.request();
        }
        Ok(removed)
    }

    pub fn redo_stroke(&mut self) -> SessionResult<Option<ElementId>> {
        self.ensure_input()?;
        let restored = self.scene.redo_stroke();
        if restored.is_some() {
            self.flush.request();
        }
        Ok(restored)
    }

    /// Insert an image whose natural size is already known.
    pub fn add_image(
        &mut self,
        uri: impl Into<String>,
        natural_width: f32,
        natural_height: f32,
    ) -> SessionResult<ElementId> {
        self.ensure_input()?;
        let id = self.scene.add_image(uri, natural_width, natural_height);
        self.flush.request();
        Ok(id)
    }

    /// Insert an image from disk, probing its natural size. A denied read
    /// raises a blocking alert.
    pub fn add_image_from_path(&mut self, path: &Path) -> SessionResult<ElementId> {
        self.ensure_input()?;
        if let Err(e) = std::fs::File::open(path) {
            return Err(self.io_failure("the image", e));
        }
        let (width, height) = image::image_dimensions(path)?;
        let uri = format!("file://{}", path.display());
        self.add_image(uri, width as f32, height as f32)
    }

    /// Upload a file from disk as an attachment of the open document.
    pub fn upload_attachment(&mut self, path: &Path) -> SessionResult<()> {
        self.ensure_input()?;
        let doc_id = self
            .document
            .as_ref()
            .map(|d| d.id.clone())
            .ok_or(SessionError::NoDocument)?;
        let upload = match AttachmentUpload::from_path(path) {
            Ok(upload) => upload,
            Err(e) => return Err(self.io_failure("the file", e)),
        };
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            PersistenceEvent::AttachmentUploaded(service.upload_attachment(&doc_id, &upload).await)
        });
        Ok(())
    }

    fn io_failure(&mut self, what: &str, err: std::io::Error) -> SessionError {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            warn!(error = %err, "Permission denied");
            self.alert = Some(Alert::permission_denied(what));
        } else {
            self.toasts.push(Toast::error(format!("Could not read {what}: {err}")));
        }
        SessionError::Io(err)
    }

    /// Another document may open once the current one is closed or clean.
    fn ensure_replaceable(&self) -> SessionResult<()> {
        if self.alert.is_some()
            || matches!(self.exit, ExitState::AwaitingChoice | ExitState::Saving)
        {
            return Err(SessionError::ModalPending);
        }
        if self.holds_unsaved_document() {
            warn!("Refusing to replace a canvas with unsaved changes");
            return Err(SessionError::UnsavedChanges);
        }
        Ok(())
    }

    /// A discarded document is closed, so its edits no longer count.
    fn holds_unsaved_document(&self) -> bool {
        self.document.is_some() && self.exit != ExitState::Closed && self.has_unsaved_changes()
    }

    fn ensure_input(&self) -> SessionResult<()> {
        if self.accepts_input() {
            Ok(())
        } else {
            Err(SessionError::ModalPending)
        }
    }

    fn after(&mut self, outcome: GestureOutcome) -> GestureOutcome {
        if outcome.is_committed() {
            self.flush.request();
        }
        outcome
    }
}
