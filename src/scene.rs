//! The canvas scene graph.
//!
//! A [`Scene`] owns every element of one open document in three ordered
//! layers. Paint order is fixed: strokes, then text, then images, each layer in
//! insertion order. Lookups by id never fail loudly: a miss is a silent no-op
//! reported through the return value.

use crate::constants::{
    DEFAULT_IMAGE_POSITION, DEFAULT_IMAGE_WIDTH, MIN_HIT_AREA, MIN_IMAGE_SIZE,
};
use crate::spatial_index::SpatialIndex;
use crate::types::{
    BrushKind, Corner, ElementId, ElementKind, ElementMeta, ElementRef, ImageElement, Point,
    SamplePoint, StrokeElement, TextElement, TextStyleUpdate,
};
use crate::wire::{self, IdPolicy, WireError};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Default)]
pub struct Scene {
    strokes: Vec<StrokeElement>,
    texts: Vec<TextElement>,
    images: Vec<ImageElement>,
    /// Wire elements of unknown type, re-emitted verbatim on save
    passthrough: Vec<Value>,
    /// Strokes popped by `remove_last_stroke`, most recent last
    redo_strokes: Vec<StrokeElement>,
    /// Bounds of text and image elements for hit testing
    index: SpatialIndex,
    next_id: u64,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Strokes
    // ========================================================================

    /// Append a finished stroke. An empty sample sequence adds nothing.
    pub fn add_stroke(
        &mut self,
        points: Vec<SamplePoint>,
        color: impl Into<String>,
        width: f32,
        brush: BrushKind,
    ) -> Option<ElementId> {
        if points.is_empty() {
            return None;
        }
        let meta = self.allocate_meta();
        let id = meta.id;
        self.strokes.push(StrokeElement {
            meta,
            points,
            color: color.into(),
            width,
            brush,
        });
        self.redo_strokes.clear();
        self.bump();
        debug!(%id, "Stroke added");
        Some(id)
    }

    /// Pop the most recently added stroke onto the redo stack.
    pub fn remove_last_stroke(&mut self) -> Option<ElementId> {
        let stroke = self.strokes.pop()?;
        let id = stroke.id();
        self.redo_strokes.push(stroke);
        self.bump();
        Some(id)
    }

    /// Re-append the stroke most recently removed by `remove_last_stroke`.
    pub fn redo_stroke(&mut self) -> Option<ElementId> {
        let stroke = self.redo_strokes.pop()?;
        let id = stroke.id();
        self.strokes.push(stroke);
        self.bump();
        Some(id)
    }

    pub fn can_redo_stroke(&self) -> bool {
        !self.redo_strokes.is_empty()
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Create an empty, default-styled text box at canvas position `(x, y)`.
    pub fn add_text(&mut self, x: f32, y: f32) -> ElementId {
        let meta = self.allocate_meta();
        let text = TextElement::new(meta, Point::new(x, y));
        let id = text.id();
        self.index.upsert(id, text.bounds());
        self.texts.push(text);
        self.bump();
        debug!(%id, x, y, "Text added");
        id
    }

    pub fn update_text_content(&mut self, id: ElementId, content: impl Into<String>) -> bool {
        let Some(text) = self.texts.iter_mut().find(|t| t.id() == id) else {
            return false;
        };
        text.content = content.into();
        text.meta.touch();
        let bounds = text.bounds();
        self.index.upsert(id, bounds);
        self.bump();
        true
    }

    pub fn update_text_style(&mut self, id: ElementId, update: TextStyleUpdate) -> bool {
        let Some(text) = self.texts.iter_mut().find(|t| t.id() == id) else {
            return false;
        };
        text.apply_style(update);
        text.meta.touch();
        let bounds = text.bounds();
        self.index.upsert(id, bounds);
        self.bump();
        true
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Place an image at the default position with base width 200 and the
    /// height that keeps the natural aspect ratio.
    pub fn add_image(
        &mut self,
        uri: impl Into<String>,
        natural_width: f32,
        natural_height: f32,
    ) -> ElementId {
        let height = if natural_width > 0.0 && natural_height > 0.0 {
            DEFAULT_IMAGE_WIDTH * natural_height / natural_width
        } else {
            DEFAULT_IMAGE_WIDTH
        };
        let meta = self.allocate_meta();
        let image = ImageElement {
            meta,
            position: Point::new(DEFAULT_IMAGE_POSITION.0, DEFAULT_IMAGE_POSITION.1),
            width: DEFAULT_IMAGE_WIDTH,
            height,
            uri: uri.into(),
            scale: 1.0,
        };
        let id = image.id();
        self.index.upsert(id, image.bounds());
        self.images.push(image);
        self.bump();
        debug!(%id, "Image added");
        id
    }

    /// Resize an image by dragging one of its corners.
    ///
    /// The dominant drag axis drives the size change and the other side follows
    /// the current aspect ratio. The corner opposite the dragged one stays put,
    /// and the smaller side never drops below `MIN_IMAGE_SIZE`. An image with an
    /// empty side has no ratio to keep and is left alone.
    pub fn resize_image(&mut self, id: ElementId, corner: Corner, dx: f32, dy: f32) -> bool {
        let Some(image) = self.images.iter_mut().find(|i| i.id() == id) else {
            return false;
        };

        let Some(ratio) = image.aspect_ratio() else {
            warn!(
                %id,
                width = image.width,
                height = image.height,
                "Degenerate image not resized"
            );
            return false;
        };
        let (sx, sy) = corner.to_signs();
        let (w, h) = image.displayed_size();

        let (mut new_w, mut new_h) = if dx.abs() >= dy.abs() {
            let nw = w + sx * dx;
            (nw, nw / ratio)
        } else {
            let nh = h + sy * dy;
            (nh * ratio, nh)
        };

        if ratio >= 1.0 {
            if !(new_h >= MIN_IMAGE_SIZE) {
                new_h = MIN_IMAGE_SIZE;
                new_w = new_h * ratio;
            }
        } else if !(new_w >= MIN_IMAGE_SIZE) {
            new_w = MIN_IMAGE_SIZE;
            new_h = new_w / ratio;
        }

        let old = image.bounds();
        if sx < 0.0 {
            image.position.x = old.max_x - new_w;
        }
        if sy < 0.0 {
            image.position.y = old.max_y - new_h;
        }
        image.width = new_w / image.scale;
        image.height = new_h / image.scale;
        image.meta.touch();

        let bounds = image.bounds();
        self.index.upsert(id, bounds);
        self.bump();
        true
    }

    // ========================================================================
    // Any element
    // ========================================================================

    /// Translate an element by `(dx, dy)` canvas units.
    pub fn move_element(&mut self, id: ElementId, dx: f32, dy: f32) -> bool {
        if let Some(text) = self.texts.iter_mut().find(|t| t.id() == id) {
            text.position = text.position.offset(dx, dy);
            text.meta.touch();
            let bounds = text.bounds();
            self.index.upsert(id, bounds);
        } else if let Some(image) = self.images.iter_mut().find(|i| i.id() == id) {
            image.position = image.position.offset(dx, dy);
            image.meta.touch();
            let bounds = image.bounds();
            self.index.upsert(id, bounds);
        } else if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id() == id) {
            for p in &mut stroke.points {
                p.x += dx;
                p.y += dy;
            }
            stroke.meta.touch();
        } else {
            return false;
        }
        self.bump();
        true
    }

    /// Remove any element regardless of kind.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let removed = if let Some(pos) = self.strokes.iter().position(|s| s.id() == id) {
            self.strokes.remove(pos);
            true
        } else if let Some(pos) = self.texts.iter().position(|t| t.id() == id) {
            self.texts.remove(pos);
            true
        } else if let Some(pos) = self.images.iter().position(|i| i.id() == id) {
            self.images.remove(pos);
            true
        } else {
            false
        };

        if removed {
            self.index.remove(id);
            self.bump();
            debug!(%id, "Element removed");
        }
        removed
    }

    /// Drop every element, the pass-through list and the redo stack.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.texts.clear();
        self.images.clear();
        self.passthrough.clear();
        self.redo_strokes.clear();
        self.index.clear();
        self.bump();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.stroke(id)
            .map(ElementRef::Stroke)
            .or_else(|| self.text(id).map(ElementRef::Text))
            .or_else(|| self.image(id).map(ElementRef::Image))
    }

    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.element(id).map(|e| e.kind())
    }

    pub fn stroke(&self, id: ElementId) -> Option<&StrokeElement> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    pub fn text(&self, id: ElementId) -> Option<&TextElement> {
        self.texts.iter().find(|t| t.id() == id)
    }

    pub fn image(&self, id: ElementId) -> Option<&ImageElement> {
        self.images.iter().find(|i| i.id() == id)
    }

    pub fn strokes(&self) -> &[StrokeElement] {
        &self.strokes
    }

    pub fn texts(&self) -> &[TextElement] {
        &self.texts
    }

    pub fn images(&self) -> &[ImageElement] {
        &self.images
    }

    pub fn passthrough(&self) -> &[Value] {
        &self.passthrough
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of known elements; pass-through entries are not counted.
    pub fn len(&self) -> usize {
        self.strokes.len() + self.texts.len() + self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every element bottom to top.
    pub fn paint_order(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.strokes
            .iter()
            .map(ElementRef::Stroke)
            .chain(self.texts.iter().map(ElementRef::Text))
            .chain(self.images.iter().map(ElementRef::Image))
    }

    /// Topmost text or image under a canvas point.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        crate::profile_scope!("scene::hit_test");
        self.index
            .query_point(point, MIN_HIT_AREA)
            .into_iter()
            .filter_map(|id| self.layer_position(id).map(|rank| (rank, id)))
            .max_by_key(|(rank, _)| *rank)
            .map(|(_, id)| id)
    }

    /// Incremented on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Wire element list for the persistence service.
    pub fn to_serializable(&self, policy: IdPolicy) -> Vec<Value> {
        wire::to_wire(self, policy)
    }

    /// Rebuild a scene from a wire element list.
    pub fn from_serializable(elements: &[Value]) -> Self {
        wire::from_wire(elements)
    }

    /// Parse a raw JSON element array.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        let elements: Vec<Value> = serde_json::from_str(json)?;
        Ok(Self::from_serializable(&elements))
    }

    // ========================================================================
    // Loading
    // ========================================================================

    pub(crate) fn allocate_meta(&mut self) -> ElementMeta {
        self.next_id += 1;
        ElementMeta::new(ElementId(self.next_id))
    }

    pub(crate) fn push_stroke(&mut self, stroke: StrokeElement) {
        self.strokes.push(stroke);
        self.bump();
    }

    /// Loader push; call `reindex` once the batch is in.
    pub(crate) fn push_text(&mut self, text: TextElement) {
        self.texts.push(text);
        self.bump();
    }

    pub(crate) fn push_image(&mut self, image: ImageElement) {
        self.images.push(image);
        self.bump();
    }

    pub(crate) fn push_passthrough(&mut self, value: Value) {
        self.passthrough.push(value);
        self.bump();
    }

    /// Bulk-load the hit-test index from the current text and image layers.
    pub(crate) fn reindex(&mut self) {
        let texts = self.texts.iter().map(|t| (t.id(), t.bounds()));
        let images = self.images.iter().map(|i| (i.id(), i.bounds()));
        self.index.rebuild(texts.chain(images));
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// (layer, index within layer) for hit-test ordering.
    fn layer_position(&self, id: ElementId) -> Option<(u8, usize)> {
        if let Some(pos) = self.images.iter().position(|i| i.id() == id) {
            return Some((1, pos));
        }
        self.texts.iter().position(|t| t.id() == id).map(|pos| (0, pos))
    }
}
