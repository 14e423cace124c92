//! Spatial Index Module
//!
//! R-tree over the bounding boxes of text and image elements so the gesture
//! router can resolve taps without scanning the whole scene.

use crate::geometry::Bounds;
use crate::types::{ElementId, Point};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A spatial entry representing one element's bounding box.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub id: ElementId,
    pub bounds: Bounds,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min_x, self.bounds.min_y],
            [self.bounds.max_x, self.bounds.max_y],
        )
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Spatial index keyed by element id.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<ElementId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `id`.
    pub fn upsert(&mut self, id: ElementId, bounds: Bounds) {
        self.remove(id);
        if bounds.is_empty() {
            return;
        }
        let entry = SpatialEntry { id, bounds };
        self.tree.insert(entry);
        self.entries.insert(id, entry);
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                self.tree.remove(&entry);
                true
            }
            None => false,
        }
    }

    /// Ids whose bounds, grown by `margin`, contain `p`. Order is unspecified.
    pub fn query_point(&self, p: Point, margin: f32) -> Vec<ElementId> {
        let envelope = AABB::from_corners([p.x - margin, p.y - margin], [p.x + margin, p.y + margin]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.bounds.expand(margin).contains(p))
            .map(|entry| entry.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the whole index in one bulk load.
    pub fn rebuild(&mut self, items: impl IntoIterator<Item = (ElementId, Bounds)>) {
        let entries: Vec<SpatialEntry> = items
            .into_iter()
            .filter(|(_, bounds)| !bounds.is_empty())
            .map(|(id, bounds)| SpatialEntry { id, bounds })
            .collect();
        self.entries = entries.iter().map(|e| (e.id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}
