//! Deferred, coalesced scene-to-wire flushes.
//!
//! Committed gestures only raise a request flag. The owner polls once per
//! event-loop turn and serializes at most once however many requests arrived.

/// Dirty-flag scheduler for scene flushes.
#[derive(Debug, Default)]
pub struct FlushScheduler {
    requested: bool,
    /// Scene revision captured by the last flush
    flushed_revision: Option<u64>,
    flush_count: u64,
}

impl FlushScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a flush on the next poll.
    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn is_pending(&self) -> bool {
        self.requested
    }

    /// Consume a pending request. Returns true when the caller should flush
    /// now: a request is pending and the scene moved since the last flush.
    pub fn poll(&mut self, scene_revision: u64) -> bool {
        if !std::mem::take(&mut self.requested) {
            return false;
        }
        if self.flushed_revision == Some(scene_revision) {
            return false;
        }
        self.flushed_revision = Some(scene_revision);
        self.flush_count += 1;
        true
    }

    /// Record a flush performed outside `poll` (load, explicit save).
    pub fn mark_flushed(&mut self, scene_revision: u64) {
        self.requested = false;
        self.flushed_revision = Some(scene_revision);
    }

    /// Number of flushes granted by `poll`.
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }
}
