use std::sync::Arc;

use super::playback::PlaybackCursor;

// A stream that owns the output. `_handle` is whatever keeps the device
// callback alive (a cpal::Stream in the app); dropping it ends playback.
pub struct ActiveStream<S> {
    pub id: u64,
    pub slot: usize,
    pub total_frames: usize,
    pub cursor: Arc<PlaybackCursor>,
    pub _handle: S,
}

/// Holds at most one live stream and hands out stream ids.
pub struct StreamSlot<S> {
    active: Option<ActiveStream<S>>,
    next_id: u64,
}

impl<S> StreamSlot<S> {
    pub fn new() -> Self {
        Self {
            active: None,
            next_id: 0,
        }
    }

    /// Id for the next stream. Ids are never reused, so a late completion
    /// report can't be mistaken for a newer stream's.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Install `stream` as the only live one. Whatever was playing is
    /// dropped first.
    pub fn attach(&mut self, stream: ActiveStream<S>) {
        self.stop();
        self.active = Some(stream);
    }

    /// Drop the live stream, returning its id.
    pub fn stop(&mut self) -> Option<u64> {
        let active = self.active.take()?;
        log::debug!("stopping stream {} (slot {})", active.id, active.slot);
        Some(active.id)
    }

    /// A stream reported Complete. Only tears down if it is still the live
    /// one; a pre-empted stream's report is stale.
    pub fn complete(&mut self, id: u64) -> bool {
        if self.active_id() == Some(id) {
            self.stop();
            true
        } else {
            false
        }
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }

    /// (position, total) in frames of the sounding sample.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.active
            .as_ref()
            .map(|a| (a.cursor.position(), a.total_frames))
    }
}
