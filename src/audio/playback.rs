use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::waveform::Waveform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullStatus {
    Continue,
    Complete, // the driver can stop pulling from this stream
}

/// Play position of one stream, in frames.
///
/// This is the only state the audio callback shares with the frame loop.
/// The callback is the sole writer; everyone else just loads it for display.
#[derive(Debug, Default)]
pub struct PlaybackCursor {
    position: AtomicUsize,
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }

    fn store(&self, pos: usize) {
        self.position.store(pos, Ordering::Release);
    }
}

/// One waveform plus the cursor walking through it.
pub struct PlaybackStream {
    waveform: Arc<Waveform>,
    cursor: Arc<PlaybackCursor>,
}

impl PlaybackStream {
    pub fn new(waveform: Arc<Waveform>) -> Self {
        Self {
            waveform,
            cursor: Arc::new(PlaybackCursor::new()),
        }
    }

    pub fn cursor(&self) -> Arc<PlaybackCursor> {
        Arc::clone(&self.cursor)
    }

    pub fn channels(&self) -> usize {
        self.waveform.channels.max(1) as usize
    }

    pub fn sample_rate(&self) -> u32 {
        self.waveform.sample_rate
    }

    /// Fill `frames` frames of `out` (interleaved, waveform channel count).
    ///
    /// Runs on the audio thread: no locks, no allocation. Frames past the
    /// end of the waveform are written as silence, so the block is always
    /// filled completely.
    pub fn pull(&self, out: &mut [f32], frames: usize) -> PullStatus {
        let wave = &*self.waveform;
        let channels = self.channels();
        let total = wave.frames();
        let mut pos = self.cursor.position();

        for frame in out.chunks_exact_mut(channels).take(frames) {
            if pos < total {
                frame.copy_from_slice(wave.frame(pos));
                pos += 1;
            } else {
                frame.fill(0.0); // pad silence
            }
        }
        self.cursor.store(pos);

        if pos >= total {
            PullStatus::Complete
        } else {
            PullStatus::Continue
        }
    }
}
