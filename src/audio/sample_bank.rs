use std::sync::Arc;

use crate::shared::SAMPLE_COUNT;

use super::waveform::Waveform;

#[derive(Clone, Debug)]
pub struct SampleSlot {
    pub name: String,
    pub waveform: Arc<Waveform>,
}

// One decoded waveform per sequencer row, loaded once at startup and never
// replaced. Waveforms are shared with whatever stream is playing them.
#[derive(Clone, Debug)]
pub struct SampleBank {
    slots: [SampleSlot; SAMPLE_COUNT],
}

impl SampleBank {
    pub fn new(slots: [SampleSlot; SAMPLE_COUNT]) -> Self {
        Self { slots }
    }

    pub fn waveform(&self, slot: usize) -> Option<&Arc<Waveform>> {
        self.slots.get(slot).map(|s| &s.waveform)
    }

    pub fn names(&self) -> [String; SAMPLE_COUNT] {
        std::array::from_fn(|i| self.slots[i].name.clone())
    }
}
