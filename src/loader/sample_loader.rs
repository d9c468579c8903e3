use std::path::Path;
use std::sync::Arc;

use crate::audio::{SampleBank, SampleSlot, Waveform, decode_file};
use crate::pipeline::config::SampleSource;
use crate::shared::SAMPLE_COUNT;

// Decode one slot's file. A bad file must not take the other slots down
// with it, so failures become a silent waveform.
pub fn load_slot(path: &Path, downmix: bool) -> Waveform {
    match decode_file(path, downmix) {
        Ok(waveform) => {
            log::info!(
                "loaded {} ({} frames, {} Hz, {} ch, {}-bit source)",
                path.display(),
                waveform.frames(),
                waveform.sample_rate,
                waveform.channels,
                waveform.bits_per_sample
            );
            waveform
        }
        Err(e) => {
            log::warn!(
                "{} not loaded ({:?}), slot will be silent: {}",
                path.display(),
                e.kind(),
                e
            );
            Waveform::silent()
        }
    }
}

// Runs once at startup, before any stream exists.
pub fn load_bank(sources: &[SampleSource; SAMPLE_COUNT], downmix: bool) -> SampleBank {
    SampleBank::new(std::array::from_fn(|i| SampleSlot {
        name: sources[i].name.clone(),
        waveform: Arc::new(load_slot(&sources[i].path, downmix)),
    }))
}
