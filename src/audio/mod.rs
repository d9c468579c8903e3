use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{HostTrait, StreamTrait};

use crate::audio_api::{AudioCommand, TriggerParams};

mod active;
mod decoder;
mod output;
mod playback;
mod sample_bank;
mod waveform;

pub use decoder::decode_file;
pub use sample_bank::{SampleBank, SampleSlot};
pub use waveform::Waveform;

use active::{ActiveStream, StreamSlot};
use output::AudioError;
use playback::PlaybackStream;

pub struct AudioHandle {
    device: Option<cpal::Device>, // None when no output is available
    bank: SampleBank,
    streams: StreamSlot<cpal::Stream>,
    completed_tx: Sender<u64>,
    completed_rx: Receiver<u64>,
}

impl AudioHandle {
    fn new(device: Option<cpal::Device>, bank: SampleBank) -> Self {
        let (completed_tx, completed_rx) = crossbeam_channel::bounded::<u64>(16);
        Self {
            device,
            bank,
            streams: StreamSlot::new(),
            completed_tx,
            completed_rx,
        }
    }

    pub fn send(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Trigger(t) => {
                if let Err(e) = self.trigger(t) {
                    log::warn!("skipping trigger for slot {}: {}", t.slot, e);
                }
            }
        }
    }

    fn trigger(&mut self, t: TriggerParams) -> Result<(), AudioError> {
        let Some(waveform) = self.bank.waveform(t.slot).cloned() else {
            log::warn!("trigger for unknown slot {}", t.slot);
            return Ok(());
        };
        if waveform.is_empty() {
            return Ok(()); // nothing loaded in this slot
        }

        // only one stream may ever drive the output
        self.stop();

        let device = self.device.as_ref().ok_or(AudioError::NoDevice)?;
        let id = self.streams.next_id();

        let total_frames = waveform.frames();
        let playback = PlaybackStream::new(waveform);
        let cursor = playback.cursor();
        let stream = output::build_output_stream(device, playback, id, self.completed_tx.clone())?;
        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        log::debug!("slot {} playing on stream {}", t.slot, id);
        self.streams.attach(ActiveStream {
            id,
            slot: t.slot,
            total_frames,
            cursor,
            _handle: stream,
        });
        Ok(())
    }

    /// Tear down the live stream, if any.
    pub fn stop(&mut self) {
        self.streams.stop();
    }

    // Called once per frame: drops a stream once its callback has reported
    // Complete. Reports from streams that were already pre-empted are ignored.
    pub fn poll_completed(&mut self) {
        while let Ok(id) = self.completed_rx.try_recv() {
            self.streams.complete(id);
        }
    }

    /// (position, total) in frames of the sounding sample.
    pub fn active_position(&self) -> Option<(usize, usize)> {
        self.streams.position()
    }
}

pub fn start_audio(bank: SampleBank) -> AudioHandle {
    let host = cpal::default_host();
    let device = host.default_output_device();
    if device.is_none() {
        log::warn!("no default output device, playback disabled");
    }
    AudioHandle::new(device, bank)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn slot(name: &str, waveform: Waveform) -> SampleSlot {
        SampleSlot {
            name: name.to_string(),
            waveform: Arc::new(waveform),
        }
    }

    fn bank() -> SampleBank {
        let loaded = Waveform {
            samples: vec![0.5; 32],
            sample_rate: 44100,
            channels: 1,
            bits_per_sample: 16,
        };
        SampleBank::new([
            slot("Kick", loaded.clone()),
            slot("Snare", Waveform::silent()),
            slot("Hat", loaded),
            slot("Clap", Waveform::silent()),
        ])
    }

    #[test]
    fn loaded_slot_without_device_reports_no_device() {
        let mut audio = AudioHandle::new(None, bank());
        let err = audio.trigger(TriggerParams { slot: 0 }).unwrap_err();
        assert!(matches!(err, AudioError::NoDevice));
        assert_eq!(audio.active_position(), None);
    }

    #[test]
    fn silent_slot_never_reaches_the_device() {
        let mut audio = AudioHandle::new(None, bank());
        // a device lookup would have failed with NoDevice
        assert!(audio.trigger(TriggerParams { slot: 1 }).is_ok());
        assert_eq!(audio.active_position(), None);
    }

    #[test]
    fn unknown_slot_is_ignored() {
        let mut audio = AudioHandle::new(None, bank());
        assert!(audio.trigger(TriggerParams { slot: 9 }).is_ok());
    }

    #[test]
    fn send_swallows_trigger_errors() {
        let mut audio = AudioHandle::new(None, bank());
        audio.send(AudioCommand::Trigger(TriggerParams { slot: 2 }));
        audio.poll_completed();
        assert_eq!(audio.active_position(), None);
    }

    #[test]
    fn completion_for_unknown_stream_is_harmless() {
        let mut audio = AudioHandle::new(None, bank());
        audio.completed_tx.try_send(42).unwrap();
        audio.poll_completed();
        assert_eq!(audio.active_position(), None);
        assert!(audio.completed_rx.is_empty());
    }
}
