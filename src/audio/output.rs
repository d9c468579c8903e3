use std::fmt;

use crossbeam_channel::Sender;
use cpal::traits::DeviceTrait;

use super::playback::{PlaybackStream, PullStatus};

#[derive(Debug)]
pub enum AudioError {
    /// No output device to open a stream on
    NoDevice,
    /// The device refused the stream config
    StreamCreate(String),
    /// The stream was built but would not start
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "no audio output device available"),
            AudioError::StreamCreate(msg) => write!(f, "stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "playback error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

// Opens an f32 output stream shaped like the waveform (same rate, same
// channel count) whose callback pulls from `playback`. The first Complete
// is reported on `completed_tx` with `stream_id`; after that the callback
// keeps writing silence until the frame loop drops the stream.
pub fn build_output_stream(
    device: &cpal::Device,
    playback: PlaybackStream,
    stream_id: u64,
    completed_tx: Sender<u64>,
) -> Result<cpal::Stream, AudioError> {
    let channels = playback.channels();
    let config = cpal::StreamConfig {
        channels: channels as u16,
        sample_rate: playback.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };

    let mut reported = false;
    let err_fn = |err| log::error!("audio output stream error: {err}");

    device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels;
                if playback.pull(data, frames) == PullStatus::Complete && !reported {
                    reported = true;
                    let _ = completed_tx.try_send(stream_id); // never block here
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| AudioError::StreamCreate(e.to_string()))
}
